pub mod errors;

pub use errors::EngineError;

/// Bounded channel sender, backed by `crossbeam::channel` when the `crossbeam` feature is
/// enabled and by `std::sync::mpsc::SyncSender` otherwise.
#[cfg(feature = "crossbeam")]
pub type Sender<T> = crossbeam::channel::Sender<T>;
#[cfg(feature = "crossbeam")]
pub type Receiver<T> = crossbeam::channel::Receiver<T>;

#[cfg(not(feature = "crossbeam"))]
pub type Sender<T> = std::sync::mpsc::SyncSender<T>;
#[cfg(not(feature = "crossbeam"))]
pub type Receiver<T> = std::sync::mpsc::Receiver<T>;

/// Builds a bounded channel pair using whichever backend the `crossbeam` feature selects.
pub fn get_channel<T>(capacity: usize) -> (Sender<T>, Receiver<T>) {
    #[cfg(feature = "crossbeam")]
    {
        crossbeam::channel::bounded(capacity)
    }
    #[cfg(not(feature = "crossbeam"))]
    {
        std::sync::mpsc::sync_channel(capacity)
    }
}

/// Logs at `warn` level through `log` when `stream-logging` is enabled, otherwise to stderr.
/// Mirrors the dual-backend pattern used throughout the audio and translation modules.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {{
        #[cfg(feature = "stream-logging")]
        { log::warn!($($arg)*); }
        #[cfg(not(feature = "stream-logging"))]
        { eprintln!($($arg)*); }
    }};
}

#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        #[cfg(feature = "stream-logging")]
        { log::debug!($($arg)*); }
        #[cfg(not(feature = "stream-logging"))]
        { eprintln!($($arg)*); }
    }};
}

#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{
        #[cfg(feature = "stream-logging")]
        { log::info!($($arg)*); }
        #[cfg(not(feature = "stream-logging"))]
        { eprintln!($($arg)*); }
    }};
}
