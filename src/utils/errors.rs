use thiserror::Error;

/// Errors surfaced by the engine's fallible construction paths and the small set of runtime
/// paths that cannot be absorbed into a continue-the-stream fallback (transient ASR/MT failures
/// are logged and substituted with an empty hypothesis / the translation-error sentinel instead
/// of propagating here; see the online processor and translator modules).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("sink write failed: {0}")]
    SinkWrite(String),
    #[error("channel disconnected: {0}")]
    ChannelDisconnected(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
