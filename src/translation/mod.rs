pub mod fanout;
pub mod sinks;

pub use fanout::{TranslationFanout, Translator, language_code_for_deepl};
#[cfg(feature = "console")]
pub use sinks::ConsoleSink;
pub use sinks::{FileSink, Sink, TranscriptArtifactWriter, WebSink, WebSinkHandle, WebSinkRegistry};
