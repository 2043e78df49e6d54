use crate::transcriber::{TimedSegment, TimedWord};
use crate::utils::errors::EngineError;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// A destination for translated (or original-language) text. Implementations are not expected to
/// be reusable across languages; one instance is owned per target.
pub trait Sink: Send {
    fn write(&mut self, text: &str, is_complete: bool) -> Result<(), EngineError>;

    /// Releases any resources held by the sink (closes files, deregisters web streams). Called
    /// once when the owning pipeline shuts down.
    fn close(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Writes a line to the terminal, tinting incomplete (still-reconciling) text differently than
/// committed text.
#[cfg(feature = "console")]
pub struct ConsoleSink {
    language: String,
    label_style: console::Style,
    incomplete_style: console::Style,
}

#[cfg(feature = "console")]
impl ConsoleSink {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            label_style: console::Style::new().yellow(),
            incomplete_style: console::Style::new().red(),
        }
    }
}

#[cfg(feature = "console")]
impl Sink for ConsoleSink {
    fn write(&mut self, text: &str, is_complete: bool) -> Result<(), EngineError> {
        let label = self.label_style.apply_to(format!("[{}]", self.language));
        if is_complete {
            println!("{label}: {text}");
        } else {
            println!("{label}: {}", self.incomplete_style.apply_to(text));
        }
        Ok(())
    }
}

/// Appends committed text to a plain-text file, writing a front-matter header on creation and
/// flushing after every write. Incomplete text is never written, matching the original's
/// "only the committed transcript is durable" behavior.
pub struct FileSink {
    file: File,
    sep: String,
}

impl FileSink {
    pub fn create(path: impl AsRef<Path>, language: &str) -> Result<Self, EngineError> {
        let mut file = File::create(path)?;
        write!(file, "---\nlanguage: {language}\n---\n\n")?;
        Ok(Self {
            file,
            sep: " ".to_string(),
        })
    }
}

impl Sink for FileSink {
    fn write(&mut self, text: &str, is_complete: bool) -> Result<(), EngineError> {
        if !is_complete {
            return Ok(());
        }
        self.file.write_all(text.as_bytes())?;
        self.file.write_all(self.sep.as_bytes())?;
        self.file.flush()?;
        Ok(())
    }
}

fn escape_for_web(text: &str) -> String {
    text.replace('\n', "<br>").replace(' ', "&nbsp;")
}

/// Persists the original-language transcript to disk as the `OnlineAsrProcessor` commits words
/// and segments. Deliberately decoupled from the reconciliation algorithm (§4.3's "artifact
/// writer" note): nothing in `transcriber::online_processor` touches the filesystem, this is a
/// thin observer a pipeline wires up alongside it.
pub struct TranscriptArtifactWriter {
    words_csv: File,
    sentence_tsv: File,
    full_md: File,
}

impl TranscriptArtifactWriter {
    pub fn create(dir: impl AsRef<Path>) -> Result<Self, EngineError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let mut words_csv = File::create(dir.join("transcribed_words.csv"))?;
        writeln!(words_csv, "wallclock,start_s,end_s,text")?;
        let sentence_tsv = File::create(dir.join("sentence_transcript.tsv"))?;
        let full_md = File::create(dir.join("full_transcript.md"))?;
        Ok(Self {
            words_csv,
            sentence_tsv,
            full_md,
        })
    }

    /// Appends one row per word to `transcribed_words.csv`.
    pub fn record_words(&mut self, wallclock_s: f64, words: &[TimedWord]) -> Result<(), EngineError> {
        for word in words {
            writeln!(
                self.words_csv,
                "{wallclock_s},{},{},\"{}\"",
                word.start_s, word.end_s, word.text
            )?;
        }
        self.words_csv.flush()?;
        Ok(())
    }

    /// Appends one row to `sentence_transcript.tsv` and one line to `full_transcript.md` per
    /// committed segment. Empty segments are skipped.
    pub fn record_segment(
        &mut self,
        wallclock_s: f64,
        segment: &TimedSegment,
    ) -> Result<(), EngineError> {
        if segment.is_empty() {
            return Ok(());
        }
        writeln!(
            self.sentence_tsv,
            "{wallclock_s}\t{}\t{}\t\"{}\"",
            segment.start_s.unwrap_or(0.0),
            segment.end_s.unwrap_or(0.0),
            segment.text
        )?;
        self.sentence_tsv.flush()?;
        writeln!(self.full_md, "{}", segment.text)?;
        self.full_md.flush()?;
        Ok(())
    }
}

#[derive(Default)]
struct WebSinkState {
    buffer: Vec<String>,
    queue: VecDeque<String>,
    incomplete: String,
}

/// A web-pollable text stream for one language: committed lines accumulate in an append-only
/// buffer and a drain-once queue; the latest incomplete hypothesis is held in a single slot that
/// each write overwrites.
pub struct WebSink {
    language: String,
    state: Mutex<WebSinkState>,
}

impl WebSink {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            state: Mutex::new(WebSinkState::default()),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Drains everything committed since the last poll, alongside the current incomplete text.
    pub fn poll_new(&self) -> (String, String) {
        let mut state = self.state.lock();
        let drained: Vec<String> = state.queue.drain(..).collect();
        (drained.join(" "), state.incomplete.clone())
    }

    /// Returns the whole committed history plus the current incomplete text.
    pub fn snapshot(&self) -> (String, String) {
        let state = self.state.lock();
        (state.buffer.join(" "), state.incomplete.clone())
    }

    pub fn incomplete(&self) -> String {
        self.state.lock().incomplete.clone()
    }

    fn record(&self, text: &str, is_complete: bool) {
        let escaped = escape_for_web(text);
        let mut state = self.state.lock();
        if is_complete {
            state.queue.push_back(escaped.clone());
            state.buffer.push(escaped);
        } else {
            state.incomplete = escaped;
        }
    }
}

/// Owns one [`WebSink`] per target language on behalf of the pipeline that created them. Replaces
/// the class-level `_streams` dictionary the original kept on `WebOutputStream` itself: nothing
/// here is process-global, so multiple pipelines in the same process never collide.
#[derive(Default)]
pub struct WebSinkRegistry {
    streams: HashMap<String, Arc<WebSink>>,
}

impl WebSinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new stream for `language`, replacing any existing one, and returns a handle
    /// shared between the registry and whichever [`Sink`] wrapper is handed to the fan-out.
    pub fn register(&mut self, language: impl Into<String>) -> Arc<WebSink> {
        let language = language.into();
        let stream = Arc::new(WebSink::new(language.clone()));
        self.streams.insert(language, stream.clone());
        stream
    }

    pub fn get(&self, language: &str) -> Option<Arc<WebSink>> {
        self.streams.get(language).cloned()
    }

    pub fn languages(&self) -> Vec<String> {
        self.streams.keys().cloned().collect()
    }

    pub fn remove(&mut self, language: &str) {
        self.streams.remove(language);
    }
}

/// Adapts a shared [`WebSink`] handle to the [`Sink`] trait so a registry-owned stream can also
/// sit in a fan-out target's sink list alongside a [`ConsoleSink`]/[`FileSink`].
pub struct WebSinkHandle(pub Arc<WebSink>);

impl Sink for WebSinkHandle {
    fn write(&mut self, text: &str, is_complete: bool) -> Result<(), EngineError> {
        self.0.record(text, is_complete);
        Ok(())
    }
}
