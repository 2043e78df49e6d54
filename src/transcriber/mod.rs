use crate::utils::errors::EngineError;
use std::sync::Arc;

pub mod hypothesis_buffer;
pub mod online_processor;
pub mod segmenter;
pub mod vac;

/// Sample rate the whole pipeline operates at. All [`TimedWord`] timestamps and all audio
/// accumulators assume mono 16 kHz PCM, matching the blackbox ASR models this crate targets.
pub const SAMPLE_RATE: usize = 16_000;

/// A single ASR-hypothesized word, timestamped in seconds against a monotonic pipeline clock.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedWord {
    pub start_s: f64,
    pub end_s: f64,
    pub text: Arc<str>,
}

impl TimedWord {
    pub fn new(start_s: f64, end_s: f64, text: impl Into<Arc<str>>) -> Self {
        Self {
            start_s,
            end_s,
            text: text.into(),
        }
    }
}

/// A concatenated run of [`TimedWord`]s, or the empty segment `(None, None, "")` used throughout
/// the online processor to signal "nothing to report this iteration".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimedSegment {
    pub start_s: Option<f64>,
    pub end_s: Option<f64>,
    pub text: String,
}

impl TimedSegment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Concatenates a run of words with no separator, matching the original's
    /// `concatenate_tsw(..., sep="")` used for committed/uncommitted text.
    pub fn from_words(words: &[TimedWord]) -> Self {
        Self::from_words_with_sep(words, "")
    }

    pub fn from_words_with_sep(words: &[TimedWord], sep: &str) -> Self {
        match words {
            [] => Self::empty(),
            _ => {
                let start_s = words.first().map(|w| w.start_s);
                let end_s = words.last().map(|w| w.end_s);
                let mut text = String::new();
                for (i, w) in words.iter().enumerate() {
                    if i > 0 {
                        text.push_str(sep);
                    }
                    text.push_str(&w.text);
                }
                Self {
                    start_s,
                    end_s,
                    text,
                }
            }
        }
    }

    /// Joins two already-concatenated segments, preferring whichever side is non-empty.
    pub fn concat(first: Self, second: Self) -> Self {
        if first.end_s.is_none() {
            return second;
        }
        if second.end_s.is_none() {
            return first;
        }
        let mut text = first.text;
        text.push_str(&second.text);
        Self {
            start_s: first.start_s,
            end_s: second.end_s,
            text,
        }
    }
}

/// Blackbox ASR collaborator. Implementors run inference over the supplied samples using
/// `init_prompt` as prefix context and return timestamped words relative to the start of the
/// pipeline clock (the online processor applies the buffer's time offset before inserting).
pub trait Transcriber: Send {
    fn transcribe(
        &mut self,
        samples: &[f32],
        init_prompt: &str,
    ) -> Result<Vec<TimedWord>, EngineError>;

    /// Runs a one-off transcription over a decoded file's samples, used to warm up a model
    /// (JIT/kernel compilation, weight paging) before the streaming pipeline starts. The default
    /// implementation is a no-op for backends with nothing to warm up.
    fn transcribe_file(&mut self, _samples: &[f32]) -> Result<Vec<TimedWord>, EngineError> {
        Ok(Vec::new())
    }
}
