use crate::utils::errors::EngineError;

/// Selects how the online processor decides where to cut its audio/hypothesis buffer once it
/// grows past `seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrimMode {
    /// Prefer cutting at a closed sentence boundary; falls back to a forced cut at `seconds`
    /// when no sentence has closed yet.
    Sentence,
    /// Cut at the latest inter-word silence once the buffer exceeds `seconds`.
    Segment,
}

/// Buffer-trimming policy for the online ASR processor, validated at construction time so a
/// misconfigured pipeline fails fast rather than behaving oddly mid-stream.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferTrimming {
    pub mode: TrimMode,
    pub seconds: f64,
}

impl BufferTrimming {
    pub fn new(mode: TrimMode, seconds: f64) -> Result<Self, EngineError> {
        if !(seconds > 0.0 && seconds <= 30.0) {
            return Err(EngineError::Configuration(format!(
                "buffer_trimming_sec must be in (0, 30], got {seconds}"
            )));
        }
        Ok(Self { mode, seconds })
    }
}

impl Default for BufferTrimming {
    fn default() -> Self {
        Self {
            mode: TrimMode::Segment,
            seconds: 15.0,
        }
    }
}

/// Maximum length, in characters, of the rolling prompt suffix handed back to the ASR as
/// decoding context on the next call.
pub const PROMPT_CAP_CHARS: usize = 200;

/// Top-level pipeline configuration: which languages to translate into, how the online processor
/// should trim its buffer, and the bounded-queue depth for the translation fan-out.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    pub source_language: String,
    pub target_languages: Vec<String>,
    pub buffer_trimming: BufferTrimming,
    pub translation_queue_capacity: usize,
    pub vac_chunk_size_s: f64,
}

impl EngineConfig {
    pub fn builder(source_language: impl Into<String>) -> EngineConfigBuilder {
        EngineConfigBuilder::new(source_language)
    }
}

pub struct EngineConfigBuilder {
    source_language: String,
    target_languages: Vec<String>,
    buffer_trimming: BufferTrimming,
    translation_queue_capacity: usize,
    vac_chunk_size_s: f64,
}

impl EngineConfigBuilder {
    pub fn new(source_language: impl Into<String>) -> Self {
        Self {
            source_language: source_language.into(),
            target_languages: Vec::new(),
            buffer_trimming: BufferTrimming::default(),
            translation_queue_capacity: 32,
            vac_chunk_size_s: 1.0,
        }
    }

    pub fn with_target_language(mut self, lang: impl Into<String>) -> Self {
        self.target_languages.push(lang.into());
        self
    }

    pub fn with_target_languages(mut self, langs: impl IntoIterator<Item = String>) -> Self {
        self.target_languages.extend(langs);
        self
    }

    pub fn with_buffer_trimming(mut self, trimming: BufferTrimming) -> Self {
        self.buffer_trimming = trimming;
        self
    }

    pub fn with_translation_queue_capacity(mut self, capacity: usize) -> Self {
        self.translation_queue_capacity = capacity;
        self
    }

    pub fn with_vac_chunk_size_s(mut self, seconds: f64) -> Self {
        self.vac_chunk_size_s = seconds;
        self
    }

    pub fn build(self) -> Result<EngineConfig, EngineError> {
        if self.source_language.trim().is_empty() {
            return Err(EngineError::Configuration(
                "source_language must not be empty".into(),
            ));
        }
        if self.target_languages.is_empty() {
            return Err(EngineError::Configuration(
                "at least one target language is required".into(),
            ));
        }
        if self.translation_queue_capacity == 0 {
            return Err(EngineError::Configuration(
                "translation_queue_capacity must be non-zero".into(),
            ));
        }
        Ok(EngineConfig {
            source_language: self.source_language,
            target_languages: self.target_languages,
            buffer_trimming: self.buffer_trimming,
            translation_queue_capacity: self.translation_queue_capacity,
            vac_chunk_size_s: self.vac_chunk_size_s,
        })
    }
}
