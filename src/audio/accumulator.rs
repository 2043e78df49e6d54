use crate::transcriber::SAMPLE_RATE;

/// A growable accumulation of 16 kHz mono samples anchored to a wall-clock offset.
///
/// This buffer grows without bound until the online processor explicitly trims it at a chosen
/// cut point — the re-transcription window the ASR sees on each iteration.
#[derive(Debug, Default)]
pub struct AudioAccumulator {
    samples: Vec<f32>,
    time_offset_s: f64,
}

impl AudioAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self, time_offset_s: f64) {
        self.samples.clear();
        self.time_offset_s = time_offset_s;
    }

    pub fn append(&mut self, chunk: &[f32]) {
        self.samples.extend_from_slice(chunk);
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_s(&self) -> f64 {
        self.samples.len() as f64 / SAMPLE_RATE as f64
    }

    pub fn time_offset_s(&self) -> f64 {
        self.time_offset_s
    }

    /// Discards samples before wall-clock time `cut_s`, advancing `time_offset_s` to match.
    pub fn cut_at(&mut self, cut_s: f64) {
        let cut_seconds = (cut_s - self.time_offset_s).max(0.0);
        let cut_samples = (cut_seconds * SAMPLE_RATE as f64) as usize;
        let cut_samples = cut_samples.min(self.samples.len());
        self.samples.drain(0..cut_samples);
        self.time_offset_s = cut_s;
    }
}
