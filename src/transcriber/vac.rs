use crate::transcriber::online_processor::OnlineAsrProcessor;
use crate::transcriber::{SAMPLE_RATE, TimedSegment, Transcriber};
use crate::warn_log;

/// A voice-activity event reported by a [`Vad`] implementation, carrying the absolute sample
/// index (counted from the start of the stream, not reset between [`Vad::apply`] calls) at
/// which speech started or ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VadEvent {
    Start { sample_index: usize },
    End { sample_index: usize },
}

/// Streaming voice-activity detector. Implementations are expected to maintain internal state
/// across calls (e.g. a sliding window of recent energy/probability) and emit at most one event
/// per call to [`apply`].
///
/// [`apply`]: Vad::apply
pub trait Vad: Send {
    fn apply(&mut self, chunk: &[f32]) -> Option<VadEvent>;
    fn reset(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VacStatus {
    Voice,
    NonVoice,
}

/// Wraps an [`OnlineAsrProcessor`] with voice-activity control: audio outside detected speech is
/// discarded, and each speech utterance is forwarded to the processor as its own bounded
/// segment, preempted by [`OnlineAsrProcessor::finish`] as soon as the utterance ends.
pub struct VacOnlineAsrProcessor<T: Transcriber, V: Vad> {
    online: OnlineAsrProcessor<T>,
    vad: V,
    online_chunk_size_s: f64,
    status: VacStatus,
    is_currently_final: bool,
    accumulated_voice_samples: usize,
    audio: Vec<f32>,
    buffer_offset_frames: usize,
}

impl<T: Transcriber, V: Vad> VacOnlineAsrProcessor<T, V> {
    pub fn new(online: OnlineAsrProcessor<T>, vad: V, online_chunk_size_s: f64) -> Self {
        Self {
            online,
            vad,
            online_chunk_size_s,
            status: VacStatus::NonVoice,
            is_currently_final: false,
            accumulated_voice_samples: 0,
            audio: Vec::new(),
            buffer_offset_frames: 0,
        }
    }

    pub fn init(&mut self) {
        self.online.init(0.0);
        self.vad.reset();
        self.accumulated_voice_samples = 0;
        self.is_currently_final = false;
        self.status = VacStatus::NonVoice;
        self.audio.clear();
        self.buffer_offset_frames = 0;
    }

    fn clear_buffer(&mut self) {
        self.buffer_offset_frames += self.audio.len();
        self.audio.clear();
    }

    /// Runs the chunk through VAD, accumulating it locally until a start/end event resolves
    /// which part of it belongs to speech, then forwards the resolved portion to the wrapped
    /// online processor. `sample_index` on a [`VadEvent`] is an absolute sample count from the
    /// start of the stream; it is translated into an index local to the buffer accumulated
    /// since the last utterance boundary via `buffer_offset_frames`.
    pub fn insert_audio(&mut self, chunk: &[f32]) {
        let event = self.vad.apply(chunk);
        self.audio.extend_from_slice(chunk);

        match event {
            None => {
                if self.status == VacStatus::Voice {
                    self.forward_and_count(self.audio.clone().as_slice());
                }
            }
            Some(VadEvent::Start { sample_index }) => {
                self.status = VacStatus::Voice;
                let frame = sample_index
                    .saturating_sub(self.buffer_offset_frames)
                    .min(self.audio.len());
                if self.online.audio_len() > 0 {
                    warn_log!(
                        "starting a new utterance while the online processor still has {} buffered samples",
                        self.online.audio_len()
                    );
                }
                let send_audio = self.audio[frame..].to_vec();
                let offset_s = sample_index as f64 / SAMPLE_RATE as f64;
                self.online.init(offset_s);
                self.forward_and_count(&send_audio);
            }
            Some(VadEvent::End { sample_index }) => {
                self.status = VacStatus::NonVoice;
                let frame = sample_index
                    .saturating_sub(self.buffer_offset_frames)
                    .min(self.audio.len());
                let send_audio = self.audio[..frame].to_vec();
                self.is_currently_final = true;
                self.forward_and_count(&send_audio);
            }
        }

        self.clear_buffer();
    }

    fn forward_and_count(&mut self, samples: &[f32]) {
        self.online.insert_audio(samples);
        self.accumulated_voice_samples += samples.len();
    }

    /// Samples currently buffered in the wrapped online processor. Exposed for inspection.
    pub fn online_audio_len(&self) -> usize {
        self.online.audio_len()
    }

    /// Whether an end-of-utterance event has been seen and not yet drained by [`process_iter`].
    ///
    /// [`process_iter`]: VacOnlineAsrProcessor::process_iter
    pub fn is_currently_final(&self) -> bool {
        self.is_currently_final
    }

    /// Whether the wrapper currently believes it is inside a voiced utterance.
    pub fn is_voice(&self) -> bool {
        self.status == VacStatus::Voice
    }

    /// Mirrors [`OnlineAsrProcessor::process_iter`], but preempts with
    /// [`OnlineAsrProcessor::finish`] as soon as an utterance-ending VAD event has been seen, and
    /// otherwise waits until enough voiced audio has accumulated before invoking the wrapped
    /// processor at all.
    pub fn process_iter(&mut self) -> (TimedSegment, TimedSegment) {
        if self.is_currently_final {
            let result = self.online.finish();
            self.accumulated_voice_samples = 0;
            self.is_currently_final = false;
            return result;
        }

        let threshold = (SAMPLE_RATE as f64 * self.online_chunk_size_s) as usize;
        if self.accumulated_voice_samples > threshold {
            self.accumulated_voice_samples = 0;
            return self.online.process_iter();
        }

        (TimedSegment::empty(), TimedSegment::empty())
    }
}
