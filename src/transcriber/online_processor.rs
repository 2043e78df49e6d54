use crate::audio::accumulator::AudioAccumulator;
use crate::config::{BufferTrimming, PROMPT_CAP_CHARS, TrimMode};
use crate::transcriber::hypothesis_buffer::HypothesisBuffer;
use crate::transcriber::{TimedSegment, TimedWord, Transcriber, segmenter};
use crate::{debug_log, warn_log};

/// Drives a blackbox [`Transcriber`] over a growing audio buffer, reconciling successive
/// hypotheses through a [`HypothesisBuffer`] and periodically trimming the buffer so
/// re-transcription cost stays bounded.
///
/// This is the core streaming stabilization state machine: every [`process_iter`] call
/// re-transcribes the whole outstanding buffer, folds the result through LocalAgreement-2
/// (see [`HypothesisBuffer`]), and decides whether enough has stabilized to cut the buffer at a
/// sentence or inter-word boundary (see [`segmenter`]).
///
/// [`process_iter`]: OnlineAsrProcessor::process_iter
pub struct OnlineAsrProcessor<T: Transcriber> {
    transcriber: T,
    hyp_buf: HypothesisBuffer,
    audio: AudioAccumulator,
    last_transcribed_len: usize,
    prompt: String,
    final_transcript: Vec<TimedSegment>,
    committed_not_final: Vec<TimedWord>,
    trimming: BufferTrimming,
}

impl<T: Transcriber> OnlineAsrProcessor<T> {
    pub fn new(transcriber: T, trimming: BufferTrimming) -> Self {
        Self {
            transcriber,
            hyp_buf: HypothesisBuffer::new(),
            audio: AudioAccumulator::new(),
            last_transcribed_len: 0,
            prompt: String::new(),
            final_transcript: Vec::new(),
            committed_not_final: Vec::new(),
            trimming,
        }
    }

    /// Resets all mutable state, anchoring the next commit to `offset_s`. Called at pipeline
    /// startup and whenever a VAC wrapper starts a fresh utterance.
    pub fn init(&mut self, offset_s: f64) {
        self.audio.reset(offset_s);
        self.last_transcribed_len = 0;
        self.hyp_buf.reset(offset_s);
        self.prompt.clear();
        self.final_transcript.clear();
        self.committed_not_final.clear();
    }

    /// Appends audio to the buffer. Non-blocking; does not trigger transcription by itself.
    pub fn insert_audio(&mut self, samples: &[f32]) {
        self.audio.append(samples);
    }

    pub fn audio_len(&self) -> usize {
        self.audio.len()
    }

    pub fn final_transcript(&self) -> &[TimedSegment] {
        &self.final_transcript
    }

    /// Re-transcribes the whole buffer if new audio has arrived since the last call, reconciles
    /// the result, and returns `(completed, uncommitted)` segments.
    pub fn process_iter(&mut self) -> (TimedSegment, TimedSegment) {
        let words = match self.transcribe_audio_buffer() {
            Some(words) => words,
            None => return (TimedSegment::empty(), TimedSegment::empty()),
        };

        let words = segmenter::sanity_filter(words);
        if words.is_empty() {
            return (TimedSegment::empty(), TimedSegment::empty());
        }

        self.hyp_buf.insert(&words, 0.0);
        let committed_words = self.hyp_buf.flush();
        self.committed_not_final.extend(committed_words);

        let completed_chunks = self.get_completed_chunks();
        let completed = if completed_chunks.is_empty() {
            TimedSegment::empty()
        } else {
            self.final_transcript.extend(completed_chunks.iter().cloned());
            let segment = concat_segments(&completed_chunks);
            self.prompt =
                suffix_capped(&format!("{}{}", self.prompt, segment.text), PROMPT_CAP_CHARS);
            segment
        };

        let committed_but_not_final = TimedSegment::from_words(&self.committed_not_final);
        let incomplete = TimedSegment::from_words(self.hyp_buf.remaining());
        let uncommitted = TimedSegment::concat(committed_but_not_final, incomplete);

        (completed, uncommitted)
    }

    fn transcribe_audio_buffer(&mut self) -> Option<Vec<TimedWord>> {
        if self.audio.len() == self.last_transcribed_len {
            return None;
        }
        self.last_transcribed_len = self.audio.len();
        let offset_s = self.audio.time_offset_s();
        match self
            .transcriber
            .transcribe(self.audio.samples(), &self.prompt)
        {
            Ok(words) => Some(
                words
                    .into_iter()
                    .map(|w| TimedWord {
                        start_s: w.start_s + offset_s,
                        end_s: w.end_s + offset_s,
                        text: w.text,
                    })
                    .collect(),
            ),
            Err(e) => {
                warn_log!("transcription call failed, treating as empty hypothesis: {e}");
                Some(Vec::new())
            }
        }
    }

    /// Decides how much of `committed_not_final` has stabilized enough to move into the final
    /// transcript, returning each stabilized chunk as its own [`TimedSegment`] (one sentence per
    /// chunk in [`TrimMode::Sentence`], one word per chunk in [`TrimMode::Segment`]).
    fn get_completed_chunks(&mut self) -> Vec<TimedSegment> {
        if self.trimming.mode == TrimMode::Sentence {
            let words = std::mem::take(&mut self.committed_not_final);
            let (sentences, tail) = segmenter::split(&words);
            self.committed_not_final = tail;
            if !sentences.is_empty() {
                if let Some(end_s) = sentences.last().and_then(|s| s.end_s) {
                    self.chunk_at(end_s);
                }
                return sentences;
            }
        }

        if self.audio.duration_s() < self.trimming.seconds {
            return Vec::new();
        }

        let completed_words = self.chunk_completed_segment();
        if completed_words.is_empty() {
            return Vec::new();
        }

        if self.trimming.mode == TrimMode::Sentence {
            warn_log!("forcing a sentence-mode commit without a closed sentence boundary");
            vec![TimedSegment::from_words(&completed_words)]
        } else {
            completed_words
                .iter()
                .map(|w| TimedSegment::from_words(std::slice::from_ref(w)))
                .collect()
        }
    }

    /// Segment-mode trim: find the latest inter-word boundary at or before the end of the last
    /// committed-but-not-final word and cut there.
    fn chunk_completed_segment(&mut self) -> Vec<TimedWord> {
        let words = &self.committed_not_final;
        if words.len() <= 1 {
            return Vec::new();
        }
        let mut ends: Vec<f64> = words.iter().map(|w| w.end_s).collect();
        let t = *ends.last().expect("checked non-empty above");
        while ends.len() > 2 && ends[ends.len() - 2] > t {
            ends.pop();
        }
        let e = ends[ends.len() - 2];
        if e <= t {
            let n_committed = ends.len() - 1;
            let words_to_commit = self.committed_not_final[..n_committed].to_vec();
            self.chunk_at(e);
            self.committed_not_final.drain(..n_committed);
            words_to_commit
        } else {
            Vec::new()
        }
    }

    fn chunk_at(&mut self, t_s: f64) {
        self.hyp_buf.pop_committed_before(t_s);
        self.audio.cut_at(t_s);
    }

    /// Forces immediate transcription of whatever remains, treats it as final, and resets the
    /// buffer — used when a VAC wrapper closes out an utterance.
    pub fn finish(&mut self) -> (TimedSegment, TimedSegment) {
        let words = self.transcribe_audio_buffer().unwrap_or_default();
        let finish_segment = TimedSegment::from_words(&words);
        if !finish_segment.is_empty() {
            self.final_transcript.push(finish_segment.clone());
        }
        self.committed_not_final.clear();
        self.audio.reset(self.audio.time_offset_s());
        debug_log!("finished utterance: {:?}", finish_segment.text);
        (finish_segment, TimedSegment::empty())
    }
}

/// Concatenates a run of already-formed segments with no separator, matching the original's
/// `concatenate_tsw(..., sep="")` applied to a list of sentence/word chunks.
fn concat_segments(segments: &[TimedSegment]) -> TimedSegment {
    match segments {
        [] => TimedSegment::empty(),
        _ => {
            let start_s = segments.first().and_then(|s| s.start_s);
            let end_s = segments.last().and_then(|s| s.end_s);
            let text = segments.iter().map(|s| s.text.as_str()).collect::<String>();
            TimedSegment {
                start_s,
                end_s,
                text,
            }
        }
    }
}

fn suffix_capped(text: &str, cap: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= cap {
        return text.to_string();
    }
    text.chars().skip(char_count - cap).collect()
}
