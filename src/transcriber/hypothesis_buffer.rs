use crate::transcriber::TimedWord;

/// Reconciles successive ASR hypotheses into a monotonic committed transcript.
///
/// Each call to [`HypothesisBuffer::insert`] hands over the ASR's freshest guess for the
/// unconfirmed tail of the stream. [`HypothesisBuffer::flush`] compares that guess against the
/// previous one and commits the longest common prefix, the LocalAgreement-2 rule: a word is only
/// trustworthy once two successive hypotheses agree on it.
#[derive(Debug, Default)]
pub struct HypothesisBuffer {
    committed: Vec<TimedWord>,
    pending: Vec<TimedWord>,
    incoming: Vec<TimedWord>,
    last_committed_end_s: f64,
    last_committed_text: Option<String>,
}

const OVERLAP_GRACE_S: f64 = 0.1;
const DEDUP_WINDOW_S: f64 = 1.0;
const MAX_NGRAM: usize = 5;

impl HypothesisBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets all state and anchors the next commit to `offset_s`, used when a fresh utterance
    /// starts (VAC boundary) or at pipeline startup.
    pub fn reset(&mut self, offset_s: f64) {
        self.committed.clear();
        self.pending.clear();
        self.incoming.clear();
        self.last_committed_end_s = offset_s;
        self.last_committed_text = None;
    }

    pub fn last_committed_end_s(&self) -> f64 {
        self.last_committed_end_s
    }

    /// Accepts a fresh hypothesis for the unconfirmed tail, shifting all timestamps by
    /// `offset_s`. Words that end before the already-committed boundary (minus a small grace
    /// window to tolerate re-estimation jitter) are discarded. When the new hypothesis overlaps
    /// the previously committed text closely in time, runs n-gram de-duplication against the
    /// already-committed words so the same tokens are not re-emitted.
    pub fn insert(&mut self, new: &[TimedWord], offset_s: f64) {
        let mut incoming: Vec<TimedWord> = new
            .iter()
            .map(|w| TimedWord {
                start_s: w.start_s + offset_s,
                end_s: w.end_s + offset_s,
                text: w.text.clone(),
            })
            .filter(|w| w.start_s > self.last_committed_end_s - OVERLAP_GRACE_S)
            .collect();

        if !incoming.is_empty()
            && (incoming[0].start_s - self.last_committed_end_s).abs() < DEDUP_WINDOW_S
        {
            let max_n = self.committed.len().min(incoming.len()).min(MAX_NGRAM);
            let mut best_n = 0;
            for n in 1..=max_n {
                let tail_committed: Vec<&str> = self.committed[self.committed.len() - n..]
                    .iter()
                    .map(|w| w.text.as_ref())
                    .collect();
                let head_incoming: Vec<&str> =
                    incoming[..n].iter().map(|w| w.text.as_ref()).collect();
                if tail_committed == head_incoming {
                    best_n = n;
                }
            }
            if best_n > 0 {
                incoming.drain(0..best_n);
            }
        }

        self.incoming = incoming;
    }

    /// Commits the longest common text prefix of `pending` (the previous hypothesis) and
    /// `incoming` (the current one), then rolls `incoming` into `pending` for the next call.
    /// Returns the newly committed words, in order.
    pub fn flush(&mut self) -> Vec<TimedWord> {
        let mut committed_now = Vec::new();

        let mut pending_iter = 0;
        let mut incoming_iter = 0;
        while pending_iter < self.pending.len() && incoming_iter < self.incoming.len() {
            if self.pending[pending_iter].text == self.incoming[incoming_iter].text {
                let word = self.incoming[incoming_iter].clone();
                self.last_committed_end_s = word.end_s;
                self.last_committed_text = Some(word.text.to_string());
                committed_now.push(word);
                pending_iter += 1;
                incoming_iter += 1;
            } else {
                break;
            }
        }

        let remainder = self.incoming.split_off(incoming_iter);
        self.incoming.clear();
        self.pending = remainder;
        self.committed.extend(committed_now.iter().cloned());
        committed_now
    }

    /// Drops already-surfaced words from the front of the committed history once the audio they
    /// came from has been trimmed (`end_s <= t_s`).
    pub fn pop_committed_before(&mut self, t_s: f64) {
        while let Some(front) = self.committed.first() {
            if front.end_s <= t_s {
                self.committed.remove(0);
            } else {
                break;
            }
        }
    }

    /// The words accepted into `pending` but not yet reconciled against a second hypothesis.
    pub fn remaining(&self) -> &[TimedWord] {
        &self.pending
    }

    /// The monotonic prefix already committed. Exposed for inspection/telemetry; the reconciler
    /// itself never needs to read this back.
    pub fn committed(&self) -> &[TimedWord] {
        &self.committed
    }
}
