use crate::translation::sinks::Sink;
use crate::utils::errors::EngineError;
use crate::utils::{Receiver, Sender, get_channel};
use crate::warn_log;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const DEQUEUE_TIMEOUT: Duration = Duration::from_secs(1);

/// Blackbox machine-translation backend. Implementations wrap a hosted API (DeepL) or a local
/// model (M2M100); either way they take plain text in one language and return plain text in
/// another.
pub trait Translator: Send {
    fn translate(&mut self, text: &str, src_lang: &str, tgt_lang: &str)
    -> Result<String, EngineError>;
}

/// Maps an ISO language code to the form a hosted MT backend expects. DeepL wants `EN-US` for
/// English and uppercased codes for everything else.
pub fn language_code_for_deepl(lang: &str) -> String {
    if lang == "en" {
        "EN-US".to_string()
    } else {
        lang.to_uppercase()
    }
}

struct TranslationTarget {
    tgt_lang: String,
    translator: Box<dyn Translator>,
    sinks: Vec<Box<dyn Sink>>,
}

/// One dedicated worker thread fans completed (and, opportunistically, incomplete) transcription
/// segments out to every configured target language, translating once per target and writing the
/// result to that target's sinks.
///
/// The queue applies a stale-incomplete drop policy: an incomplete segment is only worth
/// translating if nothing newer is already waiting behind it. A complete segment always goes
/// through. The backlog length is tracked explicitly (incremented on `submit`, decremented as the
/// worker dequeues), rather than read off the channel, so the policy behaves identically whether
/// or not the `crossbeam` feature is enabled — `std::sync::mpsc::Receiver` has no length
/// introspection to fall back on.
pub struct TranslationFanout {
    sender: Sender<(String, bool)>,
    handle: Option<JoinHandle<()>>,
    should_run: Arc<AtomicBool>,
    queued: Arc<AtomicUsize>,
}

impl TranslationFanout {
    pub fn new(
        src_lang: impl Into<String>,
        targets: Vec<(String, Box<dyn Translator>, Vec<Box<dyn Sink>>)>,
        queue_capacity: usize,
    ) -> Self {
        let (sender, receiver) = get_channel(queue_capacity);
        let should_run = Arc::new(AtomicBool::new(true));
        let queued = Arc::new(AtomicUsize::new(0));
        let worker_flag = should_run.clone();
        let worker_queued = queued.clone();
        let src_lang = src_lang.into();
        let mut targets: Vec<TranslationTarget> = targets
            .into_iter()
            .map(|(tgt_lang, translator, sinks)| TranslationTarget {
                tgt_lang,
                translator,
                sinks,
            })
            .collect();

        let handle = thread::spawn(move || {
            Self::worker_loop(receiver, worker_flag, worker_queued, &src_lang, &mut targets);
            for target in targets.iter_mut() {
                for sink in target.sinks.iter_mut() {
                    if let Err(e) = sink.close() {
                        warn_log!("sink close failed for {}: {e}", target.tgt_lang);
                    }
                }
            }
        });

        Self {
            sender,
            handle: Some(handle),
            should_run,
            queued,
        }
    }

    fn worker_loop(
        receiver: Receiver<(String, bool)>,
        should_run: Arc<AtomicBool>,
        queued: Arc<AtomicUsize>,
        src_lang: &str,
        targets: &mut [TranslationTarget],
    ) {
        while should_run.load(Ordering::Acquire) {
            let (text, is_complete) = match receiver.recv_timeout(DEQUEUE_TIMEOUT) {
                Ok(item) => item,
                Err(_) => continue,
            };
            let queue_size = queued.fetch_sub(1, Ordering::AcqRel) - 1;

            if is_complete || queue_size == 0 {
                dispatch(src_lang, &text, is_complete, targets);
            } else {
                warn_log!(
                    "skipping incomplete translation as there are {} more items in the queue",
                    queue_size
                );
            }
        }
    }

    /// Enqueues a segment for translation. Empty segments are dropped without enqueuing. Returns
    /// `false` if the worker's queue is gone (the fanout has been stopped or the thread panicked).
    pub fn submit(&self, text: String, is_complete: bool) -> bool {
        if text.is_empty() {
            return true;
        }
        match self.sender.try_send((text, is_complete)) {
            Ok(()) => {
                self.queued.fetch_add(1, Ordering::AcqRel);
                true
            }
            Err(_) => false,
        }
    }

    /// Signals the worker thread to stop, waits for it to drain its current item, and closes every
    /// target's sinks.
    pub fn stop(mut self) {
        self.should_run.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn dispatch(src_lang: &str, text: &str, is_complete: bool, targets: &mut [TranslationTarget]) {
    for target in targets.iter_mut() {
        let translated = match target.translator.translate(text, src_lang, &target.tgt_lang) {
            Ok(t) => t,
            Err(e) => {
                warn_log!("translation to {} failed: {e}", target.tgt_lang);
                "[ Translation Error ]".to_string()
            }
        };
        for sink in target.sinks.iter_mut() {
            if let Err(e) = sink.write(&translated, is_complete) {
                warn_log!("sink write failed for {}: {e}", target.tgt_lang);
            }
        }
    }
}
