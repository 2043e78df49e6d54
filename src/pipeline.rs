use crate::audio::source::AudioSource;
use crate::transcriber::online_processor::OnlineAsrProcessor;
use crate::transcriber::vac::{Vad, VacOnlineAsrProcessor};
use crate::transcriber::{TimedSegment, Transcriber};
use crate::translation::fanout::TranslationFanout;
use crate::translation::sinks::Sink;
use crate::{debug_log, warn_log};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Unifies [`OnlineAsrProcessor`] and [`VacOnlineAsrProcessor`] behind one interface so the
/// pipeline's transcription thread doesn't care whether voice-activity control is in front of the
/// online processor.
pub trait StreamingStage: Send {
    fn insert_audio(&mut self, samples: &[f32]);
    fn process_iter(&mut self) -> (TimedSegment, TimedSegment);
}

impl<T: Transcriber> StreamingStage for OnlineAsrProcessor<T> {
    fn insert_audio(&mut self, samples: &[f32]) {
        OnlineAsrProcessor::insert_audio(self, samples)
    }
    fn process_iter(&mut self) -> (TimedSegment, TimedSegment) {
        OnlineAsrProcessor::process_iter(self)
    }
}

impl<T: Transcriber, V: Vad> StreamingStage for VacOnlineAsrProcessor<T, V> {
    fn insert_audio(&mut self, samples: &[f32]) {
        VacOnlineAsrProcessor::insert_audio(self, samples)
    }
    fn process_iter(&mut self) -> (TimedSegment, TimedSegment) {
        VacOnlineAsrProcessor::process_iter(self)
    }
}

/// Runs an [`AudioSource`] on its own thread feeding a shared [`StreamingStage`], and a second
/// thread that drives `process_iter` in a loop, dispatching committed/incomplete text to the
/// original-language sinks and on into a [`TranslationFanout`].
///
/// Mirrors the teacher's `run_transcription: Arc<AtomicBool>` shutdown signal
/// (`realtime_transcriber`/`offline_transcriber`), generalized from one flag per transcription run
/// to one flag shared by the whole pipeline.
pub struct Pipeline {
    should_run: Arc<AtomicBool>,
    audio_thread: Option<JoinHandle<()>>,
    transcription_thread: Option<JoinHandle<()>>,
    stopped: bool,
}

impl Pipeline {
    /// Spawns the audio and transcription threads. `min_chunk_s` is the processor's expected
    /// per-iteration audio chunk size; the transcription thread sleeps `0.9 * min_chunk_s` after
    /// an iteration that produced nothing, matching the original's idle-poll backoff.
    pub fn spawn<S, Stage>(
        mut source: S,
        stage: Stage,
        mut original_sinks: Vec<Box<dyn Sink>>,
        fanout: TranslationFanout,
        min_chunk_s: f64,
    ) -> Self
    where
        S: AudioSource + Send + 'static,
        Stage: StreamingStage + 'static,
    {
        let should_run = Arc::new(AtomicBool::new(true));
        let stage = Arc::new(Mutex::new(stage));

        let audio_flag = should_run.clone();
        let audio_stage = stage.clone();
        let audio_thread = thread::spawn(move || {
            source.run(
                &mut |chunk| {
                    audio_stage.lock().insert_audio(chunk);
                },
                &audio_flag,
            );
            debug_log!("audio source exhausted, signalling pipeline shutdown");
            audio_flag.store(false, Ordering::Release);
        });

        let sleep_duration = Duration::from_secs_f64((0.9 * min_chunk_s).max(0.0));
        let transcription_flag = should_run.clone();
        let transcription_stage = stage.clone();
        let transcription_thread = thread::spawn(move || {
            loop {
                let running = transcription_flag.load(Ordering::Acquire);
                let (completed, incomplete) = transcription_stage.lock().process_iter();

                if !completed.is_empty() {
                    for sink in original_sinks.iter_mut() {
                        if let Err(e) = sink.write(&completed.text, true) {
                            warn_log!("original-language sink failed on committed text: {e}");
                        }
                    }
                    fanout.submit(completed.text.clone(), true);
                }
                if !incomplete.is_empty() {
                    for sink in original_sinks.iter_mut() {
                        if let Err(e) = sink.write(&incomplete.text, false) {
                            warn_log!("original-language sink failed on incomplete text: {e}");
                        }
                    }
                    fanout.submit(incomplete.text.clone(), false);
                }

                if !running {
                    break;
                }
                if completed.is_empty() && incomplete.is_empty() {
                    thread::sleep(sleep_duration);
                }
            }
            fanout.stop();
            for sink in original_sinks.iter_mut() {
                let _ = sink.close();
            }
        });

        Self {
            should_run,
            audio_thread: Some(audio_thread),
            transcription_thread: Some(transcription_thread),
            stopped: false,
        }
    }

    /// Signals both threads to stop at their next iteration boundary and waits for them to exit.
    /// Safe to call more than once; a second call is a no-op save for a warning, matching the
    /// original's "you already asked to stop" guard.
    pub fn stop(&mut self) {
        if self.stopped {
            warn_log!("pipeline already stopped");
            return;
        }
        self.stopped = true;
        self.should_run.store(false, Ordering::Release);
        if let Some(handle) = self.audio_thread.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.transcription_thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        if !self.stopped {
            self.stop();
        }
    }
}
