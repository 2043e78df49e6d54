/// Pushes fixed-size chunks of mono audio into the pipeline. Implementors wrap whatever capture
/// backend is in use (a device callback, a file reader, a test fixture) and invoke the supplied
/// callback with each chunk as it becomes available; the callback forwards the chunk to the
/// online processor or the VAC wrapper.
pub trait AudioSource {
    /// Runs until the source is exhausted or `should_run` becomes false, invoking `on_chunk` for
    /// every chunk produced.
    fn run(&mut self, on_chunk: &mut dyn FnMut(&[f32]), should_run: &std::sync::atomic::AtomicBool);
}

/// An [`AudioSource`] that replays a pre-recorded buffer in fixed-size chunks, standing in for a
/// real capture device in tests and demos.
pub struct ScriptedAudioSource {
    samples: Vec<f32>,
    chunk_size: usize,
}

impl ScriptedAudioSource {
    pub fn new(samples: Vec<f32>, chunk_size: usize) -> Self {
        Self { samples, chunk_size }
    }
}

impl AudioSource for ScriptedAudioSource {
    fn run(
        &mut self,
        on_chunk: &mut dyn FnMut(&[f32]),
        should_run: &std::sync::atomic::AtomicBool,
    ) {
        use std::sync::atomic::Ordering;
        for chunk in self.samples.chunks(self.chunk_size.max(1)) {
            if !should_run.load(Ordering::Acquire) {
                break;
            }
            on_chunk(chunk);
        }
    }
}
