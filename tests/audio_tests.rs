#[cfg(test)]
mod audio_tests {
    use caption_relay::audio::accumulator::AudioAccumulator;
    use caption_relay::audio::source::{AudioSource, ScriptedAudioSource};
    use caption_relay::transcriber::SAMPLE_RATE;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn append_then_cut_advances_offset_and_drops_samples() {
        let mut acc = AudioAccumulator::new();
        acc.append(&[0.0; SAMPLE_RATE]);
        assert_eq!(acc.duration_s(), 1.0);
        acc.cut_at(0.5);
        assert_eq!(acc.time_offset_s(), 0.5);
        assert_eq!(acc.len(), SAMPLE_RATE / 2);
    }

    #[test]
    fn reset_clears_samples_and_anchors_offset() {
        let mut acc = AudioAccumulator::new();
        acc.append(&[0.0; 10]);
        acc.reset(3.0);
        assert!(acc.is_empty());
        assert_eq!(acc.time_offset_s(), 3.0);
    }

    #[test]
    fn scripted_source_replays_all_chunks() {
        let mut source = ScriptedAudioSource::new(vec![0.0; 10], 3);
        let should_run = AtomicBool::new(true);
        let mut seen = 0usize;
        source.run(
            &mut |chunk| {
                seen += chunk.len();
            },
            &should_run,
        );
        assert_eq!(seen, 10);
    }

    #[test]
    fn scripted_source_stops_when_flag_clears() {
        let mut source = ScriptedAudioSource::new(vec![0.0; 100], 10);
        let should_run = AtomicBool::new(false);
        let mut calls = 0usize;
        source.run(&mut |_| calls += 1, &should_run);
        assert_eq!(calls, 0);
    }
}
