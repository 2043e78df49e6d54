#[cfg(test)]
mod online_processor_tests {
    use caption_relay::config::{BufferTrimming, TrimMode};
    use caption_relay::transcriber::online_processor::OnlineAsrProcessor;
    use caption_relay::transcriber::{TimedWord, Transcriber};
    use caption_relay::utils::errors::EngineError;
    use std::collections::VecDeque;

    struct ScriptedAsr {
        responses: VecDeque<Vec<TimedWord>>,
    }

    impl ScriptedAsr {
        fn new(responses: Vec<Vec<TimedWord>>) -> Self {
            Self {
                responses: responses.into(),
            }
        }
    }

    impl Transcriber for ScriptedAsr {
        fn transcribe(
            &mut self,
            _samples: &[f32],
            _init_prompt: &str,
        ) -> Result<Vec<TimedWord>, EngineError> {
            Ok(self.responses.pop_front().unwrap_or_default())
        }
    }

    fn w(start: f64, end: f64, text: &str) -> TimedWord {
        TimedWord::new(start, end, text)
    }

    #[test]
    fn no_new_audio_returns_empty_pair() {
        let asr = ScriptedAsr::new(vec![vec![w(0.0, 0.5, "hi")]]);
        let mut proc =
            OnlineAsrProcessor::new(asr, BufferTrimming::new(TrimMode::Segment, 15.0).unwrap());
        let (c, u) = proc.process_iter();
        assert!(c.is_empty());
        assert!(u.is_empty());
    }

    #[test]
    fn commits_grow_monotonically_across_iterations() {
        let asr = ScriptedAsr::new(vec![
            vec![w(0.0, 0.5, "hello"), w(0.5, 1.0, "world")],
            vec![
                w(0.0, 0.5, "hello"),
                w(0.5, 1.0, "world"),
                w(1.0, 1.4, "today"),
            ],
        ]);
        let mut proc =
            OnlineAsrProcessor::new(asr, BufferTrimming::new(TrimMode::Segment, 15.0).unwrap());
        proc.insert_audio(&[0.0; 16_000]);
        let (c1, _u1) = proc.process_iter();
        assert!(c1.is_empty());

        proc.insert_audio(&[0.0; 16_000]);
        let (_c2, u2) = proc.process_iter();
        assert!(u2.text.contains("helloworld"));
    }

    #[test]
    fn finish_flushes_remaining_audio_as_final() {
        let asr = ScriptedAsr::new(vec![vec![w(0.0, 0.5, "bye")]]);
        let mut proc =
            OnlineAsrProcessor::new(asr, BufferTrimming::new(TrimMode::Segment, 15.0).unwrap());
        proc.insert_audio(&[0.0; 8_000]);
        let (finished, _) = proc.finish();
        assert_eq!(finished.text, "bye");
        assert_eq!(proc.audio_len(), 0);
    }
}
