#[cfg(test)]
mod vac_tests {
    use caption_relay::config::{BufferTrimming, TrimMode};
    use caption_relay::transcriber::online_processor::OnlineAsrProcessor;
    use caption_relay::transcriber::vac::{Vad, VacOnlineAsrProcessor, VadEvent};
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

    struct ScriptedVad {
        events: VecDeque<Option<VadEvent>>,
    }

    impl ScriptedVad {
        fn new(events: Vec<Option<VadEvent>>) -> Self {
            Self {
                events: events.into(),
            }
        }
    }

    impl Vad for ScriptedVad {
        fn apply(&mut self, _chunk: &[f32]) -> Option<VadEvent> {
            self.events.pop_front().flatten()
        }

        fn reset(&mut self) {
            self.events.clear();
        }
    }

    fn processor(asr: ScriptedAsr) -> OnlineAsrProcessor<ScriptedAsr> {
        OnlineAsrProcessor::new(asr, BufferTrimming::new(TrimMode::Segment, 15.0).unwrap())
    }

    #[test]
    fn silence_before_speech_is_discarded() {
        let vad = ScriptedVad::new(vec![None]);
        let mut vac = VacOnlineAsrProcessor::new(processor(ScriptedAsr::new(vec![])), vad, 1.0);
        vac.insert_audio(&[0.0; 100]);
        assert_eq!(vac.online_audio_len(), 0);
    }

    #[test]
    fn start_event_forwards_tail_of_chunk() {
        let vad = ScriptedVad::new(vec![Some(VadEvent::Start { sample_index: 50 })]);
        let mut vac = VacOnlineAsrProcessor::new(processor(ScriptedAsr::new(vec![])), vad, 1.0);
        vac.insert_audio(&[0.0; 100]);
        assert!(vac.online_audio_len() > 0);
        assert!(vac.is_voice());
    }

    #[test]
    fn end_event_marks_utterance_final() {
        let vad = ScriptedVad::new(vec![
            Some(VadEvent::Start { sample_index: 0 }),
            // Global sample index: the first chunk occupies samples 0..100, so 150 lands
            // 50 samples into the second chunk.
            Some(VadEvent::End { sample_index: 150 }),
        ]);
        let mut vac = VacOnlineAsrProcessor::new(
            processor(ScriptedAsr::new(vec![vec![TimedWord::new(0.0, 0.1, "hi")]])),
            vad,
            1.0,
        );
        vac.insert_audio(&[0.0; 100]);
        vac.insert_audio(&[0.0; 100]);
        assert!(vac.is_currently_final());
        let (completed, _) = vac.process_iter();
        assert_eq!(completed.text, "hi");
        assert!(!vac.is_currently_final());
    }
}
