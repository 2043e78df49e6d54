#[cfg(test)]
mod pipeline_tests {
    use caption_relay::audio::source::ScriptedAudioSource;
    use caption_relay::config::{BufferTrimming, TrimMode};
    use caption_relay::pipeline::Pipeline;
    use caption_relay::transcriber::online_processor::OnlineAsrProcessor;
    use caption_relay::transcriber::{TimedWord, Transcriber};
    use caption_relay::translation::fanout::{TranslationFanout, Translator};
    use caption_relay::translation::sinks::Sink;
    use caption_relay::utils::errors::EngineError;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    struct ScriptedAsr {
        responses: VecDeque<Vec<TimedWord>>,
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

    struct PassthroughTranslator;
    impl Translator for PassthroughTranslator {
        fn translate(
            &mut self,
            text: &str,
            _src_lang: &str,
            _tgt_lang: &str,
        ) -> Result<String, EngineError> {
            Ok(text.to_string())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl Sink for RecordingSink {
        fn write(&mut self, text: &str, _is_complete: bool) -> Result<(), EngineError> {
            self.lines.lock().push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn pipeline_drains_scripted_audio_and_shuts_down_cleanly() {
        let asr = ScriptedAsr {
            responses: vec![vec![TimedWord::new(0.0, 0.2, "bye")]].into(),
        };
        let processor =
            OnlineAsrProcessor::new(asr, BufferTrimming::new(TrimMode::Segment, 15.0).unwrap());
        let source = ScriptedAudioSource::new(vec![0.0; 1_600], 1_600);

        let sink = RecordingSink::default();
        let lines = sink.lines.clone();

        let fanout = TranslationFanout::new(
            "fr",
            vec![(
                "en".to_string(),
                Box::new(PassthroughTranslator) as Box<dyn Translator>,
                vec![],
            )],
            4,
        );

        let mut pipeline = Pipeline::spawn(
            source,
            processor,
            vec![Box::new(sink) as Box<dyn Sink>],
            fanout,
            0.05,
        );
        pipeline.stop();

        assert!(!lines.lock().is_empty());
    }
}
