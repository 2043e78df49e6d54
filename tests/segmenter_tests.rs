#[cfg(test)]
mod segmenter_tests {
    use caption_relay::transcriber::segmenter::{sanity_filter, split};
    use caption_relay::transcriber::TimedWord;

    fn w(start: f64, end: f64, text: &str) -> TimedWord {
        TimedWord::new(start, end, text)
    }

    #[test]
    fn closes_on_question_and_exclamation() {
        let words = vec![w(0.0, 0.3, "really"), w(0.3, 0.6, "now?")];
        let (sentences, tail) = split(&words);
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].text, "reallynow?");
        assert!(tail.is_empty());
    }

    #[test]
    fn strips_leading_dot_without_closing() {
        let words = vec![w(0.0, 0.3, ".hello"), w(0.3, 0.6, "world")];
        let (sentences, tail) = split(&words);
        assert!(sentences.is_empty());
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].text.as_ref(), "hello");
    }

    #[test]
    fn ellipsis_does_not_close() {
        let words = vec![w(0.0, 0.3, "wait..."), w(0.3, 0.6, "what")];
        let (sentences, tail) = split(&words);
        assert!(sentences.is_empty());
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].text.as_ref(), "wait…");
    }

    #[test]
    fn digit_dot_does_not_close() {
        let words = vec![w(0.0, 0.3, "3."), w(0.3, 0.6, "5"), w(0.6, 0.9, "meters.")];
        let (sentences, tail) = split(&words);
        assert_eq!(sentences.len(), 1);
        assert!(tail.is_empty());
    }

    #[test]
    fn mid_word_digit_dot_does_not_close() {
        let words = vec![w(0.0, 0.3, "v2.3"), w(0.3, 0.6, "shipped.")];
        let (sentences, tail) = split(&words);
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].text, "v2.3shipped.");
        assert!(tail.is_empty());
    }

    #[test]
    fn period_branch_takes_precedence_over_trailing_question_mark() {
        let words = vec![w(0.0, 0.3, "well...?"), w(0.3, 0.6, "really")];
        let (sentences, tail) = split(&words);
        assert!(sentences.is_empty());
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].text.as_ref(), "well…?");
    }

    #[test]
    fn trailing_words_are_always_tail() {
        let words = vec![
            w(0.0, 0.3, "done."),
            w(0.3, 0.6, "more"),
            w(0.6, 0.9, "words"),
        ];
        let (sentences, tail) = split(&words);
        assert_eq!(sentences.len(), 1);
        assert_eq!(tail.len(), 2);
    }

    #[test]
    fn sanity_filter_drops_runaway_repetition() {
        let words: Vec<TimedWord> = (0..10)
            .map(|i| w(i as f64, i as f64 + 0.5, "the"))
            .collect();
        assert!(sanity_filter(words).is_empty());
    }

    #[test]
    fn sanity_filter_keeps_short_slices() {
        let words: Vec<TimedWord> = (0..5)
            .map(|i| w(i as f64, i as f64 + 0.5, "the"))
            .collect();
        assert_eq!(sanity_filter(words).len(), 5);
    }
}
