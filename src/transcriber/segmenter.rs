use crate::transcriber::{TimedSegment, TimedWord};

/// Splits committed words into closed sentences plus a trailing tail of words that have not yet
/// formed a complete sentence. Punctuation handling follows a deliberately naive, ASCII-biased
/// heuristic suitable for live captioning rather than a proper tokenizer:
///
/// - a word with no `.`/`?`/`!` at all never closes.
/// - a word containing `?` or `!` but no `.` closes the sentence.
/// - otherwise (the word contains a `.`), the period sub-rules decide, in order:
///   - a leading `.` is stripped (a common ASR leading-dot artifact) and does not close.
///   - `...` anywhere is treated as a non-terminal ellipsis, collapsed to a single `…` character.
///   - a digit immediately followed by `.` anywhere in the word (e.g. `"v2.3"`) does not close.
///   - any other `.` closes the sentence, even if the word also contains a `?`/`!`.
///
/// Any words left over after the last closed sentence are always returned as the tail,
/// regardless of whether the final word itself closed a sentence — unlike a literal line-by-line
/// port of the punctuation loop, which would drop the tail entirely whenever the last word closed
/// a sentence of its own. Treating trailing words as tail unconditionally keeps `split` trivially
/// idempotent on repeated empty input.
pub fn split(words: &[TimedWord]) -> (Vec<TimedSegment>, Vec<TimedWord>) {
    let mut sentences = Vec::new();
    let mut current: Vec<TimedWord> = Vec::new();
    let mut consumed_through = 0usize;

    for (i, word) in words.iter().enumerate() {
        let mut text = word.text.to_string();
        let mut closes = false;

        if text.contains('.') || text.contains('?') || text.contains('!') {
            if !text.contains('.') {
                // a `?` or `!` with no `.` anywhere in the word.
                closes = true;
            } else if let Some(stripped) = text.strip_prefix('.') {
                text = stripped.to_string();
            } else if text.contains("...") {
                text = text.replace("...", "…");
            } else if contains_digit_dot(&text) {
                // digit-then-dot anywhere: not a sentence boundary (e.g. "v2.3")
            } else {
                closes = true;
            }
        }

        current.push(TimedWord {
            start_s: word.start_s,
            end_s: word.end_s,
            text: text.into(),
        });

        if closes {
            sentences.push(TimedSegment::from_words(&current));
            current.clear();
            consumed_through = i + 1;
        }
    }

    let tail = words[consumed_through..].to_vec();
    (sentences, tail)
}

fn contains_digit_dot(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    chars
        .windows(2)
        .any(|pair| pair[0].is_ascii_digit() && pair[1] == '.')
}

/// Drops a hypothesis that looks like runaway ASR repetition: when there are more than five
/// words and the single most frequent word text accounts for more than half of them, the whole
/// slice is considered pathological and discarded.
pub fn sanity_filter(words: Vec<TimedWord>) -> Vec<TimedWord> {
    if words.len() <= 5 {
        return words;
    }
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for w in &words {
        *counts.entry(w.text.as_ref()).or_insert(0) += 1;
    }
    let max_count = counts.values().copied().max().unwrap_or(0);
    if (max_count as f64) / (words.len() as f64) > 0.5 {
        crate::debug_log!(
            "dropping pathological hypothesis: {} of {} words repeat the same token",
            max_count,
            words.len()
        );
        return Vec::new();
    }
    words
}

