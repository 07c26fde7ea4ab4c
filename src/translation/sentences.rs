/*!
 * Sentence segmentation used when a text has to be translated in halves.
 */

use once_cell::sync::Lazy;
use regex::Regex;

// Terminal punctuation (Latin and Indic danda), optional closing quotes or
// brackets, then whitespace.
static SENTENCE_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[.!?।॥…]+["'”’)\]]*\s+"#).expect("sentence boundary pattern is valid")
});

/// Split text into trimmed, non-empty sentences in their original order
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        push_trimmed(&mut sentences, &text[start..boundary.end()]);
        start = boundary.end();
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

/// Split sentences into two halves: the first ⌈n/2⌉ sentences and the rest.
///
/// Returns `None` when there are fewer than two sentences.
pub fn split_in_halves(text: &str) -> Option<(String, String)> {
    let sentences = split_sentences(text);
    if sentences.len() < 2 {
        return None;
    }

    let mid = sentences.len().div_ceil(2);
    Some((sentences[..mid].join(" "), sentences[mid..].join(" ")))
}

fn push_trimmed(sentences: &mut Vec<String>, segment: &str) {
    let segment = segment.trim();
    if !segment.is_empty() {
        sentences.push(segment.to_string());
    }
}
