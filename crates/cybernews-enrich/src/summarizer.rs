//! Frequency-based extractive summarization.

use std::collections::HashMap;
use std::sync::LazyLock;

use cybernews_core::text::{clean_whitespace, truncate_chars};
use regex::Regex;

/// Character budget of the fallback summary.
pub const FALLBACK_CHARS: usize = 280;

/// Default number of sentences kept.
pub const DEFAULT_MAX_SENTENCES: usize = 5;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}\-]{3,}").expect("valid word regex"));

/// Turns article text into a short summary. Implementations must be pure:
/// identical input yields identical output.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, text: &str) -> String;
}

/// Picks the `max_sentences` sentences with the highest normalized term
/// frequency and returns them in document order, one per line.
///
/// A sentence scores `Σ(freq[w] / max_freq) / sqrt(word_count)` over its
/// words of three or more letters, digits, or hyphens, case-folded.
#[derive(Debug, Clone, Copy)]
pub struct ExtractiveSummarizer {
    max_sentences: usize,
}

impl ExtractiveSummarizer {
    #[must_use]
    pub fn new(max_sentences: usize) -> Self {
        Self {
            max_sentences: max_sentences.max(1),
        }
    }

    #[must_use]
    pub fn max_sentences(&self) -> usize {
        self.max_sentences
    }
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SENTENCES)
    }
}

fn words(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Split on `.`, `!` or `?` followed by whitespace. Terminators stay attached
/// to their sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?')
            && chars.peek().is_some_and(|(_, next)| next.is_whitespace())
        {
            let end = i + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

impl Summarizer for ExtractiveSummarizer {
    fn summarize(&self, text: &str) -> String {
        let text = clean_whitespace(text);
        if text.split_whitespace().nth(1).is_none() {
            return truncate_chars(&text, FALLBACK_CHARS);
        }

        let all_words = words(&text);
        let mut freq: HashMap<&str, usize> = HashMap::new();
        for w in &all_words {
            *freq.entry(w.as_str()).or_insert(0) += 1;
        }
        let Some(&max_freq) = freq.values().max() else {
            return truncate_chars(&text, FALLBACK_CHARS);
        };

        let sentences = split_sentences(&text);
        #[allow(clippy::cast_precision_loss)]
        let mut scored: Vec<(usize, f64)> = sentences
            .iter()
            .enumerate()
            .filter_map(|(i, sentence)| {
                let ws = words(sentence);
                if ws.is_empty() {
                    return None;
                }
                let total: f64 = ws
                    .iter()
                    .map(|w| freq.get(w.as_str()).copied().unwrap_or(0) as f64 / max_freq as f64)
                    .sum();
                Some((i, total / (ws.len() as f64).sqrt()))
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(self.max_sentences);
        scored.sort_by_key(|(i, _)| *i);

        scored
            .iter()
            .map(|(i, _)| sentences[*i])
            .collect::<Vec<_>>()
            .join("\n")
    }
}
