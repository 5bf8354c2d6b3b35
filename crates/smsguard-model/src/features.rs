//! Feature extraction: raw SMS text to the model's numeric representation

use regex::Regex;
use smsguard_core::{Error, Result};
use std::collections::HashMap;

/// Tokens dropped before counting vocabulary hits
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "we", "our", "you", "your", "he", "him", "his", "she", "her", "it", "its",
    "they", "them", "their", "what", "which", "who", "this", "that", "these", "those", "am", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "a",
    "an", "the", "and", "but", "if", "or", "because", "as", "of", "at", "by", "for", "with",
    "about", "into", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "then", "once", "here", "there", "all", "any", "both", "each", "few", "more", "most",
    "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too",
    "very", "can", "will", "just", "now",
];

/// Turns raw text into the fixed-shape vector the decision tree was trained on.
///
/// Output layout: one bag-of-words count per vocabulary term, in vocabulary
/// order, followed by the raw message length (in characters) as the final
/// structural feature. The output length is always `vocabulary.len() + 1`.
pub struct FeatureExtractor {
    index: HashMap<String, usize>,
    vocab_len: usize,
    token_re: Regex,
}

impl FeatureExtractor {
    /// Build an extractor over the model's vocabulary.
    pub fn new(vocabulary: &[String]) -> Result<Self> {
        let token_re = Regex::new(r"[a-z0-9']+")
            .map_err(|e| Error::model(format!("failed to compile tokenizer pattern: {e}")))?;

        let index = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.to_lowercase(), i))
            .collect();

        Ok(Self {
            index,
            vocab_len: vocabulary.len(),
            token_re,
        })
    }

    /// Number of features produced per message.
    pub fn feature_len(&self) -> usize {
        self.vocab_len + 1
    }

    /// Extract features from a raw message.
    ///
    /// Lowercases, strips punctuation, drops stopwords, counts vocabulary
    /// terms, and appends the message length. The original text is never
    /// modified; callers echo it back untouched.
    pub fn prepare(&self, text: &str) -> Vec<f32> {
        let mut features = vec![0.0f32; self.feature_len()];

        let lowered = text.to_lowercase();
        for token in self.token_re.find_iter(&lowered) {
            let token = token.as_str();
            if STOPWORDS.contains(&token) {
                continue;
            }
            if let Some(&slot) = self.index.get(token) {
                features[slot] += 1.0;
            }
        }

        features[self.vocab_len] = text.chars().count() as f32;
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FeatureExtractor {
        let vocabulary = vec!["free".to_string(), "prize".to_string(), "win".to_string()];
        FeatureExtractor::new(&vocabulary).unwrap()
    }

    #[test]
    fn test_output_shape_is_fixed() {
        let ex = extractor();
        assert_eq!(ex.prepare("").len(), 4);
        assert_eq!(ex.prepare("some long message with many words").len(), 4);
        assert_eq!(ex.feature_len(), 4);
    }

    #[test]
    fn test_counts_vocabulary_terms() {
        let ex = extractor();
        let features = ex.prepare("WIN a FREE free prize");

        assert_eq!(features[0], 2.0); // free
        assert_eq!(features[1], 1.0); // prize
        assert_eq!(features[2], 1.0); // win
    }

    #[test]
    fn test_punctuation_is_stripped() {
        let ex = extractor();
        let features = ex.prepare("Free!!! Prize... (win)");

        assert_eq!(features[0], 1.0);
        assert_eq!(features[1], 1.0);
        assert_eq!(features[2], 1.0);
    }

    #[test]
    fn test_length_feature_uses_raw_text() {
        let ex = extractor();
        let features = ex.prepare("free prize");
        assert_eq!(features[3], 10.0);

        let features = ex.prepare("");
        assert_eq!(features[3], 0.0);
    }

    #[test]
    fn test_stopwords_do_not_count() {
        let vocabulary = vec!["the".to_string(), "free".to_string()];
        let ex = FeatureExtractor::new(&vocabulary).unwrap();

        let features = ex.prepare("the the the free");
        assert_eq!(features[0], 0.0); // "the" is a stopword even when in vocabulary
        assert_eq!(features[1], 1.0);
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        let ex = extractor();
        let features = ex.prepare("hello world");

        assert_eq!(&features[..3], &[0.0, 0.0, 0.0]);
    }
}
