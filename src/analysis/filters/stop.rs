use std::collections::HashSet;

use crate::analysis::filter::TokenFilter;
use crate::analysis::stopwords::ENGLISH_STOPWORDS;
use crate::analysis::token::Token;

/// Marks common words as stopped rather than removing them, so position
/// numbering stays stable across the rest of the pipeline. Callers that
/// build the vocabulary and posting lists still see every token; search
/// ranking skips stopped terms.
pub struct StopFilter {
    stoplist: HashSet<String>,
    min_size: usize,
}

impl StopFilter {
    pub fn new(stoplist: impl IntoIterator<Item = String>, min_size: usize) -> Self {
        StopFilter { stoplist: stoplist.into_iter().collect(), min_size }
    }

    pub fn english() -> Self {
        StopFilter::new(ENGLISH_STOPWORDS.iter().map(|s| s.to_string()), 3)
    }
}

impl TokenFilter for StopFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .map(|mut token| {
                if token.value.chars().count() < self.min_size
                    || self.stoplist.contains(&token.value.to_lowercase())
                {
                    token.stopped = true;
                }
                token
            })
            .collect()
    }

    fn name(&self) -> &str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_stopwords_without_removing_them() {
        let tokens = vec![Token::new("this", 0, (0, 4)), Token::new("test", 1, (5, 9))];
        let out = StopFilter::english().filter(tokens);
        assert_eq!(out.len(), 2);
        assert!(out[0].stopped);
        assert!(!out[1].stopped);
    }

    #[test]
    fn marks_short_tokens_stopped() {
        let tokens = vec![Token::new("ox", 0, (0, 2))];
        let out = StopFilter::english().filter(tokens);
        assert!(out[0].stopped);
    }
}
