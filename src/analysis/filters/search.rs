use regex::Regex;

use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;
use crate::core::error::{Error, Result};

/// Replaces each token's value with the first regex match inside it,
/// dropping tokens that don't match at all.
pub struct SearchFilter {
    pattern: Regex,
}

impl SearchFilter {
    /// An invalid `pattern` is a construction-time configuration error, not
    /// a runtime analysis failure — analysis itself never fails.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| Error::InvalidFieldConfig(format!("invalid search pattern '{}': {}", pattern, e)))?;
        Ok(SearchFilter { pattern })
    }
}

impl TokenFilter for SearchFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .filter_map(|mut token| {
                if token.frame_boundary {
                    return Some(token);
                }
                let matched = self.pattern.find(&token.value)?.as_str().to_string();
                token.value = matched;
                Some(token)
            })
            .collect()
    }

    fn name(&self) -> &str {
        "search"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_matching_substring() {
        let tokens = vec![Token::new("(parenthetical)", 0, (0, 15))];
        let out = SearchFilter::new(r"[^\W_]+").unwrap().filter(tokens);
        assert_eq!(out[0].value, "parenthetical");
    }

    #[test]
    fn drops_non_matching_tokens() {
        let tokens = vec![Token::new("---", 0, (0, 3))];
        let out = SearchFilter::new(r"[^\W_]+").unwrap().filter(tokens);
        assert!(out.is_empty());
    }

    #[test]
    fn invalid_pattern_is_a_configuration_error() {
        let err = SearchFilter::new("(").unwrap_err();
        assert!(matches!(err, crate::core::error::Error::InvalidFieldConfig(_)));
    }
}
