use regex::Regex;

use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;
use crate::core::error::{Error, Result};

/// Rewrites token text with a regex substitution, e.g. to strip hyphens.
pub struct SubstitutionFilter {
    pattern: Regex,
    replacement: String,
}

impl SubstitutionFilter {
    /// An invalid `pattern` is a construction-time configuration error, not
    /// a runtime analysis failure — analysis itself never fails.
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| Error::InvalidFieldConfig(format!("invalid substitution pattern '{}': {}", pattern, e)))?;
        Ok(SubstitutionFilter { pattern, replacement: replacement.into() })
    }
}

impl TokenFilter for SubstitutionFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .filter_map(|mut token| {
                token.value = self.pattern.replace_all(&token.value, self.replacement.as_str()).into_owned();
                if token.value.is_empty() && !token.frame_boundary {
                    None
                } else {
                    Some(token)
                }
            })
            .collect()
    }

    fn name(&self) -> &str {
        "substitution"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_matched_text() {
        let tokens = vec![Token::new("co-operate", 0, (0, 10))];
        let out = SubstitutionFilter::new("-", "").unwrap().filter(tokens);
        assert_eq!(out[0].value, "cooperate");
    }

    #[test]
    fn invalid_pattern_is_a_configuration_error() {
        let err = SubstitutionFilter::new("(", "").unwrap_err();
        assert!(matches!(err, crate::core::error::Error::InvalidFieldConfig(_)));
    }
}
