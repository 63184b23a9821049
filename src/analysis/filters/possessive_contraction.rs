use regex::Regex;

use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

/// Strips a trailing possessive ('s) using the common unicode apostrophe
/// variants, since possessives contribute no search value of their own.
pub struct PossessiveContractionFilter {
    pattern: Regex,
}

impl PossessiveContractionFilter {
    pub fn new() -> Self {
        PossessiveContractionFilter {
            pattern: Regex::new("[\u{0027}\u{2019}\u{02BC}\u{02BB}\u{055A}\u{A78B}\u{A78C}\u{FF07}]s$")
                .expect("possessive contraction pattern is valid"),
        }
    }
}

impl Default for PossessiveContractionFilter {
    fn default() -> Self {
        PossessiveContractionFilter::new()
    }
}

impl TokenFilter for PossessiveContractionFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .map(|mut token| {
                token.value = self.pattern.replace(&token.value, "").into_owned();
                token
            })
            .collect()
    }

    fn name(&self) -> &str {
        "possessive_contraction"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_possessive_suffix() {
        let tokens = vec![Token::new("dog's", 0, (0, 5))];
        let out = PossessiveContractionFilter::new().filter(tokens);
        assert_eq!(out[0].value, "dog");
    }

    #[test]
    fn leaves_non_possessive_alone() {
        let tokens = vec![Token::new("can't", 0, (0, 5))];
        let out = PossessiveContractionFilter::new().filter(tokens);
        assert_eq!(out[0].value, "can't");
    }
}
