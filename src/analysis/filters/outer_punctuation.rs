use regex::Regex;

use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

/// Strips leading and trailing punctuation from tokens, except for
/// characters the caller explicitly chooses to keep (e.g. a leading `#` for
/// hashtags, or a trailing `.` for abbreviations).
pub struct OuterPunctuationFilter {
    pattern: Regex,
}

impl OuterPunctuationFilter {
    pub fn new(leading_allow: &[char], trailing_allow: &[char]) -> Self {
        let leading_pattern = if leading_allow.is_empty() {
            String::new()
        } else {
            format!("[{}]*", regex::escape(&leading_allow.iter().collect::<String>()))
        };
        let trailing_pattern = if trailing_allow.is_empty() {
            String::new()
        } else {
            format!("[{}]*", regex::escape(&trailing_allow.iter().collect::<String>()))
        };

        let pattern = if trailing_allow.is_empty() {
            format!(r"{}[^\W_]+(?:$|.*[^\W_])", leading_pattern)
        } else {
            format!(r"{}[^\W_]+(?:$|.*[^\W_]{}|{})", leading_pattern, trailing_pattern, trailing_pattern)
        };

        OuterPunctuationFilter { pattern: Regex::new(&pattern).expect("outer punctuation pattern is valid") }
    }
}

impl Default for OuterPunctuationFilter {
    fn default() -> Self {
        OuterPunctuationFilter::new(&[], &[])
    }
}

impl TokenFilter for OuterPunctuationFilter {
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
        "outer_punctuation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_surrounding_punctuation() {
        let tokens = vec![Token::new("(hello)", 0, (0, 7))];
        let out = OuterPunctuationFilter::default().filter(tokens);
        assert_eq!(out[0].value, "hello");
    }

    #[test]
    fn keeps_allowed_leading_character() {
        let tokens = vec![Token::new("#rust!", 0, (0, 6))];
        let out = OuterPunctuationFilter::new(&['#'], &[]).filter(tokens);
        assert_eq!(out[0].value, "#rust");
    }
}
