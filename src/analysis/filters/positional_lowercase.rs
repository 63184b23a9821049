use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

fn is_title_case(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => chars.all(|c| !c.is_uppercase()),
        _ => false,
    }
}

/// Lowercases single-word tokens that look like titlecase but only because
/// they sit at a fixed position (typically sentence-initial), so that
/// "Dog" at the start of a sentence folds to the same term as "dog"
/// elsewhere, without touching genuine proper nouns mid-sentence.
pub struct PositionalLowercaseFilter {
    position: u32,
}

impl PositionalLowercaseFilter {
    pub fn new(position: u32) -> Self {
        PositionalLowercaseFilter { position }
    }
}

impl TokenFilter for PositionalLowercaseFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .map(|mut token| {
                if token.position == self.position
                    && !token.value.contains(' ')
                    && is_title_case(&token.value)
                {
                    token.value = token.value.to_lowercase();
                }
                token
            })
            .collect()
    }

    fn name(&self) -> &str {
        "positional_lowercase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_titlecase_token_at_position() {
        let tokens = vec![Token::new("Dog", 0, (0, 3)), Token::new("runs", 1, (4, 8))];
        let out = PositionalLowercaseFilter::new(0).filter(tokens);
        assert_eq!(out[0].value, "dog");
        assert_eq!(out[1].value, "runs");
    }

    #[test]
    fn leaves_other_positions_alone() {
        let tokens = vec![Token::new("A", 0, (0, 1)), Token::new("Dog", 1, (2, 5))];
        let out = PositionalLowercaseFilter::new(0).filter(tokens);
        assert_eq!(out[1].value, "Dog");
    }

    #[test]
    fn leaves_all_caps_alone() {
        let tokens = vec![Token::new("NASA", 0, (0, 4))];
        let out = PositionalLowercaseFilter::new(0).filter(tokens);
        assert_eq!(out[0].value, "NASA");
    }
}
