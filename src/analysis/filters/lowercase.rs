use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

pub struct LowercaseFilter;

impl TokenFilter for LowercaseFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .map(|mut token| {
                token.value = token.value.to_lowercase();
                token
            })
            .collect()
    }

    fn name(&self) -> &str {
        "lowercase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_every_token() {
        let tokens = vec![Token::new("THIS", 0, (0, 4)), Token::new("TEST", 1, (5, 9))];
        let out = LowercaseFilter.filter(tokens);
        let values: Vec<&str> = out.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["this", "test"]);
    }
}
