use crate::analysis::token::Token;

fn starts_uppercase(value: &str) -> bool {
    value.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

/// Produces candidate bi-grams from a token stream without consulting a
/// known-bigram list: each output group is either a single token (a name,
/// a stopword, or a token with no eligible neighbour) or an adjacent pair,
/// for callers that want to mine bi-gram candidates rather than index them.
pub struct PotentialBiGramFilter;

impl PotentialBiGramFilter {
    pub fn candidates(&self, tokens: Vec<Token>) -> Vec<Vec<Token>> {
        let mut result = Vec::new();
        let mut prev: Option<Token> = None;

        for t in tokens {
            if starts_uppercase(&t.value) || t.stopped {
                if let Some(p) = prev.take() {
                    result.push(vec![p]);
                }
                result.push(vec![t]);
                continue;
            }

            if let Some(p) = prev.take() {
                result.push(vec![p, t.clone()]);
            }
            prev = Some(t);
        }
        if let Some(p) = prev {
            result.push(vec![p]);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_adjacent_lowercase_tokens() {
        let tokens = vec![Token::new("red", 0, (0, 3)), Token::new("car", 1, (4, 7))];
        let groups = PotentialBiGramFilter.candidates(tokens);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn isolates_names_and_stopwords() {
        let mut stopped = Token::new("the", 0, (0, 3));
        stopped.stopped = true;
        let tokens = vec![stopped, Token::new("Dog", 1, (4, 7))];
        let groups = PotentialBiGramFilter.candidates(tokens);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 1);
        assert_eq!(groups[1].len(), 1);
    }
}
