use std::collections::HashSet;

use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

fn starts_uppercase(value: &str) -> bool {
    value.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

/// Merges adjacent tokens into a single token when their space-joined text
/// is a known bi-gram. Names and stopped tokens never participate, since
/// they're never meaningful halves of a bi-gram.
pub struct BiGramFilter {
    bigrams: HashSet<String>,
}

impl BiGramFilter {
    pub fn new(bigrams: impl IntoIterator<Item = String>) -> Self {
        BiGramFilter { bigrams: bigrams.into_iter().collect() }
    }
}

impl TokenFilter for BiGramFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        let mut result = Vec::with_capacity(tokens.len());
        let mut prev: Option<Token> = None;

        for t in tokens {
            if starts_uppercase(&t.value) || t.stopped {
                if let Some(p) = prev.take() {
                    result.push(p);
                }
                result.push(t);
                continue;
            }

            if let Some(p) = prev.take() {
                let candidate = format!("{} {}", p.value, t.value);
                if self.bigrams.contains(&candidate) {
                    let span = (p.span.0, t.span.1);
                    result.push(Token { value: candidate, position: p.position, span, stopped: false, frame_boundary: false });
                    continue;
                }
                result.push(p);
            }
            prev = Some(t);
        }
        if let Some(p) = prev {
            result.push(p);
        }
        result
    }

    fn name(&self) -> &str {
        "bigram"
    }
}
