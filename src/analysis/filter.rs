use crate::analysis::token::Token;

/// A stage in an analyzer pipeline. Filters may rewrite, mark, merge, or
/// split tokens, but (besides `SearchFilter`-family filters used outside
/// indexing) should not change how many frames a token stream spans.
pub trait TokenFilter: Send + Sync {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token>;

    fn name(&self) -> &str;
}
