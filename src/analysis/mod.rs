pub mod analyzer;
pub mod filter;
pub mod filters;
pub mod frame;
pub mod stopwords;
pub mod token;
pub mod tokenizer;

pub use analyzer::{Analyzer, AnalyzerRegistry};
pub use frame::{EnglishSentenceSplitter, FrameBuilder, SentenceSplitter};
pub use token::Token;
pub use tokenizer::{EverythingTokenizer, Tokenizer, WordTokenizer};
