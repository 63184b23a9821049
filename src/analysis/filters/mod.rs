pub mod bigram;
pub mod lowercase;
pub mod outer_punctuation;
pub mod positional_lowercase;
pub mod possessive_contraction;
pub mod potential_bigram;
pub mod search;
pub mod stop;
pub mod substitution;

pub use bigram::BiGramFilter;
pub use lowercase::LowercaseFilter;
pub use outer_punctuation::OuterPunctuationFilter;
pub use positional_lowercase::PositionalLowercaseFilter;
pub use possessive_contraction::PossessiveContractionFilter;
pub use potential_bigram::PotentialBiGramFilter;
pub use search::SearchFilter;
pub use stop::StopFilter;
pub use substitution::SubstitutionFilter;
