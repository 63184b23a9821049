pub mod result_set;
pub mod scoring;

pub use result_set::{boost, exclude, match_all, match_any, score_and_rank, Aggregator, ResultSet};
pub use scoring::TfIdfScorer;
