pub mod flush;
pub mod fold;
pub mod writer;

pub use writer::IndexWriter;
