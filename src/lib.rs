pub mod analysis;
pub mod core;
pub mod index;
pub mod plugin;
pub mod query;
pub mod reader;
pub mod schema;
pub mod search;
pub mod staging;
pub mod storage;
pub mod writer;

pub use core::{Config, DocId, Document, Error, FieldValue, Result};
pub use index::Index;
pub use reader::IndexReader;
pub use schema::{Field, FieldKind, Operator, Schema};
pub use writer::IndexWriter;
