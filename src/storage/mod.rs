pub mod file_lock;
pub mod layout;
pub mod schema_sql;
pub mod sqlite_store;

pub use file_lock::WriterLock;
pub use layout::StorageLayout;
pub use sqlite_store::{RevisionRow, SqliteStore};
