use std::path::Path;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::reader::IndexReader;
use crate::schema::Schema;
use crate::storage::layout::StorageLayout;
use crate::storage::sqlite_store::SqliteStore;
use crate::writer::IndexWriter;

/// The entry point for a storage location. Holds no connection of its own:
/// every [`Index::writer`]/[`Index::reader`] call opens a fresh handle and
/// re-reads `schema.json` from disk, so a field added and committed by one
/// writer is visible to the next reader or writer opened from this same
/// handle — there is no stale in-memory schema to go out of sync with a
/// prior commit. Dropping every writer and reader (and the `Index` itself)
/// releases everything the location holds.
pub struct Index {
    layout: StorageLayout,
    config: Config,
}

impl Index {
    /// Lay out a new storage location with the given schema, failing if one
    /// already exists there.
    pub fn create(path: impl AsRef<Path>, config: Config, schema: Schema) -> Result<Self> {
        let layout = StorageLayout::create(path.as_ref())?;
        let store = SqliteStore::create(&layout.db_path)?;
        for field in schema.iter() {
            store.insert_field(&field.name, field.kind, field.indexed, field.stored, field.analyzer.as_deref())?;
        }
        std::fs::write(&layout.schema_path, serde_json::to_string_pretty(&schema)?)?;
        Ok(Index { layout, config })
    }

    /// Open an existing storage location. The schema itself is read fresh
    /// from `schema.json` by every subsequent [`Index::reader`]/[`Index::writer`]
    /// call, not cached here.
    pub fn open(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let layout = StorageLayout::open(path.as_ref())?;
        Ok(Index { layout, config })
    }

    /// The schema as last committed, read fresh from disk.
    pub fn schema(&self) -> Result<Schema> {
        self.read_schema()
    }

    fn read_schema(&self) -> Result<Schema> {
        let schema_json = std::fs::read_to_string(&self.layout.schema_path)?;
        Ok(serde_json::from_str(&schema_json)?)
    }

    /// Open the single writer for this location. Blocks (or times out, per
    /// `config.writer_lock_timeout`) if another writer already holds the
    /// lock.
    pub fn writer(&self) -> Result<IndexWriter> {
        let schema = self.read_schema()?;
        IndexWriter::open(self.layout.clone(), self.config.clone(), schema)
    }

    /// Open a read snapshot. Readers never contend with the writer or with
    /// each other.
    pub fn reader(&self) -> Result<IndexReader> {
        let schema = self.read_schema()?;
        IndexReader::open(&self.layout, schema)
    }
}
