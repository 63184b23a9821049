use rusqlite::params;

use crate::core::error::{Error, Result};
use crate::core::types::{DocId, Document};
use crate::query::ast::Expr;
use crate::query::evaluator::evaluate;
use crate::query::parser::QueryParser;
use crate::schema::Schema;
use crate::search::result_set::ResultSet;
use crate::storage::layout::StorageLayout;
use crate::storage::sqlite_store::{RevisionRow, SqliteStore};

/// A read-only handle against a storage location, opened on its own
/// connection so a writer committing concurrently never blocks or is
/// blocked by a reader (SQLite's WAL mode gives each its own snapshot).
pub struct IndexReader {
    store: SqliteStore,
    schema: Schema,
    parser: QueryParser,
}

impl IndexReader {
    pub fn open(layout: &StorageLayout, schema: Schema) -> Result<Self> {
        let store = SqliteStore::open_readonly(&layout.db_path)?;
        Ok(IndexReader { store, schema, parser: QueryParser::new() })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn revision(&self) -> Result<RevisionRow> {
        Ok(self
            .store
            .latest_revision()?
            .unwrap_or(RevisionRow { revision_number: 0, added_documents: 0, deleted_documents: 0, added_frames: 0 }))
    }

    /// Fetch a document's stored fields. Errors with `DocumentMissing` for
    /// an id that was never committed or has since been deleted — the two
    /// are indistinguishable from a reader's point of view, since a
    /// tombstoned document leaves no trace in the persistent store.
    pub fn get_document(&self, id: DocId) -> Result<Document> {
        let stored = self.store.get_document_stored(id)?.ok_or(Error::DocumentMissing(id))?;
        Ok(serde_json::from_str(&stored)?)
    }

    pub fn contains_document(&self, id: DocId) -> Result<bool> {
        Ok(self.store.get_document_stored(id)?.is_some())
    }

    /// Parse and evaluate a query string, returning a frame-granularity
    /// result set.
    pub fn query(&self, query: &str) -> Result<ResultSet> {
        let expr = self.parser.parse(query)?;
        self.query_ast(&expr)
    }

    pub fn query_ast(&self, expr: &Expr) -> Result<ResultSet> {
        evaluate(expr, &self.store, &self.schema)
    }

    /// Re-key a frame-granularity result set by owning document, keeping
    /// every matched frame's scores (under its document) rather than
    /// collapsing to one score per document, so per-frame provenance
    /// survives the regrouping.
    pub fn to_document_granularity(&self, frames: ResultSet) -> Result<ResultSet> {
        let mut out = ResultSet::new();
        for (frame_id, scores) in frames {
            let doc_id: i64 = self.store.conn().query_row(
                "select document_id from frame where id = ?1",
                params![frame_id],
                |r| r.get(0),
            )?;
            out.entry(doc_id).or_insert_with(Vec::new).extend(scores);
        }
        Ok(out)
    }

    /// The number of frames in which both terms co-occur. Derived on
    /// demand from postings rather than materialized, since the index
    /// doesn't know in advance which term pairs a caller will ask about.
    pub fn association(&self, term_a: &str, term_b: &str) -> Result<i64> {
        let Some(a) = self.store.term_id(term_a)? else { return Ok(0) };
        let Some(b) = self.store.term_id(term_b)? else { return Ok(0) };
        Ok(self.store.conn().query_row(
            "select count(*) from term_posting tp1 join term_posting tp2 on tp1.frame_id = tp2.frame_id
             where tp1.term_id = ?1 and tp2.term_id = ?2",
            params![a.value(), b.value()],
            |r| r.get(0),
        )?)
    }

    pub fn term_frequency(&self, term: &str) -> Result<i64> {
        let Some(term_id) = self.store.term_id(term)? else { return Ok(0) };
        Ok(self.store.conn().query_row(
            "select coalesce(sum(frequency), 0) from term_posting where term_id = ?1",
            params![term_id.value()],
            |r| r.get(0),
        )?)
    }

    pub fn vocabulary_size(&self) -> Result<i64> {
        Ok(self.store.conn().query_row("select count(*) from vocabulary", [], |r| r.get(0))?)
    }

    pub fn get_plugin_state(&self, plugin_type: &str, settings: &str) -> Result<Vec<(String, String)>> {
        self.store
            .get_plugin_state(plugin_type, settings)?
            .ok_or_else(|| Error::PluginMissing { plugin_type: plugin_type.to_string(), settings: settings.to_string() })
    }
}
