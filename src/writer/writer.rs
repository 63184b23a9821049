use std::sync::Arc;

use crate::analysis::AnalyzerRegistry;
use crate::analysis::frame::FrameBuilder;
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::types::{DocId, Document, FieldValue};
use crate::schema::{Field, FieldKind, Schema};
use crate::staging::StagingWorkspace;
use crate::storage::file_lock::WriterLock;
use crate::storage::layout::StorageLayout;
use crate::storage::sqlite_store::{RevisionRow, SqliteStore};
use crate::writer::flush;

/// The single writer for one storage location. Holds the writer lock for
/// its entire lifetime: opening a second `IndexWriter` against the same
/// location blocks (or times out) until this one is dropped or `close`d.
pub struct IndexWriter {
    layout: StorageLayout,
    config: Config,
    lock: WriterLock,
    store: SqliteStore,
    schema: Schema,
    analyzers: Arc<AnalyzerRegistry>,
    frame_builder: FrameBuilder,
    staging: StagingWorkspace,
}

impl IndexWriter {
    pub fn open(layout: StorageLayout, config: Config, schema: Schema) -> Result<Self> {
        let mut lock = WriterLock::new(&layout.lock_path);
        lock.acquire(config.writer_lock_timeout)?;

        let store = match SqliteStore::open_writable(&layout.db_path) {
            Ok(store) => store,
            Err(err) => {
                let _ = lock.release();
                return Err(err);
            }
        };

        // Seed the staging workspace's document/frame id counters from the
        // store's lifetime totals (not `max(id)`, which shrinks when the
        // highest-numbered row is deleted and would reissue a retired id),
        // so every id `add_document` hands back is already the index's
        // final, global id for that document.
        let latest = match store.latest_revision() {
            Ok(latest) => latest.unwrap_or(RevisionRow { revision_number: 0, added_documents: 0, deleted_documents: 0, added_frames: 0 }),
            Err(err) => {
                let _ = lock.release();
                return Err(err);
            }
        };

        tracing::info!(path = %layout.base_dir().display(), "opened index writer");

        Ok(IndexWriter {
            frame_builder: FrameBuilder::new(config.frame_size),
            layout,
            config,
            lock,
            store,
            schema,
            analyzers: Arc::new(AnalyzerRegistry::new()),
            staging: StagingWorkspace::new(latest.added_documents, latest.added_frames),
        })
    }

    pub fn analyzers(&self) -> &AnalyzerRegistry {
        &self.analyzers
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Stage a new document: structured fields go straight to
    /// `document_data` (the substrate structured predicates resolve
    /// against), and every `Text` field is split into frames, analyzed, and
    /// staged as postings.
    pub fn add_document(&mut self, document: Document) -> Result<DocId> {
        let doc_id = self.staging.allocate_document_id();

        // Only fields declared `stored` are retrievable via `get_document`;
        // the blob is a projection of `document`, not the whole thing.
        let mut retrievable = Document::new();

        for (field_name, value) in &document.fields {
            let field = self
                .schema
                .field(field_name)
                .ok_or_else(|| Error::ContainerMissing(format!("field '{}' is not declared", field_name)))?;

            if field.stored {
                retrievable.fields.insert(field_name.clone(), value.clone());
            }

            if !field.indexed {
                continue;
            }

            if field.kind == FieldKind::Text {
                let FieldValue::Text(text) = value else {
                    return Err(Error::InvalidFieldConfig(format!("field '{}' is declared Text", field_name)));
                };
                let analyzer_name = field.analyzer.as_deref().unwrap_or("standard");
                let normalized = text.replace('\n', &format!("\n{}", crate::analysis::tokenizer::FRAME_BOUNDARY));
                for (sequence, frame_text) in self.frame_builder.build(&normalized).into_iter().enumerate() {
                    let tokens = self.analyzers.analyze(analyzer_name, &frame_text)?;
                    let frame_id = self.staging.stage_frame(doc_id, field_name.clone(), sequence as u32, frame_text);
                    for token in tokens {
                        if token.frame_boundary || token.stopped {
                            continue;
                        }
                        self.staging.stage_posting(frame_id, token.value, token.position);
                    }
                }
            } else {
                // Structured fields are indexed whole, via `document_data`
                // (the structured predicate index), regardless of `stored`
                // — `stored` only governs whether `get_document` can read
                // the value back from the document's own JSON blob.
                self.staging.stage_document_data(doc_id, field_name.clone(), value.clone());
            }
        }

        let stored = serde_json::to_string(&retrievable)?;
        self.staging.stage_document(doc_id, stored);

        Ok(doc_id)
    }

    pub fn delete_document(&mut self, doc_id: DocId) {
        self.staging.delete_document(doc_id);
    }

    /// Attach a plugin-produced annotation to an already-committed frame.
    /// Unlike structured document fields, attributes are not resolved from
    /// `document_data`; they exist purely so plugins (sentiment, extracted
    /// handles, ...) can record per-frame derived data after analyzing a
    /// snapshot, without re-running analysis on the frame's source text.
    pub fn set_frame_attribute(&mut self, frame_id: crate::core::types::FrameId, attribute_type: impl Into<String>, value: FieldValue) {
        self.staging.stage_attribute(frame_id.value(), attribute_type, value);
    }

    /// Run an explicit case-folding pass over the persisted vocabulary,
    /// merging case variants of the same spelling that differ in frequency
    /// by less than `threshold` (the minority variant's postings are
    /// folded into the majority one's term id). Runs in its own
    /// transaction, independent of any currently staged changes.
    pub fn fold_case(&mut self, threshold: f32) -> Result<usize> {
        let tx = self.store.conn_mut().transaction()?;
        let folded = crate::writer::fold::fold_case(&tx, threshold)?;
        tx.commit()?;
        Ok(folded)
    }

    /// Register an analyzer under a name a field's `analyzer` setting can
    /// reference, alongside the built-in `standard` and `everything`.
    pub fn register_analyzer(&self, name: &str, analyzer: crate::analysis::Analyzer) {
        self.analyzers.register(name, analyzer);
    }

    pub fn add_field(&mut self, field: Field) -> Result<()> {
        if self.schema.contains(&field.name) {
            return Err(Error::DuplicateField(field.name));
        }
        self.staging.add_field(field);
        Ok(())
    }

    pub fn set_plugin_state(&mut self, plugin_type: impl Into<String>, settings: impl Into<String>, state: Vec<(String, String)>) {
        self.staging.set_plugin_state(plugin_type, settings, state);
    }

    pub fn delete_plugin_state(&mut self, plugin_type: impl Into<String>, settings: Option<String>) {
        self.staging.delete_plugin_state(plugin_type, settings);
    }

    pub fn set_setting(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.staging.set_setting(name, value);
    }

    /// Apply every staged change in one transaction and persist the
    /// updated schema alongside it. Returns the new revision on success;
    /// on any error the store is left untouched and staged changes remain
    /// staged for the caller to retry or `rollback`.
    pub fn commit(&mut self) -> Result<RevisionRow> {
        if self.staging.is_empty() {
            return Ok(self.store.latest_revision()?.unwrap_or(RevisionRow {
                revision_number: 0,
                added_documents: 0,
                deleted_documents: 0,
                added_frames: 0,
            }));
        }

        let tx = self.store.conn_mut().transaction()?;
        let revision = flush::flush(&tx, &self.staging, &mut self.schema)?;
        tx.commit()?;

        if self.config.acid {
            self.store.conn().execute_batch("pragma wal_checkpoint(truncate);")?;
        }

        std::fs::write(&self.layout.schema_path, serde_json::to_string_pretty(&self.schema)?)?;

        tracing::info!(revision = revision.revision_number, "committed index writer");
        // Re-seed from the revision just recorded, not a bare rollback: the
        // lifetime totals moved, so the next document/frame staged must
        // start counting from the new totals, not the ones this writer
        // opened with.
        self.staging = StagingWorkspace::new(revision.added_documents, revision.added_frames);
        Ok(revision)
    }

    pub fn rollback(&mut self) {
        self.staging.rollback();
    }

    pub fn close(mut self) -> Result<()> {
        self.lock.release()
    }
}
