use std::collections::{HashMap, HashSet};

use rusqlite::types::Value as SqlValue;

use crate::core::types::{DocId, FieldValue, FrameId};
use crate::schema::Field;

/// Everything a single writer has accumulated since its last commit.
///
/// This mirrors an in-memory staging database one-for-one (one field per
/// cache table) rather than actually embedding a second SQLite connection:
/// the volume staged between commits is bounded by caller discipline, and
/// plain Rust collections avoid the overhead of a second connection for
/// data that's about to be serialized into SQL statements anyway. Document
/// and frame ids assigned here are already the index's final, global ids:
/// the writer seeds `doc_base`/`frame_base` from the store's lifetime
/// document/frame counts (not `max(id)`, which shrinks when the
/// highest-numbered row is deleted and would reissue a retired id), so
/// flush inserts staged ids unchanged instead of rebasing them.
#[derive(Default)]
pub struct StagingWorkspace {
    doc_base: i64,
    frame_base: i64,
    next_doc_id: i64,
    next_frame_id: i64,

    pub documents: Vec<(DocId, String)>,
    pub document_data: Vec<(DocId, String, FieldValue)>,
    pub frames: Vec<StagedFrame>,
    pub postings: HashMap<(FrameId, String), (u32, Vec<u32>)>,
    /// Plugin-produced frame annotations, keyed by the frame's *persistent*
    /// id (attributes are attached to already-committed frames by a plugin
    /// pass, never to a frame staged in the same transaction).
    pub attributes: Vec<(i64, String, FieldValue)>,
    seen_attributes: HashSet<(i64, String, String)>,

    pub new_fields: Vec<Field>,
    pub settings: Vec<(String, String)>,
    pub plugin_sets: Vec<(String, String, Vec<(String, String)>)>,
    pub plugin_deletes: Vec<(String, Option<String>)>,

    pub deletes: HashSet<DocId>,
}

pub struct StagedFrame {
    pub id: FrameId,
    pub document_id: DocId,
    pub field_name: String,
    pub sequence: u32,
    pub stored: String,
}

impl StagingWorkspace {
    /// Begin a session whose document and frame ids start just after
    /// `doc_base`/`frame_base` — the index's lifetime added-document and
    /// added-frame totals as of the last commit.
    pub fn new(doc_base: i64, frame_base: i64) -> Self {
        StagingWorkspace { doc_base, frame_base, next_doc_id: doc_base + 1, next_frame_id: frame_base + 1, ..Default::default() }
    }

    pub fn allocate_document_id(&mut self) -> DocId {
        let id = DocId::new(self.next_doc_id);
        self.next_doc_id += 1;
        id
    }

    pub fn allocate_frame_id(&mut self) -> FrameId {
        let id = FrameId::new(self.next_frame_id);
        self.next_frame_id += 1;
        id
    }

    pub fn stage_document(&mut self, doc_id: DocId, stored_json: String) {
        self.documents.push((doc_id, stored_json));
    }

    pub fn stage_document_data(&mut self, doc_id: DocId, field_name: impl Into<String>, value: FieldValue) {
        self.document_data.push((doc_id, field_name.into(), value));
    }

    pub fn stage_frame(
        &mut self,
        document_id: DocId,
        field_name: impl Into<String>,
        sequence: u32,
        stored: impl Into<String>,
    ) -> FrameId {
        let id = self.allocate_frame_id();
        self.frames.push(StagedFrame { id, document_id, field_name: field_name.into(), sequence, stored: stored.into() });
        id
    }

    /// Record one occurrence of `term` at `position` within `frame_id`.
    pub fn stage_posting(&mut self, frame_id: FrameId, term: impl Into<String>, position: u32) {
        let entry = self.postings.entry((frame_id, term.into())).or_insert((0, Vec::new()));
        entry.0 += 1;
        entry.1.push(position);
    }

    pub fn stage_attribute(&mut self, frame_id: i64, attribute_type: impl Into<String>, value: FieldValue) {
        let attribute_type = attribute_type.into();
        let canonical = match &value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::Date(d) => d.to_rfc3339(),
        };
        if self.seen_attributes.insert((frame_id, attribute_type.clone(), canonical)) {
            self.attributes.push((frame_id, attribute_type, value));
        }
    }

    /// Mark a persisted document for deletion. Idempotent: deleting the
    /// same id twice in one transaction has no additional effect.
    pub fn delete_document(&mut self, doc_id: DocId) {
        self.deletes.insert(doc_id);
    }

    pub fn add_field(&mut self, field: Field) {
        self.new_fields.push(field);
    }

    pub fn set_setting(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.settings.push((name.into(), value.into()));
    }

    pub fn set_plugin_state(&mut self, plugin_type: impl Into<String>, settings: impl Into<String>, state: Vec<(String, String)>) {
        self.plugin_sets.push((plugin_type.into(), settings.into(), state));
    }

    pub fn delete_plugin_state(&mut self, plugin_type: impl Into<String>, settings: Option<String>) {
        self.plugin_deletes.push((plugin_type.into(), settings));
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
            && self.frames.is_empty()
            && self.deletes.is_empty()
            && self.new_fields.is_empty()
            && self.settings.is_empty()
            && self.plugin_sets.is_empty()
            && self.plugin_deletes.is_empty()
            && self.attributes.is_empty()
    }

    /// Discard everything staged, as if the writer had just been opened.
    /// Keeps `doc_base`/`frame_base`: nothing was committed, so the lifetime
    /// totals they're derived from haven't moved.
    pub fn rollback(&mut self) {
        *self = StagingWorkspace::new(self.doc_base, self.frame_base);
    }
}

/// Rewrite a `FieldValue` into a `rusqlite` dynamic value used as an
/// `attribute.value` or `document_data.value` column entry.
pub fn sql_value(value: &FieldValue) -> SqlValue {
    value.to_sql_value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_sequential_ids() {
        let mut staging = StagingWorkspace::new(0, 0);
        let a = staging.allocate_document_id();
        let b = staging.allocate_document_id();
        assert_eq!(a.value() + 1, b.value());
    }

    #[test]
    fn accumulates_posting_frequency_and_positions() {
        let mut staging = StagingWorkspace::new(0, 0);
        let frame = staging.allocate_frame_id();
        staging.stage_posting(frame, "dog", 0);
        staging.stage_posting(frame, "dog", 3);
        let (freq, positions) = staging.postings.get(&(frame, "dog".to_string())).unwrap();
        assert_eq!(*freq, 2);
        assert_eq!(positions, &vec![0, 3]);
    }

    #[test]
    fn delete_is_idempotent() {
        let mut staging = StagingWorkspace::new(0, 0);
        staging.delete_document(DocId::new(1));
        staging.delete_document(DocId::new(1));
        assert_eq!(staging.deletes.len(), 1);
    }

    #[test]
    fn rollback_clears_everything() {
        let mut staging = StagingWorkspace::new(0, 0);
        staging.allocate_document_id();
        staging.set_setting("key", "value");
        staging.rollback();
        assert!(staging.is_empty());
        assert_eq!(staging.allocate_document_id().value(), 1);
    }

    #[test]
    fn ids_start_after_the_given_lifetime_base() {
        let mut staging = StagingWorkspace::new(3, 7);
        assert_eq!(staging.allocate_document_id().value(), 4);
        assert_eq!(staging.allocate_frame_id().value(), 8);
    }

    #[test]
    fn rollback_preserves_the_lifetime_base() {
        let mut staging = StagingWorkspace::new(3, 7);
        staging.allocate_document_id();
        staging.rollback();
        assert_eq!(staging.allocate_document_id().value(), 4);
    }
}
