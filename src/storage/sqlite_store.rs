use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::core::error::Result;
use crate::core::types::{AttributeId, DocId, FieldId, FrameId, PluginId, TermId};
use crate::schema::FieldKind;
use crate::storage::schema_sql::CREATE_SCHEMA;

/// One committed revision of the index. `revision_number` is monotonically
/// increasing; `added_documents`, `deleted_documents`, and `added_frames`
/// are lifetime totals as of that commit, not per-commit deltas — each is
/// monotonically non-decreasing across the index's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionRow {
    pub revision_number: i64,
    pub added_documents: i64,
    pub deleted_documents: i64,
    pub added_frames: i64,
}

/// Thin wrapper around the `rusqlite` connection to the on-disk store,
/// holding the helper queries shared by the flush protocol, the reader,
/// and plugin-state management.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn create(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch(CREATE_SCHEMA)?;
        Ok(SqliteStore { conn })
    }

    pub fn open_writable(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch("pragma journal_mode = WAL;")?;
        Ok(SqliteStore { conn })
    }

    pub fn open_readonly(db_path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(db_path, rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(SqliteStore { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn latest_revision(&self) -> Result<Option<RevisionRow>> {
        let row = self
            .conn
            .query_row(
                "select revision_number, added_documents, deleted_documents, added_frames
                 from index_revision
                 where revision_number = (select max(revision_number) from index_revision)",
                [],
                |r| {
                    Ok(RevisionRow {
                        revision_number: r.get(0)?,
                        added_documents: r.get(1)?,
                        deleted_documents: r.get(2)?,
                        added_frames: r.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn max_document_id(&self) -> Result<i64> {
        Ok(self.conn.query_row("select coalesce(max(id), 0) from document", [], |r| r.get(0))?)
    }

    pub fn max_frame_id(&self) -> Result<i64> {
        Ok(self.conn.query_row("select coalesce(max(id), 0) from frame", [], |r| r.get(0))?)
    }

    pub fn field_id(&self, name: &str) -> Result<Option<FieldId>> {
        Ok(self
            .conn
            .query_row("select id from field where name = ?1", params![name], |r| r.get::<_, i64>(0))
            .optional()?
            .map(FieldId::new))
    }

    pub fn insert_field(
        &self,
        name: &str,
        kind: FieldKind,
        indexed: bool,
        stored: bool,
        analyzer: Option<&str>,
    ) -> Result<FieldId> {
        self.conn.execute(
            "insert or ignore into field(name, kind, indexed, stored, analyzer) values (?1, ?2, ?3, ?4, ?5)",
            params![name, format!("{:?}", kind), indexed, stored, analyzer],
        )?;
        Ok(self.field_id(name)?.expect("field row exists immediately after insert"))
    }

    pub fn term_id(&self, term: &str) -> Result<Option<TermId>> {
        Ok(self
            .conn
            .query_row("select id from vocabulary where term = ?1", params![term], |r| r.get::<_, i64>(0))
            .optional()?
            .map(TermId::new))
    }

    pub fn insert_term(&self, term: &str) -> Result<TermId> {
        self.conn.execute("insert or ignore into vocabulary(term) values (?1)", params![term])?;
        Ok(self.term_id(term)?.expect("vocabulary row exists immediately after insert"))
    }

    pub fn attribute_id(&self, kind: &str, value: &rusqlite::types::Value) -> Result<Option<AttributeId>> {
        Ok(self
            .conn
            .query_row(
                "select id from attribute where type = ?1 and value = ?2",
                params![kind, value],
                |r| r.get::<_, i64>(0),
            )
            .optional()?
            .map(AttributeId::new))
    }

    pub fn insert_attribute(&self, kind: &str, value: &rusqlite::types::Value) -> Result<AttributeId> {
        self.conn.execute("insert or ignore into attribute(type, value) values (?1, ?2)", params![kind, value])?;
        Ok(self.attribute_id(kind, value)?.expect("attribute row exists immediately after insert"))
    }

    pub fn record_revision(&self, added_documents: i64, deleted_documents: i64, added_frames: i64) -> Result<i64> {
        self.conn.execute(
            "insert into index_revision(added_documents, deleted_documents, added_frames) values (?1, ?2, ?3)",
            params![added_documents, deleted_documents, added_frames],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn plugin_id(&self, plugin_type: &str, settings: &str) -> Result<Option<PluginId>> {
        Ok(self
            .conn
            .query_row(
                "select plugin_id from plugin_registry where plugin_type = ?1 and settings = ?2",
                params![plugin_type, settings],
                |r| r.get::<_, i64>(0),
            )
            .optional()?
            .map(PluginId::new))
    }

    pub fn set_plugin_state(&self, plugin_type: &str, settings: &str, state: &[(String, String)]) -> Result<PluginId> {
        if let Some(id) = self.plugin_id(plugin_type, settings)? {
            self.conn.execute("delete from plugin_data where plugin_id = ?1", params![id.value()])?;
        } else {
            self.conn.execute(
                "insert into plugin_registry(plugin_type, settings) values (?1, ?2)",
                params![plugin_type, settings],
            )?;
        }
        let id = self.plugin_id(plugin_type, settings)?.expect("plugin registry row exists after insert");
        for (key, value) in state {
            self.conn.execute(
                "insert or replace into plugin_data(plugin_id, key, value) values (?1, ?2, ?3)",
                params![id.value(), key, value],
            )?;
        }
        Ok(id)
    }

    pub fn get_plugin_state(&self, plugin_type: &str, settings: &str) -> Result<Option<Vec<(String, String)>>> {
        let Some(id) = self.plugin_id(plugin_type, settings)? else { return Ok(None) };
        let mut stmt = self.conn.prepare("select key, value from plugin_data where plugin_id = ?1")?;
        let rows = stmt.query_map(params![id.value()], |r| Ok((r.get(0)?, r.get(1)?)))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(Some(out))
    }

    pub fn delete_plugin_state(&self, plugin_type: &str, settings: Option<&str>) -> Result<()> {
        match settings {
            Some(settings) => {
                self.conn.execute(
                    "delete from plugin_data where plugin_id in (
                        select plugin_id from plugin_registry where plugin_type = ?1 and settings = ?2)",
                    params![plugin_type, settings],
                )?;
                self.conn.execute(
                    "delete from plugin_registry where plugin_type = ?1 and settings = ?2",
                    params![plugin_type, settings],
                )?;
            }
            None => {
                self.conn.execute(
                    "delete from plugin_data where plugin_id in (
                        select plugin_id from plugin_registry where plugin_type = ?1)",
                    params![plugin_type],
                )?;
                self.conn.execute("delete from plugin_registry where plugin_type = ?1", params![plugin_type])?;
            }
        }
        Ok(())
    }

    pub fn get_document_stored(&self, doc_id: DocId) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row("select stored from document where id = ?1", params![doc_id.value()], |r| r.get(0))
            .optional()?)
    }

    pub fn frame_count_for_field(&self, field_id: FieldId) -> Result<i64> {
        Ok(self.conn.query_row(
            "select count(*) from frame where field_id = ?1",
            params![field_id.value()],
            |r| r.get(0),
        )?)
    }

    pub fn next_frame_id_hint(&self) -> Result<FrameId> {
        Ok(FrameId::new(self.max_frame_id()? + 1))
    }
}
