use std::collections::HashMap;

use rusqlite::{params, OptionalExtension, Transaction};

use crate::core::error::Result;
use crate::core::types::DocId;
use crate::schema::Schema;
use crate::staging::StagingWorkspace;
use crate::storage::sqlite_store::RevisionRow;

/// Apply one writer's staged changes to the persistent store inside a
/// single transaction. Staged document and frame ids are already the
/// index's final, global ids — the writer seeded them from the lifetime
/// `added_documents`/`added_frames` totals, not `max(id)`, so no rebasing
/// happens here; flush just inserts them unchanged. Any error bubbles out
/// and the transaction rolls back via `rusqlite`'s drop-without-commit
/// behaviour, leaving the store exactly as it was before `flush` was
/// called.
///
/// Steps below are numbered to match the commit protocol this is
/// transcribed from: apply deletes (2-3), extend the schema (4), grow the
/// vocabulary (5), write new documents and their data (6-7), write new
/// frames (8), write postings in both term-major and frame-major order
/// (9), write attributes (10), merge term and field statistics (11-12),
/// write settings and plugin state (13-14), and record the new revision
/// (15).
pub fn flush(tx: &Transaction, staging: &StagingWorkspace, schema: &mut Schema) -> Result<RevisionRow> {
    // 2-3: decrements, then deletes.
    let term_stats_decrements = compute_delete_decrements(tx, &staging.deletes)?;
    let deleted_count = delete_documents(tx, &staging.deletes)?;

    // 4: schema growth.
    let mut field_ids: HashMap<String, i64> = HashMap::new();
    for field in &staging.new_fields {
        if !schema.contains(&field.name) {
            schema.add_field(field.clone())?;
        }
        tx.execute(
            "insert or ignore into field(name, kind, indexed, stored, analyzer) values (?1, ?2, ?3, ?4, ?5)",
            params![field.name, format!("{:?}", field.kind), field.indexed, field.stored, field.analyzer],
        )?;
    }
    {
        let mut stmt = tx.prepare("select id, name from field")?;
        let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(1)?, r.get::<_, i64>(0)?)))?;
        for row in rows {
            let (name, id) = row?;
            field_ids.insert(name, id);
        }
    }

    // 5: vocabulary growth, highest staged frequency first so frequently
    // used terms get the lowest (and thus most cache-friendly) term ids.
    let mut term_frequency: HashMap<String, u32> = HashMap::new();
    for ((_, term), (frequency, _)) in &staging.postings {
        *term_frequency.entry(term.clone()).or_insert(0) += frequency;
    }
    let mut terms_by_frequency: Vec<(&String, &u32)> = term_frequency.iter().collect();
    terms_by_frequency.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut term_ids: HashMap<String, i64> = HashMap::new();
    for (term, _) in terms_by_frequency {
        tx.execute("insert or ignore into vocabulary(term) values (?1)", params![term])?;
        let id: i64 = tx.query_row("select id from vocabulary where term = ?1", params![term], |r| r.get(0))?;
        term_ids.insert(term.clone(), id);
    }

    // 6-7: documents and structured field data.
    for (doc_id, stored) in &staging.documents {
        tx.execute("insert into document(id, stored) values (?1, ?2)", params![doc_id.value(), stored])?;
    }
    for (doc_id, field_name, value) in &staging.document_data {
        let field_id = *field_ids
            .get(field_name)
            .ok_or_else(|| crate::core::error::Error::ContainerMissing(format!("field '{}' not declared", field_name)))?;
        tx.execute(
            "insert into document_data(field_id, value, document_id) values (?1, ?2, ?3)",
            params![field_id, value.to_sql_value(), doc_id.value()],
        )?;
    }

    // 8: frames.
    for frame in &staging.frames {
        let field_id = *field_ids.get(&frame.field_name).ok_or_else(|| {
            crate::core::error::Error::ContainerMissing(format!("field '{}' not declared", frame.field_name))
        })?;
        tx.execute(
            "insert into frame(id, document_id, field_id, sequence, stored) values (?1, ?2, ?3, ?4, ?5)",
            params![frame.id.value(), frame.document_id.value(), field_id, frame.sequence, frame.stored],
        )?;
    }

    // 9: term and frame postings, in both sort orders.
    let mut term_stats_delta: HashMap<(i64, i64), (i64, i64, i64)> = HashMap::new();
    for ((frame_id, term), (frequency, positions)) in &staging.postings {
        let frame_id = frame_id.value();
        let term_id = *term_ids.get(term).expect("posting references a staged term");
        let positions_json = serde_json::to_string(positions)?;

        tx.execute(
            "insert into term_posting(term_id, frame_id, frequency, positions) values (?1, ?2, ?3, ?4)",
            params![term_id, frame_id, frequency, positions_json],
        )?;
        tx.execute(
            "insert into frame_posting(frame_id, term_id, frequency, positions) values (?1, ?2, ?3, ?4)",
            params![frame_id, term_id, frequency, positions_json],
        )?;

        let field_id =
            tx.query_row("select field_id from frame where id = ?1", params![frame_id], |r| r.get::<_, i64>(0))?;
        let entry = term_stats_delta.entry((term_id, field_id)).or_insert((0, 0, 0));
        entry.0 += *frequency as i64;
        entry.1 += 1;
    }
    // Count distinct documents contributing to each (term, field) pair.
    let mut term_field_docs: HashMap<(i64, i64), std::collections::HashSet<i64>> = HashMap::new();
    for (frame_id, term) in staging.postings.keys() {
        let frame_id = frame_id.value();
        let term_id = *term_ids.get(term).expect("posting references a staged term");
        let (field_id, doc_id): (i64, i64) = tx.query_row(
            "select field_id, document_id from frame where id = ?1",
            params![frame_id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?;
        term_field_docs.entry((term_id, field_id)).or_default().insert(doc_id);
    }

    // 11: merge term statistics — existing stats, minus step-2 decrements,
    // plus the positive contributions staged in this transaction.
    let mut affected_keys: std::collections::HashSet<(i64, i64)> = term_stats_delta.keys().copied().collect();
    affected_keys.extend(term_stats_decrements.keys().copied());
    for (term_id, field_id) in affected_keys {
        let (pos_freq, pos_frames, _) = term_stats_delta.get(&(term_id, field_id)).copied().unwrap_or((0, 0, 0));
        let documents_occurring_added =
            term_field_docs.get(&(term_id, field_id)).map(|s| s.len() as i64).unwrap_or(0);
        let (neg_freq, neg_frames, neg_docs) =
            term_stats_decrements.get(&(term_id, field_id)).copied().unwrap_or((0, 0, 0));

        let existing: Option<(i64, i64, i64)> = tx
            .query_row(
                "select frequency, frames_occurring, documents_occurring from term_statistics
                 where term_id = ?1 and field_id = ?2",
                params![term_id, field_id],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .optional_or_default();
        let (prev_freq, prev_frames, prev_docs) = existing.unwrap_or((0, 0, 0));
        tx.execute(
            "insert or replace into term_statistics(term_id, field_id, frequency, frames_occurring, documents_occurring)
             values (?1, ?2, ?3, ?4, ?5)",
            params![
                term_id,
                field_id,
                prev_freq - neg_freq + pos_freq,
                prev_frames - neg_frames + pos_frames,
                prev_docs - neg_docs + documents_occurring_added,
            ],
        )?;
    }

    // 10: attribute postings. Attribute frame ids already name a persisted
    // frame (a plugin reads them off a prior snapshot), so they're used as
    // given, same as everything else staged this transaction.
    for (frame_id, attribute_type, value) in &staging.attributes {
        let frame_id = *frame_id;
        let sql_value = value.to_sql_value();
        tx.execute(
            "insert or ignore into attribute(type, value) values (?1, ?2)",
            params![attribute_type, sql_value],
        )?;
        let attribute_id: i64 = tx.query_row(
            "select id from attribute where type = ?1 and value = ?2",
            params![attribute_type, sql_value],
            |r| r.get(0),
        )?;
        tx.execute(
            "insert or ignore into frame_attribute_posting(frame_id, attribute_id) values (?1, ?2)",
            params![frame_id, attribute_id],
        )?;
        tx.execute(
            "insert or ignore into attribute_frame_posting(attribute_id, frame_id) values (?1, ?2)",
            params![attribute_id, frame_id],
        )?;
    }

    // 12: field statistics.
    for field_id in field_ids.values() {
        let frame_count: i64 =
            tx.query_row("select count(*) from frame where field_id = ?1", params![field_id], |r| r.get(0))?;
        tx.execute(
            "insert or replace into field_statistics(field_id, frame_count) values (?1, ?2)",
            params![field_id, frame_count],
        )?;
    }

    // 13: settings.
    for (name, value) in &staging.settings {
        tx.execute("insert or replace into setting(name, value) values (?1, ?2)", params![name, value])?;
    }

    // 14: plugin state, deletes before sets so a set immediately following a
    // delete for the same key in one transaction wins.
    for (plugin_type, settings) in &staging.plugin_deletes {
        apply_plugin_delete(tx, plugin_type, settings.as_deref())?;
    }
    for (plugin_type, settings, state) in &staging.plugin_sets {
        apply_plugin_set(tx, plugin_type, settings, state)?;
    }

    // 15: revision record. `index_revision` holds lifetime totals, not
    // per-commit deltas, so the new row accumulates onto the previous one
    // (seeded at (0, 0, 0, 0) when the store was created) rather than
    // recording only what changed in this transaction.
    let (previous_documents, previous_deleted, previous_frames): (i64, i64, i64) = tx
        .query_row(
            "select added_documents, deleted_documents, added_frames from index_revision
             where revision_number = (select max(revision_number) from index_revision)",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?
        .unwrap_or((0, 0, 0));

    let added_documents = previous_documents + staging.documents.len() as i64;
    let deleted_documents = previous_deleted + deleted_count;
    let added_frames = previous_frames + staging.frames.len() as i64;
    let revision_number = {
        tx.execute(
            "insert into index_revision(added_documents, deleted_documents, added_frames) values (?1, ?2, ?3)",
            params![added_documents, deleted_documents, added_frames],
        )?;
        tx.last_insert_rowid()
    };

    Ok(RevisionRow { revision_number, added_documents, deleted_documents, added_frames })
}

/// Step 2: before any posting rows are deleted, tally how much each
/// `(term_id, field_id)` pair's statistics must shrink by — summed
/// frequency, distinct frames, and distinct documents — by joining the
/// soft-deleted documents' frames against `frame_posting` and `frame`.
fn compute_delete_decrements(
    tx: &Transaction,
    deletes: &std::collections::HashSet<DocId>,
) -> Result<HashMap<(i64, i64), (i64, i64, i64)>> {
    let mut decrements: HashMap<(i64, i64), (i64, i64, i64)> = HashMap::new();
    if deletes.is_empty() {
        return Ok(decrements);
    }
    for doc_id in deletes {
        let exists: bool =
            tx.query_row("select exists(select 1 from document where id = ?1)", params![doc_id.value()], |r| r.get(0))?;
        if !exists {
            continue;
        }
        let frame_rows: Vec<(i64, i64)> = {
            let mut stmt = tx.prepare("select id, field_id from frame where document_id = ?1")?;
            let rows = stmt.query_map(params![doc_id.value()], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?)))?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        };

        let mut doc_terms_per_field: std::collections::HashSet<(i64, i64)> = std::collections::HashSet::new();
        for (frame_id, field_id) in &frame_rows {
            let postings: Vec<(i64, i64)> = {
                let mut stmt = tx.prepare("select term_id, frequency from frame_posting where frame_id = ?1")?;
                let rows = stmt.query_map(params![frame_id], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?)))?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            };
            for (term_id, frequency) in postings {
                let entry = decrements.entry((term_id, *field_id)).or_insert((0, 0, 0));
                entry.0 += frequency;
                entry.1 += 1;
                doc_terms_per_field.insert((term_id, *field_id));
            }
        }
        for key in doc_terms_per_field {
            decrements.entry(key).or_insert((0, 0, 0)).2 += 1;
        }
    }
    Ok(decrements)
}

fn delete_documents(tx: &Transaction, deletes: &std::collections::HashSet<DocId>) -> Result<i64> {
    if deletes.is_empty() {
        return Ok(0);
    }
    let mut deleted = 0i64;
    for doc_id in deletes {
        let exists: bool =
            tx.query_row("select exists(select 1 from document where id = ?1)", params![doc_id.value()], |r| r.get(0))?;
        if !exists {
            continue;
        }
        deleted += 1;

        let frame_ids: Vec<i64> = {
            let mut stmt = tx.prepare("select id from frame where document_id = ?1")?;
            let rows = stmt.query_map(params![doc_id.value()], |r| r.get::<_, i64>(0))?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        };

        for frame_id in &frame_ids {
            tx.execute("delete from term_posting where frame_id = ?1", params![frame_id])?;
            tx.execute("delete from frame_posting where frame_id = ?1", params![frame_id])?;
            tx.execute(
                "delete from attribute_frame_posting where frame_id = ?1",
                params![frame_id],
            )?;
            tx.execute(
                "delete from frame_attribute_posting where frame_id = ?1",
                params![frame_id],
            )?;
        }
        tx.execute("delete from frame where document_id = ?1", params![doc_id.value()])?;
        tx.execute("delete from document_data where document_id = ?1", params![doc_id.value()])?;
        tx.execute("delete from document where id = ?1", params![doc_id.value()])?;
    }
    Ok(deleted)
}

fn apply_plugin_delete(tx: &Transaction, plugin_type: &str, settings: Option<&str>) -> Result<()> {
    match settings {
        Some(settings) => {
            tx.execute(
                "delete from plugin_data where plugin_id in (
                    select plugin_id from plugin_registry where plugin_type = ?1 and settings = ?2)",
                params![plugin_type, settings],
            )?;
            tx.execute(
                "delete from plugin_registry where plugin_type = ?1 and settings = ?2",
                params![plugin_type, settings],
            )?;
        }
        None => {
            tx.execute(
                "delete from plugin_data where plugin_id in (
                    select plugin_id from plugin_registry where plugin_type = ?1)",
                params![plugin_type],
            )?;
            tx.execute("delete from plugin_registry where plugin_type = ?1", params![plugin_type])?;
        }
    }
    Ok(())
}

fn apply_plugin_set(tx: &Transaction, plugin_type: &str, settings: &str, state: &[(String, String)]) -> Result<()> {
    let existing: Option<i64> = tx
        .query_row(
            "select plugin_id from plugin_registry where plugin_type = ?1 and settings = ?2",
            params![plugin_type, settings],
            |r| r.get(0),
        )
        .optional_or_default();
    if let Some(id) = existing {
        tx.execute("delete from plugin_data where plugin_id = ?1", params![id])?;
    } else {
        tx.execute(
            "insert into plugin_registry(plugin_type, settings) values (?1, ?2)",
            params![plugin_type, settings],
        )?;
    }
    let id: i64 = tx.query_row(
        "select plugin_id from plugin_registry where plugin_type = ?1 and settings = ?2",
        params![plugin_type, settings],
        |r| r.get(0),
    )?;
    for (key, value) in state {
        tx.execute(
            "insert or replace into plugin_data(plugin_id, key, value) values (?1, ?2, ?3)",
            params![id, key, value],
        )?;
    }
    Ok(())
}

/// Small helper so a missing row reads as `None` instead of propagating
/// `rusqlite::Error::QueryReturnedNoRows` through `?`.
trait OptionalOrDefault<T> {
    fn optional_or_default(self) -> Option<T>;
}

impl<T> OptionalOrDefault<T> for rusqlite::Result<T> {
    fn optional_or_default(self) -> Option<T> {
        self.optional().ok().flatten()
    }
}
