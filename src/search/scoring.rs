use rusqlite::{params, OptionalExtension};

use crate::core::error::Result;
use crate::storage::sqlite_store::SqliteStore;

/// Computes TF·IDF contributions against a store's persisted statistics.
/// IDF is scoped to the field a frame belongs to: `term_statistics` and
/// `field_statistics` are both kept per-field, so a term's rarity is judged
/// relative to the field it occurs in rather than the whole index.
pub struct TfIdfScorer<'a> {
    store: &'a SqliteStore,
}

impl<'a> TfIdfScorer<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        TfIdfScorer { store }
    }

    /// `ln(total_frames_in_field / frames_in_field_containing_term)`. Zero
    /// when the term has never occurred in the field (nothing to divide by
    /// meaningfully) rather than an error, so callers can still build a
    /// result set around a term that turned out to be absent from a field.
    pub fn idf(&self, term_id: i64, field_id: i64) -> Result<f64> {
        let frames_occurring: i64 = self
            .store
            .conn()
            .query_row(
                "select frames_occurring from term_statistics where term_id = ?1 and field_id = ?2",
                params![term_id, field_id],
                |r| r.get(0),
            )
            .optional()?
            .unwrap_or(0);
        if frames_occurring == 0 {
            return Ok(0.0);
        }
        let total_frames: i64 = self
            .store
            .conn()
            .query_row("select frame_count from field_statistics where field_id = ?1", params![field_id], |r| r.get(0))
            .optional()?
            .unwrap_or(0);
        if total_frames == 0 {
            return Ok(0.0);
        }
        Ok((total_frames as f64 / frames_occurring as f64).ln())
    }

    pub fn contribution(&self, term_id: i64, field_id: i64, tf: f64, weight: f64) -> Result<f64> {
        Ok(tf * self.idf(term_id, field_id)? * weight)
    }
}
