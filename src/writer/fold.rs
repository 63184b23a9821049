use std::collections::HashMap;

use rusqlite::{params, OptionalExtension, Transaction};

use crate::core::error::Result;

/// Merge vocabulary entries that differ only in case, provided the
/// minority variant is rare enough relative to the majority one. Run as an
/// explicit post-ingest pass rather than folded into analysis, so ordinary
/// commits leave vocabulary ids untouched and stable.
///
/// Terms are grouped by their lowercase form. Within a group, the
/// lowest-frequency variant is repeatedly compared against the current
/// highest-frequency one and folded into it whenever
/// `min(f1, f2) / max(f1, f2) < threshold`; a variant that fails the
/// threshold against every remaining variant is left alone. Returns the
/// number of terms folded away.
pub fn fold_case(tx: &Transaction, threshold: f32) -> Result<usize> {
    let mut groups: HashMap<String, Vec<i64>> = HashMap::new();
    {
        let mut stmt = tx.prepare("select id, term from vocabulary")?;
        let rows = stmt.query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)))?;
        for row in rows {
            let (id, term) = row?;
            groups.entry(term.to_lowercase()).or_default().push(id);
        }
    }

    let mut frequency: HashMap<i64, i64> = HashMap::new();
    {
        let mut stmt = tx.prepare("select term_id, coalesce(sum(frequency), 0) from term_posting group by term_id")?;
        let rows = stmt.query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?)))?;
        for row in rows {
            let (term_id, freq) = row?;
            frequency.insert(term_id, freq);
        }
    }

    let mut folded = 0usize;
    for (_, mut variants) in groups {
        if variants.len() < 2 {
            continue;
        }
        variants.sort_by_key(|id| *frequency.get(id).unwrap_or(&0));

        while variants.len() > 1 {
            let loser = variants.remove(0);
            let loser_freq = *frequency.get(&loser).unwrap_or(&0);
            let winner = *variants.last().expect("at least one variant remains");
            let winner_freq = *frequency.get(&winner).unwrap_or(&0);

            let (lo, hi) = if loser_freq <= winner_freq { (loser_freq, winner_freq) } else { (winner_freq, loser_freq) };
            if hi == 0 || (lo as f32 / hi as f32) >= threshold {
                continue;
            }

            merge_term(tx, loser, winner)?;
            frequency.insert(winner, winner_freq + loser_freq);
            folded += 1;
        }
    }

    Ok(folded)
}

/// Fold `loser`'s postings and statistics into `winner`, then remove
/// `loser` from the vocabulary. If a frame already has a posting for
/// `winner` (possible if the same frame used both spellings), frequencies
/// and positions are combined rather than overwritten.
fn merge_term(tx: &Transaction, loser: i64, winner: i64) -> Result<()> {
    let loser_postings: Vec<(i64, i64, String)> = {
        let mut stmt = tx.prepare("select frame_id, frequency, positions from term_posting where term_id = ?1")?;
        let rows = stmt.query_map(params![loser], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?;
        rows.collect::<std::result::Result<_, _>>()?
    };

    for (frame_id, frequency, positions) in loser_postings {
        let existing: Option<(i64, String)> = tx
            .query_row(
                "select frequency, positions from term_posting where term_id = ?1 and frame_id = ?2",
                params![winner, frame_id],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;

        let (merged_frequency, merged_positions) = match existing {
            Some((existing_freq, existing_positions)) => {
                let mut existing_positions: Vec<u32> = serde_json::from_str(&existing_positions)?;
                let new_positions: Vec<u32> = serde_json::from_str(&positions)?;
                existing_positions.extend(new_positions);
                (existing_freq + frequency, serde_json::to_string(&existing_positions)?)
            }
            None => (frequency, positions),
        };

        tx.execute(
            "insert or replace into term_posting(term_id, frame_id, frequency, positions) values (?1, ?2, ?3, ?4)",
            params![winner, frame_id, merged_frequency, merged_positions],
        )?;
        tx.execute(
            "insert or replace into frame_posting(frame_id, term_id, frequency, positions) values (?1, ?2, ?3, ?4)",
            params![frame_id, winner, merged_frequency, merged_positions],
        )?;
    }

    tx.execute("delete from term_posting where term_id = ?1", params![loser])?;
    tx.execute("delete from frame_posting where term_id = ?1", params![loser])?;

    let field_ids: Vec<i64> = {
        let mut stmt = tx.prepare("select distinct field_id from term_statistics where term_id in (?1, ?2)")?;
        let rows = stmt.query_map(params![winner, loser], |r| r.get::<_, i64>(0))?;
        rows.collect::<std::result::Result<_, _>>()?
    };
    for field_id in field_ids {
        let frequency: i64 = tx.query_row(
            "select coalesce(sum(tp.frequency), 0) from term_posting tp join frame f on f.id = tp.frame_id
             where tp.term_id = ?1 and f.field_id = ?2",
            params![winner, field_id],
            |r| r.get(0),
        )?;
        let frames_occurring: i64 = tx.query_row(
            "select count(*) from term_posting tp join frame f on f.id = tp.frame_id
             where tp.term_id = ?1 and f.field_id = ?2",
            params![winner, field_id],
            |r| r.get(0),
        )?;
        let documents_occurring: i64 = tx.query_row(
            "select count(distinct f.document_id) from term_posting tp join frame f on f.id = tp.frame_id
             where tp.term_id = ?1 and f.field_id = ?2",
            params![winner, field_id],
            |r| r.get(0),
        )?;
        tx.execute(
            "insert or replace into term_statistics(term_id, field_id, frequency, frames_occurring, documents_occurring)
             values (?1, ?2, ?3, ?4, ?5)",
            params![winner, field_id, frequency, frames_occurring, documents_occurring],
        )?;
        tx.execute("delete from term_statistics where term_id = ?1 and field_id = ?2", params![loser, field_id])?;
    }

    tx.execute("delete from vocabulary where id = ?1", params![loser])?;
    Ok(())
}
