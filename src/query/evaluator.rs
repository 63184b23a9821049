use regex::Regex;
use rusqlite::params;

use crate::core::error::{Error, Result};
use crate::query::ast::Expr;
use crate::schema::{FieldKind, Operator, Schema};
use crate::search::result_set::{boost, exclude, match_all, match_any, ResultSet};
use crate::search::scoring::TfIdfScorer;
use crate::storage::sqlite_store::SqliteStore;

/// Evaluate a parsed query against a store and schema, producing a
/// frame-granularity result set. Term and wildcard leaves carry TF·IDF
/// contributions; predicate leaves carry `0.0` (a structured match, not a
/// relevance signal); internal nodes compose leaves via the result-set
/// algebra.
pub fn evaluate(expr: &Expr, store: &SqliteStore, schema: &Schema) -> Result<ResultSet> {
    match expr {
        Expr::All => all_frames(store),
        Expr::Term(term) => term_leaf(store, term),
        Expr::Predicate { field, op, value } => predicate_leaf(store, schema, field, *op, value),
        Expr::And(a, b) => Ok(match_all(&[evaluate(a, store, schema)?, evaluate(b, store, schema)?])),
        Expr::Or(a, b) => Ok(match_any(&[evaluate(a, store, schema)?, evaluate(b, store, schema)?])),
        Expr::Not(a, b) => Ok(exclude(evaluate(a, store, schema)?, &[evaluate(b, store, schema)?])),
        Expr::Weight(a, weight) => Ok(boost(evaluate(a, store, schema)?, *weight)),
    }
}

fn all_frames(store: &SqliteStore) -> Result<ResultSet> {
    let mut out = ResultSet::new();
    let mut stmt = store.conn().prepare("select id from frame")?;
    let rows = stmt.query_map([], |r| r.get::<_, i64>(0))?;
    for row in rows {
        out.insert(row?, vec![0.0]);
    }
    Ok(out)
}

fn is_wildcard(s: &str) -> bool {
    s.contains('?') || s.contains('*')
}

fn compile_wildcard(pattern: &str) -> Result<Regex> {
    let mut re = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            _ => re.push_str(&regex::escape(&c.to_string())),
        }
    }
    re.push('$');
    Regex::new(&re).map_err(|e| Error::QuerySyntax(format!("invalid wildcard pattern '{}': {}", pattern, e)))
}

fn term_leaf(store: &SqliteStore, raw: &str) -> Result<ResultSet> {
    if raw == "*" {
        return all_frames(store);
    }
    if is_wildcard(raw) {
        return wildcard_term_leaf(store, raw);
    }
    let mut out = ResultSet::new();
    let Some(term_id) = store.term_id(raw)? else { return Ok(out) };
    let scorer = TfIdfScorer::new(store);
    let mut stmt = store.conn().prepare(
        "select tp.frame_id, tp.frequency, f.field_id from term_posting tp
         join frame f on f.id = tp.frame_id where tp.term_id = ?1",
    )?;
    let rows = stmt.query_map(params![term_id.value()], |r| {
        Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?, r.get::<_, i64>(2)?))
    })?;
    for row in rows {
        let (frame_id, freq, field_id) = row?;
        let contribution = scorer.contribution(term_id.value(), field_id, freq as f64, 1.0)?;
        out.insert(frame_id, vec![contribution]);
    }
    Ok(out)
}

fn wildcard_term_leaf(store: &SqliteStore, pattern: &str) -> Result<ResultSet> {
    let regex = compile_wildcard(pattern)?;
    let matched_term_ids: Vec<i64> = {
        let mut stmt = store.conn().prepare("select id, term from vocabulary")?;
        let rows = stmt.query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)))?;
        let mut ids = Vec::new();
        for row in rows {
            let (id, term) = row?;
            if regex.is_match(&term) {
                ids.push(id);
            }
        }
        ids
    };

    let scorer = TfIdfScorer::new(store);
    let mut out: std::collections::HashMap<i64, f64> = std::collections::HashMap::new();
    for term_id in matched_term_ids {
        let mut stmt = store.conn().prepare(
            "select tp.frame_id, tp.frequency, f.field_id from term_posting tp
             join frame f on f.id = tp.frame_id where tp.term_id = ?1",
        )?;
        let rows = stmt.query_map(params![term_id], |r| {
            Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?, r.get::<_, i64>(2)?))
        })?;
        for row in rows {
            let (frame_id, freq, field_id) = row?;
            let contribution = scorer.contribution(term_id, field_id, freq as f64, 1.0)?;
            *out.entry(frame_id).or_insert(0.0) += contribution;
        }
    }
    Ok(out.into_iter().map(|(k, v)| (k, vec![v])).collect())
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::QuerySemantics(format!("'{}' is not a boolean value", raw))),
    }
}

fn predicate_leaf(store: &SqliteStore, schema: &Schema, field_name: &str, op: Operator, raw_value: &str) -> Result<ResultSet> {
    let field = schema
        .field(field_name)
        .ok_or_else(|| Error::QuerySemantics(format!("unknown field '{}'", field_name)))?;
    if !field.indexed {
        return Err(Error::QuerySemantics(format!("field '{}' is not indexed", field_name)));
    }

    let has_wildcard = is_wildcard(raw_value);
    if has_wildcard && op != Operator::Eq {
        return Err(Error::QuerySemantics("wildcard patterns are only permitted with '='".to_string()));
    }
    let effective_op = if has_wildcard { Operator::WildcardEq } else { op };
    if !field.kind.supports(effective_op) {
        return Err(Error::QuerySemantics(format!(
            "field '{}' ({:?}) does not support operator {:?}",
            field_name, field.kind, effective_op
        )));
    }

    let field_id = store
        .field_id(field_name)?
        .ok_or_else(|| Error::ContainerMissing(format!("field '{}' has no persisted row", field_name)))?;

    let doc_ids = if has_wildcard {
        wildcard_predicate_doc_ids(store, field_id.value(), raw_value)?
    } else {
        match field.kind {
            FieldKind::Numeric => {
                let value: f64 = raw_value
                    .parse()
                    .map_err(|_| Error::QuerySemantics(format!("'{}' is not numeric", raw_value)))?;
                numeric_predicate_doc_ids(store, field_id.value(), op, value)?
            }
            FieldKind::Boolean => {
                let value = parse_bool(raw_value)?;
                equality_doc_ids(store, field_id.value(), rusqlite::types::Value::Integer(if value { 1 } else { 0 }))?
            }
            _ => equality_doc_ids(store, field_id.value(), rusqlite::types::Value::Text(raw_value.to_string()))?,
        }
    };

    frames_of_documents(store, &doc_ids)
}

fn numeric_predicate_doc_ids(store: &SqliteStore, field_id: i64, op: Operator, value: f64) -> Result<Vec<i64>> {
    let sql = match op {
        Operator::Eq => "select document_id from document_data where field_id = ?1 and value = ?2",
        Operator::Lt => "select document_id from document_data where field_id = ?1 and value < ?2",
        Operator::Lte => "select document_id from document_data where field_id = ?1 and value <= ?2",
        Operator::Gt => "select document_id from document_data where field_id = ?1 and value > ?2",
        Operator::Gte => "select document_id from document_data where field_id = ?1 and value >= ?2",
        Operator::WildcardEq => unreachable!("wildcard numeric predicates are rejected earlier"),
    };
    let mut stmt = store.conn().prepare(sql)?;
    let rows = stmt.query_map(params![field_id, value], |r| r.get::<_, i64>(0))?;
    rows.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

fn equality_doc_ids(store: &SqliteStore, field_id: i64, value: rusqlite::types::Value) -> Result<Vec<i64>> {
    let mut stmt = store.conn().prepare("select document_id from document_data where field_id = ?1 and value = ?2")?;
    let rows = stmt.query_map(params![field_id, value], |r| r.get::<_, i64>(0))?;
    rows.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

fn wildcard_predicate_doc_ids(store: &SqliteStore, field_id: i64, pattern: &str) -> Result<Vec<i64>> {
    let regex = compile_wildcard(pattern)?;
    let mut stmt = store.conn().prepare("select value, document_id from document_data where field_id = ?1")?;
    let rows = stmt.query_map(params![field_id], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?;
    let mut out = Vec::new();
    for row in rows {
        let (value, doc_id) = row?;
        if regex.is_match(&value) {
            out.push(doc_id);
        }
    }
    Ok(out)
}

fn frames_of_documents(store: &SqliteStore, doc_ids: &[i64]) -> Result<ResultSet> {
    let mut out = ResultSet::new();
    if doc_ids.is_empty() {
        return Ok(out);
    }
    let placeholders = doc_ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
    let sql = format!("select id from frame where document_id in ({})", placeholders);
    let mut stmt = store.conn().prepare(&sql)?;
    let params_vec: Vec<&dyn rusqlite::ToSql> = doc_ids.iter().map(|d| d as &dyn rusqlite::ToSql).collect();
    let rows = stmt.query_map(params_vec.as_slice(), |r| r.get::<_, i64>(0))?;
    for row in rows {
        out.insert(row?, vec![0.0]);
    }
    Ok(out)
}
