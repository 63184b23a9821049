use std::collections::BTreeMap;

/// A result set is data, not an object: a map from frame id (or document id,
/// once a caller re-keys one via [`crate::reader::IndexReader::to_document_granularity`])
/// to the list of scores contributed by whatever produced it. Primitive
/// leaves (a term, a wildcard, a predicate) emit a singleton list per key;
/// composing two result sets concatenates or extends those lists so a
/// caller can always see which clause contributed what.
pub type ResultSet = BTreeMap<i64, Vec<f64>>;

/// Intersection: a key survives only if every input set has it. Its value
/// list is the concatenation of every input's value list for that key, in
/// input order.
pub fn match_all(sets: &[ResultSet]) -> ResultSet {
    if sets.is_empty() {
        return ResultSet::new();
    }
    let mut keys: Vec<i64> = sets[0].keys().copied().collect();
    for set in &sets[1..] {
        keys.retain(|k| set.contains_key(k));
    }
    let mut out = ResultSet::new();
    for key in keys {
        let mut values = Vec::new();
        for set in sets {
            values.extend(set[&key].iter().copied());
        }
        out.insert(key, values);
    }
    out
}

/// Union: a key survives if any input set has it. Each input contributes
/// its value list where present, or a single `0.0` placeholder where
/// absent, so the merged list always has one entry per input clause (per
/// input set, not per input set's own entry count) at the outermost level.
pub fn match_any(sets: &[ResultSet]) -> ResultSet {
    let mut keys: std::collections::BTreeSet<i64> = std::collections::BTreeSet::new();
    for set in sets {
        keys.extend(set.keys().copied());
    }
    let mut out = ResultSet::new();
    for key in keys {
        let mut values = Vec::new();
        for set in sets {
            match set.get(&key) {
                Some(v) => values.extend(v.iter().copied()),
                None => values.push(0.0),
            }
        }
        out.insert(key, values);
    }
    out
}

/// Keep only the keys of `base` that appear in none of `excludes`.
pub fn exclude(base: ResultSet, excludes: &[ResultSet]) -> ResultSet {
    base.into_iter().filter(|(key, _)| !excludes.iter().any(|e| e.contains_key(key))).collect()
}

/// Multiply every score of every key by `factor`.
pub fn boost(mut set: ResultSet, factor: f64) -> ResultSet {
    for values in set.values_mut() {
        for v in values.iter_mut() {
            *v *= factor;
        }
    }
    set
}

/// How a key's score list collapses to a single rankable number.
#[derive(Clone)]
pub enum Aggregator {
    Sum,
    Max,
    Custom(std::sync::Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>),
}

impl Aggregator {
    fn apply(&self, values: &[f64]) -> f64 {
        match self {
            Aggregator::Sum => values.iter().sum(),
            Aggregator::Max => values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            Aggregator::Custom(f) => f(values),
        }
    }
}

/// Aggregate every key's score list to a single number, then rank
/// descending by score. Ties break on ascending key, which keeps ranking
/// deterministic (and, for keys assigned in insertion order, stable)
/// regardless of aggregator or input order.
pub fn score_and_rank(set: &ResultSet, aggregator: &Aggregator, start: usize, limit: usize) -> Vec<(i64, f64)> {
    let mut scored: Vec<(i64, f64)> = set.iter().map(|(key, values)| (*key, aggregator.apply(values))).collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0)));
    scored.into_iter().skip(start).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pairs: &[(i64, f64)]) -> ResultSet {
        pairs.iter().map(|(k, v)| (*k, vec![*v])).collect()
    }

    #[test]
    fn match_all_intersects_and_concatenates() {
        let a = set(&[(1, 1.0), (2, 2.0)]);
        let b = set(&[(2, 5.0), (3, 9.0)]);
        let merged = match_all(&[a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[&2], vec![2.0, 5.0]);
    }

    #[test]
    fn match_any_pads_absent_keys_with_zero() {
        let a = set(&[(1, 1.0)]);
        let b = set(&[(2, 5.0)]);
        let merged = match_any(&[a, b]);
        assert_eq!(merged[&1], vec![1.0, 0.0]);
        assert_eq!(merged[&2], vec![0.0, 5.0]);
    }

    #[test]
    fn exclude_removes_any_match() {
        let base = set(&[(1, 1.0), (2, 2.0), (3, 3.0)]);
        let excluded = set(&[(2, 0.0)]);
        let result = exclude(base, &[excluded]);
        assert_eq!(result.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn boost_scales_every_score() {
        let boosted = boost(set(&[(1, 2.0)]), 3.0);
        assert_eq!(boosted[&1], vec![6.0]);
    }

    #[test]
    fn score_and_rank_breaks_ties_by_ascending_key() {
        let data = set(&[(5, 1.0), (1, 1.0), (3, 1.0)]);
        let ranked = score_and_rank(&data, &Aggregator::Sum, 0, 10);
        assert_eq!(ranked.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![1, 3, 5]);
    }

    #[test]
    fn score_and_rank_orders_by_descending_score_then_windows() {
        let data = set(&[(1, 5.0), (2, 9.0), (3, 1.0)]);
        let ranked = score_and_rank(&data, &Aggregator::Sum, 1, 1);
        assert_eq!(ranked, vec![(1, 5.0)]);
    }

    #[test]
    fn set_algebra_partition_identity_holds() {
        let a = set(&[(1, 1.0), (2, 1.0), (3, 1.0)]);
        let b = set(&[(2, 1.0), (3, 1.0), (4, 1.0)]);
        let union = match_any(&[a.clone(), b.clone()]);
        let inter = match_all(&[a.clone(), b.clone()]);
        let a_minus_b = exclude(a.clone(), &[b.clone()]);
        let b_minus_a = exclude(b, &[a]);
        assert_eq!(union.len(), inter.len() + a_minus_b.len() + b_minus_a.len());
    }
}
