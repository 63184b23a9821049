mod common;

use caterpillar::search::{boost, exclude, match_all, match_any, score_and_rank, Aggregator};
use caterpillar::Error;
use common::{doc, Fixture};

fn seed_king_queen_corpus(fixture: &Fixture) {
    let mut writer = fixture.index.writer().unwrap();
    // 4 frames mention both king and queen, 56 mention only king, 63 only queen.
    for _ in 0..4 {
        writer.add_document(doc("the king and queen dined", "wellington", 10.0)).unwrap();
    }
    for _ in 0..56 {
        writer.add_document(doc("the king rode alone", "wellington", 10.0)).unwrap();
    }
    for _ in 0..63 {
        writer.add_document(doc("the queen walked alone", "wellington", 10.0)).unwrap();
    }
    writer.commit().unwrap();
}

/// Scenario 3 (set-algebra sanity), restated over a synthetic corpus with
/// the same shape: `king AND queen` = 4, `king NOT queen` = 56,
/// `king OR queen` = 123.
#[test]
fn set_algebra_over_king_and_queen() {
    let fixture = Fixture::new();
    seed_king_queen_corpus(&fixture);
    let reader = fixture.index.reader().unwrap();

    let and = reader.query("king AND queen").unwrap();
    let not = reader.query("king NOT queen").unwrap();
    let or = reader.query("king OR queen").unwrap();

    assert_eq!(and.len(), 4);
    assert_eq!(not.len(), 56);
    assert_eq!(or.len(), 123);
}

/// P4: the union/intersection/difference partition identity holds for any
/// two term result sets.
#[test]
fn union_equals_intersection_plus_both_differences() {
    let fixture = Fixture::new();
    seed_king_queen_corpus(&fixture);
    let reader = fixture.index.reader().unwrap();

    let a = reader.query("king").unwrap();
    let b = reader.query("queen").unwrap();

    let union = match_any(&[a.clone(), b.clone()]);
    let inter = match_all(&[a.clone(), b.clone()]);
    let a_minus_b = exclude(a.clone(), &[b.clone()]);
    let b_minus_a = exclude(b, &[a]);

    assert_eq!(union.len(), inter.len() + a_minus_b.len() + b_minus_a.len());
}

/// Scenario 4: wildcard equality resolves by prefix; ordering against a
/// non-numeric categorical field is a query-semantics error.
#[test]
fn wildcard_equality_and_rejected_ordering() {
    let fixture = Fixture::new();
    let mut writer = fixture.index.writer().unwrap();
    writer.add_document(doc("a", "Christchurch", 1.0)).unwrap();
    writer.add_document(doc("b", "Christchurch South", 1.0)).unwrap();
    writer.add_document(doc("c", "Auckland", 1.0)).unwrap();
    writer.commit().unwrap();

    let reader = fixture.index.reader().unwrap();
    let matched = reader.query("region = \"Christ*\"").unwrap();
    assert_eq!(matched.len(), 2 /* frames of the two christchurch* documents, one frame each */);

    let err = reader.query("region > Christchurch").unwrap_err();
    assert!(matches!(err, Error::QuerySemantics(_)));
}

/// P5: for any numeric field and threshold, `{f >= k}` and `{f < k}`
/// partition every document that has a value for `f`.
#[test]
fn numeric_threshold_partitions_documents() {
    let fixture = Fixture::new();
    let mut writer = fixture.index.writer().unwrap();
    for age in [10.0, 20.0, 30.0, 40.0, 50.0] {
        writer.add_document(doc("person", "wellington", age)).unwrap();
    }
    writer.commit().unwrap();

    let reader = fixture.index.reader().unwrap();
    let ge = reader.query("age >= 30").unwrap();
    let lt = reader.query("age < 30").unwrap();
    let ge_docs = reader.to_document_granularity(ge).unwrap();
    let lt_docs = reader.to_document_granularity(lt).unwrap();
    assert_eq!(ge_docs.len() + lt_docs.len(), 5);
}

/// P6: ranked scoring is deterministic — ties on score break on ascending
/// key, and re-scoring identical input yields identical output.
#[test]
fn score_and_rank_is_deterministic_on_ties() {
    let fixture = Fixture::new();
    let mut writer = fixture.index.writer().unwrap();
    for _ in 0..3 {
        writer.add_document(doc("whale whale whale", "wellington", 1.0)).unwrap();
    }
    writer.commit().unwrap();

    let reader = fixture.index.reader().unwrap();
    let hits = reader.query("whale").unwrap();
    let ranked_once = score_and_rank(&hits, &Aggregator::Sum, 0, 10);
    let ranked_twice = score_and_rank(&hits, &Aggregator::Sum, 0, 10);
    assert_eq!(ranked_once, ranked_twice);

    let keys: Vec<i64> = ranked_once.iter().map(|(k, _)| *k).collect();
    let mut sorted_keys = keys.clone();
    sorted_keys.sort();
    assert_eq!(keys, sorted_keys, "equal-score frames must break ties ascending by key");
}

/// `boost` scales every clause's contribution without changing which keys
/// matched.
#[test]
fn boost_preserves_keys_and_scales_scores() {
    let fixture = Fixture::new();
    let mut writer = fixture.index.writer().unwrap();
    writer.add_document(doc("whale sighting logged", "wellington", 1.0)).unwrap();
    writer.commit().unwrap();

    let reader = fixture.index.reader().unwrap();
    let base = reader.query("whale").unwrap();
    let boosted = boost(base.clone(), 2.0);
    assert_eq!(base.keys().collect::<Vec<_>>(), boosted.keys().collect::<Vec<_>>());
    for (key, values) in &base {
        for (b, v) in boosted[key].iter().zip(values) {
            assert!((b - v * 2.0).abs() < 1e-9);
        }
    }
}

/// Predicates against a non-indexed field are rejected before any scan.
#[test]
fn predicate_against_non_indexed_field_errors() {
    let fixture = Fixture::new();
    let mut schema = caterpillar::Schema::new();
    schema.add_field(caterpillar::schema::Field::identifier("external_id")).unwrap();
    schema.add_field(caterpillar::schema::Field::text("body")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let index =
        caterpillar::Index::create(dir.path().join("idx2"), caterpillar::Config::default(), schema).unwrap();
    let reader = index.reader().unwrap();
    let err = reader.query("external_id = abc123").unwrap_err();
    assert!(matches!(err, Error::QuerySemantics(_)));
    let _ = fixture;
}
