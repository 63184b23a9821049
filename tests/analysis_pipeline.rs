mod common;

use common::Fixture;

/// Exercises the same mechanism scenario 1/2 check (frame-size chunking,
/// term frequency, and term association) against a synthetic corpus, since
/// the literary source texts themselves aren't available in this repo.
#[test]
fn term_frequency_and_association_match_synthetic_corpus() {
    let fixture = Fixture::new();
    let mut writer = fixture.index.writer().unwrap();

    // "golden" and "key" co-occur in 3 frames; "key" occurs in 5 total.
    for _ in 0..3 {
        writer.add_document(common::doc("the golden key gleamed", "wellington", 1.0)).unwrap();
    }
    for _ in 0..2 {
        writer.add_document(common::doc("a rusty key stuck fast", "wellington", 1.0)).unwrap();
    }
    writer.commit().unwrap();

    let reader = fixture.index.reader().unwrap();
    assert_eq!(reader.term_frequency("key").unwrap(), 5);
    assert_eq!(reader.association("golden", "key").unwrap(), 3);
    assert_eq!(reader.association("key", "golden").unwrap(), 3, "association is symmetric");
}

/// Stopwords are marked rather than removed: they still occupy a position
/// and are still present in the vocabulary, but contribute nothing to a
/// term query's score (their IDF-weighted contribution is excluded from
/// ranking because they're skipped at staging time).
#[test]
fn stopwords_do_not_produce_postings() {
    let fixture = Fixture::new();
    let mut writer = fixture.index.writer().unwrap();
    writer.add_document(common::doc("the dog and the cat", "wellington", 1.0)).unwrap();
    writer.commit().unwrap();

    let reader = fixture.index.reader().unwrap();
    // "the" and "and" are stopwords; they never produce term_posting rows.
    assert_eq!(reader.term_frequency("the").unwrap(), 0);
    assert_eq!(reader.term_frequency("and").unwrap(), 0);
    assert_eq!(reader.term_frequency("dog").unwrap(), 1);
}

/// Case-fold merges a rare case variant into a dominant one, stabilizing
/// the vocabulary without renumbering the winning term id.
#[test]
fn explicit_case_fold_merges_rare_variant() {
    let fixture = Fixture::new();
    let mut writer = fixture.index.writer().unwrap();
    for _ in 0..10 {
        writer.add_document(common::doc("whale sighting reported", "wellington", 1.0)).unwrap();
    }
    writer.add_document(common::doc("Whale breached nearby", "wellington", 1.0)).unwrap();
    writer.commit().unwrap();

    let folded = writer.fold_case(0.7).unwrap();
    assert_eq!(folded, 1);

    let reader = fixture.index.reader().unwrap();
    assert_eq!(reader.term_frequency("whale").unwrap(), 11);
}
