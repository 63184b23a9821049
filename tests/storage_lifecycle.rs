mod common;

use caterpillar::core::Config;
use caterpillar::{Error, Index};
use common::schema;

#[test]
fn creating_over_an_existing_storage_location_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("idx");
    Index::create(&path, Config::default(), schema()).unwrap();
    let err = Index::create(&path, Config::default(), schema()).unwrap_err();
    assert!(matches!(err, Error::DuplicateStorage(_)));
}

#[test]
fn opening_a_missing_storage_location_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = Index::open(dir.path().join("nope"), Config::default()).unwrap_err();
    assert!(matches!(err, Error::StorageNotFound(_)));
}

#[test]
fn schema_survives_a_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("idx");
    Index::create(&path, Config::default(), schema()).unwrap();

    let reopened = Index::open(&path, Config::default()).unwrap();
    let reopened_schema = reopened.schema().unwrap();
    assert_eq!(reopened_schema.len(), schema().len());
    assert!(reopened_schema.contains("body"));
}

#[test]
fn duplicate_field_name_is_rejected() {
    let mut schema = caterpillar::Schema::new();
    schema.add_field(caterpillar::schema::Field::text("body")).unwrap();
    let err = schema.add_field(caterpillar::schema::Field::text("body")).unwrap_err();
    assert!(matches!(err, Error::DuplicateField(_)));
}

/// A field added to the schema mid-write via the staging workspace shows up
/// once the writer commits.
#[test]
fn field_added_through_writer_is_queryable_after_commit() {
    let dir = tempfile::tempdir().unwrap();
    let index = Index::create(dir.path().join("idx"), Config::default(), caterpillar::Schema::new()).unwrap();
    let mut writer = index.writer().unwrap();
    writer.add_field(caterpillar::schema::Field::categorical_text("tag")).unwrap();
    writer.commit().unwrap();

    let reader = index.reader().unwrap();
    assert!(reader.schema().contains("tag"));
}
