use caterpillar::core::{Config, Document, FieldValue};
use caterpillar::schema::{Field, Schema};
use caterpillar::Index;
use tempfile::TempDir;

/// A temporary on-disk index with a small schema shared by the integration
/// tests: a text `body`, a categorical `region`, and a numeric `age`.
pub struct Fixture {
    pub index: Index,
    _dir: TempDir,
}

pub fn schema() -> Schema {
    let mut schema = Schema::new();
    schema.add_field(Field::text("body")).unwrap();
    schema.add_field(Field::categorical_text("region")).unwrap();
    schema.add_field(Field::numeric("age")).unwrap();
    schema
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let index = Index::create(dir.path().join("idx"), Config { frame_size: 1, ..Config::default() }, schema()).unwrap();
        Fixture { index, _dir: dir }
    }
}

pub fn doc(body: &str, region: &str, age: f64) -> Document {
    Document::new()
        .with_field("body", FieldValue::Text(body.to_string()))
        .with_field("region", FieldValue::Text(region.to_string()))
        .with_field("age", FieldValue::Number(age))
}
