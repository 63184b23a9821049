use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                $name(id)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                $name(id)
            }
        }
    };
}

id_newtype!(DocId);
id_newtype!(FrameId);
id_newtype!(TermId);
id_newtype!(AttributeId);
id_newtype!(FieldId);
id_newtype!(PluginId);

/// The lifecycle state of a document. `Staged` documents live only in a
/// writer's workspace; they become `Live` on commit and `Tombstoned` on
/// delete. There is no explicit "state" column: the state is derived from
/// which tables a document's id appears in (staging, `document`, or absent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    Staged,
    Live,
    Tombstoned,
}

/// A scalar or text value for one field of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
}

impl FieldValue {
    /// Convert to a `rusqlite` dynamic value, storing each kind with its
    /// native SQLite type affinity (`Real` for numbers, `Integer` for
    /// booleans, `Text` for everything else) so that range scans over
    /// `document_data` use SQLite's own type-aware ordering rather than a
    /// hand-rolled lexicographic encoding.
    pub fn to_sql_value(&self) -> rusqlite::types::Value {
        use rusqlite::types::Value;
        match self {
            FieldValue::Text(s) => Value::Text(s.clone()),
            FieldValue::Number(n) => Value::Real(*n),
            FieldValue::Boolean(b) => Value::Integer(if *b { 1 } else { 0 }),
            FieldValue::Date(d) => Value::Text(d.to_rfc3339()),
        }
    }
}

/// A document: a mapping from field name to value, prior to id assignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub fields: HashMap<String, FieldValue>,
}

impl Document {
    pub fn new() -> Self {
        Document { fields: HashMap::new() }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}
