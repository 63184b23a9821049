use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

/// The data kind a field holds, which determines how its values are
/// analyzed and which operators a predicate against it may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Freeform text, tokenized and indexed as positions within frames.
    Text,
    /// Text indexed whole, as a single token, for exact and wildcard match.
    CategoricalText,
    /// Numeric values, ordered and comparable.
    Numeric,
    /// True/false values.
    Boolean,
    /// An opaque identifier, indexed whole like `CategoricalText` but never
    /// intended to be searched by wildcard.
    Identifier,
}

/// A comparison a structured-field predicate may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    WildcardEq,
}

impl FieldKind {
    /// Which operators a predicate against a field of this kind may use.
    pub fn supports(&self, op: Operator) -> bool {
        match self {
            FieldKind::Text => matches!(op, Operator::Eq),
            FieldKind::CategoricalText => matches!(op, Operator::Eq | Operator::WildcardEq),
            FieldKind::Numeric => matches!(
                op,
                Operator::Eq | Operator::Lt | Operator::Lte | Operator::Gt | Operator::Gte
            ),
            FieldKind::Boolean => matches!(op, Operator::Eq),
            FieldKind::Identifier => matches!(op, Operator::Eq),
        }
    }
}

/// A single field's configuration within a `Schema`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub indexed: bool,
    pub stored: bool,
    /// Name of the analyzer to apply to this field's values, looked up in an
    /// `AnalyzerRegistry`. Ignored for non-`Text` kinds.
    pub analyzer: Option<String>,
}

impl Field {
    pub fn text(name: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Text,
            indexed: true,
            stored: true,
            analyzer: Some("standard".to_string()),
        }
    }

    pub fn categorical_text(name: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::CategoricalText,
            indexed: true,
            stored: true,
            analyzer: None,
        }
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Field { name: name.into(), kind: FieldKind::Numeric, indexed: true, stored: true, analyzer: None }
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Field { name: name.into(), kind: FieldKind::Boolean, indexed: true, stored: true, analyzer: None }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Field { name: name.into(), kind: FieldKind::Identifier, indexed: false, stored: true, analyzer: None }
    }

    pub fn indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    pub fn stored(mut self, stored: bool) -> Self {
        self.stored = stored;
        self
    }

    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }
}

fn validate_field_name(name: &str) -> Result<()> {
    if name.starts_with('_') {
        return Err(Error::InvalidFieldName(format!(
            "field names cannot start with an underscore: '{}'",
            name
        )));
    }
    if name.chars().any(|c| c.is_whitespace()) {
        return Err(Error::InvalidFieldName(format!("field names cannot contain whitespace: '{}'", name)));
    }
    if name.is_empty() {
        return Err(Error::InvalidFieldName("field names cannot be empty".to_string()));
    }
    Ok(())
}

/// The collection of fields declared for a storage location. Field names are
/// kept in sorted order so that field numbering is deterministic across
/// writers and readers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    fields: BTreeMap<String, Field>,
}

impl Schema {
    pub fn new() -> Self {
        Schema { fields: BTreeMap::new() }
    }

    /// Add a field, failing if its name is invalid or already declared.
    pub fn add_field(&mut self, field: Field) -> Result<()> {
        validate_field_name(&field.name)?;
        if self.fields.contains_key(&field.name) {
            return Err(Error::DuplicateField(field.name.clone()));
        }
        self.fields.insert(field.name.clone(), field);
        Ok(())
    }

    pub fn remove_field(&mut self, name: &str) -> Option<Field> {
        self.fields.remove(name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_leading_underscore() {
        let mut schema = Schema::new();
        let err = schema.add_field(Field::text("_hidden")).unwrap_err();
        assert!(matches!(err, Error::InvalidFieldName(_)));
    }

    #[test]
    fn rejects_whitespace() {
        let mut schema = Schema::new();
        let err = schema.add_field(Field::text("first name")).unwrap_err();
        assert!(matches!(err, Error::InvalidFieldName(_)));
    }

    #[test]
    fn rejects_duplicate() {
        let mut schema = Schema::new();
        schema.add_field(Field::text("body")).unwrap();
        let err = schema.add_field(Field::text("body")).unwrap_err();
        assert!(matches!(err, Error::DuplicateField(_)));
    }

    #[test]
    fn numeric_supports_range_operators() {
        assert!(FieldKind::Numeric.supports(Operator::Gte));
        assert!(!FieldKind::Text.supports(Operator::Gte));
    }

    #[test]
    fn categorical_text_supports_wildcard() {
        assert!(FieldKind::CategoricalText.supports(Operator::WildcardEq));
        assert!(!FieldKind::Identifier.supports(Operator::WildcardEq));
    }

    #[test]
    fn iteration_is_sorted_by_name() {
        let mut schema = Schema::new();
        schema.add_field(Field::text("zeta")).unwrap();
        schema.add_field(Field::text("alpha")).unwrap();
        let names: Vec<&str> = schema.names().collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
