use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single field value inside a source record.
///
/// Source records are irregular: a field may be blank, a plain string, a
/// multi-select list, or (after link expansion) a list of embedded
/// sub-records. Making the shape explicit keeps every transformation step's
/// input contract checkable instead of relying on untyped lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// No value present. Distinct from an *absent* field: a record that
    /// carries a field with `Empty` still "has" that field.
    Empty,
    Text(String),
    Int(i64),
    /// Ordered sequence; elements are `Text` for multi-valued fields or
    /// `Record` for expanded link fields.
    List(Vec<Value>),
    Record(Record),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    /// The textual content of this value, if it is scalar text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Short shape name used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Value::Empty => "empty",
            Value::Text(_) => "text",
            Value::Int(_) => "integer",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// One source entity's field/value bag, post link-expansion.
///
/// Records are immutable once handed to the transformation driver; mutation
/// happens only during ingest (link expansion, case-id injection).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Look up a field. `None` means the field is absent, which the
    /// transformation driver treats as a mapping-table defect.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_shape_names() {
        assert_eq!(Value::Empty.shape(), "empty");
        assert_eq!(Value::text("x").shape(), "text");
        assert_eq!(Value::List(vec![]).shape(), "list");
        assert_eq!(Value::Record(Record::new()).shape(), "record");
    }

    #[test]
    fn record_lookup_distinguishes_absent_from_empty() {
        let mut record = Record::new();
        record.insert("Birthdate", Value::Empty);

        assert!(record.get("Birthdate").is_some_and(Value::is_empty));
        assert!(record.get("Gender").is_none());
    }

    #[test]
    fn record_serializes_round_trip() {
        let mut record = Record::new();
        record.insert("Gender", Value::text("female"));
        record.insert(
            "HPO Terms",
            Value::List(vec![Value::text("HP:0001250")]),
        );

        let json = serde_json::to_string(&record).expect("serialize record");
        let round: Record = serde_json::from_str(&json).expect("deserialize record");
        assert_eq!(round, record);
    }
}
