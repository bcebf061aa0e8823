//! JSON to record-model conversion.
//!
//! Both sources (the Baserow API and local dumps) deliver rows as JSON
//! objects; this module maps them onto the explicit [`Value`] shapes the
//! transformation engine expects. Baserow wraps select options and link
//! references in small objects; those collapse to their scalar content so
//! the rest of the pipeline never sees wire-format details.

use exomag_model::{Record, Value};

/// Convert an arbitrary JSON value to a field value.
///
/// - `null` becomes `Empty`, scalars become their text form
/// - select options (`{"id": .., "value": .., "color": ..}`) collapse to
///   the option label
/// - link references (`{"id": .., "value": ..}` without a color) collapse
///   to the referenced row id, ready for link expansion
/// - any other object becomes a nested record
pub fn value_from_json(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Empty,
        serde_json::Value::Bool(flag) => Value::text(flag.to_string()),
        serde_json::Value::Number(number) => Value::text(number.to_string()),
        serde_json::Value::String(text) => Value::Text(text.clone()),
        serde_json::Value::Array(items) => {
            Value::List(items.iter().map(value_from_json).collect())
        }
        serde_json::Value::Object(map) => {
            if map.contains_key("value") {
                if let Some(label) = map.get("value").filter(|_| map.contains_key("color")) {
                    return value_from_json(label);
                }
                if let Some(id) = map.get("id") {
                    return value_from_json(id);
                }
            }
            Value::Record(record_from_json(map))
        }
    }
}

/// Convert a JSON object to a record, field by field.
pub fn record_from_json(map: &serde_json::Map<String, serde_json::Value>) -> Record {
    map.iter()
        .map(|(name, value)| (name.clone(), value_from_json(value)))
        .collect()
}
