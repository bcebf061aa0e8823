//! Local JSON dump source.
//!
//! A dump mirrors the shape of a Baserow fetch result:
//!
//! ```json
//! {
//!   "root": { "17": { "Gender": "female", "Clinician": ["5"] } },
//!   "links": { "Clinician": { "5": { "Lastname": "Weber" } } }
//! }
//! ```
//!
//! Useful for offline runs and tests; rows are processed in id order.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use exomag_model::Record;

use crate::SourceData;
use crate::error::IngestError;
use crate::json::record_from_json;

pub fn load(path: &Path) -> Result<SourceData, IngestError> {
    let text = std::fs::read_to_string(path)?;
    let dump: serde_json::Value = serde_json::from_str(&text)?;

    let root_json = dump
        .get("root")
        .ok_or_else(|| IngestError::Dump("missing \"root\" table".to_string()))?;
    let root = table_records(root_json, "root")?;

    let mut links = BTreeMap::new();
    if let Some(links_json) = dump.get("links") {
        let serde_json::Value::Object(map) = links_json else {
            return Err(IngestError::Dump("\"links\" is not an object".to_string()));
        };
        for (name, table_json) in map {
            let rows = table_records(table_json, name)?;
            links.insert(name.clone(), rows.into_iter().collect());
        }
    }

    info!(
        path = %path.display(),
        records = root.len(),
        link_tables = links.len(),
        "loaded source dump"
    );
    Ok(SourceData { root, links })
}

fn table_records(
    table: &serde_json::Value,
    name: &str,
) -> Result<Vec<(String, Record)>, IngestError> {
    let serde_json::Value::Object(rows) = table else {
        return Err(IngestError::Dump(format!("table \"{name}\" is not an object")));
    };

    let mut records = Vec::with_capacity(rows.len());
    for (id, fields) in rows {
        let serde_json::Value::Object(fields) = fields else {
            return Err(IngestError::Dump(format!(
                "row {id} in table \"{name}\" is not an object"
            )));
        };
        records.push((id.clone(), record_from_json(fields)));
    }
    // serde_json objects do not preserve insertion order; sort by id for a
    // stable processing order.
    records.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use exomag_model::Value;

    #[test]
    fn loads_root_and_links() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("dump.json");
        std::fs::write(
            &path,
            r#"{
                "root": {"17": {"Gender": "female", "Clinician": ["5"]}},
                "links": {"Clinician": {"5": {"Lastname": "Weber"}}}
            }"#,
        )
        .expect("write dump");

        let data = load(&path).unwrap();
        assert_eq!(data.root.len(), 1);
        assert_eq!(data.root[0].0, "17");
        assert_eq!(data.root[0].1.get("Gender"), Some(&Value::text("female")));
        assert_eq!(
            data.links["Clinician"]["5"].get("Lastname"),
            Some(&Value::text("Weber"))
        );
    }

    #[test]
    fn missing_root_is_malformed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("dump.json");
        std::fs::write(&path, r#"{"links": {}}"#).expect("write dump");

        assert!(matches!(load(&path).unwrap_err(), IngestError::Dump(_)));
    }
}
