//! Link expansion and case-id injection.
//!
//! Runs exactly once, between fetch and transformation: every declared link
//! field's id list is replaced by the full sub-records from the linked
//! collection, and the derived internal case identifier is injected. The
//! mapping tables assume both, so a record that skips this step never
//! reaches the driver.

use tracing::info;

use exomag_model::{CaseIdOptions, Record, Value};

use crate::SourceData;
use crate::error::IngestError;

/// Expand every record in the fetched collection.
pub fn expand_links(data: SourceData, case_id: &CaseIdOptions) -> Result<Vec<Record>, IngestError> {
    let SourceData { root, links } = data;
    let mut records = Vec::with_capacity(root.len());

    for (row_id, mut record) in root {
        for (link_name, link_table) in &links {
            let raw = record.remove(link_name).ok_or_else(|| {
                IngestError::MissingLinkField {
                    record: row_id.clone(),
                    field: link_name.clone(),
                }
            })?;

            let mut expanded = Vec::new();
            for id in link_ids(&raw, link_name)? {
                let linked =
                    link_table
                        .get(&id)
                        .ok_or_else(|| IngestError::UnknownLink {
                            field: link_name.clone(),
                            id: id.clone(),
                        })?;
                expanded.push(Value::Record(linked.clone()));
            }
            record.insert(link_name.clone(), Value::List(expanded));
        }

        record.insert(
            case_id.field.clone(),
            Value::text(format!("{}{row_id}", case_id.prefix)),
        );
        records.push(record);
    }

    info!(
        records = records.len(),
        link_fields = links.len(),
        "expanded link fields"
    );
    Ok(records)
}

/// The raw id list of an unexpanded link field.
fn link_ids(value: &Value, field: &str) -> Result<Vec<String>, IngestError> {
    match value {
        Value::Empty => Ok(Vec::new()),
        Value::List(items) => items
            .iter()
            .map(|item| match item {
                Value::Text(id) => Ok(id.clone()),
                other => Err(IngestError::Dump(format!(
                    "link field \"{field}\" holds a {} instead of a row id",
                    other.shape()
                ))),
            })
            .collect(),
        other => Err(IngestError::Dump(format!(
            "link field \"{field}\" holds a {} instead of an id list",
            other.shape()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn source() -> SourceData {
        let mut case = Record::new();
        case.insert("Gender", Value::text("female"));
        case.insert("Clinician", Value::List(vec![Value::text("5")]));

        let mut clinician = Record::new();
        clinician.insert("Lastname", Value::text("Weber"));

        let mut clinicians = BTreeMap::new();
        clinicians.insert("5".to_string(), clinician);
        let mut links = BTreeMap::new();
        links.insert("Clinician".to_string(), clinicians);

        SourceData {
            root: vec![("17".to_string(), case)],
            links,
        }
    }

    #[test]
    fn replaces_ids_with_sub_records() {
        let records = expand_links(source(), &CaseIdOptions::default()).unwrap();
        assert_eq!(records.len(), 1);

        let Some(Value::List(clinicians)) = records[0].get("Clinician") else {
            panic!("expected expanded link list");
        };
        let Value::Record(clinician) = &clinicians[0] else {
            panic!("expected sub-record");
        };
        assert_eq!(clinician.get("Lastname"), Some(&Value::text("Weber")));
    }

    #[test]
    fn injects_prefixed_case_id() {
        let records = expand_links(source(), &CaseIdOptions::default()).unwrap();
        assert_eq!(records[0].get("Medgen ID"), Some(&Value::text("SV-17")));
    }

    #[test]
    fn unknown_link_id_fails() {
        let mut data = source();
        data.links.get_mut("Clinician").unwrap().clear();

        let error = expand_links(data, &CaseIdOptions::default()).unwrap_err();
        assert!(matches!(
            error,
            IngestError::UnknownLink { field, id } if field == "Clinician" && id == "5"
        ));
    }

    #[test]
    fn absent_link_field_fails() {
        let mut data = source();
        data.root[0].1.remove("Clinician");

        let error = expand_links(data, &CaseIdOptions::default()).unwrap_err();
        assert!(matches!(error, IngestError::MissingLinkField { .. }));
    }

    #[test]
    fn empty_link_field_expands_to_empty_list() {
        let mut data = source();
        data.root[0].1.insert("Clinician", Value::Empty);

        let records = expand_links(data, &CaseIdOptions::default()).unwrap();
        assert_eq!(records[0].get("Clinician"), Some(&Value::List(vec![])));
    }
}
