//! Baserow REST client.
//!
//! Fetches whole tables through the paginated row-listing endpoint with
//! `user_field_names=true`, so records carry human field names. Blocking
//! requests: the fetch happens once, up front, and the rest of the pipeline
//! is synchronous. No retry policy here.

use std::collections::BTreeMap;

use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::{debug, info};

use exomag_model::{BaserowOptions, ConfigError, Record};

use crate::SourceData;
use crate::error::IngestError;
use crate::json::value_from_json;

const PAGE_SIZE: &str = "200";

pub struct BaserowClient {
    http: reqwest::blocking::Client,
    api_url: String,
    token: String,
}

#[derive(Deserialize)]
struct RowPage {
    next: Option<String>,
    results: Vec<serde_json::Value>,
}

impl BaserowClient {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            api_url: api_url.into(),
            token: token.into(),
        }
    }

    /// List every row of a table, in API order.
    pub fn list_rows(&self, table_id: u64) -> Result<Vec<(String, Record)>, IngestError> {
        let url = format!(
            "{}/api/database/rows/table/{table_id}/",
            self.api_url.trim_end_matches('/')
        );

        let mut rows = Vec::new();
        let mut page = 1u32;
        loop {
            let page_number = page.to_string();
            let response = self
                .http
                .get(&url)
                .query(&[
                    ("user_field_names", "true"),
                    ("size", PAGE_SIZE),
                    ("page", page_number.as_str()),
                ])
                .header(AUTHORIZATION, format!("Token {}", self.token))
                .send()?;

            if !response.status().is_success() {
                return Err(IngestError::Api {
                    status: response.status().as_u16(),
                    table_id,
                });
            }

            let body: RowPage = response.json()?;
            for row in &body.results {
                rows.push(row_record(row, table_id)?);
            }
            debug!(table_id, page, rows = rows.len(), "fetched baserow page");

            if body.next.is_none() {
                break;
            }
            page += 1;
        }

        Ok(rows)
    }
}

/// Fetch the root collection and every declared link table.
pub fn fetch(options: &BaserowOptions) -> Result<SourceData, IngestError> {
    let token = options
        .token
        .as_deref()
        .ok_or(ConfigError::MissingToken)?;
    let client = BaserowClient::new(options.api_url.clone(), token);

    info!(table_id = options.root_table_id, "fetching case records");
    let root = client.list_rows(options.root_table_id)?;

    let mut links = BTreeMap::new();
    for (name, table_id) in &options.link_tables {
        info!(link = name.as_str(), table_id, "fetching linked collection");
        let rows = client.list_rows(*table_id)?;
        links.insert(name.clone(), rows.into_iter().collect());
    }

    Ok(SourceData { root, links })
}

/// Split one API row into its id and its field record. The `id` and `order`
/// bookkeeping keys are not data fields.
fn row_record(row: &serde_json::Value, table_id: u64) -> Result<(String, Record), IngestError> {
    let serde_json::Value::Object(map) = row else {
        return Err(IngestError::Dump(format!(
            "table {table_id} returned a non-object row"
        )));
    };
    let id = map
        .get("id")
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| IngestError::Dump(format!("table {table_id} row without an id")))?;

    let record: Record = map
        .iter()
        .filter(|(name, _)| name.as_str() != "id" && name.as_str() != "order")
        .map(|(name, value)| (name.clone(), value_from_json(value)))
        .collect();

    Ok((id.to_string(), record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use exomag_model::Value;

    #[test]
    fn row_record_strips_bookkeeping_fields() {
        let row = serde_json::json!({
            "id": 17,
            "order": "17.0000",
            "Gender": "female",
            "Falltyp": {"id": 2, "value": "Trio", "color": "blue"}
        });

        let (id, record) = row_record(&row, 1042).unwrap();
        assert_eq!(id, "17");
        assert!(!record.contains("id"));
        assert!(!record.contains("order"));
        assert_eq!(record.get("Gender"), Some(&Value::text("female")));
        assert_eq!(record.get("Falltyp"), Some(&Value::text("Trio")));
    }

    #[test]
    fn row_without_id_is_rejected() {
        let row = serde_json::json!({"Gender": "female"});
        assert!(matches!(
            row_record(&row, 1042).unwrap_err(),
            IngestError::Dump(_)
        ));
    }
}
