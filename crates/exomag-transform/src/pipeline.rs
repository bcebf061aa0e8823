//! Mapping entities and the mapping table.
//!
//! A [`Mapping`] binds one destination column to zero or more source fields
//! and a step chain. Mappings are stateless and reusable across records;
//! the ordered [`MappingTable`] defines the export's column order.

use serde::{Deserialize, Serialize};

use exomag_model::{Record, Value};

use crate::error::TransformError;
use crate::steps::{Step, eval_chain};

/// An ordered step chain applied to the positional raw-value list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Fold the chain over the argument list. The list always has exactly
    /// one entry per declared source key, in declaration order.
    pub fn apply(&self, args: Vec<Value>) -> Result<Value, TransformError> {
        eval_chain(&self.steps, Value::List(args))
    }
}

/// Declarative binding of one output column to source fields and a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub destination: String,
    pub source_keys: Vec<String>,
    pub pipeline: Pipeline,
}

impl Mapping {
    pub fn new(
        destination: impl Into<String>,
        source_keys: &[&str],
        steps: Vec<Step>,
    ) -> Self {
        Self {
            destination: destination.into(),
            source_keys: source_keys.iter().map(|key| (*key).to_string()).collect(),
            pipeline: Pipeline::new(steps),
        }
    }

    /// Copy a single source field's value through unchanged.
    pub fn field(destination: impl Into<String>, source: &str) -> Self {
        Self::new(destination, &[source], vec![Step::One])
    }

    /// A fixed value, independent of the record.
    pub fn constant(destination: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(destination, &[], vec![Step::Constant(value.into())])
    }

    /// Pull this mapping's source fields from the record and run the
    /// pipeline. A source key absent from the record is a mapping-table
    /// defect: link expansion guarantees every declared field exists.
    pub fn map(&self, record: &Record) -> Result<Value, TransformError> {
        let mut args = Vec::with_capacity(self.source_keys.len());
        for key in &self.source_keys {
            let value =
                record
                    .get(key)
                    .cloned()
                    .ok_or_else(|| TransformError::MissingField {
                        destination: self.destination.clone(),
                        field: key.clone(),
                    })?;
            args.push(value);
        }
        self.pipeline.apply(args)
    }
}

/// The ordered sequence of mappings defining the output schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingTable {
    mappings: Vec<Mapping>,
}

impl MappingTable {
    pub fn new(mappings: Vec<Mapping>) -> Self {
        Self { mappings }
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Destination column names in declaration order.
    pub fn columns(&self) -> Vec<String> {
        self.mappings
            .iter()
            .map(|mapping| mapping.destination.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Record {
        let mut record = Record::new();
        record.insert("Medgen ID", Value::text("SV-17"));
        record.insert("Gender", Value::text("female"));
        record
    }

    #[test]
    fn field_mapping_copies_value() {
        let mapping = Mapping::field("sex", "Gender");
        assert_eq!(mapping.map(&sample_record()).unwrap(), Value::text("female"));
    }

    #[test]
    fn constant_mapping_ignores_record() {
        let mapping = Mapping::constant("sequencing lab", "LaborBerlin");
        assert_eq!(
            mapping.map(&sample_record()).unwrap(),
            Value::text("LaborBerlin")
        );
    }

    #[test]
    fn missing_source_key_is_a_hard_error() {
        let mapping = Mapping::field("sex", "Geschlecht");
        let error = mapping.map(&sample_record()).unwrap_err();
        assert!(matches!(
            error,
            TransformError::MissingField { destination, field }
                if destination == "sex" && field == "Geschlecht"
        ));
    }

    #[test]
    fn table_column_order_is_declaration_order() {
        let table = MappingTable::new(vec![
            Mapping::field("internal case ID", "Medgen ID"),
            Mapping::constant("sequencing lab", "LaborBerlin"),
            Mapping::field("sex", "Gender"),
        ]);
        assert_eq!(
            table.columns(),
            vec!["internal case ID", "sequencing lab", "sex"]
        );
    }
}
