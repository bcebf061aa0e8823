//! Transformation driver: records in, export rows out.

use tracing::{debug, info};

use exomag_model::{CellValue, ExportTable, Record, Value};

use crate::error::TransformError;
use crate::filter::{FilterRule, passes};
use crate::pipeline::MappingTable;

/// Apply every mapping to one record, in table order.
///
/// The result is schema-complete: exactly one cell per declared destination,
/// even when every mapping evaluates to an empty value.
pub fn transform(record: &Record, table: &MappingTable) -> Result<Vec<CellValue>, TransformError> {
    let mut row = Vec::with_capacity(table.len());
    for mapping in table.mappings() {
        let value = mapping.map(record)?;
        row.push(into_cell(&mapping.destination, value)?);
    }
    Ok(row)
}

/// Filter and transform a record collection, preserving input order.
///
/// No local recovery: the first failing record aborts the run, so either
/// every included record transforms or no output is produced.
pub fn transform_all<'a, I>(
    records: I,
    table: &MappingTable,
    filters: &[FilterRule],
) -> Result<ExportTable, TransformError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut export = ExportTable::new(table.columns());
    let mut seen = 0usize;
    let mut excluded = 0usize;

    for record in records {
        seen += 1;
        if !passes(record, filters) {
            excluded += 1;
            debug!(record = seen, "record excluded by filter rules");
            continue;
        }
        export.push_row(transform(record, table)?);
    }

    info!(
        records = seen,
        excluded,
        exported = export.row_count(),
        "transformed record collection"
    );
    Ok(export)
}

fn into_cell(destination: &str, value: Value) -> Result<CellValue, TransformError> {
    match value {
        Value::Empty => Ok(CellValue::Missing),
        Value::Text(text) => Ok(CellValue::Text(text)),
        Value::Int(number) => Ok(CellValue::Int(number)),
        other => Err(TransformError::NonScalar {
            destination: destination.to_string(),
            shape: other.shape(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Mapping;
    use crate::steps::Step;

    fn table() -> MappingTable {
        MappingTable::new(vec![
            Mapping::field("internal case ID", "Medgen ID"),
            Mapping::constant("sequencing lab", "LaborBerlin"),
            Mapping::field("sex", "Gender"),
        ])
    }

    fn record(case: &str, gender: &str, falltyp: &str) -> Record {
        let mut record = Record::new();
        record.insert("Medgen ID", Value::text(case));
        record.insert("Gender", Value::text(gender));
        record.insert("Falltyp", Value::text(falltyp));
        record
    }

    #[test]
    fn row_is_schema_complete() {
        let mut empty = Record::new();
        empty.insert("Medgen ID", Value::Empty);
        empty.insert("Gender", Value::Empty);

        let row = transform(&empty, &table()).unwrap();
        assert_eq!(row.len(), 3);
        assert_eq!(row[0], CellValue::Missing);
        assert_eq!(row[1], CellValue::Text("LaborBerlin".into()));
    }

    #[test]
    fn filters_preserve_relative_order() {
        let records = vec![
            record("SV-1", "female", "Trio"),
            record("SV-2", "male", "Single"),
            record("SV-3", "male", "Trio"),
        ];
        let filters = [FilterRule::new("Falltyp", ["Trio"])];

        let export = transform_all(records.iter(), &table(), &filters).unwrap();
        assert_eq!(export.row_count(), 2);
        assert_eq!(export.rows[0][0], CellValue::Text("SV-1".into()));
        assert_eq!(export.rows[1][0], CellValue::Text("SV-3".into()));
    }

    #[test]
    fn non_scalar_result_is_a_defect() {
        // A bare field copy of a link field leaves a record list in the cell.
        let table = MappingTable::new(vec![Mapping::new(
            "clinician",
            &["Clinician"],
            vec![Step::One],
        )]);
        let mut record = Record::new();
        record.insert(
            "Clinician",
            Value::List(vec![Value::Record(Record::new())]),
        );

        let error = transform(&record, &table).unwrap_err();
        assert!(matches!(error, TransformError::NonScalar { .. }));
    }

    #[test]
    fn transform_is_deterministic() {
        let records = vec![record("SV-1", "female", "Trio")];
        let first = transform_all(records.iter(), &table(), &[]).unwrap();
        let second = transform_all(records.iter(), &table(), &[]).unwrap();
        assert_eq!(first.rows, second.rows);
    }
}
