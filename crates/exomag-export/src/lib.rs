//! CSV serialization of the normalized export.
//!
//! One header row with the destination names in mapping-table order, one
//! row per transformed record. Cell formatting beyond plain text is out of
//! scope; registries ingest the CSV as-is.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::info;

use exomag_model::{CellValue, ExportTable};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write export file: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Write the export to a writer.
pub fn write_csv_to<W: Write>(table: &ExportTable, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&table.columns)?;
    for row in &table.rows {
        csv_writer.write_record(row.iter().map(CellValue::render))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the export to a file.
pub fn write_csv(table: &ExportTable, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv_to(table, BufWriter::new(file))?;
    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.columns.len(),
        "wrote export file"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ExportTable {
        let mut table = ExportTable::new(vec![
            "internal case ID".into(),
            "sex".into(),
            "age in months".into(),
        ]);
        table.push_row(vec![
            CellValue::Text("SV-17".into()),
            CellValue::Text("female".into()),
            CellValue::Int(68),
        ]);
        table.push_row(vec![
            CellValue::Text("SV-18".into()),
            CellValue::Missing,
            CellValue::Int(-1),
        ]);
        table
    }

    #[test]
    fn writes_header_and_rows() {
        let mut buffer = Vec::new();
        write_csv_to(&sample_table(), &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        insta::assert_snapshot!(output.trim_end(), @r"
        internal case ID,sex,age in months
        SV-17,female,68
        SV-18,,-1
        ");
    }

    #[test]
    fn quotes_columns_containing_commas() {
        let mut table = ExportTable::new(vec!["if new disease gene, level of evidence".into()]);
        table.push_row(vec![CellValue::Missing]);

        let mut buffer = Vec::new();
        write_csv_to(&table, &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output, "\"if new disease gene, level of evidence\"\n\"\"\n");
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("export.csv");

        write_csv(&sample_table(), &path).unwrap();
        let written = std::fs::read_to_string(&path).expect("read back");
        assert!(written.starts_with("internal case ID,sex,age in months\n"));
        assert_eq!(written.lines().count(), 3);
    }
}
