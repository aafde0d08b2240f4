use std::path::Path;

use anyhow::{Context, Result};

use super::model::RecordTable;

/// Write `rows` of `table` as semicolon-delimited text with a header row,
/// the same layout the loader reads.
pub fn write_csv(table: &RecordTable, rows: &[usize], path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer
        .write_record(table.columns())
        .context("writing CSV header")?;
    for &row in rows {
        writer
            .write_record(table.row(row).iter().map(|cell| cell.as_field().into_owned()))
            .with_context(|| format!("writing row {row}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader;
    use crate::data::model::{columns, test_support::table, CellValue};

    #[test]
    fn exported_rows_load_back() {
        let source = table(
            &columns::REQUIRED,
            &[
                &["2021", "Enero", "Ecuador", "Ecuador", "Hombre", "Mujer", "Soltero", "Soltera", "Superior", "", "Guayas"],
                &["2022", "Mayo", "Peru", "Ecuador", "Hombre", "Mujer", "Divorciado", "Soltera", "Primaria", "Superior", "Azuay"],
            ],
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtrado.csv");

        write_csv(&source, &[1], &path).unwrap();

        let back = loader::load_file(&path).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.columns(), source.columns());
        assert_eq!(back.row(0), source.row(1));
    }

    #[test]
    fn null_cells_round_trip_as_empty() {
        let source = table(&columns::REQUIRED, &[&["2021", "", "", "", "", "", "", "", "", "", "Loja"]]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nulls.csv");
        write_csv(&source, &[0], &path).unwrap();
        let back = loader::load_file(&path).unwrap();
        assert_eq!(back.cell(0, back.column_index(columns::MONTH)), &CellValue::Null);
    }

    #[test]
    fn unwritable_path_fails() {
        let source = table(&columns::REQUIRED, &[]);
        assert!(write_csv(&source, &[], Path::new("/nonexistent/dir/out.csv")).is_err());
    }
}
