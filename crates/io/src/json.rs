// JSON export

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use dupcheck_core::Table;

use crate::ExportError;

/// Export a table as a JSON array of arrays, header row first.
/// Each cell is written as its display string.
pub fn export(table: &Table, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let writer = BufWriter::new(file);

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(table.len() + 1);
    rows.push(table.columns.clone());
    for row in &table.rows {
        rows.push(row.iter().map(|c| c.as_text()).collect());
    }

    serde_json::to_writer_pretty(writer, &rows)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dupcheck_core::CellValue;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_json_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("matches.json");

        let table = Table::from_rows(
            vec!["name_file1".into(), "name_file2".into()],
            vec![
                vec!["Alice".into(), "alice".into()],
                vec!["Bob".into(), CellValue::Empty],
            ],
        );

        export(&table, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: Vec<Vec<String>> = serde_json::from_str(&content).unwrap();

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], vec!["name_file1", "name_file2"]);
        assert_eq!(parsed[1], vec!["Alice", "alice"]);
        assert_eq!(parsed[2], vec!["Bob", ""]);
    }
}
