use serde::Serialize;

use crate::cell::CellValue;

/// An ordered set of rows sharing one header.
///
/// Rows are stored positionally; every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Build a table from a header and rows, padding or truncating each row
    /// to the header width.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of one column, top to bottom.
    pub fn column_values(&self, name: &str) -> Option<impl Iterator<Item = &CellValue> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// First `n` rows with the same header.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            vec!["name".into(), "phone".into()],
            vec![
                vec!["Ann".into(), CellValue::Int(9998887770)],
                vec!["Bob".into()],
            ],
        )
    }

    #[test]
    fn short_rows_are_padded() {
        let t = sample();
        assert_eq!(t.rows[1], vec![CellValue::text("Bob"), CellValue::Empty]);
    }

    #[test]
    fn long_rows_are_truncated() {
        let mut t = Table::new(vec!["a".into()]);
        t.push_row(vec!["1".into(), "2".into()]);
        assert_eq!(t.rows[0].len(), 1);
    }

    #[test]
    fn column_lookup() {
        let t = sample();
        assert_eq!(t.column_index("phone"), Some(1));
        assert_eq!(t.column_index("missing"), None);
        let names: Vec<String> = t.column_values("name").unwrap().map(|c| c.as_text()).collect();
        assert_eq!(names, vec!["Ann", "Bob"]);
        let phones: Vec<&CellValue> = t.column_values("phone").unwrap().collect();
        assert_eq!(phones, vec![&CellValue::Int(9998887770), &CellValue::Empty]);
    }

    #[test]
    fn head_keeps_header() {
        let t = sample().head(1);
        assert_eq!(t.len(), 1);
        assert_eq!(t.width(), 2);
        assert_eq!(sample().head(10).len(), 2);
    }
}
