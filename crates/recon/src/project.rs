use dupcheck_core::Table;

use crate::model::JoinedTable;

/// Drop the match key. Column order and row count are left untouched.
pub fn project(joined: JoinedTable) -> Table {
    joined.table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MatchKey;
    use dupcheck_core::CellValue;

    #[test]
    fn keeps_columns_and_rows() {
        let table = Table::from_rows(
            vec!["b".into(), "a".into()],
            vec![vec!["1".into(), "2".into()], vec!["3".into(), CellValue::Empty]],
        );
        let joined = JoinedTable {
            table: table.clone(),
            keys: vec![MatchKey("k".into()), MatchKey("k".into())],
        };
        let out = project(joined);
        assert_eq!(out, table);
    }

    #[test]
    fn key_never_appears_in_output() {
        let joined = JoinedTable {
            table: Table::from_rows(vec!["name".into()], vec![vec!["Ann".into()]]),
            keys: vec![MatchKey("ann__9998887770".into())],
        };
        let out = project(joined);
        assert!(out
            .rows
            .iter()
            .flatten()
            .all(|cell| cell.as_text() != "ann__9998887770"));
        assert_eq!(out.columns, vec!["name"]);
    }
}
