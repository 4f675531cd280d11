use std::collections::{HashMap, HashSet};

use dupcheck_core::Table;

use crate::config::JoinConfig;
use crate::error::ReconError;
use crate::model::{JoinedTable, KeyedTable, MatchKey};

/// Inner equi-join on the match key.
///
/// Rows come out in left-table order; a left row matching several right rows
/// yields one output row per right row, in right-table order. Unmatched rows
/// on either side are dropped.
///
/// Column names present on both sides get `join.left_suffix` /
/// `join.right_suffix`; all others are kept verbatim, left columns first.
pub fn join(left: &KeyedTable, right: &KeyedTable, join: &JoinConfig) -> Result<JoinedTable, ReconError> {
    let columns = joined_columns(&left.table.columns, &right.table.columns, join)?;

    let mut right_index: HashMap<&MatchKey, Vec<usize>> = HashMap::new();
    for (i, key) in right.keys.iter().enumerate() {
        right_index.entry(key).or_default().push(i);
    }

    let mut table = Table::new(columns);
    let mut keys = Vec::new();

    for (left_row, key) in left.table.rows.iter().zip(&left.keys) {
        let Some(matches) = right_index.get(key) else {
            continue;
        };
        for &ri in matches {
            let mut row = Vec::with_capacity(table.width());
            row.extend(left_row.iter().cloned());
            row.extend(right.table.rows[ri].iter().cloned());
            table.rows.push(row);
            keys.push(key.clone());
        }
    }

    log::debug!(
        "joined {} x {} rows into {} pairs",
        left.table.len(),
        right.table.len(),
        table.len()
    );

    Ok(JoinedTable { table, keys })
}

fn joined_columns(left: &[String], right: &[String], join: &JoinConfig) -> Result<Vec<String>, ReconError> {
    let left_set: HashSet<&str> = left.iter().map(String::as_str).collect();
    let right_set: HashSet<&str> = right.iter().map(String::as_str).collect();

    let rename = |col: &String, other: &HashSet<&str>, suffix: &str| {
        if other.contains(col.as_str()) {
            format!("{col}{suffix}")
        } else {
            col.clone()
        }
    };

    let columns: Vec<String> = left
        .iter()
        .map(|c| rename(c, &right_set, &join.left_suffix))
        .chain(right.iter().map(|c| rename(c, &left_set, &join.right_suffix)))
        .collect();

    let mut seen = HashSet::with_capacity(columns.len());
    for col in &columns {
        if !seen.insert(col.as_str()) {
            return Err(ReconError::DuplicateOutputColumn(col.clone()));
        }
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dupcheck_core::CellValue;

    fn keyed(columns: &[&str], rows: &[(&str, &[&str])]) -> KeyedTable {
        let table = Table::from_rows(
            columns.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|(_, cells)| cells.iter().map(|c| CellValue::from(*c)).collect())
                .collect(),
        );
        let keys = rows.iter().map(|(k, _)| MatchKey(k.to_string())).collect();
        KeyedTable { table, keys }
    }

    fn column(t: &Table, name: &str) -> Vec<String> {
        t.column_values(name).unwrap().map(|c| c.as_text()).collect()
    }

    #[test]
    fn unmatched_rows_are_dropped() {
        let left = keyed(&["a"], &[("k1", &["l1"]), ("k2", &["l2"])]);
        let right = keyed(&["b"], &[("k2", &["r2"]), ("k3", &["r3"])]);
        let out = join(&left, &right, &JoinConfig::default()).unwrap();
        assert_eq!(out.table.columns, vec!["a", "b"]);
        assert_eq!(out.table.len(), 1);
        assert_eq!(column(&out.table, "a"), vec!["l2"]);
        assert_eq!(column(&out.table, "b"), vec!["r2"]);
        assert_eq!(out.keys, vec![MatchKey("k2".into())]);
    }

    #[test]
    fn duplicates_produce_cross_product_in_left_order() {
        let left = keyed(&["a"], &[("x", &["l1"]), ("y", &["l2"]), ("x", &["l3"])]);
        let right = keyed(&["b"], &[("x", &["r1"]), ("x", &["r2"]), ("y", &["r3"])]);
        let out = join(&left, &right, &JoinConfig::default()).unwrap();
        assert_eq!(out.table.len(), 5);
        assert_eq!(column(&out.table, "a"), vec!["l1", "l1", "l2", "l3", "l3"]);
        assert_eq!(column(&out.table, "b"), vec!["r1", "r2", "r3", "r1", "r2"]);
    }

    #[test]
    fn colliding_columns_get_suffixes() {
        let left = keyed(&["id", "name", "city"], &[("k", &["1", "Ann", "Delhi"])]);
        let right = keyed(&["id", "name", "course"], &[("k", &["9", "ann", "BTech"])]);
        let out = join(&left, &right, &JoinConfig::default()).unwrap();
        assert_eq!(
            out.table.columns,
            vec!["id_file1", "name_file1", "city", "id_file2", "name_file2", "course"]
        );
        assert_eq!(column(&out.table, "id_file1"), vec!["1"]);
        assert_eq!(column(&out.table, "id_file2"), vec!["9"]);
    }

    #[test]
    fn suffix_clash_is_an_error() {
        let left = keyed(&["id", "id_file2"], &[]);
        let right = keyed(&["id"], &[]);
        let err = join(&left, &right, &JoinConfig::default()).unwrap_err();
        assert!(matches!(err, ReconError::DuplicateOutputColumn(c) if c == "id_file2"));
    }

    #[test]
    fn no_common_keys_is_empty_not_error() {
        let left = keyed(&["a"], &[("k1", &["l1"])]);
        let right = keyed(&["b"], &[("k2", &["r2"])]);
        let out = join(&left, &right, &JoinConfig::default()).unwrap();
        assert!(out.table.is_empty());
        assert_eq!(out.table.columns, vec!["a", "b"]);
    }

    #[test]
    fn blank_keys_match_each_other() {
        let left = keyed(&["a"], &[("", &["l1"])]);
        let right = keyed(&["b"], &[("", &["r1"])]);
        let out = join(&left, &right, &JoinConfig::default()).unwrap();
        assert_eq!(out.table.len(), 1);
    }
}
