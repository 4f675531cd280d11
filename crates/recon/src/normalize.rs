// Match key derivation.
//
// Both tables must go through the same rule with the same JoinConfig, so the
// resulting keys are comparable byte for byte.

use std::sync::OnceLock;

use dupcheck_core::{CellValue, Table};
use regex::Regex;

use crate::config::JoinConfig;
use crate::error::ReconError;
use crate::model::{ColumnSelection, KeyedTable, MatchKey, MatchMode, Role, Side};

/// Trim surrounding whitespace, then lower-case.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn non_digit() -> &'static Regex {
    static NON_DIGIT: OnceLock<Regex> = OnceLock::new();
    // Unicode-aware: `\D` is anything outside the Nd category
    NON_DIGIT.get_or_init(|| Regex::new(r"\D").expect("static pattern"))
}

/// Strip every non-digit (any script's decimal digits count), then keep the
/// last `keep` digits. Shorter numbers are kept whole, never padded.
pub fn normalize_phone(raw: &str, keep: usize) -> String {
    let digits = non_digit().replace_all(raw, "");
    let count = digits.chars().count();
    digits.chars().skip(count.saturating_sub(keep)).collect()
}

pub fn combined_key(name: &str, phone: &str, join: &JoinConfig) -> String {
    format!(
        "{}{}{}",
        normalize_name(name),
        join.key_separator,
        normalize_phone(phone, join.phone_digits)
    )
}

/// Key rule bound to concrete column positions of one table.
#[derive(Debug, Clone, Copy)]
enum KeyRule {
    Name(usize),
    Phone(usize),
    NameAndPhone(usize, usize),
}

impl KeyRule {
    fn resolve(
        table: &Table,
        mode: MatchMode,
        selection: &ColumnSelection,
        side: Side,
    ) -> Result<Self, ReconError> {
        let idx = |role: Role| -> Result<usize, ReconError> {
            let column = selection.get(role).ok_or_else(|| ReconError::UnknownColumn {
                side,
                column: format!("<no {role} column selected>"),
            })?;
            table.column_index(column).ok_or_else(|| ReconError::UnknownColumn {
                side,
                column: column.to_string(),
            })
        };

        Ok(match mode {
            MatchMode::ByName => KeyRule::Name(idx(Role::Name)?),
            MatchMode::ByPhone => KeyRule::Phone(idx(Role::Phone)?),
            MatchMode::ByNameAndPhone => KeyRule::NameAndPhone(idx(Role::Name)?, idx(Role::Phone)?),
        })
    }

    /// Key for one row, plus whether any part of it came out blank.
    fn apply(&self, row: &[CellValue], join: &JoinConfig) -> (MatchKey, bool) {
        match *self {
            KeyRule::Name(i) => {
                let key = MatchKey(normalize_name(&row[i].as_text()));
                let blank = key.is_blank();
                (key, blank)
            }
            KeyRule::Phone(i) => {
                let key = MatchKey(normalize_phone(&row[i].as_text(), join.phone_digits));
                let blank = key.is_blank();
                (key, blank)
            }
            KeyRule::NameAndPhone(n, p) => {
                let (name, phone) = (row[n].as_text(), row[p].as_text());
                let blank = normalize_name(&name).is_empty()
                    || normalize_phone(&phone, join.phone_digits).is_empty();
                (MatchKey(combined_key(&name, &phone, join)), blank)
            }
        }
    }
}

/// Attach a match key to every row of `table`.
///
/// With `join.skip_blank_keys` set, rows whose key (or any part of a combined
/// key) is empty are dropped here and never reach the join.
pub fn normalize_key(
    table: Table,
    mode: MatchMode,
    selection: &ColumnSelection,
    join: &JoinConfig,
    side: Side,
) -> Result<KeyedTable, ReconError> {
    let rule = KeyRule::resolve(&table, mode, selection, side)?;

    let mut keys = Vec::with_capacity(table.len());
    let mut kept_rows = Vec::with_capacity(table.len());
    let mut blanks = 0usize;

    let Table { columns, rows } = table;
    for row in rows {
        let (key, blank) = rule.apply(&row, join);
        if blank {
            blanks += 1;
            if join.skip_blank_keys {
                continue;
            }
        }
        keys.push(key);
        kept_rows.push(row);
    }

    if blanks > 0 {
        if join.skip_blank_keys {
            log::info!("{side}: skipped {blanks} row(s) with a blank {mode} key");
        } else {
            log::warn!("{side}: {blanks} row(s) have a blank {mode} key and can match each other");
        }
    }

    Ok(KeyedTable {
        table: Table { columns, rows: kept_rows },
        keys,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: Vec<Vec<CellValue>>) -> Table {
        Table::from_rows(columns.iter().map(|s| s.to_string()).collect(), rows)
    }

    fn keys(keyed: &KeyedTable) -> Vec<&str> {
        keyed.keys.iter().map(|k| k.as_str()).collect()
    }

    #[test]
    fn name_is_trimmed_and_lowercased() {
        assert_eq!(normalize_name("  Jane DOE "), "jane doe");
        assert_eq!(normalize_name("\tÉLISE\n"), "élise");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn phone_keeps_last_ten_digits() {
        assert_eq!(normalize_phone("+91 98765-43210", 10), "9876543210");
        assert_eq!(normalize_phone("099 998 887 770", 10), "9998887770");
        assert_eq!(normalize_phone("0091987654321", 10), "1987654321");
    }

    #[test]
    fn short_phone_is_kept_whole() {
        assert_eq!(normalize_phone("12345", 10), "12345");
        assert_eq!(normalize_phone("(0) 12-34", 10), "01234");
        assert_eq!(normalize_phone("n/a", 10), "");
    }

    #[test]
    fn phone_keeps_unicode_digits() {
        assert_eq!(normalize_phone("९८७६५४३२१०", 10), "९८७६५४३२१०");
        assert_eq!(normalize_phone("+९१ ९८७६५-४३२१०", 10), "९८७६५४३२१०");
        assert_eq!(normalize_phone("٠١٢٣", 2), "٢٣");
    }

    #[test]
    fn combined_key_of_row() {
        let t = table(&["name", "phone"], vec![vec!["  Jane Doe ".into(), "+91-9876543210".into()]]);
        let keyed = normalize_key(
            t,
            MatchMode::ByNameAndPhone,
            &ColumnSelection::both("name", "phone"),
            &JoinConfig::default(),
            Side::Left,
        )
        .unwrap();
        assert_eq!(keys(&keyed), vec!["jane doe__9876543210"]);
        assert_eq!(
            keyed.keys[0].as_str(),
            combined_key("Jane Doe", "+91-9876543210", &JoinConfig::default())
        );
    }

    #[test]
    fn non_latin_phone_is_not_a_blank_key() {
        let t = table(&["phone"], vec![vec!["९८७६५४३२१०".into()], vec![CellValue::Empty]]);
        let join = JoinConfig { skip_blank_keys: true, ..JoinConfig::default() };
        let keyed = normalize_key(t, MatchMode::ByPhone, &ColumnSelection::by_phone("phone"), &join, Side::Left)
            .unwrap();
        assert_eq!(keys(&keyed), vec!["९८७६५४३२१०"]);
    }

    #[test]
    fn numeric_phone_cells() {
        let t = table(
            &["mobile"],
            vec![
                vec![CellValue::Int(919876543210)],
                vec![CellValue::Float(9876543210.0)],
            ],
        );
        let keyed = normalize_key(
            t,
            MatchMode::ByPhone,
            &ColumnSelection::by_phone("mobile"),
            &JoinConfig::default(),
            Side::Left,
        )
        .unwrap();
        assert_eq!(keys(&keyed), vec!["9876543210", "9876543210"]);
    }

    #[test]
    fn blank_cells_give_blank_keys_by_default() {
        let t = table(&["name"], vec![vec![CellValue::Empty], vec!["  ".into()], vec!["Ann".into()]]);
        let keyed = normalize_key(
            t,
            MatchMode::ByName,
            &ColumnSelection::by_name("name"),
            &JoinConfig::default(),
            Side::Left,
        )
        .unwrap();
        assert_eq!(keys(&keyed), vec!["", "", "ann"]);
        assert_eq!(keyed.table.len(), 3);
    }

    #[test]
    fn skip_blank_keys_drops_rows() {
        let t = table(
            &["name", "phone"],
            vec![
                vec!["Ann".into(), CellValue::Empty],
                vec!["".into(), "123".into()],
                vec!["Bob".into(), "5551234567".into()],
            ],
        );
        let join = JoinConfig { skip_blank_keys: true, ..JoinConfig::default() };
        let keyed = normalize_key(
            t,
            MatchMode::ByNameAndPhone,
            &ColumnSelection::both("name", "phone"),
            &join,
            Side::Right,
        )
        .unwrap();
        assert_eq!(keys(&keyed), vec!["bob__5551234567"]);
        assert_eq!(keyed.table.rows[0][0], CellValue::text("Bob"));
    }

    #[test]
    fn combined_key_with_blank_phone_still_matches_by_default() {
        let t = table(&["name", "phone"], vec![vec!["Ann".into(), CellValue::Empty]]);
        let keyed = normalize_key(
            t,
            MatchMode::ByNameAndPhone,
            &ColumnSelection::both("name", "phone"),
            &JoinConfig::default(),
            Side::Left,
        )
        .unwrap();
        assert_eq!(keys(&keyed), vec!["ann__"]);
    }

    #[test]
    fn missing_column_is_reported() {
        let t = table(&["name"], vec![]);
        let err = normalize_key(
            t,
            MatchMode::ByPhone,
            &ColumnSelection::by_phone("mobile"),
            &JoinConfig::default(),
            Side::Right,
        )
        .unwrap_err();
        assert!(matches!(err, ReconError::UnknownColumn { side: Side::Right, .. }));
    }

    #[test]
    fn custom_digit_count_and_separator() {
        let join = JoinConfig {
            phone_digits: 8,
            key_separator: "|".into(),
            ..JoinConfig::default()
        };
        assert_eq!(combined_key("A", "+44 20 7946 0958", &join), "a|79460958");
    }
}
