// Column classification: which headers can serve as name / phone sources.
// Pure inspection of header text, no cell data is read.

use std::collections::HashMap;

use dupcheck_core::header::normalize_header;
use dupcheck_core::Table;

use crate::config::RoleConfig;
use crate::error::ReconError;
use crate::model::{Candidates, MatchMode, Role, Side};

/// Every column whose name contains any of `substrings`, in column order.
/// An empty result means the role could not be detected.
pub fn classify<S: AsRef<str>>(columns: &[String], substrings: &[S]) -> Vec<String> {
    columns
        .iter()
        .filter(|col| substrings.iter().any(|s| col.contains(s.as_ref())))
        .cloned()
        .collect()
}

/// Rename every header to its trimmed, lower-cased form.
///
/// Two headers collapsing to the same name is an error rather than a silent
/// pick of either column.
pub fn normalize_headers(mut table: Table, side: Side) -> Result<Table, ReconError> {
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(table.columns.len());
    let mut normalized = Vec::with_capacity(table.columns.len());

    for (idx, raw) in table.columns.iter().enumerate() {
        let norm = normalize_header(raw);
        if let Some(&first) = seen.get(&norm) {
            return Err(ReconError::DuplicateColumn {
                side,
                first: table.columns[first].clone(),
                second: raw.clone(),
                normalized: norm,
            });
        }
        seen.insert(norm.clone(), idx);
        normalized.push(norm);
    }

    table.columns = normalized;
    Ok(table)
}

/// Candidate columns for both roles.
pub fn detect(table: &Table, roles: &RoleConfig) -> Candidates {
    Candidates {
        name: classify(&table.columns, roles.substrings(Role::Name)),
        phone: classify(&table.columns, roles.substrings(Role::Phone)),
    }
}

/// Fail with `RoleNotDetected` if any role the mode needs has no candidate.
pub fn require_roles(candidates: &Candidates, mode: MatchMode, side: Side) -> Result<(), ReconError> {
    for &role in mode.roles() {
        if candidates.for_role(role).is_empty() {
            log::debug!("{side}: no {role} column among candidates {candidates:?}");
            return Err(ReconError::RoleNotDetected { role, side });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn classify_keeps_column_order() {
        let columns = cols(&["roll no", "student name", "father name", "mobile no", "phone 2"]);
        assert_eq!(classify(&columns, &["name"]), vec!["student name", "father name"]);
        assert_eq!(classify(&columns, &["mobile", "phone"]), vec!["mobile no", "phone 2"]);
    }

    #[test]
    fn classify_empty_when_nothing_matches() {
        let columns = cols(&["id", "email"]);
        assert!(classify(&columns, &["name"]).is_empty());
    }

    #[test]
    fn classify_is_substring_match() {
        let columns = cols(&["username", "telephone"]);
        assert_eq!(classify(&columns, &["name"]), vec!["username"]);
        assert_eq!(classify(&columns, &["phone"]), vec!["telephone"]);
    }

    #[test]
    fn column_matching_several_substrings_listed_once() {
        let columns = cols(&["mobile phone"]);
        assert_eq!(classify(&columns, &["mobile", "phone"]), vec!["mobile phone"]);
    }

    #[test]
    fn headers_are_trimmed_and_lowercased() {
        let table = Table::new(cols(&["  Student Name ", "MOBILE"]));
        let table = normalize_headers(table, Side::Left).unwrap();
        assert_eq!(table.columns, cols(&["student name", "mobile"]));
    }

    #[test]
    fn colliding_headers_are_rejected() {
        let table = Table::new(cols(&["Name", "id", " name"]));
        let err = normalize_headers(table, Side::Right).unwrap_err();
        match err {
            ReconError::DuplicateColumn { side, first, second, normalized } => {
                assert_eq!(side, Side::Right);
                assert_eq!(first, "Name");
                assert_eq!(second, " name");
                assert_eq!(normalized, "name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn require_roles_by_mode() {
        let cands = Candidates { name: cols(&["name"]), phone: vec![] };
        assert!(require_roles(&cands, MatchMode::ByName, Side::Left).is_ok());
        let err = require_roles(&cands, MatchMode::ByNameAndPhone, Side::Left).unwrap_err();
        assert!(matches!(err, ReconError::RoleNotDetected { role: Role::Phone, side: Side::Left }));
        assert!(require_roles(&cands, MatchMode::ByPhone, Side::Right).is_err());
    }

    #[test]
    fn detect_uses_configured_substrings() {
        let table = Table::new(cols(&["full name", "contact", "mobile"]));
        let roles = RoleConfig {
            name: vec!["name".into()],
            phone: vec!["contact".into()],
        };
        let cands = detect(&table, &roles);
        assert_eq!(cands.name, cols(&["full name"]));
        assert_eq!(cands.phone, cols(&["contact"]));
    }
}
