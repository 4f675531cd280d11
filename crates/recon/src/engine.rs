use std::collections::HashSet;

use dupcheck_core::header::normalize_header;
use dupcheck_core::Table;

use crate::classify::{detect, normalize_headers, require_roles};
use crate::config::LinkConfig;
use crate::error::ReconError;
use crate::join::join;
use crate::model::{
    Candidates, ColumnSelection, MatchMeta, MatchMode, MatchOutcome, MatchRequest, MatchSummary, Side,
};
use crate::normalize::normalize_key;
use crate::project::project;

/// Normalize headers and detect role candidates for one table.
pub fn inspect(table: Table, side: Side, config: &LinkConfig) -> Result<(Table, Candidates), ReconError> {
    let table = normalize_headers(table, side)?;
    let candidates = detect(&table, &config.roles);
    Ok((table, candidates))
}

/// Run one comparison: classify, derive keys, join, project.
///
/// Stateless; the same inputs always give the same result table.
pub fn run(
    left: Table,
    right: Table,
    request: &MatchRequest,
    config: &LinkConfig,
) -> Result<MatchOutcome, ReconError> {
    let mode = request.mode;

    let (left, left_candidates) = inspect(left, Side::Left, config)?;
    let (right, right_candidates) = inspect(right, Side::Right, config)?;

    require_roles(&left_candidates, mode, Side::Left)?;
    require_roles(&right_candidates, mode, Side::Right)?;

    let left_selection = resolve_selection(&left, &left_candidates, &request.left, mode, Side::Left)?;
    let right_selection = resolve_selection(&right, &right_candidates, &request.right, mode, Side::Right)?;

    let left_rows = left.len();
    let right_rows = right.len();

    let left_keyed = normalize_key(left, mode, &left_selection, &config.join, Side::Left)?;
    let right_keyed = normalize_key(right, mode, &right_selection, &config.join, Side::Right)?;

    let joined = join(&left_keyed, &right_keyed, &config.join)?;
    let distinct_keys = joined.keys.iter().collect::<HashSet<_>>().len();
    let result = project(joined);

    if result.is_empty() {
        log::info!("{mode} comparison: no matching rows ({left_rows} x {right_rows})");
    } else {
        log::info!(
            "{mode} comparison: {} matched row(s) over {distinct_keys} key(s) ({left_rows} x {right_rows})",
            result.len()
        );
    }

    Ok(MatchOutcome {
        meta: MatchMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary: MatchSummary {
            mode,
            left_rows,
            right_rows,
            matched_rows: result.len(),
            distinct_keys,
            left_selection,
            right_selection,
        },
        result,
    })
}

/// Fill in the columns a mode needs.
///
/// Operator choices are matched against normalized headers; a missing choice
/// defaults to the first candidate. Choosing a column that exists but was not
/// detected as a candidate is allowed.
fn resolve_selection(
    table: &Table,
    candidates: &Candidates,
    requested: &ColumnSelection,
    mode: MatchMode,
    side: Side,
) -> Result<ColumnSelection, ReconError> {
    let mut resolved = ColumnSelection::default();

    for &role in mode.roles() {
        let column = match requested.get(role) {
            Some(choice) => {
                let column = normalize_header(choice);
                if table.column_index(&column).is_none() {
                    return Err(ReconError::UnknownColumn { side, column: choice.to_string() });
                }
                if !candidates.for_role(role).contains(&column) {
                    log::warn!("{side}: column {column:?} was not detected as a {role} column");
                }
                column
            }
            None => {
                let candidates = candidates.for_role(role);
                let Some(first) = candidates.first() else {
                    return Err(ReconError::RoleNotDetected { role, side });
                };
                if candidates.len() > 1 {
                    log::info!("{side}: using {role} column {first:?} (of {})", candidates.len());
                }
                first.clone()
            }
        };
        resolved.set(role, column);
    }

    Ok(resolved)
}
