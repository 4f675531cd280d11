// Command implementations: columns, preview, compare, config

use std::path::{Path, PathBuf};

use dupcheck_config::Settings;
use dupcheck_core::Table;
use dupcheck_io::{load_table, save_table, LoadOptions};
use dupcheck_recon::model::{Candidates, ColumnSelection, Role, Side};
use dupcheck_recon::{inspect, run, MatchMode, MatchRequest};
use serde::Serialize;

use crate::util::{render_table, row_limit};
use crate::CliError;

/// `--config` is strict; the per-user file falls back to defaults.
fn load_settings(config: Option<&Path>) -> Result<Settings, CliError> {
    match config {
        Some(path) => Settings::load_from(path).map_err(CliError::settings),
        None => Ok(Settings::load()),
    }
}

fn load(path: &Path, sheet: Option<String>) -> Result<Table, CliError> {
    load_table(path, &LoadOptions { sheet }).map_err(|e| CliError::input(path, e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::general(format!("JSON encoding failed: {e}")))
}

// ============================================================================
// columns
// ============================================================================

#[derive(Serialize)]
struct FileColumns {
    side: Side,
    path: String,
    columns: Vec<String>,
    candidates: Candidates,
}

pub fn cmd_columns(
    config: Option<&Path>,
    file1: PathBuf,
    file2: PathBuf,
    sheet1: Option<String>,
    sheet2: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let settings = load_settings(config)?;

    let mut files = Vec::with_capacity(2);
    for (side, path, sheet) in [(Side::Left, file1, sheet1), (Side::Right, file2, sheet2)] {
        let table = load(&path, sheet)?;
        let (table, candidates) =
            inspect(table, side, &settings.link).map_err(|e| CliError::recon(e, &settings.link.roles))?;
        files.push(FileColumns {
            side,
            path: path.display().to_string(),
            columns: table.columns,
            candidates,
        });
    }

    if json {
        println!("{}", to_json(&files)?);
        return Ok(());
    }

    let list = |cols: &[String]| if cols.is_empty() { "(none)".to_string() } else { cols.join(", ") };
    for file in &files {
        println!("{} ({}):", file.side, file.path);
        println!("  columns: {}", list(&file.columns));
        println!("  name:    {}", list(&file.candidates.name));
        println!("  phone:   {}", list(&file.candidates.phone));
    }
    Ok(())
}

// ============================================================================
// preview
// ============================================================================

pub fn cmd_preview(
    config: Option<&Path>,
    file: PathBuf,
    sheet: Option<String>,
    rows: Option<usize>,
) -> Result<(), CliError> {
    let settings = load_settings(config)?;
    let rows = rows.unwrap_or(settings.preview.rows);
    let table = load(&file, sheet)?;

    println!("{}: {} row(s), {} column(s)", file.display(), table.len(), table.width());
    print!("{}", render_table(&table, row_limit(rows)));
    Ok(())
}

// ============================================================================
// compare
// ============================================================================

pub struct CompareArgs {
    pub file1: PathBuf,
    pub file2: PathBuf,
    pub mode: MatchMode,
    pub name1: Option<String>,
    pub name2: Option<String>,
    pub phone1: Option<String>,
    pub phone2: Option<String>,
    pub sheet1: Option<String>,
    pub sheet2: Option<String>,
    pub output: Option<PathBuf>,
    pub export: bool,
    pub json: bool,
    pub limit: Option<usize>,
    pub quiet: bool,
}

/// Operator column choices for one file. Choices the mode doesn't use are dropped.
fn selection(mode: MatchMode, name: Option<String>, phone: Option<String>, file_no: u8) -> ColumnSelection {
    let mut selection = ColumnSelection::default();
    for (role, choice) in [(Role::Name, name), (Role::Phone, phone)] {
        let Some(choice) = choice else { continue };
        if mode.roles().contains(&role) {
            selection.set(role, choice);
        } else {
            log::warn!("--{role}{file_no} is ignored when matching by {mode}");
        }
    }
    selection
}

pub fn cmd_compare(config: Option<&Path>, args: CompareArgs) -> Result<(), CliError> {
    let settings = load_settings(config)?;
    let mode = args.mode;

    let left = load(&args.file1, args.sheet1)?;
    let right = load(&args.file2, args.sheet2)?;

    let request = MatchRequest::new(mode)
        .with_left(selection(mode, args.name1, args.phone1, 1))
        .with_right(selection(mode, args.name2, args.phone2, 2));

    let outcome =
        run(left, right, &request, &settings.link).map_err(|e| CliError::recon(e, &settings.link.roles))?;

    if !args.quiet {
        if outcome.is_empty() {
            eprintln!("No matching students found.");
        } else {
            eprintln!("Found {} matching students.", outcome.result.len());
        }
    }

    if args.json {
        println!("{}", to_json(&outcome)?);
    } else if !outcome.is_empty() {
        let limit = args.limit.unwrap_or(settings.preview.rows);
        print!("{}", render_table(&outcome.result, row_limit(limit)));
    }

    let target = match (args.output, args.export) {
        (Some(path), _) => Some(path),
        (None, true) => Some(settings.export.target(mode.default_file_name())),
        (None, false) => None,
    };
    let Some(path) = target else {
        return Ok(());
    };

    if outcome.is_empty() {
        log::info!("nothing to export, {} not written", path.display());
        return Ok(());
    }

    save_table(&outcome.result, &path, outcome.sheet_name()).map_err(|e| {
        CliError::export(e).with_hint("check that the target directory exists and the file is not open elsewhere")
    })?;
    if !args.quiet {
        eprintln!("Exported {} row(s) to {}", outcome.result.len(), path.display());
    }
    Ok(())
}

// ============================================================================
// config
// ============================================================================

pub fn cmd_config_path(config: Option<&Path>) -> Result<(), CliError> {
    match config {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", Settings::config_path_display()),
    }
    Ok(())
}

pub fn cmd_config_init(config: Option<&Path>) -> Result<(), CliError> {
    let path = config.map(Path::to_path_buf).unwrap_or_else(Settings::config_path);
    if Settings::write_default(&path).map_err(CliError::settings)? {
        println!("Created {}", path.display());
    } else {
        println!("{} already exists; left unchanged", path.display());
    }
    Ok(())
}
