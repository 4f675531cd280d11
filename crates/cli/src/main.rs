// dupcheck - find students present in two roster files
// Headless front end over dupcheck-recon

mod commands;
mod exit_codes;
mod logging;
mod util;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use dupcheck_config::SettingsError;
use dupcheck_io::{ExportError, LoadError};
use dupcheck_recon::config::RoleConfig;
use dupcheck_recon::{MatchMode, ReconError};

use exit_codes::{
    recon_exit_code, EXIT_ERROR, EXIT_EXPORT, EXIT_INPUT_PARSE, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "dupcheck")]
#[command(about = "Find students listed in both of two roster files")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file to use instead of the per-user one
    #[arg(long, global = true, env = "DUPCHECK_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the name and phone columns detected in each file
    #[command(after_help = "\
Examples:
  dupcheck columns class5.xlsx transport.csv
  dupcheck columns a.xlsx b.xlsx --sheet1 Roster --json")]
    Columns {
        /// First roster (.csv, .tsv, .xlsx, .xls, .xlsb, .ods)
        file1: PathBuf,

        /// Second roster
        file2: PathBuf,

        /// Worksheet of the first file (default: first sheet)
        #[arg(long)]
        sheet1: Option<String>,

        /// Worksheet of the second file (default: first sheet)
        #[arg(long)]
        sheet2: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the first rows of a file
    Preview {
        /// File to show
        file: PathBuf,

        /// Worksheet (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Rows to show (default from settings, 0 for all)
        #[arg(long, short = 'n')]
        rows: Option<usize>,
    },

    /// Match two rosters and show the rows they share
    #[command(after_help = "\
Examples:
  dupcheck compare class5.xlsx transport.xlsx --by name
  dupcheck compare a.csv b.csv --by phone --export
  dupcheck compare a.xlsx b.xlsx --by name-phone --name1 'Student Name' -o both.xlsx
  dupcheck compare a.csv b.csv --by name --json > matches.json")]
    Compare {
        /// First roster
        file1: PathBuf,

        /// Second roster
        file2: PathBuf,

        /// Which columns link the rosters
        #[arg(long, value_enum)]
        by: ModeArg,

        /// Name column of the first file (default: first detected)
        #[arg(long, value_name = "COLUMN")]
        name1: Option<String>,

        /// Name column of the second file
        #[arg(long, value_name = "COLUMN")]
        name2: Option<String>,

        /// Phone column of the first file (default: first detected)
        #[arg(long, value_name = "COLUMN")]
        phone1: Option<String>,

        /// Phone column of the second file
        #[arg(long, value_name = "COLUMN")]
        phone2: Option<String>,

        /// Worksheet of the first file
        #[arg(long)]
        sheet1: Option<String>,

        /// Worksheet of the second file
        #[arg(long)]
        sheet2: Option<String>,

        /// Write the matches here (.xlsx, .csv, .tsv or .json)
        #[arg(long, short = 'o', conflicts_with = "export")]
        output: Option<PathBuf>,

        /// Write the matches to the default file for the mode
        /// (side_by_side_matches.xlsx or phone_matches.xlsx)
        #[arg(long)]
        export: bool,

        /// Print the full outcome as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Matched rows to print (default from settings, 0 for all)
        #[arg(long)]
        limit: Option<usize>,

        /// No status messages on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Settings file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the settings file path
    Path,
    /// Write a settings file with the defaults (never overwrites)
    Init,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    /// Same name (trimmed, case-insensitive)
    Name,
    /// Same last 10 phone digits
    Phone,
    /// Same name and same phone
    NamePhone,
}

impl From<ModeArg> for MatchMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Name => MatchMode::ByName,
            ModeArg::Phone => MatchMode::ByPhone,
            ModeArg::NamePhone => MatchMode::ByNameAndPhone,
        }
    }
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  dupcheck-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  dupcheck-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Columns { file1, file2, sheet1, sheet2, json } => {
            commands::cmd_columns(config, file1, file2, sheet1, sheet2, json)
        }
        Commands::Preview { file, sheet, rows } => commands::cmd_preview(config, file, sheet, rows),
        Commands::Compare {
            file1,
            file2,
            by,
            name1,
            name2,
            phone1,
            phone2,
            sheet1,
            sheet2,
            output,
            export,
            json,
            limit,
            quiet,
        } => commands::cmd_compare(
            config,
            commands::CompareArgs {
                file1,
                file2,
                mode: by.into(),
                name1,
                name2,
                phone1,
                phone2,
                sheet1,
                sheet2,
                output,
                export,
                json,
                limit,
                quiet,
            },
        ),
        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::cmd_config_path(config),
            ConfigCommands::Init => commands::cmd_config_init(config),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = &e.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(e.code)
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Input file error. Messages that don't already name the file get it prefixed.
    pub fn input(path: &Path, err: LoadError) -> Self {
        let hint = match &err {
            LoadError::UnsupportedFormat(_) => Some("save the roster as .xlsx or .csv".to_string()),
            LoadError::SheetNotFound { .. } => Some("pick one of the listed sheets".to_string()),
            _ => None,
        };
        let message = match &err {
            LoadError::Io { .. }
            | LoadError::NoHeader(_)
            | LoadError::ExtraFields { .. }
            | LoadError::UnsupportedFormat(_) => err.to_string(),
            _ => format!("{}: {err}", path.display()),
        };
        Self { code: EXIT_INPUT_PARSE, message, hint }
    }

    pub fn export(err: ExportError) -> Self {
        Self { code: EXIT_EXPORT, message: err.to_string(), hint: None }
    }

    pub fn settings(err: SettingsError) -> Self {
        Self::usage(err.to_string())
    }

    /// Create error from an engine error, with guidance phrased in terms of
    /// the configured header substrings.
    pub fn recon(err: ReconError, roles: &RoleConfig) -> Self {
        let code = recon_exit_code(&err);
        let hint = match &err {
            ReconError::RoleNotDetected { role, .. } => {
                let quoted: Vec<String> = roles
                    .substrings(*role)
                    .iter().map(|s| format!("\"{s}\"")).collect();
                Some(format!(
                    "the {} column header must contain {}",
                    role,
                    quoted.join(" or ")
                ))
            }
            ReconError::UnknownColumn { .. } => {
                Some("run `dupcheck columns FILE1 FILE2` to list the detected columns".to_string())
            }
            ReconError::DuplicateColumn { .. } => {
                Some("rename one of the columns; headers are compared trimmed and lower-cased".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use dupcheck_recon::model::{Role, Side};
    use exit_codes::{EXIT_ROLE_NOT_DETECTED, EXIT_SELECTION};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn output_conflicts_with_export() {
        let res = Cli::try_parse_from([
            "dupcheck", "compare", "a.csv", "b.csv", "--by", "name", "--export", "-o", "x.xlsx",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn mode_arg_maps() {
        let cli = Cli::try_parse_from(["dupcheck", "compare", "a.csv", "b.csv", "--by", "name-phone"]).unwrap();
        match cli.command {
            Commands::Compare { by, .. } => assert_eq!(MatchMode::from(by), MatchMode::ByNameAndPhone),
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn role_hint_lists_substrings() {
        let roles = RoleConfig::default();
        let err = CliError::recon(ReconError::RoleNotDetected { role: Role::Phone, side: Side::Right }, &roles);
        assert_eq!(err.code, EXIT_ROLE_NOT_DETECTED);
        assert_eq!(err.hint.as_deref(), Some("the phone column header must contain \"mobile\" or \"phone\""));
    }

    #[test]
    fn unknown_column_is_selection_error() {
        let err = CliError::recon(
            ReconError::UnknownColumn { side: Side::Left, column: "roll".into() },
            &RoleConfig::default(),
        );
        assert_eq!(err.code, EXIT_SELECTION);
        assert!(err.hint.is_some());
    }
}
