//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success, including a comparison that found no matches     |
//! | 1    | General error (unspecified)                               |
//! | 2    | CLI usage error (bad args, bad settings file)             |
//! | 3    | An input file could not be read or parsed                 |
//! | 4    | A required name / phone column was not detected           |
//! | 5    | Invalid column selection or clashing headers              |
//! | 6    | The result could not be exported                         |

use dupcheck_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, invalid settings.
pub const EXIT_USAGE: u8 = 2;

/// Input file missing, unreadable, or not a table.
pub const EXIT_INPUT_PARSE: u8 = 3;

/// No name-like or mobile/phone-like column in one of the files.
pub const EXIT_ROLE_NOT_DETECTED: u8 = 4;

/// Selected column missing, or two headers normalize to the same name.
pub const EXIT_SELECTION: u8 = 5;

/// Writing the export file failed.
pub const EXIT_EXPORT: u8 = 6;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::RoleNotDetected { .. } => EXIT_ROLE_NOT_DETECTED,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_USAGE,
        e if e.is_selection_error() => EXIT_SELECTION,
        _ => EXIT_ERROR,
    }
}
