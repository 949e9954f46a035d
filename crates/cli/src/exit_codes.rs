//! CLI Exit Code Registry
//!
//! This is the single source of truth for all `wardpop` exit codes.
//! Exit codes are part of the shell contract: pipelines branch on them.
//!
//! # Exit Codes
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | CLI usage error (bad args; emitted by clap)              |
//! | 3    | Source error: input missing, unreadable or malformed     |
//! | 4    | Config error: unreadable, unparseable or invalid TOML    |
//! | 5    | Output error: a result file could not be written         |
//! | 6    | Match rate below `--min-match-rate` (outputs written)    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
#[allow(dead_code)]
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments. clap exits with this code itself.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

/// Page dump, population table or geometry could not be opened or parsed.
pub const EXIT_SOURCE: u8 = 3;

/// Config file unreadable, not valid TOML, or failed validation.
pub const EXIT_CONFIG: u8 = 4;

/// Output CSV, GeoJSON or report could not be written.
pub const EXIT_OUTPUT: u8 = 5;

/// Reconciliation finished but the match rate is below the requested floor.
pub const EXIT_MATCH_RATE: u8 = 6;
