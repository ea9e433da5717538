//! CLI Exit Code Registry
//!
//! Single source of truth for `courtsync` exit codes. Schedulers and shell
//! scripts branch on these, so existing values never change meaning.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | Usage error (bad arguments, missing source)              |
//! | 3    | Invalid config (TOML parse or validation failure)        |
//! | 4    | Input/runtime failure (unreadable table, missing column) |
//! | 5    | Records need attention and `--strict` was given          |
//! | 6    | Government data fetch failed                             |
//! | 7    | Applying updates failed; nothing was written             |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, no federal or government source configured.
pub const EXIT_USAGE: u8 = 2;

/// Config could not be parsed or failed validation.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// A source could not be read or lacks a required column, or output could not be written.
pub const EXIT_RUNTIME: u8 = 4;

/// `run --strict` found mismatches or records needing manual review.
pub const EXIT_NEEDS_ATTENTION: u8 = 5;

/// Network failure, non-success status, or a response without locations.
pub const EXIT_FETCH: u8 = 6;

/// The update transaction failed and was rolled back.
pub const EXIT_APPLY: u8 = 7;
