//! CLI Exit Code Registry
//!
//! Single source of truth for `rollcall` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error                                        |
//! | 2    | Usage error (bad args, missing option)               |
//! | 3    | Run config does not parse or validate                |
//! | 4    | Runtime / IO failure (unreadable input, write error) |
//! | 5    | Diagnostics present under `--fail-on-diagnostics`    |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
/// Clap exits with the same code for its own parse failures.
pub const EXIT_USAGE: u8 = 2;

/// Run config is not valid TOML or fails validation.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 3;

/// A file could not be read, decoded, or written.
pub const EXIT_RECON_RUNTIME: u8 = 4;

/// The run finished but reported diagnostics, and the caller asked to fail.
pub const EXIT_RECON_DIAGNOSTICS: u8 = 5;
