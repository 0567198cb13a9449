//! Error codes and exit status for chdctl
//!
//! sysexits-style codes so scripts can tell a bad record from a missing model.

use chd_common::ChdError;

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the record or row is rejected
pub const EXIT_INVALID_INPUT: i32 = 65;

/// Exit code when the pipeline artifact cannot be loaded
pub const EXIT_MODEL_UNAVAILABLE: i32 = 70;

/// Exit code when the config file is unreadable or invalid
pub const EXIT_CONFIG_ERROR: i32 = 78;

/// Pick the exit code for an error chain
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ChdError>() {
        Some(e) if e.is_model_unavailable() => EXIT_MODEL_UNAVAILABLE,
        Some(e) if e.is_input_error() => EXIT_INVALID_INPUT,
        Some(ChdError::Config(_)) => EXIT_CONFIG_ERROR,
        _ => EXIT_GENERAL_ERROR,
    }
}
