//! chdctl - terminal client for CHD risk assessment
//!
//! Interactive form, one-shot scoring and model inspection, all against a
//! locally loaded pipeline artifact.

pub mod cli;
pub mod commands;
pub mod errors;
pub mod output;
pub mod tui;
