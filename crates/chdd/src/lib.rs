//! chdd - CHD risk assessment web daemon
//!
//! Serves the single-page form, the result view and a small JSON API on top
//! of one loaded [`chd_common::RiskPredictor`].

pub mod pages;
pub mod routes;
pub mod server;

pub use server::{router, AppState};
