//! TUI Module - full-screen assessment form
//!
//! - event_loop: terminal setup and key dispatch
//! - render: drawing the form, results and model panel
//! - state: field buffers, validation and focus

mod event_loop;
mod render;
mod state;

pub use event_loop::run;
pub use state::{FieldInput, FormAction, FormField, FormState};
