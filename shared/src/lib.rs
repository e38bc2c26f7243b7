//! Shared types for the quotebook workspace
//!
//! Contains the quote data model, the shared validation errors and the
//! logging setup used by every binary in the workspace.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
