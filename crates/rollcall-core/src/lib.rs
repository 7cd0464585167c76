//! Core domain types for the rollcall attendance terminal.
//!
//! Everything here is pure: identifier normalization, the session flag and the
//! tagged outcomes that flow between the scan pipeline stages. Hardware,
//! network and loop concerns live in the sibling crates.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
