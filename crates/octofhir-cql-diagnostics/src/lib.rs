//! Type model diagnostics
//!
//! This crate provides the error reporting infrastructure shared by the
//! CQL type model and its tooling: structured error codes and
//! diagnostics with related notes.

mod error;
mod error_code;

pub use error::*;
pub use error_code::*;
