//! Type model error codes following a structured numbering system
//!
//! Error code ranges:
//! - CQL0001-CQL0099: Syntax errors (generic signatures, model scripts)
//! - CQL0100-CQL0199: Semantic errors (resolution, redeclaration, instantiation)
//! - CQL0300-CQL0399: Model construction errors

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a syntax error (0001-0099)
    pub const fn is_syntax_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a semantic error (0100-0199)
    pub const fn is_semantic_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a model construction error (0300-0399)
    pub const fn is_model_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CQL{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Syntax errors (0001-0099)
    map.insert(
        1,
        ErrorInfo::new("Invalid generic signature")
            .with_help("Type parameters are declared as `T` or `T extends TypeName`"),
    );
    map.insert(2, ErrorInfo::new("Invalid model script statement"));

    // Semantic errors (0100-0199)
    map.insert(
        100,
        ErrorInfo::new("Undefined type")
            .with_help("Register the type before referencing it in a signature"),
    );
    map.insert(101, ErrorInfo::new("Unresolved type parameter symbol"));
    map.insert(
        102,
        ErrorInfo::new("Invalid element redeclaration")
            .with_help("An inherited element may only be narrowed to a subtype of its declared type"),
    );
    map.insert(103, ErrorInfo::new("Ambiguous generic instantiation"));

    // Model construction errors (0300-0399)
    map.insert(300, ErrorInfo::new("Invalid model element"));

    map
});

// Syntax errors
pub const CQL0001: ErrorCode = ErrorCode::new(1);
pub const CQL0002: ErrorCode = ErrorCode::new(2);

// Semantic errors
pub const CQL0100: ErrorCode = ErrorCode::new(100);
pub const CQL0101: ErrorCode = ErrorCode::new(101);
pub const CQL0102: ErrorCode = ErrorCode::new(102);
pub const CQL0103: ErrorCode = ErrorCode::new(103);

// Model construction errors
pub const CQL0300: ErrorCode = ErrorCode::new(300);
