//! Type model errors

use octofhir_cql_diagnostics::{
    CQL0001, CQL0100, CQL0101, CQL0102, CQL0103, CQL0300, Diagnostic, ErrorCode, RelatedInfo,
};
use thiserror::Error;

/// Errors raised while building or checking types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A constructor received malformed input (e.g. an empty name)
    #[error("{context} requires a non-empty {argument}")]
    InvalidArgument { context: String, argument: String },

    /// An inherited element was redeclared with an incompatible type
    #[error(
        "{class_name}.{element_name} cannot be redeclared with type {redeclared_type} because it is not a subtype of the original element type {original_type}"
    )]
    InvalidRedeclaration {
        class_name: String,
        element_name: String,
        original_type: String,
        redeclared_type: String,
    },

    /// More than one conversion target could instantiate a generic type
    #[error("Ambiguous generic instantiation involving {call_type} to {first} and {second}")]
    AmbiguousInstantiation {
        call_type: String,
        first: String,
        second: String,
    },

    /// A type name is not present in the type registry
    #[error("Unknown type {name}")]
    UnknownType { name: String },

    /// A single-character type argument does not name a declared type parameter
    #[error("Cannot resolve symbol {symbol} in {signature}")]
    UnresolvedSymbol { symbol: String, signature: String },

    /// A generic signature or parameter declaration is malformed
    #[error("Invalid signature syntax in `{text}`: {reason}")]
    InvalidSyntax { text: String, reason: String },
}

/// Result type for type model operations
pub type Result<T> = std::result::Result<T, ModelError>;

impl ModelError {
    /// Create an invalid argument error
    pub fn invalid_argument(context: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::InvalidArgument {
            context: context.into(),
            argument: argument.into(),
        }
    }

    /// Create an unknown type error
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    /// Create an invalid syntax error
    pub fn invalid_syntax(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Get the diagnostic error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidSyntax { .. } => CQL0001,
            Self::UnknownType { .. } => CQL0100,
            Self::UnresolvedSymbol { .. } => CQL0101,
            Self::InvalidRedeclaration { .. } => CQL0102,
            Self::AmbiguousInstantiation { .. } => CQL0103,
            Self::InvalidArgument { .. } => CQL0300,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string());
        match self {
            Self::InvalidRedeclaration {
                element_name,
                original_type,
                ..
            } => diag.with_related(RelatedInfo::new(format!(
                "{element_name} is inherited with type {original_type}"
            ))),
            Self::AmbiguousInstantiation { first, second, .. } => diag.with_related(
                RelatedInfo::new(format!("candidate conversions: {first}, {second}")),
            ),
            _ => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ModelError::unknown_type("Person").code(), CQL0100);
        assert_eq!(ModelError::invalid_syntax("T U", "bad").code(), CQL0001);
        assert_eq!(ModelError::invalid_argument("ClassType", "name").code(), CQL0300);
    }

    #[test]
    fn test_redeclaration_message_names_both_types() {
        let err = ModelError::InvalidRedeclaration {
            class_name: "Derived".to_string(),
            element_name: "value".to_string(),
            original_type: "Integer".to_string(),
            redeclared_type: "String".to_string(),
        };

        let message = err.to_string();
        assert!(message.starts_with("Derived.value cannot be redeclared with type String"));
        assert!(message.ends_with("original element type Integer"));

        let diag = err.to_diagnostic();
        assert_eq!(diag.code, CQL0102);
        assert_eq!(diag.related.len(), 1);
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = ModelError::invalid_argument("TupleTypeElement", "name");
        assert_eq!(err.to_string(), "TupleTypeElement requires a non-empty name");
    }
}
