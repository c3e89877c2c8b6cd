//! Diagnostic reporting for type model errors

use crate::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An error diagnostic with optional help and related notes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context or help
    pub help: Option<String>,
    /// Related information
    pub related: Vec<RelatedInfo>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            help: None,
            related: Vec::new(),
        }
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Add related information
    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }

    /// Help text for this diagnostic, falling back to the error code's registered help
    pub fn effective_help(&self) -> Option<&str> {
        self.help.as_deref().or(self.code.info().help)
    }

    /// Render the diagnostic with terminal colors
    #[cfg(feature = "colored")]
    pub fn to_colored_string(&self) -> String {
        use colored::Colorize;

        let mut out = format!(
            "{}[{}]: {}",
            "error".red().bold(),
            self.code,
            self.message.bold()
        );
        for info in &self.related {
            out.push_str(&format!("\n  {} {}", "note:".cyan(), info.message));
        }
        if let Some(help) = self.effective_help() {
            out.push_str(&format!("\n  {} {}", "help:".green(), help));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {} - {}", self.code, self.message)?;
        for info in &self.related {
            write!(f, "\n  note: {}", info.message)?;
        }
        Ok(())
    }
}

/// Related diagnostic information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedInfo {
    /// Message explaining the relationship
    pub message: String,
}

impl RelatedInfo {
    /// Create new related info
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CQL0100, CQL0102};

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error(CQL0100, "Unknown type Person");

        let text = diag.to_string();
        assert!(text.contains("CQL0100"));
        assert!(text.starts_with("error"));
    }

    #[test]
    fn test_diagnostic_related_notes() {
        let diag = Diagnostic::error(CQL0102, "Derived.value cannot be redeclared")
            .with_related(RelatedInfo::new("originally declared as value:Integer"));

        assert_eq!(diag.related.len(), 1);
        assert!(diag.to_string().contains("note: originally declared"));
    }

    #[test]
    fn test_effective_help_falls_back_to_code_info() {
        let diag = Diagnostic::error(CQL0100, "Unknown type Person");
        assert_eq!(diag.effective_help(), CQL0100.info().help);

        let diag = diag.with_help("declare Person first");
        assert_eq!(diag.effective_help(), Some("declare Person first"));
    }
}
