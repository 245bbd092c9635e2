//! Diagnostics
//!
//! Records what type resolution quietly degraded on. None of these stop a
//! file from generating; they exist so a caller can surface them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::resolve::RejectedMatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// No package prefix matched; the last segment was used as a local name
    UnresolvedType,
    /// A package matched but its file is not a declared dependency
    UndeclaredDependency,
}

impl DiagnosticCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnresolvedType => "W001",
            Self::UndeclaredDependency => "I001",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::UnresolvedType => Severity::Warning,
            Self::UndeclaredDependency => Severity::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

impl Severity {
    fn label(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// One degraded type reference in one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticItem {
    pub file: String,
    pub code: DiagnosticCode,
    /// The reference as written in the schema
    pub type_name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl DiagnosticItem {
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for DiagnosticItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}[{}]: {}",
            self.file,
            self.severity().label(),
            self.code.code(),
            self.message
        )?;
        for note in &self.notes {
            write!(f, "\n  note: {}", note)?;
        }
        Ok(())
    }
}

/// Per-file diagnostics in the order they were first raised.
///
/// A type referenced several times in one file is reported once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<DiagnosticItem>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when an identical item was already recorded.
    pub fn push(&mut self, item: DiagnosticItem) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// A type reference fell back to its last segment.
    pub fn unresolved_type(&mut self, file: &str, type_name: &str, rejected: &[RejectedMatch]) -> bool {
        self.push(DiagnosticItem {
            file: file.to_string(),
            code: DiagnosticCode::UnresolvedType,
            type_name: type_name.to_string(),
            message: format!("type '{}' matched no known package; using its last segment", type_name),
            notes: rejected
                .iter()
                .map(|r| format!("package '{}' is defined in '{}', which is not a dependency", r.package, r.defined_in))
                .collect(),
        })
    }

    /// A package match was skipped but a shorter prefix still resolved.
    pub fn undeclared_dependency(&mut self, file: &str, type_name: &str, rejected: &RejectedMatch) -> bool {
        self.push(DiagnosticItem {
            file: file.to_string(),
            code: DiagnosticCode::UndeclaredDependency,
            type_name: type_name.to_string(),
            message: format!(
                "type '{}': skipped package '{}' from undeclared dependency '{}'",
                type_name, rejected.package, rejected.defined_in
            ),
            notes: Vec::new(),
        })
    }

    pub fn all(&self) -> &[DiagnosticItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiagnosticItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.severity() == Severity::Warning)
            .count()
    }
}
