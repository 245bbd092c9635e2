//! Type Reference Resolution
//!
//! Classifies a dotted type name, as it appears on a method's input or
//! output, as either a local name or a (module path, local name) import.
//!
//! Candidate packages are tried from the longest dotted prefix down to the
//! shortest, so `a.b.c.Msg` matches package `a.b.c` before `a.b`. A package
//! match only counts as an import when its defining file is a declared
//! dependency of the current file. When nothing matches, the last segment is
//! used as a local name rather than failing the run.
//!
//! The resolver has no state of its own; registering imports and assigning
//! aliases is the caller's job (see [`crate::context`]).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::descriptor::SchemaFile;
use crate::index::DescriptorIndex;

/// Result of resolving one type reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedType {
    Local {
        name: String,
    },
    Imported {
        module_path: String,
        local_name: String,
    },
}

impl ResolvedType {
    pub fn local(name: impl Into<String>) -> Self {
        Self::Local { name: name.into() }
    }

    pub fn imported(module_path: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self::Imported {
            module_path: module_path.into(),
            local_name: local_name.into(),
        }
    }

    /// Module path for imports
    pub fn module_path(&self) -> Option<&str> {
        match self {
            Self::Local { .. } => None,
            Self::Imported { module_path, .. } => Some(module_path),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Local { name } => name,
            Self::Imported { local_name, .. } => local_name,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local { .. })
    }
}

/// A package match that dependency gating refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedMatch {
    pub package: String,
    /// File the package index points at
    pub defined_in: String,
}

/// Outcome of one resolution, with what was skipped on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub resolved: ResolvedType,
    /// No prefix matched and the last segment was taken as a local name
    pub fallback: bool,
    /// Package matches that were not declared dependencies, longest first
    pub rejected: Vec<RejectedMatch>,
}

/// Resolves type references against a descriptor index
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'i, 'a> {
    index: &'i DescriptorIndex<'a>,
}

impl<'i, 'a> TypeResolver<'i, 'a> {
    pub fn new(index: &'i DescriptorIndex<'a>) -> Self {
        Self { index }
    }

    /// Resolve and drop the bookkeeping.
    pub fn resolve_type(&self, type_name: &str, current: &SchemaFile) -> ResolvedType {
        self.resolve(type_name, current).resolved
    }

    pub fn resolve(&self, type_name: &str, current: &SchemaFile) -> Resolution {
        let name = type_name.strip_prefix('.').unwrap_or(type_name);
        let segments: Vec<&str> = name.split('.').collect();
        let mut rejected = Vec::new();

        if segments.len() > 1 {
            for split in (1..segments.len()).rev() {
                let prefix = segments[..split].join(".");
                let rest = &segments[split..];

                if prefix == current.package {
                    let resolved = ResolvedType::local(nested_name(rest));
                    debug!(type_name, package = %prefix, "resolved in own package");
                    return Resolution { resolved, fallback: false, rejected };
                }

                let Some(owner) = self.index.package(&prefix) else {
                    continue;
                };

                if !current.depends_on(&owner.path) {
                    debug!(
                        type_name,
                        package = %prefix,
                        defined_in = %owner.path,
                        "package match is not a declared dependency"
                    );
                    rejected.push(RejectedMatch {
                        package: prefix,
                        defined_in: owner.path.clone(),
                    });
                    continue;
                }

                let module_path = owner.module_path();
                let resolved = if module_path == current.module_path() {
                    ResolvedType::local(nested_name(rest))
                } else {
                    ResolvedType::imported(module_path, nested_name(rest))
                };
                debug!(type_name, dependency = %owner.path, ?resolved, "resolved through dependency");
                return Resolution { resolved, fallback: false, rejected };
            }
        }

        let last = segments.last().copied().unwrap_or(name);
        Resolution {
            resolved: ResolvedType::local(exported_name(last)),
            fallback: segments.len() > 1,
            rejected,
        }
    }
}

/// Exported-name casing: first character upper-cased, the rest untouched.
pub fn exported_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `["Outer", "inner"]` -> `"Outer_Inner"`
fn nested_name(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| exported_name(s))
        .collect::<Vec<_>>()
        .join("_")
}
