//! Per-File Generation Context
//!
//! Walks every method of every service in one schema file, resolves its
//! request and response types, registers imports in first-seen order and
//! assigns each imported module an alias. The result is plain data that a
//! template stage can render without further lookups.
//!
//! The alias table and import list are private to one build; contexts for
//! different files never share mutable state.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::alias::{AliasAssigner, AliasTable};
use crate::descriptor::{MethodKind, SchemaFile};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::index::DescriptorIndex;
use crate::resolve::{ResolvedType, TypeResolver};

// =============================================================================
// Context Records
// =============================================================================

/// One distinct imported module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub path: String,
    pub alias: String,
}

/// A type reference ready for substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    /// `alias.Name` for imports, `Name` for locals
    pub rendered: String,
    pub resolved: ResolvedType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodContext {
    pub name: String,
    /// `/pkg.Service/Method`
    pub procedure: String,
    pub kind: MethodKind,
    pub client_streaming: bool,
    pub server_streaming: bool,
    pub request: TypeRef,
    pub response: TypeRef,
}

impl MethodContext {
    pub fn request_type(&self) -> &str {
        &self.request.rendered
    }

    pub fn response_type(&self) -> &str {
        &self.response.rendered
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceContext {
    pub name: String,
    /// `pkg.Service`, or the bare name when the file has no package
    pub full_name: String,
    pub methods: Vec<MethodContext>,
}

/// Everything the template stage needs for one schema file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContext {
    /// Schema file path
    pub source: String,
    /// Declared dotted package
    pub proto_package: String,
    /// Package name for the generated file
    pub package_name: String,
    /// Schema base name up to its first dot
    pub file_name: String,
    /// Importable location of this file's own output
    pub module_path: String,
    pub services: Vec<ServiceContext>,
    /// Distinct imports in first-seen order
    pub imports: Vec<Import>,
    /// Any method streams in either direction
    pub is_stream: bool,
    #[serde(default, skip_serializing_if = "Diagnostics::is_empty")]
    pub diagnostics: Diagnostics,
}

impl FileContext {
    pub fn import_paths(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(|i| i.path.as_str())
    }

    pub fn alias_for(&self, module_path: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|i| i.path == module_path)
            .map(|i| i.alias.as_str())
    }

    pub fn method_count(&self) -> usize {
        self.services.iter().map(|s| s.methods.len()).sum()
    }
}

// =============================================================================
// Context Builder
// =============================================================================

/// Builds [`FileContext`]s against one compilation unit.
#[derive(Debug, Clone)]
pub struct ContextBuilder<'i, 'a> {
    resolver: TypeResolver<'i, 'a>,
    aliases: &'i AliasAssigner,
}

impl<'i, 'a> ContextBuilder<'i, 'a> {
    pub fn new(index: &'i DescriptorIndex<'a>, aliases: &'i AliasAssigner) -> Self {
        Self {
            resolver: TypeResolver::new(index),
            aliases,
        }
    }

    /// Build the context for `file`.
    ///
    /// Fails only when the file's own module hint cannot name a package;
    /// unresolvable type names degrade to local names with a diagnostic.
    pub fn build(&self, file: &SchemaFile) -> Result<FileContext> {
        let hint = file.parse_hint()?;

        let mut state = FileState {
            table: self.aliases.new_table(),
            imports: Vec::new(),
            diagnostics: Diagnostics::new(),
        };
        let mut is_stream = false;

        let services = file
            .services
            .iter()
            .map(|service| {
                let full_name = qualify(&file.package, &service.name);
                let methods = service
                    .methods
                    .iter()
                    .map(|method| {
                        is_stream |= method.is_streaming();
                        let request = self.type_ref(file, &method.input_type, &mut state);
                        let response = self.type_ref(file, &method.output_type, &mut state);
                        MethodContext {
                            name: method.name.clone(),
                            procedure: format!("/{}/{}", full_name, method.name),
                            kind: method.kind(),
                            client_streaming: method.client_streaming,
                            server_streaming: method.server_streaming,
                            request,
                            response,
                        }
                    })
                    .collect();
                ServiceContext {
                    name: service.name.clone(),
                    full_name,
                    methods,
                }
            })
            .collect();

        debug!(
            file = %file.path,
            imports = state.imports.len(),
            diagnostics = state.diagnostics.len(),
            "built file context"
        );

        Ok(FileContext {
            source: file.path.clone(),
            proto_package: file.package.clone(),
            package_name: hint.package_name,
            file_name: file.base_name().to_string(),
            module_path: hint
                .import_path
                .unwrap_or_else(|| file.path_stem().to_string()),
            services,
            imports: state.imports,
            is_stream,
            diagnostics: state.diagnostics,
        })
    }

    fn type_ref(&self, file: &SchemaFile, type_name: &str, state: &mut FileState) -> TypeRef {
        let resolution = self.resolver.resolve(type_name, file);

        if resolution.fallback {
            let first = state
                .diagnostics
                .unresolved_type(&file.path, type_name, &resolution.rejected);
            if first {
                warn!(
                    file = %file.path,
                    type_name,
                    "type matched no known package, using its last segment"
                );
            }
        } else {
            for rejected in &resolution.rejected {
                state
                    .diagnostics
                    .undeclared_dependency(&file.path, type_name, rejected);
            }
        }

        let rendered = match &resolution.resolved {
            ResolvedType::Local { name } => name.clone(),
            ResolvedType::Imported {
                module_path,
                local_name,
            } => {
                let alias = self.aliases.assign(&mut state.table, module_path);
                if !state.imports.iter().any(|i| &i.path == module_path) {
                    state.imports.push(Import {
                        path: module_path.clone(),
                        alias: alias.clone(),
                    });
                }
                format!("{}.{}", alias, local_name)
            }
        };

        TypeRef {
            rendered,
            resolved: resolution.resolved,
        }
    }
}

/// Mutable state private to one file's build
struct FileState {
    table: AliasTable,
    imports: Vec<Import>,
    diagnostics: Diagnostics,
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}
