//! Triple Stub Generation Core
//!
//! Resolves the request and response types of every RPC method in a schema
//! file against the whole compilation unit, and assigns each imported module
//! a short, collision-free alias. The output is one [`FileContext`] per
//! generated file, ready for a template stage to render client and server
//! stubs from.
//!
//! ## Pipeline
//!
//! ```text
//! CompilationUnit ──► DescriptorIndex ──► TypeResolver ──┐
//!                                                        ├──► ContextBuilder ──► FileContext
//!                                         AliasAssigner ─┘
//! ```
//!
//! The index is built once per run and shared read-only. Each file gets its
//! own alias table and import list.

pub mod alias;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod diagnostics;
pub mod error;
pub mod generate;
pub mod index;
pub mod loader;
pub mod resolve;

pub use alias::{AliasAssigner, AliasTable};
pub use config::{AliasConfig, GeneratorConfig, OutputConfig};
pub use context::{ContextBuilder, FileContext, Import, MethodContext, ServiceContext, TypeRef};
pub use descriptor::{CompilationUnit, Method, MethodKind, ModuleHint, SchemaFile, Service};
pub use diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics, Severity};
pub use error::{FileError, GenError, Result};
pub use generate::{GeneratedFile, GenerationReport, Generator};
pub use index::DescriptorIndex;
pub use resolve::{ResolvedType, TypeResolver};
