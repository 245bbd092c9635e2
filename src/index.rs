//! Descriptor Index
//!
//! One-time lookup structures over a whole compilation unit, built once and
//! shared read-only by every resolution in the run.
//!
//! ## Shared packages
//!
//! Several files may declare the same package. The package map keeps the
//! LAST file in input order for each name. This is an accepted limitation:
//! a type in that package defined by an earlier file only resolves as an
//! import when the last file is also a dependency of the referencing file.

use std::collections::HashMap;

use crate::descriptor::{CompilationUnit, SchemaFile};

/// package name -> defining file, file path -> file
#[derive(Debug, Clone, Default)]
pub struct DescriptorIndex<'a> {
    by_package: HashMap<&'a str, &'a SchemaFile>,
    by_path: HashMap<&'a str, &'a SchemaFile>,
}

impl<'a> DescriptorIndex<'a> {
    pub fn build(files: &'a [SchemaFile]) -> Self {
        Self {
            by_package: build_package_index(files),
            by_path: build_path_index(files),
        }
    }

    pub fn from_unit(unit: &'a CompilationUnit) -> Self {
        Self::build(&unit.files)
    }

    /// File that owns `package` (last-wins on shared packages).
    pub fn package(&self, package: &str) -> Option<&'a SchemaFile> {
        self.by_package.get(package).copied()
    }

    pub fn file(&self, path: &str) -> Option<&'a SchemaFile> {
        self.by_path.get(path).copied()
    }

    pub fn package_count(&self) -> usize {
        self.by_package.len()
    }

    pub fn file_count(&self) -> usize {
        self.by_path.len()
    }
}

/// Map each declared package to its defining file. Files without a package
/// are not indexed; later files overwrite earlier ones.
pub fn build_package_index(files: &[SchemaFile]) -> HashMap<&str, &SchemaFile> {
    let mut index = HashMap::with_capacity(files.len());
    for file in files.iter().filter(|f| !f.package.is_empty()) {
        index.insert(file.package.as_str(), file);
    }
    index
}

pub fn build_path_index(files: &[SchemaFile]) -> HashMap<&str, &SchemaFile> {
    files.iter().map(|f| (f.path.as_str(), f)).collect()
}
