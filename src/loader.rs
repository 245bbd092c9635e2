//! Compilation Unit Loading
//!
//! Reads already-parsed schema descriptors from JSON: either one document
//! holding a whole [`CompilationUnit`], or a directory of per-file
//! [`SchemaFile`] documents.

use std::fs;
use std::path::Path;

use anyhow::Context;
use walkdir::WalkDir;

use crate::descriptor::{CompilationUnit, SchemaFile};

/// Load a compilation unit from a JSON file or a directory of JSON files.
pub fn load_unit(input: &Path) -> anyhow::Result<CompilationUnit> {
    if input.is_dir() {
        load_from_directory(input)
    } else {
        load_from_file(input)
    }
}

pub fn load_from_file(path: &Path) -> anyhow::Result<CompilationUnit> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let unit: CompilationUnit = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse compilation unit in {}", path.display()))?;
    Ok(unit)
}

/// Every `*.json` below `dir` is one schema file; all of them are slated for
/// generation. Files are taken in path order so the package index tie-break
/// does not depend on directory iteration order.
pub fn load_from_directory(dir: &Path) -> anyhow::Result<CompilationUnit> {
    let mut paths: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().map(|ext| ext == "json").unwrap_or(false))
        .collect();
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: SchemaFile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse JSON in {}: {}", path.display(), e))?;
        files.push(file);
    }

    Ok(CompilationUnit::new(files).generate_all())
}
