//! Multi-file Generation
//!
//! Drives the context builder over every file slated for generation in a
//! compilation unit. A file that fails is recorded and skipped; its siblings
//! still generate, and all failures are reported together at the end.

use serde::Serialize;
use tracing::{info, warn};

use crate::alias::AliasAssigner;
use crate::config::GeneratorConfig;
use crate::context::{ContextBuilder, FileContext};
use crate::descriptor::CompilationUnit;
use crate::error::{FileError, GenError, Result};
use crate::index::DescriptorIndex;

/// One file's generated context plus where its output goes
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFile {
    /// Output file name (schema path without extension + suffix)
    pub name: String,
    pub context: FileContext,
}

/// Outcome of a run over a compilation unit
#[derive(Debug, Default, Serialize)]
pub struct GenerationReport {
    pub files: Vec<GeneratedFile>,
    #[serde(serialize_with = "serialize_errors", skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FileError>,
}

impl GenerationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn file(&self, source: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.context.source == source)
    }

    /// Collapse into the generated files, or every per-file error at once.
    pub fn into_result(self) -> Result<Vec<GeneratedFile>> {
        if self.errors.is_empty() {
            Ok(self.files)
        } else {
            Err(GenError::MultipleFiles(self.errors))
        }
    }
}

fn serialize_errors<S>(errors: &[FileError], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(errors.iter().map(|e| e.to_string()))
}

/// Generator for a whole compilation unit
#[derive(Debug, Clone)]
pub struct Generator {
    aliases: AliasAssigner,
    file_suffix: String,
}

impl Generator {
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        Ok(Self {
            aliases: AliasAssigner::new(&config.alias)?,
            file_suffix: config.output.file_suffix.clone(),
        })
    }

    pub fn run(&self, unit: &CompilationUnit) -> GenerationReport {
        let index = DescriptorIndex::from_unit(unit);
        let builder = ContextBuilder::new(&index, &self.aliases);
        let mut report = GenerationReport::default();

        for path in &unit.files_to_generate {
            let Some(file) = index.file(path) else {
                warn!(file = %path, "file slated for generation is not in the compilation unit");
                report.errors.push(FileError {
                    path: path.clone(),
                    error: GenError::configuration(path, "file is not part of the compilation unit"),
                });
                continue;
            };

            if file.services.is_empty() {
                continue;
            }

            match builder.build(file) {
                Ok(context) => {
                    let name = format!("{}{}", file.path_stem(), self.file_suffix);
                    info!(
                        file = %file.path,
                        output = %name,
                        services = context.services.len(),
                        imports = context.imports.len(),
                        "generated file context"
                    );
                    report.files.push(GeneratedFile { name, context });
                }
                Err(error) => {
                    warn!(file = %file.path, %error, "skipping file");
                    report.errors.push(FileError {
                        path: file.path.clone(),
                        error,
                    });
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Method, SchemaFile, Service};

    fn service() -> Service {
        Service::new("Greeter").with_method(Method::unary("Greet", "Req", "Resp"))
    }

    #[test]
    fn test_skips_files_without_services() {
        let unit = CompilationUnit::new(vec![
            SchemaFile::new("types.proto", "t").with_hint("example.com/t;t"),
            SchemaFile::new("svc/greeter.proto", "g")
                .with_hint("example.com/g;g")
                .with_service(service()),
        ])
        .generate_all();

        let report = Generator::new(&GeneratorConfig::default()).unwrap().run(&unit);
        assert!(report.is_ok());
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].name, "svc/greeter.triple.go");
    }

    #[test]
    fn test_bad_file_does_not_abort_siblings() {
        let unit = CompilationUnit::new(vec![
            SchemaFile::new("bad.proto", "bad").with_hint("x;y;z").with_service(service()),
            SchemaFile::new("good.proto", "good").with_service(service()),
        ])
        .generate_all();

        let report = Generator::new(&GeneratorConfig::default()).unwrap().run(&unit);
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].context.source, "good.proto");
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, "bad.proto");

        let err = report.into_result().unwrap_err();
        assert!(err.to_string().starts_with("multiple errors occurred:"));
    }

    #[test]
    fn test_only_listed_files_generate() {
        let unit = CompilationUnit::new(vec![
            SchemaFile::new("a.proto", "a").with_service(service()),
            SchemaFile::new("b.proto", "b").with_service(service()),
        ])
        .generate("b.proto");

        let report = Generator::new(&GeneratorConfig::default()).unwrap().run(&unit);
        assert_eq!(report.files.len(), 1);
        assert!(report.file("b.proto").is_some());
        assert!(report.file("a.proto").is_none());
    }

    #[test]
    fn test_unknown_listed_file_is_reported() {
        let unit = CompilationUnit::new(Vec::new()).generate("ghost.proto");
        let report = Generator::new(&GeneratorConfig::default()).unwrap().run(&unit);
        assert!(!report.is_ok());
        assert_eq!(report.errors[0].path, "ghost.proto");
    }

    #[test]
    fn test_custom_suffix() {
        let mut config = GeneratorConfig::default();
        config.output.file_suffix = "_triple.pb.go".to_string();
        let unit = CompilationUnit::new(vec![SchemaFile::new("a.proto", "a").with_service(service())]).generate_all();

        let files = Generator::new(&config).unwrap().run(&unit).into_result().unwrap();
        assert_eq!(files[0].name, "a_triple.pb.go");
    }
}
