//! Schema descriptors
//!
//! The already-parsed shape of a compilation unit: schema files, their
//! services and methods, and the output-module hint each file carries.
//! Everything here is plain data, deserialized from JSON by the loader and
//! never mutated once a generation run starts.

use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};

/// One interface-definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Path of the file, unique within a compilation unit (e.g. "shop/orders.proto")
    pub path: String,

    /// Declared dotted package (may be empty, may be shared with other files)
    #[serde(default)]
    pub package: String,

    /// Paths of the files this one declares as dependencies
    #[serde(default)]
    pub dependencies: Vec<String>,

    #[serde(default)]
    pub services: Vec<Service>,

    /// Raw output-module hint ("import/path;name", "import/path", or absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_hint: Option<String>,
}

impl SchemaFile {
    pub fn new(path: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
            dependencies: Vec::new(),
            services: Vec::new(),
            module_hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.module_hint = Some(hint.into());
        self
    }

    pub fn with_dependency(mut self, path: impl Into<String>) -> Self {
        self.dependencies.push(path.into());
        self
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    /// Is `path` one of this file's declared dependencies?
    pub fn depends_on(&self, path: &str) -> bool {
        self.dependencies.iter().any(|d| d == path)
    }

    /// Path with its extension removed ("a/b/c.proto" -> "a/b/c").
    pub fn path_stem(&self) -> &str {
        let file_start = self.path.rfind('/').map(|i| i + 1).unwrap_or(0);
        match self.path[file_start..].rfind('.') {
            Some(dot) if dot > 0 => &self.path[..file_start + dot],
            _ => &self.path,
        }
    }

    /// Base name up to its first dot ("a/b/c.v2.proto" -> "c").
    pub fn base_name(&self) -> &str {
        let base = self.path.rsplit('/').next().unwrap_or(&self.path);
        base.split('.').next().unwrap_or(base)
    }

    /// The importable location of this file's generated output.
    ///
    /// Prefers the import-path portion of the hint and falls back to the
    /// path without extension. Never fails, even for a malformed hint: a
    /// dependency's hint is only ever consulted for its import path.
    pub fn module_path(&self) -> &str {
        self.module_hint
            .as_deref()
            .map(|hint| hint.split(';').next().unwrap_or(hint).trim())
            .filter(|import_path| !import_path.is_empty())
            .unwrap_or_else(|| self.path_stem())
    }

    /// Strictly parse this file's own hint.
    pub fn parse_hint(&self) -> Result<ModuleHint> {
        ModuleHint::parse(self)
    }
}

/// A service declared in one schema file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }
}

/// One RPC method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    /// Dotted, schema-global name; may carry a leading "."
    pub input_type: String,
    pub output_type: String,
    #[serde(default)]
    pub client_streaming: bool,
    #[serde(default)]
    pub server_streaming: bool,
}

impl Method {
    pub fn unary(
        name: impl Into<String>,
        input_type: impl Into<String>,
        output_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            input_type: input_type.into(),
            output_type: output_type.into(),
            client_streaming: false,
            server_streaming: false,
        }
    }

    pub fn streaming(mut self, client: bool, server: bool) -> Self {
        self.client_streaming = client;
        self.server_streaming = server;
        self
    }

    pub fn is_streaming(&self) -> bool {
        self.client_streaming || self.server_streaming
    }

    pub fn kind(&self) -> MethodKind {
        match (self.client_streaming, self.server_streaming) {
            (false, false) => MethodKind::Unary,
            (true, false) => MethodKind::ClientStream,
            (false, true) => MethodKind::ServerStream,
            (true, true) => MethodKind::BidiStream,
        }
    }
}

/// Call shape derived from the two streaming flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Unary,
    ClientStream,
    ServerStream,
    BidiStream,
}

// =============================================================================
// Module Hint
// =============================================================================

/// A strictly parsed output-module hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleHint {
    /// Import path, if the hint carried one
    pub import_path: Option<String>,
    /// Local package name as it will appear in generated code
    pub package_name: String,
}

impl ModuleHint {
    /// Parse `file`'s own hint.
    ///
    /// `"path;name"` gives both parts, `"path"` alone takes the package name
    /// from the schema package. More than one `;`, an explicit empty name, or
    /// no name from either source is a configuration error.
    pub fn parse(file: &SchemaFile) -> Result<Self> {
        let raw = file.module_hint.as_deref().unwrap_or("").trim();
        let parts: Vec<&str> = raw.split(';').collect();

        let (import_path, name) = match parts.as_slice() {
            [path] => (*path, file.package.as_str()),
            [path, name] => {
                if name.trim().is_empty() {
                    return Err(GenError::configuration(
                        &file.path,
                        format!("module hint {raw:?} names an empty package"),
                    ));
                }
                (*path, name.trim())
            }
            _ => {
                return Err(GenError::configuration(
                    &file.path,
                    format!("module hint {raw:?} must be \"import/path;name\" or \"import/path\""),
                ))
            }
        };

        if name.is_empty() {
            return Err(GenError::configuration(
                &file.path,
                "need to set the package name in the module hint",
            ));
        }

        let import_path = import_path.trim();
        Ok(Self {
            import_path: (!import_path.is_empty()).then(|| import_path.to_string()),
            package_name: name.replace('.', "_"),
        })
    }
}

// =============================================================================
// Compilation Unit
// =============================================================================

/// Every schema file visible during one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// All files, in the order the schema compiler supplied them
    pub files: Vec<SchemaFile>,

    /// Paths of the files slated for generation
    #[serde(default)]
    pub files_to_generate: Vec<String>,
}

impl CompilationUnit {
    pub fn new(files: Vec<SchemaFile>) -> Self {
        Self {
            files,
            files_to_generate: Vec::new(),
        }
    }

    /// Mark a file for generation.
    pub fn generate(mut self, path: impl Into<String>) -> Self {
        self.files_to_generate.push(path.into());
        self
    }

    /// Mark every file for generation.
    pub fn generate_all(mut self) -> Self {
        self.files_to_generate = self.files.iter().map(|f| f.path.clone()).collect();
        self
    }

    pub fn file(&self, path: &str) -> Option<&SchemaFile> {
        self.files.iter().find(|f| f.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_stem_and_base_name() {
        let file = SchemaFile::new("shop/common/status.v2.proto", "shop.common");
        assert_eq!(file.path_stem(), "shop/common/status.v2");
        assert_eq!(file.base_name(), "status");

        let bare = SchemaFile::new("noext", "");
        assert_eq!(bare.path_stem(), "noext");

        let dotted_dir = SchemaFile::new("a.b/c", "");
        assert_eq!(dotted_dir.path_stem(), "a.b/c");
    }

    #[test]
    fn test_module_path_prefers_hint() {
        let file = SchemaFile::new("common.proto", "shop.common").with_hint("github.com/x/common;common");
        assert_eq!(file.module_path(), "github.com/x/common");

        let no_name = SchemaFile::new("common.proto", "shop.common").with_hint("github.com/x/common");
        assert_eq!(no_name.module_path(), "github.com/x/common");

        let absent = SchemaFile::new("shop/common.proto", "shop.common");
        assert_eq!(absent.module_path(), "shop/common");

        let name_only = SchemaFile::new("shop/common.proto", "shop.common").with_hint(";common");
        assert_eq!(name_only.module_path(), "shop/common");
    }

    #[test]
    fn test_parse_hint_variants() {
        let both = SchemaFile::new("a.proto", "a.pkg").with_hint("example.com/a;apb");
        let hint = both.parse_hint().unwrap();
        assert_eq!(hint.import_path.as_deref(), Some("example.com/a"));
        assert_eq!(hint.package_name, "apb");

        let path_only = SchemaFile::new("a.proto", "a.pkg").with_hint("example.com/a");
        assert_eq!(path_only.parse_hint().unwrap().package_name, "a_pkg");

        let absent = SchemaFile::new("a.proto", "a.pkg");
        let hint = absent.parse_hint().unwrap();
        assert_eq!(hint.import_path, None);
        assert_eq!(hint.package_name, "a_pkg");
    }

    #[test]
    fn test_parse_hint_errors() {
        let too_many = SchemaFile::new("a.proto", "a").with_hint("x;y;z");
        assert!(too_many.parse_hint().unwrap_err().is_configuration());

        let empty_name = SchemaFile::new("a.proto", "a").with_hint("example.com/a;");
        assert!(empty_name.parse_hint().unwrap_err().is_configuration());

        let nothing = SchemaFile::new("a.proto", "");
        assert!(nothing.parse_hint().unwrap_err().is_configuration());
    }

    #[test]
    fn test_method_kind() {
        let m = Method::unary("Get", "Req", "Resp");
        assert_eq!(m.kind(), MethodKind::Unary);
        assert!(!m.is_streaming());
        assert_eq!(m.clone().streaming(true, false).kind(), MethodKind::ClientStream);
        assert_eq!(m.clone().streaming(false, true).kind(), MethodKind::ServerStream);
        assert_eq!(m.streaming(true, true).kind(), MethodKind::BidiStream);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"path": "a.proto", "services": [{"name": "S", "methods": [
            {"name": "M", "input_type": ".a.Req", "output_type": ".a.Resp"}
        ]}]}"#;
        let file: SchemaFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.package, "");
        assert!(file.dependencies.is_empty());
        assert!(file.module_hint.is_none());
        assert!(!file.services[0].methods[0].client_streaming);
    }
}
