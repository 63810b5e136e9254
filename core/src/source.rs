//! Module sources: the bound functions handed to lowering.
//!
//! A module is read from a JSON document of already-bound functions:
//!
//! ```json
//! { "name": "demo",
//!   "functions": [
//!     { "name": "f",
//!       "parameters": [{ "name": "x", "type": { "name": "string", "kind": "reference" }, "null_checked": true }],
//!       "body": { "statements": [{ "stmt": "return" }] } } ] }
//! ```

use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{GuardErrorExt, Level};
use crate::ir::node::BoundBlock;
use crate::ir::well_known::{SpecialType, special_type};
use crate::location::{Location, Span};
use crate::symbols::{ParameterSymbol, TypeSymbol};

fn void_type() -> TypeSymbol {
    special_type(SpecialType::Void)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterSymbol>,
    #[serde(default = "void_type")]
    pub return_type: TypeSymbol,
    #[serde(default)]
    pub body: BoundBlock,
}

impl FunctionDecl {
    pub fn new(name: &str, parameters: Vec<ParameterSymbol>, body: BoundBlock) -> Self {
        FunctionDecl {
            name: name.to_string(),
            parameters,
            return_type: void_type(),
            body,
        }
    }

    pub fn returning(mut self, ty: TypeSymbol) -> Self {
        self.return_type = ty;
        self
    }
}

#[derive(Debug, Deserialize)]
struct ModuleDocument {
    name: Option<String>,
    #[serde(default)]
    functions: Vec<FunctionDecl>,
}

#[derive(Debug, Clone)]
pub struct ModuleSource {
    pub name: String,
    pub path: Option<PathBuf>,
    pub functions: Vec<FunctionDecl>,
}

impl ModuleSource {
    pub fn new(name: &str, mut functions: Vec<FunctionDecl>) -> Self {
        for function in functions.iter_mut() {
            for (ordinal, param) in function.parameters.iter_mut().enumerate() {
                param.ordinal = ordinal;
            }
        }
        ModuleSource {
            name: name.to_string(),
            path: None,
            functions,
        }
    }

    /// Parse a module document. `default_name` is used when the document
    /// does not name the module.
    pub fn from_json(default_name: &str, text: &str) -> Result<Self, SourceError> {
        let doc: ModuleDocument = serde_json::from_str(text).map_err(|e| {
            SourceError::malformed(
                default_name,
                e.to_string(),
                Some(Location::new(default_name.to_string(), e.line(), e.column())),
            )
        })?;
        let name = doc.name.unwrap_or_else(|| default_name.to_string());
        Ok(ModuleSource::new(&name, doc.functions))
    }

    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path).map_err(|_| SourceError::missing(path))?;
        let stem = path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let mut source = ModuleSource::from_json(&stem, &content).map_err(|e| e.in_file(path))?;
        source.path = Some(path.to_path_buf());
        Ok(source)
    }

    /// Paths matching a glob pattern, sorted. Directories that cannot be
    /// read are logged and skipped.
    pub fn discover(pattern: &str) -> Result<Vec<PathBuf>, SourceError> {
        let entries = glob::glob(pattern).map_err(|e| SourceError::pattern(pattern, e.msg))?;
        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) => paths.push(path),
                Err(e) => warn!("skipping {}: {}", e.path().display(), e.error()),
            }
        }
        paths.sort();
        Ok(paths)
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions.iter().find(|f| f.name == name)
    }
}

impl std::fmt::Display for ModuleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "module {} at {:?}", self.name, path),
            None => write!(f, "module {}", self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorKind {
    Missing,
    Malformed,
    Pattern,
}

#[derive(Debug, Clone)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    location: Option<Location>,
}

impl SourceError {
    fn missing(path: &Path) -> Self {
        SourceError {
            kind: SourceErrorKind::Missing,
            message: format!("Missing module source at {:?}", path),
            location: None,
        }
    }

    fn malformed(module: &str, detail: String, location: Option<Location>) -> Self {
        SourceError {
            kind: SourceErrorKind::Malformed,
            message: format!("Malformed module `{}`: {}", module, detail),
            location,
        }
    }

    fn pattern(pattern: &str, detail: &str) -> Self {
        SourceError {
            kind: SourceErrorKind::Pattern,
            message: format!("Invalid module pattern `{}`: {}", pattern, detail),
            location: None,
        }
    }

    fn in_file(mut self, path: &Path) -> Self {
        self.location = self.location.map(|loc| loc.in_file(path));
        self
    }

    pub fn kind(&self) -> SourceErrorKind {
        self.kind
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} (at {})", self.message, loc)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for SourceError {}

impl GuardErrorExt for SourceError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        "nullguard.source".to_string()
    }

    fn span(&self) -> Option<Span> {
        self.location.clone().map(Span::point)
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}
