//! Sources of model definitions.
//!
//! The catalog depends only on [`MetadataProvider`]; where definitions come from
//! (memory, a directory of descriptor files, link-time registration) is up to the
//! provider.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::{LoadError, SchemaError};
use crate::types::ModelDefinition;

pub trait MetadataProvider: Send + Sync {
    /// Short human-readable origin, used in load errors and logs.
    fn describe(&self) -> String;

    /// Every model definition the provider knows about, in a stable order.
    fn load_models(&self) -> Result<Vec<ModelDefinition>, SchemaError>;
}

/// In-memory list of definitions.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    models: Vec<ModelDefinition>,
}

impl StaticProvider {
    pub fn new(models: Vec<ModelDefinition>) -> Self {
        Self { models }
    }
}

impl MetadataProvider for StaticProvider {
    fn describe(&self) -> String {
        format!("static provider ({} models)", self.models.len())
    }

    fn load_models(&self) -> Result<Vec<ModelDefinition>, SchemaError> {
        Ok(self.models.clone())
    }
}

/// Reads one model per `*.toml` or `*.json` file below a root directory.
///
/// Files are visited in path order so the registry order does not depend on the
/// file system.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn definition_files(&self) -> Result<Vec<PathBuf>, LoadError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && is_definition_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

fn is_definition_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|ext| ext.to_str()), Some("toml" | "json"))
}

/// Parses a single descriptor file, picking the format from its extension.
pub fn read_definition(path: &Path) -> Result<ModelDefinition, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&raw).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        }),
        _ => toml::from_str(&raw).map_err(|source| LoadError::Toml {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl MetadataProvider for DirectoryProvider {
    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }

    fn load_models(&self) -> Result<Vec<ModelDefinition>, SchemaError> {
        if !self.root.is_dir() {
            return Err(SchemaError::load(
                self.describe(),
                LoadError::Io {
                    path: self.root.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
                },
            ));
        }
        let files = self.definition_files().map_err(|err| SchemaError::load(self.describe(), err))?;
        files
            .iter()
            .map(|path| read_definition(path).map_err(|err| SchemaError::load(self.describe(), err)))
            .collect()
    }
}

/// Link-time registration record submitted by `#[derive(AdminModel)]`.
pub struct ModelRegistration {
    /// Rust type name of the annotated struct.
    pub type_name: &'static str,
    pub class_name: &'static str,
    pub definition_fn: fn() -> ModelDefinition,
}

impl ModelRegistration {
    pub const fn new(type_name: &'static str, class_name: &'static str, definition_fn: fn() -> ModelDefinition) -> Self {
        Self {
            type_name,
            class_name,
            definition_fn,
        }
    }
}

inventory::collect!(ModelRegistration);

/// All models registered through the derive macro.
pub fn registered_models() -> impl Iterator<Item = &'static ModelRegistration> {
    inventory::iter::<ModelRegistration>()
}

/// Serves the models registered with `inventory`.
///
/// Link order is not something callers can rely on, so definitions are sorted by
/// class name.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryProvider;

impl MetadataProvider for InventoryProvider {
    fn describe(&self) -> String {
        "registered models".to_string()
    }

    fn load_models(&self) -> Result<Vec<ModelDefinition>, SchemaError> {
        let mut registrations: Vec<_> = registered_models().collect();
        registrations.sort_by_key(|registration| registration.class_name);
        Ok(registrations
            .into_iter()
            .map(|registration| (registration.definition_fn)())
            .collect())
    }
}
