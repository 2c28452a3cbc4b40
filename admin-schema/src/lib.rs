//! Admin schema derivation.
//!
//! Turns persistence-model metadata (tables, columns, relationships, validation
//! rules, scopes) into the schema document a generic admin front end renders its
//! forms, tables and navigation from.

extern crate self as admin_schema;

pub mod associations;
pub mod builder;
pub mod catalog;
pub mod columns;
pub mod config;
pub mod display_column;
pub mod enumerator;
pub mod errors;
pub mod inflector;
pub mod patterns;
pub mod provider;
pub mod registry;
pub mod schema;
pub mod scopes;
pub mod types;
pub mod validators;

pub use admin_schema_macros::AdminModel;
pub use catalog::SchemaCatalog;
pub use config::SchemaConfig;
pub use display_column::{DisplayColumnResolver, NameHeuristic};
pub use errors::*;
pub use provider::{
    DirectoryProvider, InventoryProvider, MetadataProvider, ModelRegistration, StaticProvider, registered_models,
};
pub use registry::{ModelHandle, ModelRegistry, RelationTarget, ResolvedRelation};
pub use schema::*;
pub use types::{
    ColumnDescriptor, ModelDefinition, ModelLayer, ModelMetadata, RelationDescriptor, RelationKind,
    ValidationDescriptor, ValidationRule,
};

// Re-exported for code generated by `#[derive(AdminModel)]`.
pub use inventory;
pub use serde_json;

/// Derives the schema of every eligible model `provider` reports, using the
/// default configuration.
pub fn derive_schema<P: MetadataProvider>(provider: P) -> Result<Vec<ModelSchema>, SchemaError> {
    SchemaCatalog::new(provider).derive()
}
