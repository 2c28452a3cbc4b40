use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::AccessType;

/// Derivation settings, loadable from the `[models]`, `[columns]`, `[scopes]` and
/// `[derive]` tables of `admin-schema.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub models: ModelSettings,
    #[serde(default)]
    pub columns: ColumnSettings,
    #[serde(default)]
    pub scopes: ScopeSettings,
    #[serde(default)]
    pub derive: DeriveSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Audit-log model of the admin system. Excluded by exact class name, and its
    /// introspection failures are never logged.
    #[serde(default = "default_audit_model")]
    pub audit_model: String,
    /// File-attachment metadata model. Gets a fixed schema instead of being introspected.
    #[serde(default = "default_attachment_model")]
    pub attachment_model: String,
    /// Internal blob-storage model. Relations into it are never exposed.
    #[serde(default = "default_blob_model")]
    pub blob_model: String,
    /// Infrastructure models dropped from enumeration when present.
    #[serde(default = "default_excluded_models")]
    pub excluded: Vec<String>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            audit_model: default_audit_model(),
            attachment_model: default_attachment_model(),
            blob_model: default_blob_model(),
            excluded: default_excluded_models(),
        }
    }
}

fn default_audit_model() -> String {
    "Admin::Audit".to_string()
}

fn default_attachment_model() -> String {
    "Storage::Attachment".to_string()
}

fn default_blob_model() -> String {
    "Storage::Blob".to_string()
}

fn default_excluded_models() -> Vec<String> {
    ["SchemaMigration", "InternalMetadata", "Storage::Blob", "Storage::VariantRecord"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnSettings {
    /// Extra or replacement entries for the native type -> unified type table.
    #[serde(default)]
    pub unified_types: BTreeMap<String, String>,
    /// Extra or replacement entries for the column name -> access type table.
    #[serde(default)]
    pub access_types: BTreeMap<String, AccessType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeSettings {
    /// Scopes starting with this prefix are generated attachment eager-loaders.
    #[serde(default = "default_hidden_prefix")]
    pub hidden_prefix: String,
}

impl Default for ScopeSettings {
    fn default() -> Self {
        Self {
            hidden_prefix: default_hidden_prefix(),
        }
    }
}

fn default_hidden_prefix() -> String {
    "with_attached_".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveSettings {
    /// Build model schemas on the rayon thread pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for DeriveSettings {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

fn default_parallel() -> bool {
    true
}

const UNIFIED_TYPES: &[(&str, &str)] = &[
    ("smallint", "integer"),
    ("int", "integer"),
    ("int2", "integer"),
    ("int4", "integer"),
    ("int8", "integer"),
    ("integer", "integer"),
    ("bigint", "integer"),
    ("serial", "integer"),
    ("bigserial", "integer"),
    ("mediumint", "integer"),
    ("numeric", "float"),
    ("decimal", "float"),
    ("real", "float"),
    ("float", "float"),
    ("float4", "float"),
    ("float8", "float"),
    ("double", "float"),
    ("double precision", "float"),
    ("money", "float"),
    ("bool", "boolean"),
    ("boolean", "boolean"),
    ("tinyint(1)", "boolean"),
    ("character varying", "string"),
    ("varchar", "string"),
    ("character", "string"),
    ("char", "string"),
    ("bpchar", "string"),
    ("text", "string"),
    ("citext", "string"),
    ("string", "string"),
    ("uuid", "string"),
    ("inet", "string"),
    ("date", "date"),
    ("datetime", "datetime"),
    ("timestamp", "datetime"),
    ("timestamptz", "datetime"),
    ("timestamp without time zone", "datetime"),
    ("timestamp with time zone", "datetime"),
    ("time", "time"),
    ("time without time zone", "time"),
    ("json", "json"),
    ("jsonb", "json"),
    ("hstore", "json"),
    ("bytea", "binary"),
    ("blob", "binary"),
    ("binary", "binary"),
];

const ACCESS_TYPES: &[(&str, AccessType)] = &[
    ("created_at", AccessType::ReadOnly),
    ("updated_at", AccessType::ReadOnly),
    ("deleted_at", AccessType::ReadOnly),
];

impl SchemaConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Unified type tag for a native storage type, ignoring case, size
    /// parameters (`varchar(255)`) and array brackets (`integer[]`).
    pub fn unified_type(&self, sql_type: &str) -> Option<String> {
        let normalized = normalize_sql_type(sql_type);
        if let Some(tag) = self.columns.unified_types.get(&normalized) {
            return Some(tag.clone());
        }
        let lowered = sql_type.trim().to_lowercase();
        UNIFIED_TYPES
            .iter()
            .find(|(native, _)| *native == normalized || *native == lowered)
            .map(|(_, tag)| (*tag).to_string())
    }

    pub fn access_type(&self, column: &str) -> AccessType {
        self.columns
            .access_types
            .get(column)
            .copied()
            .or_else(|| ACCESS_TYPES.iter().find(|(name, _)| *name == column).map(|(_, access)| *access))
            .unwrap_or(AccessType::ReadWrite)
    }

    pub fn is_attachment(&self, class_name: &str) -> bool {
        self.models.attachment_model == class_name
    }

    pub fn is_blob(&self, class_name: &str) -> bool {
        self.models.blob_model == class_name
    }

    /// Framework storage models resolve as relationship targets even when no
    /// definition for them was loaded.
    pub fn is_storage_model(&self, class_name: &str) -> bool {
        self.is_attachment(class_name) || self.is_blob(class_name)
    }
}

fn normalize_sql_type(sql_type: &str) -> String {
    let lowered = sql_type.trim().to_lowercase();
    let without_array = lowered.strip_suffix("[]").unwrap_or(&lowered);
    let base = match without_array.find('(') {
        Some(idx) => &without_array[..idx],
        None => without_array,
    };
    base.trim().to_string()
}

/// True when the native type itself denotes an array column (`integer[]`).
pub(crate) fn is_array_sql_type(sql_type: &str) -> bool {
    sql_type.trim().ends_with("[]")
}
