//! Schema records handed to the admin UI.
//!
//! Every record is a value object built fresh by each derivation pass. Models refer
//! to each other by schema name (`model_name`), never by pointer.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::types::NumericConstraints;

/// Unified column type tags. Columns whose native type has no mapping carry the
/// native type name instead.
pub mod column_types {
    pub const STRING: &str = "string";
    pub const INTEGER: &str = "integer";
    pub const FLOAT: &str = "float";
    pub const BOOLEAN: &str = "boolean";
    pub const DATE: &str = "date";
    pub const DATETIME: &str = "datetime";
    pub const JSON: &str = "json";
    pub const FILE: &str = "file";
}

pub const DEFAULT_SCOPE_TYPE: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSchema {
    pub name: String,
    pub slug: String,
    pub table_name: String,
    pub class_name: String,
    pub primary_key: Option<String>,
    pub display_name: String,
    pub display_column: Option<String>,
    pub columns: Vec<ColumnSchema>,
    pub associations: Vec<AssociationSchema>,
    pub scopes: Vec<ScopeSchema>,
    pub actions: Vec<ActionSchema>,
    pub tabs: Vec<TabSchema>,
    pub visible: bool,
}

impl ModelSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn association(&self, name: &str) -> Option<&AssociationSchema> {
        self.associations.iter().find(|association| association.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSchema {
    pub name: String,
    pub display_name: String,
    pub column_type: String,
    pub is_array: bool,
    pub access_type: AccessType,
    pub default_value: Value,
    pub validators: Vec<ValidatorSpec>,
    pub reference: Option<ReferenceSpec>,
    pub format: Map<String, Value>,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    ReadWrite,
    ReadOnly,
    WriteOnly,
    Hidden,
}

impl std::fmt::Display for AccessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessType::ReadWrite => write!(f, "read_write"),
            AccessType::ReadOnly => write!(f, "read_only"),
            AccessType::WriteOnly => write!(f, "write_only"),
            AccessType::Hidden => write!(f, "hidden"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceSpec {
    pub name: String,
    /// Absent for polymorphic belongs-to relations, whose target varies per record.
    pub model_name: Option<String>,
    pub reference_type: ReferenceType,
    pub foreign_key: String,
    pub polymorphic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    BelongsTo,
    HasOne,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationSchema {
    pub name: String,
    pub display_name: String,
    pub slug: String,
    pub model_name: String,
    pub foreign_key: String,
    pub polymorphic: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeSchema {
    pub name: String,
    pub display_name: String,
    pub scope_type: String,
    pub visible: bool,
    pub preferences: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionSchema {
    pub name: String,
    pub display_name: String,
    pub action_type: String,
    pub properties: Map<String, Value>,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabSchema {
    pub name: String,
    pub display_name: String,
    pub tab_type: String,
    pub preferences: Map<String, Value>,
    pub visible: bool,
}

/// Client-side validation rule attached to a column.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatorSpec {
    Required,
    Includes(Vec<Value>),
    /// JavaScript-compatible pattern source and flags.
    Format { source: String, flags: String },
    Length(LengthBounds),
    Numeric(NumericConstraints),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LengthBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is: Option<u64>,
}

#[derive(Serialize)]
struct FormatPayload<'a> {
    source: &'a str,
    flags: &'a str,
}

// Validators travel as single-key objects: {"required": true}, {"includes": [...]}, ...
impl Serialize for ValidatorSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            ValidatorSpec::Required => map.serialize_entry("required", &true)?,
            ValidatorSpec::Includes(values) => map.serialize_entry("includes", values)?,
            ValidatorSpec::Format { source, flags } => {
                let payload = FormatPayload {
                    source: source.as_str(),
                    flags: flags.as_str(),
                };
                map.serialize_entry("format", &payload)?
            }
            ValidatorSpec::Length(bounds) => map.serialize_entry("length", bounds)?,
            ValidatorSpec::Numeric(constraints) => map.serialize_entry("numeric", constraints)?,
        }
        map.end()
    }
}

fn default_action(name: &str, display_name: &str) -> ActionSchema {
    ActionSchema {
        name: name.to_string(),
        display_name: display_name.to_string(),
        action_type: "default".to_string(),
        properties: Map::new(),
        visible: true,
    }
}

/// Create, edit and remove: the actions every model offers out of the box.
pub fn default_actions() -> Vec<ActionSchema> {
    vec![
        default_action("create", "Create"),
        default_action("edit", "Edit"),
        default_action("remove", "Remove"),
    ]
}

pub fn default_tabs() -> Vec<TabSchema> {
    vec![TabSchema {
        name: "details".to_string(),
        display_name: "Details".to_string(),
        tab_type: "default".to_string(),
        preferences: Map::new(),
        visible: true,
    }]
}
