use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::inflector;

/// Builds the attribute map of a freshly constructed, unsaved model instance.
pub type BlankInstanceFn = fn() -> Result<Map<String, Value>, String>;

/// Metadata describing one persistence model, as reported by a metadata provider.
///
/// Definitions are plain data: the derive macro emits them, `DirectoryProvider`
/// deserializes them from TOML or JSON, and tests build them with the `with_*` helpers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelDefinition {
    /// Fully-qualified class name, namespaces separated by `::` (e.g. `Blog::Post`).
    pub class_name: String,
    pub table_name: String,
    #[serde(default = "default_primary_key")]
    pub primary_key: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub layer: ModelLayer,
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default)]
    pub relations: Vec<RelationDescriptor>,
    #[serde(default)]
    pub enums: Vec<EnumDescriptor>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub validations: Vec<ValidationDescriptor>,
    #[serde(skip)]
    pub blank_instance: Option<BlankInstanceFn>,
}

fn default_primary_key() -> Option<String> {
    Some("id".to_string())
}

/// Which persistence layer a model belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelLayer {
    #[default]
    Application,
    /// Models owned by the admin system itself (its own settings, queries, audits).
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Native storage type as the database reports it (e.g. `character varying`, `int8`, `jsonb`).
    pub sql_type: String,
    #[serde(default)]
    pub array: bool,
    #[serde(default = "default_nullable")]
    pub null: bool,
    #[serde(default)]
    pub default: Option<Value>,
}

fn default_nullable() -> bool {
    true
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            array: false,
            null: true,
            default: None,
        }
    }

    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.null = false;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    BelongsTo,
    HasOne,
    HasMany,
    HasManyThrough,
    ManyToMany,
}

impl RelationKind {
    /// True for relationships that point at no more than one record.
    pub fn is_singular(self) -> bool {
        matches!(self, RelationKind::BelongsTo | RelationKind::HasOne)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    pub name: String,
    pub kind: RelationKind,
    /// Target class name. Absent only for polymorphic belongs-to relations.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub foreign_key: Option<String>,
    #[serde(default)]
    pub polymorphic: bool,
    #[serde(default)]
    pub optional: bool,
    /// Polymorphic interface name on the target side (`has_many :comments, as: :commentable`).
    #[serde(default, rename = "as")]
    pub as_name: Option<String>,
    #[serde(default)]
    pub through: Option<String>,
}

impl RelationDescriptor {
    pub fn new(name: impl Into<String>, kind: RelationKind, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            target: Some(target.into()),
            foreign_key: None,
            polymorphic: false,
            optional: false,
            as_name: None,
            through: None,
        }
    }

    pub fn belongs_to(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationKind::BelongsTo, target)
    }

    /// A belongs-to whose target class is stored per record in `{name}_type`.
    pub fn belongs_to_polymorphic(name: impl Into<String>) -> Self {
        Self {
            target: None,
            polymorphic: true,
            ..Self::new(name, RelationKind::BelongsTo, String::new())
        }
    }

    pub fn has_one(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationKind::HasOne, target)
    }

    pub fn has_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationKind::HasMany, target)
    }

    pub fn many_to_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationKind::ManyToMany, target)
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }

    pub fn as_interface(mut self, name: impl Into<String>) -> Self {
        self.as_name = Some(name.into());
        self
    }

    pub fn through(mut self, relation: impl Into<String>) -> Self {
        self.kind = RelationKind::HasManyThrough;
        self.through = Some(relation.into());
        self
    }

    /// Foreign key column, falling back to the naming convention.
    ///
    /// belongs-to relations store `{name}_id` on the owner; every other kind stores
    /// `{owner}_id` (or `{as}_id` for polymorphic interfaces) on the target.
    pub fn foreign_key_for(&self, owner_class: &str) -> String {
        if let Some(foreign_key) = &self.foreign_key {
            return foreign_key.clone();
        }
        match (self.kind, &self.as_name) {
            (RelationKind::BelongsTo, _) => format!("{}_id", self.name),
            (_, Some(interface)) => format!("{interface}_id"),
            (_, None) => format!("{}_id", inflector::underscore(inflector::demodulize(owner_class))),
        }
    }
}

/// Enumerated attribute: a column whose stored value is one of a fixed set of names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    pub attribute: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationDescriptor {
    pub attributes: Vec<String>,
    #[serde(flatten)]
    pub rule: ValidationRule,
}

impl ValidationDescriptor {
    pub fn new<I, S>(attributes: I, rule: ValidationRule) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
            rule,
        }
    }

    pub fn applies_to(&self, column: &str) -> bool {
        self.attributes.iter().any(|attribute| attribute == column)
    }
}

/// Declared constraint, tagged by its `kind`.
///
/// Kinds the admin UI cannot express client-side (uniqueness, custom validators, ...)
/// deserialize into `Other` and contribute nothing to the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationRule {
    Presence,
    Inclusion {
        values: Vec<Value>,
    },
    Format {
        /// Pattern in the `regex` crate's syntax.
        pattern: String,
    },
    Length {
        #[serde(default)]
        minimum: Option<u64>,
        #[serde(default)]
        maximum: Option<u64>,
        #[serde(default)]
        is: Option<u64>,
    },
    Numericality(NumericConstraints),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greater_than: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greater_than_or_equal_to: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equal_to: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub less_than: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub less_than_or_equal_to: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_than: Option<Number>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub only_integer: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub odd: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub even: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl ModelDefinition {
    pub fn new(class_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            table_name: table_name.into(),
            primary_key: default_primary_key(),
            ..Self::default()
        }
    }

    pub fn with_column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_relation(mut self, relation: RelationDescriptor) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn with_enum<I, S>(mut self, attribute: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enums.push(EnumDescriptor {
            attribute: attribute.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    pub fn with_validation(mut self, validation: ValidationDescriptor) -> Self {
        self.validations.push(validation);
        self
    }

    pub fn with_layer(mut self, layer: ModelLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn abstract_model(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn with_blank_instance(mut self, blank_instance: BlankInstanceFn) -> Self {
        self.blank_instance = Some(blank_instance);
        self
    }

    pub fn enum_for(&self, attribute: &str) -> Option<&EnumDescriptor> {
        self.enums.iter().find(|descriptor| descriptor.attribute == attribute)
    }

    pub fn validations_on<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a ValidationRule> + 'a {
        self.validations
            .iter()
            .filter(move |validation| validation.applies_to(column))
            .map(|validation| &validation.rule)
    }
}

/// Serializes `T::default()` into the attribute map of a blank instance.
///
/// Used by `#[derive(AdminModel)]` when the model opts into `#[admin(defaults)]`.
pub fn blank_instance_of<T: Default + Serialize>() -> Result<Map<String, Value>, String> {
    match serde_json::to_value(T::default()).map_err(|err| err.to_string())? {
        Value::Object(map) => Ok(map),
        other => Err(format!("blank instance serialized to `{other}` instead of an object")),
    }
}

/// Implemented by `#[derive(AdminModel)]`.
pub trait ModelMetadata {
    fn model_definition() -> ModelDefinition;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conventional_foreign_keys() {
        let author = RelationDescriptor::belongs_to("author", "User");
        assert_eq!(author.foreign_key_for("Post"), "author_id");

        let comments = RelationDescriptor::has_many("comments", "Comment");
        assert_eq!(comments.foreign_key_for("Blog::BlogPost"), "blog_post_id");

        let notes = RelationDescriptor::has_many("notes", "Note").as_interface("notable");
        assert_eq!(notes.foreign_key_for("Post"), "notable_id");

        let explicit = RelationDescriptor::has_one("profile", "Profile").with_foreign_key("owner_id");
        assert_eq!(explicit.foreign_key_for("User"), "owner_id");
    }

    #[test]
    fn unknown_rule_kinds_deserialize_as_other() {
        let raw = r#"{"attributes": ["email"], "kind": "uniqueness", "case_sensitive": false}"#;
        let descriptor: ValidationDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(descriptor.rule, ValidationRule::Other);
        assert!(descriptor.applies_to("email"));
    }

    #[test]
    fn length_rule_deserializes_from_toml() {
        let raw = r#"
            attributes = ["title"]
            kind = "length"
            minimum = 3
            maximum = 120
        "#;
        let descriptor: ValidationDescriptor = toml::from_str(raw).unwrap();
        assert_eq!(
            descriptor.rule,
            ValidationRule::Length {
                minimum: Some(3),
                maximum: Some(120),
                is: None
            }
        );
    }

    #[derive(Default, Serialize)]
    struct Draft {
        title: String,
        published: bool,
    }

    #[test]
    fn blank_instance_serializes_defaults() {
        let attributes = blank_instance_of::<Draft>().unwrap();
        assert_eq!(attributes.get("title"), Some(&Value::String(String::new())));
        assert_eq!(attributes.get("published"), Some(&Value::Bool(false)));
        assert!(blank_instance_of::<u32>().is_err());
    }
}
