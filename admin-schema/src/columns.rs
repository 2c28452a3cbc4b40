//! Column extraction: reference columns for singular relationships, then the
//! remaining storage columns.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::config::{SchemaConfig, is_array_sql_type};
use crate::errors::IntrospectionError;
use crate::inflector;
use crate::registry::{ModelHandle, RelationTarget, ResolvedRelation};
use crate::schema::{AccessType, ColumnSchema, ReferenceSpec, ReferenceType, column_types};
use crate::types::{ColumnDescriptor, ModelDefinition, RelationKind};
use crate::validators;

/// Ordered, duplicate-free column list of one model.
pub fn extract(model: &ModelHandle, config: &SchemaConfig) -> Result<Vec<ColumnSchema>, IntrospectionError> {
    let defaults = blank_attributes(&model.definition)?;
    let mut columns = reference_columns(model, config, &defaults)?;
    let claimed: HashSet<String> = columns.iter().map(|column| column.name.clone()).collect();

    for descriptor in &model.definition.columns {
        if claimed.contains(&descriptor.name) {
            continue;
        }
        columns.push(table_column(&model.definition, descriptor, config, &defaults)?);
    }

    Ok(columns)
}

/// Attribute values of a freshly constructed record: declared column defaults,
/// overlaid by the model's blank-instance constructor when it has one.
///
/// Enum-backed attributes holding a stored integer are reported by value name,
/// so the default satisfies the column's `Includes` validator.
pub fn blank_attributes(model: &ModelDefinition) -> Result<Map<String, Value>, IntrospectionError> {
    let mut attributes: Map<String, Value> = model
        .columns
        .iter()
        .map(|column| (column.name.clone(), column.default.clone().unwrap_or(Value::Null)))
        .collect();

    if let Some(blank_instance) = model.blank_instance {
        let overrides = blank_instance().map_err(|message| IntrospectionError::BlankInstance { message })?;
        attributes.extend(overrides);
    }

    for descriptor in &model.enums {
        if let Some(value) = attributes.get_mut(&descriptor.attribute)
            && let Some(name) = value
                .as_u64()
                .and_then(|index| usize::try_from(index).ok())
                .and_then(|index| descriptor.values.get(index))
        {
            *value = Value::String(name.clone());
        }
    }

    Ok(attributes)
}

fn reference_columns(
    model: &ModelHandle,
    config: &SchemaConfig,
    defaults: &Map<String, Value>,
) -> Result<Vec<ColumnSchema>, IntrospectionError> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();

    for relation in &model.relations {
        if !relation.kind().is_singular() {
            continue;
        }
        if relation.target.class_name().is_some_and(|target| config.is_blob(target)) {
            continue;
        }
        let column = reference_column(model, relation, config, defaults)?;
        if seen.insert(column.name.clone()) {
            columns.push(column);
        }
    }

    Ok(columns)
}

fn reference_column(
    model: &ModelHandle,
    relation: &ResolvedRelation,
    config: &SchemaConfig,
    defaults: &Map<String, Value>,
) -> Result<ColumnSchema, IntrospectionError> {
    let descriptor = &relation.descriptor;
    let definition = &model.definition;
    let belongs_to = descriptor.kind == RelationKind::BelongsTo;
    let foreign_key = descriptor.foreign_key_for(&definition.class_name);
    let name = if belongs_to { foreign_key.clone() } else { descriptor.name.clone() };
    let attachment = relation.target.class_name().is_some_and(|target| config.is_attachment(target));

    let (column_type, access_type) = match (attachment, belongs_to) {
        (true, _) => (column_types::FILE, AccessType::ReadWrite),
        (false, true) => (column_types::INTEGER, AccessType::ReadWrite),
        (false, false) => (column_types::INTEGER, AccessType::ReadOnly),
    };

    let model_name = match &relation.target {
        RelationTarget::Model { class_name } => Some(inflector::underscore(class_name)),
        RelationTarget::Polymorphic => None,
    };

    Ok(ColumnSchema {
        display_name: inflector::humanize(&name),
        column_type: column_type.to_string(),
        is_array: false,
        access_type,
        default_value: defaults.get(&name).cloned().unwrap_or(Value::Null),
        validators: validators::resolve(definition, &name, Some(descriptor))?,
        reference: Some(ReferenceSpec {
            name: descriptor.name.clone(),
            model_name,
            reference_type: if belongs_to {
                ReferenceType::BelongsTo
            } else {
                ReferenceType::HasOne
            },
            foreign_key,
            polymorphic: descriptor.polymorphic || attachment,
        }),
        format: Map::new(),
        is_virtual: false,
        name,
    })
}

fn table_column(
    model: &ModelDefinition,
    descriptor: &ColumnDescriptor,
    config: &SchemaConfig,
    defaults: &Map<String, Value>,
) -> Result<ColumnSchema, IntrospectionError> {
    let column_type = if model.enum_for(&descriptor.name).is_some() {
        column_types::STRING.to_string()
    } else {
        config
            .unified_type(&descriptor.sql_type)
            .unwrap_or_else(|| descriptor.sql_type.clone())
    };

    Ok(ColumnSchema {
        name: descriptor.name.clone(),
        display_name: inflector::humanize(&descriptor.name),
        column_type,
        is_array: descriptor.array || is_array_sql_type(&descriptor.sql_type),
        access_type: config.access_type(&descriptor.name),
        default_value: defaults.get(&descriptor.name).cloned().unwrap_or(Value::Null),
        validators: validators::resolve(model, &descriptor.name, None)?,
        reference: None,
        format: Map::new(),
        is_virtual: false,
    })
}
