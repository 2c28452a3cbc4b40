//! Per-model schema assembly.

use serde_json::{Map, Value};

use crate::config::SchemaConfig;
use crate::display_column::DisplayColumnResolver;
use crate::errors::SchemaError;
use crate::inflector;
use crate::registry::ModelHandle;
use crate::schema::{
    AccessType, ColumnSchema, ModelSchema, ReferenceSpec, ReferenceType, column_types, default_actions, default_tabs,
};
use crate::{associations, columns, scopes};

/// Builds the schema of one enumerated model.
///
/// The attachment model always gets the fixed storage schema; every other model is
/// introspected, and any introspection failure is reported for the caller to skip.
pub fn build_model(
    model: &ModelHandle,
    config: &SchemaConfig,
    display_column: &dyn DisplayColumnResolver,
) -> Result<ModelSchema, SchemaError> {
    let definition = &model.definition;
    if config.is_attachment(&definition.class_name) {
        return Ok(attachment_schema(&definition.class_name));
    }

    let columns =
        columns::extract(model, config).map_err(|err| SchemaError::introspection(&definition.class_name, err))?;

    Ok(ModelSchema {
        name: inflector::underscore(&definition.class_name),
        slug: inflector::slugify(&definition.class_name),
        table_name: definition.table_name.clone(),
        class_name: definition.class_name.clone(),
        primary_key: definition.primary_key.clone(),
        display_name: inflector::model_display_name(&definition.class_name),
        display_column: display_column.display_column(definition, config),
        columns,
        associations: associations::extract(model, config),
        scopes: scopes::extract(definition, config),
        actions: default_actions(),
        tabs: default_tabs(),
        visible: true,
    })
}

fn plain_column(name: &str, column_type: &str, access_type: AccessType) -> ColumnSchema {
    ColumnSchema {
        name: name.to_string(),
        display_name: inflector::humanize(name),
        column_type: column_type.to_string(),
        is_array: false,
        access_type,
        default_value: Value::Null,
        validators: Vec::new(),
        reference: None,
        format: Map::new(),
        is_virtual: false,
    }
}

/// Fixed schema of the file-attachment model: file name, attachment name, the
/// polymorphic record it is attached to, and its creation time.
pub fn attachment_schema(class_name: &str) -> ModelSchema {
    let name = inflector::underscore(class_name);
    let mut record = plain_column("record_id", column_types::INTEGER, AccessType::ReadWrite);
    record.reference = Some(ReferenceSpec {
        name: "record".to_string(),
        model_name: None,
        reference_type: ReferenceType::BelongsTo,
        foreign_key: "record_id".to_string(),
        polymorphic: true,
    });

    ModelSchema {
        table_name: inflector::pluralize(&name).replace('/', "_"),
        slug: inflector::slugify(class_name),
        class_name: class_name.to_string(),
        primary_key: Some("id".to_string()),
        display_name: inflector::model_display_name(class_name),
        display_column: Some("filename".to_string()),
        columns: vec![
            plain_column("id", column_types::INTEGER, AccessType::ReadOnly),
            plain_column("filename", column_types::STRING, AccessType::ReadOnly),
            plain_column("name", column_types::STRING, AccessType::ReadOnly),
            record,
            plain_column("created_at", column_types::DATETIME, AccessType::ReadOnly),
        ],
        associations: Vec::new(),
        scopes: Vec::new(),
        actions: default_actions(),
        tabs: default_tabs(),
        visible: true,
        name,
    }
}
