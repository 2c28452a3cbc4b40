use crate::config::SchemaConfig;
use crate::inflector;
use crate::registry::ModelHandle;
use crate::schema::AssociationSchema;

/// Plural relationships (has-many, has-many-through, many-to-many) in declaration
/// order. Relationships into the blob storage model are never exposed.
pub fn extract(model: &ModelHandle, config: &SchemaConfig) -> Vec<AssociationSchema> {
    model
        .relations
        .iter()
        .filter(|relation| !relation.kind().is_singular())
        .filter_map(|relation| {
            let target = relation.target.class_name()?;
            if config.is_blob(target) {
                return None;
            }
            let descriptor = &relation.descriptor;
            Some(AssociationSchema {
                name: descriptor.name.clone(),
                display_name: inflector::humanize(&descriptor.name),
                slug: inflector::underscore(&descriptor.name),
                model_name: inflector::underscore(target),
                foreign_key: descriptor.foreign_key_for(model.class_name()),
                polymorphic: descriptor.as_name.is_some() || descriptor.polymorphic || config.is_attachment(target),
                visible: true,
            })
        })
        .collect()
}
