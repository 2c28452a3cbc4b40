use std::collections::HashMap;

use log::debug;

use crate::config::SchemaConfig;
use crate::errors::{LoadError, SchemaError};
use crate::types::{ModelDefinition, RelationDescriptor, RelationKind};

/// Outcome of resolving a relationship's target once at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationTarget {
    Model { class_name: String },
    /// Polymorphic belongs-to: the target class is stored per record.
    Polymorphic,
}

impl RelationTarget {
    pub fn class_name(&self) -> Option<&str> {
        match self {
            RelationTarget::Model { class_name } => Some(class_name),
            RelationTarget::Polymorphic => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedRelation {
    pub descriptor: RelationDescriptor,
    pub target: RelationTarget,
}

impl ResolvedRelation {
    pub fn kind(&self) -> RelationKind {
        self.descriptor.kind
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

/// A loaded model: its definition plus the relationships whose targets resolved.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    pub definition: ModelDefinition,
    pub relations: Vec<ResolvedRelation>,
}

impl ModelHandle {
    pub fn class_name(&self) -> &str {
        &self.definition.class_name
    }
}

/// Every loaded model, in the order the provider reported them.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: Vec<ModelHandle>,
    index: HashMap<String, usize>,
}

impl ModelRegistry {
    /// Indexes `definitions` and resolves every relationship target once.
    ///
    /// Relationships whose target is not loaded are dropped from the handle and
    /// logged; later stages only ever see resolved relationships.
    pub fn build(definitions: Vec<ModelDefinition>, config: &SchemaConfig) -> Result<Self, LoadError> {
        let mut index = HashMap::with_capacity(definitions.len());
        for (position, definition) in definitions.iter().enumerate() {
            if index.insert(definition.class_name.clone(), position).is_some() {
                return Err(LoadError::DuplicateModel {
                    class_name: definition.class_name.clone(),
                });
            }
        }

        let models = definitions
            .into_iter()
            .map(|definition| {
                let relations = definition
                    .relations
                    .iter()
                    .filter_map(|relation| match resolve_target(&index, config, &definition, relation) {
                        Ok(target) => Some(ResolvedRelation {
                            descriptor: relation.clone(),
                            target,
                        }),
                        Err(err) => {
                            debug!("dropping relation: {err}");
                            None
                        }
                    })
                    .collect();
                ModelHandle { definition, relations }
            })
            .collect();

        Ok(Self { models, index })
    }

    pub fn models(&self) -> &[ModelHandle] {
        &self.models
    }

    pub fn get(&self, class_name: &str) -> Option<&ModelHandle> {
        self.index.get(class_name).map(|&position| &self.models[position])
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Only a missing target counts as unresolvable. A polymorphic belongs-to has no
/// single target and always resolves.
fn resolve_target(
    index: &HashMap<String, usize>,
    config: &SchemaConfig,
    owner: &ModelDefinition,
    relation: &RelationDescriptor,
) -> Result<RelationTarget, SchemaError> {
    if relation.polymorphic && relation.kind == RelationKind::BelongsTo {
        return Ok(RelationTarget::Polymorphic);
    }
    let target = relation.target.as_deref().unwrap_or_default();
    if index.contains_key(target) || config.is_storage_model(target) {
        return Ok(RelationTarget::Model {
            class_name: target.to_string(),
        });
    }
    Err(SchemaError::TargetUnresolvable {
        model: owner.class_name.clone(),
        relation: relation.name.clone(),
        target: target.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions() -> Vec<ModelDefinition> {
        vec![
            ModelDefinition::new("User", "users"),
            ModelDefinition::new("Post", "posts")
                .with_relation(RelationDescriptor::belongs_to("author", "User"))
                .with_relation(RelationDescriptor::belongs_to("editor", "Editor"))
                .with_relation(RelationDescriptor::belongs_to_polymorphic("subject"))
                .with_relation(RelationDescriptor::has_one("cover_attachment", "Storage::Attachment")),
        ]
    }

    #[test]
    fn unresolvable_targets_are_dropped() {
        let registry = ModelRegistry::build(definitions(), &SchemaConfig::default()).unwrap();
        let post = registry.get("Post").unwrap();
        let names: Vec<_> = post.relations.iter().map(ResolvedRelation::name).collect();
        assert_eq!(names, ["author", "subject", "cover_attachment"]);
        assert_eq!(post.relations[1].target, RelationTarget::Polymorphic);
        assert_eq!(post.relations[2].target.class_name(), Some("Storage::Attachment"));
    }

    #[test]
    fn registry_preserves_provider_order() {
        let registry = ModelRegistry::build(definitions(), &SchemaConfig::default()).unwrap();
        let order: Vec<_> = registry.models().iter().map(ModelHandle::class_name).collect();
        assert_eq!(order, ["User", "Post"]);
        assert_eq!(registry.len(), 2);
        assert!(registry.get("Comment").is_none());
    }

    #[test]
    fn duplicate_class_names_fail_the_load() {
        let mut defs = definitions();
        defs.push(ModelDefinition::new("User", "people"));
        let err = ModelRegistry::build(defs, &SchemaConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateModel { class_name } if class_name == "User"));
    }
}
