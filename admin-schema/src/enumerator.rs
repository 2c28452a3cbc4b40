use std::fmt;

use crate::config::SchemaConfig;
use crate::registry::{ModelHandle, ModelRegistry};
use crate::types::{ModelDefinition, ModelLayer};

/// Why a loaded model is left out of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Abstract,
    AdminLayer,
    AuditLog,
    Infrastructure,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Exclusion::Abstract => "abstract",
            Exclusion::AdminLayer => "admin layer",
            Exclusion::AuditLog => "audit log",
            Exclusion::Infrastructure => "infrastructure",
        };
        f.write_str(reason)
    }
}

pub fn exclusion(model: &ModelDefinition, config: &SchemaConfig) -> Option<Exclusion> {
    if model.is_abstract {
        Some(Exclusion::Abstract)
    } else if model.layer == ModelLayer::Admin {
        Some(Exclusion::AdminLayer)
    } else if model.class_name == config.models.audit_model {
        Some(Exclusion::AuditLog)
    } else if config.models.excluded.iter().any(|excluded| *excluded == model.class_name) {
        Some(Exclusion::Infrastructure)
    } else {
        None
    }
}

/// Eligible models in registry order.
pub fn enumerate<'a>(registry: &'a ModelRegistry, config: &SchemaConfig) -> Vec<&'a ModelHandle> {
    registry
        .models()
        .iter()
        .filter(|model| exclusion(&model.definition, config).is_none())
        .collect()
}
