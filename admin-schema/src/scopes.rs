use serde_json::Map;

use crate::config::SchemaConfig;
use crate::inflector;
use crate::schema::{DEFAULT_SCOPE_TYPE, ScopeSchema};
use crate::types::ModelDefinition;

/// Named scopes offered as filters, minus the generated attachment eager-loaders.
pub fn extract(model: &ModelDefinition, config: &SchemaConfig) -> Vec<ScopeSchema> {
    let hidden_prefix = config.scopes.hidden_prefix.as_str();
    model
        .scopes
        .iter()
        .filter(|scope| hidden_prefix.is_empty() || !scope.starts_with(hidden_prefix))
        .map(|scope| ScopeSchema {
            name: scope.clone(),
            display_name: inflector::humanize(scope),
            scope_type: DEFAULT_SCOPE_TYPE.to_string(),
            visible: true,
            preferences: Map::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_scopes_are_hidden() {
        let model = ModelDefinition::new("User", "users")
            .with_scope("with_attached_avatar")
            .with_scope("active")
            .with_scope("recently_signed_in");
        let scopes = extract(&model, &SchemaConfig::default());
        let names: Vec<_> = scopes.iter().map(|scope| scope.name.as_str()).collect();
        assert_eq!(names, ["active", "recently_signed_in"]);
        assert_eq!(scopes[1].display_name, "Recently signed in");
        assert_eq!(scopes[0].scope_type, "default");
        assert!(scopes[0].preferences.is_empty());
    }
}
