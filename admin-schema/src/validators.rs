//! Client-side validators derived from a model's declared constraints.

use serde_json::Value;

use crate::errors::IntrospectionError;
use crate::patterns;
use crate::schema::{LengthBounds, ValidatorSpec};
use crate::types::{ModelDefinition, RelationDescriptor, RelationKind, ValidationRule};

/// Validators for one column, without structural duplicates.
///
/// A reference column also picks up rules declared on its relationship name
/// (`author` as well as `author_id`).
pub fn resolve(
    model: &ModelDefinition,
    column: &str,
    relation: Option<&RelationDescriptor>,
) -> Result<Vec<ValidatorSpec>, IntrospectionError> {
    let mut validators = Vec::new();

    if relation.is_some_and(|relation| relation.kind == RelationKind::BelongsTo && !relation.optional) {
        validators.push(ValidatorSpec::Required);
    }

    if let Some(enum_descriptor) = model.enum_for(column) {
        let values = enum_descriptor.values.iter().cloned().map(Value::String).collect();
        validators.push(ValidatorSpec::Includes(values));
    }

    let relation_name = relation.map(|relation| relation.name.as_str()).filter(|name| *name != column);
    let rules = model
        .validations
        .iter()
        .filter(|validation| validation.applies_to(column) || relation_name.is_some_and(|name| validation.applies_to(name)))
        .map(|validation| &validation.rule);
    for rule in rules {
        if let Some(validator) = map_rule(column, rule)? {
            validators.push(validator);
        }
    }

    Ok(dedup(validators))
}

/// Maps one declared rule onto the closed validator set. Kinds the UI cannot
/// evaluate map to `None`.
pub fn map_rule(column: &str, rule: &ValidationRule) -> Result<Option<ValidatorSpec>, IntrospectionError> {
    let validator = match rule {
        ValidationRule::Presence => ValidatorSpec::Required,
        ValidationRule::Inclusion { values } => ValidatorSpec::Includes(values.clone()),
        ValidationRule::Format { pattern } => {
            let portable = patterns::to_portable(pattern).map_err(|source| IntrospectionError::InvalidPattern {
                column: column.to_string(),
                source,
            })?;
            ValidatorSpec::Format {
                source: portable.source,
                flags: portable.flags,
            }
        }
        ValidationRule::Length { minimum, maximum, is } => ValidatorSpec::Length(LengthBounds {
            minimum: *minimum,
            maximum: *maximum,
            is: *is,
        }),
        ValidationRule::Numericality(constraints) => ValidatorSpec::Numeric(constraints.clone()),
        ValidationRule::Other => return Ok(None),
    };
    Ok(Some(validator))
}

fn dedup(validators: Vec<ValidatorSpec>) -> Vec<ValidatorSpec> {
    let mut unique: Vec<ValidatorSpec> = Vec::with_capacity(validators.len());
    for validator in validators {
        if !unique.contains(&validator) {
            unique.push(validator);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PatternError;
    use crate::types::{ColumnDescriptor, NumericConstraints, ValidationDescriptor};
    use serde_json::json;

    fn post() -> ModelDefinition {
        ModelDefinition::new("Post", "posts")
            .with_column(ColumnDescriptor::new("title", "varchar"))
            .with_column(ColumnDescriptor::new("status", "int4"))
            .with_enum("status", ["draft", "published"])
            .with_validation(ValidationDescriptor::new(["title"], ValidationRule::Presence))
            .with_validation(ValidationDescriptor::new(["title", "status"], ValidationRule::Presence))
            .with_validation(ValidationDescriptor::new(
                ["title"],
                ValidationRule::Length {
                    minimum: Some(3),
                    maximum: None,
                    is: None,
                },
            ))
            .with_validation(ValidationDescriptor::new(["title"], ValidationRule::Other))
    }

    #[test]
    fn declared_rules_are_mapped_and_deduplicated() {
        let validators = resolve(&post(), "title", None).unwrap();
        assert_eq!(
            validators,
            vec![
                ValidatorSpec::Required,
                ValidatorSpec::Length(LengthBounds {
                    minimum: Some(3),
                    ..LengthBounds::default()
                }),
            ]
        );
    }

    #[test]
    fn enum_columns_include_their_values() {
        let validators = resolve(&post(), "status", None).unwrap();
        assert_eq!(
            validators,
            vec![ValidatorSpec::Includes(vec![json!("draft"), json!("published")]), ValidatorSpec::Required]
        );
    }

    #[test]
    fn required_belongs_to_comes_first() {
        let model = post().with_validation(ValidationDescriptor::new(["author"], ValidationRule::Presence));
        let author = RelationDescriptor::belongs_to("author", "User");
        assert_eq!(resolve(&model, "author_id", Some(&author)).unwrap(), vec![ValidatorSpec::Required]);

        let editor = RelationDescriptor::belongs_to("editor", "User").optional();
        assert!(resolve(&model, "editor_id", Some(&editor)).unwrap().is_empty());

        let cover = RelationDescriptor::has_one("cover", "Image");
        assert!(resolve(&model, "cover", Some(&cover)).unwrap().is_empty());
    }

    #[test]
    fn format_rules_are_translated() {
        let rule = ValidationRule::Format {
            pattern: r"(?i)\A[a-z0-9-]+\z".to_string(),
        };
        assert_eq!(
            map_rule("slug", &rule).unwrap(),
            Some(ValidatorSpec::Format {
                source: "^[a-z0-9-]+$".to_string(),
                flags: "i".to_string(),
            })
        );

        let broken = ValidationRule::Format {
            pattern: "([a-z]".to_string(),
        };
        assert!(matches!(
            map_rule("slug", &broken),
            Err(IntrospectionError::InvalidPattern { column, .. }) if column == "slug"
        ));
    }

    #[test]
    fn untranslatable_format_is_an_error() {
        let rule = ValidationRule::Format {
            pattern: "[a-z&&[^aeiou]]+".to_string(),
        };
        assert!(matches!(
            map_rule("consonants", &rule),
            Err(IntrospectionError::InvalidPattern {
                source: PatternError::Unsupported { .. },
                ..
            })
        ));
    }

    #[test]
    fn numericality_keeps_its_constraints() {
        let constraints = NumericConstraints {
            only_integer: true,
            ..NumericConstraints::default()
        };
        let rule = ValidationRule::Numericality(constraints.clone());
        assert_eq!(map_rule("rank", &rule).unwrap(), Some(ValidatorSpec::Numeric(constraints)));
        assert_eq!(map_rule("rank", &ValidationRule::Other).unwrap(), None);
    }
}
