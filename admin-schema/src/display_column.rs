use crate::config::SchemaConfig;
use crate::schema::column_types;
use crate::types::ModelDefinition;

/// Picks the column the admin UI shows when it needs a one-line label for a record.
pub trait DisplayColumnResolver: Send + Sync {
    fn display_column(&self, model: &ModelDefinition, config: &SchemaConfig) -> Option<String>;
}

const PREFERRED_COLUMNS: &[&str] = &[
    "name",
    "full_name",
    "fullname",
    "last_name",
    "lastname",
    "first_name",
    "firstname",
    "login",
    "email",
    "username",
    "title",
];

/// Prefers well-known label columns among the model's string columns, then any
/// string column whose name mentions `name` or `title`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameHeuristic;

impl DisplayColumnResolver for NameHeuristic {
    fn display_column(&self, model: &ModelDefinition, config: &SchemaConfig) -> Option<String> {
        let candidates: Vec<&str> = model
            .columns
            .iter()
            .filter(|column| {
                !column.array && config.unified_type(&column.sql_type).as_deref() == Some(column_types::STRING)
            })
            .map(|column| column.name.as_str())
            .collect();

        PREFERRED_COLUMNS
            .iter()
            .copied()
            .find(|preferred| candidates.contains(preferred))
            .or_else(|| {
                candidates
                    .iter()
                    .copied()
                    .find(|name| name.contains("name") || name.contains("title"))
            })
            .map(str::to_string)
    }
}
