use std::path::PathBuf;

use admin_schema::enumerator::exclusion;
use admin_schema::{DirectoryProvider, SchemaCatalog, SchemaConfig};
use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;

use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, colored_cell, themed_table};
use crate::theme::{ICONS, THEME};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Loaded Models",
    commands: &[
        "admin-schema models --models models                # Which models are exposed, and why not",
        "admin-schema --output compact models               # Eligible class names only",
    ],
}];

#[derive(Args)]
pub struct ModelsArgs {
    /// Directory of model descriptor files (*.toml, *.json)
    #[arg(long, value_name = "DIR")]
    pub models: Option<PathBuf>,
}

#[derive(Serialize)]
pub struct ModelEntry {
    pub class_name: String,
    pub table_name: String,
    pub relations: usize,
    /// Relations dropped at load because their target is not a loaded model
    pub dropped_relations: usize,
    pub excluded: Option<String>,
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct ModelListing(pub Vec<ModelEntry>);

pub fn handle_models(models_dir: PathBuf, config: SchemaConfig, output: &OutputManager) -> Result<()> {
    let catalog = SchemaCatalog::with_config(DirectoryProvider::new(&models_dir), config);
    let registry = catalog
        .ensure_loaded()
        .with_context(|| format!("Failed to load models from {}", models_dir.display()))?;

    let entries: Vec<ModelEntry> = registry
        .models()
        .iter()
        .map(|model| ModelEntry {
            class_name: model.class_name().to_string(),
            table_name: model.definition.table_name.clone(),
            relations: model.relations.len(),
            dropped_relations: model.definition.relations.len() - model.relations.len(),
            excluded: exclusion(&model.definition, catalog.config()).map(|reason| reason.to_string()),
        })
        .collect();

    let eligible = entries.iter().filter(|entry| entry.excluded.is_none()).count();
    output.heading(&format!("Models in {}", models_dir.display()));
    output.key_value("Loaded", &entries.len().to_string());
    output.key_value("Eligible", &eligible.to_string());
    for entry in entries.iter().filter(|entry| entry.dropped_relations > 0) {
        output.bullet(&format!(
            "{} has {} relation(s) with an unknown target",
            entry.class_name, entry.dropped_relations
        ));
    }
    output.display(&ModelListing(entries))
}

impl TableDisplay for ModelListing {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        add_table_header(&mut table, options, &["Class", "Table", "Relations", "Status"]);
        for entry in &self.0 {
            let status = match &entry.excluded {
                Some(reason) => colored_cell(format!("{} {reason}", ICONS.cross), THEME.muted, options),
                None => colored_cell(format!("{} exposed", ICONS.success), THEME.success, options),
            };
            table.add_row(vec![
                Cell::new(&entry.class_name),
                Cell::new(&entry.table_name),
                Cell::new(entry.relations),
                status,
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.0
            .iter()
            .filter(|entry| entry.excluded.is_none())
            .map(|entry| entry.class_name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
