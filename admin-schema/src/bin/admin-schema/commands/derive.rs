use std::path::PathBuf;

use admin_schema::{
    ColumnSchema, DirectoryProvider, ModelSchema, ReferenceType, SchemaCatalog, SchemaConfig, ValidatorSpec,
};
use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;

use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, colored_cell, themed_table};
use crate::theme::THEME;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Whole Schema",
        commands: &[
            "admin-schema derive --models models                 # Summary of every model",
            "admin-schema --output json derive --models models   # Schema document for the admin UI",
        ],
    },
    ExampleGroup {
        title: "Single Model",
        commands: &["admin-schema derive --models models Blog::Post    # Columns of one model"],
    },
];

#[derive(Args)]
pub struct DeriveArgs {
    /// Directory of model descriptor files (*.toml, *.json)
    #[arg(long, value_name = "DIR")]
    pub models: Option<PathBuf>,

    /// Class name of a single model to derive (e.g. Blog::Post)
    pub model: Option<String>,
}

pub fn handle_derive(args: DeriveArgs, models_dir: PathBuf, config: SchemaConfig, output: &OutputManager) -> Result<()> {
    output.verbose(&format!("reading model definitions from {}", models_dir.display()));
    let catalog = SchemaCatalog::with_config(DirectoryProvider::new(&models_dir), config);

    match args.model {
        Some(class_name) => {
            let schema = catalog
                .derive_model(&class_name)
                .with_context(|| format!("Failed to derive schema from {}", models_dir.display()))?;
            match schema {
                Some(schema) => output.display(&ModelReport(schema)),
                None => {
                    output.error(&format!("No eligible model named '{class_name}'"));
                    output.info("Run 'admin-schema models' to see which models were loaded or excluded.");
                    anyhow::bail!("Unknown model {class_name}");
                }
            }
        }
        None => {
            let schemas = catalog
                .derive()
                .with_context(|| format!("Failed to derive schema from {}", models_dir.display()))?;
            if let Some(warning) = skipped_warning(schemas.len(), catalog.enumerate()?.len()) {
                output.warning(&warning);
            }
            output.display(&SchemaReport(schemas))?;
            output.success("Schema derived");
            Ok(())
        }
    }
}

/// Every derived model; serializes as the bare schema array.
#[derive(Serialize)]
#[serde(transparent)]
pub struct SchemaReport(pub Vec<ModelSchema>);

impl TableDisplay for SchemaReport {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        add_table_header(
            &mut table,
            options,
            &["Model", "Slug", "Table", "Display column", "Columns", "Associations", "Scopes"],
        );
        for schema in &self.0 {
            table.add_row(vec![
                colored_cell(&schema.name, THEME.primary, options),
                Cell::new(&schema.slug),
                Cell::new(&schema.table_name),
                Cell::new(schema.display_column.as_deref().unwrap_or("-")),
                Cell::new(schema.columns.len()),
                Cell::new(schema.associations.len()),
                Cell::new(schema.scopes.len()),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.0.iter().map(|schema| schema.name.as_str()).collect::<Vec<_>>().join(" ")
    }
}

/// One model's schema, rendered column by column.
#[derive(Serialize)]
#[serde(transparent)]
pub struct ModelReport(pub ModelSchema);

impl TableDisplay for ModelReport {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        add_table_header(&mut table, options, &["Column", "Type", "Access", "Reference", "Validators"]);
        for column in &self.0.columns {
            let column_type = if column.is_array {
                format!("{}[]", column.column_type)
            } else {
                column.column_type.clone()
            };
            table.add_row(vec![
                Cell::new(&column.name),
                Cell::new(column_type),
                colored_cell(column.access_type, THEME.access(column.access_type), options),
                Cell::new(describe_reference(column)),
                Cell::new(column.validators.iter().map(describe_validator).collect::<Vec<_>>().join(", ")),
            ]);
        }
        for association in &self.0.associations {
            table.add_row(vec![
                Cell::new(&association.name),
                Cell::new("has_many"),
                Cell::new("-"),
                Cell::new(format!("{} via {}", association.model_name, association.foreign_key)),
                Cell::new(""),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        let columns: Vec<_> = self.0.columns.iter().map(|column| column.name.as_str()).collect();
        format!("{}: {}", self.0.name, columns.join(","))
    }
}

/// Skipped models are logged at error level as they are dropped.
fn skipped_warning(derived: usize, eligible: usize) -> Option<String> {
    (derived < eligible).then(|| {
        format!(
            "{} of {eligible} models were skipped; the reasons are logged above \
             (RUST_LOG=admin_schema=debug adds relation details)",
            eligible - derived
        )
    })
}

fn describe_reference(column: &ColumnSchema) -> String {
    let Some(reference) = &column.reference else {
        return String::new();
    };
    let kind = match reference.reference_type {
        ReferenceType::BelongsTo => "belongs_to",
        ReferenceType::HasOne => "has_one",
    };
    let target = reference.model_name.as_deref().unwrap_or("*");
    if reference.polymorphic {
        format!("{kind} {target} (polymorphic)")
    } else {
        format!("{kind} {target}")
    }
}

fn describe_validator(validator: &ValidatorSpec) -> String {
    match validator {
        ValidatorSpec::Required => "required".to_string(),
        ValidatorSpec::Includes(values) => format!("includes({})", values.len()),
        ValidatorSpec::Format { source, flags } => format!("format /{source}/{flags}"),
        ValidatorSpec::Length(bounds) => match (bounds.minimum, bounds.maximum, bounds.is) {
            (_, _, Some(is)) => format!("length={is}"),
            (Some(min), Some(max), None) => format!("length {min}..{max}"),
            (Some(min), None, None) => format!("length>={min}"),
            (None, Some(max), None) => format!("length<={max}"),
            (None, None, None) => "length".to_string(),
        },
        ValidatorSpec::Numeric(_) => "numeric".to_string(),
    }
}
