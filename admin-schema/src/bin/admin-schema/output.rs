use anyhow::Result;
use clap::ValueEnum;
use colored::{Color, Colorize};
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use serde::Serialize;

use crate::theme::{ICONS, THEME};

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Data that can be rendered in every output format
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Display data according to the configured output format.
    ///
    /// JSON is written even in quiet mode, since scripts rely on it.
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                println!("{json}");
            }
            OutputFormat::Table if !self.options.quiet => {
                let table = data.to_table(&self.options);
                println!("{table}");
            }
            OutputFormat::Compact if !self.options.quiet => {
                println!("{}", data.to_compact());
            }
            _ => {}
        }
        Ok(())
    }

    fn message(&self, icon: &str, color: Color, message: &str) -> String {
        if self.options.no_color {
            format!("{icon} {message}")
        } else {
            format!("{} {}", icon.color(color), message.color(color))
        }
    }

    fn chatty(&self) -> bool {
        !self.options.quiet && self.options.output_format != OutputFormat::Json
    }

    pub fn success(&self, message: &str) {
        if self.chatty() {
            println!("{}", self.message(ICONS.success, THEME.success, message));
        }
    }

    /// Errors are always shown, on stderr.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.message(ICONS.error, THEME.error, message));
    }

    pub fn warning(&self, message: &str) {
        if self.chatty() {
            eprintln!("{}", self.message(ICONS.warning, THEME.warning, message));
        }
    }

    pub fn info(&self, message: &str) {
        if self.chatty() {
            println!("{}", self.message(ICONS.info, THEME.info, message));
        }
    }

    /// Only shown with `--verbose`.
    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            eprintln!("{}", self.message(ICONS.arrow, THEME.muted, message));
        }
    }

    pub fn heading(&self, text: &str) {
        if self.chatty() {
            let output = if self.options.no_color {
                format!("\n{text}\n{}", "=".repeat(text.chars().count()))
            } else {
                format!("\n{}", text.color(THEME.primary).bold())
            };
            println!("{output}");
        }
    }

    pub fn key_value(&self, key: &str, value: &str) {
        if self.chatty() {
            let output = if self.options.no_color {
                format!("{key}: {value}")
            } else {
                format!("{}: {}", key.color(THEME.key).bold(), value.color(THEME.value))
            };
            println!("{output}");
        }
    }

    pub fn bullet(&self, text: &str) {
        if self.chatty() {
            let output = if self.options.no_color {
                format!("  {} {text}", ICONS.bullet)
            } else {
                format!("  {} {text}", ICONS.bullet.color(THEME.muted))
            };
            println!("{output}");
        }
    }
}

/// Table with the preset matching the color setting
pub fn themed_table(options: &GlobalOptions) -> Table {
    let mut table = Table::new();
    if options.no_color {
        table.load_preset(comfy_table::presets::ASCII_FULL);
    } else {
        table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    }
    table
}

pub fn add_table_header(table: &mut Table, options: &GlobalOptions, headers: &[&str]) {
    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|header| {
            let cell = Cell::new(header).add_attribute(Attribute::Bold);
            if options.no_color {
                cell
            } else {
                cell.fg(table_color(THEME.highlight))
            }
        })
        .collect();
    table.set_header(header_cells);
}

/// Cell colored with a theme color unless colors are disabled
pub fn colored_cell(text: impl ToString, color: Color, options: &GlobalOptions) -> Cell {
    let cell = Cell::new(text.to_string());
    if options.no_color { cell } else { cell.fg(table_color(color)) }
}

fn table_color(color: Color) -> TableColor {
    match color {
        Color::Black => TableColor::Black,
        Color::Red => TableColor::Red,
        Color::Green => TableColor::Green,
        Color::Yellow => TableColor::Yellow,
        Color::Blue => TableColor::Blue,
        Color::Magenta => TableColor::Magenta,
        Color::Cyan => TableColor::Cyan,
        Color::White => TableColor::White,
        Color::BrightBlack => TableColor::DarkGrey,
        Color::BrightRed => TableColor::DarkRed,
        Color::BrightGreen => TableColor::DarkGreen,
        Color::BrightYellow => TableColor::DarkYellow,
        Color::BrightBlue => TableColor::DarkBlue,
        Color::BrightMagenta => TableColor::DarkMagenta,
        Color::BrightCyan => TableColor::DarkCyan,
        Color::BrightWhite => TableColor::Grey,
        Color::TrueColor { r, g, b } => TableColor::Rgb { r, g, b },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    impl TableDisplay for TestData {
        fn to_table(&self, options: &GlobalOptions) -> Table {
            let mut table = themed_table(options);
            table.add_row(vec![Cell::new("Name"), Cell::new(&self.name)]);
            table.add_row(vec![Cell::new("Value"), Cell::new(self.value.to_string())]);
            table
        }

        fn to_compact(&self) -> String {
            format!("{}={}", self.name, self.value)
        }
    }

    fn data() -> TestData {
        TestData {
            name: "test".to_string(),
            value: 42,
        }
    }

    #[test]
    fn test_output_manager_json() {
        let manager = OutputManager::new(GlobalOptions {
            output_format: OutputFormat::Json,
            ..Default::default()
        });
        assert!(manager.display(&data()).is_ok());
    }

    #[test]
    fn test_output_manager_quiet() {
        let manager = OutputManager::new(GlobalOptions {
            quiet: true,
            ..Default::default()
        });
        assert!(manager.display(&data()).is_ok());
        assert!(!manager.chatty());
    }

    #[test]
    fn test_table_preset_follows_color_setting() {
        let options = GlobalOptions {
            no_color: true,
            ..Default::default()
        };
        let rendered = data().to_table(&options).to_string();
        assert!(rendered.contains("Name"));
        assert!(rendered.contains('+'));
    }
}
