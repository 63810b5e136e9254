//! file: cli/src/output.rs
//! description: renders lowered modules, summaries and evaluation outcomes
//! for the terminal.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use console::Style;
use serde_json::json;

use nullguard_core::{LoweredModule, Outcome};

/// Styles for the different kinds of output line.
pub struct FormatStyle {
    pub title: Style,
    pub info: Style,
    pub error: Style,
    pub success: Style,
}

impl Default for FormatStyle {
    fn default() -> Self {
        FormatStyle {
            title: Style::new().bold().underlined(),
            info: Style::new().cyan(),
            error: Style::new().red().bold(),
            success: Style::new().green().bold(),
        }
    }
}

/// Output format of `nullguard lower`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Format::Text),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

pub fn render_lowered(lowered: &LoweredModule, format: Format) -> Result<String, serde_json::Error> {
    match format {
        Format::Text => Ok(lowered.to_string()),
        Format::Json => {
            let doc = json!({
                "module": lowered.module.name(),
                "id": lowered.module.id().to_string(),
                "functions": serde_json::to_value(&lowered.functions)?,
                "synthesized": serde_json::to_value(lowered.module.synthesized_methods())?,
            });
            let mut text = serde_json::to_string_pretty(&doc)?;
            text.push('\n');
            Ok(text)
        }
    }
}

/// One row per function, across every lowered module.
pub fn summary_table(modules: &[LoweredModule]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Module", "Function", "Parameters", "Guards"]);

    for lowered in modules {
        for function in &lowered.functions {
            table.add_row(vec![
                Cell::new(lowered.module.name()),
                Cell::new(&function.name),
                Cell::new(function.parameters.len()).set_alignment(CellAlignment::Right),
                Cell::new(function.guards).set_alignment(CellAlignment::Right),
            ]);
        }
    }
    table
}

pub fn summary_footer(modules: &[LoweredModule], style: &FormatStyle) -> String {
    let functions: usize = modules.iter().map(|m| m.functions.len()).sum();
    let guards: usize = modules.iter().map(LoweredModule::guard_count).sum();
    style
        .info
        .apply_to(format!(
            "{} module(s), {} function(s), {} guard(s)",
            modules.len(),
            functions,
            guards
        ))
        .to_string()
}

pub fn render_outcome(function: &str, outcome: &Outcome, style: &FormatStyle) -> String {
    match outcome {
        Outcome::Returned(value) => format!(
            "{} {} returned {}",
            style.success.apply_to("ok"),
            function,
            value
        ),
        Outcome::Threw(exception) => format!(
            "{} {} threw {}",
            style.error.apply_to("exception"),
            function,
            exception
        ),
    }
}
