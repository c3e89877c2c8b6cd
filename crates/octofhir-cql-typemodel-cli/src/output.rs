//! Rendering of loaded classes

use clap::ValueEnum;
use colored::Colorize;
use octofhir_cql_typemodel::{ClassType, DataType, TypeParameter};
use serde_json::json;

use crate::loader::Entry;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented class listing
    Text,
    /// Type specifiers as JSON
    Json,
}

/// Render entries in the chosen format
pub fn render(entries: &[Entry], format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(entries)),
        OutputFormat::Json => render_json(entries),
    }
}

fn render_text(entries: &[Entry]) -> String {
    let mut out = String::new();
    for entry in entries {
        match entry {
            Entry::Class(class) => {
                out.push_str(&format!("{} {}\n", "class".cyan(), declaration(class).bold()));
                push_body(&mut out, class);
            }
            Entry::Binding { alias, class } => {
                out.push_str(&format!(
                    "{} {} = {}\n",
                    "bind".cyan(),
                    alias.bold(),
                    class.name()
                ));
                push_body(&mut out, class);
            }
        }
    }
    out
}

fn push_body(out: &mut String, class: &ClassType) {
    if let Some(base) = class.base_type().filter(|base| !base.is_any()) {
        out.push_str(&format!("  {} {base}\n", "extends".dimmed()));
    }
    for element in class.tuple_type().elements() {
        let origin = if class.element(element.name()).is_some() {
            ""
        } else {
            " (inherited)"
        };
        out.push_str(&format!("  {element}{}\n", origin.dimmed()));
    }
}

fn declaration(class: &ClassType) -> String {
    if !class.is_generic() {
        return class.name().to_string();
    }
    let parameters: Vec<String> = class.generic_parameters().iter().map(parameter).collect();
    format!("{}<{}>", class.name(), parameters.join(", "))
}

fn parameter(parameter: &TypeParameter) -> String {
    match parameter.constraint_type() {
        Some(bound) => format!("{} extends {bound}", parameter.identifier()),
        None => parameter.identifier().to_string(),
    }
}

fn render_json(entries: &[Entry]) -> serde_json::Result<String> {
    let values = entries
        .iter()
        .map(|entry| -> serde_json::Result<serde_json::Value> {
            let (alias, class) = match entry {
                Entry::Class(class) => (None, class),
                Entry::Binding { alias, class } => (Some(alias), class),
            };
            let specifier = DataType::Class(class.clone()).to_specifier();
            Ok(match alias {
                Some(alias) => json!({ "alias": alias, "specifier": serde_json::to_value(specifier)? }),
                None => json!({ "specifier": serde_json::to_value(specifier)? }),
            })
        })
        .collect::<serde_json::Result<Vec<_>>>()?;
    serde_json::to_string_pretty(&values)
}
