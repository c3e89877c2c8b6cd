//! CQL type model command-line interface

mod loader;
mod output;
mod script;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::Parser;
use colored::Colorize;

use crate::loader::Loader;
use crate::output::{OutputFormat, render};
use crate::script::ScriptError;

/// Resolve generic class declarations from a model script
#[derive(Parser)]
#[command(name = "cql-types")]
#[command(author, version, about = "CQL type model tools", long_about = None)]
struct Cli {
    /// Model script to load
    file: PathBuf,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Plain class to register before loading (repeatable)
    #[arg(short, long = "class", value_name = "NAME")]
    classes: Vec<String>,
    /// Disable colored output
    #[arg(long)]
    no_color: bool,
    /// Print each resolution step to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ScriptError>() {
                Some(script_error) => eprintln!(
                    "{} {}",
                    format!("line {}:", script_error.line).bold(),
                    script_error.diagnostic.to_colored_string()
                ),
                None => eprintln!("{} {err:#}", "error:".red().bold()),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut loader = Loader::new()
        .and_then(|loader| loader.with_classes(&cli.classes))
        .map_err(|err| anyhow!(err.to_diagnostic().to_string()))?;

    let loaded = loader.load_file(&cli.file);
    if cli.verbose {
        for step in loader.steps() {
            eprintln!("{} {step}", "-".dimmed());
        }
    }
    loaded?;

    println!("{}", render(loader.entries(), cli.format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::parse_from([
            "cql-types",
            "model.cqlm",
            "--format",
            "json",
            "--class",
            "Collection",
            "-c",
            "Resource",
            "--verbose",
        ]);
        assert_eq!(cli.file, PathBuf::from("model.cqlm"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.classes, vec!["Collection", "Resource"]);
        assert!(cli.verbose);
        assert!(!cli.no_color);
    }

    #[test]
    fn test_run_reports_script_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.cqlm");
        std::fs::write(&path, "class Person\nclass Team { lead: Manager }\n").unwrap();

        let cli = Cli::parse_from(["cql-types", path.to_str().unwrap()]);
        let err = run(&cli).unwrap_err();
        let script_error = err.downcast_ref::<ScriptError>().unwrap();
        assert_eq!(script_error.line, 2);
    }
}
