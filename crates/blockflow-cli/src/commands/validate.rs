//! Validate a program without writing any output

use anyhow::Result;
use blockflow_codegen::{CompileOptions, Compiler};
use blockflow_core::validate_program;

use super::{load_config, load_program};

/// Run the validate command
pub async fn run(config_path: &str, program: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let file = load_program(&config, program)?;
    tracing::info!("Validating {}", file.path.display());

    let structure = validate_program(&file.source);
    tracing::info!(
        "✓ {} blocks, {} connections",
        structure.block_count,
        structure.connection_count
    );

    let report = Compiler::new(CompileOptions::from_project(&config.project)).compile(&file.source);

    // Both passes word shared findings identically, so merging by text
    // reports each one once.
    let errors = merge(structure.errors, report.errors);
    let warnings = merge(structure.warnings, report.warnings);

    for warning in &warnings {
        println!("warning: {}", warning);
    }
    for error in &errors {
        println!("error: {}", error);
    }

    if !errors.is_empty() {
        anyhow::bail!("{} is invalid ({} errors)", file.name, errors.len());
    }

    println!("✓ {} is valid", file.name);
    Ok(())
}

fn merge(mut findings: Vec<String>, more: Vec<String>) -> Vec<String> {
    for finding in more {
        if !findings.contains(&finding) {
            findings.push(finding);
        }
    }
    findings
}
