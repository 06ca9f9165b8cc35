//! JSON views: languages, block palette, intermediate representation

use anyhow::{Context, Result};
use blockflow_codegen::ProgramIr;
use blockflow_core::{Language, available_languages, palette};
use serde::Serialize;

use super::{load_config, load_program};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// List supported target languages
pub async fn languages() -> Result<()> {
    print_json(&available_languages())
}

/// Show the block palette for `language`
pub async fn blocks(language: Language) -> Result<()> {
    print_json(&palette(language))
}

/// Print the IR of a program together with its content hash
pub async fn ir(config_path: &str, program: &str) -> Result<()> {
    #[derive(Serialize)]
    struct IrOutput {
        hash: String,
        #[serde(flatten)]
        ir: ProgramIr,
        warnings: Vec<String>,
    }

    let config = load_config(config_path)?;
    let file = load_program(&config, program)?;
    let build = file.source.build_graph();
    if !build.errors.is_empty() {
        anyhow::bail!("{}", build.errors.join("; "));
    }

    let ir = ProgramIr::from_graph(&build.graph);
    tracing::debug!("Built IR for {} with {} nodes", file.name, ir.nodes.len());
    print_json(&IrOutput {
        hash: ir.content_hash(),
        ir,
        warnings: build.warnings,
    })
}
