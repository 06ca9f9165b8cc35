//! Compile programs to source code

use anyhow::{Context, Result};
use blockflow_codegen::{CompileOptions, CompileReport, Compiler};
use blockflow_core::{Config, Language, ProgramFile};

use super::{load_config, load_program};

/// Run the compile command
pub async fn run(
    config_path: &str,
    program: Option<&str>,
    language: Option<Language>,
    stdout: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let compiler = Compiler::new(CompileOptions::from_project(&config.project));

    let programs = match program {
        Some(program) => vec![load_program(&config, program)?],
        None => {
            tracing::info!("Compiling all programs in {}", config.programs_dir().display());
            config
                .load_programs()
                .context("Failed to load programs")?
        }
    };

    if programs.is_empty() {
        tracing::warn!("No programs found in {}", config.programs_dir().display());
        return Ok(());
    }

    let mut failed = Vec::new();
    for mut file in programs {
        // An explicit --language beats the one pinned in the program.
        if language.is_some() {
            file.source.language = language;
        }
        let report = compiler.compile(&file.source);
        for warning in &report.warnings {
            tracing::warn!("{}: {}", file.name, warning);
        }
        if !report.success {
            log_failure(&file, &report);
            failed.push(file.name);
            continue;
        }
        emit(&config, &file, report, stdout).await?;
    }

    if !failed.is_empty() {
        anyhow::bail!("Compilation failed for: {}", failed.join(", "));
    }

    tracing::info!("Compilation complete");
    Ok(())
}

async fn emit(config: &Config, file: &ProgramFile, report: CompileReport, stdout: bool) -> Result<()> {
    let code = report.code.unwrap_or_default();
    if stdout {
        println!("{}", code);
        return Ok(());
    }

    let output = config.output_path(&file.name, report.language);
    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(&output, format!("{}\n", code))
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let hash = report
        .ir
        .as_ref()
        .map(|ir| ir.content_hash())
        .unwrap_or_default();
    tracing::info!(
        "✓ {} → {} ({}, hash: {}...)",
        file.name,
        output.display(),
        report.language.config().name,
        hash.get(..8).unwrap_or_default()
    );
    Ok(())
}

fn log_failure(file: &ProgramFile, report: &CompileReport) {
    let stage = report
        .stage
        .map(|s| format!("{:?}", s))
        .unwrap_or_default();
    tracing::error!("✗ {} failed at {} stage", file.name, stage);
    for error in &report.errors {
        tracing::error!("  {}", error);
    }
}
