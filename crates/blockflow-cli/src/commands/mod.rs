//! CLI command implementations

pub mod compile;
pub mod init;
pub mod inspect;
pub mod validate;

use anyhow::{Context, Result};
use blockflow_core::{Config, ProgramFile, ProgramSource};
use std::path::{Path, PathBuf};

/// Load the project configuration, falling back to defaults when absent
pub fn load_config(config_path: &str) -> Result<Config> {
    tracing::debug!("Loading configuration from {}", config_path);
    Config::load_or_default(config_path).context("Failed to load configuration")
}

/// Resolve a program argument to a loaded program file
///
/// The argument is a path to a program file, or the stem of a file anywhere
/// under the project's programs directory.
pub fn load_program(config: &Config, program: &str) -> Result<ProgramFile> {
    let path = find_program(config, program)
        .with_context(|| format!("Program not found: {}", program))?;
    let source = ProgramSource::load(&path)
        .with_context(|| format!("Failed to load program {}", path.display()))?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.to_string());
    Ok(ProgramFile { name, path, source })
}

fn find_program(config: &Config, program: &str) -> Option<PathBuf> {
    let direct = Path::new(program);
    if direct.is_file() {
        return Some(direct.to_path_buf());
    }

    walkdir::WalkDir::new(config.programs_dir())
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .find(|p| {
            p.file_stem().is_some_and(|stem| stem == program)
                && p.extension()
                    .is_some_and(|ext| ext == "json" || ext == "yaml" || ext == "yml")
        })
}
