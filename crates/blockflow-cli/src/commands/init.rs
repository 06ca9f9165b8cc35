//! Initialize a new Blockflow project

use anyhow::{Context, Result};
use blockflow_core::config::CONFIG_FILE;
use std::fs;
use std::path::Path;

const HELLO_PROGRAM: &str = r#"{
  "blocks": [
    {"id": "start", "type": "start", "x": 120, "y": 40},
    {"id": "greeting", "type": "variable", "x": 120, "y": 120,
     "properties": {"var_name": "count", "data_type": "int", "initial_value": "3"}},
    {"id": "say", "type": "print", "x": 120, "y": 200,
     "properties": {"text": "Hello, Blockflow! count=", "variables": ["count"]}},
    {"id": "end", "type": "end", "x": 120, "y": 280}
  ],
  "connections": [
    {"from": "start", "to": "greeting"},
    {"from": "greeting", "to": "say"},
    {"from": "say", "to": "end"}
  ]
}
"#;

/// Run the init command
pub async fn run(path: &str, name: Option<&str>) -> Result<()> {
    let project_dir = Path::new(path);

    if !project_dir.exists() {
        fs::create_dir_all(project_dir)?;
    }

    let abs_path = project_dir.canonicalize()?;

    // Derive project name from directory name if not provided
    let project_name = match name {
        Some(n) => n.to_string(),
        None => abs_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Could not determine project name from path"))?,
    };

    if project_dir.join(CONFIG_FILE).exists() {
        anyhow::bail!(
            "Directory '{}' already contains a {}",
            project_dir.display(),
            CONFIG_FILE
        );
    }

    tracing::info!("Creating new Blockflow project: {}", project_name);

    fs::create_dir_all(project_dir.join("programs"))?;

    let config = format!(
        r#"# Blockflow Project Configuration
name: {project_name}
version: "0.1.0"

# Default target language: c, cpp, python or java
language: python

programs_dir: programs
output_dir: .blockflow/out

# Class wrapping generated Java programs
class_name: VisualProgram
"#
    );
    fs::write(project_dir.join(CONFIG_FILE), config)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    fs::write(project_dir.join("programs/hello.json"), HELLO_PROGRAM)?;

    let gitignore = r#"# Blockflow generated sources
.blockflow/

# IDE
.idea/
.vscode/
*.swp
"#;
    fs::write(project_dir.join(".gitignore"), gitignore)?;

    tracing::info!("✓ Project initialized at {}", abs_path.display());
    tracing::info!("");
    tracing::info!("Next steps:");
    tracing::info!("  blockflow --config {} compile", path);
    tracing::info!("  blockflow --config {} compile hello --language c --stdout", path);

    Ok(())
}
