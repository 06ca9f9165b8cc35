//! Project configuration
//!
//! A Blockflow project is a directory holding a `blockflow.yaml` file and a
//! directory of program files.
//!
//! # Layout
//!
//! - `blockflow.yaml` - project name, default target language, directories
//! - `programs/*.json` / `programs/*.yaml` - block programs from the editor

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::language::Language;
use crate::program::ProgramSource;

/// Name of the project configuration file
pub const CONFIG_FILE: &str = "blockflow.yaml";

/// Root project configuration from `blockflow.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// Default target language
    #[serde(default)]
    pub language: Language,

    /// Directory holding program files, relative to the project root
    #[serde(default = "default_programs_dir")]
    pub programs_dir: String,

    /// Directory receiving generated sources
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Class wrapping generated Java programs
    #[serde(default = "default_class_name")]
    pub class_name: String,
}

impl ProjectConfig {
    /// Configuration with every default and the given name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            language: Language::default(),
            programs_dir: default_programs_dir(),
            output_dir: default_output_dir(),
            class_name: default_class_name(),
        }
    }

    fn check(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::ConfigInvalid {
                message: "project name must not be empty".to_string(),
            });
        }
        if !is_identifier(&self.class_name) {
            return Err(Error::ConfigInvalid {
                message: format!("class_name '{}' is not a valid identifier", self.class_name),
            });
        }
        Ok(())
    }
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_programs_dir() -> String {
    "programs".to_string()
}

fn default_output_dir() -> String {
    ".blockflow/out".to_string()
}

fn default_class_name() -> String {
    "VisualProgram".to_string()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A program file found in the project
#[derive(Debug, Clone)]
pub struct ProgramFile {
    /// File stem, used to name the generated source
    pub name: String,
    /// Path of the program file
    pub path: PathBuf,
    /// Parsed program
    pub source: ProgramSource,
}

/// Main configuration container
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Base path of the project
    pub base_path: PathBuf,
}

impl Config {
    /// Load configuration from a directory or a `blockflow.yaml` path
    ///
    /// ```rust,ignore
    /// let config = Config::load("./my-project")?;
    /// println!("Project: {}", config.project.name);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let (config_path, base_path) = if path.is_dir() {
            (path.join(CONFIG_FILE), path.to_path_buf())
        } else {
            (
                path.to_path_buf(),
                path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            )
        };

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let project: ProjectConfig = serde_yaml::from_str(&contents)?;
        project.check()?;

        tracing::debug!("Loaded project '{}' from {}", project.name, config_path.display());
        Ok(Self { project, base_path })
    }

    /// Like [`Config::load`], but a missing file yields defaults rooted at `path`
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match Self::load(path) {
            Err(Error::ConfigNotFound { .. }) => {
                let base_path = if path.file_name().is_some_and(|n| n == CONFIG_FILE) {
                    path.parent().unwrap_or(Path::new(".")).to_path_buf()
                } else {
                    path.to_path_buf()
                };
                let name = base_path
                    .canonicalize()
                    .ok()
                    .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                    .unwrap_or_else(|| "blockflow".to_string());
                Ok(Self {
                    project: ProjectConfig::named(name),
                    base_path,
                })
            }
            other => other,
        }
    }

    /// Directory holding program files
    pub fn programs_dir(&self) -> PathBuf {
        self.base_path.join(&self.project.programs_dir)
    }

    /// Directory receiving generated sources
    pub fn output_dir(&self) -> PathBuf {
        self.base_path.join(&self.project.output_dir)
    }

    /// Output path for a program compiled to `language`
    ///
    /// Java sources must be named after their public class, so each program
    /// gets its own directory: `<output_dir>/<name>/<class_name>.java`.
    pub fn output_path(&self, name: &str, language: Language) -> PathBuf {
        let extension = language.config().extension;
        match language {
            Language::Java => self
                .output_dir()
                .join(name)
                .join(format!("{}{}", self.project.class_name, extension)),
            _ => self.output_dir().join(format!("{}{}", name, extension)),
        }
    }

    /// Load every program under the programs directory, sorted by path
    pub fn load_programs(&self) -> Result<Vec<ProgramFile>> {
        let dir = self.programs_dir();
        if !dir.exists() {
            return Ok(vec![]);
        }

        let mut entries: Vec<_> = std::fs::read_dir(&dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .is_some_and(|ext| ext == "json" || ext == "yaml" || ext == "yml")
            })
            .collect();
        entries.sort();

        let mut programs = Vec::with_capacity(entries.len());
        for path in entries {
            let source = ProgramSource::load(&path)?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            programs.push(ProgramFile { name, path, source });
        }
        Ok(programs)
    }
}
