//! Program source files
//!
//! A program is what the editor sends: an ordered list of block descriptors,
//! an ordered list of connections between descriptor ids, and optionally the
//! target language. Files may be JSON or YAML.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{GraphError, Result};
use crate::factory::NodeFactory;
use crate::graph::{MISSING_END_WARNING, MISSING_START_WARNING, ProgramGraph};
use crate::language::Language;
use crate::node::{BlockKind, EdgeKind, NodeId, Position, PropertyBag, PropertyValue};

/// A block as described by the editor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockDescriptor {
    /// Editor-side identifier, referenced by connections
    #[serde(default)]
    pub id: Option<String>,
    /// Block kind name
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Horizontal canvas coordinate
    #[serde(default)]
    pub x: f64,
    /// Vertical canvas coordinate
    #[serde(default)]
    pub y: f64,
    /// Kind-specific properties
    #[serde(default)]
    pub properties: PropertyBag,
}

impl BlockDescriptor {
    /// Build a descriptor with no properties
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            kind: Some(kind.into()),
            ..Default::default()
        }
    }

    /// Add a property
    pub fn with(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    fn block_kind(&self) -> Option<BlockKind> {
        self.kind.as_deref().and_then(BlockKind::parse)
    }

    /// Name used in diagnostics: the id, or `#n` for blocks without one
    fn label(&self, index: usize) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("#{}", index + 1))
    }
}

/// A connection between two editor-side block ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    /// Source block id
    pub from: String,
    /// Target block id
    pub to: String,
    /// Role of the connection
    #[serde(default)]
    pub kind: EdgeKind,
}

impl ConnectionDescriptor {
    /// A `flow` connection
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: EdgeKind::Flow,
        }
    }

    /// A connection of the given kind
    pub fn with_kind(from: impl Into<String>, to: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
        }
    }
}

/// A complete program as sent by the editor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramSource {
    /// Blocks in editor order
    #[serde(default)]
    pub blocks: Vec<BlockDescriptor>,
    /// Connections in editor order
    #[serde(default)]
    pub connections: Vec<ConnectionDescriptor>,
    /// Target language, when the program pins one
    #[serde(default)]
    pub language: Option<Language>,
}

impl ProgramSource {
    /// Parse a JSON program
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a YAML program
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a program file; `.yaml`/`.yml` are parsed as YAML, anything else as JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        if is_yaml(path) {
            Self::from_yaml(&contents)
        } else {
            Self::from_json(&contents)
        }
    }

    /// Instantiate every block and wire every connection
    ///
    /// Unknown kinds and dangling connections are skipped with a warning so a
    /// single bad block does not abort the rest of the program. A second
    /// Start or End block is a structural error.
    pub fn build_graph(&self) -> GraphBuild {
        let mut build = GraphBuild::default();

        for (index, block) in self.blocks.iter().enumerate() {
            let label = block.label(index);
            let Some(kind) = block.kind.as_deref() else {
                build
                    .warnings
                    .push(format!("Skipped block '{}' without a type", label));
                continue;
            };
            let Some(node) =
                NodeFactory::create(kind, Position::new(block.x, block.y), &block.properties)
            else {
                build
                    .warnings
                    .push(format!("Skipped block '{}' with unknown type '{}'", label, kind));
                continue;
            };

            match build.graph.add_node(node) {
                Ok(node_id) => {
                    if let Some(id) = &block.id
                        && build.ids.insert(id.clone(), node_id).is_some()
                    {
                        build.warnings.push(format!(
                            "Block id '{}' is used more than once; connections use the last one",
                            id
                        ));
                    }
                }
                Err(GraphError::DuplicateStart { .. }) => {
                    build.errors.push(duplicate_block_error(BlockKind::Start, &label))
                }
                Err(GraphError::DuplicateEnd { .. }) => {
                    build.errors.push(duplicate_block_error(BlockKind::End, &label))
                }
                Err(err) => build.errors.push(err.to_string()),
            }
        }

        for conn in &self.connections {
            match (build.ids.get(&conn.from), build.ids.get(&conn.to)) {
                (Some(from), Some(to)) => {
                    let (from, to) = (from.clone(), to.clone());
                    build.graph.connect_with(&from, &to, conn.kind);
                }
                _ => build.warnings.push(format!(
                    "Skipped connection '{}' -> '{}' between unknown blocks",
                    conn.from, conn.to
                )),
            }
        }

        tracing::debug!(
            "Built graph: {} nodes from {} blocks, {} connections",
            build.graph.len(),
            self.blocks.len(),
            self.connections.len()
        );
        build
    }
}

/// Error for a Start or End block beyond the first
fn duplicate_block_error(kind: BlockKind, label: &str) -> String {
    let name = match kind {
        BlockKind::End => "End",
        _ => "Start",
    };
    format!(
        "Program can only have one {} block (block '{}' rejected)",
        name, label
    )
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

/// Result of [`ProgramSource::build_graph`]
#[derive(Debug, Default)]
pub struct GraphBuild {
    /// The wired graph
    pub graph: ProgramGraph,
    /// Editor block id → generated node id
    pub ids: HashMap<String, NodeId>,
    /// Structural errors raised while inserting nodes
    pub errors: Vec<String>,
    /// Blocks and connections that were skipped
    pub warnings: Vec<String>,
}

/// Editor-level structure report
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Problems that make the program invalid
    pub errors: Vec<String>,
    /// Advisory findings
    pub warnings: Vec<String>,
    /// Number of blocks
    pub block_count: usize,
    /// Number of connections
    pub connection_count: usize,
}

impl ValidationReport {
    /// Whether no errors were found
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check the shape of a program before any graph is built
pub fn validate_program(source: &ProgramSource) -> ValidationReport {
    let mut report = ValidationReport {
        block_count: source.blocks.len(),
        connection_count: source.connections.len(),
        ..Default::default()
    };

    let mut starts = 0;
    let mut ends = 0;
    for (index, block) in source.blocks.iter().enumerate() {
        let (kind, seen) = match block.block_kind() {
            Some(BlockKind::Start) => (BlockKind::Start, &mut starts),
            Some(BlockKind::End) => (BlockKind::End, &mut ends),
            _ => continue,
        };
        *seen += 1;
        if *seen > 1 {
            report
                .errors
                .push(duplicate_block_error(kind, &block.label(index)));
        }
    }

    if source.blocks.is_empty() {
        report
            .errors
            .push("Program must have at least one block".to_string());
    }
    if starts == 0 {
        report.warnings.push(MISSING_START_WARNING.to_string());
    }
    if ends == 0 {
        report.warnings.push(MISSING_END_WARNING.to_string());
    }

    for block in &source.blocks {
        if block.kind.as_deref().is_none_or(|k| k.trim().is_empty()) {
            report.errors.push("Found block without type".to_string());
        }
        if block.id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            report.errors.push("Found block without ID".to_string());
        }
    }

    report
}
