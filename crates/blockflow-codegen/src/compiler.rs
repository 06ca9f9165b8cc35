//! Compile pipeline
//!
//! Program source → graph → structural validation → semantic analysis →
//! generated source. Each stage that finds errors stops the pipeline and
//! reports which stage failed.

use serde::Serialize;

use blockflow_core::{
    Language, ProgramSource, ProjectConfig, SemanticChecker, SerializedGraph,
};

use crate::generator::{CodeGenerator, GenerateOptions};
use crate::ir::ProgramIr;

/// Options for the compiler
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Language used when the program does not pin one
    pub language: Language,

    /// Class wrapping generated Java programs
    pub class_name: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            language: Language::default(),
            class_name: GenerateOptions::default().class_name,
        }
    }
}

impl CompileOptions {
    /// Options taken from a project configuration
    pub fn from_project(project: &ProjectConfig) -> Self {
        Self {
            language: project.language,
            class_name: project.class_name.clone(),
        }
    }
}

/// Pipeline stage that stopped compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Building the graph (duplicate Start / End)
    Structure,
    /// Per-node required properties
    Validation,
    /// Declarations and uses
    SemanticAnalysis,
}

/// Outcome of one compile request
#[derive(Debug, Clone, Serialize)]
pub struct CompileReport {
    /// Whether source was generated
    pub success: bool,
    /// Failing stage, when compilation stopped early
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    /// Errors of the failing stage
    pub errors: Vec<String>,
    /// Advisory findings from every stage that ran
    pub warnings: Vec<String>,
    /// Generated source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Target language
    pub language: Language,
    /// Serialized graph
    pub graph: SerializedGraph,
    /// Intermediate representation, on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ir: Option<ProgramIr>,
}

/// Block program compiler
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    /// Create a new compiler with the given options
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    /// Compiler options
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Run the whole pipeline over one program
    ///
    /// A language pinned by the program wins over the configured one.
    pub fn compile(&self, source: &ProgramSource) -> CompileReport {
        let language = source.language.unwrap_or(self.options.language);
        tracing::info!(
            "Compiling {} blocks, {} connections to {}",
            source.blocks.len(),
            source.connections.len(),
            language.config().name
        );

        let build = source.build_graph();
        for warning in &build.warnings {
            tracing::debug!("{}", warning);
        }
        let graph = build.graph;
        let mut report = CompileReport {
            success: false,
            stage: None,
            errors: Vec::new(),
            warnings: build.warnings,
            code: None,
            language,
            graph: graph.serialize(),
            ir: None,
        };

        if !build.errors.is_empty() {
            return report.fail(Stage::Structure, build.errors);
        }

        let errors = graph.validate();
        report.warnings.extend(graph.warnings());
        if !errors.is_empty() {
            return report.fail(Stage::Validation, errors);
        }

        let mut errors = Vec::new();
        if graph.is_empty() {
            errors.push("Program must have at least one block".to_string());
        }
        errors.extend(SemanticChecker::check(&graph));
        if !errors.is_empty() {
            return report.fail(Stage::SemanticAnalysis, errors);
        }

        let options = GenerateOptions {
            class_name: self.options.class_name.clone(),
        };
        let code = CodeGenerator::with_options(language, options).generate(&graph);
        tracing::info!("Generated {} lines of {}", code.lines().count(), language);

        report.success = true;
        report.code = Some(code);
        report.ir = Some(ProgramIr::from_graph(&graph));
        report
    }
}

impl CompileReport {
    fn fail(mut self, stage: Stage, errors: Vec<String>) -> Self {
        tracing::info!("Compilation stopped at {:?} with {} errors", stage, errors.len());
        self.stage = Some(stage);
        self.errors = errors;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockflow_core::{BlockDescriptor, ConnectionDescriptor};

    fn hello() -> ProgramSource {
        ProgramSource {
            blocks: vec![
                BlockDescriptor::new("s", "start"),
                BlockDescriptor::new("p", "print").with("text", "Hello"),
                BlockDescriptor::new("e", "end"),
            ],
            connections: vec![
                ConnectionDescriptor::new("s", "p"),
                ConnectionDescriptor::new("p", "e"),
            ],
            language: None,
        }
    }

    #[test]
    fn test_compile_options_default() {
        let opts = CompileOptions::default();
        assert_eq!(opts.language, Language::Python);
        assert_eq!(opts.class_name, "VisualProgram");
    }

    #[test]
    fn test_compile_success() {
        let report = Compiler::default().compile(&hello());
        assert!(report.success);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
        assert!(report.code.unwrap().contains("print(\"Hello\")"));
        assert_eq!(report.ir.unwrap().nodes.len(), 3);
        assert_eq!(report.graph.nodes.len(), 3);
    }

    #[test]
    fn test_program_language_wins() {
        let mut source = hello();
        source.language = Some(Language::Java);
        let report = Compiler::default().compile(&source);
        assert_eq!(report.language, Language::Java);
        assert!(report.code.unwrap().contains("System.out.println(\"Hello\");"));
    }

    #[test]
    fn test_structure_stage() {
        let mut source = hello();
        source.blocks.push(BlockDescriptor::new("e2", "end"));
        let report = Compiler::default().compile(&source);
        assert!(!report.success);
        assert_eq!(report.stage, Some(Stage::Structure));
        assert!(report.errors[0].starts_with("Program can only have one End block"));
    }

    #[test]
    fn test_validation_stage() {
        let mut source = hello();
        source.blocks.push(BlockDescriptor::new("v", "variable"));
        let report = Compiler::default().compile(&source);
        assert_eq!(report.stage, Some(Stage::Validation));
        assert_eq!(report.errors, vec!["Variable name is required".to_string()]);
        assert!(report.code.is_none());
    }

    #[test]
    fn test_semantic_stage() {
        let mut source = hello();
        source.blocks[1] = BlockDescriptor::new("p", "print").with("variables", "ghost");
        let report = Compiler::default().compile(&source);
        assert_eq!(report.stage, Some(Stage::SemanticAnalysis));
        assert!(report.errors[0].contains("'ghost'"));
    }

    #[test]
    fn test_empty_program_fails_semantic_stage() {
        let report = Compiler::default().compile(&ProgramSource::default());
        assert_eq!(report.stage, Some(Stage::SemanticAnalysis));
        assert_eq!(report.errors, vec!["Program must have at least one block".to_string()]);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_report_json_shape() {
        let report = Compiler::default().compile(&ProgramSource::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["stage"], "semantic_analysis");
        assert_eq!(json["language"], "python");
        assert!(json.get("code").is_none());
    }
}
