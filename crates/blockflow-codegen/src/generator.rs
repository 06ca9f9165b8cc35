//! Source generation
//!
//! Walks a [`ProgramGraph`] depth-first from its Start node and emits one
//! statement per line, four spaces per indentation level. Each node is emitted
//! at most once; a visited set keeps cycles from looping.
//!
//! Generation never fails. Missing properties fall back to default literals
//! and a graph without a Start node yields only the program skeleton.

use std::collections::{BTreeMap, HashMap, HashSet};

use blockflow_core::language::ForStyle;
use blockflow_core::node::{
    AssignBlock, ConditionBlock, ForBlock, InputBlock, PrintBlock, VariableBlock,
};
use blockflow_core::{DataType, Language, LanguageConfig, Node, NodeId, NodeKind, ProgramGraph};

use crate::templates;

const INDENT: &str = "    ";

/// Knobs that do not belong to the language table
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Name of the class wrapping the program in class-based languages
    pub class_name: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            class_name: "VisualProgram".to_string(),
        }
    }
}

/// Emits source text for one target language
pub struct CodeGenerator {
    language: Language,
    options: GenerateOptions,
    lines: Vec<String>,
    indent: usize,
    declared: HashMap<String, DataType>,
    visited: HashSet<NodeId>,
}

impl CodeGenerator {
    /// Create a generator with default options
    pub fn new(language: Language) -> Self {
        Self::with_options(language, GenerateOptions::default())
    }

    /// Create a generator with explicit options
    pub fn with_options(language: Language, options: GenerateOptions) -> Self {
        Self {
            language,
            options,
            lines: Vec::new(),
            indent: 0,
            declared: HashMap::new(),
            visited: HashSet::new(),
        }
    }

    /// Target language
    pub fn language(&self) -> Language {
        self.language
    }

    fn config(&self) -> &'static LanguageConfig {
        self.language.config()
    }

    /// Generate the source for `graph`
    ///
    /// State from a previous call is discarded first.
    pub fn generate(&mut self, graph: &ProgramGraph) -> String {
        self.lines.clear();
        self.indent = 0;
        self.declared.clear();
        self.visited.clear();

        self.open_program();
        match graph.start() {
            Some(start) => self.visit(graph, start.id()),
            None => tracing::debug!("No start node, emitting program skeleton only"),
        }
        self.close_program();

        tracing::debug!(
            "Generated {} lines of {} from {} nodes",
            self.lines.len(),
            self.config().name,
            self.visited.len()
        );
        self.lines.join("\n")
    }

    fn open_program(&mut self) {
        let config = self.config();
        for line in config.header {
            self.line(line);
        }
        if config.wraps_in_class {
            let class = self.render("class", &[("name", self.options.class_name.clone())]);
            self.open_block(class);
        }
        if config.has_entry_point {
            let main = self.render("main_function", &[]);
            self.open_block(main);
            for line in config.entry_prelude {
                self.line(line);
            }
        }
    }

    fn close_program(&mut self) {
        let config = self.config();
        if config.has_entry_point {
            for line in config.entry_epilogue {
                self.line(line);
            }
            self.close_block();
        }
        if config.wraps_in_class {
            self.close_block();
        }
    }

    fn visit(&mut self, graph: &ProgramGraph, id: &NodeId) {
        if !self.visited.insert(id.clone()) {
            return;
        }
        let Some(node) = graph.get(id) else {
            return;
        };

        match node.kind() {
            NodeKind::Start => {
                let comment = self.config().line_comment("Program Start");
                self.line(&comment);
            }
            NodeKind::End => {
                let comment = self.config().line_comment("Program End");
                self.line(&comment);
                return;
            }
            NodeKind::Variable(v) => self.variable(v),
            NodeKind::Print(p) => self.print(p),
            NodeKind::Input(i) => self.input(i),
            NodeKind::Assign(a) => self.assign(a),
            // Control blocks route their own edges.
            NodeKind::If(c) => {
                self.if_block(graph, node, c);
                return;
            }
            NodeKind::While(c) => {
                let opening = self.render("while", &[("condition", self.condition(c))]);
                self.loop_block(graph, node, opening);
                return;
            }
            NodeKind::For(f) => {
                let opening = self.for_opening(f);
                self.loop_block(graph, node, opening);
                return;
            }
        }

        for conn in node.connections() {
            self.visit(graph, &conn.target);
        }
    }

    fn variable(&mut self, v: &VariableBlock) {
        let config = self.config();
        let name = or_default(&v.var_name, "variable");
        let value = v.initial_value.trim();

        let line = if !config.declares_variables {
            if value.is_empty() {
                config.line_comment(&format!("Variable: {} ({})", name, v.data_type))
            } else {
                format!("{} = {}", name, self.format_value(value, v.data_type))
            }
        } else {
            let decl = self.render(
                "variable_declaration",
                &[
                    ("type", config.type_name(v.data_type).to_string()),
                    ("name", name.to_string()),
                ],
            );
            if value.is_empty() {
                config.statement(&decl)
            } else {
                config.statement(&format!("{} = {}", decl, self.format_value(value, v.data_type)))
            }
        };
        self.line(&line);
        self.declared.insert(name.to_string(), v.data_type);
    }

    fn print(&mut self, p: &PrintBlock) {
        if p.text.is_empty() && p.variables.is_empty() {
            return;
        }
        let text = (!p.text.is_empty()).then(|| format!("\"{}\"", escape(&p.text)));
        let parts = || text.iter().cloned().chain(p.variables.iter().cloned());

        let line = match self.language {
            Language::Python => format!("print({})", parts().collect::<Vec<_>>().join(", ")),
            Language::C => {
                let specifiers: Vec<&str> = p
                    .variables
                    .iter()
                    .map(|var| printf_specifier(self.type_of(var)))
                    .collect();
                let format = format!("{}{}", escape_format(&p.text), specifiers.join(" "));
                if p.variables.is_empty() {
                    format!("printf(\"{}\\n\");", format)
                } else {
                    format!("printf(\"{}\\n\", {});", format, p.variables.join(", "))
                }
            }
            Language::Cpp => format!(
                "cout << {} << endl;",
                parts().collect::<Vec<_>>().join(" << \" \" << ")
            ),
            Language::Java => format!(
                "System.out.println({});",
                parts().collect::<Vec<_>>().join(" + \" \" + ")
            ),
        };
        self.line(&line);
    }

    fn input(&mut self, i: &InputBlock) {
        let variable = or_default(&i.variable, "input_var").to_string();
        let prompt = escape(&i.prompt);
        let known = self.declared.get(&variable).copied();
        let ty = known.unwrap_or_default();

        match self.language {
            Language::Python => {
                let read = if prompt.is_empty() {
                    "input()".to_string()
                } else {
                    format!("input(\"{}\")", prompt)
                };
                let read = match ty {
                    DataType::Int => format!("int({})", read),
                    DataType::Float => format!("float({})", read),
                    _ => read,
                };
                self.line(&format!("{} = {}", variable, read));
            }
            Language::C => {
                if !i.prompt.is_empty() {
                    self.line(&format!("printf(\"{}\");", escape_format(&i.prompt)));
                }
                if known.is_none() {
                    self.declare_default(&variable);
                }
                let target = if ty == DataType::String {
                    variable.clone()
                } else {
                    format!("&{}", variable)
                };
                self.line(&format!("scanf(\"{}\", {});", printf_specifier(ty), target));
            }
            Language::Cpp => {
                if !i.prompt.is_empty() {
                    self.line(&format!("cout << \"{}\";", prompt));
                }
                if known.is_none() {
                    self.declare_default(&variable);
                }
                let read = self.render("input", &[("variable", variable.clone())]);
                self.line(&self.config().statement(&read));
            }
            Language::Java => {
                if !i.prompt.is_empty() {
                    self.line(&format!("System.out.print(\"{}\");", prompt));
                }
                let read = self.render(
                    "input",
                    &[
                        ("variable", variable.clone()),
                        ("method", scanner_method(ty).to_string()),
                    ],
                );
                let read = match known {
                    Some(_) => read,
                    None => format!("{} {}", self.config().type_name(ty), read),
                };
                self.line(&self.config().statement(&read));
            }
        }
        self.declared.entry(variable).or_insert(ty);
    }

    fn declare_default(&mut self, variable: &str) {
        let decl = self.render(
            "variable_declaration",
            &[
                ("type", self.config().type_name(DataType::Int).to_string()),
                ("name", variable.to_string()),
            ],
        );
        self.line(&self.config().statement(&decl));
    }

    fn assign(&mut self, a: &AssignBlock) {
        let variable = or_default(&a.variable, "var");
        let expression = or_default(&a.expression, "0");
        let line = self.render(
            "variable_assignment",
            &[
                ("name", variable.to_string()),
                ("value", expression.to_string()),
            ],
        );
        self.line(&self.config().statement(&line));
        self.declared.entry(variable.to_string()).or_default();
    }

    fn if_block(&mut self, graph: &ProgramGraph, node: &Node, c: &ConditionBlock) {
        let opening = self.render("if", &[("condition", self.condition(c))]);
        self.open_block(opening);
        for id in node.body() {
            self.visit(graph, id);
        }

        let alternative = node.else_branch();
        if !alternative.is_empty() {
            let config = self.config();
            let else_slot = self.render("else", &[]);
            let line = [config.block_end(), else_slot.as_str(), config.block_start()]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            self.indent = self.indent.saturating_sub(1);
            self.line(&line);
            self.indent += 1;
            for id in alternative {
                self.visit(graph, id);
            }
        }

        self.close_block();
        for id in node.next() {
            self.visit(graph, id);
        }
    }

    fn loop_block(&mut self, graph: &ProgramGraph, node: &Node, opening: String) {
        self.open_block(opening);
        for id in node.body() {
            self.visit(graph, id);
        }
        self.close_block();
        for id in node.next() {
            self.visit(graph, id);
        }
    }

    fn condition(&self, c: &ConditionBlock) -> String {
        or_default(&c.condition, self.config().true_literal).to_string()
    }

    fn for_opening(&self, f: &ForBlock) -> String {
        let init = or_default(&f.init, "i = 0");
        let condition = or_default(&f.condition, "i < 10");
        let increment = or_default(&f.increment, "i++");

        match self.config().for_style {
            ForStyle::CStyle => self.render(
                "for",
                &[
                    ("init", init.to_string()),
                    ("condition", condition.to_string()),
                    ("increment", increment.to_string()),
                ],
            ),
            ForStyle::CountedRange => {
                let header = self.render(
                    "for",
                    &[("variable", "i".to_string()), ("count", "10".to_string())],
                );
                format!(
                    "{}  {}",
                    header,
                    self.config()
                        .line_comment(&format!("{}; {}; {}", init, condition, increment))
                )
            }
        }
    }

    fn format_value(&self, value: &str, data_type: DataType) -> String {
        match data_type {
            DataType::String if !value.starts_with('"') => format!("\"{}\"", escape(value)),
            DataType::Boolean => {
                let truthy = matches!(value.to_ascii_lowercase().as_str(), "true" | "1");
                self.config().bool_literal(truthy).to_string()
            }
            _ => value.to_string(),
        }
    }

    fn type_of(&self, variable: &str) -> DataType {
        self.declared.get(variable).copied().unwrap_or_default()
    }

    fn render(&self, slot: &str, pairs: &[(&str, String)]) -> String {
        let context: BTreeMap<&str, String> = pairs.iter().cloned().collect();
        templates::render_template(self.language, slot, &context).unwrap_or_else(|err| {
            tracing::warn!("Template '{}' for {} failed: {}", slot, self.language, err);
            String::new()
        })
    }

    fn open_block(&mut self, opening: String) {
        let block_start = self.config().block_start();
        if block_start.is_empty() {
            self.line(&opening);
        } else {
            self.line(&format!("{} {}", opening, block_start));
        }
        self.indent += 1;
    }

    fn close_block(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        let block_end = self.config().block_end();
        if !block_end.is_empty() {
            self.line(block_end);
        }
    }

    fn line(&mut self, text: &str) {
        if text.trim().is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines
                .push(format!("{}{}", INDENT.repeat(self.indent), text));
        }
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() { default } else { value }
}

/// Escape text for a double-quoted string literal
pub fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Escape text for a printf format string
pub fn escape_format(text: &str) -> String {
    escape(text).replace('%', "%%")
}

fn printf_specifier(ty: DataType) -> &'static str {
    match ty {
        DataType::Float => "%f",
        DataType::String => "%s",
        DataType::Int | DataType::Boolean | DataType::Array => "%d",
    }
}

fn scanner_method(ty: DataType) -> &'static str {
    match ty {
        DataType::Float => "nextFloat",
        DataType::String => "nextLine",
        DataType::Boolean => "nextBoolean",
        DataType::Int | DataType::Array => "nextInt",
    }
}
