//! Semantic checks over a program graph
//!
//! One pass over the nodes in graph iteration order (not flow order),
//! tracking which variable names have been declared.

use std::collections::HashSet;

use crate::graph::ProgramGraph;
use crate::node::NodeKind;

/// Declaration tracking across a graph
#[derive(Debug, Default)]
pub struct SemanticChecker {
    declared: HashSet<String>,
    errors: Vec<String>,
}

impl SemanticChecker {
    /// Create a checker with no declared variables
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the checker over `graph` and return every error found
    pub fn check(graph: &ProgramGraph) -> Vec<String> {
        let mut checker = Self::new();
        for node in graph.nodes() {
            checker.visit(node.kind());
        }
        tracing::debug!(
            "Semantic check: {} declared, {} errors",
            checker.declared.len(),
            checker.errors.len()
        );
        checker.errors
    }

    /// Names declared so far
    pub fn declared(&self) -> &HashSet<String> {
        &self.declared
    }

    /// Apply the rules for one node
    pub fn visit(&mut self, kind: &NodeKind) {
        match kind {
            NodeKind::Variable(v) if !v.var_name.is_empty() => {
                if !self.declared.insert(v.var_name.clone()) {
                    self.errors
                        .push(format!("Variable '{}' is already declared", v.var_name));
                }
            }
            // Input and assignment declare implicitly.
            NodeKind::Input(i) if !i.variable.is_empty() => {
                self.declared.insert(i.variable.clone());
            }
            NodeKind::Assign(a) if !a.variable.is_empty() => {
                self.declared.insert(a.variable.clone());
            }
            NodeKind::Print(p) => {
                for var in &p.variables {
                    if !var.is_empty() && !self.declared.contains(var) {
                        self.errors
                            .push(format!("Variable '{}' used in print but not declared", var));
                    }
                }
            }
            _ => {}
        }
    }

    /// Errors accumulated so far
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}
