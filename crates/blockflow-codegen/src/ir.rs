//! Intermediate representation of a program graph
//!
//! A flat, serializable view of the graph for downstream consumers: the
//! nodes with their properties, every control edge, and which nodes define
//! or read which variables.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use blockflow_core::{BlockKind, EdgeKind, NodeId, NodeKind, ProgramGraph, PropertyBag};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("identifier pattern is valid"));

/// Intermediate representation of a complete program
#[derive(Debug, Clone, Serialize)]
pub struct ProgramIr {
    /// Nodes in graph iteration order
    pub nodes: Vec<IrNode>,

    /// Every connection, in node order then connection order
    pub control_flow: Vec<ControlEdge>,

    /// Variable definitions and uses
    pub data_flow: Vec<DataAccess>,
}

/// A node in the IR
#[derive(Debug, Clone, Serialize)]
pub struct IrNode {
    /// Node identifier
    pub id: NodeId,
    /// Block kind
    pub kind: BlockKind,
    /// Properties keyed by wire name
    pub properties: PropertyBag,
    /// Connection targets
    pub connections: Vec<NodeId>,
}

/// A directed control edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlEdge {
    /// Source node
    pub from: NodeId,
    /// Target node
    pub to: NodeId,
    /// Role of the edge
    pub kind: EdgeKind,
}

/// How a node touches a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// The node declares or writes the variable
    Def,
    /// The node reads the variable
    Use,
}

/// One variable access
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataAccess {
    /// Accessing node
    pub node: NodeId,
    /// Variable name
    pub variable: String,
    /// Kind of access
    pub access: Access,
}

impl ProgramIr {
    /// Build the IR for `graph`
    pub fn from_graph(graph: &ProgramGraph) -> Self {
        let nodes: Vec<IrNode> = graph
            .nodes()
            .map(|node| IrNode {
                id: node.id().clone(),
                kind: node.block_kind(),
                properties: node.kind().properties(),
                connections: node.connections().iter().map(|c| c.target.clone()).collect(),
            })
            .collect();

        let control_flow = graph
            .nodes()
            .flat_map(|node| {
                node.connections().iter().map(|c| ControlEdge {
                    from: node.id().clone(),
                    to: c.target.clone(),
                    kind: c.kind,
                })
            })
            .collect();

        // Uses only count names something in the program defines; keywords
        // and function names inside expressions are skipped that way.
        let defined: BTreeSet<&str> = graph
            .nodes()
            .filter_map(|node| match node.kind() {
                NodeKind::Variable(v) => Some(v.var_name.as_str()),
                NodeKind::Input(i) => Some(i.variable.as_str()),
                NodeKind::Assign(a) => Some(a.variable.as_str()),
                _ => None,
            })
            .filter(|name| !name.is_empty())
            .collect();

        let mut data_flow = Vec::new();
        for node in graph.nodes() {
            let id = node.id();
            let mut def = |name: &str| {
                if !name.is_empty() {
                    data_flow.push(DataAccess {
                        node: id.clone(),
                        variable: name.to_string(),
                        access: Access::Def,
                    });
                }
            };
            let mut uses: Vec<String> = Vec::new();

            match node.kind() {
                NodeKind::Start | NodeKind::End => {}
                NodeKind::Variable(v) => {
                    def(&v.var_name);
                    uses.extend(referenced(&v.initial_value, &defined));
                }
                NodeKind::Input(i) => def(&i.variable),
                NodeKind::Assign(a) => {
                    def(&a.variable);
                    uses.extend(referenced(&a.expression, &defined));
                }
                NodeKind::Print(p) => uses.extend(p.variables.iter().cloned()),
                NodeKind::If(c) | NodeKind::While(c) => {
                    uses.extend(referenced(&c.condition, &defined))
                }
                NodeKind::For(f) => {
                    for clause in [&f.init, &f.condition, &f.increment] {
                        for name in referenced(clause, &defined) {
                            if !uses.contains(&name) {
                                uses.push(name);
                            }
                        }
                    }
                }
            }

            data_flow.extend(uses.into_iter().map(|variable| DataAccess {
                node: id.clone(),
                variable,
                access: Access::Use,
            }));
        }

        Self {
            nodes,
            control_flow,
            data_flow,
        }
    }

    /// Variables read by `node`
    pub fn uses_of(&self, node: &NodeId) -> Vec<&str> {
        self.accesses(node, Access::Use)
    }

    /// Variables defined by `node`
    pub fn defs_of(&self, node: &NodeId) -> Vec<&str> {
        self.accesses(node, Access::Def)
    }

    fn accesses(&self, node: &NodeId, access: Access) -> Vec<&str> {
        self.data_flow
            .iter()
            .filter(|d| &d.node == node && d.access == access)
            .map(|d| d.variable.as_str())
            .collect()
    }

    /// Compute a content hash of the program
    ///
    /// Node identifiers are replaced by their position in the node list, so
    /// the same program loaded twice hashes the same.
    pub fn content_hash(&self) -> String {
        use sha2::{Digest, Sha256};

        let position: HashMap<&NodeId, usize> =
            self.nodes.iter().enumerate().map(|(i, n)| (&n.id, i)).collect();
        let index = |id: &NodeId| position.get(id).copied().unwrap_or(usize::MAX);

        let mut hasher = Sha256::new();
        for node in &self.nodes {
            hasher.update(node.kind.as_str().as_bytes());
            for (key, value) in &node.properties {
                hasher.update(key.as_bytes());
                hasher.update([0u8]);
                hasher.update(value.to_text().as_bytes());
                hasher.update([0u8]);
            }
        }
        for edge in &self.control_flow {
            hasher.update(index(&edge.from).to_le_bytes());
            hasher.update(index(&edge.to).to_le_bytes());
            hasher.update(format!("{:?}", edge.kind).as_bytes());
        }

        hex::encode(hasher.finalize())
    }
}

fn referenced(expression: &str, defined: &BTreeSet<&str>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for m in IDENTIFIER.find_iter(expression) {
        let name = m.as_str();
        if defined.contains(name) && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockflow_core::{NodeFactory, Position, PropertyValue};

    fn add(graph: &mut ProgramGraph, kind: &str, props: &[(&str, &str)]) -> NodeId {
        let bag: PropertyBag = props
            .iter()
            .map(|(k, v)| (k.to_string(), PropertyValue::from(*v)))
            .collect();
        graph
            .add_node(NodeFactory::create(kind, Position::default(), &bag).unwrap())
            .unwrap()
    }

    fn counter() -> (ProgramGraph, Vec<NodeId>) {
        let mut graph = ProgramGraph::new();
        let start = add(&mut graph, "start", &[]);
        let var = add(&mut graph, "variable", &[("var_name", "n"), ("initial_value", "3")]);
        let cond = add(&mut graph, "while", &[("condition", "n > 0")]);
        let step = add(&mut graph, "assign", &[("variable", "n"), ("expression", "n - 1")]);
        let show = add(&mut graph, "print", &[("text", "left"), ("variables", "n")]);
        graph.connect(&start, &var);
        graph.connect(&var, &cond);
        graph.connect(&cond, &step);
        graph.connect(&step, &show);
        (graph, vec![start, var, cond, step, show])
    }

    #[test]
    fn test_ir_mirrors_graph() {
        let (graph, ids) = counter();
        let ir = ProgramIr::from_graph(&graph);
        assert_eq!(ir.nodes.len(), 5);
        assert_eq!(ir.control_flow.len(), 4);
        assert_eq!(ir.control_flow[1].from, ids[1]);
        assert_eq!(ir.control_flow[1].to, ids[2]);
        assert_eq!(ir.nodes[2].kind, BlockKind::While);
    }

    #[test]
    fn test_data_flow_defs_and_uses() {
        let (graph, ids) = counter();
        let ir = ProgramIr::from_graph(&graph);
        assert_eq!(ir.defs_of(&ids[1]), vec!["n"]);
        assert_eq!(ir.uses_of(&ids[2]), vec!["n"]);
        assert_eq!(ir.defs_of(&ids[3]), vec!["n"]);
        assert_eq!(ir.uses_of(&ids[3]), vec!["n"]);
        assert_eq!(ir.uses_of(&ids[4]), vec!["n"]);
        assert!(ir.uses_of(&ids[0]).is_empty());
    }

    #[test]
    fn test_uses_skip_unknown_identifiers() {
        let mut graph = ProgramGraph::new();
        let a = add(&mut graph, "assign", &[("variable", "x"), ("expression", "abs(y) + x")]);
        let ir = ProgramIr::from_graph(&graph);
        assert_eq!(ir.uses_of(&a), vec!["x"]);
    }

    #[test]
    fn test_content_hash_stable_across_builds() {
        let (first, _) = counter();
        let (second, _) = counter();
        assert_eq!(
            ProgramIr::from_graph(&first).content_hash(),
            ProgramIr::from_graph(&second).content_hash()
        );
    }

    #[test]
    fn test_content_hash_changes() {
        let (graph, ids) = counter();
        let before = ProgramIr::from_graph(&graph).content_hash();

        let mut changed = graph.clone();
        changed.connect_with(&ids[2], &ids[0], EdgeKind::Next);
        assert_ne!(before, ProgramIr::from_graph(&changed).content_hash());
        assert_eq!(before.len(), 64);
    }

    #[test]
    fn test_content_hash_separates_key_and_value() {
        let ir = |key: &str, value: &str| ProgramIr {
            nodes: vec![IrNode {
                id: NodeId::generate(),
                kind: BlockKind::Print,
                properties: PropertyBag::from([(key.to_string(), PropertyValue::from(value))]),
                connections: vec![],
            }],
            control_flow: vec![],
            data_flow: vec![],
        };
        assert_ne!(ir("ab", "c").content_hash(), ir("a", "bc").content_hash());
    }

    #[test]
    fn test_ir_serializes() {
        let (graph, _) = counter();
        let json = serde_json::to_value(ProgramIr::from_graph(&graph)).unwrap();
        assert_eq!(json["nodes"][2]["kind"], "while");
        assert_eq!(json["control_flow"][0]["kind"], "flow");
        assert_eq!(json["data_flow"][0]["access"], "def");
    }
}
