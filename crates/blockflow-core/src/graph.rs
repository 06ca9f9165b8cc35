//! Program graph
//!
//! Owns every node of one compile request, keyed by identifier. Iteration
//! follows insertion order. At most one Start and one End node are accepted;
//! the first one added stays authoritative.

use serde::Serialize;
use std::collections::HashMap;

use crate::error::GraphError;
use crate::node::{BlockKind, EdgeKind, Node, NodeId, Position, PropertyBag};

/// Warning for a program without a Start block
pub const MISSING_START_WARNING: &str =
    "Consider adding a Start block to define the program entry point";

/// Warning for a program without an End block
pub const MISSING_END_WARNING: &str = "Consider adding an End block to define the program exit point";

/// Container for the nodes and connections of one program
#[derive(Debug, Default, Clone)]
pub struct ProgramGraph {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    start: Option<NodeId>,
    end: Option<NodeId>,
}

impl ProgramGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node
    ///
    /// A second Start or End node is rejected and the graph is left unchanged.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        let id = node.id().clone();
        if self.index.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }

        match node.block_kind() {
            BlockKind::Start => {
                if let Some(existing) = &self.start {
                    return Err(GraphError::DuplicateStart {
                        existing: existing.clone(),
                        rejected: id,
                    });
                }
                self.start = Some(id.clone());
            }
            BlockKind::End => {
                if let Some(existing) = &self.end {
                    return Err(GraphError::DuplicateEnd {
                        existing: existing.clone(),
                        rejected: id,
                    });
                }
                self.end = Some(id.clone());
            }
            _ => {}
        }

        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(id)
    }

    /// Add a `Flow` connection; see [`ProgramGraph::connect_with`]
    pub fn connect(&mut self, from: &NodeId, to: &NodeId) -> bool {
        self.connect_with(from, to, EdgeKind::Flow)
    }

    /// Add a connection of the given kind
    ///
    /// No-op when either node is absent, when `from == to`, or when `from`
    /// already connects to `to`. Returns whether an edge was added.
    pub fn connect_with(&mut self, from: &NodeId, to: &NodeId, kind: EdgeKind) -> bool {
        if from == to || !self.index.contains_key(to) {
            return false;
        }
        let Some(&slot) = self.index.get(from) else {
            return false;
        };
        let node = &mut self.nodes[slot];
        if node.is_connected_to(to) {
            return false;
        }
        node.push_connection(to.clone(), kind);
        tracing::debug!("Connected {} -> {} ({:?})", from, to, kind);
        true
    }

    /// Look up a node
    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&slot| &self.nodes[slot])
    }

    /// Look up a node for patching
    pub fn get_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.index.get(id).map(|&slot| &mut self.nodes[slot])
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// The Start node, if any
    pub fn start(&self) -> Option<&Node> {
        self.start.as_ref().and_then(|id| self.get(id))
    }

    /// The End node, if any
    pub fn end(&self) -> Option<&Node> {
        self.end.as_ref().and_then(|id| self.get(id))
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Structural errors of every node, in iteration order
    pub fn validate(&self) -> Vec<String> {
        self.nodes.iter().flat_map(Node::validate).collect()
    }

    /// Advisory findings that never block compilation
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.start.is_none() {
            warnings.push(MISSING_START_WARNING.to_string());
        }
        if self.end.is_none() {
            warnings.push(MISSING_END_WARNING.to_string());
        }
        warnings
    }

    /// Tree form of the graph for downstream consumers
    pub fn serialize(&self) -> SerializedGraph {
        SerializedGraph {
            nodes: self.nodes.iter().map(SerializedNode::from_node).collect(),
            start_node_id: self.start.clone(),
            end_node_id: self.end.clone(),
        }
    }
}

/// Serialized form of a [`ProgramGraph`]
#[derive(Debug, Clone, Serialize)]
pub struct SerializedGraph {
    /// Nodes in insertion order
    pub nodes: Vec<SerializedNode>,
    /// Identifier of the Start node
    pub start_node_id: Option<NodeId>,
    /// Identifier of the End node
    pub end_node_id: Option<NodeId>,
}

/// Serialized form of a single node
#[derive(Debug, Clone, Serialize)]
pub struct SerializedNode {
    /// Node identifier
    pub id: NodeId,
    /// Block kind
    #[serde(rename = "type")]
    pub kind: BlockKind,
    /// Canvas position
    pub position: Position,
    /// Properties keyed by wire name
    pub properties: PropertyBag,
    /// Every outgoing connection target, in order
    pub connections: Vec<NodeId>,
    /// Body targets of control blocks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<NodeId>>,
    /// `else` targets of an `If`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub else_branch: Option<Vec<NodeId>>,
    /// Continuation targets of control blocks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Vec<NodeId>>,
}

impl SerializedNode {
    fn from_node(node: &Node) -> Self {
        let owned = |ids: Vec<&NodeId>| ids.into_iter().cloned().collect::<Vec<_>>();
        let kind = node.block_kind();
        Self {
            id: node.id().clone(),
            kind,
            position: node.position(),
            properties: node.kind().properties(),
            connections: node.connections().iter().map(|c| c.target.clone()).collect(),
            body: kind.is_control().then(|| owned(node.body())),
            else_branch: (kind == BlockKind::If).then(|| owned(node.else_branch())),
            next: kind.is_control().then(|| owned(node.next())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::NodeFactory;
    use crate::node::PropertyValue;

    fn make(kind: &str) -> Node {
        NodeFactory::create(kind, Position::default(), &PropertyBag::new()).unwrap()
    }

    #[test]
    fn test_connect_is_idempotent() {
        let mut graph = ProgramGraph::new();
        let a = graph.add_node(make("start")).unwrap();
        let b = graph.add_node(make("end")).unwrap();

        assert!(graph.connect(&a, &b));
        assert!(!graph.connect(&a, &b));
        assert_eq!(graph.get(&a).unwrap().connections().len(), 1);
    }

    #[test]
    fn test_connect_ignores_missing_and_self_edges() {
        let mut graph = ProgramGraph::new();
        let a = graph.add_node(make("start")).unwrap();
        let ghost = NodeId::generate();

        assert!(!graph.connect(&a, &ghost));
        assert!(!graph.connect(&ghost, &a));
        assert!(!graph.connect(&a, &a));
        assert!(graph.get(&a).unwrap().connections().is_empty());
    }

    #[test]
    fn test_second_start_is_rejected() {
        let mut graph = ProgramGraph::new();
        let first = graph.add_node(make("start")).unwrap();
        let err = graph.add_node(make("start")).unwrap_err();

        assert!(matches!(err, GraphError::DuplicateStart { ref existing, .. } if existing == &first));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.start().unwrap().id(), &first);
    }

    #[test]
    fn test_second_end_is_rejected() {
        let mut graph = ProgramGraph::new();
        graph.add_node(make("end")).unwrap();
        assert!(matches!(
            graph.add_node(make("end")),
            Err(GraphError::DuplicateEnd { .. })
        ));
    }

    #[test]
    fn test_same_node_twice_is_rejected() {
        let mut graph = ProgramGraph::new();
        let node = make("print");
        graph.add_node(node.clone()).unwrap();
        assert!(matches!(
            graph.add_node(node),
            Err(GraphError::DuplicateNode(_))
        ));
    }

    #[test]
    fn test_missing_start_and_end_are_warnings_only() {
        let mut graph = ProgramGraph::new();
        let mut props = PropertyBag::new();
        props.insert("text".to_string(), PropertyValue::from("hi"));
        graph
            .add_node(NodeFactory::create("print", Position::default(), &props).unwrap())
            .unwrap();

        assert!(graph.validate().is_empty());
        assert_eq!(graph.warnings().len(), 2);
    }

    #[test]
    fn test_validate_concatenates_node_errors() {
        let mut graph = ProgramGraph::new();
        graph.add_node(make("start")).unwrap();
        graph.add_node(make("variable")).unwrap();
        graph.add_node(make("assign")).unwrap();
        assert_eq!(graph.validate().len(), 3);
    }

    #[test]
    fn test_serialize_lists_body_for_control_blocks() {
        let mut graph = ProgramGraph::new();
        let start = graph.add_node(make("start")).unwrap();
        let cond = graph.add_node(make("while")).unwrap();
        let body = graph.add_node(make("print")).unwrap();
        let end = graph.add_node(make("end")).unwrap();
        graph.connect(&start, &cond);
        graph.connect(&cond, &body);
        graph.connect_with(&cond, &end, EdgeKind::Next);

        let tree = graph.serialize();
        assert_eq!(tree.start_node_id.as_ref(), Some(&start));
        let loop_node = tree.nodes.iter().find(|n| n.id == cond).unwrap();
        assert_eq!(loop_node.body.as_deref(), Some(&[body.clone()][..]));
        assert_eq!(loop_node.next.as_deref(), Some(&[end.clone()][..]));
        assert_eq!(loop_node.connections, vec![body, end]);

        let start_node = tree.nodes.iter().find(|n| n.id == start).unwrap();
        assert!(start_node.body.is_none());

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["nodes"][1]["type"], "while");
        assert!(json["nodes"][0].get("body").is_none());
    }
}
