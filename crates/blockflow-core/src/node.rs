//! Node model
//!
//! A node is one block placed on the canvas. Every node carries a generated
//! identifier, a cosmetic position, its outgoing connections (by identifier,
//! never by value) and a typed payload per block kind.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a node, unique for the lifetime of the process
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canvas coordinates; passed through unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Position {
    /// Create a position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Discriminant of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Program entry point
    Start,
    /// Program exit point
    End,
    /// Variable declaration
    Variable,
    /// Console output
    Print,
    /// Console input
    Input,
    /// Assignment of an expression
    Assign,
    /// Conditional block
    If,
    /// Condition-controlled loop
    While,
    /// C-style counted loop
    For,
}

impl BlockKind {
    /// Every block kind, in palette order
    pub const ALL: [BlockKind; 9] = [
        BlockKind::Start,
        BlockKind::End,
        BlockKind::Variable,
        BlockKind::Print,
        BlockKind::Input,
        BlockKind::Assign,
        BlockKind::If,
        BlockKind::While,
        BlockKind::For,
    ];

    /// Parse the wire name of a block kind (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Start => "start",
            BlockKind::End => "end",
            BlockKind::Variable => "variable",
            BlockKind::Print => "print",
            BlockKind::Input => "input",
            BlockKind::Assign => "assign",
            BlockKind::If => "if",
            BlockKind::While => "while",
            BlockKind::For => "for",
        }
    }

    /// Whether the kind opens a nested block of statements
    pub fn is_control(&self) -> bool {
        matches!(self, BlockKind::If | BlockKind::While | BlockKind::For)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract data type of a declared variable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Integer
    #[default]
    Int,
    /// Floating point
    Float,
    /// Text
    String,
    /// Truth value
    Boolean,
    /// Integer array
    Array,
}

impl DataType {
    /// Every data type
    pub const ALL: [DataType; 5] = [
        DataType::Int,
        DataType::Float,
        DataType::String,
        DataType::Boolean,
        DataType::Array,
    ];

    /// Parse an abstract type name
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|ty| ty.as_str() == name)
    }

    /// Parse an abstract type name, falling back to `int`
    pub fn coerce(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    /// Abstract type name
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::String => "string",
            DataType::Boolean => "boolean",
            DataType::Array => "array",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a connection leaving a node
///
/// Plain statements follow every outgoing connection in order. Control blocks
/// treat `Flow` connections as their body, `Else` connections (on `If`) as the
/// alternative branch, and `Next` connections as the statement after the block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Sequential flow, or body membership for control blocks
    #[default]
    Flow,
    /// Alternative branch of an `If`
    Else,
    /// Continuation after a control block closes
    Next,
}

/// A directed connection to another node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Target node
    pub target: NodeId,
    /// Role of the connection
    pub kind: EdgeKind,
}

/// A single value in a property bag
///
/// Deserialization is lenient: `null` reads as empty text and list items of
/// any scalar type are stringified, so partial editor state still loads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Plain text
    Text(String),
    /// List of names
    List(Vec<String>),
    /// Boolean as sent by form widgets
    Bool(bool),
    /// Number as sent by form widgets
    Number(serde_json::Number),
}

impl PropertyValue {
    /// Coerce to text; lists are joined with `", "`
    pub fn to_text(&self) -> String {
        match self {
            PropertyValue::Text(s) => s.clone(),
            PropertyValue::List(items) => items.join(", "),
            PropertyValue::Bool(b) => b.to_string(),
            PropertyValue::Number(n) => n.to_string(),
        }
    }

    /// Coerce to a list of names; text is split on commas
    pub fn to_list(&self) -> Vec<String> {
        let items: Vec<String> = match self {
            PropertyValue::List(items) => items.clone(),
            other => other.to_text().split(',').map(str::to_string).collect(),
        };
        items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Null,
    Text(String),
    Bool(bool),
    Number(serde_json::Number),
    List(Vec<RawValue>),
}

impl RawValue {
    fn into_item(self) -> Option<String> {
        match self {
            RawValue::Null => None,
            RawValue::Text(s) => Some(s),
            RawValue::Bool(b) => Some(b.to_string()),
            RawValue::Number(n) => Some(n.to_string()),
            RawValue::List(items) => Some(
                items
                    .into_iter()
                    .filter_map(RawValue::into_item)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        }
    }
}

impl From<RawValue> for PropertyValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Null => PropertyValue::Text(String::new()),
            RawValue::Text(s) => PropertyValue::Text(s),
            RawValue::Bool(b) => PropertyValue::Bool(b),
            RawValue::Number(n) => PropertyValue::Number(n),
            RawValue::List(items) => {
                PropertyValue::List(items.into_iter().filter_map(RawValue::into_item).collect())
            }
        }
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawValue::deserialize(deserializer).map(PropertyValue::from)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::List(value)
    }
}

/// String-keyed property map as supplied by the editor
pub type PropertyBag = BTreeMap<String, PropertyValue>;

/// Payload of a `Variable` block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableBlock {
    /// Declared name
    pub var_name: String,
    /// Abstract type
    pub data_type: DataType,
    /// Optional initial value, verbatim
    pub initial_value: String,
}

/// Payload of a `Print` block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrintBlock {
    /// Literal text
    pub text: String,
    /// Variables printed after the text
    pub variables: Vec<String>,
}

/// Payload of an `Input` block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputBlock {
    /// Optional prompt shown before reading
    pub prompt: String,
    /// Variable receiving the value
    pub variable: String,
}

/// Payload of an `Assign` block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignBlock {
    /// Assigned variable
    pub variable: String,
    /// Right-hand side, verbatim
    pub expression: String,
}

/// Payload shared by `If` and `While`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionBlock {
    /// Condition expression, verbatim
    pub condition: String,
}

/// Payload of a `For` block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForBlock {
    /// Initialization clause
    pub init: String,
    /// Loop condition
    pub condition: String,
    /// Increment clause
    pub increment: String,
}

/// Typed payload of a node, one variant per block kind
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Program entry point
    Start,
    /// Program exit point
    End,
    /// Variable declaration
    Variable(VariableBlock),
    /// Console output
    Print(PrintBlock),
    /// Console input
    Input(InputBlock),
    /// Assignment
    Assign(AssignBlock),
    /// Conditional block
    If(ConditionBlock),
    /// Condition-controlled loop
    While(ConditionBlock),
    /// Counted loop
    For(ForBlock),
}

impl NodeKind {
    /// Discriminant of the payload
    pub fn block_kind(&self) -> BlockKind {
        match self {
            NodeKind::Start => BlockKind::Start,
            NodeKind::End => BlockKind::End,
            NodeKind::Variable(_) => BlockKind::Variable,
            NodeKind::Print(_) => BlockKind::Print,
            NodeKind::Input(_) => BlockKind::Input,
            NodeKind::Assign(_) => BlockKind::Assign,
            NodeKind::If(_) => BlockKind::If,
            NodeKind::While(_) => BlockKind::While,
            NodeKind::For(_) => BlockKind::For,
        }
    }

    /// Structural checks on required properties
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        match self {
            NodeKind::Start | NodeKind::End => {}
            NodeKind::Variable(v) => {
                if blank(&v.var_name) {
                    errors.push("Variable name is required".to_string());
                }
            }
            NodeKind::Print(p) => {
                if blank(&p.text) && p.variables.is_empty() {
                    errors.push("Print statement must have text or variables".to_string());
                }
            }
            NodeKind::Input(i) => {
                if blank(&i.variable) {
                    errors.push("Input must specify a variable to store the value".to_string());
                }
            }
            NodeKind::Assign(a) => {
                if blank(&a.variable) {
                    errors.push("Assignment must specify a variable".to_string());
                }
                if blank(&a.expression) {
                    errors.push("Assignment must have an expression".to_string());
                }
            }
            NodeKind::If(c) => {
                if blank(&c.condition) {
                    errors.push("If statement must have a condition".to_string());
                }
            }
            NodeKind::While(c) => {
                if blank(&c.condition) {
                    errors.push("While loop must have a condition".to_string());
                }
            }
            NodeKind::For(f) => {
                if blank(&f.init) || blank(&f.condition) || blank(&f.increment) {
                    errors.push(
                        "For loop must have initialization, condition, and increment".to_string(),
                    );
                }
            }
        }
        errors
    }

    /// The payload as a property bag, keyed by wire names
    pub fn properties(&self) -> PropertyBag {
        let mut bag = PropertyBag::new();
        let mut put = |key: &str, value: PropertyValue| {
            bag.insert(key.to_string(), value);
        };
        match self {
            NodeKind::Start | NodeKind::End => {}
            NodeKind::Variable(v) => {
                put("var_name", v.var_name.as_str().into());
                put("data_type", v.data_type.as_str().into());
                put("initial_value", v.initial_value.as_str().into());
            }
            NodeKind::Print(p) => {
                put("text", p.text.as_str().into());
                put("variables", p.variables.clone().into());
            }
            NodeKind::Input(i) => {
                put("prompt", i.prompt.as_str().into());
                put("variable", i.variable.as_str().into());
            }
            NodeKind::Assign(a) => {
                put("variable", a.variable.as_str().into());
                put("expression", a.expression.as_str().into());
            }
            NodeKind::If(c) | NodeKind::While(c) => {
                put("condition", c.condition.as_str().into());
            }
            NodeKind::For(f) => {
                put("init", f.init.as_str().into());
                put("condition", f.condition.as_str().into());
                put("increment", f.increment.as_str().into());
            }
        }
        bag
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// A block placed in a program graph
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    position: Position,
    connections: Vec<Connection>,
    kind: NodeKind,
}

impl Node {
    /// Create a node with a freshly generated identifier and no connections
    pub fn new(kind: NodeKind, position: Position) -> Self {
        Self {
            id: NodeId::generate(),
            position,
            connections: Vec::new(),
            kind,
        }
    }

    /// Node identifier
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Canvas position
    pub fn position(&self) -> Position {
        self.position
    }

    /// Typed payload
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Mutable typed payload, used when patching properties
    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Discriminant
    pub fn block_kind(&self) -> BlockKind {
        self.kind.block_kind()
    }

    /// Outgoing connections in insertion order
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Whether a connection to `target` already exists, whatever its kind
    pub fn is_connected_to(&self, target: &NodeId) -> bool {
        self.connections.iter().any(|c| &c.target == target)
    }

    pub(crate) fn push_connection(&mut self, target: NodeId, kind: EdgeKind) {
        self.connections.push(Connection { target, kind });
    }

    /// Structural checks on required properties
    pub fn validate(&self) -> Vec<String> {
        self.kind.validate()
    }

    /// Targets forming the body of a control block
    ///
    /// `If` bodies are its `Flow` connections; loops also absorb `Else`
    /// connections. Empty for plain statements.
    pub fn body(&self) -> Vec<&NodeId> {
        match self.block_kind() {
            BlockKind::If => self.targets(|k| k == EdgeKind::Flow),
            BlockKind::While | BlockKind::For => self.targets(|k| k != EdgeKind::Next),
            _ => Vec::new(),
        }
    }

    /// Targets forming the `else` branch of an `If`
    pub fn else_branch(&self) -> Vec<&NodeId> {
        match self.block_kind() {
            BlockKind::If => self.targets(|k| k == EdgeKind::Else),
            _ => Vec::new(),
        }
    }

    /// Targets emitted after a control block closes
    pub fn next(&self) -> Vec<&NodeId> {
        if self.block_kind().is_control() {
            self.targets(|k| k == EdgeKind::Next)
        } else {
            Vec::new()
        }
    }

    fn targets(&self, keep: impl Fn(EdgeKind) -> bool) -> Vec<&NodeId> {
        self.connections
            .iter()
            .filter(|c| keep(c.kind))
            .map(|c| &c.target)
            .collect()
    }
}
