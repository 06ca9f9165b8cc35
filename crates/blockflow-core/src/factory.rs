//! Node factory
//!
//! Builds typed nodes from the untyped `(kind, position, properties)` triples
//! the editor sends. The factory is permissive: missing strings become empty,
//! unknown data types become `int`, and only an unrecognized kind yields no
//! node at all.

use crate::node::{
    AssignBlock, BlockKind, ConditionBlock, DataType, ForBlock, InputBlock, Node, NodeKind,
    Position, PrintBlock, PropertyBag, PropertyValue, VariableBlock,
};

/// Creates and patches nodes
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeFactory;

impl NodeFactory {
    /// Build a node for `kind`, or `None` when the kind is not recognized
    pub fn create(kind: &str, position: Position, properties: &PropertyBag) -> Option<Node> {
        let Some(block_kind) = BlockKind::parse(kind) else {
            tracing::warn!("Unknown block type '{}', node not created", kind);
            return None;
        };

        let text = |key: &str| {
            properties
                .get(key)
                .map(PropertyValue::to_text)
                .unwrap_or_default()
        };

        let payload = match block_kind {
            BlockKind::Start => NodeKind::Start,
            BlockKind::End => NodeKind::End,
            BlockKind::Variable => NodeKind::Variable(VariableBlock {
                var_name: text("var_name"),
                data_type: DataType::coerce(&text("data_type")),
                initial_value: text("initial_value"),
            }),
            BlockKind::Print => NodeKind::Print(PrintBlock {
                text: text("text"),
                variables: properties
                    .get("variables")
                    .map(PropertyValue::to_list)
                    .unwrap_or_default(),
            }),
            BlockKind::Input => NodeKind::Input(InputBlock {
                prompt: text("prompt"),
                variable: text("variable"),
            }),
            BlockKind::Assign => NodeKind::Assign(AssignBlock {
                variable: text("variable"),
                expression: text("expression"),
            }),
            BlockKind::If => NodeKind::If(ConditionBlock {
                condition: text("condition"),
            }),
            BlockKind::While => NodeKind::While(ConditionBlock {
                condition: text("condition"),
            }),
            BlockKind::For => NodeKind::For(ForBlock {
                init: text("init"),
                condition: text("condition"),
                increment: text("increment"),
            }),
        };

        let node = Node::new(payload, position);
        tracing::debug!("Created {} node {}", block_kind, node.id());
        Some(node)
    }

    /// Merge the keys present in `properties` into the node's payload
    ///
    /// Keys the node's kind does not know are ignored. Returns how many keys
    /// were applied.
    pub fn update(node: &mut Node, properties: &PropertyBag) -> usize {
        let mut applied = 0;
        for (key, value) in properties {
            if apply_property(node.kind_mut(), key, value) {
                applied += 1;
            } else {
                tracing::debug!(
                    "Ignoring property '{}' on {} node {}",
                    key,
                    node.block_kind(),
                    node.id()
                );
            }
        }
        applied
    }
}

fn apply_property(kind: &mut NodeKind, key: &str, value: &PropertyValue) -> bool {
    let slot = match (kind, key) {
        (NodeKind::Variable(v), "var_name") => &mut v.var_name,
        (NodeKind::Variable(v), "data_type") => {
            v.data_type = DataType::coerce(&value.to_text());
            return true;
        }
        (NodeKind::Variable(v), "initial_value") => &mut v.initial_value,
        (NodeKind::Print(p), "text") => &mut p.text,
        (NodeKind::Print(p), "variables") => {
            p.variables = value.to_list();
            return true;
        }
        (NodeKind::Input(i), "prompt") => &mut i.prompt,
        (NodeKind::Input(i), "variable") => &mut i.variable,
        (NodeKind::Assign(a), "variable") => &mut a.variable,
        (NodeKind::Assign(a), "expression") => &mut a.expression,
        (NodeKind::If(c) | NodeKind::While(c), "condition") => &mut c.condition,
        (NodeKind::For(f), "init") => &mut f.init,
        (NodeKind::For(f), "condition") => &mut f.condition,
        (NodeKind::For(f), "increment") => &mut f.increment,
        _ => return false,
    };
    *slot = value.to_text();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn bag(entries: &[(&str, &str)]) -> PropertyBag {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), PropertyValue::from(*v)))
            .collect()
    }

    #[rstest]
    #[case("start", 0)]
    #[case("end", 0)]
    #[case("variable", 1)]
    #[case("print", 1)]
    #[case("input", 1)]
    #[case("assign", 2)]
    #[case("if", 1)]
    #[case("while", 1)]
    #[case("for", 1)]
    fn test_empty_properties_yield_minimal_errors(#[case] kind: &str, #[case] expected: usize) {
        let node = NodeFactory::create(kind, Position::default(), &PropertyBag::new()).unwrap();
        assert_eq!(node.validate().len(), expected, "kind {}", kind);
    }

    #[test]
    fn test_unknown_kind_is_not_created() {
        assert!(NodeFactory::create("math", Position::default(), &PropertyBag::new()).is_none());
    }

    #[test]
    fn test_unknown_data_type_falls_back_to_int() {
        let node = NodeFactory::create(
            "variable",
            Position::default(),
            &bag(&[("var_name", "x"), ("data_type", "decimal")]),
        )
        .unwrap();
        match node.kind() {
            NodeKind::Variable(v) => assert_eq!(v.data_type, DataType::Int),
            other => panic!("Expected variable, got {:?}", other),
        }
    }

    #[test]
    fn test_print_variables_accept_comma_text() {
        let node = NodeFactory::create(
            "print",
            Position::default(),
            &bag(&[("variables", "a, b")]),
        )
        .unwrap();
        match node.kind() {
            NodeKind::Print(p) => {
                assert!(p.text.is_empty());
                assert_eq!(p.variables, vec!["a", "b"]);
            }
            other => panic!("Expected print, got {:?}", other),
        }
    }

    #[test]
    fn test_position_is_passed_through() {
        let node =
            NodeFactory::create("start", Position::new(120.0, 48.5), &PropertyBag::new()).unwrap();
        assert_eq!(node.position(), Position::new(120.0, 48.5));
    }

    #[test]
    fn test_update_merges_only_present_keys() {
        let mut node = NodeFactory::create(
            "for",
            Position::default(),
            &bag(&[("init", "i = 0"), ("condition", "i < 3"), ("increment", "i++")]),
        )
        .unwrap();

        let applied = NodeFactory::update(&mut node, &bag(&[("condition", "i < 5")]));
        assert_eq!(applied, 1);
        match node.kind() {
            NodeKind::For(f) => {
                assert_eq!(f.init, "i = 0");
                assert_eq!(f.condition, "i < 5");
                assert_eq!(f.increment, "i++");
            }
            other => panic!("Expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_update_ignores_unknown_keys() {
        let mut node = NodeFactory::create("start", Position::default(), &PropertyBag::new()).unwrap();
        let applied = NodeFactory::update(&mut node, &bag(&[("condition", "x")]));
        assert_eq!(applied, 0);
        assert_eq!(node.kind(), &NodeKind::Start);
    }

    #[test]
    fn test_update_coerces_data_type() {
        let mut node = NodeFactory::create(
            "variable",
            Position::default(),
            &bag(&[("var_name", "name"), ("data_type", "string")]),
        )
        .unwrap();
        NodeFactory::update(&mut node, &bag(&[("data_type", "whatever")]));
        match node.kind() {
            NodeKind::Variable(v) => {
                assert_eq!(v.data_type, DataType::Int);
                assert_eq!(v.var_name, "name");
            }
            other => panic!("Expected variable, got {:?}", other),
        }
    }
}
