//! Block palette offered to the editor, per target language

use serde::Serialize;

use crate::language::Language;
use crate::node::BlockKind;

/// Editor widget kind for a block input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputWidget {
    /// Free text
    Text,
    /// Fixed list of options
    Select,
}

/// One configurable field of a block
#[derive(Debug, Clone, Serialize)]
pub struct InputSpec {
    /// Property key
    pub name: &'static str,
    /// Widget kind
    #[serde(rename = "type")]
    pub widget: InputWidget,
    /// Placeholder shown in text widgets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    /// Options of select widgets
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<&'static str>,
}

impl InputSpec {
    fn text(name: &'static str, placeholder: &'static str) -> Self {
        Self {
            name,
            widget: InputWidget::Text,
            placeholder: Some(placeholder),
            options: Vec::new(),
        }
    }
}

/// A block available in the palette
#[derive(Debug, Clone, Serialize)]
pub struct BlockSpec {
    /// Block kind
    pub id: BlockKind,
    /// Display name
    pub name: &'static str,
    /// Icon name
    pub icon: &'static str,
    /// Palette group
    pub category: &'static str,
    /// Short description
    pub description: &'static str,
    /// Configurable fields
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputSpec>,
}

/// Blocks available when targeting `language`
pub fn palette(language: Language) -> Vec<BlockSpec> {
    let config = language.config();
    BlockKind::ALL
        .into_iter()
        .map(|kind| {
            let (name, icon, category, description) = match kind {
                BlockKind::Start => ("Start", "play", "flow", "Program starting point"),
                BlockKind::End => ("End", "stop", "flow", "Program ending point"),
                BlockKind::Variable => ("Variable", "box", "data", "Declare a variable"),
                BlockKind::Print => ("Print", "message-square", "io", "Display output"),
                BlockKind::Input => ("Input", "edit", "io", "Get user input"),
                BlockKind::Assign => ("Assign", "equal", "data", "Assign value to variable"),
                BlockKind::If => ("If", "git-branch", "control", "Conditional statement"),
                BlockKind::While => ("While", "repeat", "control", "While loop"),
                BlockKind::For => ("For", "rotate-cw", "control", "For loop"),
            };
            let inputs = match kind {
                BlockKind::Start | BlockKind::End => Vec::new(),
                BlockKind::Variable => vec![
                    InputSpec::text("var_name", "Variable name"),
                    InputSpec {
                        name: "data_type",
                        widget: InputWidget::Select,
                        placeholder: None,
                        options: config.data_types.iter().map(|(ty, _)| ty.as_str()).collect(),
                    },
                    InputSpec::text("initial_value", "Initial value (optional)"),
                ],
                BlockKind::Print => vec![
                    InputSpec::text("text", "Text to print"),
                    InputSpec::text("variables", "Variables to print (comma separated)"),
                ],
                BlockKind::Input => vec![
                    InputSpec::text("prompt", "Input prompt"),
                    InputSpec::text("variable", "Variable to store input"),
                ],
                BlockKind::Assign => vec![
                    InputSpec::text("variable", "Variable name"),
                    InputSpec::text("expression", "Expression or value"),
                ],
                BlockKind::If => vec![InputSpec::text("condition", "Condition (e.g., x > 5)")],
                BlockKind::While => vec![InputSpec::text("condition", "Loop condition")],
                BlockKind::For => vec![
                    InputSpec::text("init", "Initialization (e.g., i = 0)"),
                    InputSpec::text("condition", "Condition (e.g., i < 10)"),
                    InputSpec::text("increment", "Increment (e.g., i++)"),
                ],
            };
            BlockSpec {
                id: kind,
                name,
                icon,
                category,
                description,
                inputs,
            }
        })
        .collect()
}
