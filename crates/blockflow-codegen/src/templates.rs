//! Statement template rendering
//!
//! Every slot in a [`LanguageConfig`](blockflow_core::LanguageConfig) syntax
//! table is a minijinja template rendered against a flat string context.

use minijinja::Environment;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use blockflow_core::Language;

use crate::error::{Error, Result};

static ENV: Lazy<Environment<'static>> = Lazy::new(Environment::new);

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*(\w+)").expect("placeholder pattern is valid"));

/// Render a language slot with the given context
///
/// ```rust,ignore
/// let ctx = BTreeMap::from([("condition", "x > 5".to_string())]);
/// assert_eq!(render_template(Language::C, "if", &ctx)?, "if (x > 5)");
/// ```
pub fn render_template(
    language: Language,
    slot: &str,
    context: &BTreeMap<&str, String>,
) -> Result<String> {
    let template = language
        .config()
        .template(slot)
        .ok_or_else(|| Error::UnknownTemplate {
            language,
            slot: slot.to_string(),
        })?;
    render_str(template, context)
}

/// Render an arbitrary template string
pub fn render_str(template: &str, context: &BTreeMap<&str, String>) -> Result<String> {
    Ok(ENV.render_str(template, context)?)
}

/// Variables referenced by a template, in first-use order
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for cap in PLACEHOLDER.captures_iter(template) {
        if let Some(m) = cap.get(1)
            && !names.iter().any(|n| n == m.as_str())
        {
            names.push(m.as_str().to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ctx(pairs: &[(&'static str, &str)]) -> BTreeMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[rstest]
    #[case(Language::C, "if (x > 5)")]
    #[case(Language::Cpp, "if (x > 5)")]
    #[case(Language::Java, "if (x > 5)")]
    #[case(Language::Python, "if x > 5:")]
    fn test_render_if_slot(#[case] language: Language, #[case] expected: &str) {
        let rendered = render_template(language, "if", &ctx(&[("condition", "x > 5")])).unwrap();
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_does_not_escape_operators() {
        let rendered =
            render_template(Language::C, "while", &ctx(&[("condition", "a < b && c")])).unwrap();
        assert_eq!(rendered, "while (a < b && c)");
    }

    #[test]
    fn test_unknown_slot() {
        let err = render_template(Language::Python, "class", &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, Error::UnknownTemplate { .. }));
    }

    #[test]
    fn test_invalid_template() {
        assert!(matches!(
            render_str("{{ unclosed", &BTreeMap::new()),
            Err(Error::InvalidTemplate(_))
        ));
    }

    #[test]
    fn test_placeholders_in_order_without_duplicates() {
        let names = placeholders("for ({{ init }}; {{ condition }}; {{ increment }}) {{ init }}");
        assert_eq!(names, vec!["init", "condition", "increment"]);
    }

    #[test]
    fn test_every_slot_renders() {
        for language in Language::ALL {
            for (slot, template) in language.config().syntax {
                let names = placeholders(template);
                let context: BTreeMap<&str, String> =
                    names.iter().map(|n| (n.as_str(), "v".to_string())).collect();
                assert!(
                    render_template(language, slot, &context).is_ok(),
                    "{} / {}",
                    language,
                    slot
                );
            }
        }
    }
}
