//! Target language table
//!
//! Everything the generator needs to know about a target language lives in a
//! static [`LanguageConfig`]: display name, file extension, keyword list,
//! abstract-type mapping, and the statement-template slots. Statement
//! templates use minijinja syntax (`{{ condition }}`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::node::DataType;

/// Supported target languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C
    C,
    /// C++
    Cpp,
    /// Python 3
    #[default]
    Python,
    /// Java
    Java,
}

impl Language {
    /// Every supported language
    pub const ALL: [Language; 4] = [Language::C, Language::Cpp, Language::Python, Language::Java];

    /// Every supported language, as a slice
    pub fn all() -> &'static [Language] {
        &Self::ALL
    }

    /// Language identifier as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Python => "python",
            Language::Java => "java",
        }
    }

    /// Static configuration for this language
    pub fn config(&self) -> &'static LanguageConfig {
        match self {
            Language::C => &C,
            Language::Cpp => &CPP,
            Language::Python => &PYTHON,
            Language::Java => &JAVA,
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" => Ok(Language::C),
            "cpp" | "c++" => Ok(Language::Cpp),
            "python" | "py" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            _ => Err(Error::UnsupportedLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a language spells a C-style `for (init; cond; incr)` loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForStyle {
    /// The triple maps directly
    CStyle,
    /// Only counted ranges exist; the triple is kept as a comment
    CountedRange,
}

/// Static description of a target language
#[derive(Debug)]
pub struct LanguageConfig {
    /// Language this entry describes
    pub language: Language,
    /// Display name
    pub name: &'static str,
    /// File extension including the dot
    pub extension: &'static str,
    /// Reserved words (informational)
    pub keywords: &'static [&'static str],
    /// Abstract type → concrete type spelling
    pub data_types: &'static [(DataType, &'static str)],
    /// Statement template slots
    pub syntax: &'static [(&'static str, &'static str)],
    /// Lines emitted before anything else
    pub header: &'static [&'static str],
    /// Whether the program is wrapped in a class (rendered from the `class` slot)
    pub wraps_in_class: bool,
    /// Whether statements live inside the `main_function` slot
    pub has_entry_point: bool,
    /// Lines opening the entry point body
    pub entry_prelude: &'static [&'static str],
    /// Lines closing the entry point body
    pub entry_epilogue: &'static [&'static str],
    /// Line comment marker
    pub comment: &'static str,
    /// Whether variables must be declared with a type
    pub declares_variables: bool,
    /// Loop lowering strategy
    pub for_style: ForStyle,
    /// Boolean literals
    pub true_literal: &'static str,
    /// Boolean literals
    pub false_literal: &'static str,
}

impl LanguageConfig {
    /// Concrete spelling of an abstract type
    pub fn type_name(&self, data_type: DataType) -> &'static str {
        self.data_types
            .iter()
            .find(|(ty, _)| *ty == data_type)
            .map(|(_, name)| *name)
            .unwrap_or("int")
    }

    /// Raw template for a slot
    pub fn template(&self, slot: &str) -> Option<&'static str> {
        self.syntax
            .iter()
            .find(|(name, _)| *name == slot)
            .map(|(_, template)| *template)
    }

    /// Statement terminator (`;` or empty)
    pub fn statement_end(&self) -> &'static str {
        self.template("statement_end").unwrap_or_default()
    }

    /// Block opener (`{` or empty)
    pub fn block_start(&self) -> &'static str {
        self.template("block_start").unwrap_or_default()
    }

    /// Block closer (`}` or empty)
    pub fn block_end(&self) -> &'static str {
        self.template("block_end").unwrap_or_default()
    }

    /// Terminate a statement
    pub fn statement(&self, body: &str) -> String {
        format!("{}{}", body, self.statement_end())
    }

    /// Turn text into a line comment
    pub fn line_comment(&self, text: &str) -> String {
        format!("{} {}", self.comment, text)
    }

    /// Literal for a boolean
    pub fn bool_literal(&self, value: bool) -> &'static str {
        if value {
            self.true_literal
        } else {
            self.false_literal
        }
    }
}

/// Identifier and display name of a language
#[derive(Debug, Clone, Serialize)]
pub struct LanguageSummary {
    /// Wire identifier
    pub id: Language,
    /// Display name
    pub name: &'static str,
}

/// Every supported language with its display name
pub fn available_languages() -> Vec<LanguageSummary> {
    Language::ALL
        .iter()
        .map(|lang| LanguageSummary {
            id: *lang,
            name: lang.config().name,
        })
        .collect()
}

static C: LanguageConfig = LanguageConfig {
    language: Language::C,
    name: "C",
    extension: ".c",
    keywords: &[
        "int", "float", "char", "double", "void", "if", "else", "while", "for", "do", "break",
        "continue", "return", "switch", "case", "default", "printf", "scanf", "main", "include",
        "stdio.h",
    ],
    data_types: &[
        (DataType::Int, "int"),
        (DataType::Float, "float"),
        (DataType::String, "char*"),
        (DataType::Boolean, "int"),
        (DataType::Array, "int[]"),
    ],
    syntax: &[
        ("variable_declaration", "{{ type }} {{ name }}"),
        ("variable_assignment", "{{ name }} = {{ value }}"),
        ("print", "printf(\"{{ format }}\", {{ args }})"),
        ("input", "scanf(\"{{ format }}\", &{{ variable }})"),
        ("if", "if ({{ condition }})"),
        ("else", "else"),
        ("while", "while ({{ condition }})"),
        ("for", "for ({{ init }}; {{ condition }}; {{ increment }})"),
        ("block_start", "{"),
        ("block_end", "}"),
        ("statement_end", ";"),
        ("main_function", "int main()"),
        ("return", "return 0;"),
    ],
    header: &["#include <stdio.h>", "#include <stdlib.h>", ""],
    wraps_in_class: false,
    has_entry_point: true,
    entry_prelude: &[],
    entry_epilogue: &["return 0;"],
    comment: "//",
    declares_variables: true,
    for_style: ForStyle::CStyle,
    true_literal: "1",
    false_literal: "0",
};

static CPP: LanguageConfig = LanguageConfig {
    language: Language::Cpp,
    name: "C++",
    extension: ".cpp",
    keywords: &[
        "int", "float", "char", "double", "bool", "string", "void", "if", "else", "while", "for",
        "do", "break", "continue", "return", "switch", "case", "default", "cout", "cin", "endl",
        "using", "namespace", "std", "main", "include", "iostream",
    ],
    data_types: &[
        (DataType::Int, "int"),
        (DataType::Float, "float"),
        (DataType::String, "string"),
        (DataType::Boolean, "bool"),
        (DataType::Array, "vector<int>"),
    ],
    syntax: &[
        ("variable_declaration", "{{ type }} {{ name }}"),
        ("variable_assignment", "{{ name }} = {{ value }}"),
        ("print", "cout << {{ args }} << endl"),
        ("input", "cin >> {{ variable }}"),
        ("if", "if ({{ condition }})"),
        ("else", "else"),
        ("while", "while ({{ condition }})"),
        ("for", "for ({{ init }}; {{ condition }}; {{ increment }})"),
        ("block_start", "{"),
        ("block_end", "}"),
        ("statement_end", ";"),
        ("main_function", "int main()"),
        ("return", "return 0;"),
    ],
    header: &[
        "#include <iostream>",
        "#include <string>",
        "#include <vector>",
        "using namespace std;",
        "",
    ],
    wraps_in_class: false,
    has_entry_point: true,
    entry_prelude: &[],
    entry_epilogue: &["return 0;"],
    comment: "//",
    declares_variables: true,
    for_style: ForStyle::CStyle,
    true_literal: "true",
    false_literal: "false",
};

static PYTHON: LanguageConfig = LanguageConfig {
    language: Language::Python,
    name: "Python",
    extension: ".py",
    keywords: &[
        "def", "if", "elif", "else", "while", "for", "in", "break", "continue", "return", "class",
        "import", "from", "as", "try", "except", "finally", "with", "lambda", "and", "or", "not",
        "True", "False", "None", "print", "input", "len", "range",
    ],
    data_types: &[
        (DataType::Int, "int"),
        (DataType::Float, "float"),
        (DataType::String, "str"),
        (DataType::Boolean, "bool"),
        (DataType::Array, "list"),
    ],
    syntax: &[
        ("variable_declaration", "{{ name }}"),
        ("variable_assignment", "{{ name }} = {{ value }}"),
        ("print", "print({{ args }})"),
        ("input", "{{ variable }} = input(\"{{ prompt }}\")"),
        ("if", "if {{ condition }}:"),
        ("else", "else:"),
        ("while", "while {{ condition }}:"),
        ("for", "for {{ variable }} in range({{ count }}):"),
        ("block_start", ""),
        ("block_end", ""),
        ("statement_end", ""),
        ("main_function", "def main():"),
        ("return", "return"),
    ],
    header: &[
        "# Visual Programming Compiler Generated Code",
        "# Generated for Python",
        "",
    ],
    wraps_in_class: false,
    has_entry_point: false,
    entry_prelude: &[],
    entry_epilogue: &[],
    comment: "#",
    declares_variables: false,
    for_style: ForStyle::CountedRange,
    true_literal: "True",
    false_literal: "False",
};

static JAVA: LanguageConfig = LanguageConfig {
    language: Language::Java,
    name: "Java",
    extension: ".java",
    keywords: &[
        "public", "private", "protected", "static", "void", "int", "float", "double", "char",
        "boolean", "String", "if", "else", "while", "for", "do", "break", "continue", "return",
        "switch", "case", "default", "class", "main", "System", "out", "println", "Scanner",
        "nextInt", "nextLine", "import", "java", "util",
    ],
    data_types: &[
        (DataType::Int, "int"),
        (DataType::Float, "float"),
        (DataType::String, "String"),
        (DataType::Boolean, "boolean"),
        (DataType::Array, "int[]"),
    ],
    syntax: &[
        ("variable_declaration", "{{ type }} {{ name }}"),
        ("variable_assignment", "{{ name }} = {{ value }}"),
        ("print", "System.out.println({{ args }})"),
        ("input", "{{ variable }} = scanner.{{ method }}()"),
        ("if", "if ({{ condition }})"),
        ("else", "else"),
        ("while", "while ({{ condition }})"),
        ("for", "for ({{ init }}; {{ condition }}; {{ increment }})"),
        ("block_start", "{"),
        ("block_end", "}"),
        ("statement_end", ";"),
        ("class", "public class {{ name }}"),
        ("main_function", "public static void main(String[] args)"),
        ("return", "return;"),
    ],
    header: &["import java.util.Scanner;", ""],
    wraps_in_class: true,
    has_entry_point: true,
    entry_prelude: &["Scanner scanner = new Scanner(System.in);"],
    entry_epilogue: &["scanner.close();"],
    comment: "//",
    declares_variables: true,
    for_style: ForStyle::CStyle,
    true_literal: "true",
    false_literal: "false",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_aliases() {
        assert_eq!("C++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("py".parse::<Language>().unwrap(), Language::Python);
        assert!(matches!(
            "rust".parse::<Language>(),
            Err(Error::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_every_language_maps_every_type() {
        for lang in Language::ALL {
            let config = lang.config();
            assert_eq!(config.language, lang);
            for ty in DataType::ALL {
                assert!(
                    config.data_types.iter().any(|(t, _)| *t == ty),
                    "{} lacks {}",
                    lang,
                    ty
                );
            }
        }
    }

    #[test]
    fn test_every_language_has_control_slots() {
        for lang in Language::ALL {
            let config = lang.config();
            for slot in ["if", "else", "while", "for", "print", "input"] {
                assert!(config.template(slot).is_some(), "{} lacks {}", lang, slot);
            }
        }
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Language::C.config().type_name(DataType::String), "char*");
        assert_eq!(Language::Cpp.config().type_name(DataType::Array), "vector<int>");
        assert_eq!(Language::Java.config().type_name(DataType::Boolean), "boolean");
    }

    #[test]
    fn test_statement_terminators() {
        assert_eq!(Language::Java.config().statement("x = 1"), "x = 1;");
        assert_eq!(Language::Python.config().statement("x = 1"), "x = 1");
    }

    #[test]
    fn test_available_languages_serialize() {
        let json = serde_json::to_value(available_languages()).unwrap();
        assert_eq!(json[1]["id"], "cpp");
        assert_eq!(json[1]["name"], "C++");
    }
}
