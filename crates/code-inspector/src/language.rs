use crate::error::{InspectorError, Result};

/// Language whose pastes are inspected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetLanguage {
    Python,
}

impl TargetLanguage {
    /// Detect the target language from a fence tag (case-insensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "python" | "py" => Some(TargetLanguage::Python),
            _ => None,
        }
    }

    /// Get language name as string
    pub fn as_str(self) -> &'static str {
        match self {
            TargetLanguage::Python => "python",
        }
    }

    /// Name used in guidance text
    pub fn display_name(self) -> &'static str {
        match self {
            TargetLanguage::Python => "Python",
        }
    }

    /// Fence tags that select this language, longest first so that a
    /// prefix test never stops at a shorter alias.
    pub fn tags(self) -> &'static [&'static str] {
        match self {
            TargetLanguage::Python => &["python", "py"],
        }
    }

    /// Line prefixes of an interactive interpreter session
    pub fn prompt_markers(self) -> &'static [&'static str] {
        match self {
            TargetLanguage::Python => &[">>> ", "... "],
        }
    }

    /// Worked example shown in guidance: the tag line followed by one line of code.
    /// Markdown-sensitive characters must stay escaped here.
    pub fn example_snippet(self) -> &'static str {
        match self {
            TargetLanguage::Python => "python\nprint('Hello, world!')",
        }
    }

    /// Node kinds that the grammar accepts but the current interpreter rejects
    pub fn legacy_statement_kinds(self) -> &'static [&'static str] {
        match self {
            TargetLanguage::Python => &["print_statement", "exec_statement"],
        }
    }

    /// Anonymous tokens the grammar accepts but the current interpreter rejects
    pub fn legacy_tokens(self) -> &'static [&'static str] {
        match self {
            TargetLanguage::Python => &["<>"],
        }
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            TargetLanguage::Python => tree_sitter_python::LANGUAGE.into(),
        }
    }

    /// Build a parser bound to this language's grammar
    pub fn parser(self) -> Result<tree_sitter::Parser> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&self.tree_sitter_language())
            .map_err(|e| InspectorError::tree_sitter(format!("Failed to set language: {e}")))?;
        Ok(parser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(TargetLanguage::from_tag("py"), Some(TargetLanguage::Python));
        assert_eq!(TargetLanguage::from_tag("Python"), Some(TargetLanguage::Python));
        assert_eq!(TargetLanguage::from_tag("PY"), Some(TargetLanguage::Python));
        assert_eq!(TargetLanguage::from_tag("rust"), None);
        assert_eq!(TargetLanguage::from_tag(""), None);
    }

    #[test]
    fn test_tags_longest_first() {
        let tags = TargetLanguage::Python.tags();
        assert!(tags.windows(2).all(|w| w[0].len() >= w[1].len()));
    }

    #[test]
    fn test_parser_builds() {
        assert!(TargetLanguage::Python.parser().is_ok());
    }

    #[test]
    fn test_example_snippet_starts_with_tag() {
        let example = TargetLanguage::Python.example_snippet();
        assert!(example.starts_with("python\n"));
    }
}
