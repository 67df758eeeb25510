use crate::error::{InspectorError, Result};
use crate::language::TargetLanguage;
use crate::text::preview;
use crate::types::Classification;
use tree_sitter::Node;

/// Prompt lines needed before text counts as an interpreter session
pub const TRANSCRIPT_THRESHOLD: usize = 3;

/// Decides whether free text is code in the target language
#[derive(Debug, Clone, Copy)]
pub struct CodeClassifier {
    language: TargetLanguage,
}

impl Default for CodeClassifier {
    fn default() -> Self {
        Self::new(TargetLanguage::Python)
    }
}

impl CodeClassifier {
    #[must_use]
    pub const fn new(language: TargetLanguage) -> Self {
        Self { language }
    }

    #[must_use]
    pub const fn language(&self) -> TargetLanguage {
        self.language
    }

    /// Both facts about `text`, recomputed on every call
    #[must_use]
    pub fn classify(&self, text: &str) -> Classification {
        Classification {
            is_target_language: self.is_target_language_code(text),
            is_interactive_transcript: self.is_interactive_transcript(text),
        }
    }

    /// True when `text` parses cleanly and holds more than bare expressions.
    ///
    /// Lines of plain words parse as expression statements, so a tree made only
    /// of those is treated as prose.
    #[must_use]
    pub fn is_target_language_code(&self, text: &str) -> bool {
        match self.parses_as_statements(text) {
            Ok(verdict) => verdict,
            Err(e) => {
                log::warn!("Classifier unavailable, treating text as prose: {e}");
                false
            }
        }
    }

    /// True once [`TRANSCRIPT_THRESHOLD`] lines start with an interpreter prompt
    #[must_use]
    pub fn is_interactive_transcript(&self, text: &str) -> bool {
        self.is_interactive_transcript_with(text, TRANSCRIPT_THRESHOLD)
    }

    /// Same as [`Self::is_interactive_transcript`] with an explicit threshold.
    /// Stops reading at the line that reaches it.
    #[must_use]
    pub fn is_interactive_transcript_with(&self, text: &str, threshold: usize) -> bool {
        let markers = self.language.prompt_markers();
        let mut prompts = 0;

        for line in text.lines() {
            if markers.iter().any(|marker| line.starts_with(marker)) {
                prompts += 1;
                if prompts >= threshold {
                    return true;
                }
            }
        }

        false
    }

    fn parses_as_statements(&self, text: &str) -> Result<bool> {
        let mut parser = self.language.parser()?;
        let tree = parser
            .parse(text, None)
            .ok_or_else(|| InspectorError::parse("Parser returned no tree"))?;
        let root = tree.root_node();

        if root.has_error()
            || self.has_legacy_syntax(root, text)
            || has_indentation_error(root, text)
        {
            log::trace!("Text is not valid {}:\n{}", self.language.as_str(), preview(text));
            return Ok(false);
        }

        let mut cursor = root.walk();
        let only_expressions = root
            .named_children(&mut cursor)
            .filter(|node| !node.is_extra())
            .all(is_bare_expression);

        if only_expressions {
            log::trace!("Text consists only of expressions:\n{}", preview(text));
        }
        Ok(!only_expressions)
    }

    /// Constructs the grammar keeps for old interpreters count as syntax errors
    fn has_legacy_syntax(&self, node: Node, text: &str) -> bool {
        if self.is_legacy_node(node, text) {
            return true;
        }
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .any(|child| self.has_legacy_syntax(child, text));
        found
    }

    fn is_legacy_node(&self, node: Node, text: &str) -> bool {
        let kind = node.kind();
        if self.language.legacy_statement_kinds().contains(&kind)
            || self.language.legacy_tokens().contains(&kind)
        {
            return true;
        }

        match self.language {
            TargetLanguage::Python => match kind {
                // `except E, e:`
                "except_clause" => has_child_kind(node, ","),
                // `raise E, "message"`
                "raise_statement" => {
                    has_child_kind(node, ",") || has_child_kind(node, "expression_list")
                }
                "integer" => node
                    .utf8_text(text.as_bytes())
                    .is_ok_and(is_legacy_integer),
                // Backtick repr
                "string" => text
                    .get(node.start_byte()..)
                    .is_some_and(|rest| rest.starts_with('`')),
                _ => false,
            },
        }
    }
}

fn has_child_kind(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == kind);
    found
}

/// `0777` style octals and `10L` longs
fn is_legacy_integer(literal: &str) -> bool {
    if literal.ends_with(|c: char| c == 'l' || c == 'L') {
        return true;
    }
    let lower = literal.to_ascii_lowercase();
    let prefixed = ["0x", "0o", "0b"].iter().any(|prefix| lower.starts_with(prefix));
    if prefixed || lower.ends_with('j') {
        return false;
    }
    literal.starts_with('0') && literal.chars().any(|c| c.is_ascii_digit() && c != '0')
}

/// Unexpected indents at top level, and blocks whose lines disagree on
/// indentation depending on tab width
fn has_indentation_error(root: Node, text: &str) -> bool {
    let mut cursor = root.walk();
    let indented_top_level = root
        .named_children(&mut cursor)
        .filter(|node| !node.is_extra())
        .any(|node| matches!(line_indent(text, node), Some((indent, true)) if !indent.is_empty()));

    indented_top_level || has_inconsistent_block(root, text)
}

fn has_inconsistent_block(node: Node, text: &str) -> bool {
    if node.kind() == "block" && block_is_inconsistent(node, text) {
        return true;
    }
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .any(|child| has_inconsistent_block(child, text));
    found
}

/// Every statement opening a line must share one indentation, deeper than the
/// header line, whether a tab counts as eight columns or as one.
fn block_is_inconsistent(block: Node, text: &str) -> bool {
    let header = block
        .parent()
        .and_then(|parent| line_indent(text, parent))
        .map(|(indent, _)| indent_widths(indent));

    let mut expected = None;
    let mut cursor = block.walk();
    for child in block.named_children(&mut cursor).filter(|node| !node.is_extra()) {
        let Some((indent, true)) = line_indent(text, child) else {
            continue;
        };
        let widths = indent_widths(indent);
        if header.is_some_and(|(wide, narrow)| widths.0 <= wide || widths.1 <= narrow) {
            return true;
        }
        match expected {
            Some(seen) if seen != widths => return true,
            _ => expected = Some(widths),
        }
    }
    false
}

/// Leading whitespace of the line `node` starts on, and whether `node` is the
/// first thing on that line
fn line_indent<'a>(text: &'a str, node: Node) -> Option<(&'a str, bool)> {
    let start = node.start_byte();
    let line_start = start.checked_sub(node.start_position().column)?;
    let line = text.get(line_start..)?;
    let body = line.trim_start_matches(|c: char| matches!(c, ' ' | '\t' | '\x0c'));
    let indent_len = line.len() - body.len();
    Some((&line[..indent_len], line_start + indent_len == start))
}

/// Indentation width with tabs stopping every eight columns, and with tabs as one column
fn indent_widths(indent: &str) -> (usize, usize) {
    indent.chars().fold((0, 0), |(wide, narrow), c| match c {
        '\t' => ((wide / 8 + 1) * 8, narrow + 1),
        '\x0c' => (0, 0),
        _ => (wide + 1, narrow + 1),
    })
}

/// An expression statement that is not an assignment in disguise
fn is_bare_expression(node: Node) -> bool {
    if node.kind() != "expression_statement" {
        return false;
    }
    let mut cursor = node.walk();
    let assigns = node
        .named_children(&mut cursor)
        .any(|child| matches!(child.kind(), "assignment" | "augmented_assignment"));
    !assigns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> CodeClassifier {
        CodeClassifier::default()
    }

    #[test]
    fn statements_are_code() {
        let c = classifier();
        assert!(c.is_target_language_code("import os\nprint(os.getcwd())"));
        assert!(c.is_target_language_code("def add(a, b):\n    return a + b\n"));
        assert!(c.is_target_language_code("x = 1"));
        assert!(c.is_target_language_code("total += 1"));
        assert!(c.is_target_language_code("count: int = 0"));
        assert!(c.is_target_language_code("for i in range(3):\n    print(i)\n"));
    }

    #[test]
    fn bare_words_are_prose() {
        let c = classifier();
        assert!(!c.is_target_language_code("one\ntwo\nthree\nfour"));
        assert!(!c.is_target_language_code("hello\nworld"));
        assert!(!c.is_target_language_code("print('hi')\nfoo(bar)"));
    }

    #[test]
    fn comments_do_not_count_as_statements() {
        let c = classifier();
        assert!(!c.is_target_language_code("# note\nfoo\nbar"));
        assert!(c.is_target_language_code("# setup\nx = 2"));
    }

    #[test]
    fn invalid_syntax_is_prose() {
        let c = classifier();
        assert!(!c.is_target_language_code("Hey, can someone help me with this?"));
        assert!(!c.is_target_language_code("def broken(:\n    pass"));
        assert!(!c.is_target_language_code("```py\nx = 1\n```"));
    }

    #[test]
    fn legacy_print_statement_is_rejected() {
        let c = classifier();
        assert!(!c.is_target_language_code("print \"hello\"\nx = 1"));
        assert!(!c.is_target_language_code("if True:\n    print \"nested\"\n"));
    }

    #[test]
    fn indented_top_level_is_rejected() {
        let c = classifier();
        assert!(!c.is_target_language_code("  x = 1\n  y = 2\n"));
        assert!(!c.is_target_language_code(
            "    total = 0\n    for n in nums:\n        total += n\n    return total\n"
        ));
        assert!(!c.is_target_language_code("x = 1\n\tif x:\n  pass\n"));
    }

    #[test]
    fn indentation_inside_blocks() {
        let c = classifier();
        assert!(c.is_target_language_code("if x:\n\ty = 1\n\tz = 2\n"));
        assert!(c.is_target_language_code("x = 1; y = 2\n"));
        assert!(c.is_target_language_code("values = [\n    1,\n    2,\n]\n"));
        assert!(c.is_target_language_code("if x:\n    # note\n    y = 1\n"));
        // A tab and eight spaces line up only when tabs are eight columns wide.
        assert!(!c.is_target_language_code("if x:\n\ty = 1\n        z = 2\n"));
    }

    #[test]
    fn legacy_syntax_is_rejected() {
        let c = classifier();
        assert!(!c.is_target_language_code("try:\n    x = 1\nexcept ValueError, e:\n    pass\n"));
        assert!(!c.is_target_language_code("x = 1\nif x <> 2:\n    pass\n"));
        assert!(!c.is_target_language_code("mode = 0777\n"));
        assert!(!c.is_target_language_code("x = `y`\n"));
        assert!(!c.is_target_language_code("raise ValueError, 'bad'\n"));
    }

    #[test]
    fn modern_equivalents_are_code() {
        let c = classifier();
        assert!(c.is_target_language_code("try:\n    x = 1\nexcept (ValueError, KeyError) as e:\n    pass\n"));
        assert!(c.is_target_language_code("x = 1\nif x != 2:\n    pass\n"));
        assert!(c.is_target_language_code("mode = 0o777\nzero = 00\nbig = 1_000\n"));
        assert!(c.is_target_language_code("raise ValueError('bad')\n"));
    }

    #[test]
    fn legacy_integer_literals() {
        assert!(is_legacy_integer("0777"));
        assert!(is_legacy_integer("0_7"));
        assert!(is_legacy_integer("10L"));
        assert!(is_legacy_integer("0x1fL"));
        assert!(!is_legacy_integer("0"));
        assert!(!is_legacy_integer("000"));
        assert!(!is_legacy_integer("0x1F"));
        assert!(!is_legacy_integer("0777j"));
        assert!(!is_legacy_integer("42"));
    }

    #[test]
    fn tab_widths() {
        assert_eq!(indent_widths(""), (0, 0));
        assert_eq!(indent_widths("    "), (4, 4));
        assert_eq!(indent_widths("\t"), (8, 1));
        assert_eq!(indent_widths("  \t"), (8, 3));
    }

    #[test]
    fn empty_text_is_not_code() {
        assert!(!classifier().is_target_language_code(""));
    }

    #[test]
    fn transcript_needs_three_prompt_lines() {
        let c = classifier();
        let two = ">>> x = 1\n>>> x\n1";
        let three = ">>> for i in range(2):\n...     print(i)\n... \n0\n1";
        assert!(!c.is_interactive_transcript(two));
        assert!(c.is_interactive_transcript(three));
    }

    #[test]
    fn transcript_markers_need_trailing_space() {
        let c = classifier();
        assert!(!c.is_interactive_transcript(">>>x\n>>>y\n>>>z"));
        assert!(!c.is_interactive_transcript("text >>> a\ntext >>> b\ntext >>> c"));
    }

    #[test]
    fn transcript_threshold_is_configurable() {
        let c = classifier();
        assert!(c.is_interactive_transcript_with(">>> a", 1));
        assert!(!c.is_interactive_transcript_with(">>> a\n>>> b\n>>> c", 4));
    }

    #[test]
    fn classify_reports_both_facts() {
        let facts = classifier().classify(">>> a = 1\n>>> b = 2\n>>> a + b\n3");
        assert!(facts.is_interactive_transcript);
        assert!(!facts.is_target_language);
        assert!(facts.is_code());
    }
}
