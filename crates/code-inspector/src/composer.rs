//! Guidance templates and the rules that pick one.
//!
//! Precedence, first match wins:
//!
//! ```text
//! well-formed message            -> nothing
//! no blocks                      -> MissingFence   (if the text is code)
//! any look-alike delimiter block -> WrongDelimiter (first such block)
//! first block, padded tag        -> MalformedTag
//! first block, no tag            -> MissingTag     (if the content is code)
//! ```

use crate::classifier::CodeClassifier;
use crate::delimiters::escaped_canonical_fence;
use crate::extractor::scan;
use crate::language::TargetLanguage;
use crate::types::{Advisory, AdvisoryKind, Extraction, FencedBlock};

/// Placeholder used when nothing is known about the pasted language
const AGNOSTIC_EXAMPLE: &str = "Hello, world!";

/// Renders corrective guidance for a chat message
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvisoryComposer {
    classifier: CodeClassifier,
}

/// What is wrong with a language tag typed inside the fence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagDefects {
    /// The tag as spelled in lowercase
    pub tag: &'static str,
    /// Spaces or tabs between the fence and the tag
    pub leading_spaces: bool,
    /// The tag sits on a line of its own instead of the fence line
    pub detached: bool,
    /// Something other than a line break right after the tag
    pub missing_line_break: bool,
}

impl AdvisoryComposer {
    #[must_use]
    pub const fn new(classifier: CodeClassifier) -> Self {
        Self { classifier }
    }

    fn language(&self) -> TargetLanguage {
        self.classifier.language()
    }

    /// Scan and compose in one step
    #[must_use]
    pub fn compose(&self, text: &str) -> Option<Advisory> {
        self.compose_extraction(text, &scan(text))
    }

    /// Pick the guidance for `text` given its scan result
    #[must_use]
    pub fn compose_extraction(&self, text: &str, extraction: &Extraction) -> Option<Advisory> {
        let blocks = match extraction {
            Extraction::WellFormed => return None,
            Extraction::Blocks(blocks) => blocks,
        };

        let Some(first) = blocks.first() else {
            return self.missing_fence(text);
        };

        if let Some(block) = blocks.iter().find(|b| !b.has_canonical_delimiter()) {
            return Some(self.wrong_delimiter(block));
        }

        if let Some(guidance) = self.malformed_tag(&first.content) {
            return Some(Advisory::new(AdvisoryKind::MalformedTag, guidance));
        }

        self.missing_tag(first)
            .map(|guidance| Advisory::new(AdvisoryKind::MissingTag, guidance))
    }

    fn missing_fence(&self, text: &str) -> Option<Advisory> {
        if !self.classifier.classify(text).is_code() {
            return None;
        }

        let text = format!(
            "It looks like you're trying to paste code into this channel.\n\n\
             Discord supports Markdown, which lets you post code with full syntax \
             highlighting. Please use it whenever you paste code, as it makes the code \
             easier to read and easier for us to help you with.\n\n\
             **To do this, use the following method:**\n{}",
            example_blocks(self.language().example_snippet())
        );
        Some(Advisory::new(AdvisoryKind::MissingFence, text))
    }

    fn wrong_delimiter(&self, block: &FencedBlock) -> Advisory {
        // Ends with a space so that a follow-up sentence can be appended.
        let mut text = format!(
            "It looks like you are trying to paste code into this channel.\n\n\
             You seem to be using the wrong symbols to mark where the code block starts. \
             The correct symbols would be {}, not `{}`. ",
            escaped_canonical_fence(),
            block.fence()
        );

        let secondary = self
            .malformed_tag(&block.content)
            .or_else(|| self.missing_tag(block));

        match secondary {
            Some(secondary) => {
                text.push_str("Furthermore, ");
                text.push_str(&as_continuation(&secondary));
            }
            None => {
                text.push_str("\n\n**Here is an example of how it should look:**\n");
                text.push_str(&example_blocks(&self.example_for_tag(&block.language)));
            }
        }

        Advisory::new(AdvisoryKind::WrongDelimiter, text)
    }

    /// Guidance for a tag the extractor could not accept, or `None` if the
    /// content does not open with one.
    #[must_use]
    pub fn malformed_tag(&self, content: &str) -> Option<String> {
        let defects = self.tag_defects(content)?;
        let tag = defects.tag;

        // The blank line after the heading is collapsed when this becomes a continuation.
        let mut lines =
            vec!["It looks like you incorrectly specified a language for your code block.\n".to_string()];

        if defects.leading_spaces {
            lines.push(format!(
                "Make sure there are no spaces between the backticks and `{tag}`."
            ));
        }
        if defects.detached {
            lines.push(format!(
                "Make sure `{tag}` is on the same line as the opening backticks."
            ));
        }
        if defects.missing_line_break {
            lines.push(format!(
                "Make sure you put your code on a new line following `{tag}`. \
                 There must not be any spaces after `{tag}`."
            ));
        }

        lines.push(format!(
            "\n**Here is an example of how it should look:**\n{}",
            example_blocks(self.language().example_snippet())
        ));
        Some(lines.join("\n"))
    }

    /// Find a target-language tag typed as block content, with whatever is wrong around it
    #[must_use]
    pub fn tag_defects(&self, content: &str) -> Option<TagDefects> {
        let stripped = content.trim_start();

        let tag = self.language().tags().iter().copied().find(|tag| {
            stripped
                .get(..tag.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(tag))
                && stripped[tag.len()..]
                    .chars()
                    .next()
                    .map_or(true, char::is_whitespace)
        })?;

        let padding = &content[..content.len() - stripped.len()];
        let defects = TagDefects {
            tag,
            leading_spaces: padding.starts_with(|c: char| c == ' ' || c == '\t'),
            detached: padding.contains('\n'),
            missing_line_break: !stripped[tag.len()..].starts_with('\n'),
        };

        (defects.leading_spaces || defects.detached || defects.missing_line_break)
            .then_some(defects)
    }

    /// Guidance for an untagged block of code, or `None` if the block has a
    /// tag or its content is not code
    #[must_use]
    pub fn missing_tag(&self, block: &FencedBlock) -> Option<String> {
        if !block.language.is_empty() || !self.classifier.classify(&block.content).is_code() {
            return None;
        }

        Some(format!(
            "It looks like you pasted {} code without syntax highlighting.\n\n\
             Please use syntax highlighting to improve the legibility of your code and make \
             it easier for us to help you.\n\n\
             **To do this, use the following method:**\n{}",
            self.language().display_name(),
            example_blocks(self.language().example_snippet())
        ))
    }

    fn example_for_tag(&self, tag: &str) -> String {
        if TargetLanguage::from_tag(tag) == Some(self.language()) {
            self.language().example_snippet().to_string()
        } else if !tag.is_empty() {
            // No sensible example exists for other languages.
            format!("{tag}\n...")
        } else {
            AGNOSTIC_EXAMPLE.to_string()
        }
    }
}

/// Escaped fences showing what to type, followed by the rendered result
fn example_blocks(content: &str) -> String {
    let fence = escaped_canonical_fence();
    format!(
        "{fence}{content}\n{fence}\n\n\
         **This will result in the following:**\n```{content}```"
    )
}

/// Turn a standalone message into a clause following "Furthermore, "
fn as_continuation(message: &str) -> String {
    let collapsed = message.replacen("\n\n", "\n", 1);
    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CODE: &str = "import os\nx = 1\ny = 2\nprint(x + y)\n";

    fn composer() -> AdvisoryComposer {
        AdvisoryComposer::default()
    }

    #[test]
    fn prose_gets_no_advisory() {
        assert_eq!(composer().compose("one\ntwo\nthree\nfour"), None);
    }

    #[test]
    fn unfenced_code_gets_missing_fence() {
        let advisory = composer().compose(CODE).expect("advisory");
        assert_eq!(advisory.kind, AdvisoryKind::MissingFence);
        assert!(advisory.text.contains("\\`\\`\\`python\nprint('Hello, world!')\n\\`\\`\\`"));
    }

    #[test]
    fn indented_function_body_gets_nothing() {
        let text = "    total = 0\n    for n in nums:\n        total += n\n    return total\n";
        assert_eq!(composer().compose(text), None);
    }

    #[test]
    fn unfenced_transcript_gets_missing_fence() {
        let text = ">>> a = 1\n>>> b = 2\n>>> a + b\n3";
        assert_eq!(
            composer().compose(text).map(|a| a.kind),
            Some(AdvisoryKind::MissingFence)
        );
    }

    #[test]
    fn well_formed_transcript_is_left_alone() {
        let text = "```py\n>>> a = 1\n>>> b = 2\n>>> a + b\n3\n```";
        assert_eq!(composer().compose(text), None);
    }

    #[test]
    fn wrong_delimiter_with_tag_uses_python_example() {
        let text = format!("'''python\n{CODE}'''");
        let advisory = composer().compose(&text).expect("advisory");
        assert_eq!(advisory.kind, AdvisoryKind::WrongDelimiter);
        assert!(advisory.text.contains("not `'''`"));
        assert!(advisory.text.contains("**Here is an example of how it should look:**"));
        assert!(advisory.text.contains("print('Hello, world!')"));
        assert!(!advisory.text.contains("Furthermore"));
    }

    #[test]
    fn wrong_delimiter_with_other_tag_uses_placeholder() {
        let text = format!("'''rust\n{CODE}'''");
        let advisory = composer().compose(&text).expect("advisory");
        assert!(advisory.text.contains("\\`\\`\\`rust\n...\n\\`\\`\\`"));
    }

    #[test]
    fn wrong_delimiter_on_prose_uses_agnostic_example() {
        let text = "'''\nsome\nwords\nhere\n'''";
        let advisory = composer().compose(text).expect("advisory");
        assert_eq!(advisory.kind, AdvisoryKind::WrongDelimiter);
        assert!(advisory.text.contains("\\`\\`\\`Hello, world!\n\\`\\`\\`"));
    }

    #[test]
    fn wrong_delimiter_names_first_bad_block() {
        let text = format!("```\n{CODE}```\n\"\"\"\n{CODE}\"\"\"\n'''\n{CODE}'''");
        let advisory = composer().compose(&text).expect("advisory");
        assert!(advisory.text.contains("not `\"\"\"`"));
    }

    #[test]
    fn wrong_delimiter_folds_missing_tag_into_one_message() {
        let fence = "\u{201C}\u{201C}\u{201C}";
        let text = format!("{fence}\n{CODE}{fence}");
        let advisory = composer().compose(&text).expect("advisory");
        assert_eq!(advisory.kind, AdvisoryKind::WrongDelimiter);
        assert!(advisory.text.contains(&format!("not `{fence}`. Furthermore, it looks like you pasted Python code")));
        assert!(advisory.text.contains("highlighting.\nPlease use"));
        assert_eq!(advisory.text.matches("**To do this").count(), 1);
        assert!(!advisory.text.contains("**Here is an example"));
    }

    #[test]
    fn wrong_delimiter_folds_malformed_tag() {
        let text = format!("''' py\n{CODE}'''");
        let advisory = composer().compose(&text).expect("advisory");
        assert!(advisory.text.contains("Furthermore, it looks like you incorrectly specified a language"));
        assert!(advisory.text.contains("no spaces between the backticks and `py`"));
    }

    #[test]
    fn padded_tag_is_malformed() {
        let text = format!("```py \n{CODE}```");
        let advisory = composer().compose(&text).expect("advisory");
        assert_eq!(advisory.kind, AdvisoryKind::MalformedTag);
        assert!(advisory.text.contains("There must not be any spaces after `py`."));
        assert!(!advisory.text.contains("no spaces between"));
    }

    #[test]
    fn both_tag_defects_are_reported() {
        let text = format!("``` python {CODE}```");
        let defects = composer()
            .tag_defects(" python import os")
            .expect("defects");
        assert_eq!(
            defects,
            TagDefects {
                tag: "python",
                leading_spaces: true,
                detached: false,
                missing_line_break: true,
            }
        );
        let advisory = composer().compose(&text).expect("advisory");
        assert_eq!(advisory.kind, AdvisoryKind::MalformedTag);
        assert!(advisory.text.contains("no spaces between the backticks and `python`"));
        assert!(advisory.text.contains("new line following `python`"));
    }

    #[test]
    fn tag_on_its_own_line_is_not_called_spacing() {
        let defects = composer().tag_defects("\npython\nx = 1").expect("defects");
        assert!(defects.detached);
        assert!(!defects.leading_spaces);
        assert!(!defects.missing_line_break);

        let text = format!("```\npython\n{CODE}```");
        let advisory = composer().compose(&text).expect("advisory");
        assert_eq!(advisory.kind, AdvisoryKind::MalformedTag);
        assert!(advisory.text.contains("`python` is on the same line as the opening backticks"));
        assert!(!advisory.text.contains("no spaces between"));
    }

    #[test]
    fn identifiers_starting_with_tag_are_not_tags() {
        assert_eq!(composer().tag_defects("pygame.init()\nx = 1"), None);
        assert_eq!(composer().tag_defects("python_version = 3"), None);
    }

    #[test]
    fn correct_tag_in_content_has_no_defects() {
        assert_eq!(composer().tag_defects("python\nx = 1"), None);
    }

    #[test]
    fn untagged_code_gets_missing_tag() {
        let text = format!("```\n{CODE}```");
        let advisory = composer().compose(&text).expect("advisory");
        assert_eq!(advisory.kind, AdvisoryKind::MissingTag);
        assert!(advisory.text.starts_with("It looks like you pasted Python code"));
    }

    #[test]
    fn untagged_prose_is_left_alone() {
        let text = "```\nsome\nwords\nhere\n```";
        assert_eq!(composer().compose(text), None);
    }

    #[test]
    fn continuation_lowercases_and_collapses() {
        assert_eq!(as_continuation("It is.\n\nNext.\n\nLast."), "it is.\nNext.\n\nLast.");
        assert_eq!(as_continuation(""), "");
    }
}
