use crate::delimiters::CANONICAL;
use serde::{Deserialize, Serialize};

/// A fenced region found in a chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FencedBlock {
    /// Text between the fences, without the tag line
    pub content: String,

    /// Language tag from the opening fence line (may be empty)
    pub language: String,

    /// Character repeated three times on both fences
    pub delimiter: char,
}

impl FencedBlock {
    #[must_use]
    pub fn new(content: impl Into<String>, language: impl Into<String>, delimiter: char) -> Self {
        Self {
            content: content.into(),
            language: language.into(),
            delimiter,
        }
    }

    /// True when the fences use the backtick
    #[must_use]
    pub fn has_canonical_delimiter(&self) -> bool {
        self.delimiter == CANONICAL
    }

    /// The run of three delimiter characters, as typed by the author
    #[must_use]
    pub fn fence(&self) -> String {
        std::iter::repeat(self.delimiter).take(3).collect()
    }
}

/// Outcome of scanning a message for fenced blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// A backtick block with a language tag was seen; the author knows the syntax.
    WellFormed,

    /// Blocks long enough to be worth correcting, in message order
    Blocks(Vec<FencedBlock>),
}

impl Extraction {
    /// Blocks that still need attention (none when well-formed)
    #[must_use]
    pub fn blocks(&self) -> &[FencedBlock] {
        match self {
            Extraction::WellFormed => &[],
            Extraction::Blocks(blocks) => blocks,
        }
    }

    #[must_use]
    pub fn into_blocks(self) -> Vec<FencedBlock> {
        match self {
            Extraction::WellFormed => Vec::new(),
            Extraction::Blocks(blocks) => blocks,
        }
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.blocks().is_empty()
    }
}

/// What the classifier concluded about a piece of text
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Classification {
    pub is_target_language: bool,
    pub is_interactive_transcript: bool,
}

impl Classification {
    /// Either fact is enough to call the text code
    #[must_use]
    pub const fn is_code(&self) -> bool {
        self.is_target_language || self.is_interactive_transcript
    }
}

/// Template family an advisory was rendered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    /// Code pasted without any fences
    MissingFence,
    /// Fences made of a look-alike character
    WrongDelimiter,
    /// Language tag padded or not followed by a line break
    MalformedTag,
    /// Backtick fences without a language tag
    MissingTag,
}

impl AdvisoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AdvisoryKind::MissingFence => "missing_fence",
            AdvisoryKind::WrongDelimiter => "wrong_delimiter",
            AdvisoryKind::MalformedTag => "malformed_tag",
            AdvisoryKind::MissingTag => "missing_tag",
        }
    }
}

/// Rendered guidance, ready to post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub text: String,
}

impl Advisory {
    #[must_use]
    pub fn new(kind: AdvisoryKind, text: String) -> Self {
        Self { kind, text }
    }
}
