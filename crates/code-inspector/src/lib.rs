//! # Codeblock Inspector
//!
//! Finds badly fenced or untagged code pastes in chat messages and writes the
//! guidance that explains how to fix them.
//!
//! ## Architecture
//!
//! ```text
//! Message text
//!     │
//!     ├──> Extractor (tolerant fence scan)
//!     │      ├─ backtick and look-alike delimiters
//!     │      ├─ optional language tag line
//!     │      └─ WellFormed short-circuit on a tagged backtick block
//!     │
//!     ├──> Classifier
//!     │      ├─ tree-sitter parse, bare-expression guard
//!     │      └─ interpreter prompt density
//!     │
//!     └──> Composer
//!            └─ first matching template -> Advisory
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codeblock_inspector::{AdvisoryComposer, AdvisoryKind};
//!
//! let paste = "\u{2018}\u{2018}\u{2018}\nimport os\nx = 1\nprint(x)\n\u{2018}\u{2018}\u{2018}";
//! let advisory = AdvisoryComposer::default().compose(paste).unwrap();
//! assert_eq!(advisory.kind, AdvisoryKind::WrongDelimiter);
//! ```

mod classifier;
mod composer;
pub mod delimiters;
mod error;
mod extractor;
mod language;
mod text;
mod types;

pub use classifier::{CodeClassifier, TRANSCRIPT_THRESHOLD};
pub use composer::{AdvisoryComposer, TagDefects};
pub use error::{InspectorError, Result};
pub use extractor::{extract, scan};
pub use language::TargetLanguage;
pub use text::{preview, spans_more_than, truncate};
pub use types::{Advisory, AdvisoryKind, Classification, Extraction, FencedBlock};
