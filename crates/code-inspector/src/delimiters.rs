//! Characters people type when they mean a backtick.

/// The only character that opens a real fenced block
pub const CANONICAL: char = '`';

/// Every character accepted as a fence, the backtick included
pub const DELIMITERS: [char; 11] = [
    CANONICAL,
    '\'',
    '"',
    '\u{00B4}', // acute accent
    '\u{2018}', // left single quotation mark
    '\u{2019}', // right single quotation mark
    '\u{2032}', // prime
    '\u{201C}', // left double quotation mark
    '\u{201D}', // right double quotation mark
    '\u{2033}', // double prime
    '\u{3003}', // ditto mark
];

#[must_use]
pub fn is_delimiter(c: char) -> bool {
    DELIMITERS.contains(&c)
}

/// Markdown-escaped canonical fence, for embedding in guidance text
#[must_use]
pub fn escaped_canonical_fence() -> String {
    format!("\\{CANONICAL}").repeat(3)
}
