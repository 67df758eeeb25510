use crate::delimiters::is_delimiter;
use crate::text::spans_more_than;
use crate::types::{Extraction, FencedBlock};

/// Blocks with this many lines or fewer are not worth correcting
const MIN_BLOCK_LINES: usize = 3;

/// Scan `text` for fenced blocks, including ones drawn with look-alike characters.
///
/// A fence is three identical characters from [`crate::delimiters::DELIMITERS`].
/// The opening fence may carry a language tag (alphanumeric run ending in a
/// line break); the block closes at the nearest later run of the same three
/// characters. Matches never overlap and a closing fence is never reused as an
/// opening one. An unterminated fence yields nothing.
///
/// A backtick block with a tag anywhere in the text makes the whole message
/// [`Extraction::WellFormed`], discarding blocks already collected.
#[must_use]
pub fn scan(text: &str) -> Extraction {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut blocks = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let Some((block, next)) = match_at(text, &chars, pos) else {
            pos += 1;
            continue;
        };

        if block.has_canonical_delimiter() && !block.language.is_empty() {
            return Extraction::WellFormed;
        }

        if spans_more_than(&block.content, MIN_BLOCK_LINES) {
            blocks.push(block);
        }
        pos = next;
    }

    Extraction::Blocks(blocks)
}

/// Blocks that still need correcting, in message order.
///
/// Empty both when nothing is fenced and when the message is well-formed.
#[must_use]
pub fn extract(text: &str) -> Vec<FencedBlock> {
    scan(text).into_blocks()
}

/// Try to read a whole block whose opening fence starts at char index `start`.
/// Returns the block and the char index just past its closing fence.
fn match_at(text: &str, chars: &[(usize, char)], start: usize) -> Option<(FencedBlock, usize)> {
    let delimiter = chars[start].1;
    if !is_delimiter(delimiter) || !is_run(chars, start, delimiter) {
        return None;
    }
    let after_fence = start + 3;
    let offset = |idx: usize| chars.get(idx).map_or(text.len(), |&(byte, _)| byte);

    // Tagged reading first; if it never closes, the tag characters become content.
    if let Some(tag_end) = tag_end(chars, after_fence) {
        let body = tag_end + 1;
        if let Some(close) = find_close(chars, body, delimiter) {
            let block = FencedBlock::new(
                &text[offset(body)..offset(close)],
                &text[offset(after_fence)..offset(tag_end)],
                delimiter,
            );
            return Some((block, close + 3));
        }
    }

    let close = find_close(chars, after_fence, delimiter)?;
    let block = FencedBlock::new(&text[offset(after_fence)..offset(close)], "", delimiter);
    Some((block, close + 3))
}

/// Three copies of `delimiter` starting at `idx`
fn is_run(chars: &[(usize, char)], idx: usize, delimiter: char) -> bool {
    chars
        .get(idx..idx + 3)
        .is_some_and(|run| run.iter().all(|&(_, c)| c == delimiter))
}

/// Index of the line break ending a language tag that starts at `from`
fn tag_end(chars: &[(usize, char)], from: usize) -> Option<usize> {
    let len = chars[from..]
        .iter()
        .take_while(|&&(_, c)| c.is_alphanumeric())
        .count();
    let end = from + len;
    (len > 0 && chars.get(end).is_some_and(|&(_, c)| c == '\n')).then_some(end)
}

/// Nearest closing run leaving at least one character of content
fn find_close(chars: &[(usize, char)], body: usize, delimiter: char) -> Option<usize> {
    (body + 1..chars.len()).find(|&idx| is_run(chars, idx, delimiter))
}
