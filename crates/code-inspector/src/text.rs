/// Check whether `text` has more than `lines` lines, without counting all of them
#[must_use]
pub fn spans_more_than(text: &str, lines: usize) -> bool {
    text.split('\n').nth(lines).is_some()
}

/// Cut `content` at a line boundary so the result has at most `max_chars`
/// characters and `max_lines` lines, then append a `#...` marker.
#[must_use]
pub fn truncate(content: &str, max_chars: usize, max_lines: usize) -> String {
    let mut chars = 0;
    let mut end = 0;

    for (walked, line) in content.split_inclusive('\n').enumerate() {
        let len = line.chars().count();
        if walked == max_lines || chars + len > max_chars {
            break;
        }
        chars += len;
        end += line.len();
    }

    format!("{}#...", &content[..end])
}

/// Preview used in log lines
#[must_use]
pub fn preview(content: &str) -> String {
    truncate(content, 204, 10)
}
