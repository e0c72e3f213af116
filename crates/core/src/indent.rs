//! Nesting level from leading whitespace.

/// Deepest outline level a body line can carry.
pub const MAX_INDENT_LEVEL: u8 = 4;

/// Width of one space-indent unit.
const SPACES_PER_LEVEL: usize = 4;

/// Derive `(level, trimmed_text)` for a raw line.
///
/// Each leading tab or run of four spaces adds one level; counting stops at
/// the first character that starts neither unit. The level is clamped to
/// [`MAX_INDENT_LEVEL`].
pub fn classify(line: &str) -> (u8, &str) {
    let mut rest = line;
    let mut level: usize = 0;

    loop {
        if let Some(stripped) = rest.strip_prefix('\t') {
            rest = stripped;
        } else if rest.len() >= SPACES_PER_LEVEL
            && rest.as_bytes()[..SPACES_PER_LEVEL].iter().all(|&b| b == b' ')
        {
            rest = &rest[SPACES_PER_LEVEL..];
        } else {
            break;
        }
        level += 1;
    }

    let level = level.min(MAX_INDENT_LEVEL as usize) as u8;
    (level, line.trim())
}
