//! Bullet text cleanup.
//!
//! Model output often carries markdown emphasis markers and bullets that are
//! too long to fit a slide. Cleaning strips the markers and shortens long
//! text at a word boundary.

/// Markdown formatting characters removed from every bullet.
const FORMATTING_CHARS: &[char] = &['*', '_', '`', '~'];

/// Longest bullet kept as-is, in characters.
pub const MAX_BULLET_CHARS: usize = 80;

/// Prefix length considered when shortening a long bullet.
const TRUNCATE_AT: usize = 77;

const ELLIPSIS: &str = "...";

/// Strip formatting markers and shorten text longer than 80 characters.
///
/// Shortened text keeps the first 77 characters up to their last space and
/// ends with `...`, so the result never exceeds 80 characters.
pub fn clean_text(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !FORMATTING_CHARS.contains(c))
        .collect();

    if stripped.chars().count() <= MAX_BULLET_CHARS {
        return stripped;
    }

    let prefix: String = stripped.chars().take(TRUNCATE_AT).collect();
    let head = prefix
        .rsplit_once(' ')
        .map(|(head, _)| head)
        .unwrap_or(&prefix);

    format!("{head}{ELLIPSIS}")
}
