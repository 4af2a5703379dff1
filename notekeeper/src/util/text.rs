// src/util/text.rs

/// First non-empty line of `content`, trimmed and cut to `max_chars`.
///
/// A cut line ends with `…`. Counting is by `char`, so multi-byte text is
/// never split inside a code point.
///
/// # Examples
///
/// ```
/// use notekeeper::util::text::preview;
///
/// assert_eq!(preview("\n  Buy milk  \nand eggs", 20), "Buy milk");
/// assert_eq!(preview("abcdef", 4), "abc…");
/// ```
pub fn preview(content: &str, max_chars: usize) -> String {
    let line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    if max_chars == 0 {
        return String::new();
    }
    if line.chars().count() <= max_chars {
        return line.to_string();
    }

    let mut cut: String = line.chars().take(max_chars - 1).collect();
    cut.push('…');
    cut
}
