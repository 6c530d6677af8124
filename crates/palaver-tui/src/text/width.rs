//! Text width and truncation utilities.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Visual width of a string in terminal cells.
///
/// Wide characters (CJK, most emoji) take 2 cells.
pub fn visual_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `max_width` cells, appending "...".
///
/// Never splits a character.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if visual_width(s) <= max_width {
        return s.to_string();
    }

    let target_width = max_width.saturating_sub(3);
    if target_width == 0 {
        return "...".to_string();
    }

    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > target_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    result.push_str("...");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_width() {
        assert_eq!(visual_width("hello"), 5);
        assert_eq!(visual_width(""), 0);
        assert_eq!(visual_width("你好"), 4);
    }

    #[test]
    fn test_truncate_fits() {
        assert_eq!(truncate_to_width("claude", 10), "claude");
        assert_eq!(truncate_to_width("claude", 6), "claude");
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // 2 cells for 你, the next wide char would overflow
        assert_eq!(truncate_to_width("你好世界", 6), "你...");
    }

    #[test]
    fn test_truncate_very_short() {
        assert_eq!(truncate_to_width("hello", 3), "...");
        assert_eq!(truncate_to_width("hello", 0), "...");
    }
}
