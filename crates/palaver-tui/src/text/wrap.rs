//! Text wrapping for message bodies.

/// Wrap `text` to `width` cells.
///
/// Embedded newlines start a new line and blank lines are kept. A width of
/// zero returns the text split on newlines only.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return text.split('\n').map(str::to_string).collect();
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(
            textwrap::wrap(paragraph, width)
                .into_iter()
                .map(std::borrow::Cow::into_owned),
        );
    }
    lines
}
