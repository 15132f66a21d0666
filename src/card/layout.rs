//! Greedy word-wrap against a pixel-measuring capability.

/// Anything that can measure rendered text width in pixels for the active
/// face and size. Implemented by [`ScaledFont`](super::fonts::ScaledFont) and
/// by fixed-advance fakes in tests.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> f32;
}

/// Split `text` into lines that each measure at most `max_width` pixels.
///
/// Words accumulate into a candidate line; once appending the next word would
/// exceed the width (and the line already holds at least one word) the line is
/// committed and the word starts a new one. A single word wider than
/// `max_width` is placed on its own line unmodified. The final accumulated
/// line is always committed. Word-boundary wrapping only; no hyphenation.
pub fn wrap_lines(measure: &dyn TextMeasure, text: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };

        if measure.text_width(&candidate) > max_width && !line.is_empty() {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }

    lines.push(line);
    lines
}
