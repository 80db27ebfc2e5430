use crate::{
    foundation::core::Rgba8,
    render::overlay::Overlay,
    text::font::{FontHandle, TextBounds},
};

/// A string together with its measured extent in a given font.
///
/// Values are immutable: the extent is computed once from the content at construction, so it
/// can never go stale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeasuredText {
    content: String,
    bounds: TextBounds,
}

impl MeasuredText {
    /// Measure `content` in `font`.
    pub fn new(font: &mut FontHandle, content: impl Into<String>) -> Self {
        let content = content.into();
        let bounds = font.bounds(&content);
        Self { content, bounds }
    }

    /// Text as drawn, including the trailing space appended to each word by [`wrap`].
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content without the trailing space [`wrap`] appends to the last word.
    pub fn text(&self) -> &str {
        self.content.strip_suffix(' ').unwrap_or(&self.content)
    }

    /// Measured box relative to the draw origin.
    pub fn bounds(&self) -> TextBounds {
        self.bounds
    }

    /// Horizontal extent in pixels.
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    /// Vertical extent in pixels.
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Blit the glyphs onto `surface` with their origin at `position`.
    pub fn draw(
        &self,
        font: &mut FontHandle,
        surface: &mut Overlay,
        position: (i32, i32),
        fill: Rgba8,
    ) {
        surface.draw_text(font, &self.content, position, fill);
    }
}

/// Horizontal extent of `text` rendered in `font`.
pub fn text_width(font: &mut FontHandle, text: &str) -> i32 {
    font.bounds(text).width()
}

/// Vertical extent of `text` rendered in `font`.
pub fn text_height(font: &mut FontHandle, text: &str) -> i32 {
    font.bounds(text).height()
}

/// Greedy word wrap of `text` into lines narrower than `max_width`, top line first.
///
/// Words are split on single spaces and each keeps one trailing space. A word is moved to a new
/// line when its width plus the width of the line in progress reaches `max_width`. A word that
/// is too wide on its own is emitted unsplit on its own line. Empty input yields one blank line.
pub fn wrap(font: &mut FontHandle, text: &str, max_width: i32) -> Vec<MeasuredText> {
    let mut lines = Vec::new();
    let mut current = MeasuredText::new(font, "");

    for word in text.split(' ') {
        let word = MeasuredText::new(font, format!("{word} "));
        if word.width() >= max_width {
            tracing::warn!(
                word = word.text(),
                width = word.width(),
                max_width,
                "word wider than wrap width, leaving it unsplit"
            );
        }

        if !current.content.is_empty() && word.width() + current.width() >= max_width {
            lines.push(current);
            current = word;
        } else {
            let joined = format!("{}{}", current.content, word.content);
            current = MeasuredText::new(font, joined);
        }
    }
    lines.push(current);

    lines
}

/// Offset that centers a `text_width` x `text_height` box inside `box_width` x `box_height`.
///
/// Uses floor division, so any odd leftover pixel ends up on the right/bottom.
pub fn centered_position(
    text_width: i32,
    text_height: i32,
    box_width: i32,
    box_height: i32,
) -> (i32, i32) {
    (
        (box_width - text_width).div_euclid(2),
        (box_height - text_height).div_euclid(2),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/text/measured.rs"]
mod tests;
