use crate::foundation::error::{QuoteCardError, QuoteCardResult};

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Premultiplied `[r, g, b, a]` bytes.
    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(c: Rgba8) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

/// Semi-transparent backdrop region behind the text, in image pixel coordinates.
///
/// `x0`/`y0` are inclusive, `x1`/`y1` are the far edges (`width = x1 - x0`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegibilityRect {
    /// Left edge.
    pub x0: i32,
    /// Top edge.
    pub y0: i32,
    /// Right edge.
    pub x1: i32,
    /// Bottom edge.
    pub y1: i32,
}

impl LegibilityRect {
    /// Inset the image bounds by `x_offset` horizontally and `y_offset` vertically.
    ///
    /// Fails with [`QuoteCardError::DegenerateGeometry`] when the result would have a
    /// non-positive width or height.
    pub fn for_image(
        width: u32,
        height: u32,
        x_offset: u32,
        y_offset: u32,
    ) -> QuoteCardResult<Self> {
        let degenerate = || QuoteCardError::DegenerateGeometry { width, height };

        let w = i64::from(width);
        let h = i64::from(height);
        let xo = i64::from(x_offset);
        let yo = i64::from(y_offset);
        if w <= 2 * xo || h <= 2 * yo {
            return Err(degenerate());
        }

        let to_i32 = |v: i64| i32::try_from(v).map_err(|_| degenerate());
        Ok(Self {
            x0: to_i32(xo)?,
            y0: to_i32(yo)?,
            x1: to_i32(w - xo)?,
            y1: to_i32(h - yo)?,
        })
    }

    /// `x1 - x0`.
    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    /// `y1 - y0`.
    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
