use crate::{
    foundation::{
        core::{LegibilityRect, Rgba8},
        error::{QuoteCardError, QuoteCardResult},
    },
    text::font::FontHandle,
};

/// Transparent drawing surface the size of the photo.
///
/// Everything drawn during a pass lands here first; [`Overlay::finish`] rasterizes it into a
/// premultiplied RGBA8 buffer that is then composited over the photo.
pub struct Overlay {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overlay")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Overlay {
    /// Create an empty overlay.
    ///
    /// The rasterizer addresses pixels with `u16`, so neither side may exceed 65535.
    pub fn new(width: u32, height: u32) -> QuoteCardResult<Self> {
        let too_large = || {
            QuoteCardError::validation(format!(
                "image {width}x{height} exceeds the rasterizer limit of 65535 px per side"
            ))
        };
        let w: u16 = width.try_into().map_err(|_| too_large())?;
        let h: u16 = height.try_into().map_err(|_| too_large())?;
        Ok(Self {
            width: w,
            height: h,
            ctx: vello_cpu::RenderContext::new(w, h),
        })
    }

    /// Fill the half-open pixel span `[x0, x1) x [y0, y1)`.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba8) {
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            f64::from(x0),
            f64::from(y0),
            f64::from(x1),
            f64::from(y1),
        ));
    }

    /// Fill `rect` including its far edges.
    pub fn fill_legibility_rect(&mut self, rect: LegibilityRect, color: Rgba8) {
        self.fill_rect(rect.x0, rect.y0, rect.x1 + 1, rect.y1 + 1, color);
    }

    /// Stroke the border pixels of `rect` with a `line_width` wide line drawn inwards.
    pub fn outline_legibility_rect(&mut self, rect: LegibilityRect, line_width: i32, color: Rgba8) {
        if line_width <= 0 {
            return;
        }
        let (x0, y0, x1, y1) = (rect.x0, rect.y0, rect.x1 + 1, rect.y1 + 1);
        let lw = line_width.min((x1 - x0) / 2).min((y1 - y0) / 2).max(1);

        self.fill_rect(x0, y0, x1, y0 + lw, color);
        self.fill_rect(x0, y1 - lw, x1, y1, color);
        self.fill_rect(x0, y0 + lw, x0 + lw, y1 - lw, color);
        self.fill_rect(x1 - lw, y0 + lw, x1, y1 - lw, color);
    }

    /// Shape `text` with `font` and fill its glyphs, with the layout origin at `origin`.
    pub fn draw_text(
        &mut self,
        font: &mut FontHandle,
        text: &str,
        origin: (i32, i32),
        color: Rgba8,
    ) {
        if text.is_empty() {
            return;
        }
        let glyphs = font.shape(text);

        self.ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(origin.0),
            f64::from(origin.1),
        )));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx
            .glyph_run(font.font_data())
            .font_size(font.size_px())
            .fill_glyphs(glyphs.into_iter().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            }));
    }

    /// Rasterize everything drawn so far into premultiplied RGBA8.
    pub fn finish(mut self) -> Vec<u8> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        pixmap.data_as_u8_slice().to_vec()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
