use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    sync::Arc,
};

use parley::fontique::{Blob, Collection, CollectionOptions, SourceCache};

use crate::foundation::error::{QuoteCardError, QuoteCardResult};

/// Pixel-snapped box around rendered text, relative to the draw origin.
///
/// The origin is the top-left corner of the first line box; `y` grows downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBounds {
    /// Left edge.
    pub x0: i32,
    /// Top edge.
    pub y0: i32,
    /// Right edge.
    pub x1: i32,
    /// Bottom edge.
    pub y1: i32,
}

impl TextBounds {
    /// `|x0 - x1|`.
    pub fn width(&self) -> i32 {
        (self.x0 - self.x1).abs()
    }

    /// `|y0 - y1|`.
    pub fn height(&self) -> i32 {
        (self.y0 - self.y1).abs()
    }
}

/// A glyph placed on the baseline of a single shaped line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ShapedGlyph {
    pub(crate) id: u32,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) advance: f32,
}

/// A typeface loaded from a font file, at a point size.
///
/// Shaping goes through a private Parley font collection holding only this face, so a system
/// font with the same family name can never be picked instead.
pub struct FontHandle {
    path: PathBuf,
    font_data: vello_cpu::peniko::FontData,
    bytes: Arc<Vec<u8>>,
    family: String,
    units_per_em: u16,
    size_px: f32,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<[u8; 4]>,
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontHandle")
            .field("path", &self.path)
            .field("family", &self.family)
            .field("size_px", &self.size_px)
            .field("font_bytes_len", &self.bytes.len())
            .finish()
    }
}

impl FontHandle {
    /// Read a TrueType/OpenType font from `path`.
    #[tracing::instrument(skip_all, fields(path = %path.display(), size_px))]
    pub fn load(path: &Path, size_px: f32) -> QuoteCardResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| QuoteCardError::font_load(path, e))?;
        let font = Self::from_bytes(path, bytes, size_px)?;
        tracing::debug!(family = %font.family, "font loaded");
        Ok(font)
    }

    /// Build a handle from font bytes; `path` is only used for diagnostics.
    pub fn from_bytes(
        path: impl Into<PathBuf>,
        bytes: Vec<u8>,
        size_px: f32,
    ) -> QuoteCardResult<Self> {
        let path = path.into();
        validate_size_px(size_px)?;

        let units_per_em = ttf_parser::Face::parse(&bytes, 0)
            .map_err(|e| QuoteCardError::font_load(&path, e))?
            .units_per_em();

        let mut font_ctx = parley::FontContext {
            collection: Collection::new(CollectionOptions {
                shared: false,
                system_fonts: false,
            }),
            source_cache: SourceCache::default(),
        };
        let families = font_ctx
            .collection
            .register_fonts(Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| QuoteCardError::font_load(&path, "no font families in file"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| QuoteCardError::font_load(&path, "font family has no name"))?
            .to_string();

        let font_data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.clone()), 0);

        Ok(Self {
            path,
            font_data,
            bytes: Arc::new(bytes),
            family,
            units_per_em,
            size_px,
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
        })
    }

    /// File this font was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Family name read from the font's name table.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Current size in pixels.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Change the size used by subsequent measurements and draws.
    pub fn set_size_px(&mut self, size_px: f32) -> QuoteCardResult<()> {
        validate_size_px(size_px)?;
        self.size_px = size_px;
        Ok(())
    }

    /// Bounding box of `text` as it would be drawn.
    ///
    /// Horizontally this is the union of the glyph ink boxes and the pen-advance span, so
    /// trailing whitespace counts towards the width. Vertically it is the union of the ink
    /// boxes only. Empty text measures as an empty box at the origin.
    pub fn bounds(&mut self, text: &str) -> TextBounds {
        if text.is_empty() {
            return TextBounds::default();
        }

        let glyphs = self.shape(text);
        let face = ttf_parser::Face::parse(&self.bytes, 0).ok();
        let scale = self.size_px / f32::from(self.units_per_em.max(1));

        let (mut x0, mut x1) = (0.0f32, 0.0f32);
        let (mut y0, mut y1) = (f32::INFINITY, f32::NEG_INFINITY);
        for g in &glyphs {
            x1 = x1.max(g.x + g.advance);

            let ink = face.as_ref().and_then(|face| {
                let id = u16::try_from(g.id).ok()?;
                face.glyph_bounding_box(ttf_parser::GlyphId(id))
            });
            if let Some(bb) = ink {
                x0 = x0.min(g.x + f32::from(bb.x_min) * scale);
                x1 = x1.max(g.x + f32::from(bb.x_max) * scale);
                y0 = y0.min(g.y - f32::from(bb.y_max) * scale);
                y1 = y1.max(g.y - f32::from(bb.y_min) * scale);
            }
        }
        if !y0.is_finite() {
            // whitespace only
            y0 = 0.0;
            y1 = 0.0;
        }

        TextBounds {
            x0: x0.floor() as i32,
            y0: y0.floor() as i32,
            x1: x1.ceil() as i32,
            y1: y1.ceil() as i32,
        }
    }

    pub(crate) fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.font_data
    }

    pub(crate) fn shape(&mut self, text: &str) -> Vec<ShapedGlyph> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Single(parley::style::FontFamily::Named(Cow::Owned(
                self.family.clone(),
            ))),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));

        let mut layout: parley::Layout<[u8; 4]> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| ShapedGlyph {
                    id: u32::from(g.id),
                    x: g.x,
                    y: g.y,
                    advance: g.advance,
                }));
            }
        }
        glyphs
    }
}

fn validate_size_px(size_px: f32) -> QuoteCardResult<()> {
    if !size_px.is_finite() || size_px <= 0.0 {
        return Err(QuoteCardError::validation(
            "font size_px must be finite and > 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
