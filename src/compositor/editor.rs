use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
};

use rand::{Rng as _, SeedableRng as _, rngs::StdRng};

use crate::{
    assets::{
        decode::{Photo, open_image},
        encode::save_rgba8,
    },
    compositor::config::{AlphaPolicy, CompositorConfig, LayoutMetrics},
    foundation::{
        core::{LegibilityRect, Rgba8},
        error::QuoteCardResult,
    },
    render::{composite::over_in_place, overlay::Overlay},
    text::{
        font::FontHandle,
        measured::{MeasuredText, centered_position, wrap},
    },
};

/// Pass stage: the photo is decoded and the rectangle geometry is known.
#[derive(Debug)]
pub struct Opened;
/// Pass stage: the legibility backdrop is painted.
#[derive(Debug)]
pub struct RectangleDrawn;
/// Pass stage: the quote lines are painted.
#[derive(Debug)]
pub struct QuoteDrawn;
/// Pass stage: the author lines are painted; only saving remains.
#[derive(Debug)]
pub struct AuthorDrawn;

/// One compositing pass over a single photo.
///
/// The stage parameter makes `Opened -> RectangleDrawn -> QuoteDrawn -> AuthorDrawn -> saved`
/// the only order in which the drawing steps can be called. The pass owns its pixels; dropping
/// it before [`EditPass::save`] discards all work without touching the disk.
#[derive(Debug)]
pub struct EditPass<S> {
    photo: Photo,
    overlay: Overlay,
    rect: LegibilityRect,
    metrics: LayoutMetrics,
    _stage: PhantomData<S>,
}

/// Where a block of wrapped lines ended up, in image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextBlock {
    /// Number of lines drawn.
    pub line_count: usize,
    /// Height of the last line drawn.
    pub line_height: i32,
    /// Topmost ink row.
    pub top: i32,
    /// Bottommost ink row.
    pub bottom: i32,
}

/// Summary of a finished pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditReport {
    /// Where the composited image was written.
    pub output: PathBuf,
    /// Output width, equal to the input width.
    pub width: u32,
    /// Output height, equal to the input height.
    pub height: u32,
    /// Alpha used for the backdrop.
    pub backdrop_alpha: u8,
    /// Backdrop geometry.
    pub rect: LegibilityRect,
    /// Quote placement.
    pub quote: TextBlock,
    /// Author placement.
    pub author: TextBlock,
}

impl<S> EditPass<S> {
    /// Backdrop geometry for this photo.
    pub fn rect(&self) -> LegibilityRect {
        self.rect
    }

    fn advance<T>(self) -> EditPass<T> {
        EditPass {
            photo: self.photo,
            overlay: self.overlay,
            rect: self.rect,
            metrics: self.metrics,
            _stage: PhantomData,
        }
    }
}

impl EditPass<Opened> {
    /// Decode `path` and derive the rectangle geometry from its size.
    pub fn open(path: &Path, config: &CompositorConfig) -> QuoteCardResult<Self> {
        let photo = open_image(path)?;
        Self::from_photo(photo, config)
    }

    /// Start a pass over an already decoded photo.
    pub fn from_photo(photo: Photo, config: &CompositorConfig) -> QuoteCardResult<Self> {
        let rect =
            LegibilityRect::for_image(photo.width, photo.height, config.x_offset, config.y_offset)?;
        let overlay = Overlay::new(photo.width, photo.height)?;
        let metrics = config.metrics_for(photo.width);
        tracing::debug!(
            stage = "Opened",
            width = photo.width,
            height = photo.height,
            ?rect,
            ?metrics
        );
        Ok(Self {
            photo,
            overlay,
            rect,
            metrics,
            _stage: PhantomData,
        })
    }

    /// Paint the translucent backdrop and its outline.
    pub fn draw_legibility_rectangle(
        mut self,
        fill: Rgba8,
        outline: Rgba8,
        outline_width: i32,
    ) -> EditPass<RectangleDrawn> {
        self.overlay.fill_legibility_rect(self.rect, fill);
        self.overlay.outline_legibility_rect(self.rect, outline_width, outline);
        tracing::debug!(stage = "RectangleDrawn", alpha = fill.a);
        self.advance()
    }
}

impl EditPass<RectangleDrawn> {
    /// Wrap `quote` to the rectangle width and stack the lines around its vertical center.
    ///
    /// The block is biased upwards (the pivot line is a third of the way up from the bottom)
    /// to leave room for the author. Returns where the block landed so the author can be
    /// placed below it.
    pub fn draw_quote(
        mut self,
        font: &mut FontHandle,
        quote: &str,
        fill: Rgba8,
    ) -> QuoteCardResult<(EditPass<QuoteDrawn>, TextBlock)> {
        font.set_size_px(self.metrics.quote_font_px)?;
        let lines = wrap(font, quote, self.rect.width());
        let n = lines.len();
        let mid = (n / 3) as i32;

        let mut placed = Vec::with_capacity(n);
        for (i, line) in lines.iter().enumerate() {
            // index counted from the bottom line
            let j = (n - 1 - i) as i32;
            let (cx, cy) = self.center_of(line);
            let x = cx + self.metrics.h_padding;
            let y = cy - line.height() * (j - mid) - self.metrics.v_padding * j;
            placed.push((x, y));
        }

        let block = self.draw_lines(font, &lines, &placed, fill);
        tracing::debug!(stage = "QuoteDrawn", lines = n, ?block);
        Ok((self.advance(), block))
    }
}

impl EditPass<QuoteDrawn> {
    /// Draw `"- " + author` centered below the quote block described by `quote`.
    pub fn draw_author(
        mut self,
        font: &mut FontHandle,
        author: &str,
        quote: &TextBlock,
        fill: Rgba8,
    ) -> QuoteCardResult<(EditPass<AuthorDrawn>, TextBlock)> {
        font.set_size_px(self.metrics.author_font_px)?;
        let lines = wrap(font, &format!("- {author}"), self.rect.width());
        let n = lines.len();

        let mut placed = Vec::with_capacity(n);
        for (i, line) in lines.iter().enumerate() {
            let j = (n - 1 - i) as i32;
            let (cx, cy) = self.center_of(line);
            let x = cx + self.metrics.h_padding;
            let y = cy + quote.line_height * (n as i32 - j) + self.metrics.author_offset
                - self.metrics.v_padding;
            placed.push((x, y));
        }

        // Never start above the quote block's bottom edge.
        let first_top = placed[0].1 + lines[0].bounds().y0;
        let shift = (quote.bottom + self.metrics.v_padding - first_top).max(0);
        for p in &mut placed {
            p.1 += shift;
        }

        let block = self.draw_lines(font, &lines, &placed, fill);
        tracing::debug!(stage = "AuthorDrawn", lines = n, shift, ?block);
        Ok((self.advance(), block))
    }
}

impl EditPass<AuthorDrawn> {
    /// Composite the overlay onto the photo and write it to `path`.
    pub fn save(self, path: &Path) -> QuoteCardResult<(u32, u32)> {
        let EditPass {
            mut photo, overlay, ..
        } = self;
        let overlay = overlay.finish();
        over_in_place(&mut photo.rgba8_premul, &overlay)?;
        save_rgba8(path, photo.width, photo.height, photo.to_straight_rgba8())?;
        tracing::debug!(stage = "Saved", path = %path.display());
        Ok((photo.width, photo.height))
    }
}

impl<S> EditPass<S> {
    fn center_of(&self, line: &MeasuredText) -> (i32, i32) {
        centered_position(
            line.width(),
            line.height(),
            self.rect.width(),
            self.rect.height(),
        )
    }

    fn draw_lines(
        &mut self,
        font: &mut FontHandle,
        lines: &[MeasuredText],
        placed: &[(i32, i32)],
        fill: Rgba8,
    ) -> TextBlock {
        let mut top = i32::MAX;
        let mut bottom = i32::MIN;
        for (line, &(x, y)) in lines.iter().zip(placed) {
            line.draw(font, &mut self.overlay, (x, y), fill);
            let b = line.bounds();
            top = top.min(y + b.y0);
            bottom = bottom.max(y + b.y1);
        }
        TextBlock {
            line_count: lines.len(),
            line_height: lines.last().map_or(0, MeasuredText::height),
            top,
            bottom,
        }
    }
}

/// Owns the fonts and configuration; runs complete passes.
#[derive(Debug)]
pub struct PhotoCompositor {
    config: CompositorConfig,
    quote_font: FontHandle,
    author_font: FontHandle,
    rng: Option<StdRng>,
}

impl PhotoCompositor {
    /// Validate `config` and load both fonts, failing fast on missing font files.
    pub fn new(config: CompositorConfig) -> QuoteCardResult<Self> {
        config.validate()?;
        let quote_font = FontHandle::load(&config.quote_font, config.quote_font_size)?;
        let author_font = FontHandle::load(&config.author_font, config.author_font_size)?;
        let rng = match config.backdrop_alpha {
            AlphaPolicy::Fixed { .. } => None,
            AlphaPolicy::Random { seed: Some(s), .. } => Some(StdRng::seed_from_u64(s)),
            AlphaPolicy::Random { seed: None, .. } => Some(StdRng::from_entropy()),
        };
        Ok(Self {
            config,
            quote_font,
            author_font,
            rng,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Load the photo at `path`.
    pub fn open(&self, path: &Path) -> QuoteCardResult<EditPass<Opened>> {
        EditPass::open(path, &self.config)
    }

    /// Paint the backdrop using the configured colors and alpha policy.
    pub fn draw_legibility_rectangle(
        &mut self,
        pass: EditPass<Opened>,
    ) -> (EditPass<RectangleDrawn>, u8) {
        let alpha = self.next_backdrop_alpha();
        let [r, g, b] = self.config.backdrop_rgb;
        let pass = pass.draw_legibility_rectangle(
            Rgba8::rgb(r, g, b).with_alpha(alpha),
            self.config.outline_color,
            self.config.outline_width,
        );
        (pass, alpha)
    }

    /// Draw the quote in the quote face.
    pub fn draw_quote(
        &mut self,
        pass: EditPass<RectangleDrawn>,
        quote: &str,
    ) -> QuoteCardResult<(EditPass<QuoteDrawn>, TextBlock)> {
        pass.draw_quote(&mut self.quote_font, quote, self.config.quote_color)
    }

    /// Draw the author in the author face below `quote`.
    pub fn draw_author(
        &mut self,
        pass: EditPass<QuoteDrawn>,
        author: &str,
        quote: &TextBlock,
    ) -> QuoteCardResult<(EditPass<AuthorDrawn>, TextBlock)> {
        pass.draw_author(&mut self.author_font, author, quote, self.config.author_color)
    }

    /// Persist a finished pass.
    pub fn save(&self, pass: EditPass<AuthorDrawn>, path: &Path) -> QuoteCardResult<(u32, u32)> {
        pass.save(path)
    }

    /// Run one full pass: open, backdrop, quote, author, save.
    ///
    /// Any failure aborts the pass before anything is written.
    #[tracing::instrument(
        skip(self, quote, author),
        fields(image = %image_path.display(), output = %output_path.display())
    )]
    pub fn edit(
        &mut self,
        image_path: &Path,
        quote: &str,
        author: &str,
        output_path: &Path,
    ) -> QuoteCardResult<EditReport> {
        let pass = self.open(image_path)?;
        let rect = pass.rect();
        let (pass, backdrop_alpha) = self.draw_legibility_rectangle(pass);
        let (pass, quote_block) = self.draw_quote(pass, quote)?;
        let (pass, author_block) = self.draw_author(pass, author, &quote_block)?;
        let (width, height) = self.save(pass, output_path)?;

        tracing::info!(
            quote_lines = quote_block.line_count,
            author_lines = author_block.line_count,
            "composited image written"
        );
        Ok(EditReport {
            output: output_path.to_path_buf(),
            width,
            height,
            backdrop_alpha,
            rect,
            quote: quote_block,
            author: author_block,
        })
    }

    fn next_backdrop_alpha(&mut self) -> u8 {
        match (self.config.backdrop_alpha, self.rng.as_mut()) {
            (AlphaPolicy::Random { min, max, .. }, Some(rng)) => rng.gen_range(min..=max),
            (AlphaPolicy::Random { max, .. }, None) => max,
            (AlphaPolicy::Fixed { alpha }, _) => alpha,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/editor.rs"]
mod tests;
