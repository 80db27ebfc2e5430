use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::{
    core::Rgba8,
    error::{QuoteCardError, QuoteCardResult},
};

/// Bundled regular face, resolved independently of the working directory.
pub const DEFAULT_QUOTE_FONT: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/assets/fonts/DejaVuSerif.ttf");

/// Bundled italic face, resolved independently of the working directory.
pub const DEFAULT_AUTHOR_FONT: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/assets/fonts/DejaVuSerif-Italic.ttf");

/// Smallest font size proportional scaling will produce.
pub const MIN_SCALED_FONT_PX: f32 = 8.0;

/// How the backdrop alpha is chosen for each pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AlphaPolicy {
    /// Same alpha every time.
    Fixed {
        /// Backdrop alpha.
        alpha: u8,
    },
    /// Uniformly random alpha in `min..=max`; seeded for reproducible output.
    Random {
        /// Lowest alpha.
        min: u8,
        /// Highest alpha.
        max: u8,
        /// RNG seed, or `None` to seed from the OS.
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl Default for AlphaPolicy {
    fn default() -> Self {
        Self::Fixed { alpha: 200 }
    }
}

impl AlphaPolicy {
    /// The randomized variant over the recommended `100..=230` range.
    pub fn random(seed: Option<u64>) -> Self {
        Self::Random {
            min: 100,
            max: 230,
            seed,
        }
    }
}

/// How pixel constants follow the image size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Scaling {
    /// Use configured values as absolute pixels.
    Absolute,
    /// Multiply font sizes, vertical padding and the author offset by
    /// `image_width / reference_width`.
    Proportional {
        /// Image width the configured values were tuned for.
        reference_width: u32,
    },
}

impl Default for Scaling {
    fn default() -> Self {
        Self::Proportional {
            reference_width: 4845,
        }
    }
}

/// Everything a [`crate::PhotoCompositor`] needs to know, with sensible defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Regular-weight face used for the quote.
    pub quote_font: PathBuf,
    /// Italic face used for the author line.
    pub author_font: PathBuf,
    /// Quote size in pixels before scaling.
    pub quote_font_size: f32,
    /// Author size in pixels before scaling.
    pub author_font_size: f32,
    /// Horizontal inset of the legibility rectangle.
    pub x_offset: u32,
    /// Vertical inset of the legibility rectangle.
    pub y_offset: u32,
    /// Added to every centered line's x.
    pub h_padding: i32,
    /// Gap between stacked lines.
    pub v_padding: i32,
    /// Distance pushing the author block below the quote.
    pub author_offset: i32,
    /// Quote fill.
    pub quote_color: Rgba8,
    /// Author fill.
    pub author_color: Rgba8,
    /// Backdrop outline.
    pub outline_color: Rgba8,
    /// Backdrop outline thickness.
    pub outline_width: i32,
    /// Backdrop color; alpha comes from `backdrop_alpha`.
    pub backdrop_rgb: [u8; 3],
    /// Backdrop alpha policy.
    pub backdrop_alpha: AlphaPolicy,
    /// Resolution handling.
    pub scaling: Scaling,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            quote_font: PathBuf::from(DEFAULT_QUOTE_FONT),
            author_font: PathBuf::from(DEFAULT_AUTHOR_FONT),
            quote_font_size: 250.0,
            author_font_size: 200.0,
            x_offset: 50,
            y_offset: 100,
            h_padding: 50,
            v_padding: 50,
            author_offset: 200,
            quote_color: Rgba8::rgb(0, 0, 0),
            author_color: Rgba8::rgba(117, 128, 129, 150),
            outline_color: Rgba8::rgb(255, 255, 255),
            outline_width: 1,
            backdrop_rgb: [255, 255, 255],
            backdrop_alpha: AlphaPolicy::default(),
            scaling: Scaling::default(),
        }
    }
}

impl CompositorConfig {
    /// Read a JSON config; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> QuoteCardResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot produce a sensible layout.
    pub fn validate(&self) -> QuoteCardResult<()> {
        for (name, size) in [
            ("quote_font_size", self.quote_font_size),
            ("author_font_size", self.author_font_size),
        ] {
            if !size.is_finite() || size <= 0.0 {
                return Err(QuoteCardError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if let AlphaPolicy::Random { min, max, .. } = self.backdrop_alpha
            && min > max
        {
            return Err(QuoteCardError::validation(
                "backdrop_alpha min must be <= max",
            ));
        }
        if let Scaling::Proportional { reference_width: 0 } = self.scaling {
            return Err(QuoteCardError::validation(
                "scaling reference_width must be > 0",
            ));
        }
        if self.outline_width < 0 {
            return Err(QuoteCardError::validation("outline_width must be >= 0"));
        }
        Ok(())
    }

    /// Pixel constants for an image `image_width` pixels wide.
    pub fn metrics_for(&self, image_width: u32) -> LayoutMetrics {
        let factor = match self.scaling {
            Scaling::Absolute => 1.0,
            Scaling::Proportional { reference_width } => {
                f64::from(image_width) / f64::from(reference_width.max(1))
            }
        };
        let scale_px = |v: i32| (f64::from(v) * factor).round() as i32;
        let scale_font = |v: f32| ((f64::from(v) * factor) as f32).max(MIN_SCALED_FONT_PX);

        LayoutMetrics {
            quote_font_px: match self.scaling {
                Scaling::Absolute => self.quote_font_size,
                Scaling::Proportional { .. } => scale_font(self.quote_font_size),
            },
            author_font_px: match self.scaling {
                Scaling::Absolute => self.author_font_size,
                Scaling::Proportional { .. } => scale_font(self.author_font_size),
            },
            h_padding: self.h_padding,
            v_padding: scale_px(self.v_padding),
            author_offset: scale_px(self.author_offset),
        }
    }
}

/// Resolved pixel constants for one compositing pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutMetrics {
    /// Quote font size in pixels.
    pub quote_font_px: f32,
    /// Author font size in pixels.
    pub author_font_px: f32,
    /// Horizontal padding added to centered x positions.
    pub h_padding: i32,
    /// Gap between stacked lines.
    pub v_padding: i32,
    /// Offset pushing the author block below the quote.
    pub author_offset: i32,
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/config.rs"]
mod tests;
