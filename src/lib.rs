//! quotecard overlays a quote and its author onto a photograph.
//!
//! # Pipeline overview
//!
//! 1. **Open**: decode the photo and derive the legibility rectangle from its size
//! 2. **Backdrop**: paint a translucent white rectangle with a solid outline
//! 3. **Quote**: word-wrap the quote to the rectangle width, center and stack the lines
//! 4. **Author**: wrap and center `"- author"` below the quote block
//! 5. **Save**: composite and write the result atomically
//!
//! [`PhotoCompositor::edit`] runs all five steps. The individual steps are exposed through
//! [`EditPass`], whose type parameter only allows them in that order.
//!
//! Text measurement lives in [`MeasuredText`], [`wrap`] and [`centered_position`]; they only
//! need a [`FontHandle`] and know nothing about images.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod compositor;
mod foundation;
mod pipeline;
mod render;
mod sources;
mod text;

pub use assets::decode::{Photo, decode_image, open_image};
pub use assets::encode::save_rgba8;
pub use compositor::config::{
    AlphaPolicy, CompositorConfig, DEFAULT_AUTHOR_FONT, DEFAULT_QUOTE_FONT, LayoutMetrics,
    MIN_SCALED_FONT_PX, Scaling,
};
pub use compositor::editor::{
    AuthorDrawn, EditPass, EditReport, Opened, PhotoCompositor, QuoteDrawn, RectangleDrawn,
    TextBlock,
};
pub use foundation::core::{LegibilityRect, Rgba8};
pub use foundation::error::{QuoteCardError, QuoteCardResult};
pub use pipeline::{generate, unique_output_path};
pub use render::overlay::Overlay;
pub use sources::images::{ImageDir, ImageSource};
pub use sources::quotes::{FixedQuote, Quote, QuoteFile, QuoteSource};
pub use text::font::{FontHandle, TextBounds};
pub use text::measured::{MeasuredText, centered_position, text_height, text_width, wrap};
