use std::path::PathBuf;

/// Convenience result type used across quotecard.
pub type QuoteCardResult<T> = Result<T, QuoteCardError>;

/// Top-level error taxonomy used by the compositing APIs.
///
/// None of these are retried internally. A failing pass performs no partial write.
#[derive(thiserror::Error, Debug)]
pub enum QuoteCardError {
    /// Source image missing, unreadable or not decodable.
    #[error("image load error: '{}': {reason}", .path.display())]
    ImageLoad {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// Font file missing or not a usable font.
    #[error("font load error: '{}': {reason}", .path.display())]
    FontLoad {
        /// Path of the font file.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// Output could not be encoded or written.
    #[error("image save error: '{}': {reason}", .path.display())]
    ImageSave {
        /// Requested output path.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// Image too small for the configured rectangle offsets.
    #[error("degenerate geometry: image {width}x{height} leaves no room for the legibility rectangle")]
    DegenerateGeometry {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// Invalid configuration or argument values.
    #[error("validation error: {0}")]
    Validation(String),

    /// A quote or image collaborator produced nothing usable.
    #[error("source error: {0}")]
    Source(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QuoteCardError {
    /// Build a [`QuoteCardError::ImageLoad`] value.
    pub fn image_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ImageLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`QuoteCardError::FontLoad`] value.
    pub fn font_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FontLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`QuoteCardError::ImageSave`] value.
    pub fn image_save(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ImageSave {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`QuoteCardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`QuoteCardError::Source`] value.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
