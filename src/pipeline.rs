use std::path::{Path, PathBuf};

use crate::{
    compositor::editor::{EditReport, PhotoCompositor},
    foundation::error::{QuoteCardError, QuoteCardResult},
    sources::{images::ImageSource, quotes::QuoteSource},
};

/// Reserve a fresh file name in `dir` so concurrent requests never share an output path.
///
/// The reserved file exists (empty) when this returns; a successful save replaces it.
pub fn unique_output_path(dir: &Path, extension: &str) -> QuoteCardResult<PathBuf> {
    let (_file, path) = tempfile::Builder::new()
        .prefix("quotecard-")
        .suffix(&format!(".{extension}"))
        .tempfile_in(dir)
        .and_then(|f| f.keep().map_err(|e| e.error))
        .map_err(|e| QuoteCardError::image_save(dir, e))?;
    Ok(path)
}

/// Fetch a quote and a photo, then composite them into a new file in `out_dir`.
///
/// A failing quote source aborts before any image work is done. The output keeps the source
/// photo's extension.
#[tracing::instrument(skip(compositor, quotes, images), fields(out_dir = %out_dir.display()))]
pub fn generate(
    compositor: &mut PhotoCompositor,
    quotes: &mut dyn QuoteSource,
    images: &mut dyn ImageSource,
    category: &str,
    out_dir: &Path,
) -> QuoteCardResult<EditReport> {
    let quote = quotes.quote(category)?;
    let image = images.next_image()?;

    let extension = image
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "png".to_string());
    let output = unique_output_path(out_dir, &extension)?;

    match compositor.edit(&image, &quote.text, &quote.author, &output) {
        Ok(report) => Ok(report),
        Err(err) => {
            discard_reserved(&output);
            Err(err)
        }
    }
}

/// Remove a reserved output name after a failed pass; returns whether it is gone.
fn discard_reserved(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "could not remove reserved output file"
            );
            false
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
