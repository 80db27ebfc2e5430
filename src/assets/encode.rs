use std::{
    io::{BufWriter, Write as _},
    path::Path,
};

use crate::foundation::error::{QuoteCardError, QuoteCardResult};

/// Encode straight RGBA8 pixels and write them to `path`.
///
/// The format follows the extension of `path`. Pixels are encoded into a temporary file next to
/// the destination which is renamed over `path` only once encoding succeeded, so a failed save
/// never leaves a file at the requested location. JPEG output drops the alpha channel.
pub fn save_rgba8(path: &Path, width: u32, height: u32, rgba8: Vec<u8>) -> QuoteCardResult<()> {
    let format =
        image::ImageFormat::from_path(path).map_err(|e| QuoteCardError::image_save(path, e))?;

    let img = image::RgbaImage::from_raw(width, height, rgba8).ok_or_else(|| {
        QuoteCardError::image_save(path, "pixel buffer does not match dimensions")
    })?;
    let img = match format {
        image::ImageFormat::Jpeg => image::DynamicImage::ImageRgb8(
            image::DynamicImage::ImageRgba8(img).to_rgb8(),
        ),
        _ => image::DynamicImage::ImageRgba8(img),
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".quotecard-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|e| QuoteCardError::image_save(path, e))?;

    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        img.write_to(&mut w, format)
            .map_err(|e| QuoteCardError::image_save(path, e))?;
        w.flush().map_err(|e| QuoteCardError::image_save(path, e))?;
    }

    tmp.persist(path)
        .map_err(|e| QuoteCardError::image_save(path, e.error))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/encode.rs"]
mod tests;
