use std::path::Path;

use crate::foundation::error::{QuoteCardError, QuoteCardResult};

/// Raster photo held as premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct Photo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Vec<u8>,
}

impl Photo {
    /// Copy of the pixels with alpha un-premultiplied.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.rgba8_premul.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }
}

/// Open and decode an image file from disk.
///
/// Any format supported by `image` is accepted; the format is guessed from content.
pub fn open_image(path: &Path) -> QuoteCardResult<Photo> {
    let reader = image::ImageReader::open(path)
        .map_err(|e| QuoteCardError::image_load(path, e))?
        .with_guessed_format()
        .map_err(|e| QuoteCardError::image_load(path, e))?;
    let dyn_img = reader
        .decode()
        .map_err(|e| QuoteCardError::image_load(path, e))?;
    Ok(photo_from_dynamic(dyn_img))
}

/// Decode encoded image bytes.
pub fn decode_image(bytes: &[u8]) -> QuoteCardResult<Photo> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| QuoteCardError::image_load("<memory>", e))?;
    Ok(photo_from_dynamic(dyn_img))
}

fn photo_from_dynamic(dyn_img: image::DynamicImage) -> Photo {
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Photo {
        width,
        height,
        rgba8_premul,
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
