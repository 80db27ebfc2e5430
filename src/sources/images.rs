use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rand::{SeedableRng as _, rngs::StdRng, seq::SliceRandom as _};

use crate::foundation::error::{QuoteCardError, QuoteCardResult};

const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif"];

/// Supplies background photos.
pub trait ImageSource {
    /// Path of the next photo to edit.
    fn next_image(&mut self) -> QuoteCardResult<PathBuf>;
}

/// Photos found in a local directory.
///
/// Files are sorted by name. Without a seed they are handed out round-robin; with one, at
/// random.
#[derive(Clone, Debug)]
pub struct ImageDir {
    files: Vec<PathBuf>,
    next: usize,
    rng: Option<StdRng>,
}

impl ImageDir {
    /// List the raster files directly inside `dir`.
    pub fn scan(dir: &Path) -> QuoteCardResult<Self> {
        let rd = std::fs::read_dir(dir)
            .with_context(|| format!("read image dir '{}'", dir.display()))?;

        let mut files = Vec::new();
        for entry in rd.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };
            let ext = ext.to_ascii_lowercase();
            if RASTER_EXTENSIONS.contains(&ext.as_str()) {
                files.push(path);
            }
        }
        files.sort();

        tracing::debug!(dir = %dir.display(), count = files.len(), "scanned image dir");
        Ok(Self {
            files,
            next: 0,
            rng: None,
        })
    }

    /// Pick at random, reproducibly for a given seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Some(StdRng::seed_from_u64(seed));
        self
    }

    /// Files found by [`ImageDir::scan`].
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

impl ImageSource for ImageDir {
    fn next_image(&mut self) -> QuoteCardResult<PathBuf> {
        if self.files.is_empty() {
            return Err(QuoteCardError::source("image directory has no raster files"));
        }
        let picked = match self.rng.as_mut() {
            Some(rng) => self.files.choose(rng),
            None => {
                let i = self.next % self.files.len();
                self.next = self.next.wrapping_add(1);
                self.files.get(i)
            }
        };
        picked
            .cloned()
            .ok_or_else(|| QuoteCardError::source("image directory has no raster files"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sources/images.rs"]
mod tests;
