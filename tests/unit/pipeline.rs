use super::*;
use crate::{
    compositor::config::CompositorConfig,
    sources::{images::ImageDir, quotes::FixedQuote},
};

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "quotecard_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn compositor() -> PhotoCompositor {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    PhotoCompositor::new(CompositorConfig {
        quote_font: root.join("assets/fonts/DejaVuSerif.ttf"),
        author_font: root.join("assets/fonts/DejaVuSerif-Italic.ttf"),
        ..CompositorConfig::default()
    })
    .unwrap()
}

struct NoQuotes;
impl QuoteSource for NoQuotes {
    fn quote(&mut self, _category: &str) -> QuoteCardResult<crate::Quote> {
        Err(QuoteCardError::source("quote service unavailable"))
    }
}

struct PanickingImages;
impl ImageSource for PanickingImages {
    fn next_image(&mut self) -> QuoteCardResult<PathBuf> {
        panic!("image source must not be consulted when the quote source fails");
    }
}

#[test]
fn unique_paths_do_not_collide() {
    let tmp = temp_dir("pipeline_unique");
    std::fs::create_dir_all(&tmp).unwrap();

    let a = unique_output_path(&tmp, "png").unwrap();
    let b = unique_output_path(&tmp, "png").unwrap();
    assert_ne!(a, b);
    assert_eq!(a.extension().unwrap(), "png");
    assert!(a.starts_with(&tmp));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn quote_failure_aborts_before_touching_images() {
    let tmp = temp_dir("pipeline_quote_failure");
    std::fs::create_dir_all(&tmp).unwrap();

    let err = generate(
        &mut compositor(),
        &mut NoQuotes,
        &mut PanickingImages,
        "anger",
        &tmp,
    )
    .unwrap_err();
    assert!(matches!(err, QuoteCardError::Source(_)));
    assert_eq!(std::fs::read_dir(&tmp).unwrap().count(), 0);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn generate_writes_a_fresh_file_per_call() {
    let tmp = temp_dir("pipeline_generate");
    let photos = tmp.join("photos");
    let out = tmp.join("out");
    std::fs::create_dir_all(&photos).unwrap();
    std::fs::create_dir_all(&out).unwrap();
    image::RgbImage::from_pixel(320, 240, image::Rgb([90, 120, 150]))
        .save(photos.join("sky.png"))
        .unwrap();

    let mut comp = compositor();
    let mut quotes = FixedQuote::new("Keep going", "Anonymous");
    let mut images = ImageDir::scan(&photos).unwrap();

    let a = generate(&mut comp, &mut quotes, &mut images, "any", &out).unwrap();
    let b = generate(&mut comp, &mut quotes, &mut images, "any", &out).unwrap();
    assert_ne!(a.output, b.output);
    for report in [&a, &b] {
        let img = image::open(&report.output).unwrap();
        assert_eq!((img.width(), img.height()), (320, 240));
    }

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn failed_edit_removes_the_reserved_file() {
    let tmp = temp_dir("pipeline_failed_edit");
    let photos = tmp.join("photos");
    let out = tmp.join("out");
    std::fs::create_dir_all(&photos).unwrap();
    std::fs::create_dir_all(&out).unwrap();
    image::RgbImage::from_pixel(80, 80, image::Rgb([0, 0, 0]))
        .save(photos.join("tiny.png"))
        .unwrap();

    let err = generate(
        &mut compositor(),
        &mut FixedQuote::new("Too small", "Nobody"),
        &mut ImageDir::scan(&photos).unwrap(),
        "any",
        &out,
    )
    .unwrap_err();
    assert!(matches!(err, QuoteCardError::DegenerateGeometry { .. }));
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn discarding_reports_whether_the_reserved_file_is_gone() {
    let tmp = temp_dir("pipeline_discard");
    std::fs::create_dir_all(&tmp).unwrap();

    let reserved = unique_output_path(&tmp, "png").unwrap();
    assert!(discard_reserved(&reserved));
    assert!(!reserved.exists());
    // already gone: logged, not a panic
    assert!(!discard_reserved(&reserved));

    std::fs::remove_dir_all(&tmp).ok();
}
