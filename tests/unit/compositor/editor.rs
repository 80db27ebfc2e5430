use super::*;
use crate::compositor::config::Scaling;

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

fn test_config() -> CompositorConfig {
    CompositorConfig {
        quote_font: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts/DejaVuSerif.ttf"),
        author_font: PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("assets/fonts/DejaVuSerif-Italic.ttf"),
        ..CompositorConfig::default()
    }
}

fn solid_photo(width: u32, height: u32, rgb: [u8; 3]) -> Photo {
    let mut rgba8_premul = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        rgba8_premul.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
    }
    Photo {
        width,
        height,
        rgba8_premul,
    }
}

#[test]
fn quote_block_is_centered_and_author_sits_below() {
    let mut compositor = PhotoCompositor::new(test_config()).unwrap();
    let pass = EditPass::from_photo(solid_photo(1200, 800, [40, 60, 80]), compositor.config())
        .unwrap();
    let rect = pass.rect();
    let (pass, _) = compositor.draw_legibility_rectangle(pass);
    let (pass, quote) = compositor.draw_quote(pass, "Hello world").unwrap();
    let (_, author) = compositor.draw_author(pass, "Jane Doe", &quote).unwrap();

    assert_eq!(quote.line_count, 1);
    assert_eq!(author.line_count, 1);
    assert!(quote.top < quote.bottom);
    assert!(author.top >= quote.bottom);
    assert!(quote.line_height > 0);
    assert!(quote.top >= 0 && quote.bottom <= rect.y1);
}

#[test]
fn multi_line_quote_reads_top_to_bottom() {
    let config = CompositorConfig {
        scaling: Scaling::Absolute,
        quote_font_size: 40.0,
        author_font_size: 30.0,
        ..test_config()
    };
    let mut quote_font = FontHandle::load(&config.quote_font, 40.0).unwrap();

    let pass = EditPass::from_photo(solid_photo(600, 900, [0, 0, 0]), &config).unwrap();
    let pass = pass.draw_legibility_rectangle(
        Rgba8::rgba(255, 255, 255, 200),
        Rgba8::rgb(255, 255, 255),
        1,
    );
    let text = "one two three four five six seven eight nine ten eleven twelve thirteen";
    let (_, block) = pass
        .draw_quote(&mut quote_font, text, Rgba8::rgb(0, 0, 0))
        .unwrap();

    let lines = wrap(&mut quote_font, text, 500);
    assert_eq!(block.line_count, lines.len());
    assert!(block.line_count >= 3);
    assert!(block.bottom - block.top > lines[0].height() * 2);
}

#[test]
fn fixed_alpha_is_used_verbatim() {
    let mut compositor = PhotoCompositor::new(test_config()).unwrap();
    assert_eq!(compositor.next_backdrop_alpha(), 200);
    assert_eq!(compositor.next_backdrop_alpha(), 200);
}

#[test]
fn seeded_random_alpha_is_reproducible_and_in_range() {
    let config = CompositorConfig {
        backdrop_alpha: AlphaPolicy::random(Some(42)),
        ..test_config()
    };
    let mut a = PhotoCompositor::new(config.clone()).unwrap();
    let mut b = PhotoCompositor::new(config).unwrap();

    for _ in 0..32 {
        let x = a.next_backdrop_alpha();
        assert_eq!(x, b.next_backdrop_alpha());
        assert!((100..=230).contains(&x));
    }
}

#[test]
fn missing_font_fails_at_construction() {
    let config = CompositorConfig {
        author_font: PathBuf::from("no/such/italic.ttf"),
        ..test_config()
    };
    let err = PhotoCompositor::new(config).unwrap_err();
    assert!(matches!(err, crate::QuoteCardError::FontLoad { .. }));
}

#[test]
fn small_photo_is_degenerate() {
    let err = EditPass::from_photo(solid_photo(100, 400, [0, 0, 0]), &test_config()).unwrap_err();
    assert!(matches!(
        err,
        crate::QuoteCardError::DegenerateGeometry {
            width: 100,
            height: 400
        }
    ));
}

#[test]
fn edit_writes_same_size_image_with_backdrop() {
    let tmp = temp_dir("editor_edit");
    std::fs::create_dir_all(&tmp).unwrap();
    let input = tmp.join("in.png");
    let output = tmp.join("out.png");
    image::RgbImage::from_pixel(400, 300, image::Rgb([20, 30, 40]))
        .save(&input)
        .unwrap();

    let mut compositor = PhotoCompositor::new(test_config()).unwrap();
    let report = compositor
        .edit(&input, "Be here now", "Ram Dass", &output)
        .unwrap();
    assert_eq!((report.width, report.height), (400, 300));
    assert_eq!(report.backdrop_alpha, 200);

    let out = image::open(&output).unwrap().to_rgba8();
    assert_eq!(out.dimensions(), (400, 300));
    // outside the rectangle the photo is untouched
    assert_eq!(out.get_pixel(5, 5).0, [20, 30, 40, 255]);
    // inside, the translucent white backdrop lightens it
    let inside = out.get_pixel(60, 110).0;
    assert!(inside[0] > 150 && inside[1] > 150 && inside[2] > 150);

    std::fs::remove_dir_all(&tmp).ok();
}
