use super::*;

#[test]
fn defaults_match_the_canonical_layout() {
    let c = CompositorConfig::default();
    assert_eq!((c.x_offset, c.y_offset), (50, 100));
    assert_eq!((c.h_padding, c.v_padding, c.author_offset), (50, 50, 200));
    assert_eq!(c.backdrop_alpha, AlphaPolicy::Fixed { alpha: 200 });
    assert_eq!(c.author_color, Rgba8::rgba(117, 128, 129, 150));
    assert!(c.author_font_size <= c.quote_font_size);
    c.validate().unwrap();
}

#[test]
fn default_fonts_resolve_from_any_working_directory() {
    let c = CompositorConfig::default();
    for path in [&c.quote_font, &c.author_font] {
        assert!(path.is_absolute(), "{} is relative", path.display());
        assert!(path.is_file(), "{} is missing", path.display());
    }
}

#[test]
fn absolute_scaling_keeps_configured_pixels() {
    let c = CompositorConfig {
        scaling: Scaling::Absolute,
        ..CompositorConfig::default()
    };
    let m = c.metrics_for(1200);
    assert_eq!(m.quote_font_px, 250.0);
    assert_eq!(m.author_font_px, 200.0);
    assert_eq!((m.h_padding, m.v_padding, m.author_offset), (50, 50, 200));
}

#[test]
fn proportional_scaling_follows_image_width() {
    let c = CompositorConfig {
        scaling: Scaling::Proportional {
            reference_width: 1000,
        },
        ..CompositorConfig::default()
    };
    let m = c.metrics_for(500);
    assert_eq!(m.quote_font_px, 125.0);
    assert_eq!(m.author_font_px, 100.0);
    assert_eq!(m.v_padding, 25);
    assert_eq!(m.author_offset, 100);
    assert_eq!(m.h_padding, 50);

    let tiny = c.metrics_for(10);
    assert_eq!(tiny.quote_font_px, MIN_SCALED_FONT_PX);
}

#[test]
fn validate_rejects_bad_values() {
    let bad_size = CompositorConfig {
        quote_font_size: 0.0,
        ..CompositorConfig::default()
    };
    assert!(bad_size.validate().is_err());

    let bad_alpha = CompositorConfig {
        backdrop_alpha: AlphaPolicy::Random {
            min: 200,
            max: 100,
            seed: None,
        },
        ..CompositorConfig::default()
    };
    assert!(bad_alpha.validate().is_err());

    let bad_scale = CompositorConfig {
        scaling: Scaling::Proportional { reference_width: 0 },
        ..CompositorConfig::default()
    };
    assert!(bad_scale.validate().is_err());
}

#[test]
fn partial_json_fills_in_defaults() {
    let json = r#"{
        "quote_font_size": 120,
        "backdrop_alpha": { "mode": "random", "min": 100, "max": 230, "seed": 7 },
        "scaling": { "mode": "absolute" },
        "author_color": [1, 2, 3, 4]
    }"#;
    let c: CompositorConfig = serde_json::from_str(json).unwrap();
    assert_eq!(c.quote_font_size, 120.0);
    assert_eq!(c.author_font_size, 200.0);
    assert_eq!(c.backdrop_alpha, AlphaPolicy::random(Some(7)));
    assert_eq!(c.scaling, Scaling::Absolute);
    assert_eq!(c.author_color, Rgba8::rgba(1, 2, 3, 4));
    assert_eq!(c.x_offset, 50);
}

#[test]
fn missing_config_file_is_an_error() {
    assert!(CompositorConfig::from_json_file(Path::new("no/such/config.json")).is_err());
}
