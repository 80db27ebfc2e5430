use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        QuoteCardError::image_load("a.png", "missing")
            .to_string()
            .contains("image load error:")
    );
    assert!(
        QuoteCardError::font_load("a.ttf", "bad")
            .to_string()
            .contains("font load error:")
    );
    assert!(
        QuoteCardError::image_save("out.png", "denied")
            .to_string()
            .contains("image save error:")
    );
    assert!(
        QuoteCardError::DegenerateGeometry {
            width: 10,
            height: 10
        }
        .to_string()
        .contains("degenerate geometry:")
    );
    assert!(
        QuoteCardError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        QuoteCardError::source("x")
            .to_string()
            .contains("source error:")
    );
}

#[test]
fn path_and_reason_are_reported() {
    let err = QuoteCardError::image_load("photos/beach.jpg", "no such file");
    let msg = err.to_string();
    assert!(msg.contains("photos/beach.jpg"));
    assert!(msg.contains("no such file"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = QuoteCardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
