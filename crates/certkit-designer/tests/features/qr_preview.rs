use std::time::Duration;

use certkit_designer::model::{
    ColorStop, CornerDotShape, CornerSquareShape, ErrorCorrection, Gradient, GradientKind,
};
use certkit_designer::qr_preview::PREVIEW_RESOLUTION;
use certkit_designer::{render_qr_preview, QrPreviewCache, QrStyle, RedrawScheduler};

fn rgb(pixmap: &tiny_skia::Pixmap, x: u32, y: u32) -> (u8, u8, u8) {
    let p = pixmap.pixel(x, y).unwrap().demultiply();
    (p.red(), p.green(), p.blue())
}

/// Version 1 code (21 modules) plus a 2-module quiet zone each side: 10px cells.
fn square_corner_style() -> QrStyle {
    let mut style = QrStyle::branded("#000000", "#FFFFFF");
    style.error_correction_level = ErrorCorrection::L;
    style.corners_square_options.shape = CornerSquareShape::Square;
    style.corners_square_options.color = "#FF0000".to_string();
    style.corners_dot_options.shape = CornerDotShape::Square;
    style.corners_dot_options.color = "#0000FF".to_string();
    style
}

#[test]
fn test_finder_patterns_use_corner_colours() {
    let pixmap = render_qr_preview("data", &square_corner_style(), 250).unwrap();
    // Quiet zone
    assert_eq!(rgb(&pixmap, 5, 5), (255, 255, 255));
    // Outer frame of the top-left finder
    assert_eq!(rgb(&pixmap, 25, 25), (255, 0, 0));
    // Light ring inside the frame
    assert_eq!(rgb(&pixmap, 35, 55), (255, 255, 255));
    // Finder centre
    assert_eq!(rgb(&pixmap, 55, 55), (0, 0, 255));
}

#[test]
fn test_linear_gradient_dots_render() {
    let mut style = square_corner_style();
    style.dots_options.gradient = Some(Gradient {
        kind: GradientKind::Linear,
        rotation: std::f64::consts::FRAC_PI_4,
        color_stops: vec![
            ColorStop {
                offset: 0.0,
                color: "#1E3A8A".to_string(),
            },
            ColorStop {
                offset: 1.0,
                color: "#9333EA".to_string(),
            },
        ],
    });
    let pixmap = render_qr_preview("https://verify.example.com/c/123", &style, 256).unwrap();
    assert_eq!(pixmap.width(), 256);
    assert_eq!(pixmap.height(), 256);
}

#[test]
fn test_unparseable_colours_fall_back() {
    let mut style = QrStyle::default();
    style.dots_options.color = "not-a-colour".to_string();
    assert!(render_qr_preview("data", &style, 64).is_ok());
}

#[tokio::test]
async fn test_cache_generates_in_background_and_requests_redraw() {
    let scheduler = RedrawScheduler::default();
    let cache = QrPreviewCache::new("https://verify.example.com", scheduler.handle());
    let id = uuid::Uuid::new_v4();

    assert!(cache.request(id, &QrStyle::default()));
    assert!(cache.contains(id));

    let mut ready = None;
    for _ in 0..200 {
        if let Some(pixmap) = cache.get(id) {
            ready = Some(pixmap);
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let pixmap = ready.expect("preview was never generated");
    assert_eq!(pixmap.width(), PREVIEW_RESOLUTION);
    assert!(!cache.is_pending(id));
    assert!(scheduler.take_frame());
}

#[tokio::test]
async fn test_invalidate_then_remove() {
    let scheduler = RedrawScheduler::default();
    let cache = QrPreviewCache::new("x", scheduler.handle());
    let a = uuid::Uuid::new_v4();
    let b = uuid::Uuid::new_v4();
    cache.request(a, &QrStyle::default());
    cache.request(b, &QrStyle::default());
    assert_eq!(cache.len(), 2);

    cache.invalidate(a);
    assert!(!cache.contains(a));
    cache.remove(b);
    assert!(!cache.contains(b));

    // Anything still in flight lands on a stale generation.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(cache.is_empty());
}
