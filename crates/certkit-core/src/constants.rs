//! Designer-wide constants.
//!
//! Values here are the defaults the settings crate starts from; anything a
//! deployment may want to tune is mirrored in `DesignerConfig`.

/// Default editing surface width in pixels.
pub const DEFAULT_SURFACE_WIDTH: f64 = 800.0;

/// Default editing surface height in pixels.
pub const DEFAULT_SURFACE_HEIGHT: f64 = 600.0;

/// Minimum width of a drawn field, enforced by clamping during the drag.
pub const MIN_FIELD_WIDTH: f64 = 50.0;

/// Minimum height of a drawn field, enforced by clamping during the drag.
pub const MIN_FIELD_HEIGHT: f64 = 20.0;

/// Floor for the side of a QR code field.
pub const MIN_QR_SIZE: f64 = 50.0;

/// Side of a QR code field created from the toolbar.
pub const DEFAULT_QR_SIZE: f64 = 100.0;

/// Size given to fields loaded without stored coordinates.
pub const NOT_DISPLAYED_WIDTH: f64 = 200.0;
/// Size given to fields loaded without stored coordinates.
pub const NOT_DISPLAYED_HEIGHT: f64 = 40.0;

/// Smallest size the font-fit solver will return.
pub const MIN_FONT_SIZE: u32 = 8;

/// Largest size the font-fit solver will return.
pub const MAX_FONT_SIZE: u32 = 72;

/// Padding kept free on each side of a field box when fitting text.
pub const FIT_PADDING: f64 = 4.0;

/// Approximate line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Default font family for new fields.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Default font size for new fields.
pub const DEFAULT_FONT_SIZE: f64 = 20.0;

/// Default font colour for new fields.
pub const DEFAULT_FONT_COLOR: &str = "#000000";

/// Brand accent used as the default QR fill.
pub const BRAND_ACCENT_COLOR: &str = "#1E3A8A";

/// Side length of a resize handle square, in surface pixels.
pub const HANDLE_SIZE: f64 = 8.0;

/// Time allowed for an image decode before the editor degrades to "no image".
pub const IMAGE_DECODE_TIMEOUT_MS: u64 = 10_000;

/// Redraw cadence.
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Pointer travel below which a press/release pair counts as a click.
pub const CLICK_SLOP: f64 = 2.0;
