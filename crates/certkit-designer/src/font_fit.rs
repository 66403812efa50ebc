//! Largest font size that fits a field box.
//!
//! A candidate size fits when
//! ```text
//! text_width(size)            <= box.width  - 2 * padding
//! size * LINE_HEIGHT_FACTOR   <= box.height - 2 * padding
//! ```
//! Width is non-decreasing in size, so a binary search over the integer range
//! converges to the largest accepted candidate. Nothing is cached: callers
//! re-run the solver whenever text, face or box changes.

use certkit_core::constants::{FIT_PADDING, LINE_HEIGHT_FACTOR, MAX_FONT_SIZE, MIN_FONT_SIZE};
use certkit_core::Size;
use certkit_settings::TextSettings;

use crate::font_manager::{FontSpec, TextMeasurer};

/// Integer size range searched by the solver, plus box padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRange {
    pub min: u32,
    pub max: u32,
    pub padding: f64,
}

impl Default for FitRange {
    fn default() -> Self {
        Self {
            min: MIN_FONT_SIZE,
            max: MAX_FONT_SIZE,
            padding: FIT_PADDING,
        }
    }
}

impl From<&TextSettings> for FitRange {
    fn from(text: &TextSettings) -> Self {
        Self {
            min: text.min_font_size,
            max: text.max_font_size,
            padding: text.fit_padding,
        }
    }
}

impl FitRange {
    fn fits(&self, measurer: &dyn TextMeasurer, bounds: Size, text: &str, font: &FontSpec) -> bool {
        let avail_w = bounds.width - 2.0 * self.padding;
        let avail_h = bounds.height - 2.0 * self.padding;
        font.size * LINE_HEIGHT_FACTOR <= avail_h && measurer.text_width(font, text) <= avail_w
    }

    /// Largest size in the range that fits, or `min` when none does.
    pub fn max_font_size(
        &self,
        measurer: &dyn TextMeasurer,
        bounds: Size,
        text: &str,
        font: &FontSpec,
    ) -> u32 {
        let mut lo = i64::from(self.min);
        let mut hi = i64::from(self.max);
        let mut best = self.min;

        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            let candidate = font.with_size(mid as f64);
            if self.fits(measurer, bounds, text, &candidate) {
                best = mid as u32;
                lo = mid + 1;
            } else {
                hi = mid - 1;
            }
        }

        best
    }

    /// Caps `requested` to the fitted maximum. Never raises it.
    pub fn cap(
        &self,
        measurer: &dyn TextMeasurer,
        bounds: Size,
        text: &str,
        font: &FontSpec,
        requested: f64,
    ) -> f64 {
        let max = self.max_font_size(measurer, bounds, text, font) as f64;
        let capped = requested.min(max);
        if capped < requested {
            tracing::debug!(
                "Capped font size {} -> {} for {:?} in {}",
                requested,
                capped,
                text,
                bounds
            );
        }
        capped
    }
}

/// Largest size in `[8, 72]` at which `text` fits `bounds`.
pub fn max_font_size(
    measurer: &dyn TextMeasurer,
    bounds: Size,
    text: &str,
    font_family: &str,
    bold: bool,
    italic: bool,
) -> u32 {
    let font = FontSpec::new(font_family, f64::from(MIN_FONT_SIZE), bold, italic);
    FitRange::default().max_font_size(measurer, bounds, text, &font)
}
