//! Responsive dimension model.
//!
//! Saved widths come in two conventions that share one field:
//! - new saves store a percentage of the container width (`"0"`..`"100"`)
//! - legacy saves store a raw pixel count, always `> 100`
//!
//! There is no format flag, so the convention is decided once at load time by
//! the `> 100` heuristic and carried as a tagged [`SavedWidth`] from then on.
//! A 100px legacy image is indistinguishable from `100%`; that ambiguity is
//! inherited from the stored data and is kept as-is.

/// Smallest width a drag can produce, in CSS pixels.
pub const MIN_MEDIA_WIDTH: f64 = 30.0;

/// Saved widths above this value are legacy pixel counts.
pub const LEGACY_PIXEL_THRESHOLD: f64 = 100.0;

/// A saved width with its convention resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SavedWidth {
    /// Percentage of the container width, in `(0, 100]`.
    Percentage(f64),
    /// Absolute CSS pixels from pre-responsive data.
    LegacyPixel(f64),
}

impl SavedWidth {
    /// Parse a stored width string.
    ///
    /// Returns `None` for missing, unparsable, zero, negative or non-finite
    /// values; those leave the media at its natural size.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let number = trimmed
            .strip_suffix("px")
            .or_else(|| trimmed.strip_suffix('%'))
            .unwrap_or(trimmed)
            .trim();

        let value: f64 = number.parse().ok()?;
        if !value.is_finite() || value <= 0.0 {
            return None;
        }

        if value > LEGACY_PIXEL_THRESHOLD {
            Some(SavedWidth::LegacyPixel(value))
        } else {
            Some(SavedWidth::Percentage(value))
        }
    }

    /// Convenience for an optional stored field.
    pub fn from_saved(raw: Option<&str>) -> Option<Self> {
        raw.and_then(Self::parse)
    }

    /// The CSS width to apply for this saved value.
    pub fn css_width(self) -> CssWidth {
        match self {
            SavedWidth::Percentage(p) => CssWidth::Percent(p),
            SavedWidth::LegacyPixel(px) => CssWidth::Pixels(px),
        }
    }

    /// Rendered pixel width this value produces in a container of the given width.
    pub fn resolve_px(self, container_width: f64) -> f64 {
        self.css_width().resolve_px(container_width)
    }
}

/// Width applied to the media element. Height is always left to `auto`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssWidth {
    /// Intrinsic size, no explicit width.
    Natural,
    Pixels(f64),
    Percent(f64),
}

impl CssWidth {
    /// Render as a CSS `width` value.
    pub fn to_css(self) -> String {
        match self {
            CssWidth::Natural => String::new(),
            CssWidth::Pixels(px) => format!("{px}px"),
            CssWidth::Percent(p) => format!("{p}%"),
        }
    }

    /// Pixel width for a container of the given width. `Natural` resolves to 0
    /// since it depends on the asset, not the container.
    pub fn resolve_px(self, container_width: f64) -> f64 {
        match self {
            CssWidth::Natural => 0.0,
            CssWidth::Pixels(px) => px,
            CssWidth::Percent(p) => container_width * p / 100.0,
        }
    }
}

/// Height over width of the loaded asset's intrinsic size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio(f64);

impl AspectRatio {
    /// Compute from intrinsic dimensions. Degenerate sizes have no ratio.
    pub fn from_natural(size: MediaSize) -> Option<Self> {
        if !size.is_laid_out() {
            return None;
        }
        Some(Self(size.height / size.width))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Height that keeps this ratio at the given width.
    pub fn height_for(self, width: f64) -> f64 {
        width * self.0
    }
}

/// A measured width/height pair, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MediaSize {
    pub width: f64,
    pub height: f64,
}

impl MediaSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both sides are finite and strictly positive. Elements that
    /// are detached or not yet laid out report zeros.
    pub fn is_laid_out(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Convert a rendered pixel width into the persisted percentage.
///
/// Returns `None` when either width is not strictly positive, so a transient
/// zero read can never reach the saved data. The result is clamped to
/// `1..=100`: media wider than its container saves as `100`, and very narrow
/// media never rounds down to `0`.
pub fn width_percent(rendered_width: f64, container_width: f64) -> Option<u32> {
    if !rendered_width.is_finite() || !container_width.is_finite() {
        return None;
    }
    if rendered_width <= 0.0 || container_width <= 0.0 {
        return None;
    }

    let percent = (rendered_width / container_width * 100.0).round();
    Some(percent.clamp(1.0, 100.0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percentage() {
        assert_eq!(SavedWidth::parse("40"), Some(SavedWidth::Percentage(40.0)));
        assert_eq!(SavedWidth::parse("100"), Some(SavedWidth::Percentage(100.0)));
        assert_eq!(SavedWidth::parse(" 12.5% "), Some(SavedWidth::Percentage(12.5)));
    }

    #[test]
    fn test_parse_legacy_pixels() {
        assert_eq!(SavedWidth::parse("640"), Some(SavedWidth::LegacyPixel(640.0)));
        assert_eq!(SavedWidth::parse("101px"), Some(SavedWidth::LegacyPixel(101.0)));
    }

    #[test]
    fn test_parse_rejects_degenerate() {
        assert_eq!(SavedWidth::parse("0"), None);
        assert_eq!(SavedWidth::parse("-5"), None);
        assert_eq!(SavedWidth::parse(""), None);
        assert_eq!(SavedWidth::parse("wide"), None);
        assert_eq!(SavedWidth::parse("NaN"), None);
        assert_eq!(SavedWidth::parse("inf"), None);
        assert_eq!(SavedWidth::from_saved(None), None);
    }

    #[test]
    fn test_css_rendering() {
        assert_eq!(SavedWidth::Percentage(40.0).css_width().to_css(), "40%");
        assert_eq!(SavedWidth::LegacyPixel(640.0).css_width().to_css(), "640px");
        assert_eq!(CssWidth::Natural.to_css(), "");
    }

    #[test]
    fn test_width_percent_rounds() {
        assert_eq!(width_percent(240.0, 800.0), Some(30));
        assert_eq!(width_percent(333.0, 1000.0), Some(33));
        assert_eq!(width_percent(336.0, 1000.0), Some(34));
    }

    #[test]
    fn test_width_percent_rejects_zero() {
        assert_eq!(width_percent(0.0, 800.0), None);
        assert_eq!(width_percent(240.0, 0.0), None);
        assert_eq!(width_percent(-1.0, 800.0), None);
        assert_eq!(width_percent(f64::NAN, 800.0), None);
    }

    #[test]
    fn test_width_percent_clamps() {
        assert_eq!(width_percent(1200.0, 800.0), Some(100));
        assert_eq!(width_percent(1.0, 10_000.0), Some(1));
    }

    #[test]
    fn test_percentage_round_trip_within_tolerance() {
        let container = 737.0;
        for px in [30.0, 99.0, 250.5, 512.0, 700.0, 737.0] {
            let percent = width_percent(px, container).unwrap();
            let restored = SavedWidth::parse(&percent.to_string())
                .unwrap()
                .resolve_px(container);
            // One percentage point is the rounding step.
            assert!(
                (restored - px).abs() <= container / 200.0 + f64::EPSILON,
                "px={px} percent={percent} restored={restored}"
            );
        }
    }

    #[test]
    fn test_aspect_ratio() {
        let ratio = AspectRatio::from_natural(MediaSize::new(200.0, 100.0)).unwrap();
        assert_eq!(ratio.value(), 0.5);
        assert_eq!(ratio.height_for(240.0), 120.0);
        assert_eq!(AspectRatio::from_natural(MediaSize::new(0.0, 100.0)), None);
    }
}
