//! Static chrome shared by the SVG and raster exporters: colors and the
//! fixed text around the spirals.

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS functional notation, e.g. `rgb(0,76,153)`.
    #[must_use]
    pub fn to_css(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Text and colors drawn around the spirals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneOptions {
    /// Heading in the top-left corner.
    pub title: String,
    /// Line under the title describing the scale.
    pub subtitle: String,
    /// Interaction hint under the subtitle.
    pub hint: String,
    /// Optional credit line in the bottom-left corner.
    pub credit: Option<String>,
    /// Canvas background.
    pub background: Rgb,
    /// Color of spirals, markers, and text.
    pub foreground: Rgb,
    /// Whether the SVG document grows below the canvas to include the
    /// per-continent river lists.
    pub include_listing: bool,
}

impl SceneOptions {
    /// Default canvas background, a deep river blue.
    pub const DEFAULT_BACKGROUND: Rgb = Rgb::new(0, 76, 153);
    /// Default foreground, white.
    pub const DEFAULT_FOREGROUND: Rgb = Rgb::new(255, 255, 255);
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            title: "Endless Currents: River Spirals".to_string(),
            subtitle: "Each spiral is a continent's summed river length at 1 unit per 100 km"
                .to_string(),
            hint: "Move the pointer over the dots on a spiral to learn more...".to_string(),
            credit: None,
            background: Self::DEFAULT_BACKGROUND,
            foreground: Self::DEFAULT_FOREGROUND,
            include_listing: true,
        }
    }
}

// Text placement, in canvas units.
pub(crate) const TITLE_POS: (f64, f64) = (30.0, 20.0);
pub(crate) const SUBTITLE_POS: (f64, f64) = (30.0, 80.0);
pub(crate) const HINT_POS: (f64, f64) = (30.0, 110.0);
pub(crate) const TITLE_SIZE: f64 = 32.0;
pub(crate) const SUBTITLE_SIZE: f64 = 16.0;
pub(crate) const HINT_SIZE: f64 = 12.0;
/// Scroll arrow, measured from the bottom-right corner.
pub(crate) const ARROW_INSET: (f64, f64) = (50.0, 70.0);
/// Credit line, measured up from the bottom edge.
pub(crate) const CREDIT_INSET: f64 = 70.0;
pub(crate) const CREDIT_SIZE: f64 = 16.0;
/// Continent name, measured up from the bottom edge.
pub(crate) const CONTINENT_LABEL_INSET: f64 = 100.0;
pub(crate) const CONTINENT_LABEL_SIZE: f64 = 20.0;
/// Hovered river caption, measured up from the bottom edge.
pub(crate) const HOVER_CAPTION_INSET: f64 = 70.0;
pub(crate) const HOVER_CAPTION_SIZE: f64 = 12.0;
/// Hovered marker's reference number, offset from the marker.
pub(crate) const INDEX_LABEL_OFFSET: (f64, f64) = (7.0, -5.0);
pub(crate) const INDEX_LABEL_SIZE: f64 = 12.0;
/// River list, starting below the bottom edge.
pub(crate) const LISTING_GAP: f64 = 50.0;
pub(crate) const LISTING_LINE_HEIGHT: f64 = 25.0;
pub(crate) const LISTING_SIZE: f64 = 16.0;
pub(crate) const SPIRAL_STROKE_WIDTH: f64 = 2.0;
pub(crate) const MARKER_DIAMETER: f64 = 5.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_color() {
        assert_eq!(SceneOptions::DEFAULT_BACKGROUND.to_css(), "rgb(0,76,153)");
    }

    #[test]
    fn default_scene_has_no_credit() {
        let scene = SceneOptions::default();
        assert!(scene.credit.is_none());
        assert!(scene.include_listing);
    }
}
