//! Shared types for the riverspiral pipeline.

use serde::{Deserialize, Serialize};

use crate::spiral::SpiralGeometry;

/// A 2D point in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (units from the left edge, or from a spiral origin).
    pub x: f64,
    /// Vertical position (units from the top edge, or from a spiral origin).
    pub y: f64,
}

impl Point {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Translate this point by `offset` (origin-relative to absolute).
    #[must_use]
    pub fn offset_by(self, offset: Self) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y)
    }

    /// Express this point relative to `origin` (absolute to origin-relative).
    #[must_use]
    pub fn relative_to(self, origin: Self) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y)
    }
}

/// A sequence of connected points forming a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline(Vec<Point>);

impl Polyline {
    /// Create a new polyline from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the polyline has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the polyline.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Returns `true` if `self` is a leading run of `other`.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.0.starts_with(&self.0)
    }
}

/// One canonical river row after deduplication.
///
/// `length` is kept in kilometres exactly as read from the table; the
/// spiral scale is applied by consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverRecord {
    /// River name. Identity key for deduplication (case-sensitive).
    pub name: String,
    /// Continent the river belongs to. Any value is accepted.
    pub continent: String,
    /// Length in kilometres.
    pub length: f64,
}

impl RiverRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(name: impl Into<String>, continent: impl Into<String>, length: f64) -> Self {
        Self {
            name: name.into(),
            continent: continent.into(),
            length,
        }
    }

    /// Length expressed in spiral units (`length / length_scale`).
    #[must_use]
    pub fn scaled_length(&self, length_scale: f64) -> f64 {
        self.length / length_scale
    }

    /// Number of whole spiral steps this river occupies.
    ///
    /// The fractional part of the scaled length is truncated: a river of
    /// 490 km at scale 100 occupies exactly 4 steps.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn step_count(&self, length_scale: f64) -> u64 {
        let scaled = self.scaled_length(length_scale);
        if scaled.is_finite() && scaled > 0.0 {
            scaled.floor() as u64
        } else {
            0
        }
    }

    /// Hover caption, e.g. `"Nile (6650 km)"`.
    #[must_use]
    pub fn caption(&self) -> String {
        format!("{} ({} km)", self.name, self.length)
    }
}

/// Canvas dimensions in units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in units.
    pub width: u32,
    /// Height in units.
    pub height: u32,
}

/// Configuration for aggregation and spiral layout.
///
/// Every field has a default matching the reference visualization:
/// a 3500x2200 canvas, spirals stepping 0.1 rad and 0.2 units per unit
/// step, one spiral unit per 100 km, continents 500 units apart starting
/// 250 units from the left edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Angle added per unit step, in radians.
    pub angle_increment: f64,

    /// Radius added per unit step.
    pub radius_increment: f64,

    /// Kilometres per spiral unit.
    pub length_scale: f64,

    /// Horizontal position of the first (longest) continent's spiral.
    pub left_margin: f64,

    /// Horizontal distance between consecutive spiral origins.
    pub continent_spacing: f64,

    /// Canvas size. Spiral origins sit on the vertical centre line.
    pub canvas: Dimensions,

    /// Pointer distance (strictly less than) that counts as hovering a
    /// marker.
    pub hover_radius: f64,
}

impl LayoutConfig {
    /// Default angle increment per unit step (radians).
    pub const DEFAULT_ANGLE_INCREMENT: f64 = 0.1;
    /// Default radius increment per unit step.
    pub const DEFAULT_RADIUS_INCREMENT: f64 = 0.2;
    /// Default kilometres per spiral unit.
    pub const DEFAULT_LENGTH_SCALE: f64 = 100.0;
    /// Default left margin of the first spiral origin.
    pub const DEFAULT_LEFT_MARGIN: f64 = 250.0;
    /// Default distance between spiral origins.
    pub const DEFAULT_CONTINENT_SPACING: f64 = 500.0;
    /// Default canvas width.
    pub const DEFAULT_CANVAS_WIDTH: u32 = 3500;
    /// Default canvas height.
    pub const DEFAULT_CANVAS_HEIGHT: u32 = 2200;
    /// Default hover threshold.
    pub const DEFAULT_HOVER_RADIUS: f64 = 2.0;

    /// Spiral geometry described by this configuration.
    #[must_use]
    pub const fn spiral(&self) -> SpiralGeometry {
        SpiralGeometry::new(self.angle_increment, self.radius_increment)
    }

    /// Vertical coordinate shared by all spiral origins.
    #[must_use]
    pub fn center_y(&self) -> f64 {
        f64::from(self.canvas.height) / 2.0
    }

    /// Check the invariants the layout engine relies on.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] when an increment, the
    /// length scale, or a placement distance is not finite, when the
    /// increments or length scale are not positive, or when the hover
    /// radius is negative.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let positive = [
            ("angle_increment", self.angle_increment),
            ("radius_increment", self.radius_increment),
            ("length_scale", self.length_scale),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PipelineError::InvalidConfig(format!(
                    "{field} must be finite and positive, got {value}"
                )));
            }
        }
        for (field, value) in [
            ("left_margin", self.left_margin),
            ("continent_spacing", self.continent_spacing),
        ] {
            if !value.is_finite() {
                return Err(PipelineError::InvalidConfig(format!(
                    "{field} must be finite, got {value}"
                )));
            }
        }
        if !self.hover_radius.is_finite() || self.hover_radius < 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "hover_radius must be finite and non-negative, got {}",
                self.hover_radius
            )));
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            angle_increment: Self::DEFAULT_ANGLE_INCREMENT,
            radius_increment: Self::DEFAULT_RADIUS_INCREMENT,
            length_scale: Self::DEFAULT_LENGTH_SCALE,
            left_margin: Self::DEFAULT_LEFT_MARGIN,
            continent_spacing: Self::DEFAULT_CONTINENT_SPACING,
            canvas: Dimensions {
                width: Self::DEFAULT_CANVAS_WIDTH,
                height: Self::DEFAULT_CANVAS_HEIGHT,
            },
            hover_radius: Self::DEFAULT_HOVER_RADIUS,
        }
    }
}

/// Errors that can occur while loading the river table.
///
/// An empty dataset and unseen continent names are not errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum PipelineError {
    /// A row holds a value that cannot be used (e.g. a non-numeric length).
    /// `row` is the zero-based data row index (the header is not counted).
    #[error("row {row}: malformed {column} value {value:?}: {reason}")]
    MalformedRecord {
        /// Zero-based data row index.
        row: usize,
        /// Column name.
        column: String,
        /// Raw field text.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A required column is missing from the header row.
    #[error("input table has no {0:?} column")]
    MissingColumn(String),

    /// Layout configuration is invalid.
    #[error("invalid layout configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_offset_and_relative_are_inverse() {
        let origin = Point::new(250.0, 1100.0);
        let p = Point::new(-3.5, 2.25);
        assert_eq!(p.offset_by(origin).relative_to(origin), p);
    }

    #[test]
    fn polyline_prefix() {
        let short = Polyline::new(vec![Point::ORIGIN, Point::new(1.0, 0.0)]);
        let long = Polyline::new(vec![
            Point::ORIGIN,
            Point::new(1.0, 0.0),
            Point::new(2.0, 1.0),
        ]);
        assert!(short.is_prefix_of(&long));
        assert!(!long.is_prefix_of(&short));
        assert!(Polyline::new(vec![]).is_prefix_of(&short));
    }

    #[test]
    fn step_count_truncates_fraction() {
        assert_eq!(RiverRecord::new("A", "X", 490.0).step_count(100.0), 4);
        assert_eq!(RiverRecord::new("B", "X", 150.0).step_count(100.0), 1);
        assert_eq!(RiverRecord::new("C", "X", 99.0).step_count(100.0), 0);
        assert_eq!(RiverRecord::new("D", "X", 6650.0).step_count(100.0), 66);
    }

    #[test]
    fn caption_uses_plain_number_formatting() {
        assert_eq!(RiverRecord::new("Nile", "Africa", 6650.0).caption(), "Nile (6650 km)");
        assert_eq!(
            RiverRecord::new("Ob", "Asia", 3650.5).caption(),
            "Ob (3650.5 km)"
        );
    }

    #[test]
    fn layout_config_defaults() {
        let config = LayoutConfig::default();
        assert!((config.angle_increment - 0.1).abs() < f64::EPSILON);
        assert!((config.radius_increment - 0.2).abs() < f64::EPSILON);
        assert!((config.length_scale - 100.0).abs() < f64::EPSILON);
        assert!((config.center_y() - 1100.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn layout_config_rejects_zero_scale() {
        let config = LayoutConfig {
            length_scale: 0.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(ref msg)) if msg.contains("length_scale")
        ));
    }

    #[test]
    fn layout_config_rejects_negative_hover_radius() {
        let config = LayoutConfig {
            hover_radius: -1.0,
            ..LayoutConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn layout_config_partial_json_fills_defaults() {
        let config: LayoutConfig = serde_json::from_str(r#"{"continent_spacing": 420.0}"#).unwrap();
        assert!((config.continent_spacing - 420.0).abs() < f64::EPSILON);
        assert_eq!(config.canvas, LayoutConfig::default().canvas);
    }

    #[test]
    fn error_display() {
        let err = PipelineError::MalformedRecord {
            row: 3,
            column: "length".to_string(),
            value: "long".to_string(),
            reason: "not a number".to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"row 3: malformed length value "long": not a number"#
        );
        assert_eq!(
            PipelineError::MissingColumn("continent".to_string()).to_string(),
            r#"input table has no "continent" column"#
        );
    }
}
