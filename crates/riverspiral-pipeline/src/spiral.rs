//! Discretized Archimedean spiral.
//!
//! A cursor starts at the origin with radius and angle zero. Each unit
//! step adds a fixed angle and a fixed radius. Positions are only defined
//! at whole steps, and they are accumulated by repeated addition rather
//! than computed as `k * increment`, so the outline and the markers agree
//! bit for bit at every step.

use serde::{Deserialize, Serialize};

use crate::types::{LayoutConfig, Point};

/// Polar position along the spiral.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpiralCursor {
    /// Distance from the spiral origin.
    pub radius: f64,
    /// Angle in radians.
    pub angle: f64,
}

impl SpiralCursor {
    /// Cursor at the spiral origin.
    pub const ORIGIN: Self = Self {
        radius: 0.0,
        angle: 0.0,
    };

    /// Cartesian position of the cursor, relative to the spiral origin.
    #[must_use]
    pub fn point(self) -> Point {
        SpiralGeometry::point_at(self.radius, self.angle)
    }
}

/// Per-step increments of the spiral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpiralGeometry {
    /// Angle added per unit step, in radians.
    pub angle_increment: f64,
    /// Radius added per unit step.
    pub radius_increment: f64,
}

impl Default for SpiralGeometry {
    fn default() -> Self {
        Self::new(
            LayoutConfig::DEFAULT_ANGLE_INCREMENT,
            LayoutConfig::DEFAULT_RADIUS_INCREMENT,
        )
    }
}

impl SpiralGeometry {
    /// Create a spiral with the given increments.
    #[must_use]
    pub const fn new(angle_increment: f64, radius_increment: f64) -> Self {
        Self {
            angle_increment,
            radius_increment,
        }
    }

    /// `(radius * cos(angle), radius * sin(angle))`.
    #[must_use]
    pub fn point_at(radius: f64, angle: f64) -> Point {
        Point::new(radius * angle.cos(), radius * angle.sin())
    }

    /// Move `cursor` forward by one unit step.
    pub fn step(&self, cursor: &mut SpiralCursor) {
        cursor.angle += self.angle_increment;
        cursor.radius += self.radius_increment;
    }

    /// Largest step count [`advance`](Self::advance) applies one step at a
    /// time.
    pub const EXACT_STEP_LIMIT: u64 = 1 << 20;

    /// Move `cursor` forward by `steps` unit steps.
    ///
    /// Returns the new cursor and its Cartesian position.
    ///
    /// Up to [`EXACT_STEP_LIMIT`](Self::EXACT_STEP_LIMIT) steps are applied
    /// by repeated addition, matching [`walk`](Self::walk) exactly. Longer
    /// advances are computed in closed form, so they land within rounding
    /// of the walked position rather than bit for bit on it.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn advance(&self, mut cursor: SpiralCursor, steps: u64) -> (SpiralCursor, Point) {
        if steps > Self::EXACT_STEP_LIMIT {
            let n = steps as f64;
            cursor.angle = n.mul_add(self.angle_increment, cursor.angle);
            cursor.radius = n.mul_add(self.radius_increment, cursor.radius);
        } else {
            for _ in 0..steps {
                self.step(&mut cursor);
            }
        }
        (cursor, cursor.point())
    }

    /// Infinite walk yielding the position at step 0, 1, 2, ...
    #[must_use]
    pub const fn walk(&self) -> SpiralWalk {
        SpiralWalk {
            geometry: *self,
            cursor: SpiralCursor::ORIGIN,
        }
    }
}

/// Iterator over successive whole-step positions of a spiral.
///
/// Yields the current position and then steps, so the first item is the
/// origin.
#[derive(Debug, Clone)]
pub struct SpiralWalk {
    geometry: SpiralGeometry,
    cursor: SpiralCursor,
}

impl SpiralWalk {
    /// Cursor of the next position to be yielded.
    #[must_use]
    pub const fn cursor(&self) -> SpiralCursor {
        self.cursor
    }
}

impl Iterator for SpiralWalk {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let point = self.cursor.point();
        self.geometry.step(&mut self.cursor);
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl std::iter::FusedIterator for SpiralWalk {}
