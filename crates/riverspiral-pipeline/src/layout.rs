//! Spiral layout: turn continent groups into per-frame drawable geometry.
//!
//! For each continent the engine produces:
//!
//! - an outline polyline, truncated at the current animation step;
//! - one marker per river, placed by walking the spiral through the
//!   rivers in ascending length order (independent of the step);
//! - the river list in descending length order, for printing.
//!
//! Continents are placed left to right by descending total length.
//! All outline and marker coordinates are relative to the continent's
//! origin; [`ContinentFrame::origin`] gives that origin on the canvas.

use serde::{Deserialize, Serialize};

use crate::aggregate::{ContinentGroup, ContinentGroups};
use crate::animation::AnimationState;
use crate::cache::OutlineCache;
use crate::spiral::{SpiralCursor, SpiralGeometry};
use crate::types::{Dimensions, LayoutConfig, Point, Polyline, RiverRecord};

/// A river's position on its continent's spiral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Position relative to the continent origin.
    pub point: Point,
    /// The river this marker stands for.
    pub river: RiverRecord,
    /// Reference number: 1 for the longest river, `n` for the shortest.
    pub reverse_index: usize,
}

/// One line of a continent's printed river list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    /// 1-based rank in descending length order.
    pub rank: usize,
    /// The listed river.
    pub river: RiverRecord,
}

impl ListEntry {
    /// Printed form, e.g. `"1. Nile (6650 km)"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}. {}", self.rank, self.river.caption())
    }
}

/// Everything needed to draw one continent in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinentFrame {
    /// Continent name, also its label.
    pub continent: String,
    /// Summed spiral length of the continent.
    pub total_length: f64,
    /// Spiral origin on the canvas.
    pub origin: Point,
    /// Spiral outline revealed so far, relative to `origin`.
    pub outline: Polyline,
    /// One marker per river, in ascending length order.
    pub markers: Vec<Marker>,
    /// Rivers in descending length order.
    pub listing: Vec<ListEntry>,
}

/// Drawable output of one animation frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Animation step this frame was computed for.
    pub step: u64,
    /// Canvas size the layout was computed for.
    pub canvas: Dimensions,
    /// Continents in left-to-right order.
    pub continents: Vec<ContinentFrame>,
}

impl Frame {
    /// Returns `true` if there is nothing to draw beyond static chrome.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.continents.is_empty()
    }

    /// Look up a continent by name.
    #[must_use]
    pub fn continent(&self, name: &str) -> Option<&ContinentFrame> {
        self.continents.iter().find(|c| c.continent == name)
    }
}

/// Number of outline points for a spiral of `total_length` at `step`.
///
/// One point per whole step `k` with `k < min(step, total_length)`, and
/// never fewer than one (the origin), so a zero-length or not-yet-started
/// spiral degenerates to a single point.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn outline_point_count(total_length: f64, step: u64) -> usize {
    let limit = (step as f64).min(total_length);
    if limit.is_nan() || limit <= 0.0 {
        1
    } else {
        (limit.ceil() as usize).max(1)
    }
}

/// Computes spiral geometry from a [`LayoutConfig`].
#[derive(Debug, Clone)]
pub struct SpiralLayoutEngine {
    config: LayoutConfig,
    spiral: SpiralGeometry,
}

impl SpiralLayoutEngine {
    /// Create an engine for `config`.
    ///
    /// The configuration is assumed valid; see [`LayoutConfig::validate`].
    #[must_use]
    pub const fn new(config: LayoutConfig) -> Self {
        let spiral = config.spiral();
        Self { config, spiral }
    }

    /// The configuration this engine lays out with.
    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// The spiral geometry derived from the configuration.
    #[must_use]
    pub const fn spiral(&self) -> SpiralGeometry {
        self.spiral
    }

    /// Outline of a spiral of `total_length`, revealed up to `step`.
    #[must_use]
    pub fn outline(&self, total_length: f64, step: u64) -> Polyline {
        let count = outline_point_count(total_length, step);
        Polyline::new(self.spiral.walk().take(count).collect())
    }

    /// One marker per river of `group`, in ascending length order.
    ///
    /// A single cursor walks the spiral from the origin, advancing by each
    /// river's whole step count in turn; the marker sits where the cursor
    /// stops.
    ///
    /// The last marker lands on step `Σ floor(length / scale)`. When that sum
    /// equals a whole `total_length`, the marker is one step past the last
    /// outline point, since the outline stops below `total_length`.
    #[must_use]
    pub fn markers(&self, group: &ContinentGroup) -> Vec<Marker> {
        let ascending = group.ascending();
        let count = ascending.len();
        let mut cursor = SpiralCursor::ORIGIN;

        ascending
            .into_iter()
            .enumerate()
            .map(|(position, river)| {
                let (next, point) = self
                    .spiral
                    .advance(cursor, river.step_count(self.config.length_scale));
                cursor = next;
                Marker {
                    point,
                    river: river.clone(),
                    reverse_index: count - position,
                }
            })
            .collect()
    }

    /// Printed list of `group`'s rivers, longest first.
    #[must_use]
    pub fn listing(group: &ContinentGroup) -> Vec<ListEntry> {
        group
            .descending()
            .into_iter()
            .enumerate()
            .map(|(i, river)| ListEntry {
                rank: i + 1,
                river: river.clone(),
            })
            .collect()
    }

    /// Canvas origin of the spiral in left-to-right `slot`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn origin(&self, slot: usize) -> Point {
        Point::new(
            (slot as f64).mul_add(self.config.continent_spacing, self.config.left_margin),
            self.config.center_y(),
        )
    }

    /// Lay out one continent in `slot` at `step`.
    #[must_use]
    pub fn layout_continent(
        &self,
        group: &ContinentGroup,
        slot: usize,
        step: u64,
    ) -> ContinentFrame {
        self.continent_frame(group, slot, self.outline(group.total_length(), step))
    }

    /// Compute the drawable frame for `state`'s current step.
    #[must_use]
    pub fn compute_frame(&self, groups: &ContinentGroups, state: &AnimationState) -> Frame {
        let step = state.current_step();
        let continents = groups
            .by_total_descending()
            .into_iter()
            .enumerate()
            .map(|(slot, group)| self.layout_continent(group, slot, step))
            .collect();
        self.frame(step, continents)
    }

    /// Like [`compute_frame`](Self::compute_frame), reusing outline points
    /// already computed by earlier frames.
    ///
    /// The cache is reset if `groups` or the spiral geometry differ from
    /// what it was filled with.
    #[must_use]
    pub fn compute_frame_cached(
        &self,
        groups: &ContinentGroups,
        state: &AnimationState,
        cache: &mut OutlineCache,
    ) -> Frame {
        cache.sync(groups, self.spiral);
        let step = state.current_step();
        let continents = groups
            .by_total_descending()
            .into_iter()
            .enumerate()
            .map(|(slot, group)| {
                let outline = cache.outline(group, step);
                self.continent_frame(group, slot, outline)
            })
            .collect();
        self.frame(step, continents)
    }

    fn continent_frame(
        &self,
        group: &ContinentGroup,
        slot: usize,
        outline: Polyline,
    ) -> ContinentFrame {
        ContinentFrame {
            continent: group.continent().to_string(),
            total_length: group.total_length(),
            origin: self.origin(slot),
            outline,
            markers: self.markers(group),
            listing: Self::listing(group),
        }
    }

    fn frame(&self, step: u64, continents: Vec<ContinentFrame>) -> Frame {
        tracing::trace!(step, continents = continents.len(), "computed frame");
        Frame {
            step,
            canvas: self.config.canvas,
            continents,
        }
    }
}

impl Default for SpiralLayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}
