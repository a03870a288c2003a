//! riverspiral-pipeline: Pure river aggregation and spiral layout (sans-IO).
//!
//! Turns a table of river rows into per-frame spiral geometry through:
//! deduplication -> continent aggregation -> (per frame) spiral layout.
//!
//! This crate has **no I/O dependencies** -- it operates on an in-memory
//! [`Table`] and returns structured data. Reading delimited text lives in
//! `riverspiral-io`, drawing lives in `riverspiral-export`.

pub mod aggregate;
pub mod animation;
pub mod cache;
pub mod dedup;
pub mod hover;
pub mod layout;
pub mod spiral;
pub mod table;
pub mod types;

pub use aggregate::{ContinentGroup, ContinentGroups};
pub use animation::AnimationState;
pub use cache::OutlineCache;
pub use dedup::UniqueRivers;
pub use hover::{HoverIndex, MarkerHit, hit_test, hovered_per_continent};
pub use layout::{ContinentFrame, Frame, ListEntry, Marker, SpiralLayoutEngine};
pub use spiral::{SpiralCursor, SpiralGeometry};
pub use table::Table;
pub use types::{Dimensions, LayoutConfig, PipelineError, Point, Polyline, RiverRecord};

/// Run the load pass: deduplicate the table and aggregate by continent.
///
/// This runs once at startup. The returned groups are read-only input to
/// [`SpiralLayoutEngine::compute_frame`] for every subsequent frame.
///
/// # Steps
///
/// 1. Validate the configuration
/// 2. Keep the first row per river name
/// 3. Group rivers by continent and sum `length / length_scale`
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if `config` fails
/// [`LayoutConfig::validate`].
/// Returns [`PipelineError::MissingColumn`] if a required column is absent.
/// Returns [`PipelineError::MalformedRecord`] if any length is not a
/// usable number; no partial dataset is returned.
pub fn process(table: &Table, config: &LayoutConfig) -> Result<ContinentGroups, PipelineError> {
    config.validate()?;
    let rivers = dedup::dedup_records(table)?;
    Ok(aggregate::aggregate(&rivers, config.length_scale))
}
