//! Incremental outline cache.
//!
//! Outlines are prefix-stable: the outline at a later step extends the
//! outline at an earlier one. The cache keeps the points computed so far
//! for each continent and only walks the spiral further when the step
//! grows. It is keyed by a fingerprint of the dataset and spiral
//! geometry and is cleared when either changes.

use std::collections::HashMap;
use std::hash::Hasher;

use siphasher::sip::SipHasher13;

use crate::aggregate::{ContinentGroup, ContinentGroups};
use crate::layout::outline_point_count;
use crate::spiral::{SpiralGeometry, SpiralWalk};
use crate::types::{Point, Polyline};

#[derive(Debug, Clone)]
struct CachedOutline {
    walk: SpiralWalk,
    points: Vec<Point>,
}

/// Outline points computed by earlier frames, per continent.
#[derive(Debug, Clone, Default)]
pub struct OutlineCache {
    fingerprint: Option<u64>,
    geometry: SpiralGeometry,
    outlines: HashMap<String, CachedOutline>,
}

impl OutlineCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint the cache was last synced to, if any.
    #[must_use]
    pub const fn fingerprint(&self) -> Option<u64> {
        self.fingerprint
    }

    /// Number of points currently held for `continent`.
    #[must_use]
    pub fn cached_len(&self, continent: &str) -> usize {
        self.outlines.get(continent).map_or(0, |c| c.points.len())
    }

    /// Clear the cache if `groups` or `geometry` differ from the last sync.
    pub fn sync(&mut self, groups: &ContinentGroups, geometry: SpiralGeometry) {
        let fingerprint = dataset_fingerprint(groups, geometry);
        if self.fingerprint != Some(fingerprint) {
            if self.fingerprint.is_some() {
                tracing::debug!("dataset changed, clearing outline cache");
            }
            self.outlines.clear();
            self.geometry = geometry;
            self.fingerprint = Some(fingerprint);
        }
    }

    /// Outline of `group` revealed up to `step`, extending cached points
    /// as needed.
    pub fn outline(&mut self, group: &ContinentGroup, step: u64) -> Polyline {
        let count = outline_point_count(group.total_length(), step);
        let geometry = self.geometry;
        let cached = self
            .outlines
            .entry(group.continent().to_string())
            .or_insert_with(|| CachedOutline {
                walk: geometry.walk(),
                points: Vec::new(),
            });

        if cached.points.len() < count {
            let missing = count - cached.points.len();
            cached.points.extend(cached.walk.by_ref().take(missing));
        }
        Polyline::new(cached.points[..count].to_vec())
    }
}

/// Stable hash of the continent groups and spiral increments.
#[must_use]
pub fn dataset_fingerprint(groups: &ContinentGroups, geometry: SpiralGeometry) -> u64 {
    let mut hasher = SipHasher13::new();
    hasher.write_u64(geometry.angle_increment.to_bits());
    hasher.write_u64(geometry.radius_increment.to_bits());
    for group in groups {
        hasher.write(group.continent().as_bytes());
        hasher.write_u8(0xff);
        hasher.write_u64(group.total_length().to_bits());
        hasher.write_usize(group.rivers().len());
        for river in group.rivers() {
            hasher.write(river.name.as_bytes());
            hasher.write_u8(0xff);
            hasher.write_u64(river.length.to_bits());
        }
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::dedup::UniqueRivers;
    use crate::layout::SpiralLayoutEngine;
    use crate::types::RiverRecord;

    fn groups(records: &[(&str, &str, f64)]) -> ContinentGroups {
        let rivers: UniqueRivers = records
            .iter()
            .map(|&(name, continent, length)| RiverRecord::new(name, continent, length))
            .collect();
        aggregate(&rivers, 100.0)
    }

    #[test]
    fn extends_incrementally() {
        let groups = groups(&[("Nile", "Africa", 6650.0)]);
        let Some(africa) = groups.get("Africa") else {
            unreachable!("Africa exists");
        };
        let mut cache = OutlineCache::new();
        cache.sync(&groups, SpiralGeometry::default());

        let first = cache.outline(africa, 10);
        assert_eq!(cache.cached_len("Africa"), 10);
        let second = cache.outline(africa, 30);
        assert_eq!(cache.cached_len("Africa"), 30);
        assert!(first.is_prefix_of(&second));

        // Going back in time reuses the stored prefix.
        let earlier = cache.outline(africa, 5);
        assert_eq!(earlier.len(), 5);
        assert_eq!(cache.cached_len("Africa"), 30);
    }

    #[test]
    fn matches_engine_outline() {
        let groups = groups(&[("Amazon", "South America", 6400.0)]);
        let Some(group) = groups.get("South America") else {
            unreachable!("South America exists");
        };
        let engine = SpiralLayoutEngine::default();
        let mut cache = OutlineCache::new();
        cache.sync(&groups, engine.spiral());
        for step in [0, 3, 17, 64, 200] {
            assert_eq!(
                cache.outline(group, step),
                engine.outline(group.total_length(), step)
            );
        }
    }

    #[test]
    fn dataset_change_clears_cache() {
        let before = groups(&[("Nile", "Africa", 6650.0)]);
        let after = groups(&[("Nile", "Africa", 6000.0)]);
        let mut cache = OutlineCache::new();

        cache.sync(&before, SpiralGeometry::default());
        let Some(africa) = before.get("Africa") else {
            unreachable!("Africa exists");
        };
        let _ = cache.outline(africa, 40);
        let fp = cache.fingerprint();

        cache.sync(&before, SpiralGeometry::default());
        assert_eq!(cache.cached_len("Africa"), 40);

        cache.sync(&after, SpiralGeometry::default());
        assert_ne!(cache.fingerprint(), fp);
        assert_eq!(cache.cached_len("Africa"), 0);
    }

    #[test]
    fn geometry_change_clears_cache() {
        let groups = groups(&[("Nile", "Africa", 6650.0)]);
        let a = dataset_fingerprint(&groups, SpiralGeometry::default());
        let b = dataset_fingerprint(&groups, SpiralGeometry::new(0.2, 0.2));
        assert_ne!(a, b);
    }
}
