//! Pointer hit-testing against a frame's markers.
//!
//! A marker is hovered when the pointer, translated into the marker's
//! continent-relative coordinates, lies strictly closer than the hover
//! radius. Hits are reported in frame order: continents left to right,
//! markers in ascending river length.
//!
//! [`hit_test`] scans every marker. [`HoverIndex`] answers the same
//! query from an R-tree built once per frame, for datasets large enough
//! that the scan matters.

use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::layout::{ContinentFrame, Frame, Marker};
use crate::types::Point;

/// A hovered marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerHit<'a> {
    /// Continent the marker belongs to.
    pub continent: &'a ContinentFrame,
    /// The hovered marker.
    pub marker: &'a Marker,
}

impl MarkerHit<'_> {
    /// Marker position on the canvas.
    #[must_use]
    pub fn canvas_point(&self) -> Point {
        self.marker.point.offset_by(self.continent.origin)
    }
}

fn is_hit(continent: &ContinentFrame, marker: &Marker, pointer: Point, radius: f64) -> bool {
    pointer.relative_to(continent.origin).distance(marker.point) < radius
}

/// Every marker within `radius` of `pointer` (canvas coordinates).
#[must_use]
pub fn hit_test(frame: &Frame, pointer: Point, radius: f64) -> Vec<MarkerHit<'_>> {
    frame
        .continents
        .iter()
        .flat_map(|continent| {
            continent
                .markers
                .iter()
                .filter(move |marker| is_hit(continent, marker, pointer, radius))
                .map(move |marker| MarkerHit { continent, marker })
        })
        .collect()
}

/// The hit whose details are shown for each continent: the last hovered
/// marker in that continent's traversal order.
#[must_use]
pub fn hovered_per_continent<'a>(hits: &[MarkerHit<'a>]) -> Vec<MarkerHit<'a>> {
    let mut shown: Vec<MarkerHit<'a>> = Vec::new();
    for hit in hits {
        match shown.last_mut() {
            Some(last) if std::ptr::eq(last.continent, hit.continent) => *last = *hit,
            _ => shown.push(*hit),
        }
    }
    shown
}

/// (continent index, marker index) into [`Frame::continents`].
type IndexedMarker = GeomWithData<[f64; 2], (usize, usize)>;

/// R-tree over a frame's markers in canvas coordinates.
pub struct HoverIndex<'a> {
    frame: &'a Frame,
    tree: RTree<IndexedMarker>,
}

impl<'a> HoverIndex<'a> {
    /// Index every marker of `frame`.
    #[must_use]
    pub fn new(frame: &'a Frame) -> Self {
        let items: Vec<IndexedMarker> = frame
            .continents
            .iter()
            .enumerate()
            .flat_map(|(ci, continent)| {
                continent.markers.iter().enumerate().map(move |(mi, marker)| {
                    let p = marker.point.offset_by(continent.origin);
                    GeomWithData::new([p.x, p.y], (ci, mi))
                })
            })
            .collect();
        Self {
            frame,
            tree: RTree::bulk_load(items),
        }
    }

    /// Number of indexed markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns `true` if the frame has no markers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Same result as [`hit_test`] on the indexed frame.
    #[must_use]
    pub fn hits(&self, pointer: Point, radius: f64) -> Vec<MarkerHit<'a>> {
        // Widen the search slightly: candidates are re-checked in
        // continent-relative coordinates, which may round differently.
        let search = radius + radius.abs().mul_add(1e-9, 1e-9);
        let frame: &'a Frame = self.frame;
        let mut found: Vec<(usize, usize)> = self
            .tree
            .locate_within_distance([pointer.x, pointer.y], search * search)
            .map(|item| item.data)
            .filter(|&(ci, mi)| {
                let continent = &frame.continents[ci];
                is_hit(continent, &continent.markers[mi], pointer, radius)
            })
            .collect();
        found.sort_unstable();

        found
            .into_iter()
            .map(|(ci, mi)| {
                let continent = &frame.continents[ci];
                MarkerHit {
                    continent,
                    marker: &continent.markers[mi],
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::animation::AnimationState;
    use crate::dedup::UniqueRivers;
    use crate::layout::SpiralLayoutEngine;
    use crate::types::RiverRecord;

    fn frame() -> Frame {
        let rivers: UniqueRivers = [
            ("Nile", "Africa", 6650.0),
            ("Congo", "Africa", 4700.0),
            ("Niger", "Africa", 4180.0),
            ("Amazon", "South America", 6400.0),
            ("Parana", "South America", 4880.0),
            ("Volga", "Europe", 3530.0),
        ]
        .into_iter()
        .map(|(name, continent, length)| RiverRecord::new(name, continent, length))
        .collect();
        let groups = aggregate(&rivers, 100.0);
        SpiralLayoutEngine::default().compute_frame(&groups, &AnimationState::default())
    }

    fn canvas_point(frame: &Frame, continent: &str, river: &str) -> Point {
        frame
            .continent(continent)
            .and_then(|c| {
                c.markers
                    .iter()
                    .find(|m| m.river.name == river)
                    .map(|m| m.point.offset_by(c.origin))
            })
            .unwrap_or(Point::new(f64::NAN, f64::NAN))
    }

    #[test]
    fn pointer_on_marker_hits() {
        let frame = frame();
        let pointer = canvas_point(&frame, "Africa", "Congo");
        let hits = hit_test(&frame, pointer, 2.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].marker.river.name, "Congo");
        assert_eq!(hits[0].continent.continent, "Africa");
    }

    #[test]
    fn pointer_outside_radius_misses() {
        let frame = frame();
        let p = canvas_point(&frame, "Europe", "Volga");
        assert!(hit_test(&frame, Point::new(p.x + 2.5, p.y), 2.0).is_empty());
        assert_eq!(hit_test(&frame, Point::new(p.x + 1.5, p.y), 2.0).len(), 1);
    }

    #[test]
    fn far_pointer_misses_everything() {
        let frame = frame();
        assert!(hit_test(&frame, Point::new(-500.0, -500.0), 2.0).is_empty());
    }

    #[test]
    fn index_agrees_with_scan() {
        let frame = frame();
        let index = HoverIndex::new(&frame);
        assert_eq!(index.len(), 6);

        let mut pointers = vec![Point::new(0.0, 0.0), Point::new(250.0, 1100.0)];
        for continent in &frame.continents {
            for marker in &continent.markers {
                let p = marker.point.offset_by(continent.origin);
                pointers.push(p);
                pointers.push(Point::new(p.x + 1.0, p.y - 1.0));
                pointers.push(Point::new(p.x + 3.0, p.y));
            }
        }
        for radius in [2.0, 10.0, 40.0] {
            for &pointer in &pointers {
                assert_eq!(
                    index.hits(pointer, radius),
                    hit_test(&frame, pointer, radius),
                    "pointer {pointer:?} radius {radius}"
                );
            }
        }
    }

    #[test]
    fn last_hit_per_continent_is_shown() {
        let frame = frame();
        let africa = canvas_point(&frame, "Africa", "Niger");
        // Large radius: every Africa marker is hovered.
        let hits = hit_test(&frame, africa, 100.0);
        let shown = hovered_per_continent(&hits);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].marker.river.name, "Nile");
        assert_eq!(shown[0].marker.reverse_index, 1);
    }

    #[test]
    fn empty_frame_has_empty_index() {
        let frame = SpiralLayoutEngine::default().compute_frame(
            &crate::aggregate::ContinentGroups::default(),
            &AnimationState::default(),
        );
        assert!(HoverIndex::new(&frame).is_empty());
        assert!(hit_test(&frame, Point::ORIGIN, 2.0).is_empty());
    }
}
