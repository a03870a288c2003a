//! Continent aggregation: group unique rivers and sum their scaled lengths.
//!
//! Groups are created lazily the first time a continent is seen, so any
//! continent name is accepted. Each group keeps its rivers in first-seen
//! order; sorted views are derived on demand and never written back.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dedup::UniqueRivers;
use crate::types::RiverRecord;

/// All unique rivers of one continent and their summed spiral length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinentGroup {
    continent: String,
    total_length: f64,
    rivers: Vec<RiverRecord>,
}

impl ContinentGroup {
    /// Create an empty group.
    #[must_use]
    pub fn new(continent: impl Into<String>) -> Self {
        Self {
            continent: continent.into(),
            total_length: 0.0,
            rivers: Vec::new(),
        }
    }

    fn push(&mut self, river: RiverRecord, length_scale: f64) {
        self.total_length += river.scaled_length(length_scale);
        self.rivers.push(river);
    }

    /// Continent name.
    #[must_use]
    pub fn continent(&self) -> &str {
        &self.continent
    }

    /// Sum of `length / length_scale` over the member rivers.
    #[must_use]
    pub const fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Member rivers in first-seen order.
    #[must_use]
    pub fn rivers(&self) -> &[RiverRecord] {
        &self.rivers
    }

    /// Rivers sorted by ascending length (stable). Governs marker placement.
    #[must_use]
    pub fn ascending(&self) -> Vec<&RiverRecord> {
        let mut view: Vec<&RiverRecord> = self.rivers.iter().collect();
        view.sort_by(|a, b| a.length.total_cmp(&b.length));
        view
    }

    /// Rivers sorted by descending length (stable). Governs the printed list.
    #[must_use]
    pub fn descending(&self) -> Vec<&RiverRecord> {
        let mut view: Vec<&RiverRecord> = self.rivers.iter().collect();
        view.sort_by(|a, b| b.length.total_cmp(&a.length));
        view
    }
}

/// Continent groups in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContinentGroups {
    groups: Vec<ContinentGroup>,
    by_continent: HashMap<String, usize>,
}

impl ContinentGroups {
    /// Look up a group by exact continent name.
    #[must_use]
    pub fn get(&self, continent: &str) -> Option<&ContinentGroup> {
        self.by_continent.get(continent).map(|&i| &self.groups[i])
    }

    /// Number of continents.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if there are no groups.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate groups in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, ContinentGroup> {
        self.groups.iter()
    }

    /// Groups sorted by descending total length. Ties keep first-seen order.
    #[must_use]
    pub fn by_total_descending(&self) -> Vec<&ContinentGroup> {
        let mut view: Vec<&ContinentGroup> = self.groups.iter().collect();
        view.sort_by(|a, b| b.total_length.total_cmp(&a.total_length));
        view
    }

    /// Largest total length, or `0.0` with no groups.
    #[must_use]
    pub fn max_total_length(&self) -> f64 {
        self.groups
            .iter()
            .map(ContinentGroup::total_length)
            .fold(0.0, f64::max)
    }

    fn entry(&mut self, continent: &str) -> &mut ContinentGroup {
        let index = match self.by_continent.get(continent) {
            Some(&i) => i,
            None => {
                let i = self.groups.len();
                self.groups.push(ContinentGroup::new(continent));
                self.by_continent.insert(continent.to_string(), i);
                i
            }
        };
        &mut self.groups[index]
    }
}

impl<'a> IntoIterator for &'a ContinentGroups {
    type Item = &'a ContinentGroup;
    type IntoIter = std::slice::Iter<'a, ContinentGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Group `rivers` by continent, summing `length / length_scale` per group.
///
/// An empty input yields no groups; that is not an error.
#[must_use = "returns the aggregated continent groups"]
pub fn aggregate(rivers: &UniqueRivers, length_scale: f64) -> ContinentGroups {
    let mut groups = ContinentGroups::default();
    for river in rivers {
        groups
            .entry(&river.continent)
            .push(river.clone(), length_scale);
    }

    if groups.is_empty() {
        tracing::warn!("dataset is empty, no spirals will be drawn");
    } else {
        tracing::debug!(
            continents = groups.len(),
            rivers = rivers.len(),
            "aggregated rivers by continent"
        );
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rivers(records: &[(&str, &str, f64)]) -> UniqueRivers {
        records
            .iter()
            .map(|&(name, continent, length)| RiverRecord::new(name, continent, length))
            .collect()
    }

    #[test]
    fn totals_are_scaled_sums() {
        let groups = aggregate(
            &rivers(&[
                ("Nile", "Africa", 6650.0),
                ("Amazon", "South America", 6400.0),
                ("Congo", "Africa", 4700.0),
            ]),
            100.0,
        );
        assert_eq!(groups.len(), 2);
        let africa = groups.get("Africa");
        assert!(africa.is_some_and(|g| (g.total_length() - 113.5).abs() < 1e-9));
        assert!(africa.is_some_and(|g| g.rivers().len() == 2));
        let south = groups.get("South America");
        assert!(south.is_some_and(|g| (g.total_length() - 64.0).abs() < 1e-9));
    }

    #[test]
    fn total_independent_of_input_order() {
        let forward = aggregate(
            &rivers(&[("A", "X", 250.0), ("B", "X", 150.0), ("C", "X", 333.0)]),
            100.0,
        );
        let backward = aggregate(
            &rivers(&[("C", "X", 333.0), ("B", "X", 150.0), ("A", "X", 250.0)]),
            100.0,
        );
        let f = forward.get("X").map_or(f64::NAN, ContinentGroup::total_length);
        let b = backward.get("X").map_or(f64::NAN, ContinentGroup::total_length);
        assert!((f - b).abs() < 1e-9);
    }

    #[test]
    fn rivers_keep_first_seen_order() {
        let groups = aggregate(
            &rivers(&[("Long", "X", 900.0), ("Short", "X", 100.0), ("Mid", "X", 500.0)]),
            100.0,
        );
        let names: Vec<&str> = groups
            .get("X")
            .map(|g| g.rivers().iter().map(|r| r.name.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(names, ["Long", "Short", "Mid"]);
    }

    #[test]
    fn sorted_views_leave_canonical_order_alone() {
        let groups = aggregate(
            &rivers(&[("A", "X", 250.0), ("B", "X", 150.0), ("C", "X", 250.0)]),
            100.0,
        );
        let Some(group) = groups.get("X") else {
            unreachable!("group X exists");
        };
        let names = |view: Vec<&RiverRecord>| -> Vec<String> {
            view.into_iter().map(|r| r.name.clone()).collect()
        };
        assert_eq!(names(group.ascending()), ["B", "A", "C"]);
        assert_eq!(names(group.descending()), ["A", "C", "B"]);
        assert_eq!(
            group.rivers().iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            ["A", "B", "C"]
        );
    }

    #[test]
    fn continents_sorted_by_total_with_stable_ties() {
        let groups = aggregate(
            &rivers(&[
                ("a", "Europe", 300.0),
                ("b", "Asia", 900.0),
                ("c", "Oceania", 300.0),
                ("d", "Africa", 500.0),
            ]),
            100.0,
        );
        let order: Vec<&str> = groups
            .by_total_descending()
            .into_iter()
            .map(ContinentGroup::continent)
            .collect();
        assert_eq!(order, ["Asia", "Africa", "Europe", "Oceania"]);
    }

    #[test]
    fn any_continent_name_is_a_group() {
        let groups = aggregate(&rivers(&[("x", "Atlantis", 120.0)]), 100.0);
        assert!(groups.get("Atlantis").is_some());
    }

    #[test]
    fn empty_input_gives_no_groups() {
        let groups = aggregate(&UniqueRivers::new(), 100.0);
        assert!(groups.is_empty());
        assert!(groups.max_total_length().abs() < f64::EPSILON);
    }
}
