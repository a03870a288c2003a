//! Record deduplication: one canonical record per river name.
//!
//! The first row carrying a given name wins. Later rows with the same
//! name are dropped without merging or averaging their lengths.
//!
//! This is the first pipeline stage, before continent aggregation.

use std::collections::HashMap;

use crate::table::Table;
use crate::types::{PipelineError, RiverRecord};

/// Column holding the river name.
pub const NAME_COLUMN: &str = "name";
/// Column holding the continent.
pub const CONTINENT_COLUMN: &str = "continent";
/// Column holding the length in kilometres.
pub const LENGTH_COLUMN: &str = "length";

/// Unique rivers in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniqueRivers {
    records: Vec<RiverRecord>,
    by_name: HashMap<String, usize>,
}

impl UniqueRivers {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` unless its name is already present.
    ///
    /// Returns `true` if the record was inserted.
    pub fn insert(&mut self, record: RiverRecord) -> bool {
        if self.by_name.contains_key(&record.name) {
            return false;
        }
        self.by_name.insert(record.name.clone(), self.records.len());
        self.records.push(record);
        true
    }

    /// Look up a river by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RiverRecord> {
        self.by_name.get(name).map(|&i| &self.records[i])
    }

    /// Number of unique rivers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no rivers.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in first-seen order.
    #[must_use]
    pub fn records(&self) -> &[RiverRecord] {
        &self.records
    }

    /// Iterate records in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, RiverRecord> {
        self.records.iter()
    }
}

impl FromIterator<RiverRecord> for UniqueRivers {
    fn from_iter<I: IntoIterator<Item = RiverRecord>>(iter: I) -> Self {
        let mut rivers = Self::new();
        for record in iter {
            rivers.insert(record);
        }
        rivers
    }
}

impl<'a> IntoIterator for &'a UniqueRivers {
    type Item = &'a RiverRecord;
    type IntoIter = std::slice::Iter<'a, RiverRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Read every row of `table` and keep the first record per river name.
///
/// Every row's length is parsed, including rows that end up discarded as
/// duplicates, so any malformed length aborts the whole pass.
///
/// # Errors
///
/// Returns [`PipelineError::MissingColumn`] if the `name`, `continent`,
/// or `length` column is absent, and [`PipelineError::MalformedRecord`]
/// for the first row whose length is not a usable number.
pub fn dedup_records(table: &Table) -> Result<UniqueRivers, PipelineError> {
    let name_col = table.column(NAME_COLUMN)?;
    let continent_col = table.column(CONTINENT_COLUMN)?;
    let length_col = table.column(LENGTH_COLUMN)?;

    let mut rivers = UniqueRivers::new();
    let mut dropped = 0_usize;
    for row in 0..table.row_count() {
        let name = table.get_string(row, name_col);
        let continent = table.get_string(row, continent_col);
        let length = table.get_num(row, length_col)?;

        if !rivers.insert(RiverRecord::new(name, continent, length)) {
            dropped += 1;
        }
    }

    tracing::debug!(
        rows = table.row_count(),
        unique = rivers.len(),
        dropped,
        "deduplicated river records"
    );
    Ok(rivers)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn table(rows: &[[&str; 3]]) -> Table {
        Table::from_rows(["name", "continent", "length"], rows.iter().copied())
    }

    #[test]
    fn first_occurrence_wins() {
        let rivers = dedup_records(&table(&[
            ["Nile", "Africa", "6650"],
            ["Amazon", "South America", "6400"],
            ["Nile", "Africa", "1"],
        ]))
        .unwrap();

        assert_eq!(rivers.len(), 2);
        let nile = rivers.get("Nile").unwrap();
        assert!((nile.length - 6650.0).abs() < f64::EPSILON);
        assert_eq!(
            rivers.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            ["Nile", "Amazon"]
        );
    }

    #[test]
    fn duplicate_with_other_continent_is_dropped() {
        let rivers = dedup_records(&table(&[
            ["Danube", "Europe", "2850"],
            ["Danube", "Asia", "9999"],
        ]))
        .unwrap();
        assert_eq!(rivers.len(), 1);
        assert_eq!(rivers.get("Danube").unwrap().continent, "Europe");
    }

    #[test]
    fn names_are_case_sensitive() {
        let rivers = dedup_records(&table(&[
            ["Volga", "Europe", "3530"],
            ["volga", "Europe", "3530"],
        ]))
        .unwrap();
        assert_eq!(rivers.len(), 2);
    }

    #[test]
    fn malformed_length_aborts_even_on_duplicate_row() {
        let result = dedup_records(&table(&[
            ["Nile", "Africa", "6650"],
            ["Nile", "Africa", "unknown"],
        ]));
        assert!(matches!(
            result,
            Err(PipelineError::MalformedRecord { row: 1, .. })
        ));
    }

    #[test]
    fn missing_column_is_reported() {
        let t = Table::from_rows(["name", "length"], [["Nile", "6650"]]);
        assert_eq!(
            dedup_records(&t),
            Err(PipelineError::MissingColumn("continent".to_string()))
        );
    }

    #[test]
    fn columns_may_appear_in_any_order() {
        let t = Table::from_rows(
            ["length", "name", "continent"],
            [["4180", "Amur", "Asia"]],
        );
        let rivers = dedup_records(&t).unwrap();
        assert_eq!(
            rivers.records(),
            &[RiverRecord::new("Amur", "Asia", 4180.0)]
        );
    }

    #[test]
    fn empty_table_gives_empty_set() {
        assert!(dedup_records(&table(&[])).unwrap().is_empty());
    }

    #[test]
    fn from_iterator_keeps_first() {
        let rivers: UniqueRivers = [
            RiverRecord::new("A", "X", 1.0),
            RiverRecord::new("A", "X", 2.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(rivers.len(), 1);
        assert!((rivers.get("A").unwrap().length - 1.0).abs() < f64::EPSILON);
    }
}
