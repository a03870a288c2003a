//! In-memory table of string fields with a header row.
//!
//! Parsing the source text format is left to callers (see
//! `riverspiral-io`); the pipeline only needs rows with string and
//! number accessors keyed by column name.

use crate::types::PipelineError;

/// A header row plus data rows of raw string fields.
///
/// Rows shorter than the header read missing trailing fields as empty
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given header names.
    #[must_use]
    pub fn new<H: Into<String>>(headers: impl IntoIterator<Item = H>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from header names and rows of fields.
    #[must_use]
    pub fn from_rows<H, R, F>(
        headers: impl IntoIterator<Item = H>,
        rows: impl IntoIterator<Item = R>,
    ) -> Self
    where
        H: Into<String>,
        R: IntoIterator<Item = F>,
        F: Into<String>,
    {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Append one data row.
    pub fn push_row<F: Into<String>>(&mut self, fields: impl IntoIterator<Item = F>) {
        self.rows.push(fields.into_iter().map(Into::into).collect());
    }

    /// Header names in column order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows (the header is not counted).
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no data rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column named `name`.
    ///
    /// Header names are matched exactly after trimming surrounding
    /// whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MissingColumn`] if no header matches.
    pub fn column(&self, name: &str) -> Result<usize, PipelineError> {
        self.headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }

    /// Raw text of a field, or `""` if the row or field does not exist.
    #[must_use]
    pub fn get_string(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|fields| fields.get(column))
            .map_or("", String::as_str)
    }

    /// Numeric value of a field.
    ///
    /// The text is trimmed and must parse completely as a finite,
    /// non-negative number.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MalformedRecord`] if the field is not a
    /// number, is not finite, or is negative.
    pub fn get_num(&self, row: usize, column: usize) -> Result<f64, PipelineError> {
        let raw = self.get_string(row, column);
        let malformed = |reason: &str| PipelineError::MalformedRecord {
            row,
            column: self
                .headers
                .get(column)
                .map_or_else(|| column.to_string(), |h| h.trim().to_string()),
            value: raw.to_string(),
            reason: reason.to_string(),
        };

        let value: f64 = raw.trim().parse().map_err(|_| malformed("not a number"))?;
        if !value.is_finite() {
            return Err(malformed("not a finite number"));
        }
        if value < 0.0 {
            return Err(malformed("must not be negative"));
        }
        Ok(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            ["name", " continent ", "length"],
            [
                vec!["Nile", "Africa", "6650"],
                vec!["Amazon", "South America", " 6400 "],
                vec!["Short"],
            ],
        )
    }

    #[test]
    fn column_lookup_trims_headers() {
        let table = sample();
        assert_eq!(table.column("name").unwrap(), 0);
        assert_eq!(table.column("continent").unwrap(), 1);
        assert_eq!(
            table.column("source"),
            Err(PipelineError::MissingColumn("source".to_string()))
        );
    }

    #[test]
    fn get_string_reads_missing_fields_as_empty() {
        let table = sample();
        assert_eq!(table.get_string(0, 0), "Nile");
        assert_eq!(table.get_string(2, 1), "");
        assert_eq!(table.get_string(99, 0), "");
    }

    #[test]
    fn get_num_trims_whitespace() {
        let table = sample();
        assert!((table.get_num(1, 2).unwrap() - 6400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn get_num_rejects_text() {
        let table = Table::from_rows(["name", "length"], [["Nile", "long"]]);
        let err = table.get_num(0, 1).unwrap_err();
        assert_eq!(
            err,
            PipelineError::MalformedRecord {
                row: 0,
                column: "length".to_string(),
                value: "long".to_string(),
                reason: "not a number".to_string(),
            }
        );
    }

    #[test]
    fn get_num_rejects_empty_nan_and_negative() {
        let table = Table::from_rows(["length"], [[""], ["NaN"], ["inf"], ["-5"], ["0"]]);
        assert!(table.get_num(0, 0).is_err());
        assert!(table.get_num(1, 0).is_err());
        assert!(table.get_num(2, 0).is_err());
        assert!(table.get_num(3, 0).is_err());
        assert!(table.get_num(4, 0).unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn row_count_excludes_header() {
        assert_eq!(sample().row_count(), 3);
        assert!(Table::new(["name"]).is_empty());
    }
}
