#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record and table types shared across the blotter pipeline.
//!
//! Every document extractor produces [`IncidentRecord`] rows which are pooled
//! into an [`IncidentTable`] per analysis batch. Later pipeline stages never
//! mutate the table; they return a new [`ClusteredTable`] carrying the
//! derived columns alongside it.

use serde::{Deserialize, Serialize};

/// Number of fields in a finalized incident record.
pub const FIELD_COUNT: usize = 5;

/// Column names of the incident table, in field order.
pub const COLUMNS: [&str; FIELD_COUNT] = [
    "Date/Time",
    "Incident Number",
    "Location",
    "Nature",
    "Incident ORI",
];

/// Errors that can occur while assembling an incident table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// A raw input row did not have exactly [`FIELD_COUNT`] fields.
    #[error("row {row} has {found} fields, expected {expected}")]
    ColumnCount {
        /// Zero-based index of the offending row in the input batch.
        row: usize,
        /// Number of fields the row actually contained.
        found: usize,
        /// Number of fields the schema requires.
        expected: usize,
    },
}

/// A single extracted incident.
///
/// Field order matches [`COLUMNS`]. The `location` and `nature` fields may
/// be the result of merging wrapped continuation lines from the source
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Raw date/time text as printed in the report (e.g. `"8/1/2024 0:04"`).
    pub date_time: String,
    /// Agency incident number (e.g. `"2024-00055419"`).
    pub incident_number: String,
    /// Street address or intersection.
    pub location: String,
    /// Free-text incident type (e.g. `"Traffic Stop"`).
    pub nature: String,
    /// Originating agency identifier.
    pub incident_ori: String,
}

impl IncidentRecord {
    /// Builds a record from an ordered list of raw fields.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ColumnCount`] if `fields` does not contain
    /// exactly [`FIELD_COUNT`] entries. `row` is only used for error
    /// reporting.
    pub fn from_fields(row: usize, fields: Vec<String>) -> Result<Self, TableError> {
        let found = fields.len();
        let Ok([date_time, incident_number, location, nature, incident_ori]) =
            <[String; FIELD_COUNT]>::try_from(fields)
        else {
            return Err(TableError::ColumnCount {
                row,
                found,
                expected: FIELD_COUNT,
            });
        };

        Ok(Self {
            date_time,
            incident_number,
            location,
            nature,
            incident_ori,
        })
    }

    /// Returns the record's fields in column order.
    #[must_use]
    pub fn fields(&self) -> [&str; FIELD_COUNT] {
        [
            &self.date_time,
            &self.incident_number,
            &self.location,
            &self.nature,
            &self.incident_ori,
        ]
    }
}

/// An ordered collection of incident records with the fixed schema.
///
/// Row order is the insertion order from source documents. The table is
/// created fresh per analysis batch and never merged across batches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentTable {
    records: Vec<IncidentRecord>,
}

impl IncidentTable {
    /// Builds a table from raw field rows pooled across documents.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ColumnCount`] naming the first row whose field
    /// count does not match the schema. Rows are never silently coerced.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        let mut records = Vec::with_capacity(rows.len());
        for (row, fields) in rows.into_iter().enumerate() {
            let found = fields.len();
            if found != FIELD_COUNT {
                return Err(TableError::ColumnCount {
                    row,
                    found,
                    expected: FIELD_COUNT,
                });
            }
            records.push(IncidentRecord::from_fields(row, fields)?);
        }
        Ok(Self { records })
    }

    /// Builds a table directly from finalized records.
    #[must_use]
    pub fn from_records(records: Vec<IncidentRecord>) -> Self {
        Self { records }
    }

    /// Returns the rows of the table.
    #[must_use]
    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `(rows, columns)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.records.len(), FIELD_COUNT)
    }

    /// Returns the `Nature` column, row for row.
    #[must_use]
    pub fn natures(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.nature.as_str()).collect()
    }
}

/// An incident table augmented with per-row analysis columns.
///
/// `clusters` and the projection coordinates are always aligned with the
/// table's row order; `hours` is present only when every `Date/Time` value
/// parsed (the hourly trend is all-or-nothing).
#[derive(Debug, Clone, Serialize)]
pub struct ClusteredTable {
    /// The source table the analysis ran over.
    pub table: IncidentTable,
    /// Cluster id per row. Ids are stable within a run only.
    pub clusters: Vec<usize>,
    /// First principal component coordinate per row.
    pub pca_x: Vec<f64>,
    /// Second principal component coordinate per row.
    pub pca_y: Vec<f64>,
    /// Hour of day (0-23) per row, when the whole column parsed.
    pub hours: Option<Vec<u32>>,
}

impl ClusteredTable {
    /// Column names of the augmented table, in export order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&'static str> {
        let mut names = COLUMNS.to_vec();
        names.extend(["Cluster", "PCA_X", "PCA_Y"]);
        if self.hours.is_some() {
            names.push("Hour");
        }
        names
    }

    /// Returns row `idx` as display strings, aligned with
    /// [`Self::column_names`].
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    #[must_use]
    pub fn row_values(&self, idx: usize) -> Vec<String> {
        let mut values: Vec<String> = self.table.records()[idx]
            .fields()
            .iter()
            .map(|&f| f.to_owned())
            .collect();
        values.push(self.clusters[idx].to_string());
        values.push(self.pca_x[idx].to_string());
        values.push(self.pca_y[idx].to_string());
        if let Some(hours) = &self.hours {
            values.push(hours[idx].to_string());
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<Vec<String>> {
        vec![
            vec![
                "8/1/2024 0:04".to_owned(),
                "2024-00055419".to_owned(),
                "1345 W LINDSEY ST".to_owned(),
                "Traffic Stop".to_owned(),
                "OK0140200".to_owned(),
            ],
            vec![
                "8/1/2024 1:15".to_owned(),
                "2024-00055420".to_owned(),
                "789 E MAIN ST".to_owned(),
                "Suspicious Person".to_owned(),
                "OK0140201".to_owned(),
            ],
        ]
    }

    #[test]
    fn aggregates_rows_into_table() {
        let table = IncidentTable::from_rows(sample_rows()).unwrap();
        assert_eq!(table.shape(), (2, 5));
        assert_eq!(
            COLUMNS,
            [
                "Date/Time",
                "Incident Number",
                "Location",
                "Nature",
                "Incident ORI"
            ]
        );
        assert_eq!(table.records()[0].nature, "Traffic Stop");
        assert_eq!(table.records()[1].incident_number, "2024-00055420");
    }

    #[test]
    fn rejects_row_with_wrong_arity() {
        let mut rows = sample_rows();
        rows.push(vec!["8/1/2024 2:00".to_owned(), "orphan".to_owned()]);

        let err = IncidentTable::from_rows(rows).unwrap_err();
        let TableError::ColumnCount {
            row,
            found,
            expected,
        } = err;
        assert_eq!(row, 2);
        assert_eq!(found, 2);
        assert_eq!(expected, 5);
    }

    #[test]
    fn natures_returns_column_in_row_order() {
        let table = IncidentTable::from_rows(sample_rows()).unwrap();
        assert_eq!(table.natures(), vec!["Traffic Stop", "Suspicious Person"]);
    }

    #[test]
    fn clustered_table_column_names_include_hour_only_when_parsed() {
        let table = IncidentTable::from_rows(sample_rows()).unwrap();
        let mut clustered = ClusteredTable {
            table,
            clusters: vec![0, 1],
            pca_x: vec![0.1, -0.1],
            pca_y: vec![0.2, -0.2],
            hours: None,
        };

        assert_eq!(clustered.column_names().len(), 8);

        clustered.hours = Some(vec![0, 1]);
        assert_eq!(clustered.column_names().len(), 9);
        assert_eq!(clustered.row_values(1).last().unwrap(), "1");
    }
}
