//! Line-oriented parsing of the five-column incident table.
//!
//! The layout-preserving text extraction pads columns with variable runs of
//! whitespace, so fields are split on runs of five or more whitespace
//! characters rather than at fixed positions. Wrapped continuation lines
//! produce fewer than five fields and are merged into the most recently
//! emitted record.

use blotter_incident_models::{FIELD_COUNT, IncidentRecord};

use crate::classify::is_header_line;

/// Index of the record field that continuation-line text is appended to.
///
/// The published reports wrap overlong values onto a following line;
/// wrapped text folds into the `Location` field (index 2) of the
/// preceding record. Kept as a constant so the target column is a
/// one-line audit and a one-line change.
pub const CONTINUATION_FIELD: usize = 2;

/// A run of five or more whitespace characters separates fields.
const FIELD_DELIMITER: &str = r"[ \t\r\n]{5,}";

/// Splits page text into five-field incident records.
///
/// Holds the compiled field delimiter so a single parser can be reused
/// across the pages of a document.
pub struct RecordParser {
    delimiter: regex::Regex,
}

impl RecordParser {
    /// Creates a parser with the standard field delimiter.
    ///
    /// # Panics
    ///
    /// Panics if the built-in delimiter pattern fails to compile, which
    /// cannot happen for the constant pattern.
    #[must_use]
    pub fn new() -> Self {
        Self {
            delimiter: regex::Regex::new(FIELD_DELIMITER).expect("valid delimiter pattern"),
        }
    }

    /// Parses all pages of a document into finalized records.
    ///
    /// Records accumulate across page boundaries: a continuation line at
    /// the top of a page merges into the last record of the previous page.
    /// Pages without extractable text contribute nothing.
    #[must_use]
    pub fn parse_pages<'a>(&self, pages: impl IntoIterator<Item = &'a str>) -> Vec<IncidentRecord> {
        let mut rows: Vec<[String; FIELD_COUNT]> = Vec::new();

        for (page_idx, page) in pages.into_iter().enumerate() {
            if page.trim().is_empty() {
                log::debug!("Page {} yielded no text, skipping", page_idx + 1);
                continue;
            }
            for line in page.split('\n') {
                self.parse_line(line, &mut rows);
            }
        }

        rows.into_iter()
            .map(
                |[date_time, incident_number, location, nature, incident_ori]| IncidentRecord {
                    date_time,
                    incident_number,
                    location,
                    nature,
                    incident_ori,
                },
            )
            .collect()
    }

    /// Processes one line of page text against the accumulated rows.
    fn parse_line(&self, line: &str, rows: &mut Vec<[String; FIELD_COUNT]>) {
        if is_header_line(line) {
            return;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }

        let fields: Vec<&str> = self.delimiter.split(trimmed).collect();

        if fields.len() == FIELD_COUNT {
            let row: [String; FIELD_COUNT] = std::array::from_fn(|i| fields[i].to_owned());
            rows.push(row);
        } else if fields.len() < FIELD_COUNT {
            // Wrapped continuation of the previous record. A short line
            // before the first record has nothing to attach to and is
            // dropped.
            if let Some(last) = rows.last_mut() {
                last[CONTINUATION_FIELD].push_str(&fields.join(" "));
            }
        } else {
            log::warn!(
                "Line split into {} fields, expected at most {FIELD_COUNT}: {trimmed:?}",
                fields.len()
            );
        }
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA_LINE: &str =
        "8/1/2024 0:04        2024-00055419        1345 W LINDSEY ST        Traffic Stop         OK0140200";

    fn parse(pages: &[&str]) -> Vec<IncidentRecord> {
        RecordParser::new().parse_pages(pages.iter().copied())
    }

    #[test]
    fn parses_five_field_line_into_record() {
        let records = parse(&[DATA_LINE]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date_time, "8/1/2024 0:04");
        assert_eq!(records[0].incident_number, "2024-00055419");
        assert_eq!(records[0].location, "1345 W LINDSEY ST");
        assert_eq!(records[0].nature, "Traffic Stop");
        assert_eq!(records[0].incident_ori, "OK0140200");
    }

    #[test]
    fn tolerates_tabs_and_wide_padding() {
        let line = "8/1/2024 1:15\t\t\t\t\t2024-00055420      789 E MAIN ST\t     Suspicious Person     \t    OK0140201";
        let records = parse(&[line]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].nature, "Suspicious Person");
    }

    #[test]
    fn short_runs_of_whitespace_stay_inside_a_field() {
        // "W LINDSEY ST" contains single spaces; only runs of >= 5 split.
        let records = parse(&[DATA_LINE]);
        assert_eq!(records[0].location, "1345 W LINDSEY ST");
    }

    #[test]
    fn merges_continuation_line_into_previous_record() {
        let page = format!("{DATA_LINE}\nRAMP");
        let records = parse(&[&page]);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].location, "1345 W LINDSEY STRAMP",
            "continuation text is appended to field {CONTINUATION_FIELD} with no separator"
        );
    }

    #[test]
    fn joins_multi_field_continuation_with_single_spaces() {
        let page = format!("{DATA_LINE}\nHWY 9 EB      MM 112");
        let records = parse(&[&page]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location, "1345 W LINDSEY STHWY 9 EB MM 112");
    }

    #[test]
    fn continuation_crosses_page_boundary() {
        let records = parse(&[DATA_LINE, "EXT"]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location, "1345 W LINDSEY STEXT");
    }

    #[test]
    fn drops_short_line_before_any_record() {
        let records = parse(&["stray text", DATA_LINE]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location, "1345 W LINDSEY ST");
    }

    #[test]
    fn skips_header_lines() {
        let page = format!(
            "NORMAN POLICE DEPARTMENT\nDaily Incident Summary (Public)\nDate/ Time           Incident Number      Location             Nature               Incident ORI\n{DATA_LINE}"
        );
        let records = parse(&[&page]);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn skips_empty_pages() {
        let records = parse(&["", "   \n  ", DATA_LINE]);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn empty_document_yields_no_records() {
        assert!(parse(&[]).is_empty());
    }
}
