//! Header and footer line classification.
//!
//! Incident-summary PDFs repeat the department banner, report title, and
//! column header labels on every page. Those lines carry no record data and
//! must be filtered out before field splitting.

/// Marker substrings identifying header/footer lines: the organization
/// name, the report title, and the five column header labels. The date
/// label is listed as the source layout prints it, with a space after the
/// slash.
pub const HEADER_MARKERS: [&str; 7] = [
    "NORMAN POLICE DEPARTMENT",
    "Daily Incident Summary (Public)",
    "Date/ Time",
    "Incident Number",
    "Location",
    "Nature",
    "Incident ORI",
];

/// Returns `true` if `line` is a page header or footer line.
///
/// Case-sensitive substring containment against [`HEADER_MARKERS`].
#[must_use]
pub fn is_header_line(line: &str) -> bool {
    HEADER_MARKERS.iter().any(|marker| line.contains(marker))
}
