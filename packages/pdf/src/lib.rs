#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record extraction from police incident-summary PDFs.
//!
//! Daily incident summaries are published as PDFs with a layout-preserving
//! tabular format: five space-padded columns, page headers repeated on every
//! page, and long `Location`/`Nature` values wrapped onto continuation
//! lines. This crate extracts structured [`IncidentRecord`]s from those
//! documents using pure-Rust text extraction ([`pdf_extract`]) combined
//! with line-oriented parsing ([`classify`] + [`table`]).
//!
//! The primary entry point is [`extract_incidents`], which takes raw PDF
//! bytes and returns either the document's records or an [`ExtractError`]
//! that distinguishes "could not read the document" from "the document
//! yielded no records".

pub mod classify;
pub mod table;

use blotter_incident_models::IncidentRecord;

pub use table::CONTINUATION_FIELD;

/// Errors specific to incident extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The document could not be opened or its structure parsed at all.
    #[error("could not read document: {0}")]
    Unreadable(String),

    /// The document opened but produced zero incident records (e.g. all
    /// pages image-only or the layout was not recognized).
    #[error("document yielded no incident records")]
    NoRecords,
}

/// Extracts incident records from a PDF held in memory.
///
/// Pages that yield no extractable text are skipped without aborting the
/// document.
///
/// # Errors
///
/// Returns [`ExtractError::Unreadable`] if the PDF cannot be parsed and
/// [`ExtractError::NoRecords`] if no page produced a valid record.
pub fn extract_incidents(bytes: &[u8]) -> Result<Vec<IncidentRecord>, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractError::Unreadable(format!("failed to extract text from PDF: {e}")))?;

    log::debug!("Extracted text from {} page(s)", pages.len());

    let parser = table::RecordParser::new();
    let records = parser.parse_pages(pages.iter().map(String::as_str));

    if records.is_empty() {
        return Err(ExtractError::NoRecords);
    }

    log::info!("Extracted {} incident record(s)", records.len());

    Ok(records)
}
