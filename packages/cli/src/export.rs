//! Table export for the rendering layer.
//!
//! Writes the (optionally clustered) incident table as JSON (an array of
//! objects keyed by column name) or CSV with a header row, to a file or
//! stdout.

use std::io::Write as _;
use std::path::Path;

use blotter_incident_models::{COLUMNS, ClusteredTable, IncidentTable};
use strum_macros::{Display, EnumString};

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Array of objects keyed by column name.
    Json,
    /// Header row plus one line per record.
    Csv,
}

/// Writes a clustered table.
///
/// # Errors
///
/// Returns an error if serialization or the underlying write fails.
pub fn write_clustered(
    table: &ClusteredTable,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let names = table.column_names();
    let rows: Vec<Vec<String>> = (0..table.table.len()).map(|i| table.row_values(i)).collect();
    write_rows(&names, &rows, format, output)
}

/// Writes a raw extraction table.
///
/// # Errors
///
/// Returns an error if serialization or the underlying write fails.
pub fn write_table(
    table: &IncidentTable,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let names = COLUMNS.to_vec();
    let rows: Vec<Vec<String>> = table
        .records()
        .iter()
        .map(|r| r.fields().iter().map(|&f| f.to_owned()).collect())
        .collect();
    write_rows(&names, &rows, format, output)
}

fn write_rows(
    names: &[&str],
    rows: &[Vec<String>],
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let rendered = match format {
        OutputFormat::Json => render_json(names, rows)?,
        OutputFormat::Csv => render_csv(names, rows)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            log::info!("Wrote {} row(s) to {}", rows.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
        }
    }

    Ok(())
}

fn render_json(names: &[&str], rows: &[Vec<String>]) -> Result<String, serde_json::Error> {
    let objects: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            let map: serde_json::Map<String, serde_json::Value> = names
                .iter()
                .zip(row)
                .map(|(&name, value)| {
                    (name.to_owned(), serde_json::Value::String(value.clone()))
                })
                .collect();
            serde_json::Value::Object(map)
        })
        .collect();

    let mut rendered = serde_json::to_string_pretty(&objects)?;
    rendered.push('\n');
    Ok(rendered)
}

fn render_csv(names: &[&str], rows: &[Vec<String>]) -> Result<String, Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(names)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> IncidentTable {
        IncidentTable::from_rows(vec![
            vec![
                "8/1/2024 0:04".to_owned(),
                "2024-00055419".to_owned(),
                "1345 W LINDSEY ST".to_owned(),
                "Traffic Stop".to_owned(),
                "OK0140200".to_owned(),
            ],
        ])
        .unwrap()
    }

    #[test]
    fn output_format_parses_lowercase_names() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("parquet".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn json_rows_are_keyed_by_column_name() {
        let table = sample_table();
        let rows: Vec<Vec<String>> = table
            .records()
            .iter()
            .map(|r| r.fields().iter().map(|&f| f.to_owned()).collect())
            .collect();
        let rendered = render_json(&COLUMNS.to_vec(), &rows).unwrap();

        let parsed: Vec<serde_json::Value> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["Nature"], "Traffic Stop");
        assert_eq!(parsed[0]["Incident ORI"], "OK0140200");
    }

    #[test]
    fn csv_includes_header_and_quotes_embedded_commas() {
        let names = vec!["Nature", "Location"];
        let rows = vec![vec!["Theft, petty".to_owned(), "100 MAIN ST".to_owned()]];
        let rendered = render_csv(&names, &rows).unwrap();

        let mut lines = rendered.lines();
        assert_eq!(lines.next(), Some("Nature,Location"));
        assert_eq!(lines.next(), Some("\"Theft, petty\",100 MAIN ST"));
    }

    #[test]
    fn clustered_export_carries_analysis_columns() {
        let clustered = ClusteredTable {
            table: sample_table(),
            clusters: vec![0],
            pca_x: vec![0.5],
            pca_y: vec![-0.5],
            hours: Some(vec![0]),
        };
        let names = clustered.column_names();
        let rendered = render_json(&names, &[clustered.row_values(0)]).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed[0]["Cluster"], "0");
        assert_eq!(parsed[0]["PCA_X"], "0.5");
        assert_eq!(parsed[0]["Hour"], "0");
    }
}
