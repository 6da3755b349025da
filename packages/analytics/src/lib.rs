#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Semantic clustering, projection, and trend analysis for incident tables.
//!
//! The analysis pipeline encodes the `Nature` column into dense vectors,
//! computes the pairwise cosine-distance matrix ([`distance`]), groups rows
//! by hierarchical agglomerative clustering with average linkage
//! ([`cluster`]), and projects the vectors to two dimensions for display
//! ([`pca`]). The hourly incident trend ([`trend`]) is computed separately
//! since it only depends on the `Date/Time` column.
//!
//! [`cluster_table`] is the orchestrating entry point: it takes an
//! [`IncidentTable`] and returns a new [`ClusteredTable`] rather than
//! mutating shared state.

pub mod cluster;
pub mod distance;
pub mod pca;
pub mod trend;

use blotter_embedding::{EncodeError, TextEncoder, encode_all};
use blotter_incident_models::{ClusteredTable, IncidentTable};

/// Largest selectable cluster count.
pub const MAX_CLUSTERS: usize = 10;

/// Errors that can occur during incident analysis.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// The table has no rows to analyze.
    #[error("incident table is empty")]
    EmptyTable,

    /// The requested cluster count is outside `0..=MAX_CLUSTERS`.
    #[error("requested {requested} clusters, supported range is 0-{max}")]
    ClusterCount {
        /// The requested cluster count.
        requested: usize,
        /// The largest supported count.
        max: usize,
    },

    /// Text encoding failed.
    #[error("encoding failed: {0}")]
    Encode(#[from] EncodeError),
}

/// Options for [`cluster_table`].
#[derive(Debug, Clone)]
pub struct ClusterOptions {
    /// Target cluster count in `1..=MAX_CLUSTERS`, or `0` to infer the
    /// count from the distance threshold.
    pub clusters: usize,
    /// Rows encoded per backend call.
    pub batch_size: usize,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            clusters: 0,
            batch_size: blotter_embedding::DEFAULT_BATCH_SIZE,
        }
    }
}

/// Runs the full semantic-clustering pipeline over a table.
///
/// The returned [`ClusteredTable`] carries the cluster id and the 2-D
/// projection coordinates per row; the `Hour` column is left unset (see
/// [`trend::hours`]). Cluster ids are stable within a run only, and the
/// projection's component signs may flip between encoder backends.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyTable`] for a row-less table,
/// [`AnalyticsError::ClusterCount`] if `options.clusters` exceeds
/// [`MAX_CLUSTERS`], and [`AnalyticsError::Encode`] if the encoder backend
/// fails.
pub async fn cluster_table(
    table: IncidentTable,
    encoder: &dyn TextEncoder,
    options: &ClusterOptions,
) -> Result<ClusteredTable, AnalyticsError> {
    if table.is_empty() {
        return Err(AnalyticsError::EmptyTable);
    }
    if options.clusters > MAX_CLUSTERS {
        return Err(AnalyticsError::ClusterCount {
            requested: options.clusters,
            max: MAX_CLUSTERS,
        });
    }

    let natures = table.natures();
    let embeddings = encode_all(encoder, &natures, options.batch_size).await?;

    let distances = distance::cosine_distance_matrix(&embeddings);
    let stop = if options.clusters == 0 {
        cluster::Stop::Threshold(cluster::AUTO_DISTANCE_THRESHOLD)
    } else {
        cluster::Stop::Count(options.clusters)
    };
    let clusters = cluster::agglomerate(&distances, stop);

    let cluster_count = clusters.iter().max().map_or(0, |&m| m + 1);
    log::info!(
        "Clustered {} row(s) into {cluster_count} cluster(s)",
        table.len()
    );

    let (pca_x, pca_y) = pca::project_2d(&embeddings);

    Ok(ClusteredTable {
        table,
        clusters,
        pca_x,
        pca_y,
        hours: None,
    })
}
