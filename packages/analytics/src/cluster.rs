//! Hierarchical agglomerative clustering over a precomputed distance
//! matrix.
//!
//! Bottom-up merging with average linkage: the distance between two
//! clusters is the mean pairwise distance between their members,
//! maintained incrementally through the size-weighted Lance-Williams
//! update. Merging stops either at a fixed cluster count or once the
//! closest remaining pair is further apart than a distance threshold.

use ndarray::Array2;

/// Threshold used when no cluster count is fixed: clusters are merged
/// until the smallest inter-cluster average distance would exceed it.
pub const AUTO_DISTANCE_THRESHOLD: f64 = 0.5;

/// Stopping rule for the merge loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stop {
    /// Merge until exactly this many clusters remain (capped at the row
    /// count).
    Count(usize),
    /// Merge while the closest pair is below this distance; the final
    /// cluster count falls out of the data.
    Threshold(f64),
}

/// Cluster id per row, aligned with the distance matrix's row order.
pub type ClusterAssignment = Vec<usize>;

/// Clusters rows by average-linkage agglomeration.
///
/// `distances` must be square and symmetric with a zero diagonal, as
/// produced by [`crate::distance::cosine_distance_matrix`]. Ids are
/// assigned in first-row order, so they are deterministic for a given
/// matrix but carry no meaning across runs.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn agglomerate(distances: &Array2<f64>, stop: Stop) -> ClusterAssignment {
    let n = distances.nrows();
    if n == 0 {
        return Vec::new();
    }

    let mut linkage = distances.clone();
    let mut active: Vec<bool> = vec![true; n];
    let mut sizes: Vec<usize> = vec![1; n];
    let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();

    let mut remaining = n;
    let target = match stop {
        Stop::Count(k) => k.clamp(1, n),
        Stop::Threshold(_) => 1,
    };

    while remaining > target {
        let Some((i, j, closest)) = closest_pair(&linkage, &active) else {
            break;
        };

        if let Stop::Threshold(threshold) = stop
            && closest >= threshold
        {
            break;
        }

        // Lance-Williams average-linkage update: fold cluster j into i.
        for m in 0..n {
            if !active[m] || m == i || m == j {
                continue;
            }
            let merged = sizes[i] as f64 * linkage[[i, m]] + sizes[j] as f64 * linkage[[j, m]];
            let merged = merged / (sizes[i] + sizes[j]) as f64;
            linkage[[i, m]] = merged;
            linkage[[m, i]] = merged;
        }

        let absorbed = std::mem::take(&mut members[j]);
        members[i].extend(absorbed);
        sizes[i] += sizes[j];
        active[j] = false;
        remaining -= 1;
    }

    assign_labels(n, &active, &members)
}

/// Finds the closest active pair `(i, j, distance)` with `i < j`.
fn closest_pair(linkage: &Array2<f64>, active: &[bool]) -> Option<(usize, usize, f64)> {
    let n = active.len();
    let mut best: Option<(usize, usize, f64)> = None;

    for i in 0..n {
        if !active[i] {
            continue;
        }
        for j in (i + 1)..n {
            if !active[j] {
                continue;
            }
            let d = linkage[[i, j]];
            if best.is_none_or(|(_, _, b)| d < b) {
                best = Some((i, j, d));
            }
        }
    }

    best
}

/// Numbers the surviving clusters by their smallest member row index and
/// writes the id onto every member.
fn assign_labels(n: usize, active: &[bool], members: &[Vec<usize>]) -> ClusterAssignment {
    let mut clusters: Vec<&Vec<usize>> = (0..n)
        .filter(|&i| active[i])
        .map(|i| &members[i])
        .collect();
    clusters.sort_by_key(|m| m.iter().min().copied().unwrap_or(usize::MAX));

    let mut labels = vec![0usize; n];
    for (id, cluster) in clusters.iter().enumerate() {
        for &row in *cluster {
            labels[row] = id;
        }
    }
    labels
}
