//! Pairwise cosine distance over embedding vectors.

use ndarray::Array2;

/// Builds an `n x d` matrix from row vectors, promoting to `f64`.
#[must_use]
pub fn to_matrix(vectors: &[Vec<f32>]) -> Array2<f64> {
    let rows = vectors.len();
    let cols = vectors.first().map_or(0, Vec::len);
    Array2::from_shape_fn((rows, cols), |(i, j)| f64::from(vectors[i][j]))
}

/// Computes the full pairwise cosine-distance matrix.
///
/// The result is symmetric with a zero diagonal and values in `[0, 2]`.
/// A zero vector has undefined direction; its distance to anything else
/// is taken as `1.0` (orthogonal), matching the convention of treating
/// an empty text as semantically neutral.
#[must_use]
pub fn cosine_distance_matrix(vectors: &[Vec<f32>]) -> Array2<f64> {
    let n = vectors.len();
    let matrix = to_matrix(vectors);

    let norms: Vec<f64> = (0..n)
        .map(|i| matrix.row(i).mapv(|x| x * x).sum().sqrt())
        .collect();

    let mut distances = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in (i + 1)..n {
            let denom = norms[i] * norms[j];
            let distance = if denom == 0.0 {
                1.0
            } else {
                let dot = matrix.row(i).dot(&matrix.row(j));
                (1.0 - dot / denom).clamp(0.0, 2.0)
            };
            distances[[i, j]] = distance;
            distances[[j, i]] = distance;
        }
    }

    distances
}
