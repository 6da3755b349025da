//! Two-component principal component analysis for display coordinates.
//!
//! Mean-centers the embedding matrix, then extracts the top two
//! eigenvectors of the covariance matrix by power iteration with one
//! deflation step. The starting vector is deterministic, so results are
//! reproducible for a given input; component signs are still arbitrary,
//! as they are for any PCA implementation.

use ndarray::{Array1, Array2, Axis};

use crate::distance::to_matrix;

const MAX_ITERATIONS: usize = 300;
const CONVERGENCE: f64 = 1e-10;

/// Projects embedding vectors onto their top two principal components.
///
/// Returns `(x, y)` coordinate columns aligned with the input rows.
/// Degenerate inputs (a single row, or zero variance in every direction)
/// project to the origin.
#[must_use]
pub fn project_2d(vectors: &[Vec<f32>]) -> (Vec<f64>, Vec<f64>) {
    let n = vectors.len();
    if n == 0 {
        return (Vec::new(), Vec::new());
    }

    let mut data = to_matrix(vectors);
    let d = data.ncols();
    if n == 1 || d == 0 {
        return (vec![0.0; n], vec![0.0; n]);
    }

    // Mean-center each column.
    let mean = data.mean_axis(Axis(0)).expect("n >= 1");
    for mut row in data.rows_mut() {
        row -= &mean;
    }

    #[allow(clippy::cast_precision_loss)]
    let mut covariance = data.t().dot(&data) / (n - 1) as f64;

    let (first, first_var) = dominant_eigenvector(&covariance);
    deflate(&mut covariance, &first, first_var);
    let (second, _) = dominant_eigenvector(&covariance);

    let x = data.dot(&first);
    let y = data.dot(&second);

    (x.to_vec(), y.to_vec())
}

/// Power iteration for the dominant eigenpair of a symmetric matrix.
///
/// Returns a unit eigenvector and its eigenvalue; the zero matrix yields
/// a zero vector, which projects everything to the origin.
#[allow(clippy::cast_precision_loss)]
fn dominant_eigenvector(matrix: &Array2<f64>) -> (Array1<f64>, f64) {
    let d = matrix.nrows();

    // Deterministic, non-uniform start so the iterate is not orthogonal
    // to the dominant eigenvector by symmetry.
    let mut v = Array1::from_shape_fn(d, |i| 1.0 + ((i % 7) as f64) * 0.125);
    let norm = v.dot(&v).sqrt();
    v /= norm;

    let mut eigenvalue = 0.0;
    for _ in 0..MAX_ITERATIONS {
        let next = matrix.dot(&v);
        let norm = next.dot(&next).sqrt();
        if norm < CONVERGENCE {
            return (Array1::zeros(d), 0.0);
        }
        let next = next / norm;
        let delta = (&next - &v).mapv(f64::abs).sum().min(
            // Sign flips between iterations still mean convergence.
            (&next + &v).mapv(f64::abs).sum(),
        );
        v = next;
        eigenvalue = norm;
        if delta < CONVERGENCE {
            break;
        }
    }

    (v, eigenvalue)
}

/// Removes the projection onto `eigenvector` so the next power iteration
/// converges to the second component.
fn deflate(matrix: &mut Array2<f64>, eigenvector: &Array1<f64>, eigenvalue: f64) {
    let d = matrix.nrows();
    for i in 0..d {
        for j in 0..d {
            matrix[[i, j]] -= eigenvalue * eigenvector[i] * eigenvector[j];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_every_row() {
        let vectors = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ];
        let (x, y) = project_2d(&vectors);
        assert_eq!(x.len(), 4);
        assert_eq!(y.len(), 4);
        assert!(x.iter().chain(&y).all(|v| v.is_finite()));
    }

    #[test]
    fn first_component_captures_the_spread_axis() {
        // Points spread along one axis with a little noise on another:
        // the first component must separate the extremes far more than
        // the second does.
        let vectors = vec![
            vec![-10.0, 0.1],
            vec![-5.0, -0.1],
            vec![0.0, 0.1],
            vec![5.0, -0.1],
            vec![10.0, 0.1],
        ];
        let (x, y) = project_2d(&vectors);

        let spread = |c: &[f64]| -> f64 {
            let max = c.iter().copied().fold(f64::MIN, f64::max);
            let min = c.iter().copied().fold(f64::MAX, f64::min);
            max - min
        };
        assert!(spread(&x) > 15.0);
        assert!(spread(&y) < 1.0);
    }

    #[test]
    fn components_are_uncorrelated_up_to_sign() {
        let vectors = vec![
            vec![2.0, 1.0, 0.5],
            vec![-1.0, 2.0, 1.5],
            vec![0.5, -2.0, 2.0],
            vec![-2.0, -1.0, -0.5],
            vec![1.0, 0.5, -2.0],
        ];
        let (x, y) = project_2d(&vectors);

        let mean = |c: &[f64]| c.iter().sum::<f64>() / c.len() as f64;
        let mx = mean(&x);
        let my = mean(&y);
        let cov: f64 = x
            .iter()
            .zip(&y)
            .map(|(a, b)| (a - mx) * (b - my))
            .sum::<f64>()
            / (x.len() - 1) as f64;
        let var_x: f64 =
            x.iter().map(|a| (a - mx) * (a - mx)).sum::<f64>() / (x.len() - 1) as f64;

        // Projections onto distinct eigenvectors of the covariance are
        // uncorrelated; allow numerical slack relative to the scale.
        assert!(cov.abs() < var_x.max(1.0) * 1e-3);
    }

    #[test]
    fn single_row_projects_to_origin() {
        let (x, y) = project_2d(&[vec![3.0, 4.0, 5.0]]);
        assert_eq!(x, vec![0.0]);
        assert_eq!(y, vec![0.0]);
    }

    #[test]
    fn identical_rows_project_to_origin() {
        let vectors = vec![vec![1.0, 2.0]; 3];
        let (x, y) = project_2d(&vectors);
        assert!(x.iter().all(|&v| v.abs() < 1e-9));
        assert!(y.iter().all(|&v| v.abs() < 1e-9));
    }

    #[test]
    fn empty_input_projects_to_nothing() {
        let (x, y) = project_2d(&[]);
        assert!(x.is_empty());
        assert!(y.is_empty());
    }
}
