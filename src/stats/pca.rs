//! Principal component analysis of the three-filter intensity table.
//!
//! Columns are z-score standardized, so the decomposition runs on the
//! correlation matrix. With three input variables there are always exactly
//! three components; no truncation is applied.

use nalgebra::{Matrix3, SymmetricEigen};
use ndarray::Array2;

use crate::stats::StatsError;

/// One component of the decomposition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrincipalComponent {
    /// Square root of the eigenvalue
    pub std_dev: f64,
    /// Fraction of total variance explained
    pub proportion: f64,
    /// Running total of `proportion`, ends at 1
    pub cumulative: f64,
}

/// Full decomposition: components ordered by descending explained variance
#[derive(Debug, Clone)]
pub struct PcaResult {
    pub components: [PrincipalComponent; 3],
    /// Eigenvectors as columns, same order as `components`
    pub rotation: [[f64; 3]; 3],
    /// Standardized rows projected into component space, n x 3
    pub scores: Array2<f64>,
}

/// Decompose the complete-observations table from
/// [`crate::stats::correlation::complete_rows`].
///
/// Needs at least two rows and nonzero variance in every column.
pub fn pca(rows: &[[f64; 3]]) -> Result<PcaResult, StatsError> {
    if rows.len() < 2 {
        return Err(StatsError::InsufficientRows {
            needed: 2,
            found: rows.len(),
        });
    }
    let n = rows.len() as f64;

    let mut mean = [0.0; 3];
    for row in rows {
        for c in 0..3 {
            mean[c] += row[c];
        }
    }
    for m in &mut mean {
        *m /= n;
    }

    let mut sd = [0.0; 3];
    for row in rows {
        for c in 0..3 {
            sd[c] += (row[c] - mean[c]).powi(2);
        }
    }
    for (c, s) in sd.iter_mut().enumerate() {
        *s = (*s / (n - 1.0)).sqrt();
        if *s < 1e-10 {
            return Err(StatsError::ZeroVariance(c));
        }
    }

    // Standardize, then form the correlation matrix Z^T Z / (n - 1)
    let mut z = Array2::<f64>::zeros((rows.len(), 3));
    for (r, row) in rows.iter().enumerate() {
        for c in 0..3 {
            z[[r, c]] = (row[c] - mean[c]) / sd[c];
        }
    }
    let mut corr = Matrix3::zeros();
    for i in 0..3 {
        for j in i..3 {
            let s = (0..rows.len()).map(|r| z[[r, i]] * z[[r, j]]).sum::<f64>() / (n - 1.0);
            corr[(i, j)] = s;
            corr[(j, i)] = s;
        }
    }

    let eigen = SymmetricEigen::new(corr);
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Tiny negative eigenvalues from roundoff count as zero
    let lambdas = order.map(|k| eigen.eigenvalues[k].max(0.0));
    let total: f64 = lambdas.iter().sum();

    let mut cumulative = 0.0;
    let mut components = [PrincipalComponent {
        std_dev: 0.0,
        proportion: 0.0,
        cumulative: 0.0,
    }; 3];
    for (k, &lambda) in lambdas.iter().enumerate() {
        let proportion = lambda / total;
        cumulative += proportion;
        components[k] = PrincipalComponent {
            std_dev: lambda.sqrt(),
            proportion,
            cumulative,
        };
    }

    let mut rotation = [[0.0; 3]; 3];
    for (k, &src) in order.iter().enumerate() {
        for j in 0..3 {
            rotation[j][k] = eigen.eigenvectors[(j, src)];
        }
    }

    let mut scores = Array2::<f64>::zeros((rows.len(), 3));
    for r in 0..rows.len() {
        for k in 0..3 {
            scores[[r, k]] = (0..3).map(|j| z[[r, j]] * rotation[j][k]).sum();
        }
    }

    Ok(PcaResult {
        components,
        rotation,
        scores,
    })
}
