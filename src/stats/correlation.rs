//! Cross-filter Pearson correlation over complete observations.
//!
//! A pixel position contributes only when all three filters are finite
//! there, so every pairwise coefficient is computed over the exact same
//! row set. Filtering per pair instead would silently misalign the table.

use ndarray::Array2;

/// Build the position-aligned intensity table: one row per pixel position
/// that is finite in all three images simultaneously.
///
/// The images must share one pixel grid; the loader guarantees this for
/// co-registered data.
pub fn complete_rows(images: [&Array2<f64>; 3]) -> Vec<[f64; 3]> {
    let [a, b, c] = images;
    assert_eq!(a.dim(), b.dim(), "filter images must share one pixel grid");
    assert_eq!(a.dim(), c.dim(), "filter images must share one pixel grid");

    let mut rows = Vec::new();
    for ((i, j), &x) in a.indexed_iter() {
        let y = b[[i, j]];
        let z = c[[i, j]];
        if x.is_finite() && y.is_finite() && z.is_finite() {
            rows.push([x, y, z]);
        }
    }
    rows
}

/// Pearson correlation coefficient between two columns of the table.
///
/// NaN when either column has (near) zero variance.
fn pearson(rows: &[[f64; 3]], col_a: usize, col_b: usize) -> f64 {
    if rows.is_empty() {
        return f64::NAN;
    }
    let n = rows.len() as f64;
    let mean_a = rows.iter().map(|r| r[col_a]).sum::<f64>() / n;
    let mean_b = rows.iter().map(|r| r[col_b]).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for row in rows {
        let da = row[col_a] - mean_a;
        let db = row[col_b] - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a < 1e-10 || var_b < 1e-10 {
        return f64::NAN;
    }
    cov / (var_a.sqrt() * var_b.sqrt())
}

/// Symmetric 3x3 correlation matrix with unit diagonal
pub fn correlation_matrix(rows: &[[f64; 3]]) -> [[f64; 3]; 3] {
    let mut matrix = [[1.0; 3]; 3];
    for i in 0..3 {
        for j in (i + 1)..3 {
            let r = pearson(rows, i, j);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}
