//! Percentile-based contrast stretching.
//!
//! The stretch maps raw intensities into [0, 1] using the 5th/95th
//! percentile window of the finite values, which is robust to outlier
//! bright pixels (cosmic rays, saturated cores) in a way min/max scaling
//! is not.

use ndarray::Array2;

use crate::stats::median;

/// Lower edge of the stretch window
const Q_LO: f64 = 0.05;
/// Upper edge of the stretch window
const Q_HI: f64 = 0.95;

/// Linear-interpolation percentile of an already-sorted slice.
///
/// `p` is a fraction in [0, 1]. The caller is responsible for sorting and
/// for filtering non-finite values.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    debug_assert!((0.0..=1.0).contains(&p));
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    if lo + 1 >= sorted.len() {
        return sorted[sorted.len() - 1];
    }
    sorted[lo] + (h - lo as f64) * (sorted[lo + 1] - sorted[lo])
}

/// Stretch an image into [0, 1] using its 5th/95th percentile window.
///
/// Every element is scaled as `(x - q05) / (q95 - q05) * contrast` and
/// clamped to [0, 1]. NaN inputs propagate through the scaling and the
/// clamp; infinities clamp to the nearest bound. Fewer than two finite
/// values, or a flat percentile window, yields an all-zero array of the
/// same shape rather than an error.
pub fn zscale_normalize(x: &Array2<f64>, contrast: f64) -> Array2<f64> {
    let mut finite: Vec<f64> = x.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 {
        return Array2::zeros(x.dim());
    }
    finite.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let q05 = percentile(&finite, Q_LO);
    let q95 = percentile(&finite, Q_HI);
    let span = q95 - q05;
    if span.abs() < f64::EPSILON {
        return Array2::zeros(x.dim());
    }

    x.mapv(|v| ((v - q05) / span * contrast).clamp(0.0, 1.0))
}

/// Prepare one raw image for display: impute NaN with the image median,
/// stretch, then gamma-correct.
///
/// The median is computed over non-NaN values; when none exist the
/// imputation is skipped and the stretch falls back to zeros on its own.
/// Used by both the composite builder and the single-filter display path.
pub fn preprocess_channel(x: &Array2<f64>, contrast: f64, gamma: f64) -> Array2<f64> {
    let values: Vec<f64> = x.iter().copied().collect();
    let normalized = match median(&values) {
        Ok(med) => {
            let imputed = x.mapv(|v| if v.is_nan() { med } else { v });
            zscale_normalize(&imputed, contrast)
        }
        Err(_) => zscale_normalize(x, contrast),
    };
    normalized.mapv(|v| v.powf(gamma))
}
