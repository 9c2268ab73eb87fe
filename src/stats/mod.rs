//! Descriptive statistics over pixel intensities.

pub mod correlation;
pub mod pca;

use ndarray::Array2;
use thiserror::Error;

/// Errors raised by the statistics engines
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("no finite values in sample")]
    NoFiniteValues,
    #[error("need at least {needed} complete pixel rows, found {found}")]
    InsufficientRows { needed: usize, found: usize },
    #[error("column {0} has zero variance")]
    ZeroVariance(usize),
}

/// Summary statistics for one filter, computed over finite values only
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterStats {
    pub mean: f64,
    pub median: f64,
    /// Sample (n - 1) standard deviation; zero for a single value
    pub std_dev: f64,
}

/// Median of a slice, filtering NaN but keeping infinities.
///
/// Even-length sets return the midpoint of the two middle values.
pub fn median(values: &[f64]) -> Result<f64, StatsError> {
    let mut valid: Vec<f64> = values.iter().filter(|v| !v.is_nan()).copied().collect();
    if valid.is_empty() {
        return Err(StatsError::NoFiniteValues);
    }
    valid.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = valid.len() / 2;
    if valid.len() % 2 == 0 {
        Ok((valid[mid - 1] + valid[mid]) / 2.0)
    } else {
        Ok(valid[mid])
    }
}

/// Mean, median and sample standard deviation of an image's finite pixels
pub fn summarize(image: &Array2<f64>) -> Result<FilterStats, StatsError> {
    let finite: Vec<f64> = image.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Err(StatsError::NoFiniteValues);
    }
    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let std_dev = if finite.len() > 1 {
        (finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    } else {
        0.0
    };
    Ok(FilterStats {
        mean,
        median: median(&finite)?,
        std_dev,
    })
}
