//! Per-filter loading of calibrated exposures.

use ndarray::Array2;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::{DisplayColor, FilterBand, FilterSpec};
use crate::io::fits::{self, FitsError};
use crate::wcs::{WcsError, WcsInfo};

/// Observation identifier shared by all products of this program
const OBSERVATION_STEM: &str = "jw06553-o001_t001_miri";

/// Errors raised while loading one filter's exposure
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {band} exposure: {source}")]
    Fits { band: FilterBand, source: FitsError },
    #[error("incomplete WCS in {band} header: {source}")]
    Wcs { band: FilterBand, source: WcsError },
}

/// One filter's loaded exposure. Immutable after creation.
#[derive(Debug, Clone)]
pub struct FilterRecord {
    pub band: FilterBand,
    pub image: Array2<f64>,
    pub wcs: WcsInfo,
    pub color: DisplayColor,
}

/// Path of the calibrated 2D image for a filter
pub fn image_path(spec: &FilterSpec) -> PathBuf {
    spec.dir
        .join(format!("{OBSERVATION_STEM}_{}_i2d.fits", spec.band.name()))
}

/// Path of the companion source catalog. Computed for reference; the
/// numeric pipeline never reads it, so it need not exist.
pub fn catalog_path(spec: &FilterSpec) -> PathBuf {
    spec.dir
        .join(format!("{OBSERVATION_STEM}_{}_cat.ecsv", spec.band.name()))
}

/// Load one filter: read the image and header, extract the WCS, and
/// assemble the record
pub fn load_filter(spec: &FilterSpec) -> Result<FilterRecord, LoadError> {
    let path = image_path(spec);
    let (image, cards) = fits::read_image(&path).map_err(|source| LoadError::Fits {
        band: spec.band,
        source,
    })?;
    let wcs = WcsInfo::from_header(&cards).map_err(|source| LoadError::Wcs {
        band: spec.band,
        source,
    })?;
    Ok(FilterRecord {
        band: spec.band,
        image,
        wcs,
        color: spec.color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn spec(band: FilterBand) -> FilterSpec {
        FilterSpec {
            band,
            dir: Path::new("/data").join(band.name()),
            color: DisplayColor { r: 255, g: 0, b: 0 },
        }
    }

    #[test]
    fn test_image_path_convention() {
        let path = image_path(&spec(FilterBand::F1130W));
        assert_eq!(
            path,
            PathBuf::from("/data/f1130w/jw06553-o001_t001_miri_f1130w_i2d.fits")
        );
    }

    #[test]
    fn test_catalog_path_convention() {
        let path = catalog_path(&spec(FilterBand::F770W));
        assert_eq!(
            path,
            PathBuf::from("/data/f770w/jw06553-o001_t001_miri_f770w_cat.ecsv")
        );
    }

    #[test]
    fn test_load_missing_file_names_the_band() {
        let err = load_filter(&spec(FilterBand::F1500W)).unwrap_err();
        assert!(err.to_string().contains("f1500w"));
        assert!(matches!(err, LoadError::Fits { .. }));
    }
}
