//! WCS keyword extraction from header card sequences.
//!
//! Works on a flattened, ordered sequence of header tokens where every
//! keyword is immediately followed by its value, which keeps the extractor
//! independent of the FITS reader and trivially testable.

use thiserror::Error;

/// Keywords that must be present for a usable WCS solution
pub const REQUIRED_KEYS: [&str; 6] = [
    "CRPIX1", "CRPIX2", "CDELT1", "CDELT2", "CRVAL1", "CRVAL2",
];

/// Errors raised while extracting WCS keywords
#[derive(Error, Debug)]
pub enum WcsError {
    #[error("required header keyword missing: {0}")]
    MissingKey(String),
    #[error("header keyword {key} has non-numeric value: {value}")]
    BadValue { key: String, value: String },
}

/// Reduced six-parameter WCS description of one exposure.
///
/// `cdelt1`/`cdelt2` are stored in arcseconds per pixel, converted from the
/// degrees-per-pixel values carried in the header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WcsInfo {
    /// Reference pixel (x)
    pub crpix1: f64,
    /// Reference pixel (y)
    pub crpix2: f64,
    /// Pixel scale along axis 1, arcsec/pixel
    pub cdelt1: f64,
    /// Pixel scale along axis 2, arcsec/pixel
    pub cdelt2: f64,
    /// World coordinate at the reference pixel (RA, degrees)
    pub crval1: f64,
    /// World coordinate at the reference pixel (Dec, degrees)
    pub crval2: f64,
}

impl WcsInfo {
    /// Extract the six required keywords from an ordered header sequence.
    ///
    /// The value of each keyword is the token immediately following it.
    /// Fails naming the first missing keyword.
    pub fn from_header(cards: &[String]) -> Result<Self, WcsError> {
        let get = |key: &str| -> Result<f64, WcsError> {
            let idx = cards
                .iter()
                .position(|c| c == key)
                .ok_or_else(|| WcsError::MissingKey(key.to_string()))?;
            let value = cards
                .get(idx + 1)
                .ok_or_else(|| WcsError::MissingKey(key.to_string()))?;
            value.trim().parse::<f64>().map_err(|_| WcsError::BadValue {
                key: key.to_string(),
                value: value.clone(),
            })
        };

        // Degrees to arcseconds for the pixel scales
        Ok(Self {
            crpix1: get("CRPIX1")?,
            crpix2: get("CRPIX2")?,
            cdelt1: get("CDELT1")? * 3600.0,
            cdelt2: get("CDELT2")? * 3600.0,
            crval1: get("CRVAL1")?,
            crval2: get("CRVAL2")?,
        })
    }

    /// Absolute pixel scale along axis 1, arcsec/pixel
    pub fn pixel_scale(&self) -> f64 {
        self.cdelt1.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn complete_header() -> Vec<String> {
        [
            "CRPIX1", "512.0", "CRPIX2", "510.5", "CDELT1", "-0.0001", "CDELT2", "0.0001",
            "CRVAL1", "260.92", "CRVAL2", "-21.49",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_extracts_all_six_keywords() {
        let wcs = WcsInfo::from_header(&complete_header()).unwrap();
        assert_eq!(wcs.crpix1, 512.0);
        assert_eq!(wcs.crpix2, 510.5);
        assert_eq!(wcs.crval1, 260.92);
        assert_eq!(wcs.crval2, -21.49);
    }

    #[test]
    fn test_cdelt_converted_to_arcsec() {
        let wcs = WcsInfo::from_header(&complete_header()).unwrap();
        assert_relative_eq!(wcs.cdelt2, 0.36, epsilon = 1e-12);
        assert_relative_eq!(wcs.cdelt1, -0.36, epsilon = 1e-12);
        assert_relative_eq!(wcs.pixel_scale(), 0.36, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_keyword_is_named() {
        let cards: Vec<String> = complete_header()
            .chunks(2)
            .filter(|pair| pair[0] != "CDELT2")
            .flatten()
            .cloned()
            .collect();
        let err = WcsInfo::from_header(&cards).unwrap_err();
        match err {
            WcsError::MissingKey(key) => assert_eq!(key, "CDELT2"),
            other => panic!("expected MissingKey, got {other:?}"),
        }
    }

    #[test]
    fn test_keyword_at_end_without_value() {
        let mut cards = complete_header();
        cards.truncate(11); // drop the CRVAL2 value, keep the keyword
        let err = WcsInfo::from_header(&cards).unwrap_err();
        assert!(err.to_string().contains("CRVAL2"));
    }

    #[test]
    fn test_non_numeric_value() {
        let mut cards = complete_header();
        cards[1] = "not-a-number".to_string();
        let err = WcsInfo::from_header(&cards).unwrap_err();
        match err {
            WcsError::BadValue { key, .. } => assert_eq!(key, "CRPIX1"),
            other => panic!("expected BadValue, got {other:?}"),
        }
    }

    #[test]
    fn test_order_of_unrelated_cards_is_ignored() {
        let mut cards = vec!["TELESCOP".to_string(), "JWST".to_string()];
        cards.extend(complete_header());
        assert!(WcsInfo::from_header(&cards).is_ok());
    }
}
