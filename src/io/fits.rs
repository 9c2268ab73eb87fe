//! FITS reading for calibrated exposures.
//!
//! Reads the 2D science image and collects the WCS keywords into the ordered
//! card sequence consumed by [`crate::wcs`].

use fitsio::hdu::FitsHdu;
use fitsio::FitsFile;
use ndarray::Array2;
use std::path::Path;
use thiserror::Error;

use crate::wcs::REQUIRED_KEYS;

/// Errors that can occur while reading an exposure
#[derive(Error, Debug)]
pub enum FitsError {
    #[error("FITS I/O error: {0}")]
    FitsIo(#[from] fitsio::errors::Error),
    #[error("HDU does not contain a 2D image (NAXIS = {0})")]
    NotAnImage(i64),
    #[error("image data does not match NAXIS1 x NAXIS2 = {naxis1} x {naxis2}")]
    ShapeMismatch { naxis1: usize, naxis2: usize },
}

/// Read the science image and its WCS header cards from a FITS file.
///
/// Calibrated products keep the image in the `SCI` extension; files without
/// one fall back to the primary HDU. The returned card sequence holds only
/// the WCS keywords that were actually present, each followed by its value;
/// completeness is checked by the WCS extractor, not here.
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<(Array2<f64>, Vec<String>), FitsError> {
    let mut fptr = FitsFile::open(&path)?;
    let hdu = science_hdu(&mut fptr)?;

    let naxis = hdu.read_key::<i64>(&mut fptr, "NAXIS")?;
    if naxis != 2 {
        return Err(FitsError::NotAnImage(naxis));
    }
    let naxis1 = hdu.read_key::<i64>(&mut fptr, "NAXIS1")? as usize;
    let naxis2 = hdu.read_key::<i64>(&mut fptr, "NAXIS2")? as usize;

    let data: Vec<f64> = hdu.read_image(&mut fptr)?;
    let image = Array2::from_shape_vec((naxis2, naxis1), data)
        .map_err(|_| FitsError::ShapeMismatch { naxis1, naxis2 })?;

    let mut cards = Vec::new();
    for key in REQUIRED_KEYS {
        if let Ok(value) = hdu.read_key::<f64>(&mut fptr, key) {
            cards.push(key.to_string());
            cards.push(value.to_string());
        }
    }

    Ok((image, cards))
}

fn science_hdu(fptr: &mut FitsFile) -> Result<FitsHdu, fitsio::errors::Error> {
    match fptr.hdu("SCI") {
        Ok(hdu) => Ok(hdu),
        Err(_) => fptr.hdu(0),
    }
}
