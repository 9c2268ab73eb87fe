//! Three-filter MIRI image analysis pipeline.
//!
//! Loads calibrated exposures taken through the f770w, f1130w and f1500w
//! filters, stretches and composites them into an RGB image, and computes
//! per-filter summary statistics, a cross-filter correlation matrix and a
//! principal component decomposition of the pixel intensities.

pub mod config;
pub mod image_proc;
pub mod io;
pub mod loader;
pub mod plot;
pub mod stats;
pub mod wcs;

pub use config::{DisplayColor, FilterBand, FilterSpec, PipelineConfig};
pub use loader::FilterRecord;
