//! Pipeline configuration: the fixed three-filter table and display parameters.
//!
//! The filter table is an explicit struct handed to the pipeline entry points
//! rather than module-level state, so alternate tables can be substituted in
//! tests without touching globals.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while building a pipeline configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid hex color: {0}")]
    BadColor(String),
}

/// MIRI filter bands covered by this pipeline, in increasing wavelength order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterBand {
    F770W,
    F1130W,
    F1500W,
}

impl FilterBand {
    /// All supported bands, shortest wavelength first
    pub const ALL: [FilterBand; 3] = [FilterBand::F770W, FilterBand::F1130W, FilterBand::F1500W];

    /// Lowercase band name as used in file names
    pub fn name(&self) -> &'static str {
        match self {
            FilterBand::F770W => "f770w",
            FilterBand::F1130W => "f1130w",
            FilterBand::F1500W => "f1500w",
        }
    }

    /// Central wavelength in microns, used to assign RGB roles
    pub fn wavelength_um(&self) -> f64 {
        match self {
            FilterBand::F770W => 7.7,
            FilterBand::F1130W => 11.3,
            FilterBand::F1500W => 15.0,
        }
    }
}

impl fmt::Display for FilterBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display color assigned to a filter for single-band views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl DisplayColor {
    /// Parse a `#rrggbb` hex string (leading `#` optional)
    pub fn from_hex(s: &str) -> Result<Self, ConfigError> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::BadColor(s.to_string()));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ConfigError::BadColor(s.to_string()))
        };
        Ok(Self {
            r: parse(0..2)?,
            g: parse(2..4)?,
            b: parse(4..6)?,
        })
    }
}

/// One entry of the filter table: which band, where its files live, and how
/// to tint its single-band view
#[derive(Debug, Clone)]
pub struct FilterSpec {
    pub band: FilterBand,
    pub dir: PathBuf,
    pub color: DisplayColor,
}

/// Full configuration for one analysis run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Exactly three filters, shortest wavelength first
    pub filters: [FilterSpec; 3],
    /// Power applied to normalized channels (< 1 brightens midtones)
    pub gamma: f64,
    /// Scale factor applied inside the percentile stretch
    pub contrast: f64,
}

impl PipelineConfig {
    /// Standard three-filter table with one subdirectory per band under
    /// `data_dir`
    pub fn standard(data_dir: &Path, gamma: f64, contrast: f64) -> Self {
        let colors = [
            DisplayColor { r: 0x33, g: 0x66, b: 0xcc },
            DisplayColor { r: 0x33, g: 0xaa, b: 0x55 },
            DisplayColor { r: 0xcc, g: 0x33, b: 0x33 },
        ];
        let filters = [
            FilterSpec {
                band: FilterBand::F770W,
                dir: data_dir.join(FilterBand::F770W.name()),
                color: colors[0],
            },
            FilterSpec {
                band: FilterBand::F1130W,
                dir: data_dir.join(FilterBand::F1130W.name()),
                color: colors[1],
            },
            FilterSpec {
                band: FilterBand::F1500W,
                dir: data_dir.join(FilterBand::F1500W.name()),
                color: colors[2],
            },
        ];
        Self {
            filters,
            gamma,
            contrast,
        }
    }
}
