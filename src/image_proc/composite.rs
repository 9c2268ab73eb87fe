//! RGB composite construction from three preprocessed channels.
//!
//! Channel roles follow wavelength: the longest-wavelength filter maps to
//! red and the shortest to blue. Rendering inverts the row axis so that
//! row 0 of the array lands at the bottom of the image (north up).

use image::{Rgb, RgbImage};
use ndarray::{Array2, Array3};
use thiserror::Error;

use crate::config::DisplayColor;
use crate::image_proc::normalize::preprocess_channel;

/// Errors raised while building a composite
#[derive(Error, Debug)]
pub enum CompositeError {
    #[error("channel shapes differ: {a:?} vs {b:?}")]
    ShapeMismatch {
        a: (usize, usize),
        b: (usize, usize),
    },
}

/// A stacked RGB image with channel values in [0, 1]
#[derive(Debug, Clone)]
pub struct CompositeImage {
    rgb: Array3<f64>,
}

/// Preprocess three co-registered channels and stack them into an RGB cube.
///
/// All three images must share the same pixel grid; co-registration is the
/// loader's concern, a mismatch here is fatal.
pub fn build_composite(
    red: &Array2<f64>,
    green: &Array2<f64>,
    blue: &Array2<f64>,
    contrast: f64,
    gamma: f64,
) -> Result<CompositeImage, CompositeError> {
    for other in [green, blue] {
        if other.dim() != red.dim() {
            return Err(CompositeError::ShapeMismatch {
                a: red.dim(),
                b: other.dim(),
            });
        }
    }

    let channels = [
        preprocess_channel(red, contrast, gamma),
        preprocess_channel(green, contrast, gamma),
        preprocess_channel(blue, contrast, gamma),
    ];

    let (rows, cols) = red.dim();
    let mut rgb = Array3::zeros((rows, cols, 3));
    for (c, channel) in channels.iter().enumerate() {
        for ((i, j), &v) in channel.indexed_iter() {
            rgb[[i, j, c]] = v;
        }
    }
    Ok(CompositeImage { rgb })
}

impl CompositeImage {
    /// Pixel grid shape (rows, cols)
    pub fn dim(&self) -> (usize, usize) {
        let (rows, cols, _) = self.rgb.dim();
        (rows, cols)
    }

    /// Channel triple at one pixel position
    pub fn pixel(&self, row: usize, col: usize) -> [f64; 3] {
        [
            self.rgb[[row, col, 0]],
            self.rgb[[row, col, 1]],
            self.rgb[[row, col, 2]],
        ]
    }

    /// Render as an 8-bit RGB raster, row axis inverted so north is up.
    /// NaN channels render as black.
    pub fn to_rgb_image(&self) -> RgbImage {
        let (rows, cols) = self.dim();
        let mut img = RgbImage::new(cols as u32, rows as u32);
        for y in 0..rows {
            let src = rows - 1 - y;
            for x in 0..cols {
                let [r, g, b] = self.pixel(src, x);
                img.put_pixel(x as u32, y as u32, Rgb([to_u8(r), to_u8(g), to_u8(b)]));
            }
        }
        img
    }
}

/// Render one normalized channel tinted with a filter's display color,
/// with the same north-up row inversion as the composite
pub fn colorize(channel: &Array2<f64>, color: DisplayColor) -> RgbImage {
    let (rows, cols) = channel.dim();
    let mut img = RgbImage::new(cols as u32, rows as u32);
    for y in 0..rows {
        let src = rows - 1 - y;
        for x in 0..cols {
            let v = channel[[src, x]];
            let scale = |c: u8| to_u8(v * c as f64 / 255.0);
            img.put_pixel(
                x as u32,
                y as u32,
                Rgb([scale(color.r), scale(color.g), scale(color.b)]),
            );
        }
    }
    img
}

fn to_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
