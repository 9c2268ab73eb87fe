//! Image normalization and composite construction.

pub mod composite;
pub mod normalize;
