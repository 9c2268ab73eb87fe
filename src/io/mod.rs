//! File input for the analysis pipeline.

pub mod fits;
