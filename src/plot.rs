//! Rendered analysis plots: PCA scatter and per-filter histograms.

use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

use crate::loader::FilterRecord;
use crate::stats::pca::PcaResult;

/// Upper bound on scatter points so full-frame score tables stay plottable
const MAX_SCATTER_POINTS: usize = 5000;

/// Scatter of the first two principal component scores.
///
/// Large score tables are subsampled with a fixed stride; the stride keeps
/// the spatial ordering of the table, which is fine for a density view.
pub fn plot_pca_scatter(result: &PcaResult, path: &Path) -> Result<(), Box<dyn Error>> {
    let n = result.scores.nrows();
    let step = (n / MAX_SCATTER_POINTS).max(1);
    let points: Vec<(f64, f64)> = (0..n)
        .step_by(step)
        .map(|r| (result.scores[[r, 0]], result.scores[[r, 1]]))
        .collect();

    let (x_min, x_max) = padded_range(points.iter().map(|p| p.0));
    let (y_min, y_max) = padded_range(points.iter().map(|p| p.1));

    let root = BitMapBackend::new(path, (900, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Pixel intensities in component space", ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(format!(
            "PC1 ({:.1}% of variance)",
            result.components[0].proportion * 100.0
        ))
        .y_desc(format!(
            "PC2 ({:.1}% of variance)",
            result.components[1].proportion * 100.0
        ))
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 2, BLUE.mix(0.35).filled())),
    )?;

    root.present()?;
    Ok(())
}

/// Per-filter intensity histograms over finite pixels, one colored series
/// per band on a shared axis
pub fn plot_histograms(
    records: &[FilterRecord; 3],
    bins: usize,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for record in records {
        for &v in record.image.iter().filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !(lo < hi) {
        return Err("no finite pixel values to histogram".into());
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = [vec![0u64; bins], vec![0u64; bins], vec![0u64; bins]];
    for (record, count) in records.iter().zip(counts.iter_mut()) {
        for &v in record.image.iter().filter(|v| v.is_finite()) {
            let bin = (((v - lo) / width) as usize).min(bins - 1);
            count[bin] += 1;
        }
    }
    let peak = counts.iter().flatten().copied().max().unwrap_or(1) as f64;

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Pixel intensity distribution per filter", ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(65)
        .build_cartesian_2d(lo..hi, 0.0..peak * 1.05)?;

    chart
        .configure_mesh()
        .x_desc("Surface brightness (MJy/sr)")
        .y_desc("Pixel count")
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    for (record, count) in records.iter().zip(counts.iter()) {
        let color = RGBColor(record.color.r, record.color.g, record.color.b);
        let series: Vec<(f64, f64)> = count
            .iter()
            .enumerate()
            .map(|(b, &c)| (lo + (b as f64 + 0.5) * width, c as f64))
            .collect();
        chart
            .draw_series(LineSeries::new(series, color.stroke_width(2)))?
            .label(record.band.name())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn padded_range<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !(lo < hi) {
        return (lo - 1.0, lo + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}
