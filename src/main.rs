//! Three-filter MIRI analysis run.
//!
//! Loads the f770w/f1130w/f1500w calibrated exposures, writes tinted
//! single-filter views and the RGB composite, and prints per-filter summary
//! statistics, the cross-filter correlation matrix and the PCA variance
//! table. Any failure aborts the run; there is no partial-success mode.
//!
//! Usage:
//! ```
//! cargo run -- --data-dir data --out-dir output
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use image::{Rgb, RgbImage};
use log::info;
use std::fs;
use std::path::PathBuf;

use miri_composite::image_proc::composite::{build_composite, colorize};
use miri_composite::image_proc::normalize::preprocess_channel;
use miri_composite::plot::{plot_histograms, plot_pca_scatter};
use miri_composite::stats::correlation::{complete_rows, correlation_matrix};
use miri_composite::stats::pca::pca;
use miri_composite::stats::summarize;
use miri_composite::{loader, FilterRecord, PipelineConfig};

/// Length of the composite scale bar in arcseconds
const SCALE_BAR_ARCSEC: f64 = 10.0;

/// Command line arguments for the analysis run
#[derive(Parser, Debug)]
#[command(
    name = "miri-composite",
    about = "Composites three MIRI filter exposures and analyzes their pixel statistics"
)]
struct Args {
    /// Directory containing one subdirectory per filter (f770w, f1130w, f1500w)
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// Output directory for rendered images and plots
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,
    /// Gamma applied to normalized channels
    #[arg(long, default_value_t = 0.8)]
    gamma: f64,
    /// Contrast factor for the percentile stretch
    #[arg(long, default_value_t = 0.1)]
    contrast: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = PipelineConfig::standard(&args.data_dir, args.gamma, args.contrast);
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("cannot create output dir {}", args.out_dir.display()))?;

    let mut loaded = Vec::with_capacity(3);
    for spec in &config.filters {
        let record = loader::load_filter(spec)?;
        info!(
            "loaded {} ({} x {}), pixel scale {:.3} arcsec/px",
            record.band,
            record.image.nrows(),
            record.image.ncols(),
            record.wcs.pixel_scale()
        );
        loaded.push(record);
    }
    let records: [FilterRecord; 3] = loaded
        .try_into()
        .unwrap_or_else(|_| unreachable!("filter table has exactly three entries"));

    // Tinted single-filter views
    for record in &records {
        let channel = preprocess_channel(&record.image, config.contrast, config.gamma);
        let view = colorize(&channel, record.color);
        let path = args.out_dir.join(format!("{}.png", record.band));
        view.save(&path)
            .with_context(|| format!("cannot write {}", path.display()))?;
        info!("wrote {}", path.display());
    }

    // RGB composite, longest wavelength as red
    let mut by_wavelength: Vec<&FilterRecord> = records.iter().collect();
    by_wavelength.sort_by(|a, b| {
        b.band
            .wavelength_um()
            .partial_cmp(&a.band.wavelength_um())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let composite = build_composite(
        &by_wavelength[0].image,
        &by_wavelength[1].image,
        &by_wavelength[2].image,
        config.contrast,
        config.gamma,
    )?;
    let mut raster = composite.to_rgb_image();
    annotate(&mut raster, records[0].wcs.pixel_scale());
    let composite_path = args.out_dir.join("composite.png");
    raster
        .save(&composite_path)
        .with_context(|| format!("cannot write {}", composite_path.display()))?;
    info!("wrote {}", composite_path.display());

    // Per-filter summary statistics
    println!("{:<8} {:>14} {:>14} {:>14}", "filter", "mean", "median", "sd");
    for record in &records {
        let stats = summarize(&record.image)?;
        println!(
            "{:<8} {:>14.4} {:>14.4} {:>14.4}",
            record.band.name(),
            stats.mean,
            stats.median,
            stats.std_dev
        );
    }

    // Correlation over positions finite in all three filters
    let rows = complete_rows([&records[0].image, &records[1].image, &records[2].image]);
    info!("{} complete pixel positions", rows.len());
    let matrix = correlation_matrix(&rows);
    println!("\ncorrelation matrix");
    print!("{:<8}", "");
    for record in &records {
        print!(" {:>10}", record.band.name());
    }
    println!();
    for (i, record) in records.iter().enumerate() {
        print!("{:<8}", record.band.name());
        for value in matrix[i] {
            print!(" {value:>10.4}");
        }
        println!();
    }

    // PCA variance summary and score scatter
    let result = pca(&rows)?;
    println!("\n{:<6} {:>12} {:>12} {:>12}", "comp", "std dev", "prop var", "cum prop");
    for (k, pc) in result.components.iter().enumerate() {
        println!(
            "PC{:<4} {:>12.4} {:>12.4} {:>12.4}",
            k + 1,
            pc.std_dev,
            pc.proportion,
            pc.cumulative
        );
    }

    let scatter_path = args.out_dir.join("pca_scatter.png");
    plot_pca_scatter(&result, &scatter_path)
        .map_err(|e| anyhow::anyhow!("pca scatter plot failed: {e}"))?;
    info!("wrote {}", scatter_path.display());

    let hist_path = args.out_dir.join("histograms.png");
    plot_histograms(&records, 60, &hist_path)
        .map_err(|e| anyhow::anyhow!("histogram plot failed: {e}"))?;
    info!("wrote {}", hist_path.display());

    Ok(())
}

/// Draw the scale bar and north arrow onto the rendered composite.
///
/// The scale bar spans [`SCALE_BAR_ARCSEC`] at the frame's pixel scale; the
/// arrow points up, matching the renderer's north-up row inversion.
fn annotate(img: &mut RgbImage, arcsec_per_px: f64) {
    let white = Rgb([255u8, 255, 255]);
    let (width, height) = img.dimensions();
    let margin = 20u32;
    if width <= 2 * margin || height <= 2 * margin || arcsec_per_px <= 0.0 {
        return;
    }

    // Scale bar, bottom left
    let bar_len = ((SCALE_BAR_ARCSEC / arcsec_per_px).round() as u32).min(width - 2 * margin);
    let bar_y = height - margin;
    for dy in 0..2 {
        for x in margin..margin + bar_len {
            img.put_pixel(x, bar_y + dy - 1, white);
        }
    }

    // North arrow, top left
    let arrow_len = (height / 10).clamp(10, 40);
    let arrow_x = margin;
    for dy in 0..arrow_len {
        img.put_pixel(arrow_x, margin + dy, white);
    }
    for d in 1..5u32 {
        if d <= arrow_x {
            img.put_pixel(arrow_x - d, margin + d, white);
            img.put_pixel(arrow_x + d, margin + d, white);
        }
    }
}
