//! End-to-end pipeline test over synthetic three-filter exposures.

use approx::assert_relative_eq;
use fitsio::images::{ImageDescription, ImageType};
use fitsio::FitsFile;
use ndarray::Array2;
use std::path::Path;
use tempfile::TempDir;

use miri_composite::image_proc::composite::build_composite;
use miri_composite::stats::correlation::{complete_rows, correlation_matrix};
use miri_composite::stats::pca::pca;
use miri_composite::stats::summarize;
use miri_composite::{loader, FilterBand, PipelineConfig};

/// Write one synthetic calibrated exposure in the layout the loader expects
fn write_exposure(data_dir: &Path, band: FilterBand, image: &Array2<f64>) {
    let dir = data_dir.join(band.name());
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("jw06553-o001_t001_miri_{}_i2d.fits", band.name()));

    let (rows, cols) = image.dim();
    let mut fptr = FitsFile::create(&path).open().unwrap();
    let description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: &[rows, cols],
    };
    let hdu = fptr.create_image("SCI", &description).unwrap();
    let data: Vec<f64> = image.iter().copied().collect();
    hdu.write_image(&mut fptr, &data).unwrap();
    for (key, value) in [
        ("CRPIX1", 16.0),
        ("CRPIX2", 16.0),
        ("CDELT1", -0.0001),
        ("CDELT2", 0.0001),
        ("CRVAL1", 260.92),
        ("CRVAL2", -21.49),
    ] {
        hdu.write_key(&mut fptr, key, value).unwrap();
    }
}

#[test]
fn constant_frames_yield_exact_summary_statistics() {
    let dir = TempDir::new().unwrap();
    let values = [5.0, 18.0, 42.0];
    for (band, &value) in FilterBand::ALL.iter().zip(values.iter()) {
        write_exposure(dir.path(), *band, &Array2::from_elem((32, 32), value));
    }

    let config = PipelineConfig::standard(dir.path(), 0.8, 0.1);
    for (spec, &value) in config.filters.iter().zip(values.iter()) {
        let record = loader::load_filter(spec).unwrap();
        assert_eq!(record.image.dim(), (32, 32));
        assert_relative_eq!(record.wcs.cdelt2, 0.36, epsilon = 1e-12);

        let stats = summarize(&record.image).unwrap();
        assert_eq!(stats.mean, value);
        assert_eq!(stats.median, value);
        assert_eq!(stats.std_dev, 0.0);
    }
}

#[test]
fn varied_frames_run_the_full_analysis() {
    let dir = TempDir::new().unwrap();

    let mut a = Array2::from_shape_fn((32, 32), |(i, j)| (i * 32 + j) as f64 * 0.1);
    let b = a.mapv(|v| 2.0 * v + 1.0);
    let mut c = Array2::from_shape_fn((32, 32), |(i, j)| ((i as f64) - (j as f64)).powi(2));
    // Invalid pixels in different filters: both positions must drop from
    // the joint table
    a[[3, 3]] = f64::NAN;
    c[[7, 7]] = f64::NAN;

    write_exposure(dir.path(), FilterBand::F770W, &a);
    write_exposure(dir.path(), FilterBand::F1130W, &b);
    write_exposure(dir.path(), FilterBand::F1500W, &c);

    let config = PipelineConfig::standard(dir.path(), 0.8, 0.1);
    let records: Vec<_> = config
        .filters
        .iter()
        .map(|spec| loader::load_filter(spec).unwrap())
        .collect();

    // Joint validity mask drops exactly the two bad positions
    let rows = complete_rows([&records[0].image, &records[1].image, &records[2].image]);
    assert_eq!(rows.len(), 32 * 32 - 2);

    let matrix = correlation_matrix(&rows);
    assert_relative_eq!(matrix[0][1], 1.0, epsilon = 1e-10);
    assert_eq!(matrix[0][0], 1.0);
    assert_eq!(matrix[1][2], matrix[2][1]);

    let result = pca(&rows).unwrap();
    let total: f64 = result.components.iter().map(|pc| pc.proportion).sum();
    assert_relative_eq!(total, 1.0, epsilon = 1e-10);
    assert!(result.components[0].proportion >= result.components[1].proportion);
    assert_eq!(result.scores.dim(), (rows.len(), 3));

    // Longest wavelength drives the red channel
    let composite = build_composite(
        &records[2].image,
        &records[1].image,
        &records[0].image,
        0.1,
        0.8,
    )
    .unwrap();
    assert_eq!(composite.dim(), (32, 32));
    let raster = composite.to_rgb_image();
    assert_eq!(raster.dimensions(), (32, 32));

    let out = dir.path().join("composite.png");
    raster.save(&out).unwrap();
    assert!(out.exists());
}

#[test]
fn missing_exposure_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    // Only two of three filters present
    write_exposure(dir.path(), FilterBand::F770W, &Array2::from_elem((8, 8), 1.0));
    write_exposure(dir.path(), FilterBand::F1130W, &Array2::from_elem((8, 8), 2.0));

    let config = PipelineConfig::standard(dir.path(), 0.8, 0.1);
    let outcome: Result<Vec<_>, _> = config.filters.iter().map(loader::load_filter).collect();
    assert!(outcome.is_err());
    assert!(outcome.unwrap_err().to_string().contains("f1500w"));
}
