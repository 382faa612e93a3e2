//! geosplat CLI - turn point measurements into georeferenced rasters

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use geosplat_algorithms::interpolation::{interpolate, InterpolateParams, InterpolationMethod};
use geosplat_algorithms::rasterize::{rasterize, MarkerStyle, RasterizeParams};
use geosplat_colormap::{auto_params, raster_to_rgba, ColorScheme, GrayRamp};
use geosplat_core::io::{read_geotiff, GeoTiffSink, PointSource, RasterSink, ShapefileSource};
use geosplat_core::{Raster, SampleSet};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "geosplat")]
#[command(author, version, about = "Rasterize geo-located point measurements", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw each point as a marker on an empty grid
    Rasterize {
        #[command(flatten)]
        conversion: ConversionArgs,
    },
    /// Fill the grid between points, then draw the markers on top
    Interpolate {
        #[command(flatten)]
        conversion: ConversionArgs,
        /// Interpolation method
        #[arg(short, long, value_enum, default_value_t = MethodArg::Linear)]
        method: MethodArg,
        /// Value for cells outside the convex hull of the points
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        fill_value: f64,
    },
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
}

#[derive(Args)]
struct ConversionArgs {
    /// Input point shapefile (.shp)
    input: PathBuf,
    /// Output GeoTIFF
    output: PathBuf,
    /// Attribute field holding the measured value
    attribute: String,
    /// Pixels per degree (positive integer)
    #[arg(value_parser = parse_resolution)]
    resolution: u32,
    /// Marker drawn for each point
    #[arg(long, value_enum, default_value_t = MarkerArg::Circle)]
    marker: MarkerArg,
    /// Do not add the resolution/30 cell margin around the extent
    #[arg(long)]
    no_margin: bool,
    /// Gray ramp written as the output color table
    #[arg(long, value_enum, default_value_t = GrayArg::Inverted)]
    gray: GrayArg,
    /// Also render the grid with the hot color scheme to this PNG
    #[arg(long)]
    preview: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum MarkerArg {
    /// Single cell
    Single,
    /// Cell and its 8 neighbours
    #[value(name = "3x3")]
    Block,
    /// Filled circle with an outline, sized from the resolution
    Circle,
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Linear,
    Nearest,
}

#[derive(Clone, Copy, ValueEnum)]
enum GrayArg {
    /// 0 is white, 255 is black
    Inverted,
    /// 0 is black, 255 is white
    Straight,
}

impl From<GrayArg> for GrayRamp {
    fn from(arg: GrayArg) -> Self {
        match arg {
            GrayArg::Inverted => GrayRamp::Inverted,
            GrayArg::Straight => GrayRamp::Straight,
        }
    }
}

impl From<MethodArg> for InterpolationMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Linear => InterpolationMethod::Linear,
            MethodArg::Nearest => InterpolationMethod::Nearest,
        }
    }
}

impl ConversionArgs {
    /// Grid parameters; circle outlines use `outline_intensity`
    fn raster_params(&self, outline_intensity: u8) -> RasterizeParams {
        let marker = match self.marker {
            MarkerArg::Single => MarkerStyle::SingleCell,
            MarkerArg::Block => MarkerStyle::Neighborhood3x3,
            MarkerArg::Circle => {
                MarkerStyle::circle_for_resolution(self.resolution, Some(outline_intensity))
            }
        };
        RasterizeParams {
            resolution: self.resolution,
            marker,
            margin: !self.no_margin,
        }
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn parse_resolution(s: &str) -> std::result::Result<u32, String> {
    let value: i64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not an integer number of pixels per degree", s))?;
    if value <= 0 {
        return Err(format!("resolution must be positive, got {}", value));
    }
    u32::try_from(value).map_err(|_| format!("resolution {} is too large", value))
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_samples(path: &Path, attribute: &str) -> Result<SampleSet> {
    let pb = spinner("Reading points...");
    let samples = ShapefileSource
        .read_points(path, attribute)
        .with_context(|| format!("Failed to read '{}' from {}", attribute, path.display()))?;
    pb.finish_and_clear();

    let bbox = samples.bbox;
    info!(
        "Input: {} points in ({:.6}, {:.6}) - ({:.6}, {:.6})",
        samples.len(),
        bbox.west,
        bbox.south,
        bbox.east,
        bbox.north
    );
    let (north_m, south_m) = bbox.edge_lengths_m();
    debug!("Ground width: {:.1} m at the north edge, {:.1} m at the south edge", north_m, south_m);
    Ok(samples)
}

fn write_result(raster: &Raster<u8>, path: &Path, gray: GrayRamp) -> Result<()> {
    let pb = spinner("Writing output...");
    GeoTiffSink
        .write_raster(raster, path, Some(&gray.palette()))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    pb.finish_and_clear();
    Ok(())
}

fn write_preview(raster: &Raster<u8>, path: &Path) -> Result<()> {
    let params = auto_params(raster, ColorScheme::Hot);
    let rgba = raster_to_rgba(raster, &params);
    let image = image::RgbaImage::from_raw(raster.cols() as u32, raster.rows() as u32, rgba)
        .context("Preview buffer does not match the grid size")?;
    image
        .save(path)
        .with_context(|| format!("Failed to write preview {}", path.display()))?;
    println!("Preview saved to: {}", path.display());
    Ok(())
}

fn finish(raster: &Raster<u8>, args: &ConversionArgs, start: Instant) -> Result<()> {
    write_result(raster, &args.output, args.gray.into())?;
    if let Some(preview) = &args.preview {
        write_preview(raster, preview)?;
    }
    done(raster, &args.output, start.elapsed());
    Ok(())
}

fn done(raster: &Raster<u8>, path: &Path, elapsed: std::time::Duration) {
    println!("{} x {} grid saved to: {}", raster.cols(), raster.rows(), path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn print_info(input: &Path) -> Result<()> {
    let raster: Raster<u8> = read_geotiff(input)
        .with_context(|| format!("Failed to read raster {}", input.display()))?;
    let (rows, cols) = raster.shape();
    let transform = raster.transform();
    let bounds = raster.bounds();
    let stats = raster.statistics();

    println!("File: {}", input.display());
    println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
    println!(
        "Pixel size: {:.8} x {:.8} deg",
        transform.pixel_width, transform.pixel_height
    );
    println!(
        "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
        bounds.west, bounds.south, bounds.east, bounds.north
    );
    let (north_m, south_m) = bounds.edge_lengths_m();
    println!("Ground width: {:.1} m (north) / {:.1} m (south)", north_m, south_m);
    let affine = transform.to_gdal();
    println!(
        "Affine: [{:.8}, {:.8}, 0, {:.8}, 0, {:.8}]",
        affine[0], affine[1], affine[3], affine[5]
    );
    if let Some(crs) = raster.crs() {
        println!("CRS: {}", crs);
    }
    println!("\nStatistics:");
    if let (Some(min), Some(max)) = (stats.min, stats.max) {
        println!("  Min: {}", min);
        println!("  Max: {}", max);
    }
    if let Some(mean) = stats.mean {
        println!("  Mean: {:.4}", mean);
    }
    let nonzero = raster.data().iter().filter(|&&v| v != 0).count();
    println!(
        "  Non-zero cells: {} ({:.1}%)",
        nonzero,
        100.0 * nonzero as f64 / raster.len() as f64
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Rasterize { conversion } => {
            let start = Instant::now();
            let samples = read_samples(&conversion.input, &conversion.attribute)?;

            let params = conversion.raster_params(255);
            let pb = spinner("Rasterizing...");
            let grid = rasterize(&samples, &params).context("Failed to rasterize points")?;
            pb.finish_and_clear();

            finish(&grid, &conversion, start)?;
        }

        Commands::Interpolate {
            conversion,
            method,
            fill_value,
        } => {
            if !fill_value.is_finite() {
                bail!("--fill-value must be a finite number, got {}", fill_value);
            }
            let start = Instant::now();
            let samples = read_samples(&conversion.input, &conversion.attribute)?;

            let params = InterpolateParams {
                raster: conversion.raster_params(0),
                method: method.into(),
                fill_value,
            };
            let pb = spinner("Interpolating...");
            let grid = interpolate(&samples, &params).context("Failed to interpolate points")?;
            pb.finish_and_clear();

            finish(&grid, &conversion, start)?;
        }

        Commands::Info { input } => print_info(&input)?,
    }

    Ok(())
}
