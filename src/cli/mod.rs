//! Command-line parsing for the continuum smoother.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{BlendWeighting, DEFAULT_BLEND_WIDTH, DEFAULT_ORDER, LookupMode, TrailingRescale};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "tellfit",
    version,
    about = "Smooth a telluric-corrected spectrum with Chebyshev continuum fits"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the continuum between telluric ranges and write the smoothed spectrum.
    Fit(FitArgs),
    /// Write a synthetic telluric-corrected spectrum.
    Synth(SynthArgs),
    /// Plot a spectrum file in the terminal.
    Plot(PlotArgs),
}

/// Options for smoothing a spectrum.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Telluric-corrected spectrum (.fits, .json or .csv).
    pub input: PathBuf,

    /// Output spectrum (.fits, .json or .csv).
    pub output: PathBuf,

    /// Plot original, smoothed and unblended spectra instead of writing OUTPUT.
    #[arg(long)]
    pub show: bool,

    /// Chebyshev polynomial order.
    #[arg(long, default_value_t = DEFAULT_ORDER)]
    pub order: usize,

    /// Pixels blended between polynomial and spectrum at each join.
    #[arg(long, default_value_t = DEFAULT_BLEND_WIDTH)]
    pub pixels: usize,

    /// File with one `[low, high]` telluric range per line.
    #[arg(long, value_name = "FILE")]
    pub tellrange: Option<PathBuf>,

    /// How range endpoints are matched to axis samples.
    #[arg(long, value_enum, default_value_t = LookupMode::Exact)]
    pub lookup: LookupMode,

    /// Normalisation of the trailing segment's wavelengths.
    #[arg(long, value_enum, default_value_t = TrailingRescale::AxisSpan)]
    pub trailing_rescale: TrailingRescale,

    /// Weight progression inside a blend window.
    #[arg(long, value_enum, default_value_t = BlendWeighting::Linear)]
    pub blend_weighting: BlendWeighting,

    /// Export per-pixel diagnostics (flux, fitted, unblended) to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for generating a synthetic spectrum.
#[derive(Debug, Parser, Clone)]
pub struct SynthArgs {
    /// Output spectrum (.fits, .json or .csv).
    pub output: PathBuf,

    /// Number of pixels.
    #[arg(long, default_value_t = 4000)]
    pub samples: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Gaussian noise σ relative to the continuum.
    #[arg(long, default_value_t = 0.01)]
    pub noise: f64,

    /// Wavelength of the first pixel (µm).
    #[arg(long, default_value_t = 0.6)]
    pub start: f64,

    /// Wavelength step per pixel (µm).
    #[arg(long, default_value_t = 0.0001)]
    pub step: f64,

    /// Also write the built-in telluric ranges, snapped onto the generated axis.
    #[arg(long, value_name = "FILE")]
    pub ranges_out: Option<PathBuf>,
}

/// Options for plotting a spectrum file.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Spectrum file (.fits, .json or .csv).
    pub input: PathBuf,

    /// Shade the ranges from this file under the plot.
    #[arg(long, value_name = "FILE")]
    pub tellrange: Option<PathBuf>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
