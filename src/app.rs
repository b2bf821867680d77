//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves telluric ranges and smoothing settings
//! - runs the smoothing pipeline
//! - prints the summary or plot and writes output files

use clap::Parser;

use crate::cli::{Command, FitArgs, PlotArgs, SynthArgs};
use crate::domain::{DEFAULT_EXCLUSION_RANGES, SmoothConfig, SmoothOptions};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `tellfit` binary.
pub fn run() -> Result<(), AppError> {
    // `tellfit IN OUT ...` behaves like `tellfit fit IN OUT ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Synth(args) => handle_synth(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = smooth_config_from_args(&args)?;
    let run = pipeline::run_smooth(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.spectrum, &run.smoothed, &config)
    );

    if config.show {
        let shaded: Vec<(f64, f64)> = config.exclusion_ranges.iter().map(|r| (r.low, r.high)).collect();
        let plot = crate::plot::render_smoothing_plot(
            &run.spectrum.wavelength,
            &run.spectrum.flux,
            &run.smoothed.fitted,
            &run.smoothed.unblended,
            &shaded,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    } else {
        crate::io::write_spectrum(&config.output, &run.output_spectrum(), Some(history_line(&config)))?;
        log::info!("Wrote smoothed spectrum to {}", config.output.display());
    }

    if let Some(path) = &config.export {
        crate::io::write_diagnostics_csv(path, &run.spectrum, &run.smoothed)?;
        log::info!("Wrote diagnostics to {}", path.display());
    }

    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let config = crate::data::SynthConfig {
        samples: args.samples,
        seed: args.seed,
        noise: args.noise,
        start: args.start,
        step: args.step,
    };
    let synth = crate::data::generate_spectrum(&config, &DEFAULT_EXCLUSION_RANGES)?;

    crate::io::write_spectrum(&args.output, &synth.spectrum, None)?;
    log::info!(
        "Wrote {} synthetic samples to {}",
        synth.spectrum.len(),
        args.output.display()
    );

    if let Some(path) = &args.ranges_out {
        crate::io::write_range_file(path, &synth.ranges)?;
        log::info!("Wrote {} snapped ranges to {}", synth.ranges.len(), path.display());
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let spectrum = crate::io::read_spectrum(&args.input)?;
    let shaded: Vec<(f64, f64)> = match &args.tellrange {
        Some(path) => crate::io::read_range_file(path)?
            .iter()
            .map(|r| (r.low, r.high))
            .collect(),
        None => Vec::new(),
    };

    let series = [crate::plot::PlotSeries {
        label: "flux",
        glyph: '.',
        values: &spectrum.flux,
    }];
    let plot = crate::plot::render_plot(&spectrum.wavelength, &series, &shaded, args.width, args.height);

    println!("{plot}");
    Ok(())
}

/// Turn `fit` flags into the pipeline configuration.
///
/// Reads the range file when one is given; otherwise the built-in ranges apply.
pub fn smooth_config_from_args(args: &FitArgs) -> Result<SmoothConfig, AppError> {
    let exclusion_ranges = match &args.tellrange {
        Some(path) => crate::io::read_range_file(path)?,
        None => DEFAULT_EXCLUSION_RANGES.to_vec(),
    };

    let config = SmoothConfig {
        input: args.input.clone(),
        output: args.output.clone(),
        show: args.show,
        exclusion_ranges,
        range_source: args.tellrange.clone(),
        options: SmoothOptions {
            order: args.order,
            blend_width: args.pixels,
            lookup: args.lookup,
            trailing_rescale: args.trailing_rescale,
            blend_weighting: args.blend_weighting,
        },
        export: args.export.clone(),
        plot_width: args.width,
        plot_height: args.height,
    };

    log::info!(
        "Telluric ranges: {}",
        crate::report::format_ranges(&config.exclusion_ranges)
    );
    log::info!(
        "Polynomial order {}, blending {} pixels",
        config.options.order,
        config.options.blend_width
    );
    Ok(config)
}

/// History entry recorded in smoothed JSON output.
fn history_line(config: &SmoothConfig) -> String {
    let opts = &config.options;
    format!(
        "tellfit {}: continuum smoothed (order={}, pixels={}, ranges={}, lookup={:?}, trailing={:?}, weighting={:?})",
        chrono::Local::now().to_rfc3339(),
        opts.order,
        opts.blend_width,
        config.exclusion_ranges.len(),
        opts.lookup,
        opts.trailing_rescale,
        opts.blend_weighting,
    )
}

/// Rewrite argv so `tellfit IN OUT ...` defaults to `tellfit fit IN OUT ...`.
///
/// Rules:
/// - `tellfit`                          -> unchanged (clap prints usage)
/// - `tellfit --help/--version/-h`      -> unchanged (top-level help/version)
/// - `tellfit fit|synth|plot ...`       -> unchanged
/// - `tellfit IN OUT ...`               -> `tellfit fit IN OUT ...`
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "synth" | "plot");
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "fit".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::domain::{ExclusionRange, LookupMode};

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_paths_become_fit() {
        assert_eq!(
            rewrite_args(argv(&["tellfit", "in.json", "out.json", "--show"])),
            argv(&["tellfit", "fit", "in.json", "out.json", "--show"])
        );
        assert_eq!(
            rewrite_args(argv(&["tellfit", "--order", "5", "in.json", "out.json"])),
            argv(&["tellfit", "fit", "--order", "5", "in.json", "out.json"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for items in [
            vec!["tellfit"],
            vec!["tellfit", "--help"],
            vec!["tellfit", "-V"],
            vec!["tellfit", "synth", "out.json"],
            vec!["tellfit", "plot", "in.json"],
            vec!["tellfit", "fit", "in.json", "out.json"],
        ] {
            assert_eq!(rewrite_args(argv(&items)), argv(&items));
        }
    }

    fn fit_args(tellrange: Option<PathBuf>) -> FitArgs {
        let mut items = argv(&["tellfit", "fit", "in.json", "out.json", "--lookup", "nearest"]);
        if let Some(p) = &tellrange {
            items.push("--tellrange".to_string());
            items.push(p.display().to_string());
        }
        match crate::cli::Cli::parse_from(items).command {
            Command::Fit(args) => args,
            _ => panic!("expected fit"),
        }
    }

    #[test]
    fn config_uses_built_in_ranges_by_default() {
        let config = smooth_config_from_args(&fit_args(None)).unwrap();
        assert_eq!(config.exclusion_ranges, DEFAULT_EXCLUSION_RANGES.to_vec());
        assert!(config.range_source.is_none());
        assert_eq!(config.options.lookup, LookupMode::Nearest);
        assert_eq!(config.input, PathBuf::from("in.json"));
    }

    #[test]
    fn config_reads_range_file() {
        let path = std::env::temp_dir().join(format!("tellfit_app_{}_ranges.txt", std::process::id()));
        std::fs::write(&path, "# test\n[0.5, 0.6]\n").unwrap();
        let config = smooth_config_from_args(&fit_args(Some(path.clone()))).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.exclusion_ranges, vec![ExclusionRange::new(0.5, 0.6)]);
        assert_eq!(config.range_source, Some(path));
    }

    #[test]
    fn history_line_records_settings() {
        let config = smooth_config_from_args(&fit_args(None)).unwrap();
        let line = history_line(&config);
        assert!(line.starts_with("tellfit "));
        assert!(line.contains("order=10"));
        assert!(line.contains("pixels=10"));
        assert!(line.contains("ranges=6"));
    }
}
