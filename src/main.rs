use anyhow::{Context, Result};
use clap::Parser;
use geiger::config::{Config, DEFAULT_BIN_COUNT, DEFAULT_HISTOGRAM_BINS, DEFAULT_SIGNIFICANCE};
use geiger::detector::Detection;
use geiger::noise::Background;
use geiger::pipeline::{analyse_with, BinLayout, Observer};
use geiger::units::parse_time;
use geiger::waveform::Waveform;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use uom::si::f64::Time;
use uom::si::time::second;

/// Estimate the count rate and activity of a sample from a Geiger counter
/// recording.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Input file directory.
    #[arg(short, long, default_value = "./")]
    in_dir: PathBuf,
    /// Output file directory.
    #[arg(short, long, default_value = "./")]
    out_dir: PathBuf,
    /// Name of the sample, used for the report file name.
    #[arg(short, long, default_value = "sample")]
    disp_name: String,
    /// Sample recording.
    #[arg(short, long, default_value = "sample.wav")]
    filename: PathBuf,
    /// Background recording. Its noise floor and count rate are subtracted
    /// from the sample.
    #[arg(short, long)]
    background: Option<PathBuf>,
    /// Dump the full analysis as JSON into the output directory.
    #[arg(short = 'D', long)]
    debug: bool,
    /// Guess the isotopes based on the decay curve.
    #[arg(short, long, requires = "isotopes")]
    analyse: bool,
    /// Number of active isotopes in the sample.
    #[arg(short = 'I', long)]
    isotopes: Option<u32>,
    /// Number of time bins over the recording [default: 20].
    #[arg(short, long, conflicts_with = "time")]
    num: Option<usize>,
    /// Duration of one time bin (e.g. `3s`).
    #[arg(short, long, value_parser = parse_time)]
    time: Option<Time>,
    /// Width (dead time) of one count.
    #[arg(short, long, value_parser = parse_time, default_value = "410us")]
    width: Time,
    /// Fraction (0-1) of the peak amplitude a click must exceed.
    #[arg(short, long, default_value_t = DEFAULT_SIGNIFICANCE)]
    significance: f64,
    /// Number of bins of the activity distribution.
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    histogram_bins: usize,
}

/// Reports the intermediate results of the analysis through the logger.
struct LogReporter;

impl Observer for LogReporter {
    fn on_bin_layout(&mut self, layout: &BinLayout) {
        log::info!(
            "{} bins of {:.3} s",
            layout.count,
            layout.duration.get::<second>()
        );
    }

    fn on_background(&mut self, background: &Background) {
        log::info!(
            "The background activity was: {:.0} cpm with {:.0} noise.",
            background.cpm,
            background.noise_floor
        );
    }

    fn on_sample_detection(&mut self, detection: &Detection) {
        log::debug!(
            "{} clicks above {} (peak {}) with a dead time of {} samples",
            detection.events.count(),
            detection.threshold,
            detection.peak,
            detection.dead_samples
        );
    }
}

/// Bin count handed to the configuration: the default applies only when
/// neither a bin count nor a bin duration was given.
fn bin_count(num: Option<usize>, time: Option<Time>) -> Option<usize> {
    match (num, time) {
        (None, None) => Some(DEFAULT_BIN_COUNT),
        (num, _) => num,
    }
}

fn load(in_dir: &Path, filename: &Path) -> Result<Waveform> {
    let path = in_dir.join(filename);
    Waveform::from_wav(&path).with_context(|| format!("failed to load `{}`", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = Config::builder()
        .dead_time(args.width)
        .significance(args.significance)
        .maybe_bin_count(bin_count(args.num, args.time))
        .maybe_bin_duration(args.time)
        .histogram_bins(args.histogram_bins)
        .analyse(args.analyse)
        .maybe_isotopes(args.isotopes)
        .build()
        .context("invalid arguments")?;

    let sample = load(&args.in_dir, &args.filename)?;
    let background = args
        .background
        .as_ref()
        .map(|filename| load(&args.in_dir, filename))
        .transpose()?;

    let activity = analyse_with(&config, &sample, background.as_ref(), &mut LogReporter)
        .with_context(|| format!("failed to analyse `{}`", args.disp_name))?;

    println!(
        "The sample activity was: {:.0} cpm ( {:.0} Bq )",
        activity.rate.cpm,
        activity.rate.becquerel()
    );

    if args.debug {
        let path = args.out_dir.join(format!("{}.json", args.disp_name));
        let file = File::create(&path)
            .with_context(|| format!("failed to create `{}`", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &activity)
            .with_context(|| format!("failed to write `{}`", path.display()))?;
        log::info!("full analysis written to `{}`", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_count_default() {
        assert_eq!(bin_count(None, None), Some(DEFAULT_BIN_COUNT));
        assert_eq!(bin_count(Some(7), None), Some(7));
        assert_eq!(bin_count(None, Some(Time::new::<second>(3.0))), None);
    }

    #[test]
    fn args_binning() {
        let args = Args::try_parse_from(["geiger", "-t", "3s"]).unwrap();
        assert_eq!(bin_count(args.num, args.time), None);
        assert_eq!(args.time, Some(Time::new::<second>(3.0)));

        let args = Args::try_parse_from(["geiger"]).unwrap();
        assert_eq!(bin_count(args.num, args.time), Some(DEFAULT_BIN_COUNT));

        assert!(Args::try_parse_from(["geiger", "-n", "5", "-t", "3s"]).is_err());
        assert!(Args::try_parse_from(["geiger", "-a"]).is_err());
    }
}
