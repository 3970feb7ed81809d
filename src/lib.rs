//! Count rate and activity estimation from Geiger counter click recordings.
//!
//! The analysis takes a sampled waveform of the detector's audio output (and,
//! optionally, a background recording), detects click onsets with a dead time,
//! bins them into equal time windows and reports counts per minute, activity
//! and the distribution of the per-bin activity.
//!
//! ```
//! use geiger::config::Config;
//! use geiger::pipeline::analyse;
//! use geiger::waveform::Waveform;
//! use uom::si::f64::Time;
//! use uom::si::time::second;
//!
//! let sample = Waveform::new(1, vec![0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0])?;
//! let config = Config::builder()
//!     .dead_time(Time::new::<second>(3.0))
//!     .significance(0.5)
//!     .bin_count(3)
//!     .build()?;
//!
//! let activity = analyse(&config, &sample, None)?;
//! assert_eq!(activity.events.count(), 2);
//! assert_eq!(activity.binned_counts, vec![1, 0, 1]);
//! # Ok::<(), geiger::Error>(())
//! ```
use std::fmt;

/// Validated analysis parameters.
pub mod config;
/// Click onset detection with dead time.
pub mod detector;
/// Splitting event sequences into time bins.
pub mod discretize;
/// Frequency distribution of the activity curve.
pub mod histogram;
/// Background noise floor estimation.
pub mod noise;
/// End-to-end activity analysis.
pub mod pipeline;
/// Count rate computation.
pub mod rate;
/// Parsing of time quantities from text.
pub mod units;
/// Sampled waveforms and WAV loading.
pub mod waveform;

#[cfg(test)]
mod testing;

/// The error type returned by every stage of the analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The waveform (or a sequence derived from it) can't be processed, e.g.
    /// it is empty or the file it came from is unreadable.
    InvalidInput(String),
    /// Contradictory or out-of-range parameters.
    InvalidConfiguration(String),
    /// A recognized option that has no implementation.
    NotImplemented(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Error::InvalidConfiguration(msg) => write!(f, "invalid configuration: {msg}"),
            Error::NotImplemented(what) => write!(f, "{what} is not implemented"),
        }
    }
}

impl std::error::Error for Error {}
