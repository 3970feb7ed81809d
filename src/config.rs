use crate::Error;
use bon::bon;
use uom::si::f64::Time;
use uom::si::time::second;

/// Default width of one count (dead time), in seconds.
pub const DEFAULT_DEAD_TIME: f64 = 0.00041;
/// Default fraction of the peak amplitude a sample must exceed to count.
pub const DEFAULT_SIGNIFICANCE: f64 = 0.75;
/// Default number of time bins when no bin duration is given.
pub const DEFAULT_BIN_COUNT: usize = 20;
/// Default number of bins of the activity distribution.
pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

/// How the recording is split into time bins.
///
/// Exactly one of the bin count or the bin duration is chosen by the user; the
/// other one is derived from the length of the recording.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Binning {
    /// Fixed number of bins.
    Count(usize),
    /// Fixed duration of each bin.
    Duration(Time),
}

/// Immutable set of analysis parameters.
///
/// A [`Config`] can only be obtained through its builder, which validates
/// every parameter.
///
/// # Examples
///
/// ```
/// use geiger::config::{Binning, Config};
/// use uom::si::f64::Time;
/// use uom::si::time::second;
///
/// let config = Config::builder()
///     .bin_duration(Time::new::<second>(3.0))
///     .build()?;
/// assert_eq!(config.binning(), Binning::Duration(Time::new::<second>(3.0)));
///
/// // Bin count and bin duration are mutually exclusive.
/// assert!(Config::builder()
///     .bin_count(20)
///     .bin_duration(Time::new::<second>(3.0))
///     .build()
///     .is_err());
/// # Ok::<(), geiger::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    dead_time: Time,
    significance: f64,
    binning: Binning,
    histogram_bins: usize,
    isotope_analysis: Option<u32>,
}

#[bon]
impl Config {
    #[builder]
    pub fn new(
        #[builder(default = Time::new::<second>(DEFAULT_DEAD_TIME))] dead_time: Time,
        #[builder(default = DEFAULT_SIGNIFICANCE)] significance: f64,
        bin_count: Option<usize>,
        bin_duration: Option<Time>,
        #[builder(default = DEFAULT_HISTOGRAM_BINS)] histogram_bins: usize,
        #[builder(default)] analyse: bool,
        isotopes: Option<u32>,
    ) -> Result<Self, Error> {
        if !is_positive(dead_time) {
            return Err(Error::InvalidConfiguration(format!(
                "dead time must be positive, got {} s",
                dead_time.get::<second>()
            )));
        }

        if !significance.is_finite() || significance < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "significance must be a non-negative number, got {significance}"
            )));
        }
        if significance >= 1.0 {
            log::warn!(
                "significance {significance} is not below 1, the detection threshold can't be exceeded"
            );
        }

        let binning = match (bin_count, bin_duration) {
            (Some(_), Some(_)) => {
                return Err(Error::InvalidConfiguration(String::from(
                    "give only one of the bin count or the bin duration, not both",
                )))
            }
            (None, None) => {
                return Err(Error::InvalidConfiguration(String::from(
                    "either the bin count or the bin duration is required",
                )))
            }
            (Some(0), None) => {
                return Err(Error::InvalidConfiguration(String::from(
                    "bin count must be positive",
                )))
            }
            (Some(count), None) => Binning::Count(count),
            (None, Some(duration)) if is_positive(duration) => Binning::Duration(duration),
            (None, Some(duration)) => {
                return Err(Error::InvalidConfiguration(format!(
                    "bin duration must be positive, got {} s",
                    duration.get::<second>()
                )))
            }
        };

        if histogram_bins == 0 {
            return Err(Error::InvalidConfiguration(String::from(
                "histogram bin count must be positive",
            )));
        }

        let isotope_analysis = match (analyse, isotopes) {
            (true, None) => {
                return Err(Error::InvalidConfiguration(String::from(
                    "isotope analysis requires the number of isotopes",
                )))
            }
            (_, Some(0)) => {
                return Err(Error::InvalidConfiguration(String::from(
                    "number of isotopes must be positive",
                )))
            }
            (true, isotopes) => isotopes,
            (false, _) => None,
        };

        Ok(Self {
            dead_time,
            significance,
            binning,
            histogram_bins,
            isotope_analysis,
        })
    }
}

impl Config {
    /// Minimum time between two accepted clicks.
    pub fn dead_time(&self) -> Time {
        self.dead_time
    }
    /// Fraction of each waveform's own peak (after noise subtraction) used as
    /// the detection threshold.
    pub fn significance(&self) -> f64 {
        self.significance
    }

    /// Either the bin count or the bin duration, whichever was given.
    pub fn binning(&self) -> Binning {
        self.binning
    }

    /// Number of bins of the activity distribution.
    pub fn histogram_bins(&self) -> usize {
        self.histogram_bins
    }
    /// Number of isotopes to identify, if isotope analysis was requested.
    pub fn isotope_analysis(&self) -> Option<u32> {
        self.isotope_analysis
    }
}

fn is_positive(time: Time) -> bool {
    let seconds = time.get::<second>();
    seconds.is_finite() && seconds > 0.0
}
