use crate::config::{Binning, Config};
use crate::detector::{detect, Detection, EventSequence};
use crate::discretize::discretize;
use crate::histogram::Distribution;
use crate::noise::{estimate_background, Background};
use crate::rate::{count_rate, RateSummary, SECONDS_PER_MINUTE};
use crate::waveform::Waveform;
use crate::Error;
use serde::Serialize;
use uom::si::f64::Time;
use uom::si::time::second;

/// A trait that defines the interface for an observer of the analysis.
///
/// The default implementation of all methods is a no-op. Users are expected to
/// override the methods they are interested in.
#[allow(unused_variables)]
pub trait Observer {
    /// Called once the bin count and bin duration are resolved.
    fn on_bin_layout(&mut self, layout: &BinLayout) {}
    /// Called when the background recording has been calibrated.
    fn on_background(&mut self, background: &Background) {}
    /// Called when the clicks of the sample recording have been detected.
    fn on_sample_detection(&mut self, detection: &Detection) {}
}

impl Observer for () {}

/// Resolved split of a recording into time bins.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BinLayout {
    pub count: usize,
    pub duration: Time,
}

impl BinLayout {
    /// Derive the bin count from the bin duration (or vice versa) for the
    /// given recording.
    ///
    /// With a fixed duration, the bin count is the number of whole bins (each
    /// of the duration rounded to a whole number of samples) that fit in the
    /// recording.
    pub fn resolve(binning: Binning, waveform: &Waveform) -> Result<Self, Error> {
        let layout = match binning {
            Binning::Count(count) => Self {
                count,
                duration: waveform.duration() / count as f64,
            },
            Binning::Duration(duration) => {
                let bin_samples =
                    (duration.get::<second>() * f64::from(waveform.sample_rate())).round() as usize;
                if bin_samples == 0 {
                    return Err(Error::InvalidConfiguration(format!(
                        "bin duration of {} s is shorter than one sample",
                        duration.get::<second>()
                    )));
                }

                Self {
                    count: waveform.len() / bin_samples,
                    duration,
                }
            }
        };

        let seconds = layout.duration.get::<second>();
        if layout.count == 0 || !seconds.is_finite() || seconds <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "can't split a {} s recording into {} bins of {seconds} s",
                waveform.duration().get::<second>(),
                layout.count
            )));
        }

        Ok(layout)
    }
}

/// Output of a complete analysis.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Activity {
    /// Click onsets detected in the sample recording.
    pub events: EventSequence,
    /// Number of clicks in each time bin.
    pub binned_counts: Vec<u32>,
    /// Activity of each time bin, in counts per minute.
    pub activity: Vec<f64>,
    /// Start time of each time bin.
    pub timestamps: Vec<Time>,
    pub bins: BinLayout,
    pub rate: RateSummary,
    /// Distribution of the per-bin activity.
    pub distribution: Distribution,
    pub background: Option<Background>,
}

/// Run the complete analysis of a sample recording, optionally corrected by
/// a background recording.
///
/// This is a shorthand for [`analyse_with`] without an observer.
pub fn analyse(
    config: &Config,
    sample: &Waveform,
    background: Option<&Waveform>,
) -> Result<Activity, Error> {
    analyse_with(config, sample, background, &mut ())
}

/// Run the complete analysis, reporting intermediate results to `observer`.
///
/// Any failing stage aborts the whole analysis.
pub fn analyse_with<O: Observer>(
    config: &Config,
    sample: &Waveform,
    background: Option<&Waveform>,
    observer: &mut O,
) -> Result<Activity, Error> {
    if config.isotope_analysis().is_some() {
        return Err(Error::NotImplemented("isotope analysis"));
    }

    let bins = BinLayout::resolve(config.binning(), sample)?;
    observer.on_bin_layout(&bins);

    let background = background
        .map(|waveform| estimate_background(waveform, config))
        .transpose()?;
    if let Some(background) = &background {
        observer.on_background(background);
    }
    let (noise_floor, background_cpm) = background
        .as_ref()
        .map_or((0.0, 0.0), |b| (b.noise_floor, b.cpm));

    let detection = detect(sample, noise_floor, config)?;
    observer.on_sample_detection(&detection);

    let binned_counts = discretize(&detection.events, bins.count)?;
    let bin_seconds = bins.duration.get::<second>();
    let activity: Vec<f64> = binned_counts
        .iter()
        .map(|&count| f64::from(count) * SECONDS_PER_MINUTE / bin_seconds)
        .collect();
    let timestamps = (0..bins.count)
        .map(|i| bins.duration * i as f64)
        .collect();

    let gross_cpm = count_rate(&detection.events, sample.sample_rate())?;
    let rate = RateSummary::new(gross_cpm, background_cpm);
    let distribution = Distribution::new(&activity, config.histogram_bins())?;

    Ok(Activity {
        events: detection.events,
        binned_counts,
        activity,
        timestamps,
        bins,
        rate,
        distribution,
        background,
    })
}
