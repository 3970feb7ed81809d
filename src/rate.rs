use crate::detector::EventSequence;
use crate::Error;
use serde::Serialize;

/// Converts rates per second into counts per minute.
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Returns the mean count rate of an event sequence, in counts per minute.
///
/// The mean is taken over the length of the event sequence, i.e. the samples
/// covered by the detector's scan, and not over the length of the waveform
/// it came from (the unscanned tail is excluded). A rate normalized by the
/// true elapsed time of the recording would be slightly lower.
///
/// # Examples
///
/// ```
/// use geiger::detector::EventSequence;
/// use geiger::rate::count_rate;
///
/// let events = EventSequence::try_from(vec![0, 1, 0, 0])?;
/// assert_eq!(count_rate(&events, 2)?, 30.0);
/// # Ok::<(), geiger::Error>(())
/// ```
pub fn count_rate(events: &EventSequence, sample_rate: u32) -> Result<f64, Error> {
    if events.is_empty() {
        return Err(Error::InvalidInput(String::from(
            "the count rate of an empty event sequence is undefined",
        )));
    }

    let mean = events.count() as f64 / events.len() as f64;
    Ok(mean * f64::from(sample_rate) * SECONDS_PER_MINUTE)
}

/// Count rate of a sample net of the background.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RateSummary {
    /// Count rate of the sample recording alone.
    pub gross_cpm: f64,
    /// Count rate of the background recording (zero without one).
    pub background_cpm: f64,
    /// Net count rate. Negative if the background is more active than the
    /// sample.
    pub cpm: f64,
}

impl RateSummary {
    pub fn new(gross_cpm: f64, background_cpm: f64) -> Self {
        Self {
            gross_cpm,
            background_cpm,
            cpm: gross_cpm - background_cpm,
        }
    }
    /// Net activity in Becquerel.
    pub fn becquerel(&self) -> f64 {
        self.cpm / SECONDS_PER_MINUTE
    }
}
