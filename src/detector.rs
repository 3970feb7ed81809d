use crate::config::Config;
use crate::waveform::Waveform;
use crate::Error;
use serde::Serialize;
use uom::si::f64::Time;
use uom::si::time::second;

/// Binary markers of click onsets, one per scanned sample.
///
/// A `1` marks a detected click onset. Every onset is followed by the zeros
/// that span its dead time, so the length of an [`EventSequence`] is the
/// number of samples covered by the scan (which stops one dead time before
/// the end of the waveform).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventSequence(Vec<u8>);

impl EventSequence {
    /// Returns the markers, `0` or `1` each.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Returns the number of markers, i.e. the number of scanned samples.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Returns the number of detected onsets.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&e| e == 1).count()
    }
    /// Returns an iterator over the indices of the detected onsets.
    pub fn onsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, &e)| e == 1)
            .map(|(i, _)| i)
    }
}

impl TryFrom<Vec<u8>> for EventSequence {
    type Error = Error;

    /// Converts a vector of markers into an [`EventSequence`]. Fails if any
    /// marker is not `0` or `1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use geiger::detector::EventSequence;
    ///
    /// let events = EventSequence::try_from(vec![0, 1, 0, 0, 1])?;
    /// assert_eq!(events.count(), 2);
    /// assert!(EventSequence::try_from(vec![0, 2]).is_err());
    /// # Ok::<(), geiger::Error>(())
    /// ```
    fn try_from(markers: Vec<u8>) -> Result<Self, Self::Error> {
        if let Some(i) = markers.iter().position(|&m| m > 1) {
            return Err(Error::InvalidInput(format!(
                "event marker {i} is {}, expected 0 or 1",
                markers[i]
            )));
        }

        Ok(Self(markers))
    }
}

/// Result of scanning a waveform for clicks.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Detection {
    pub events: EventSequence,
    /// Maximum amplitude after noise subtraction.
    pub peak: f64,
    /// Amplitude a sample had to exceed to count as an onset.
    pub threshold: f64,
    /// Dead time in samples.
    pub dead_samples: usize,
}

/// Number of samples spanned by `dead_time` at the given sample rate.
pub fn dead_samples(dead_time: Time, sample_rate: u32) -> usize {
    (dead_time.get::<second>() * f64::from(sample_rate)).round() as usize
}

/// Detect click onsets in a waveform.
///
/// The magnitude of every sample is reduced by the magnitude of the noise
/// floor, and the detection threshold is the configured significance times
/// the largest reduced amplitude. The waveform is then scanned left to right:
/// a sample above the threshold emits an onset followed by the zeros of its
/// dead time and the scan resumes after the dead time; any other sample emits
/// a single zero. The last dead time worth of samples is never scanned.
///
/// If the dead time is shorter than half a sample, every sample is a
/// candidate onset on its own.
///
/// # Examples
///
/// ```
/// use geiger::config::Config;
/// use geiger::detector::detect;
/// use geiger::waveform::Waveform;
/// use uom::si::f64::Time;
/// use uom::si::time::second;
///
/// let waveform = Waveform::new(1, vec![0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0])?;
/// let config = Config::builder()
///     .dead_time(Time::new::<second>(3.0))
///     .significance(0.5)
///     .bin_count(1)
///     .build()?;
///
/// let detection = detect(&waveform, 0.0, &config)?;
/// assert_eq!(detection.events.as_slice(), &[0, 0, 1, 0, 0, 0, 1, 0, 0]);
/// assert_eq!(detection.threshold, 5.0);
/// # Ok::<(), geiger::Error>(())
/// ```
pub fn detect(waveform: &Waveform, noise_floor: f64, config: &Config) -> Result<Detection, Error> {
    if waveform.is_empty() {
        return Err(Error::InvalidInput(String::from(
            "can't detect clicks in an empty waveform",
        )));
    }

    let noise_floor = noise_floor.abs();
    let adjusted: Vec<f64> = waveform
        .samples()
        .iter()
        .map(|s| s.abs() - noise_floor)
        .collect();
    let peak = adjusted.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let threshold = config.significance() * peak;

    let dead_samples = dead_samples(config.dead_time(), waveform.sample_rate());
    if dead_samples == 0 {
        log::warn!(
            "dead time of {} s is shorter than one sample at {} Hz, no dead time is applied",
            config.dead_time().get::<second>(),
            waveform.sample_rate()
        );
    }
    let step = dead_samples.max(1);
    let end = adjusted.len().saturating_sub(dead_samples);

    // `i + step <= len` holds whenever an onset is emitted.
    let mut events = Vec::with_capacity(adjusted.len());
    let mut i = 0;
    while i < end {
        if adjusted[i] > threshold {
            events.push(1);
            events.resize(events.len() + step - 1, 0);
            i += step;
        } else {
            events.push(0);
            i += 1;
        }
    }
    log::debug!(
        "peak {peak}, threshold {threshold}, dead time {dead_samples} samples, {} events over {} samples",
        events.iter().filter(|&&e| e == 1).count(),
        events.len()
    );

    Ok(Detection {
        events: EventSequence(events),
        peak,
        threshold,
        dead_samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::synthetic_recording;
    use uom::si::time::millisecond;

    fn config(dead_time: Time, significance: f64) -> Config {
        Config::builder()
            .dead_time(dead_time)
            .significance(significance)
            .bin_count(1)
            .build()
            .unwrap()
    }

    fn waveform(samples: &[f64]) -> Waveform {
        Waveform::new(1, samples.to_vec()).unwrap()
    }

    #[test]
    fn detect_two_clicks() {
        let waveform = waveform(&[0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0]);
        let detection = detect(&waveform, 0.0, &config(Time::new::<second>(3.0), 0.5)).unwrap();

        assert_eq!(detection.events.onsets().collect::<Vec<_>>(), vec![2, 6]);
        assert_eq!(detection.events.len(), 9);
        assert_eq!(detection.peak, 10.0);
        assert_eq!(detection.threshold, 5.0);
        assert_eq!(detection.dead_samples, 3);
    }

    #[test]
    fn detect_empty_waveform() {
        let waveform = waveform(&[]);
        assert!(matches!(
            detect(&waveform, 0.0, &config(Time::new::<second>(1.0), 0.5)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn detect_merges_excursion_within_dead_time() {
        // A single click spanning several samples above the threshold.
        let waveform = waveform(&[0.0, 9.0, -10.0, 8.0, -6.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let detection = detect(&waveform, 0.0, &config(Time::new::<second>(4.0), 0.5)).unwrap();

        assert_eq!(detection.events.onsets().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn detect_without_dead_time_suppression() {
        let waveform = waveform(&[0.0, 9.0, -10.0, 8.0, 0.0]);
        let detection = detect(&waveform, 0.0, &config(Time::new::<millisecond>(100.0), 0.5)).unwrap();

        assert_eq!(detection.dead_samples, 0);
        assert_eq!(detection.events.as_slice(), &[0, 1, 1, 1, 0]);
    }

    #[test]
    fn detect_tail_is_not_scanned() {
        let waveform = waveform(&[0.0, 0.0, 0.0, 0.0, 10.0, 0.0]);
        let detection = detect(&waveform, 0.0, &config(Time::new::<second>(2.0), 0.5)).unwrap();

        assert_eq!(detection.events.as_slice(), &[0, 0, 0, 0]);
    }

    #[test]
    fn detect_waveform_shorter_than_dead_time() {
        let waveform = waveform(&[10.0, 0.0]);
        let detection = detect(&waveform, 0.0, &config(Time::new::<second>(5.0), 0.5)).unwrap();

        assert!(detection.events.is_empty());
    }

    #[test]
    fn detect_dead_time_longer_than_waveform() {
        let waveform = Waveform::new(44100, vec![0.0, 1.0, 0.0, 0.0]).unwrap();
        let detection = detect(&waveform, 0.0, &config(Time::new::<second>(1e9), 0.5)).unwrap();

        assert!(detection.events.is_empty());
        assert_eq!(detection.dead_samples, 44_100_000_000_000);
    }

    #[test]
    fn detect_significance_zero() {
        let waveform = waveform(&[0.0, 1.0, 0.0, 0.5, 0.0, 0.0, 2.0, 0.0]);
        let detection = detect(&waveform, 0.0, &config(Time::new::<second>(1.0), 0.0)).unwrap();

        assert_eq!(detection.threshold, 0.0);
        assert_eq!(detection.events.onsets().collect::<Vec<_>>(), vec![1, 3, 6]);
    }

    #[test]
    fn detect_significance_one() {
        // The threshold equals the global maximum, which is never strictly
        // exceeded.
        let waveform = waveform(&[0.0, 4.0, 0.0, 10.0, 0.0, 10.0, 0.0]);
        let detection = detect(&waveform, 0.0, &config(Time::new::<second>(1.0), 1.0)).unwrap();

        assert_eq!(detection.threshold, 10.0);
        assert_eq!(detection.events.count(), 0);
    }

    #[test]
    fn detect_noise_floor_cancels_offset() {
        let clean = waveform(&[0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0]);
        let shifted = waveform(&[2.0, 2.0, 12.0, 2.0, 2.0, 2.0, 12.0, 2.0, 2.0, 2.0]);
        let config = config(Time::new::<second>(3.0), 0.5);

        let clean = detect(&clean, 0.0, &config).unwrap();
        // The sign of the noise floor is irrelevant.
        let shifted = detect(&shifted, -2.0, &config).unwrap();

        assert_eq!(clean, shifted);
    }

    #[test]
    fn detect_synthetic_recording() {
        let (waveform, clicks) = synthetic_recording(8000, 20.0, 5.0, 0.05, 42).unwrap();
        let config = config(Time::new::<millisecond>(1.0), 0.3);
        let detection = detect(&waveform, 0.0, &config).unwrap();

        let events = detection.events.as_slice();
        assert!(events.iter().all(|&e| e == 0 || e == 1));
        assert!(events.len() <= waveform.len());

        // Clicks closer than the dead time (or in the unscanned tail) merge.
        let count = detection.events.count();
        assert!(count <= clicks.len());
        assert!(count + 3 >= clicks.len());

        let onsets: Vec<_> = detection.events.onsets().collect();
        for pair in onsets.windows(2) {
            assert!(pair[1] - pair[0] >= detection.dead_samples);
        }
    }

    #[test]
    fn detect_is_idempotent() {
        let (waveform, _) = synthetic_recording(4000, 5.0, 20.0, 0.1, 7).unwrap();
        let config = config(Time::new::<millisecond>(2.0), 0.3);

        assert_eq!(
            detect(&waveform, 0.02, &config).unwrap(),
            detect(&waveform, 0.02, &config).unwrap()
        );
    }
}
