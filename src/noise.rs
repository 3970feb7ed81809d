use crate::config::Config;
use crate::detector::{detect, Detection};
use crate::rate::count_rate;
use crate::waveform::Waveform;
use crate::Error;
use serde::Serialize;

/// Calibration obtained from a background recording.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Background {
    /// Mean absolute amplitude of the background recording.
    pub noise_floor: f64,
    /// Count rate of the background itself, in counts per minute.
    pub cpm: f64,
    pub detection: Detection,
}

/// Returns the mean absolute amplitude of a waveform.
///
/// # Examples
///
/// ```
/// use geiger::noise::noise_floor;
/// use geiger::waveform::Waveform;
///
/// let background = Waveform::new(8000, vec![1.0, -3.0, 2.0, -2.0])?;
/// assert_eq!(noise_floor(&background)?, 2.0);
/// # Ok::<(), geiger::Error>(())
/// ```
pub fn noise_floor(waveform: &Waveform) -> Result<f64, Error> {
    if waveform.is_empty() {
        return Err(Error::InvalidInput(String::from(
            "the noise floor of an empty waveform is undefined",
        )));
    }

    let sum: f64 = waveform.samples().iter().map(|s| s.abs()).sum();
    Ok(sum / waveform.len() as f64)
}

/// Estimate the noise floor of a background recording and the count rate
/// the background produces on its own once that floor is subtracted.
pub fn estimate_background(waveform: &Waveform, config: &Config) -> Result<Background, Error> {
    let noise_floor = noise_floor(waveform)?;
    let detection = detect(waveform, noise_floor, config)?;
    let cpm = count_rate(&detection.events, waveform.sample_rate())?;
    log::debug!("background noise floor {noise_floor}, {cpm} cpm");

    Ok(Background {
        noise_floor,
        cpm,
        detection,
    })
}
