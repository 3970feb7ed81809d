use crate::Error;
use num_traits::ToPrimitive;
use std::path::Path;
use uom::si::f64::Time;
use uom::si::time::second;

/// An ordered sequence of amplitude samples taken at a fixed sample rate.
///
/// A [`Waveform`] is immutable once created. It may be empty; stages that
/// need at least one sample report [`Error::InvalidInput`] themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct Waveform {
    sample_rate: u32,
    samples: Vec<f64>,
}

impl Waveform {
    /// Creates a new waveform. Fails if the sample rate is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use geiger::waveform::Waveform;
    ///
    /// let waveform = Waveform::new(44100, vec![0.0, 0.5, -0.5])?;
    /// assert_eq!(waveform.len(), 3);
    /// assert!(Waveform::new(0, vec![0.0]).is_err());
    /// # Ok::<(), geiger::Error>(())
    /// ```
    pub fn new(sample_rate: u32, samples: Vec<f64>) -> Result<Self, Error> {
        if sample_rate == 0 {
            return Err(Error::InvalidInput(String::from(
                "sample rate must be positive",
            )));
        }

        Ok(Self {
            sample_rate,
            samples,
        })
    }
    /// Creates a new waveform from samples of any primitive numeric type,
    /// e.g. raw integer PCM.
    ///
    /// # Examples
    ///
    /// ```
    /// use geiger::waveform::Waveform;
    ///
    /// let waveform = Waveform::from_samples(8000, [0i16, -120, 32767])?;
    /// assert_eq!(waveform.samples(), &[0.0, -120.0, 32767.0]);
    /// # Ok::<(), geiger::Error>(())
    /// ```
    pub fn from_samples<T, I>(sample_rate: u32, samples: I) -> Result<Self, Error>
    where
        T: ToPrimitive,
        I: IntoIterator<Item = T>,
    {
        let samples = samples
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                s.to_f64().ok_or_else(|| {
                    Error::InvalidInput(format!("sample {i} is not representable as f64"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(sample_rate, samples)
    }
    /// Reads a waveform from a WAV file.
    ///
    /// Both integer and floating point PCM are supported. Amplitudes are kept
    /// in the file's own scale (no normalization). Only the first channel of a
    /// multi-channel recording is used.
    pub fn from_wav<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let invalid = |e: hound::Error| {
            Error::InvalidInput(format!("failed to read `{}`: {e}", path.display()))
        };

        let mut reader = hound::WavReader::open(path).map_err(invalid)?;
        let spec = reader.spec();
        let channels = usize::from(spec.channels).max(1);
        if channels > 1 {
            log::warn!(
                "`{}` has {channels} channels, only the first one is analysed",
                path.display()
            );
        }

        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .step_by(channels)
                .map(|s| s.map(f64::from))
                .collect::<Result<Vec<_>, _>>(),
            hound::SampleFormat::Int => reader
                .samples::<i32>()
                .step_by(channels)
                .map(|s| s.map(f64::from))
                .collect::<Result<Vec<_>, _>>(),
        }
        .map_err(invalid)?;
        log::debug!(
            "loaded {} samples at {} Hz from `{}`",
            samples.len(),
            spec.sample_rate,
            path.display()
        );

        Self::new(spec.sample_rate, samples)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    /// Returns the length of the recording.
    pub fn duration(&self) -> Time {
        Time::new::<second>(self.samples.len() as f64 / f64::from(self.sample_rate))
    }
}
