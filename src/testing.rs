use crate::waveform::Waveform;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};

// Shape of a single click: a decaying bipolar ringing of a few samples.
const CLICK: [f64; 5] = [1.0, -0.6, 0.36, -0.216, 0.1296];

#[derive(Debug)]
/// An iterator over a Poisson process.
///
/// The iterator yields times (in seconds) at which clicks occur. Times are in
/// increasing order and their inter-arrival time follows an exponential
/// distribution with the specified rate (in Hz).
pub(crate) struct PoissonProcess<R> {
    time: f64,
    exp: Exp<f64>,
    rng: R,
}

impl<R> PoissonProcess<R>
where
    R: Rng,
{
    pub(crate) fn new(rate: f64, rng: R) -> Result<Self> {
        Ok(Self {
            time: 0.0,
            exp: Exp::new(rate).context("failed to create exponential distribution")?,
            rng,
        })
    }
}

impl<R> Iterator for PoissonProcess<R>
where
    R: Rng,
{
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        self.time += self.exp.sample(&mut self.rng);

        Some(self.time)
    }
}

/// Synthesize a Geiger counter recording: clicks arriving as a Poisson
/// process on top of uniform noise of the given amplitude.
///
/// Returns the waveform and the sample index of every click onset.
pub(crate) fn synthetic_recording(
    sample_rate: u32,
    duration: f64,
    click_rate: f64,
    noise: f64,
    seed: u64,
) -> Result<(Waveform, Vec<usize>)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let len = (duration * f64::from(sample_rate)).round() as usize;

    let onsets: Vec<usize> = PoissonProcess::new(click_rate, &mut rng)?
        .take_while(|&t| t < duration)
        .map(|t| (t * f64::from(sample_rate)) as usize)
        .filter(|&i| i < len)
        .collect();

    let mut samples: Vec<f64> = (0..len)
        .map(|_| rng.random_range(-noise..=noise))
        .collect();
    for &onset in &onsets {
        for (sample, click) in samples[onset..].iter_mut().zip(CLICK) {
            *sample += click;
        }
    }

    let waveform = Waveform::new(sample_rate, samples)?;
    Ok((waveform, onsets))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poisson_process_increasing() {
        let times: Vec<f64> = PoissonProcess::new(10.0, StdRng::seed_from_u64(1))
            .unwrap()
            .take(100)
            .collect();

        assert!(times.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn synthetic_recording_shape() {
        let (waveform, onsets) = synthetic_recording(1000, 2.0, 50.0, 0.0, 3).unwrap();

        assert_eq!(waveform.len(), 2000);
        assert!(!onsets.is_empty());
        assert!(onsets.iter().all(|&i| waveform.samples()[i] != 0.0));
    }
}
