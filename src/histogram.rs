use crate::Error;
use serde::Serialize;

/// Frequency distribution of a set of values over equal-width bins.
///
/// The bins span the range of the values. If every value is the same, the
/// range is widened by `0.5` on each side. Every bin is half-open except the
/// last one, which also includes its right edge.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Distribution {
    /// Bin edges (length = number of bins + 1).
    pub edges: Vec<f64>,
    /// Number of values in each bin.
    pub counts: Vec<u32>,
}

impl Distribution {
    /// # Examples
    ///
    /// ```
    /// use geiger::histogram::Distribution;
    ///
    /// let distribution = Distribution::new(&[0.0, 1.0, 1.0, 4.0], 4)?;
    /// assert_eq!(distribution.edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(distribution.counts, vec![1, 2, 0, 1]);
    /// # Ok::<(), geiger::Error>(())
    /// ```
    pub fn new(values: &[f64], bins: usize) -> Result<Self, Error> {
        if bins == 0 {
            return Err(Error::InvalidConfiguration(String::from(
                "a distribution needs at least one bin",
            )));
        }
        if values.is_empty() {
            return Err(Error::InvalidInput(String::from(
                "can't build a distribution of no values",
            )));
        }

        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "can't build a distribution of non-finite value {v}"
            )));
        }

        let (mut low, mut high) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if low == high {
            low -= 0.5;
            high += 0.5;
        }

        let width = (high - low) / bins as f64;
        let edges = (0..=bins)
            .map(|i| if i == bins { high } else { low + width * i as f64 })
            .collect();

        let mut counts = vec![0; bins];
        for &v in values {
            let index = ((v - low) / (high - low) * bins as f64) as usize;
            counts[index.min(bins - 1)] += 1;
        }

        Ok(Self { edges, counts })
    }
}
