use crate::detector::EventSequence;
use crate::Error;
use std::ops::Range;

// Near-equal contiguous partition of `0..len`: the first `len % bins` ranges
// hold one extra element.
fn segments(len: usize, bins: usize) -> impl Iterator<Item = Range<usize>> {
    let (size, extra) = (len / bins, len % bins);

    (0..bins).scan(0, move |start, i| {
        let end = *start + size + usize::from(i < extra);
        let range = *start..end;
        *start = end;
        Some(range)
    })
}

/// Split an event sequence into `bins` contiguous segments of near-equal
/// length and count the events in each one.
///
/// Fails if `bins` is zero or larger than the number of markers.
///
/// # Examples
///
/// ```
/// use geiger::detector::EventSequence;
/// use geiger::discretize::discretize;
///
/// let events = EventSequence::try_from(vec![1, 0, 0, 1, 1, 0, 0, 0, 1, 0, 0, 1])?;
/// // Segment lengths are [3, 3, 2, 2, 2].
/// assert_eq!(discretize(&events, 5)?, vec![1, 2, 0, 1, 1]);
/// # Ok::<(), geiger::Error>(())
/// ```
pub fn discretize(events: &EventSequence, bins: usize) -> Result<Vec<u32>, Error> {
    let len = events.len();
    if bins == 0 || bins > len {
        return Err(Error::InvalidConfiguration(format!(
            "can't split {len} event markers into {bins} bins"
        )));
    }

    let markers = events.as_slice();
    let counts = segments(len, bins)
        .map(|range| markers[range].iter().map(|&e| u32::from(e)).sum())
        .collect();

    Ok(counts)
}
