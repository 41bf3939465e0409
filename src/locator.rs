//! # Event Locator
//!
//! Normalizes the detector's raw sample index into the bounds of the buffer.
//!
//! ## Normalization Rules
//! - **Absent, zero or negative**: the event is placed at the buffer midpoint
//!   `floor(n / 2)`. A genuine event at sample 0 is therefore indistinguishable
//!   from "no event supplied".
//! - **Past the end**: clamped to the last sample `n - 1`.
//! - **Otherwise**: used as-is.

/// Normalized event position within the buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventPosition {
    /// Sample index in `[0, n)`
    pub index: usize,
    /// `index / sampling_rate_hz`, in seconds
    pub time: f64,
}

/// Normalize `raw` against `n` shared samples.
///
/// Returns `None` only when `n == 0`, where no index is in bounds.
///
/// # Example
/// ```
/// use ecg_viewer_lib::locator::normalize_index;
///
/// assert_eq!(normalize_index(Some(5), 10), Some(5));
/// assert_eq!(normalize_index(None, 10), Some(5));
/// assert_eq!(normalize_index(Some(0), 10), Some(5));
/// assert_eq!(normalize_index(Some(9999), 10), Some(9));
/// ```
pub fn normalize_index(raw: Option<i64>, n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }

    match raw {
        Some(index) if index > 0 => Some(usize::try_from(index).map_or(n - 1, |i| i.min(n - 1))),
        _ => Some(n / 2),
    }
}

/// Normalize `raw` and attach its time in seconds.
pub fn locate_event(raw: Option<i64>, n: usize, sampling_rate_hz: u32) -> Option<EventPosition> {
    normalize_index(raw, n).map(|index| EventPosition {
        index,
        time: index as f64 / sampling_rate_hz as f64,
    })
}
