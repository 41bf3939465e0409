//! # Axis Deriver
//!
//! Builds the time axis and the vertical extent of marker lines from a
//! validated [`WaveformBuffer`]. Both are recomputed from scratch whenever
//! the buffer changes and are never edited afterwards.

use crate::WaveformBuffer;

/// Lower padding factor applied to the smallest sample.
const MIN_PAD: f64 = 0.95;
/// Upper padding factor applied to the largest sample.
const MAX_PAD: f64 = 1.05;

/// Placeholder range for an empty buffer. Not a measured range.
pub const PLACEHOLDER_RANGE: AmplitudeRange = AmplitudeRange {
    min: 0.0,
    max: 1000.0,
};

/// Seconds from the start of the buffer, one entry per shared sample.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeAxis(Vec<f64>);

impl TimeAxis {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Vertical span given to marker lines so they cover the full plot height.
///
/// This never clamps or rescales the channel traces themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmplitudeRange {
    pub min: f64,
    pub max: f64,
}

/// Output of [`derive_axes`].
#[derive(Clone, Debug, PartialEq)]
pub struct Axes {
    pub time: TimeAxis,
    pub amplitude: AmplitudeRange,
}

impl Axes {
    /// Axes for a buffer with nothing to plot: no time points and
    /// [`PLACEHOLDER_RANGE`].
    pub fn placeholder() -> Self {
        Self {
            time: TimeAxis::default(),
            amplitude: PLACEHOLDER_RANGE,
        }
    }
}

/// Derive the time axis and amplitude range for `buffer`.
///
/// `time[i] = i / sampling_rate_hz` over the effective sample count. The
/// range is `0.95 * min` and `1.05 * max` taken over both channels together.
/// When all samples are negative the padded bounds can cross, in which case
/// they are returned in ascending order.
///
/// # Example
/// ```
/// use ecg_viewer_lib::{axis::derive_axes, WaveformBuffer};
///
/// let axes = derive_axes(&WaveformBuffer::new(vec![1.0, 2.0], vec![10.0, 20.0], 2));
/// assert_eq!(axes.time.values(), &[0.0, 0.5]);
/// assert!((axes.amplitude.max - 21.0).abs() < 1e-9);
/// ```
pub fn derive_axes(buffer: &WaveformBuffer) -> Axes {
    let n = buffer.effective_len();
    if n == 0 {
        return Axes::placeholder();
    }

    let time = TimeAxis((0..n).map(|i| buffer.time_of(i)).collect());

    // Range spans every sample of both channels, trailing ones included.
    let (lo, hi) = buffer
        .ch1()
        .iter()
        .chain(buffer.ch2())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let (min, max) = (lo * MIN_PAD, hi * MAX_PAD);
    let amplitude = if max >= min {
        AmplitudeRange { min, max }
    } else {
        AmplitudeRange { min: max, max: min }
    };

    Axes { time, amplitude }
}
