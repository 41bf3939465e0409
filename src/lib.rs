//! # ECG Viewer Core Library
//!
//! This library provides the waveform-interaction engine behind the ECG event
//! viewer: given a two-channel sample buffer and the sample index of a detected
//! event, it derives a time axis, an event marker, a cursor-follow readout and
//! vertical bounds for marker lines, and keeps them consistent as the pointer
//! moves across the plot.
//!
//! ## Design Philosophy
//!
//! ### Pure Derived State
//! - **Recomputed, never mutated**: time axis, amplitude range, event position and
//!   trace list are pure functions of the selected event's buffer and marker
//! - **One piece of transient state**: the hovered sample index, scoped to the
//!   single displayed event and cleared whenever another event is selected
//! - **No I/O in the core**: fetching lives in [`api`], rendering in [`renderer`]
//!
//! ### Data Flow
//! 1. **Validate**: [`validator`] rejects empty or asymmetric buffers
//! 2. **Derive**: [`axis`] builds the time axis and marker-line extent
//! 3. **Locate**: [`locator`] normalizes the event's sample index into bounds
//! 4. **Hover**: [`cursor`] maps pointer pixels to a sample index
//! 5. **Compose**: [`traces`] assembles channel, cursor and event line series
//!
//! ## Core Types
//!
//! - [`WaveformBuffer`]: the raw two-channel recording
//! - [`EventMarker`]: the event's raw sample index and display label

use serde::{Deserialize, Serialize};

// Module declarations
pub mod api;
pub mod axis;
pub mod config;
pub mod cursor;
pub mod fallback;
pub mod locator;
pub mod renderer;
pub mod traces;
pub mod validator;
pub mod view;

/// Sampling rate assumed when a payload carries no waveform at all.
pub const DEFAULT_SAMPLING_RATE_HZ: u32 = 200;

/// Two-channel ECG recording as delivered by the event detail service.
///
/// The channels are aligned sample-for-sample. When their lengths differ the
/// trailing samples of the longer one are ignored; this is never an error.
/// A channel missing from the payload deserializes as `None`.
///
/// # Example
/// ```
/// use ecg_viewer_lib::WaveformBuffer;
///
/// let buffer = WaveformBuffer::new(vec![1.0, 2.0, 3.0], vec![10.0, 20.0], 2);
/// assert_eq!(buffer.effective_len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveformBuffer {
    /// Lead 1 samples
    #[serde(default)]
    pub ch1: Option<Vec<f64>>,
    /// Lead 2 samples
    #[serde(default)]
    pub ch2: Option<Vec<f64>>,
    /// Samples per second
    #[serde(rename = "sampling_rate", default = "default_sampling_rate")]
    pub sampling_rate_hz: u32,
}

fn default_sampling_rate() -> u32 {
    DEFAULT_SAMPLING_RATE_HZ
}

impl WaveformBuffer {
    pub fn new(ch1: Vec<f64>, ch2: Vec<f64>, sampling_rate_hz: u32) -> Self {
        Self {
            ch1: Some(ch1),
            ch2: Some(ch2),
            sampling_rate_hz,
        }
    }

    /// Empty buffer used when the detail payload carries no waveform.
    pub fn empty(sampling_rate_hz: u32) -> Self {
        Self::new(Vec::new(), Vec::new(), sampling_rate_hz)
    }

    /// Lead 1 samples, empty when absent.
    pub fn ch1(&self) -> &[f64] {
        self.ch1.as_deref().unwrap_or_default()
    }

    /// Lead 2 samples, empty when absent.
    pub fn ch2(&self) -> &[f64] {
        self.ch2.as_deref().unwrap_or_default()
    }

    /// Number of samples both channels share: `min(len(ch1), len(ch2))`.
    pub fn effective_len(&self) -> usize {
        self.ch1().len().min(self.ch2().len())
    }

    /// Time in seconds of sample `index`.
    pub fn time_of(&self, index: usize) -> f64 {
        index as f64 / self.sampling_rate_hz as f64
    }
}

/// The event highlighted on the waveform.
///
/// `sample_index` is kept exactly as received; it may be absent, zero,
/// negative or past the end of the buffer. [`locator::locate_event`]
/// normalizes it before use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMarker {
    /// Raw sample index reported by the detector
    pub sample_index: Option<i64>,
    /// Event type shown on the marker line
    pub label: String,
}

impl EventMarker {
    pub fn new(sample_index: Option<i64>, label: impl Into<String>) -> Self {
        Self {
            sample_index,
            label: label.into(),
        }
    }
}
