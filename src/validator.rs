//! # Sample Validator
//!
//! Structural checks on an incoming [`WaveformBuffer`] before anything is
//! derived from it. Nothing downstream runs on a rejected buffer; the view
//! shows a placeholder message instead of a plot.

use crate::WaveformBuffer;
use thiserror::Error;
use tracing::debug;

/// Reasons a waveform cannot be plotted.
///
/// Both variants are local and non-fatal. The display text doubles as the
/// placeholder shown in place of the plot.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveformError {
    /// Neither channel has any samples
    #[error("No ECG data available")]
    NoData,

    /// One channel is missing or empty while the other carries samples,
    /// or the sampling rate is zero
    #[error("Invalid ECG data format")]
    MalformedBuffer,
}

/// Check `buffer` and return its effective sample count.
///
/// Asymmetric emptiness is reported as [`WaveformError::MalformedBuffer`]
/// even though it also leaves no shared samples; only a buffer where both
/// channels are empty is [`WaveformError::NoData`].
///
/// # Example
/// ```
/// use ecg_viewer_lib::{validator::{validate, WaveformError}, WaveformBuffer};
///
/// let ok = WaveformBuffer::new(vec![1.0, 2.0], vec![3.0, 4.0, 5.0], 200);
/// assert_eq!(validate(&ok), Ok(2));
///
/// let lopsided = WaveformBuffer::new(vec![1.0], vec![], 200);
/// assert_eq!(validate(&lopsided), Err(WaveformError::MalformedBuffer));
/// ```
pub fn validate(buffer: &WaveformBuffer) -> Result<usize, WaveformError> {
    let (len1, len2) = (buffer.ch1().len(), buffer.ch2().len());

    if (len1 == 0) != (len2 == 0) {
        debug!(len1, len2, "rejecting waveform with one empty channel");
        return Err(WaveformError::MalformedBuffer);
    }

    let n = buffer.effective_len();
    if n == 0 {
        debug!("rejecting waveform without samples");
        return Err(WaveformError::NoData);
    }

    if buffer.sampling_rate_hz == 0 {
        debug!("rejecting waveform with zero sampling rate");
        return Err(WaveformError::MalformedBuffer);
    }

    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_buffer_reports_shared_length() {
        let buffer = WaveformBuffer::new(vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0], 250);
        assert_eq!(validate(&buffer), Ok(2));
    }

    #[test]
    fn test_both_empty_is_no_data() {
        assert_eq!(
            validate(&WaveformBuffer::empty(200)),
            Err(WaveformError::NoData)
        );
    }

    #[test]
    fn test_both_absent_is_no_data() {
        let buffer = WaveformBuffer {
            ch1: None,
            ch2: None,
            sampling_rate_hz: 200,
        };
        assert_eq!(validate(&buffer), Err(WaveformError::NoData));
    }

    #[test]
    fn test_asymmetric_emptiness_is_malformed() {
        let empty_second = WaveformBuffer::new(vec![1.0, 2.0], vec![], 200);
        assert_eq!(validate(&empty_second), Err(WaveformError::MalformedBuffer));

        let missing_first = WaveformBuffer {
            ch1: None,
            ch2: Some(vec![1.0]),
            sampling_rate_hz: 200,
        };
        assert_eq!(validate(&missing_first), Err(WaveformError::MalformedBuffer));
    }

    #[test]
    fn test_zero_sampling_rate_is_malformed() {
        let buffer = WaveformBuffer::new(vec![1.0], vec![2.0], 0);
        assert_eq!(validate(&buffer), Err(WaveformError::MalformedBuffer));
    }

    #[test]
    fn test_placeholder_messages() {
        assert_eq!(WaveformError::NoData.to_string(), "No ECG data available");
        assert_eq!(
            WaveformError::MalformedBuffer.to_string(),
            "Invalid ECG data format"
        );
    }
}
