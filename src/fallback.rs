//! # Synthetic Demo Event
//!
//! This module provides an offline stand-in for the event detail service: a
//! deterministic two-channel ECG built from Gaussian P, Q, R, S and T waves,
//! with a rhythm change at the middle of the buffer marked as the event.
//!
//! ## Model Characteristics
//! - **Before the event**: sinus rhythm at 75 bpm (0.8 s beat period)
//! - **After the event**: tachycardia at ~140 bpm (0.43 s beat period)
//! - **Channel 2**: the same beats at 60% amplitude on a lower baseline
//! - **Baseline**: positive offset so samples read like raw ADC counts
//!
//! The metadata's `event_type` is "DEMO" so the display makes the source obvious.

use crate::api::{EventDetail, EventMetadata};
use crate::WaveformBuffer;
use chrono::{DateTime, SecondsFormat, Utc};

const SINUS_PERIOD_S: f64 = 0.8;
const TACHY_PERIOD_S: f64 = 0.43;

/// (center within beat in s, width in s, amplitude)
const WAVES: [(f64, f64, f64); 5] = [
    (0.10, 0.025, 150.0),  // P
    (0.19, 0.010, -100.0), // Q
    (0.22, 0.012, 1200.0), // R
    (0.25, 0.010, -250.0), // S
    (0.40, 0.040, 300.0),  // T
];

const CH1_BASELINE: f64 = 500.0;
const CH2_BASELINE: f64 = 450.0;
const CH2_GAIN: f64 = 0.6;

/// Amplitude of one beat, `beat_t` seconds after it starts.
fn beat(beat_t: f64, period: f64) -> f64 {
    // Compress the wave timing for short beats so T does not spill over.
    let scale = (period / SINUS_PERIOD_S).min(1.0);
    WAVES
        .iter()
        .map(|&(center, width, amplitude)| {
            let (center, width) = (center * scale, width * scale.max(0.6));
            amplitude * (-((beat_t - center) / width).powi(2) / 2.0).exp()
        })
        .sum()
}

/// Build a synthetic event `seconds` long at `rate_hz`.
/// If `now` is `None`, fall back to `Utc::now()` for the metadata timestamp.
pub fn synthetic_event(now: Option<DateTime<Utc>>, rate_hz: u32, seconds: u32) -> EventDetail {
    let now = now.unwrap_or_else(Utc::now);
    let n = rate_hz as usize * seconds as usize;
    let event_index = n / 2;
    let event_t = event_index as f64 / rate_hz as f64;

    let mut ch1 = Vec::with_capacity(n);
    let mut ch2 = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f64 / rate_hz as f64;
        let value = if t < event_t {
            beat(t % SINUS_PERIOD_S, SINUS_PERIOD_S)
        } else {
            beat((t - event_t) % TACHY_PERIOD_S, TACHY_PERIOD_S)
        };
        ch1.push(CH1_BASELINE + value);
        ch2.push(CH2_BASELINE + CH2_GAIN * value);
    }

    EventDetail {
        metadata: EventMetadata {
            patient_id: "demo-patient".to_string(),
            event_type: "DEMO".to_string(),
            event_time_iso: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            is_approved: false,
        },
        waveform: Some(WaveformBuffer::new(ch1, ch2, rate_hz)),
        event_sample_index: Some(event_index as i64),
        event_time_offset_seconds: event_t,
    }
}
