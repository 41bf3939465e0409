//! # Trace Composer
//!
//! Assembles the renderable line series for one event from the outputs of
//! the validator, axis deriver, event locator and cursor mapper.
//!
//! Order is part of the contract, since it drives legend order and z-order:
//! 1. Channel 1
//! 2. Channel 2
//! 3. Cursor line, only while a sample is hovered
//! 4. Event line, whenever the event has a position in the buffer
//!
//! Composition is pure. Identical inputs always give an identical trace list.

use crate::axis::{AmplitudeRange, TimeAxis};
use crate::locator::EventPosition;
use crate::validator::WaveformError;
use crate::WaveformBuffer;

/// Which series a [`RenderTrace`] represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraceKind {
    Channel1,
    Channel2,
    Cursor,
    Event,
}

impl TraceKind {
    /// Stable visual identity of each series.
    pub fn style(&self) -> TraceStyle {
        match self {
            TraceKind::Channel1 => TraceStyle::solid("#3b82f6", 1.5),
            TraceKind::Channel2 => TraceStyle::solid("#10b981", 1.5),
            TraceKind::Cursor => TraceStyle {
                color: "#6366f1",
                width: 2.0,
                dash: LineDash::Dash,
            },
            TraceKind::Event => TraceStyle::solid("#ef4444", 3.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineDash {
    Solid,
    Dash,
}

/// Line appearance handed to the rendering surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceStyle {
    /// Hex RGB color
    pub color: &'static str,
    /// Stroke width in surface units
    pub width: f32,
    pub dash: LineDash,
}

impl TraceStyle {
    const fn solid(color: &'static str, width: f32) -> Self {
        Self {
            color,
            width,
            dash: LineDash::Solid,
        }
    }
}

/// One labeled line series ready for plotting.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderTrace {
    pub kind: TraceKind,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Legend name
    pub label: String,
    pub style: TraceStyle,
    pub show_in_legend: bool,
    /// Fixed hover readout; `None` lets the surface show time and amplitude per point
    pub hover_text: Option<String>,
}

/// Everything the composer reads.
#[derive(Clone, Copy, Debug)]
pub struct TraceInputs<'a> {
    pub buffer: &'a WaveformBuffer,
    pub validation: Result<usize, WaveformError>,
    pub time: &'a TimeAxis,
    pub amplitude: AmplitudeRange,
    pub hovered: Option<usize>,
    pub event: Option<EventPosition>,
    pub label: &'a str,
}

/// Build the ordered trace list.
///
/// Returns an empty list when the buffer was rejected or has no shared
/// samples; the caller shows a placeholder instead of a plot.
pub fn compose_traces(inputs: &TraceInputs<'_>) -> Vec<RenderTrace> {
    let n = match inputs.validation {
        Ok(n) => n
            .min(inputs.buffer.effective_len())
            .min(inputs.time.len()),
        Err(_) => return Vec::new(),
    };
    if n == 0 {
        return Vec::new();
    }
    let rate = inputs.buffer.sampling_rate_hz as f64;
    let span = vec![inputs.amplitude.min, inputs.amplitude.max];

    let mut traces = Vec::with_capacity(4);
    traces.push(channel_trace(
        TraceKind::Channel1,
        "Channel 1",
        &inputs.time.values()[..n],
        &inputs.buffer.ch1()[..n],
    ));
    traces.push(channel_trace(
        TraceKind::Channel2,
        "Channel 2",
        &inputs.time.values()[..n],
        &inputs.buffer.ch2()[..n],
    ));

    if let Some(hovered) = inputs.hovered.filter(|&i| i < n) {
        let t = hovered as f64 / rate;
        traces.push(RenderTrace {
            kind: TraceKind::Cursor,
            x: vec![t, t],
            y: span.clone(),
            label: "Hover".to_string(),
            style: TraceKind::Cursor.style(),
            show_in_legend: false,
            hover_text: Some(format!("Time: {:.3}s", t)),
        });
    }

    if let Some(event) = inputs.event.filter(|e| e.index < n) {
        traces.push(RenderTrace {
            kind: TraceKind::Event,
            x: vec![event.time, event.time],
            y: span,
            label: format!("Event: {}", inputs.label),
            style: TraceKind::Event.style(),
            show_in_legend: true,
            hover_text: Some(format!(
                "Event: {}\nTime: {:.3}s",
                inputs.label, event.time
            )),
        });
    }

    traces
}

fn channel_trace(kind: TraceKind, label: &str, time: &[f64], samples: &[f64]) -> RenderTrace {
    RenderTrace {
        kind,
        x: time.to_vec(),
        y: samples.to_vec(),
        label: label.to_string(),
        style: kind.style(),
        show_in_legend: true,
        hover_text: None,
    }
}

/// Hover behavior requested from the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverMode {
    /// One readout for every series at the pointer's x position
    XUnified,
}

/// Display configuration emitted alongside the traces.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotLayout {
    pub title: String,
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub hover_mode: HoverMode,
    /// Legend anchor in plot fractions, origin bottom-left
    pub legend_position: (f32, f32),
}

impl PlotLayout {
    pub fn for_event(label: &str) -> Self {
        Self {
            title: format!("ECG Data - {} Event", label),
            x_title: "Time (seconds)",
            y_title: "Amplitude",
            hover_mode: HoverMode::XUnified,
            legend_position: (0.02, 0.98),
        }
    }
}
