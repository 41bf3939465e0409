//! # Waveform Interaction Engine
//!
//! [`EcgView`] owns the derived state of the one event currently on screen
//! and reacts to the three notifications a rendering surface delivers:
//! an event being selected, the pointer moving, and the pointer leaving.
//!
//! Everything except the hover state is recomputed on selection. The hover
//! state belongs to the displayed event and is cleared on every switch.

use crate::axis::{derive_axes, Axes};
use crate::cursor::{CursorState, SampleWindow};
use crate::locator::{locate_event, EventPosition};
use crate::traces::{compose_traces, PlotLayout, RenderTrace, TraceInputs};
use crate::validator::{validate, WaveformError};
use crate::{EventMarker, WaveformBuffer};
use std::fmt;
use tracing::{debug, info, warn};

/// Interaction state for a single displayed event.
#[derive(Clone, Debug)]
pub struct EcgView {
    event_id: String,
    buffer: WaveformBuffer,
    marker: EventMarker,
    validation: Result<usize, WaveformError>,
    axes: Axes,
    event: Option<EventPosition>,
    cursor: CursorState,
}

impl EcgView {
    pub fn new(event_id: impl Into<String>, buffer: WaveformBuffer, marker: EventMarker) -> Self {
        let event_id = event_id.into();
        let validation = validate(&buffer);
        if let Err(reason) = validation {
            warn!(event_id = %event_id, %reason, "waveform cannot be plotted");
        }

        // Rejected buffers never reach the axis deriver
        let axes = match validation {
            Ok(_) => derive_axes(&buffer),
            Err(_) => Axes::placeholder(),
        };
        let n = validation.unwrap_or(0);
        let event = locate_event(marker.sample_index, n, buffer.sampling_rate_hz);

        info!(
            event_id = %event_id,
            samples = n,
            event_index = event.map(|e| e.index),
            "event selected"
        );

        Self {
            event_id,
            buffer,
            marker,
            validation,
            axes,
            event,
            cursor: CursorState::default(),
        }
    }

    /// Switch to another event.
    ///
    /// Selecting the event already on screen changes nothing and returns
    /// `false`. Any other selection rebuilds the view with a cleared cursor.
    pub fn select(
        &mut self,
        event_id: impl Into<String>,
        buffer: WaveformBuffer,
        marker: EventMarker,
    ) -> bool {
        let event_id = event_id.into();
        if event_id == self.event_id {
            debug!(event_id = %event_id, "event already displayed");
            return false;
        }
        *self = Self::new(event_id, buffer, marker);
        true
    }

    /// Pointer moved to `x` pixels from the left edge of a plot `width` pixels wide.
    pub fn pointer_move(&mut self, x: f64, width: f64) -> Option<usize> {
        let window = SampleWindow::full(self.effective_len());
        self.cursor.pointer_moved(x, width, window)
    }

    pub fn pointer_leave(&mut self) {
        self.cursor.pointer_left();
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    /// Shared sample count, zero when the buffer was rejected.
    pub fn effective_len(&self) -> usize {
        self.validation.unwrap_or(0)
    }

    pub fn validation(&self) -> Result<usize, WaveformError> {
        self.validation
    }

    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    pub fn event_position(&self) -> Option<EventPosition> {
        self.event
    }

    pub fn hovered(&self) -> Option<usize> {
        self.cursor.hovered()
    }

    /// Time in seconds of the hovered sample.
    pub fn hovered_time(&self) -> Option<f64> {
        self.cursor.hovered().map(|i| self.buffer.time_of(i))
    }

    pub fn traces(&self) -> Vec<RenderTrace> {
        compose_traces(&TraceInputs {
            buffer: &self.buffer,
            validation: self.validation,
            time: &self.axes.time,
            amplitude: self.axes.amplitude,
            hovered: self.cursor.hovered(),
            event: self.event,
            label: &self.marker.label,
        })
    }

    pub fn layout(&self) -> PlotLayout {
        PlotLayout::for_event(&self.marker.label)
    }

    /// Message to show instead of a plot, if the waveform was rejected.
    pub fn placeholder(&self) -> Option<String> {
        self.validation.err().map(|reason| reason.to_string())
    }

    /// Info panel shown above the plot.
    pub fn info(&self) -> Option<PlotInfo> {
        let samples = self.validation.ok()?;
        let event = self.event?;
        Some(PlotInfo {
            event_type: self.marker.label.clone(),
            event_time: event.time,
            duration: self.buffer.time_of(samples),
            sampling_rate_hz: self.buffer.sampling_rate_hz,
            samples,
        })
    }
}

/// Summary figures for the displayed event.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotInfo {
    pub event_type: String,
    /// Seconds from buffer start
    pub event_time: f64,
    /// Seconds covered by the shared samples
    pub duration: f64,
    pub sampling_rate_hz: u32,
    pub samples: usize,
}

impl fmt::Display for PlotInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let event_type = if self.event_type.is_empty() {
            "N/A"
        } else {
            &self.event_type
        };
        write!(
            f,
            "Event Type: {}  Event Time: {:.3}s  Duration: {:.1}s  Sampling Rate: {} Hz  Samples: {}",
            event_type, self.event_time, self.duration, self.sampling_rate_hz, self.samples
        )
    }
}
