//! # Cursor Mapper
//!
//! Converts a pointer position on the plotting surface into a sample index,
//! and keeps the resulting hover state for the single displayed event.
//!
//! The mapping is linear: the samples of a [`SampleWindow`] are assumed to be
//! spread evenly across the full pixel width of the surface. The engine always
//! passes [`SampleWindow::full`]; a zooming surface would pass the window of
//! samples it currently shows instead.

/// Run of samples spanning the plot's full pixel width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleWindow {
    /// First visible sample
    pub start: usize,
    /// Number of visible samples
    pub len: usize,
}

impl SampleWindow {
    /// The whole buffer of `n` samples, no zoom or pan.
    pub fn full(n: usize) -> Self {
        Self { start: 0, len: n }
    }
}

/// Map pointer offset `x` (pixels from the left edge) on a surface `width`
/// pixels wide to a sample index inside `window`.
///
/// Returns `None` when the pointer is off the plot, i.e. outside `[0, width]`.
///
/// # Example
/// ```
/// use ecg_viewer_lib::cursor::{map_pointer, SampleWindow};
///
/// let window = SampleWindow::full(100);
/// assert_eq!(map_pointer(-5.0, 800.0, window), None);
/// assert_eq!(map_pointer(400.0, 800.0, window), Some(50));
/// assert_eq!(map_pointer(800.0, 800.0, window), Some(99));
/// ```
pub fn map_pointer(x: f64, width: f64, window: SampleWindow) -> Option<usize> {
    if window.len == 0 || width.is_nan() || width <= 0.0 || !(0.0..=width).contains(&x) {
        return None;
    }

    let relative = (x / width).clamp(0.0, 1.0);
    let offset = ((relative * window.len as f64).floor() as usize).min(window.len - 1);
    Some(window.start + offset)
}

/// Hover state of the displayed event.
///
/// Lives only as long as one event is on screen. Selecting another event
/// starts from a fresh default state so no stale highlight survives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorState {
    hovered: Option<usize>,
}

impl CursorState {
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Pointer moved: remap and store the hovered sample.
    pub fn pointer_moved(&mut self, x: f64, width: f64, window: SampleWindow) -> Option<usize> {
        self.hovered = map_pointer(x, width, window);
        self.hovered
    }

    /// Pointer left the plotting surface.
    pub fn pointer_left(&mut self) {
        self.hovered = None;
    }
}
