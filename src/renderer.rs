//! # Terminal Plot Rendering
//!
//! This module is the terminal rendering surface for composed traces. It draws
//! every trace into a character grid in trace order, so later traces (cursor
//! and event lines) sit on top of the channels, matching legend and z-order.

use crate::traces::{PlotLayout, RenderTrace, TraceKind};
use std::fmt::Write;

/// Width reserved on the left for amplitude labels and the axis line.
const Y_AXIS_WIDTH: usize = 9;

fn glyph(kind: TraceKind) -> char {
    match kind {
        TraceKind::Channel1 => '*',
        TraceKind::Channel2 => 'o',
        TraceKind::Cursor => ':',
        TraceKind::Event => '|',
    }
}

fn is_marker_line(kind: TraceKind) -> bool {
    matches!(kind, TraceKind::Cursor | TraceKind::Event)
}

/// Render traces as an ASCII chart `columns` wide and `rows` tall.
///
/// Returns an empty string for an empty trace list; the caller shows a
/// placeholder message instead.
pub fn render_ascii(
    traces: &[RenderTrace],
    layout: &PlotLayout,
    columns: usize,
    rows: usize,
) -> String {
    let channels: Vec<&RenderTrace> = traces
        .iter()
        .filter(|t| !is_marker_line(t.kind))
        .collect();
    let Some(first) = channels.first() else {
        return String::new();
    };
    let (columns, rows) = (columns.max(2), rows.max(2));

    let t_min = first.x.first().copied().unwrap_or(0.0);
    let t_max = first.x.last().copied().unwrap_or(t_min);

    // Sample i owns the column cell [i * columns / n, (i + 1) * columns / n),
    // the same equal-width cells the cursor mapper divides the surface into.
    let samples = first.x.len().max(1);
    let index_to_column = |index: usize| (index * columns / samples).min(columns - 1);
    let time_to_column = |t: f64| index_to_column(first.x.partition_point(|&x| x < t));

    // Scale rows to the plotted samples; marker lines always span full height.
    let (y_min, y_max) = channels
        .iter()
        .flat_map(|t| t.y.iter())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let value_to_row = |v: f64| {
        if y_max > y_min {
            let normalized = (v - y_min) / (y_max - y_min);
            ((1.0 - normalized) * (rows - 1) as f64).round() as usize
        } else {
            rows / 2
        }
    };

    let mut grid = vec![vec![' '; columns]; rows];
    for trace in traces {
        let mark = glyph(trace.kind);
        if is_marker_line(trace.kind) {
            let Some(&t) = trace.x.first() else { continue };
            let column = time_to_column(t);
            for row in grid.iter_mut() {
                row[column] = mark;
            }
        } else {
            for (index, &v) in trace.y.iter().enumerate().take(samples) {
                grid[value_to_row(v).min(rows - 1)][index_to_column(index)] = mark;
            }
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:^width$}", layout.title, width = Y_AXIS_WIDTH + columns);
    let _ = writeln!(out, "{}", layout.y_title);

    for (index, row) in grid.into_iter().enumerate() {
        let label = if index == 0 {
            format!("{:.1}", y_max)
        } else if index == rows - 1 {
            format!("{:.1}", y_min)
        } else {
            String::new()
        };
        let line: String = row.into_iter().collect();
        let _ = writeln!(out, "{:>width$}│{}", label, line, width = Y_AXIS_WIDTH - 1);
    }

    let padding = " ".repeat(Y_AXIS_WIDTH);
    let _ = writeln!(out, "{}{}", padding, "─".repeat(columns));
    let left = format!("{:.1}s", t_min);
    let right = format!("{:.1}s", t_max);
    let middle_width = columns.saturating_sub(left.len() + right.len());
    let _ = writeln!(
        out,
        "{}{}{:^width$}{}",
        padding,
        left,
        layout.x_title,
        right,
        width = middle_width
    );

    let legend: Vec<String> = traces
        .iter()
        .filter(|t| t.show_in_legend)
        .map(|t| format!("{} {}", glyph(t.kind), t.label))
        .collect();
    let _ = writeln!(out, "{}{}", padding, legend.join("   "));

    for trace in traces.iter().filter(|t| t.kind == TraceKind::Cursor) {
        if let Some(text) = &trace.hover_text {
            let _ = writeln!(out, "{}{} {}", padding, glyph(trace.kind), text);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::EcgView;
    use crate::{EventMarker, WaveformBuffer};

    fn test_view() -> EcgView {
        EcgView::new(
            "evt-1",
            WaveformBuffer::new(
                vec![1.0, 2.0, 3.0, 4.0, 3.0, 2.0, 1.0, 2.0],
                vec![10.0, 20.0, 30.0, 40.0, 30.0, 20.0, 10.0, 20.0],
                2,
            ),
            EventMarker::new(Some(4), "AFIB"),
        )
    }

    #[test]
    fn test_empty_traces_render_nothing() {
        let layout = PlotLayout::for_event("AFIB");
        assert!(render_ascii(&[], &layout, 40, 10).is_empty());
    }

    #[test]
    fn test_ascii_rendering() {
        let view = test_view();
        let chart = render_ascii(&view.traces(), &view.layout(), 40, 10);

        assert!(chart.contains("ECG Data - AFIB Event"));
        assert!(chart.contains("Time (seconds)"));
        assert!(chart.contains("* Channel 1"));
        assert!(chart.contains("| Event: AFIB"));
        assert!(!chart.contains("Hover"));
        // 2 header lines, 10 grid rows, axis, time labels, legend
        assert_eq!(chart.lines().count(), 15);
    }

    #[test]
    fn test_event_line_spans_every_row() {
        let view = test_view();
        let chart = render_ascii(&view.traces(), &view.layout(), 36, 8);
        // Sample 4 of 8 starts at column 4 * 36 / 8 = 18
        let rows: Vec<&str> = chart.lines().skip(2).take(8).collect();
        for row in rows {
            let plot: Vec<char> = row.chars().skip(Y_AXIS_WIDTH).collect();
            assert_eq!(plot[18], '|', "row {row:?}");
        }
    }

    fn glyph_columns(chart: &str, rows: usize, mark: char) -> Vec<Option<usize>> {
        chart
            .lines()
            .skip(2)
            .take(rows)
            .map(|row| row.chars().skip(Y_AXIS_WIDTH).position(|c| c == mark))
            .collect()
    }

    #[test]
    fn test_cursor_drawn_at_pointer_column() {
        let mut view = EcgView::new(
            "evt-2",
            WaveformBuffer::new(vec![1.0, 2.0, 3.0, 4.0], vec![10.0, 20.0, 30.0, 40.0], 2),
            EventMarker::new(Some(3), "AFIB"),
        );
        assert_eq!(view.pointer_move(30.0, 120.0), Some(1));
        let chart = render_ascii(&view.traces(), &view.layout(), 120, 6);
        assert_eq!(glyph_columns(&chart, 6, ':'), vec![Some(30); 6]);
        assert_eq!(glyph_columns(&chart, 6, '|'), vec![Some(90); 6]);
    }

    #[test]
    fn test_cursor_follows_every_hover_column() {
        let mut view = EcgView::new(
            "evt-3",
            WaveformBuffer::new(vec![0.2; 240], vec![0.4; 240], 100),
            EventMarker::new(Some(230), "VTACH"),
        );
        for column in [0usize, 17, 59, 88, 119] {
            view.pointer_move(column as f64, 120.0);
            let chart = render_ascii(&view.traces(), &view.layout(), 120, 5);
            assert_eq!(glyph_columns(&chart, 5, ':'), vec![Some(column); 5], "column {column}");
        }
    }

    #[test]
    fn test_cursor_readout() {
        let mut view = test_view();
        view.pointer_move(10.0, 40.0);
        let chart = render_ascii(&view.traces(), &view.layout(), 40, 10);
        assert!(chart.contains(": Time: 1.000s"));
        assert!(!chart.contains(": Hover"));
    }

    #[test]
    fn test_single_sample_does_not_panic() {
        let view = EcgView::new(
            "evt-1",
            WaveformBuffer::new(vec![5.0], vec![5.0], 200),
            EventMarker::new(None, "AFIB"),
        );
        let chart = render_ascii(&view.traces(), &view.layout(), 20, 5);
        assert!(chart.contains('|'));
    }
}
