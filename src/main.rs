//! # ECG Viewer Application Entry Point
//!
//! This binary crate drives the viewer from a terminal: it lists the event
//! directory, fetches one event's waveform and renders it with its event
//! marker, optionally with the hover cursor placed at a given column.
//! It supports both online mode (event service) and offline mode (synthetic
//! demo event or a saved detail payload).


use anyhow::{anyhow, bail, Context};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use ecg_viewer_lib::api::{EventClient, EventDetail, Operation};
use ecg_viewer_lib::config::Config;
use ecg_viewer_lib::view::EcgView;
use ecg_viewer_lib::{fallback, renderer::render_ascii};

/// Length of the synthetic demo recording
const DEMO_SECONDS: u32 = 30;

/// What the user asked to see.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Print the event directory
    List,
    /// Fetch and plot one event
    Event(String),
    /// Plot a saved detail payload
    File(PathBuf),
    /// Plot the synthetic event without touching the network
    Demo,
    /// Ask the backend whether it is up
    Health,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub mode: Mode,
    pub config: Option<PathBuf>,
    /// Pointer column on the plot, if the cursor should be shown
    pub hover: Option<f64>,
}

impl Args {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut parsed = Args {
            mode: Mode::List,
            config: None,
            hover: None,
        };
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| anyhow!("{} requires a value", flag))
            };
            match arg.as_str() {
                "--list" => parsed.mode = Mode::List,
                "--demo" => parsed.mode = Mode::Demo,
                "--health" => parsed.mode = Mode::Health,
                "--event" => parsed.mode = Mode::Event(value("--event")?),
                "--file" => parsed.mode = Mode::File(PathBuf::from(value("--file")?)),
                "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
                "--hover" => {
                    let raw = value("--hover")?;
                    let column = raw
                        .parse::<f64>()
                        .with_context(|| format!("invalid --hover column {:?}", raw))?;
                    parsed.hover = Some(column);
                }
                other => bail!(
                    "unknown argument {:?}\nusage: ecg-viewer [--config PATH] [--list | --event ID | --file PATH | --demo | --health] [--hover COL]",
                    other
                ),
            }
        }
        Ok(parsed)
    }
}

/// Render one event as the text shown on screen: info line plus chart, or
/// the placeholder when the waveform cannot be plotted.
pub fn render_event(
    event_id: &str,
    detail: &EventDetail,
    hover: Option<f64>,
    config: &Config,
) -> String {
    let display = &config.display;
    let mut view = EcgView::new(
        event_id,
        detail.waveform_or_empty(display.default_sampling_rate_hz),
        detail.marker(),
    );

    if let Some(message) = view.placeholder() {
        return format!("Error Loading Plot\n{}\n", message);
    }

    if let Some(column) = hover {
        // The terminal plot is the pointer surface: one pixel per column.
        if view.pointer_move(column, display.columns as f64).is_none() {
            warn!(column, "hover column is off the plot");
        }
    }

    let mut out = String::new();
    if let Some(info) = view.info() {
        out.push_str(&info.to_string());
        out.push('\n');
    }
    if let Some(at) = detail.metadata.occurred_at() {
        out.push_str(&format!("Recorded: {}\n", at.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    out.push('\n');
    out.push_str(&render_ascii(
        &view.traces(),
        &view.layout(),
        display.columns,
        display.rows,
    ));
    out
}

fn load_file(path: &Path) -> anyhow::Result<EventDetail> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    EventDetail::from_json(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the chart
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse(env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    let rate = config.display.default_sampling_rate_hz;

    match &args.mode {
        Mode::Demo => {
            let detail = fallback::synthetic_event(None, rate, DEMO_SECONDS);
            print!("{}", render_event("demo", &detail, args.hover, &config));
        }
        Mode::File(path) => {
            let detail = load_file(path)?;
            let event_id = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "file".to_string());
            print!("{}", render_event(&event_id, &detail, args.hover, &config));
        }
        Mode::Event(event_id) => {
            let rt = tokio::runtime::Runtime::new()?;
            let client = EventClient::new(&config.api)?;

            // Unreachable backend falls back to the demo event rather than failing
            let detail = match rt.block_on(client.event_detail(event_id)) {
                Ok(detail) => detail,
                Err(error) if error.is_unreachable() => {
                    warn!(%error, "event service unreachable, showing synthetic demo event");
                    eprintln!("{}", error.user_message(Operation::EventDetail));
                    fallback::synthetic_event(None, rate, DEMO_SECONDS)
                }
                Err(error) => {
                    eprintln!("{}", error.user_message(Operation::EventDetail));
                    return Err(error.into());
                }
            };
            print!("{}", render_event(event_id, &detail, args.hover, &config));
        }
        Mode::Health => {
            let rt = tokio::runtime::Runtime::new()?;
            let client = EventClient::new(&config.api)?;

            match rt.block_on(client.health()) {
                Ok(true) => println!("Backend is healthy ({})", config.api.base_url),
                Ok(false) => bail!("backend at {} reported unhealthy", config.api.base_url),
                Err(error) => {
                    eprintln!("{}", error.user_message(Operation::ListEvents));
                    return Err(error.into());
                }
            }
        }
        Mode::List => {
            let rt = tokio::runtime::Runtime::new()?;
            let client = EventClient::new(&config.api)?;

            let events = rt.block_on(client.list_events()).map_err(|error| {
                eprintln!("{}", error.user_message(Operation::ListEvents));
                error
            })?;

            println!("Events ({})", events.len());
            if events.is_empty() {
                println!("No events found");
                println!("Add data to backend/data/ directory");
            }
            for event in &events {
                println!("{}", event.list_line());
            }
        }
    }

    Ok(())
}
