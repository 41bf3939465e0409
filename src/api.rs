//! # Event Service Client
//!
//! This module handles all network operations against the ECG backend: the
//! event directory (`GET /events`), the per-event detail payload
//! (`GET /events/{id}`) and the liveness probe (`GET /health`).
//!
//! ## Payloads
//!
//! ### Event directory
//! ```json
//! [{"event_id": "p01_e03", "event_type": "AFIB", "is_approved": true, "patient_id": "8c1f..."}]
//! ```
//!
//! ### Event detail
//! ```json
//! {
//!   "metadata": {"patient_id": "8c1f...", "event_type": "AFIB",
//!                "event_time": "2024-03-02T10:15:00", "is_approved": true},
//!   "ecg_data": {"ch1": [...], "ch2": [...], "sampling_rate": 200},
//!   "event_sample_index": 9000,
//!   "event_time_offset": 45.0
//! }
//! ```
//! `ecg_data` may be missing entirely; an empty buffer at the configured
//! default rate stands in for it so the viewer shows its "no data" placeholder.
//!
//! ## Error Handling
//!
//! Failures are classified into the handful of cases a user can act on
//! (backend missing, backend broken, backend not running) and each carries
//! a user-facing message via [`ApiError::user_message`].

use crate::config::ApiConfig;
use crate::{EventMarker, WaveformBuffer};
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while talking to the event service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP 404
    #[error("not found: {0}")]
    NotFound(String),

    /// HTTP 5xx
    #[error("server error: {0}")]
    Server(StatusCode),

    /// Nothing listening at the configured address
    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    /// Configured base URL cannot have paths appended
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    /// Any other transport or status failure
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("invalid payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Which call failed, for picking the user-facing wording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    ListEvents,
    EventDetail,
}

impl ApiError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self, operation: Operation) -> String {
        match (operation, self) {
            (Operation::ListEvents, ApiError::NotFound(_)) => {
                "Backend API not found. Please ensure the backend server is running on port 8000."
                    .to_string()
            }
            (Operation::ListEvents, ApiError::Server(_)) => {
                "Backend server error. Please check backend logs and ensure the server is healthy."
                    .to_string()
            }
            (Operation::ListEvents, ApiError::ConnectionRefused(_)) => {
                "Cannot connect to backend. Please ensure the backend server is running."
                    .to_string()
            }
            (Operation::ListEvents, _) => {
                "Failed to load events. Please check your connection and ensure backend is running."
                    .to_string()
            }
            (Operation::EventDetail, ApiError::NotFound(id)) => {
                format!("Event \"{}\" not found.", id)
            }
            (Operation::EventDetail, ApiError::Server(_)) => {
                "Server error while loading ECG data. Please try again.".to_string()
            }
            (Operation::EventDetail, _) => {
                "Failed to load ECG data. Please check your connection.".to_string()
            }
        }
    }

    /// True when the backend is simply not reachable.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::ConnectionRefused(_))
    }
}

/// One row of the event directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub event_id: String,
    pub event_type: String,
    pub is_approved: bool,
    pub patient_id: String,
}

impl EventSummary {
    /// Single-line listing: type, approval, id and a shortened patient id.
    pub fn list_line(&self) -> String {
        let event_type = non_empty_or(&self.event_type, "UNKNOWN");
        let status = if self.is_approved {
            "Approved"
        } else {
            "Rejected"
        };
        let event_id = non_empty_or(&self.event_id, "N/A");
        let patient = if self.patient_id.is_empty() {
            "Unknown Patient".to_string()
        } else {
            format!("{}...", self.patient_id.chars().take(8).collect::<String>())
        };
        format!("{:<10} {:<9} {:<24} {}", event_type, status, event_id, patient)
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Clinical metadata attached to an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub patient_id: String,
    pub event_type: String,
    /// Time the event occurred, as sent by the backend
    #[serde(rename = "event_time")]
    pub event_time_iso: String,
    pub is_approved: bool,
}

impl EventMetadata {
    /// Parse the occurrence time. Accepts RFC 3339 and naive ISO timestamps,
    /// the latter taken as UTC.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.event_time_iso.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }
}

/// Full payload for one event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventDetail {
    pub metadata: EventMetadata,
    #[serde(rename = "ecg_data", default)]
    pub waveform: Option<WaveformBuffer>,
    #[serde(default)]
    pub event_sample_index: Option<i64>,
    #[serde(rename = "event_time_offset", default)]
    pub event_time_offset_seconds: f64,
}

impl EventDetail {
    /// Parse a detail payload from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ApiError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Waveform to plot, or an empty buffer at `default_rate_hz`.
    pub fn waveform_or_empty(&self, default_rate_hz: u32) -> WaveformBuffer {
        self.waveform
            .clone()
            .unwrap_or_else(|| WaveformBuffer::empty(default_rate_hz))
    }

    /// Marker for the event line, labeled with the event type.
    pub fn marker(&self) -> EventMarker {
        EventMarker::new(self.event_sample_index, self.metadata.event_type.clone())
    }
}

/// Async client for the event directory and event detail services.
#[derive(Clone, Debug)]
pub struct EventClient {
    http: reqwest::Client,
    base_url: Url,
}

impl EventClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.clone()));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, base_url })
    }

    /// `GET /events`
    pub async fn list_events(&self) -> Result<Vec<EventSummary>, ApiError> {
        let url = self.endpoint(&["events"])?;
        let events: Vec<EventSummary> = self.get_json(url, "events").await?;
        debug!(count = events.len(), "loaded event directory");
        Ok(events)
    }

    /// `GET /events/{id}`
    pub async fn event_detail(&self, event_id: &str) -> Result<EventDetail, ApiError> {
        let url = self.endpoint(&["events", event_id])?;
        self.get_json(url, event_id).await
    }

    /// `GET /health`, true when the backend answers with a success status.
    pub async fn health(&self) -> Result<bool, ApiError> {
        let url = self.endpoint(&["health"])?;
        let response = self.http.get(url).send().await.map_err(classify)?;
        let status = response.status();
        debug!(%status, "health check");
        Ok(status.is_success())
    }

    /// Base URL with `segments` appended, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        resource: &str,
    ) -> Result<T, ApiError> {
        let response = self.http.get(url).send().await.map_err(classify)?;
        check_status(response.status(), resource)?;
        let body = response.error_for_status()?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Map an HTTP status to the service error taxonomy.
fn check_status(status: StatusCode, resource: &str) -> Result<(), ApiError> {
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(resource.to_string()));
    }
    if status.is_server_error() {
        warn!(%status, resource, "backend returned server error");
        return Err(ApiError::Server(status));
    }
    Ok(())
}

fn classify(error: reqwest::Error) -> ApiError {
    if error.is_connect() {
        ApiError::ConnectionRefused(error.to_string())
    } else {
        ApiError::Request(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = r#"{
        "event_id": "p01_e03",
        "metadata": {
            "patient_id": "8c1f2a7e-55b1",
            "event_type": "AFIB",
            "event_time": "2024-03-02T10:15:00",
            "is_approved": true
        },
        "ecg_data": {"ch1": [1.0, 2.0, 3.0], "ch2": [4.0, 5.0, 6.0], "sampling_rate": 200},
        "event_sample_index": 2,
        "event_time_offset": 0.01
    }"#;

    #[test]
    fn test_parse_detail_payload() {
        let detail = EventDetail::from_json(DETAIL).unwrap();
        let waveform = detail.waveform_or_empty(200);
        assert_eq!(waveform.effective_len(), 3);
        assert_eq!(waveform.sampling_rate_hz, 200);
        assert_eq!(detail.marker(), EventMarker::new(Some(2), "AFIB"));
        assert!((detail.event_time_offset_seconds - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_missing_waveform_and_index() {
        let detail = EventDetail::from_json(
            r#"{"metadata": {"patient_id": "", "event_type": "VTACH",
                "event_time": "", "is_approved": false}, "event_sample_index": null}"#,
        )
        .unwrap();
        assert_eq!(detail.waveform_or_empty(200), WaveformBuffer::empty(200));
        assert_eq!(detail.marker().sample_index, None);
    }

    #[test]
    fn test_missing_channel_deserializes_as_none() {
        let detail = EventDetail::from_json(
            r#"{"metadata": {"patient_id": "p", "event_type": "AFIB",
                "event_time": "", "is_approved": true},
                "ecg_data": {"ch1": [1.0], "sampling_rate": 200}}"#,
        )
        .unwrap();
        let waveform = detail.waveform.unwrap();
        assert!(waveform.ch2.is_none());
        assert_eq!(waveform.effective_len(), 0);
    }

    #[test]
    fn test_malformed_payload_is_decode_error() {
        assert!(matches!(
            EventDetail::from_json("{\"metadata\": 3}"),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn test_occurred_at_formats() {
        let detail = EventDetail::from_json(DETAIL).unwrap();
        let at = detail.metadata.occurred_at().unwrap();
        assert_eq!(at.to_rfc3339(), "2024-03-02T10:15:00+00:00");

        let mut metadata = detail.metadata.clone();
        metadata.event_time_iso = "2024-03-02T10:15:00+02:00".to_string();
        assert_eq!(
            metadata.occurred_at().unwrap().to_rfc3339(),
            "2024-03-02T08:15:00+00:00"
        );

        metadata.event_time_iso = "yesterday".to_string();
        assert!(metadata.occurred_at().is_none());
    }

    #[test]
    fn test_status_classification() {
        assert!(check_status(StatusCode::OK, "events").is_ok());
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND, "e1"),
            Err(ApiError::NotFound(id)) if id == "e1"
        ));
        assert!(matches!(
            check_status(StatusCode::BAD_GATEWAY, "events"),
            Err(ApiError::Server(StatusCode::BAD_GATEWAY))
        ));
    }

    #[test]
    fn test_user_messages() {
        let not_found = ApiError::NotFound("p01_e03".to_string());
        assert_eq!(
            not_found.user_message(Operation::EventDetail),
            "Event \"p01_e03\" not found."
        );
        assert!(not_found
            .user_message(Operation::ListEvents)
            .starts_with("Backend API not found"));

        let refused = ApiError::ConnectionRefused("tcp".to_string());
        assert!(refused.is_unreachable());
        assert_eq!(
            refused.user_message(Operation::ListEvents),
            "Cannot connect to backend. Please ensure the backend server is running."
        );
        assert_eq!(
            ApiError::Server(StatusCode::INTERNAL_SERVER_ERROR).user_message(Operation::EventDetail),
            "Server error while loading ECG data. Please try again."
        );
    }

    fn client(base_url: &str) -> EventClient {
        EventClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 2,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_encodes_event_id() {
        let client = client("http://localhost:8000/api");
        assert_eq!(
            client.endpoint(&["events", "p01_e03"]).unwrap().as_str(),
            "http://localhost:8000/api/events/p01_e03"
        );
        assert_eq!(
            client.endpoint(&["events", "a/b?c#d"]).unwrap().as_str(),
            "http://localhost:8000/api/events/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn test_endpoint_trailing_slash_and_bare_host() {
        assert_eq!(
            client("http://localhost:8000/api/").endpoint(&["health"]).unwrap().as_str(),
            "http://localhost:8000/api/health"
        );
        assert_eq!(
            client("http://localhost:8000").endpoint(&["events"]).unwrap().as_str(),
            "http://localhost:8000/events"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 2,
        };
        assert!(matches!(
            EventClient::new(&config),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_health_reports_unreachable_backend() {
        // Nothing listens on port 1
        let client = client("http://127.0.0.1:1/api");
        let rt = tokio::runtime::Runtime::new().unwrap();
        let error = rt.block_on(client.health()).unwrap_err();
        assert!(error.is_unreachable(), "{error:?}");
    }

    #[test]
    fn test_list_line_shortens_patient() {
        let event = EventSummary {
            event_id: "p01_e03".to_string(),
            event_type: "AFIB".to_string(),
            is_approved: false,
            patient_id: "8c1f2a7e-55b1-4b6f".to_string(),
        };
        let line = event.list_line();
        assert!(line.starts_with("AFIB"));
        assert!(line.contains("Rejected"));
        assert!(line.ends_with("8c1f2a7e..."));

        let anonymous = EventSummary {
            event_id: String::new(),
            event_type: String::new(),
            is_approved: true,
            patient_id: String::new(),
        };
        let line = anonymous.list_line();
        assert!(line.starts_with("UNKNOWN"));
        assert!(line.contains("N/A"));
        assert!(line.ends_with("Unknown Patient"));
    }
}
