//! Streaming run consumer.
//!
//! A streaming call is split into three parts:
//!
//! - [`transport`] sends the request and validates the response.
//! - [`decoder`] turns the raw byte stream into [`StreamEvent`] records.
//! - [`coordinator`] runs the decoder as a background task and hands the
//!   caller an [`EventStream`] plus a [`CancelHandle`].
//!
//! Setup failures (connection, error status, wrong content type) are returned
//! by the initiating call. Failures after the stream is open end the stream
//! and are reported through [`EventStream::last_error`].

pub mod coordinator;
pub mod decoder;
pub mod transport;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use coordinator::{CancelHandle, EventStream, StreamStatus, spawn_decoder};
pub use decoder::{FrameDecoder, LineSplitter};
pub use transport::{Connection, HttpConnection};

// ─────────────────────────────────────────────────────────────────────────────
// Stream Event
// ─────────────────────────────────────────────────────────────────────────────

/// One decoded record from an event stream.
///
/// `data` and `metadata` are kept as the raw text the server sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEvent {
    /// Event type, e.g. `values`, `updates`, `end`. May be empty.
    #[serde(default)]
    pub event: String,
    /// Raw payload.
    #[serde(default)]
    pub data: String,
    /// Raw side-channel payload.
    #[serde(default)]
    pub metadata: String,
}

impl StreamEvent {
    /// Whether every field is empty.
    pub fn is_empty(&self) -> bool {
        self.event.is_empty() && self.data.is_empty() && self.metadata.is_empty()
    }

    /// Whether this is the server's end-of-run marker.
    pub fn is_end(&self) -> bool {
        self.event == "end"
    }

    /// Whether the server reported an error for this run.
    pub fn is_error(&self) -> bool {
        self.event == "error"
    }

    /// Parse `data` as JSON.
    pub fn data_json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.data)?)
    }

    /// Parse `metadata` as JSON, if present.
    pub fn metadata_json<T: serde::de::DeserializeOwned>(&self) -> Result<Option<T>> {
        if self.metadata.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&self.metadata)?))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame Mode
// ─────────────────────────────────────────────────────────────────────────────

/// How lines are grouped into events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameMode {
    /// Fields accumulate until a blank line; one event per frame.
    #[default]
    Batched,
    /// Every field-bearing line is its own event.
    Eager,
}

// ─────────────────────────────────────────────────────────────────────────────
// Stream Request
// ─────────────────────────────────────────────────────────────────────────────

/// Description of a streaming HTTP call.
#[derive(Debug, Clone)]
pub struct StreamRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) body: Option<serde_json::Value>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) cancel: Option<CancelHandle>,
}

impl StreamRequest {
    /// A request with an arbitrary method.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            headers: Vec::new(),
            cancel: None,
        }
    }

    /// A GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Attach a JSON body.
    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize and attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self> {
        Ok(self.body(serde_json::to_value(body)?))
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a request header. Applied after the client's default headers.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Tie the stream to an existing cancel handle.
    ///
    /// Cancelling it before the response arrives aborts the request.
    pub fn cancel_with(mut self, cancel: CancelHandle) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Reject methods the transport does not issue.
    pub(crate) fn validate_method(&self) -> Result<()> {
        match self.method {
            Method::GET | Method::POST | Method::PUT | Method::PATCH | Method::DELETE => Ok(()),
            ref other => Err(Error::UnsupportedMethod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_event_json_helpers() {
        let event = StreamEvent {
            event: "values".to_string(),
            data: "{\"a\":1}".to_string(),
            metadata: String::new(),
        };
        let value: serde_json::Value = event.data_json().unwrap();
        assert_eq!(value["a"], 1);
        assert!(event.metadata_json::<serde_json::Value>().unwrap().is_none());
        assert!(!event.is_end());
        assert!(!event.is_empty());
        assert!(StreamEvent::default().is_empty());
    }

    #[test]
    fn test_stream_request_builder() {
        let request = StreamRequest::post("/runs/stream")
            .json(&serde_json::json!({"assistant_id": "agent"}))
            .unwrap()
            .query("a", "1")
            .header("x-trace", "abc");

        assert_eq!(request.path(), "/runs/stream");
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.query, vec![("a".to_string(), "1".to_string())]);
        assert!(request.body.is_some());
        assert!(request.validate_method().is_ok());
    }

    #[test]
    fn test_unsupported_method_rejected() {
        let request = StreamRequest::new(Method::OPTIONS, "/runs/stream");
        let err = request.validate_method().unwrap_err();
        assert!(matches!(err, Error::UnsupportedMethod(m) if m == "OPTIONS"));
    }

    #[test]
    fn test_frame_mode_serde() {
        let mode: FrameMode = serde_json::from_str("\"eager\"").unwrap();
        assert_eq!(mode, FrameMode::Eager);
        assert_eq!(FrameMode::default(), FrameMode::Batched);
    }
}
