//! HTTP side of a streaming call.
//!
//! Sends the request, validates status and content type, and hands back an
//! open [`Connection`] whose body has not been read yet.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, HeaderMap};
use reqwest::{RequestBuilder, Response, StatusCode};

use crate::error::{Error, Result};

/// Media type a streaming response must carry.
pub const EVENT_STREAM: &str = "text/event-stream";

/// Upper bound on how much of an error body is read before giving up.
const MAX_ERROR_BODY: usize = 64 * 1024;

/// An open, incrementally readable response body.
///
/// Exclusively owned by whoever is reading it. Implementations must make
/// `close` idempotent and must return `None` from `next_chunk` once closed.
#[async_trait]
pub trait Connection: Send {
    /// Read the next chunk of the body.
    ///
    /// `None` means the body ended cleanly.
    async fn next_chunk(&mut self) -> Option<Result<Bytes>>;

    /// Release the underlying network resource.
    fn close(&mut self);
}

type ByteStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

/// A [`Connection`] backed by a reqwest response.
pub struct HttpConnection {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<ByteStream>,
}

impl HttpConnection {
    fn new(response: Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        Self {
            status,
            headers,
            body: Some(Box::pin(response.bytes_stream())),
        }
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.body.is_none()
    }
}

impl std::fmt::Debug for HttpConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConnection")
            .field("status", &self.status)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[async_trait]
impl Connection for HttpConnection {
    async fn next_chunk(&mut self) -> Option<Result<Bytes>> {
        let body = self.body.as_mut()?;
        match body.next().await {
            Some(Ok(bytes)) => Some(Ok(bytes)),
            Some(Err(e)) => Some(Err(Error::StreamInterrupted(e.to_string()))),
            None => None,
        }
    }

    fn close(&mut self) {
        // Dropping the body stream releases the connection.
        self.body = None;
    }
}

/// Check a Content-Type value for the event-stream media type.
///
/// Parameters such as `charset` are ignored; comparison is case-insensitive.
pub fn is_event_stream(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(EVENT_STREAM))
        .unwrap_or(false)
}

/// Send a streaming request and validate the response.
///
/// On any failure the response is dropped, closing the connection, before
/// the error is returned.
pub(crate) async fn open(request: RequestBuilder, path: &str) -> Result<HttpConnection> {
    let response = request
        .header(ACCEPT, EVENT_STREAM)
        .header(CACHE_CONTROL, "no-store")
        .send()
        .await
        .map_err(Error::Connection)?;

    let status = response.status();
    if status.as_u16() >= 400 {
        let body = read_error_body(response).await;
        tracing::error!(path, status = status.as_u16(), body = %body, "Error from langgraph-api");
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if !content_type.as_deref().is_some_and(is_event_stream) {
        drop(response);
        return Err(Error::UnexpectedContentType { content_type });
    }

    tracing::debug!(path, status = status.as_u16(), "Event stream opened");
    Ok(HttpConnection::new(response))
}

/// Read at most [`MAX_ERROR_BODY`] bytes of an error response.
pub(crate) async fn read_error_body(mut response: Response) -> String {
    let mut body = Vec::new();
    while body.len() < MAX_ERROR_BODY {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let remaining = MAX_ERROR_BODY - body.len();
                body.extend_from_slice(&chunk[..chunk.len().min(remaining)]);
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to read error body");
                break;
            }
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_event_stream() {
        assert!(is_event_stream("text/event-stream"));
        assert!(is_event_stream("text/event-stream; charset=utf-8"));
        assert!(is_event_stream("Text/Event-Stream;charset=UTF-8"));
        assert!(!is_event_stream("application/json"));
        assert!(!is_event_stream("text/event-streams"));
        assert!(!is_event_stream(""));
    }
}
