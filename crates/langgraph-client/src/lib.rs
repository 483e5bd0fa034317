//! HTTP client SDK for LangGraph servers.
//!
//! This crate provides a typed client for the LangGraph API, built around a
//! streaming run consumer.
//!
//! # Example
//!
//! ```no_run
//! use langgraph_client::{LangGraphClient, Result, RunCreate, StreamMode};
//!
//! # async fn example() -> Result<()> {
//! let client = LangGraphClient::builder()
//!     .base_url("http://localhost:8123")
//!     .build()?;
//!
//! let run = RunCreate::new("agent")
//!     .with_input(serde_json::json!({"messages": [{"role": "user", "content": "hi"}]}))
//!     .with_stream_mode([StreamMode::Updates]);
//!
//! let mut stream = client.runs().stream(None, &run).await?;
//! while let Some(event) = stream.recv().await {
//!     println!("{}: {}", event.event, event.data);
//! }
//!
//! if let Some(err) = stream.last_error() {
//!     eprintln!("stream ended early: {err}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Runs**: Stream, create, wait, list, cancel, join
//! - **Threads**: Create, search, update, state and history
//! - **Assistants**: CRUD, graphs, schemas and versions
//! - **Crons**: Scheduled runs
//! - **Store**: Namespaced key-value items

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod stream;
pub mod types;

pub use client::{ClientBuilder, LangGraphClient};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use stream::{CancelHandle, EventStream, FrameMode, StreamEvent, StreamRequest, StreamStatus};
pub use types::*;

pub use api::ListVersionsRequest;
