//! Runs API.

use serde::Serialize;

use crate::client::LangGraphClient;
use crate::error::{Error, Result};
use crate::stream::{CancelHandle, EventStream, StreamRequest};
use crate::types::{CancelAction, CancelRunRequest, ListRunsQuery, Run, RunCreate};

#[derive(Serialize)]
struct WaitBody<'a> {
    #[serde(flatten)]
    run: &'a RunCreate,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    raise_error: bool,
}

#[derive(Serialize)]
struct BatchBody<'a> {
    batch: &'a [RunCreate],
}

/// Runs API client.
pub struct RunsApi {
    client: LangGraphClient,
}

impl RunsApi {
    pub(crate) fn new(client: LangGraphClient) -> Self {
        Self { client }
    }

    /// Start a run and stream its output.
    ///
    /// Without a thread the run is stateless.
    pub async fn stream(&self, thread_id: Option<&str>, run: &RunCreate) -> Result<EventStream> {
        self.stream_with(thread_id, run, None).await
    }

    /// Like [`stream`](Self::stream), tied to an existing cancel handle.
    pub async fn stream_with(
        &self,
        thread_id: Option<&str>,
        run: &RunCreate,
        cancel: Option<CancelHandle>,
    ) -> Result<EventStream> {
        let mut request = StreamRequest::post(runs_path(thread_id, "stream")).json(run)?;
        if let Some(cancel) = cancel {
            request = request.cancel_with(cancel);
        }
        self.client.stream(request).await
    }

    /// Create a background run.
    pub async fn create(&self, thread_id: Option<&str>, run: &RunCreate) -> Result<Run> {
        self.client.post(&runs_path(thread_id, ""), run).await
    }

    /// Create several stateless runs in one request.
    pub async fn create_batch(&self, runs: &[RunCreate]) -> Result<Vec<Run>> {
        self.client
            .post("runs/batch", &BatchBody { batch: runs })
            .await
    }

    /// Start a run and wait for its final state.
    ///
    /// With `raise_error`, a result carrying an `__error__` payload is
    /// returned as [`Error::RunFailed`].
    pub async fn wait(
        &self,
        thread_id: Option<&str>,
        run: &RunCreate,
        raise_error: bool,
    ) -> Result<serde_json::Value> {
        let body = WaitBody { run, raise_error };
        let result: serde_json::Value = self.client.post(&runs_path(thread_id, "wait"), &body).await?;

        if raise_error {
            if let Some(err) = result.get("__error__").filter(|e| e.is_object()) {
                let message = err
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("run failed without a message");
                return Err(Error::RunFailed(message.to_string()));
            }
        }

        Ok(result)
    }

    /// List runs on a thread.
    pub async fn list(&self, thread_id: &str, query: &ListRunsQuery) -> Result<Vec<Run>> {
        self.client
            .get_with_query(&format!("threads/{}/runs", thread_id), query)
            .await
    }

    /// Get a run.
    pub async fn get(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.client
            .get(&format!("threads/{}/runs/{}", thread_id, run_id))
            .await
    }

    /// Cancel a run.
    pub async fn cancel(
        &self,
        thread_id: &str,
        run_id: &str,
        wait: bool,
        action: CancelAction,
    ) -> Result<()> {
        let body = CancelRunRequest { wait, action };
        self.client
            .post_unit(
                &format!("threads/{}/runs/{}/cancel", thread_id, run_id),
                Some(&body),
            )
            .await
    }

    /// Block until a run finishes and return the thread's final values.
    pub async fn join(&self, thread_id: &str, run_id: &str) -> Result<serde_json::Value> {
        self.client
            .get(&format!("threads/{}/runs/{}/join", thread_id, run_id))
            .await
    }

    /// Stream output from a run that is already in progress.
    ///
    /// Emitted events carry no metadata.
    pub async fn join_stream(
        &self,
        thread_id: &str,
        run_id: &str,
        cancel_on_disconnect: bool,
    ) -> Result<EventStream> {
        let mut request =
            StreamRequest::get(format!("threads/{}/runs/{}/join/stream", thread_id, run_id));
        if cancel_on_disconnect {
            request = request.query("cancel_on_disconnect", "true");
        }
        Ok(self.client.stream(request).await?.without_metadata())
    }

    /// Delete a run.
    pub async fn delete(&self, thread_id: &str, run_id: &str) -> Result<()> {
        self.client
            .delete(&format!("threads/{}/runs/{}", thread_id, run_id))
            .await
    }
}

fn runs_path(thread_id: Option<&str>, suffix: &str) -> String {
    let base = match thread_id {
        Some(thread_id) => format!("threads/{}/runs", thread_id),
        None => "runs".to_string(),
    };
    if suffix.is_empty() {
        base
    } else {
        format!("{}/{}", base, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_runs_path() {
        assert_eq!(runs_path(Some("t1"), "stream"), "threads/t1/runs/stream");
        assert_eq!(runs_path(None, "stream"), "runs/stream");
        assert_eq!(runs_path(Some("t1"), ""), "threads/t1/runs");
        assert_eq!(runs_path(None, "wait"), "runs/wait");
    }

    #[test]
    fn test_wait_body_flattens_run() {
        let run = RunCreate::new("agent");
        let body = serde_json::to_value(WaitBody {
            run: &run,
            raise_error: true,
        })
        .unwrap();
        assert_eq!(body, json!({"assistant_id": "agent", "raise_error": true}));

        let body = serde_json::to_value(WaitBody {
            run: &run,
            raise_error: false,
        })
        .unwrap();
        assert_eq!(body, json!({"assistant_id": "agent"}));
    }
}
