//! Threads API.

use serde::Serialize;

use crate::client::LangGraphClient;
use crate::error::Result;
use crate::types::{
    Checkpoint, CreateThreadRequest, SearchThreadsRequest, Thread, ThreadHistoryRequest,
    ThreadState, ThreadUpdateStateResponse, UpdateStateRequest, UpdateThreadRequest,
};

#[derive(Serialize)]
struct CheckpointStateRequest<'a> {
    checkpoint: &'a Checkpoint,
    subgraphs: bool,
}

/// Threads API client.
pub struct ThreadsApi {
    client: LangGraphClient,
}

impl ThreadsApi {
    pub(crate) fn new(client: LangGraphClient) -> Self {
        Self { client }
    }

    /// Create a thread.
    pub async fn create(&self, request: CreateThreadRequest) -> Result<Thread> {
        self.client.post("threads", &request).await
    }

    /// Get a thread by ID.
    pub async fn get(&self, thread_id: &str) -> Result<Thread> {
        self.client.get(&format!("threads/{}", thread_id)).await
    }

    /// Update a thread's metadata.
    pub async fn update(&self, thread_id: &str, request: UpdateThreadRequest) -> Result<Thread> {
        self.client
            .patch(&format!("threads/{}", thread_id), &request)
            .await
    }

    /// Delete a thread.
    pub async fn delete(&self, thread_id: &str) -> Result<()> {
        self.client.delete(&format!("threads/{}", thread_id)).await
    }

    /// Search threads.
    pub async fn search(&self, request: SearchThreadsRequest) -> Result<Vec<Thread>> {
        self.client.post("threads/search", &request).await
    }

    /// Copy a thread, history included.
    pub async fn copy(&self, thread_id: &str) -> Result<()> {
        self.client
            .post_unit::<()>(&format!("threads/{}/copy", thread_id), None)
            .await
    }

    /// Get the state of a thread, at a checkpoint ID if given.
    pub async fn get_state(
        &self,
        thread_id: &str,
        checkpoint_id: Option<&str>,
    ) -> Result<ThreadState> {
        let path = match checkpoint_id {
            Some(checkpoint_id) => format!("threads/{}/state/{}", thread_id, checkpoint_id),
            None => format!("threads/{}/state", thread_id),
        };
        self.client.get(&path).await
    }

    /// Get the state of a thread at a full checkpoint.
    pub async fn get_state_at(
        &self,
        thread_id: &str,
        checkpoint: &Checkpoint,
        subgraphs: bool,
    ) -> Result<ThreadState> {
        self.client
            .post(
                &format!("threads/{}/state/checkpoint", thread_id),
                &CheckpointStateRequest {
                    checkpoint,
                    subgraphs,
                },
            )
            .await
    }

    /// Write new values to a thread's state.
    pub async fn update_state(
        &self,
        thread_id: &str,
        request: UpdateStateRequest,
    ) -> Result<ThreadUpdateStateResponse> {
        self.client
            .post(&format!("threads/{}/state", thread_id), &request)
            .await
    }

    /// Get a thread's state history, newest first.
    pub async fn get_history(
        &self,
        thread_id: &str,
        request: ThreadHistoryRequest,
    ) -> Result<Vec<ThreadState>> {
        self.client
            .post(&format!("threads/{}/history", thread_id), &request)
            .await
    }
}
