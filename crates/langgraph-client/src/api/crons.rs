//! Crons API.

use crate::client::LangGraphClient;
use crate::error::Result;
use crate::types::{CreateCronRequest, Cron, Run, SearchCronsRequest};

/// Crons API client.
pub struct CronsApi {
    client: LangGraphClient,
}

impl CronsApi {
    pub(crate) fn new(client: LangGraphClient) -> Self {
        Self { client }
    }

    /// Schedule a run on a thread.
    pub async fn create_for_thread(&self, thread_id: &str, request: CreateCronRequest) -> Result<Run> {
        self.client
            .post(&format!("threads/{}/crons", thread_id), &request)
            .await
    }

    /// Schedule a stateless run.
    pub async fn create(&self, request: CreateCronRequest) -> Result<Run> {
        self.client.post("runs/crons", &request).await
    }

    /// Delete a cron job.
    pub async fn delete(&self, cron_id: &str) -> Result<()> {
        self.client.delete(&format!("crons/{}", cron_id)).await
    }

    /// Search cron jobs.
    pub async fn search(&self, request: SearchCronsRequest) -> Result<Vec<Cron>> {
        self.client.post("runs/crons/search", &request).await
    }
}
