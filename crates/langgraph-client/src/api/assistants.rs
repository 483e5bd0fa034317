//! Assistants API.

use std::collections::HashMap;

use serde::Serialize;

use crate::client::LangGraphClient;
use crate::error::Result;
use crate::types::{
    Assistant, CreateAssistantRequest, Graph, GraphSchema, Json, SearchAssistantsRequest,
    UpdateAssistantRequest,
};

/// Query parameters for fetching a graph.
#[derive(Debug, Default, Serialize)]
struct GraphQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    xray: Option<u32>,
}

/// Query parameters for listing subgraphs.
#[derive(Debug, Default, Serialize)]
struct SubgraphsQuery {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    recurse: bool,
}

/// Request body for listing assistant versions.
#[derive(Debug, Serialize)]
pub struct ListVersionsRequest {
    /// Metadata filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Json>,
    /// Maximum results.
    pub limit: u32,
    /// Results to skip.
    pub offset: u32,
}

impl Default for ListVersionsRequest {
    fn default() -> Self {
        Self {
            metadata: None,
            limit: 10,
            offset: 0,
        }
    }
}

#[derive(Serialize)]
struct SetLatestRequest {
    version: u32,
}

/// Assistants API client.
pub struct AssistantsApi {
    client: LangGraphClient,
}

impl AssistantsApi {
    pub(crate) fn new(client: LangGraphClient) -> Self {
        Self { client }
    }

    /// Get an assistant by ID.
    pub async fn get(&self, assistant_id: &str) -> Result<Assistant> {
        self.client
            .get(&format!("assistants/{}", assistant_id))
            .await
    }

    /// Get the graph of an assistant.
    ///
    /// `xray` includes subgraphs up to the given depth.
    pub async fn get_graph(&self, assistant_id: &str, xray: Option<u32>) -> Result<Graph> {
        self.client
            .get_with_query(
                &format!("assistants/{}/graph", assistant_id),
                &GraphQuery { xray },
            )
            .await
    }

    /// Get the schemas of an assistant's graph.
    pub async fn get_schemas(&self, assistant_id: &str) -> Result<GraphSchema> {
        self.client
            .get(&format!("assistants/{}/schemas", assistant_id))
            .await
    }

    /// Get the schemas of an assistant's subgraphs, optionally under a namespace.
    pub async fn get_subgraphs(
        &self,
        assistant_id: &str,
        namespace: Option<&str>,
        recurse: bool,
    ) -> Result<HashMap<String, GraphSchema>> {
        let path = match namespace {
            Some(ns) => format!("assistants/{}/subgraphs/{}", assistant_id, ns),
            None => format!("assistants/{}/subgraphs", assistant_id),
        };
        self.client
            .get_with_query(&path, &SubgraphsQuery { recurse })
            .await
    }

    /// Create an assistant.
    pub async fn create(&self, request: CreateAssistantRequest) -> Result<Assistant> {
        self.client.post("assistants", &request).await
    }

    /// Update an assistant.
    pub async fn update(
        &self,
        assistant_id: &str,
        request: UpdateAssistantRequest,
    ) -> Result<Assistant> {
        self.client
            .patch(&format!("assistants/{}", assistant_id), &request)
            .await
    }

    /// Delete an assistant.
    pub async fn delete(&self, assistant_id: &str) -> Result<()> {
        self.client
            .delete(&format!("assistants/{}", assistant_id))
            .await
    }

    /// Search assistants.
    pub async fn search(&self, request: SearchAssistantsRequest) -> Result<Vec<Assistant>> {
        self.client.post("assistants/search", &request).await
    }

    /// List versions of an assistant.
    pub async fn get_versions(
        &self,
        assistant_id: &str,
        request: ListVersionsRequest,
    ) -> Result<Vec<Assistant>> {
        self.client
            .post(&format!("assistants/{}/versions", assistant_id), &request)
            .await
    }

    /// Make a version the active one.
    pub async fn set_latest(&self, assistant_id: &str, version: u32) -> Result<Assistant> {
        self.client
            .post(
                &format!("assistants/{}/versions/latest", assistant_id),
                &SetLatestRequest { version },
            )
            .await
    }
}
