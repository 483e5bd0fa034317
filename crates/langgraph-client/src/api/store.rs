//! Store API.
//!
//! Items live under a namespace path. On the wire a path is joined with `.`,
//! so labels themselves may not contain a period.

use serde::Serialize;

use crate::client::LangGraphClient;
use crate::error::{Error, Result};
use crate::types::{
    Item, ListNamespaceResponse, ListNamespacesRequest, PutItemRequest, SearchItemsRequest,
    SearchItemsResponse,
};

#[derive(Serialize)]
struct GetItemQuery {
    namespace: String,
    key: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    refresh_ttl: bool,
}

#[derive(Serialize)]
struct DeleteItemRequest<'a> {
    namespace: &'a [String],
    key: &'a str,
}

/// Store API client.
pub struct StoreApi {
    client: LangGraphClient,
}

impl StoreApi {
    pub(crate) fn new(client: LangGraphClient) -> Self {
        Self { client }
    }

    /// Store or replace an item.
    pub async fn put_item(&self, request: PutItemRequest) -> Result<()> {
        validate_namespace(&request.namespace)?;
        self.client.put_unit("store/items", &request).await
    }

    /// Get an item.
    pub async fn get_item(&self, namespace: &[String], key: &str, refresh_ttl: bool) -> Result<Item> {
        validate_namespace(namespace)?;
        let query = GetItemQuery {
            namespace: namespace.join("."),
            key: key.to_string(),
            refresh_ttl,
        };
        self.client.get_with_query("store/items", &query).await
    }

    /// Delete an item.
    pub async fn delete_item(&self, namespace: &[String], key: &str) -> Result<()> {
        validate_namespace(namespace)?;
        self.client
            .delete_with_body("store/items", &DeleteItemRequest { namespace, key })
            .await
    }

    /// Search items under a namespace prefix.
    pub async fn search_items(&self, request: SearchItemsRequest) -> Result<SearchItemsResponse> {
        self.client.post("store/items/search", &request).await
    }

    /// List namespaces.
    pub async fn list_namespaces(
        &self,
        request: ListNamespacesRequest,
    ) -> Result<ListNamespaceResponse> {
        self.client.post("store/namespaces", &request).await
    }
}

fn validate_namespace(namespace: &[String]) -> Result<()> {
    match namespace.iter().find(|label| label.contains('.')) {
        Some(label) => Err(Error::Config(format!(
            "Invalid namespace label '{label}': labels cannot contain periods ('.')"
        ))),
        None => Ok(()),
    }
}
