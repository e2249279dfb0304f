//! GraphQL client over the link chain, with a query-result cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::error::{AuthError, AuthResult};
use crate::graphql::{GraphqlRequest, GraphqlResponse};
use crate::link::{Link, LinkChain};
use crate::store::Store;

/// Query/mutation client.
///
/// Query results are cached in memory keyed by operation and variables
/// (cache-first); mutations always hit the network. [`Self::reset_store`]
/// drops every cached result.
pub struct GraphqlClient {
    chain: LinkChain,
    cache: Mutex<HashMap<String, Value>>,
}

impl GraphqlClient {
    /// Creates a client with the standard chain (error, auth, HTTP links).
    pub fn new(endpoint: &str, store: Arc<dyn Store>) -> Self {
        Self::with_links_chain(LinkChain::standard(endpoint, store))
    }

    /// Creates a client over a custom link list.
    pub fn with_links(links: Vec<Arc<dyn Link>>) -> Self {
        Self::with_links_chain(LinkChain::new(links))
    }

    fn with_links_chain(chain: LinkChain) -> Self {
        Self {
            chain,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Runs a query, serving a cached result when one exists.
    pub async fn query(
        &self,
        operation_name: &str,
        document: &str,
        variables: Value,
    ) -> AuthResult<Value> {
        let key = cache_key(operation_name, &variables);
        if let Some(hit) = self.cache.lock().expect("cache lock poisoned").get(&key) {
            tracing::debug!(operation = operation_name, "query served from cache");
            return Ok(hit.clone());
        }

        let data = self
            .execute(GraphqlRequest::new(operation_name, document, variables))
            .await?;
        self.cache
            .lock()
            .expect("cache lock poisoned")
            .insert(key, data.clone());
        Ok(data)
    }

    /// Runs a mutation. Never cached.
    pub async fn mutate(
        &self,
        operation_name: &str,
        document: &str,
        variables: Value,
    ) -> AuthResult<Value> {
        self.execute(GraphqlRequest::new(operation_name, document, variables))
            .await
    }

    /// Drops every cached query result.
    pub fn reset_store(&self) {
        self.cache.lock().expect("cache lock poisoned").clear();
    }

    async fn execute(&self, request: GraphqlRequest) -> AuthResult<Value> {
        let response: GraphqlResponse = self.chain.execute(request).await?;
        if response.has_errors() {
            return Err(AuthError::protocol(response.errors));
        }
        Ok(response.data.unwrap_or(Value::Null))
    }
}

fn cache_key(operation_name: &str, variables: &Value) -> String {
    format!("{operation_name}:{variables}")
}
