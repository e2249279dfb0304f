//! Ordered middleware chain wrapping the HTTP transport.
//!
//! Chain order is fixed and significant: the error link runs first so
//! transport and protocol failures are logged before anything reacts to them,
//! the auth link runs second so the bearer header is attached to the exact
//! request sent, and the transport link terminates the chain.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;

use crate::error::{AuthError, AuthResult};
use crate::graphql::{GraphqlRequest, GraphqlResponse};
use crate::store::{Store, keys};

/// A single middleware stage.
///
/// Each link receives the in-flight request and a [`Next`] continuation; the
/// terminal transport link ignores its continuation.
#[async_trait]
pub trait Link: Send + Sync {
    async fn call(&self, request: GraphqlRequest, next: Next<'_>) -> AuthResult<GraphqlResponse>;
}

/// Continuation over the remaining links.
pub struct Next<'a> {
    links: &'a [Arc<dyn Link>],
}

impl<'a> Next<'a> {
    /// Forwards the request to the rest of the chain.
    pub fn run(self, request: GraphqlRequest) -> BoxFuture<'a, AuthResult<GraphqlResponse>> {
        Box::pin(async move {
            match self.links.split_first() {
                Some((head, rest)) => head.call(request, Next { links: rest }).await,
                None => Err(AuthError::transport(
                    "link chain ended without a transport link",
                )),
            }
        })
    }
}

/// An ordered, executable list of links.
pub struct LinkChain {
    links: Vec<Arc<dyn Link>>,
}

impl LinkChain {
    pub fn new(links: Vec<Arc<dyn Link>>) -> Self {
        Self { links }
    }

    /// Builds the standard chain: error handling, then auth header, then HTTP.
    pub fn standard(endpoint: &str, store: Arc<dyn Store>) -> Self {
        Self::new(vec![
            Arc::new(ErrorLink),
            Arc::new(AuthLink::new(store)),
            Arc::new(HttpLink::new(endpoint)),
        ])
    }

    pub async fn execute(&self, request: GraphqlRequest) -> AuthResult<GraphqlResponse> {
        Next { links: &self.links }.run(request).await
    }
}

/// Logs protocol and transport errors. Never mutates session state, never
/// retries, and never aborts the chain on protocol errors.
pub struct ErrorLink;

#[async_trait]
impl Link for ErrorLink {
    async fn call(&self, request: GraphqlRequest, next: Next<'_>) -> AuthResult<GraphqlResponse> {
        let operation = request.operation_name.clone();
        match next.run(request).await {
            Ok(response) => {
                for error in &response.errors {
                    tracing::error!(
                        %operation,
                        locations = ?error.locations,
                        path = ?error.path,
                        "graphql error: {}",
                        error.message,
                    );
                }
                Ok(response)
            }
            Err(error) => {
                tracing::error!(%operation, "network error: {error}");
                Err(error)
            }
        }
    }
}

/// Attaches `Authorization: Bearer <token>` to every outgoing operation.
///
/// The token is read from the store at dispatch time, never cached across
/// requests. An absent token is sent as the literal `Bearer null` and left
/// for the server to reject.
pub struct AuthLink {
    store: Arc<dyn Store>,
}

impl AuthLink {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Link for AuthLink {
    async fn call(
        &self,
        mut request: GraphqlRequest,
        next: Next<'_>,
    ) -> AuthResult<GraphqlResponse> {
        let token = self.store.get(keys::AUTH_TOKEN);
        let bearer = format!("Bearer {}", token.as_deref().unwrap_or("null"));
        request.set_header("Authorization", &bearer);
        next.run(request).await
    }
}

/// Terminal link: POSTs the operation to the endpoint and parses the envelope.
pub struct HttpLink {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpLink {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Link for HttpLink {
    async fn call(&self, request: GraphqlRequest, _next: Next<'_>) -> AuthResult<GraphqlResponse> {
        let mut builder = self.http.post(&self.endpoint).json(&request.body());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::http_status(status.as_u16(), &body));
        }

        let envelope = response
            .json::<GraphqlResponse>()
            .await
            .map_err(|e| AuthError::transport(format!("malformed response: {e}")))?;
        Ok(envelope)
    }
}
