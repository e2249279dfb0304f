//! GraphQL wire types and the operation documents used by the session core.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// Document for the `authenticateUser` mutation.
pub const AUTHENTICATE_USER_MUTATION: &str = "\
mutation AuthenticateUser($email: String!, $password: String!) {
  authenticateUser(email: $email, password: $password) {
    id
    token
  }
}";

/// Document for the `signupUser` mutation.
pub const SIGNUP_USER_MUTATION: &str = "\
mutation SignupUser($name: String!, $email: String!, $password: String!) {
  signupUser(name: $name, email: $email, password: $password) {
    id
    token
  }
}";

/// Document for the `loggedInUser` query. The user is resolved from the
/// bearer header attached by the link pipeline; there are no variables.
pub const LOGGED_IN_USER_QUERY: &str = "\
query LoggedInUser {
  loggedInUser {
    id
  }
}";

/// Successful payload of `authenticateUser` / `signupUser`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthPayload {
    pub id: String,
    pub token: String,
}

/// Payload of `loggedInUser` when a session is active.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggedInUser {
    pub id: String,
}

/// An outgoing operation, carried through the link pipeline.
#[derive(Debug, Clone)]
pub struct GraphqlRequest {
    pub operation_name: String,
    pub query: String,
    pub variables: Value,
    /// Headers attached by links; applied to the HTTP request at dispatch.
    pub headers: Vec<(String, String)>,
}

impl GraphqlRequest {
    pub fn new(operation_name: &str, query: &str, variables: Value) -> Self {
        Self {
            operation_name: operation_name.to_string(),
            query: query.to_string(),
            variables,
            headers: Vec::new(),
        }
    }

    /// Sets a header, replacing any previous value for the same name.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// JSON body for the HTTP POST.
    pub fn body(&self) -> Value {
        serde_json::json!({
            "operationName": self.operation_name,
            "query": self.query,
            "variables": self.variables,
        })
    }
}

/// Source position of a protocol error.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// Structured application-level error returned alongside (or instead of) data.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default)]
    pub locations: Vec<ErrorLocation>,
    /// Path segments are strings or list indices.
    #[serde(default)]
    pub path: Vec<Value>,
}

impl fmt::Display for GraphqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(loc) = self.locations.first() {
            write!(f, " (line {}, column {})", loc.line, loc.column)?;
        }
        Ok(())
    }
}

/// Response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl GraphqlResponse {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
