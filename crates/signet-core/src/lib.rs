//! Core signet library (session lifecycle, request link pipeline, storage).

pub mod auth;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod graphql;
pub mod link;
pub mod session;
pub mod store;

pub use auth::{AuthService, Credentials, Navigator};
pub use error::{AuthError, AuthErrorKind, AuthResult};
pub use session::SessionState;
