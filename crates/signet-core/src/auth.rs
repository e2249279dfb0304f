//! Session lifecycle: sign-in/sign-up, token validation, auto-login,
//! remember-me caching, and logout.
//!
//! `AuthService` is the single writer of both the session state stream and
//! the persisted session keys. The token is always written (or removed)
//! before the matching state emission, so a subscriber reacting to `true`
//! can read a valid token from the store.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use serde_json::{Value, json};

use crate::client::GraphqlClient;
use crate::codec;
use crate::error::AuthError;
use crate::graphql::{
    AUTHENTICATE_USER_MUTATION, AuthPayload, LOGGED_IN_USER_QUERY, LoggedInUser,
    SIGNUP_USER_MUTATION,
};
use crate::session::SessionState;
use crate::store::{Store, keys};

/// Default post-login destination.
pub const DEFAULT_REDIRECT: &str = "/dashboard";
/// Destination signalled on logout.
pub const LOGIN_ROUTE: &str = "/login";

/// Navigation collaborator (the surrounding application's router).
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &str);
}

/// Navigator that drops every intent; for headless or test use.
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _target: &str) {}
}

/// An email/password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

// Passwords stay out of debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// In-memory mirror of the persisted session flags.
///
/// Loaded once at construction and written through on every mutation, so the
/// fields never diverge from the store. Missing or unparsable entries load
/// as `false`.
struct SessionFlags {
    keep_signed: AtomicBool,
    remember_me: AtomicBool,
}

impl SessionFlags {
    fn load(store: &dyn Store) -> Self {
        Self {
            keep_signed: AtomicBool::new(load_flag(store, keys::KEEP_SIGNED)),
            remember_me: AtomicBool::new(load_flag(store, keys::REMEMBER_ME)),
        }
    }
}

/// Session manager for a remote GraphQL API.
pub struct AuthService {
    client: GraphqlClient,
    store: Arc<dyn Store>,
    navigator: Arc<dyn Navigator>,
    session: SessionState,
    flags: SessionFlags,
    redirect: Mutex<Option<String>>,
}

impl AuthService {
    /// Builds the service, loading persisted session flags once.
    pub fn new(
        client: GraphqlClient,
        store: Arc<dyn Store>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let flags = SessionFlags::load(store.as_ref());

        Self {
            client,
            store,
            navigator,
            session: SessionState::new(),
            flags,
            redirect: Mutex::new(None),
        }
    }

    /// The session state stream. Replays the latest value to new subscribers.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn keep_signed(&self) -> bool {
        self.flags.keep_signed.load(Ordering::SeqCst)
    }

    pub fn remember_me(&self) -> bool {
        self.flags.remember_me.load(Ordering::SeqCst)
    }

    /// The persisted bearer token, if any. Storage is the source of truth.
    pub fn token(&self) -> Option<String> {
        self.store.get(keys::AUTH_TOKEN)
    }

    /// Authenticates with email and password.
    ///
    /// On success the token is persisted and `true` is emitted; on a null
    /// payload or a protocol/transport failure the token is removed, `false`
    /// is emitted, and the failure is returned to the caller.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<AuthPayload> {
        let variables = json!({
            "email": credentials.email,
            "password": credentials.password,
        });
        self.authenticate(
            "AuthenticateUser",
            AUTHENTICATE_USER_MUTATION,
            variables,
            "authenticateUser",
        )
        .await
    }

    /// Creates an account; identical contract to [`Self::sign_in`].
    pub async fn sign_up(&self, name: &str, credentials: &Credentials) -> Result<AuthPayload> {
        let variables = json!({
            "name": name,
            "email": credentials.email,
            "password": credentials.password,
        });
        self.authenticate("SignupUser", SIGNUP_USER_MUTATION, variables, "signupUser")
            .await
    }

    async fn authenticate(
        &self,
        operation_name: &str,
        document: &str,
        variables: Value,
        field: &str,
    ) -> Result<AuthPayload> {
        let outcome = self
            .client
            .mutate(operation_name, document, variables)
            .await
            .and_then(|data| payload_field::<AuthPayload>(&data, field)?.ok_or_else(AuthError::auth_failed));

        match outcome {
            Ok(payload) => {
                self.set_auth_state(Some(&payload.token))?;
                tracing::debug!(operation = operation_name, "authenticated");
                Ok(payload)
            }
            Err(error) => {
                self.set_auth_state(None)?;
                Err(error.into())
            }
        }
    }

    /// Asks the endpoint who is logged in, using the bearer header attached
    /// by the link pipeline. Mutates nothing itself.
    async fn validate_token(&self) -> Result<Option<LoggedInUser>, AuthError> {
        let data = self
            .client
            .query("LoggedInUser", LOGGED_IN_USER_QUERY, Value::Null)
            .await?;
        payload_field::<LoggedInUser>(&data, "loggedInUser")
    }

    /// Startup check.
    ///
    /// When keep-signed is off, deauthenticates locally with zero network
    /// calls and returns `Ok(false)`. Otherwise validates the stored token:
    /// a present user re-persists the token and returns `Ok(true)`; an
    /// absent user or any failure deauthenticates and propagates the error.
    pub async fn auto_login(&self) -> Result<bool> {
        if !self.keep_signed() {
            self.set_auth_state(None)?;
            return Ok(false);
        }

        match self.validate_token().await {
            Ok(Some(user)) => match self.store.get(keys::AUTH_TOKEN) {
                Some(token) => {
                    self.set_auth_state(Some(&token))?;
                    tracing::debug!(user = %user.id, "session revalidated");
                    Ok(true)
                }
                // Server validated a token the store no longer holds; the
                // authenticated-implies-token invariant wins.
                None => {
                    self.set_auth_state(None)?;
                    Err(AuthError::auth_failed().into())
                }
            },
            Ok(None) => {
                self.set_auth_state(None)?;
                Err(AuthError::auth_failed().into())
            }
            Err(error) => {
                self.set_auth_state(None)?;
                Err(error.into())
            }
        }
    }

    /// Ends the session locally: no network call.
    ///
    /// Deletes the token and the keep-signed flag, resets the in-memory
    /// flag, emits `false`, clears the client's result cache, and signals
    /// navigation to the login destination.
    pub fn logout(&self) -> Result<()> {
        self.store.remove(keys::AUTH_TOKEN)?;
        self.store.remove(keys::KEEP_SIGNED)?;
        self.flags.keep_signed.store(false, Ordering::SeqCst);
        self.session.emit(false);
        self.client.reset_store();
        self.navigator.navigate(LOGIN_ROUTE);
        tracing::debug!("logged out");
        Ok(())
    }

    /// Flips and persists the keep-signed flag; returns the new value.
    pub fn toggle_keep_signed(&self) -> Result<bool> {
        let next = !self.keep_signed();
        self.store.set(keys::KEEP_SIGNED, bool_str(next))?;
        self.flags.keep_signed.store(next, Ordering::SeqCst);
        Ok(next)
    }

    /// Flips and persists the remember-me flag; returns the new value.
    ///
    /// Disabling remember-me deletes both cached credential entries, not
    /// just the flag.
    pub fn toggle_remember_me(&self) -> Result<bool> {
        let next = !self.remember_me();
        self.store.set(keys::REMEMBER_ME, bool_str(next))?;
        self.flags.remember_me.store(next, Ordering::SeqCst);

        if !next {
            self.store.remove(keys::USER_EMAIL)?;
            self.store.remove(keys::USER_PASSWORD)?;
        }
        Ok(next)
    }

    /// Encodes and persists the credential pair. No-op unless remember-me
    /// is enabled.
    pub fn set_remember_me(&self, credentials: &Credentials) -> Result<()> {
        if !self.remember_me() {
            return Ok(());
        }
        self.store
            .set(keys::USER_EMAIL, &codec::encode(&credentials.email))?;
        self.store
            .set(keys::USER_PASSWORD, &codec::encode(&credentials.password))?;
        Ok(())
    }

    /// Returns the cached credential pair, or `None` when remember-me is
    /// disabled or nothing (decodable) is stored. `None` means "nothing to
    /// prefill", never an error.
    pub fn get_remember_me(&self) -> Option<Credentials> {
        if !self.remember_me() {
            return None;
        }
        let email = codec::decode(&self.store.get(keys::USER_EMAIL)?).ok()?;
        let password = codec::decode(&self.store.get(keys::USER_PASSWORD)?).ok()?;
        Some(Credentials { email, password })
    }

    /// Sets a one-shot override for the post-login destination.
    pub fn set_redirect(&self, target: &str) {
        *self.redirect.lock().expect("redirect lock poisoned") = Some(target.to_string());
    }

    /// Returns and clears the redirect override, or the default destination.
    pub fn redirect_target(&self) -> String {
        self.redirect
            .lock()
            .expect("redirect lock poisoned")
            .take()
            .unwrap_or_else(|| DEFAULT_REDIRECT.to_string())
    }

    /// Persists (or removes) the token, then emits the matching status.
    fn set_auth_state(&self, token: Option<&str>) -> Result<()> {
        match token {
            Some(token) => self.store.set(keys::AUTH_TOKEN, token)?,
            None => self.store.remove(keys::AUTH_TOKEN)?,
        }
        self.session.emit(token.is_some());
        Ok(())
    }
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn load_flag(store: &dyn Store, key: &str) -> bool {
    store.get(key).is_some_and(|v| v == "true")
}

/// Extracts and deserializes a top-level response field; `null` maps to `None`.
fn payload_field<T: serde::de::DeserializeOwned>(
    data: &Value,
    field: &str,
) -> Result<Option<T>, AuthError> {
    let value = data.get(field).cloned().unwrap_or(Value::Null);
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| AuthError::transport(format!("malformed {field} payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> (AuthService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let client = GraphqlClient::with_links(Vec::new());
        let service = AuthService::new(
            client,
            Arc::clone(&store) as Arc<dyn Store>,
            Arc::new(NoopNavigator),
        );
        (service, store)
    }

    /// Test: flags load once at construction; missing keys read as false.
    #[test]
    fn test_flags_load_at_construction() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::KEEP_SIGNED, "true").unwrap();
        let service = AuthService::new(
            GraphqlClient::with_links(Vec::new()),
            Arc::clone(&store) as Arc<dyn Store>,
            Arc::new(NoopNavigator),
        );
        assert!(service.keep_signed());
        assert!(!service.remember_me());
    }

    /// Test: toggling keep-signed flips and writes through.
    #[test]
    fn test_toggle_keep_signed() {
        let (service, store) = service();
        assert!(service.toggle_keep_signed().unwrap());
        assert_eq!(store.get(keys::KEEP_SIGNED).as_deref(), Some("true"));
        assert!(!service.toggle_keep_signed().unwrap());
        assert_eq!(store.get(keys::KEEP_SIGNED).as_deref(), Some("false"));
    }

    /// Test: toggling remember-me twice round-trips and leaves empty
    /// credential storage untouched.
    #[test]
    fn test_toggle_remember_me_idempotent() {
        let (service, store) = service();
        service.toggle_remember_me().unwrap();
        service.toggle_remember_me().unwrap();
        assert!(!service.remember_me());
        assert_eq!(store.get(keys::REMEMBER_ME).as_deref(), Some("false"));
        assert_eq!(store.get(keys::USER_EMAIL), None);
        assert_eq!(store.get(keys::USER_PASSWORD), None);
    }

    /// Test: disabling remember-me scrubs cached credentials.
    #[test]
    fn test_disable_remember_me_scrubs_credentials() {
        let (service, store) = service();
        service.toggle_remember_me().unwrap();
        service
            .set_remember_me(&Credentials::new("a@b.com", "p"))
            .unwrap();
        assert!(store.get(keys::USER_EMAIL).is_some());

        service.toggle_remember_me().unwrap();
        assert_eq!(store.get(keys::USER_EMAIL), None);
        assert_eq!(store.get(keys::USER_PASSWORD), None);
    }

    /// Test: remember-me roundtrip, and None once disabled regardless of
    /// stored values.
    #[test]
    fn test_remember_me_roundtrip() {
        let (service, store) = service();

        // Disabled: set is a no-op, get is None.
        service
            .set_remember_me(&Credentials::new("a@b.com", "p"))
            .unwrap();
        assert_eq!(store.get(keys::USER_EMAIL), None);
        assert!(service.get_remember_me().is_none());

        service.toggle_remember_me().unwrap();
        let creds = Credentials::new("a@b.com", "p");
        service.set_remember_me(&creds).unwrap();
        assert_eq!(service.get_remember_me(), Some(creds));

        // Stored at rest encoded, not plaintext.
        assert_ne!(store.get(keys::USER_EMAIL).as_deref(), Some("a@b.com"));
    }

    /// Test: undecodable entries read as "nothing to prefill".
    #[test]
    fn test_remember_me_corrupt_entries() {
        let (service, store) = service();
        service.toggle_remember_me().unwrap();
        store.set(keys::USER_EMAIL, "!!not-base64!!").unwrap();
        store.set(keys::USER_PASSWORD, "!!not-base64!!").unwrap();
        assert!(service.get_remember_me().is_none());
    }

    /// Test: redirect override is one-shot.
    #[test]
    fn test_redirect_one_shot() {
        let (service, _store) = service();
        assert_eq!(service.redirect_target(), DEFAULT_REDIRECT);

        service.set_redirect("/chat/42");
        assert_eq!(service.redirect_target(), "/chat/42");
        assert_eq!(service.redirect_target(), DEFAULT_REDIRECT);
    }

    /// Test: logout clears keys, resets the flag, emits false.
    #[test]
    fn test_logout_clears_session() {
        let (service, store) = service();
        store.set(keys::AUTH_TOKEN, "tok").unwrap();
        service.toggle_keep_signed().unwrap();

        service.logout().unwrap();
        assert_eq!(store.get(keys::AUTH_TOKEN), None);
        assert_eq!(store.get(keys::KEEP_SIGNED), None);
        assert!(!service.keep_signed());
        assert!(!service.session().is_authenticated());
    }

    /// Test: Debug never prints the password.
    #[test]
    fn test_credentials_debug_redacts_password() {
        let debug = format!("{:?}", Credentials::new("a@b.com", "hunter2"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("a@b.com"));
    }
}
