//! Login command handler.

use anyhow::{Result, bail};
use signet_core::auth::{AuthService, Credentials};

pub struct LoginOptions<'a> {
    pub email: Option<&'a str>,
    pub password: Option<&'a str>,
    pub keep_signed: bool,
    pub remember: bool,
}

pub async fn run(service: &AuthService, options: LoginOptions<'_>) -> Result<()> {
    if options.keep_signed && !service.keep_signed() {
        service.toggle_keep_signed()?;
    }
    if options.remember && !service.remember_me() {
        service.toggle_remember_me()?;
    }

    let credentials = resolve_credentials(service, options.email, options.password)?;
    let payload = service.sign_in(&credentials).await?;

    // Matches the login form: cache credentials only after a successful
    // sign-in, then resolve the redirect.
    service.set_remember_me(&credentials)?;

    println!("Signed in as {} ({})", credentials.email, payload.id);
    println!("navigate: {}", service.redirect_target());
    Ok(())
}

fn resolve_credentials(
    service: &AuthService,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<Credentials> {
    if let (Some(email), Some(password)) = (email, password) {
        return Ok(Credentials::new(email, password));
    }

    // Prefill from the remember-me cache, flag overrides winning.
    let Some(remembered) = service.get_remember_me() else {
        bail!("email and password required (no remembered credentials to prefill)");
    };
    Ok(Credentials {
        email: email.unwrap_or(&remembered.email).to_string(),
        password: password.unwrap_or(&remembered.password).to_string(),
    })
}
