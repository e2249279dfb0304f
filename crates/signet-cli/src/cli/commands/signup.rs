//! Signup command handler.

use anyhow::Result;
use signet_core::auth::{AuthService, Credentials};

pub async fn run(service: &AuthService, name: &str, email: &str, password: &str) -> Result<()> {
    let credentials = Credentials::new(email, password);
    let payload = service.sign_up(name, &credentials).await?;

    service.set_remember_me(&credentials)?;

    println!("Account created for {email} ({})", payload.id);
    println!("navigate: {}", service.redirect_target());
    Ok(())
}
