//! Status command handler: runs the startup auto-login check.

use anyhow::Result;
use signet_core::auth::AuthService;

use super::mask_token;

pub async fn run(service: &AuthService) -> Result<()> {
    if !service.keep_signed() {
        // auto_login still runs to tear down any leftover token.
        service.auto_login().await?;
        println!("Not signed in (keep-signed is disabled).");
        return Ok(());
    }

    service.auto_login().await?;

    if let Some(token) = service.token() {
        println!("Signed in (token {}).", mask_token(&token));
    } else {
        println!("Not signed in.");
    }
    Ok(())
}
