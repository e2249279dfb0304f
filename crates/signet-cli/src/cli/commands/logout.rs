//! Logout command handler.

use anyhow::Result;
use signet_core::auth::AuthService;

pub fn run(service: &AuthService) -> Result<()> {
    service.logout()?;
    println!("Signed out.");
    Ok(())
}
