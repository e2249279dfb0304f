//! Remember-me command handler.

use anyhow::Result;
use signet_core::auth::AuthService;

pub fn run(service: &AuthService, on: bool, off: bool) -> Result<()> {
    if on && !service.remember_me() {
        service.toggle_remember_me()?;
    }
    if off && service.remember_me() {
        service.toggle_remember_me()?;
    }

    if !service.remember_me() {
        println!("Remember-me is off.");
        return Ok(());
    }

    match service.get_remember_me() {
        Some(credentials) => println!("Remember-me is on, prefill for {}.", credentials.email),
        None => println!("Remember-me is on, nothing cached yet."),
    }
    Ok(())
}
