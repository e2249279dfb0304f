mod cli;

use signet_core::AuthError;

fn main() {
    if let Err(e) = cli::run() {
        if let Some(auth) = e.downcast_ref::<AuthError>() {
            eprintln!("{}", auth.user_message());
        } else {
            eprintln!("{e:#}"); // pretty anyhow chain
        }
        std::process::exit(1);
    }
}
