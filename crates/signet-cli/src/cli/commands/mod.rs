pub mod login;
pub mod logout;
pub mod remember;
pub mod signup;
pub mod status;

/// Shortens a token for display. Tokens are never printed in full.
///
/// Tokens are opaque server strings; the cut lands on a char boundary.
pub fn mask_token(token: &str) -> String {
    match token.char_indices().nth(12) {
        Some((cut, _)) => format!("{}...", &token[..cut]),
        None => "***".to_string(),
    }
}
