//! Reversible encoding for cached remember-me credentials.
//!
//! This is plain base64 obfuscation, not encryption. The persisted format is
//! the standard alphabet over the UTF-8 bytes; changing it would invalidate
//! every stored credential pair.

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Encodes a credential field for storage.
pub fn encode(plain: &str) -> String {
    STANDARD.encode(plain.as_bytes())
}

/// Decodes a stored credential field.
pub fn decode(encoded: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(encoded)
        .context("Invalid base64 in stored credential")?;
    String::from_utf8(bytes).context("Stored credential is not valid UTF-8")
}
