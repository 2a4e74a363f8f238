//! Reversible field encoding for the credential record.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Errors from decoding a stored field.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded bytes are not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Encodes a plain-text field as standard base64.
pub fn encode(plain: &str) -> String {
    STANDARD.encode(plain.as_bytes())
}

/// Decodes a field produced by [`encode`].
pub fn decode(encoded: &str) -> Result<String, DecodeError> {
    let bytes = STANDARD.decode(encoded.as_bytes())?;
    Ok(String::from_utf8(bytes)?)
}
