use crate::store::errors::StoreError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Decode a base64 content blob into UTF-8 text.
///
/// The contents API wraps its base64 at 60 columns, so line breaks are
/// dropped before decoding.
pub fn decode_content(encoded: &str) -> Result<String, StoreError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| StoreError::Decode(format!("invalid base64: {e}")))?;
    String::from_utf8(bytes).map_err(|e| StoreError::Decode(format!("content is not UTF-8: {e}")))
}

pub fn encode_content(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}
