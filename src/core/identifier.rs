use crate::utils::error::{FleetError, Result};

/// Drops the trailing check digit from a raw municipal identifier.
///
/// Pure fixed-offset truncation: the removed character is not verified.
/// A one-character input yields an empty string; the statistics fetcher
/// rejects empty identifiers before any request is made.
pub fn adapt_identifier(raw: &str) -> Result<String> {
    let mut chars = raw.chars();
    if chars.next_back().is_none() {
        return Err(FleetError::InvalidInputError {
            message: "municipal identifier is empty".to_string(),
        });
    }
    Ok(chars.as_str().to_string())
}
