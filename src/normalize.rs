//! Input normalisation helpers for host addresses and device-type tags.
//!
//! Every caller-supplied host and tag passes through one of these functions
//! before it reaches a transport or a registry lookup.

use crate::utils::ValidationError;

/// Normalise a device-type tag into its registry key: trimmed and lowercase.
pub fn normalize_device_type(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Normalise a host address: trim whitespace and strip IPv6 brackets.
///
/// Case is preserved (hostnames are case-insensitive, but some resolvers
/// log the name as given). Returns an error if nothing remains.
pub fn normalize_host(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    let unbracketed = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed)
        .trim();

    if unbracketed.is_empty() {
        return Err(ValidationError::EmptyHost);
    }

    Ok(unbracketed.to_string())
}
