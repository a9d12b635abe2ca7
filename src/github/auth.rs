use tracing::debug;

use crate::error::ConfigError;

pub const TOKEN_ENV: &str = "TOKEN_GITHUB";

/// Resolve the API token from `TOKEN_GITHUB`.
///
/// `lookup` stands in for the process environment so callers can resolve
/// against a fixed map.
pub fn resolve_token<F>(lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(TOKEN_ENV) {
        Some(token) if !token.trim().is_empty() => {
            debug!("Token resolved via {} env var", TOKEN_ENV);
            Ok(token.trim().to_string())
        }
        _ => Err(ConfigError::MissingToken),
    }
}
