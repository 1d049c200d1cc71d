//! Service account authentication.
//!
//! Reads the JSON key, signs an RS256 assertion with the service account's
//! private key and trades it at the token endpoint for a bearer token.

mod error;
mod jws;
mod key;
mod token;

pub use error::AuthError;
pub use jws::{sign_assertion, ASSERTION_LIFETIME};
pub use key::{load_key, ServiceAccountKey, DEFAULT_TOKEN_URI};
pub use token::{exchange_assertion, AccessToken, JWT_BEARER_GRANT_TYPE};

use crate::config::GdlConfig;
use std::path::Path;
use time::{Duration, OffsetDateTime};

/// Backdates `iat` so small clock differences with the token server don't reject the assertion.
const CLOCK_SKEW_FUDGE: Duration = Duration::seconds(10);

/// Authenticate with the key at `key_path` and return an access token.
///
/// The token endpoint is `cfg.token_uri` when set, else the key's `token_uri`.
pub fn authenticate(key_path: &Path, cfg: &GdlConfig) -> Result<AccessToken, AuthError> {
    let key = load_key(key_path)?;
    let token_uri = cfg.token_uri.as_deref().unwrap_or_else(|| key.token_uri());
    tracing::debug!(
        client_email = %key.client_email,
        token_uri,
        "requesting access token"
    );

    let issued_at = OffsetDateTime::now_utc() - CLOCK_SKEW_FUDGE;
    let assertion = sign_assertion(&key, &cfg.scope, token_uri, issued_at)?;
    let token = exchange_assertion(token_uri, &assertion, cfg.http_options())?;
    tracing::info!(
        client_email = %key.client_email,
        project_id = key.project_id.as_deref().unwrap_or("-"),
        expires_in = ?token.expires_in,
        "authenticated service account"
    );
    Ok(token)
}
