//! Exchange of a signed assertion for an access token.

use super::AuthError;
use crate::http::{self, HttpOptions};
use serde::Deserialize;

/// Grant type of the OAuth 2.0 JWT bearer flow (RFC 7523).
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Bearer token returned by the token endpoint.
#[derive(Deserialize, Clone)]
pub struct AccessToken {
    #[serde(rename = "access_token")]
    pub token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Seconds until expiry, as reported by the endpoint.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[censored]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl AccessToken {
    /// Token with the default `Bearer` type and no expiry.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            token_type: default_token_type(),
            expires_in: None,
        }
    }

    /// Header line to attach to API requests.
    pub fn authorization_header(&self) -> String {
        http::bearer_header(&self.token)
    }
}

/// POST the assertion to `token_uri` and parse the granted token.
pub fn exchange_assertion(
    token_uri: &str,
    assertion: &str,
    opts: HttpOptions,
) -> Result<AccessToken, AuthError> {
    let response = http::post_form(
        token_uri,
        &[("grant_type", JWT_BEARER_GRANT_TYPE), ("assertion", assertion)],
        opts,
    )?;
    if !response.is_success() {
        return Err(AuthError::TokenEndpoint {
            uri: token_uri.to_string(),
            status: response.status,
            body: response.body_text(),
        });
    }
    serde_json::from_slice(&response.body).map_err(AuthError::TokenResponse)
}
