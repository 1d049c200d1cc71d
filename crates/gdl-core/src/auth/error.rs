use std::path::PathBuf;
use thiserror::Error;

/// Failure while turning a service account key into an access token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("cannot read service account key {}", .path.display())]
    ReadKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid service account key JSON")]
    ParseKey(#[source] serde_json::Error),

    #[error("expected a key of type \"service_account\", found {0:?}")]
    WrongKeyType(String),

    #[error("missing PEM section in service account private key")]
    MissingPem,

    #[error("expected an RSA private key in PKCS#8 or PKCS#1 form, found {0}")]
    UnsupportedKey(String),

    #[error("cannot sign assertion: {0}")]
    Sign(String),

    #[error("token endpoint {uri} returned HTTP {status}: {body}")]
    TokenEndpoint { uri: String, status: u32, body: String },

    #[error("invalid token endpoint response")]
    TokenResponse(#[source] serde_json::Error),

    #[error("token request failed")]
    Transport(#[from] curl::Error),
}
