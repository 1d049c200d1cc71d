//! Service account key file.

use super::AuthError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Token endpoint used when the key file does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// Fields of a Google service account JSON key that authentication needs.
#[derive(Deserialize, Clone)]
pub struct ServiceAccountKey {
    /// `"service_account"` for keys downloaded from the console.
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    pub client_email: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("key_type", &self.key_type)
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"[censored]")
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Parse key JSON and reject credential files of another type.
    pub fn from_json(data: &str) -> Result<Self, AuthError> {
        let key: ServiceAccountKey = serde_json::from_str(data).map_err(AuthError::ParseKey)?;
        match key.key_type.as_deref() {
            None | Some(SERVICE_ACCOUNT_TYPE) => Ok(key),
            Some(other) => Err(AuthError::WrongKeyType(other.to_string())),
        }
    }

    /// Token endpoint named by the key, or the Google default.
    pub fn token_uri(&self) -> &str {
        self.token_uri
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_TOKEN_URI)
    }
}

/// Read and parse the key file at `path`.
pub fn load_key(path: &Path) -> Result<ServiceAccountKey, AuthError> {
    let data = fs::read_to_string(path).map_err(|source| AuthError::ReadKey {
        path: path.to_path_buf(),
        source,
    })?;
    ServiceAccountKey::from_json(&data)
}
