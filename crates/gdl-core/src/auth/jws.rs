//! RS256 JWT assertion for the OAuth 2.0 JWT bearer grant.

use super::{AuthError, ServiceAccountKey};
use base64::prelude::{Engine as _, BASE64_URL_SAFE_NO_PAD};
use rustls::pki_types::PrivateKeyDer;
use rustls::sign::Signer;
use rustls_pemfile::Item;
use serde::Serialize;
use time::{Duration, OffsetDateTime};

/// Lifetime Google accepts for a self-signed assertion.
pub const ASSERTION_LIFETIME: Duration = Duration::hours(1);

#[derive(Serialize)]
struct JwsHeader<'a> {
    alg: &'a str,
    typ: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kid: Option<&'a str>,
}

#[derive(Serialize)]
struct JwsClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, AuthError> {
    let json = serde_json::to_vec(value).map_err(|e| AuthError::Sign(e.to_string()))?;
    Ok(BASE64_URL_SAFE_NO_PAD.encode(json))
}

/// Builds an RSA-SHA256 signer from the PEM private key in the key file.
fn signer(private_key: &str) -> Result<Box<dyn Signer>, AuthError> {
    let item = rustls_pemfile::read_one(&mut private_key.as_bytes())
        .map_err(|e| AuthError::Sign(e.to_string()))?
        .ok_or(AuthError::MissingPem)?;
    let der = match item {
        Item::Pkcs8Key(k) => PrivateKeyDer::from(k),
        Item::Pkcs1Key(k) => PrivateKeyDer::from(k),
        other => return Err(AuthError::UnsupportedKey(format!("{:?}", other))),
    };
    let key = rustls::crypto::ring::default_provider()
        .key_provider
        .load_private_key(der)
        .map_err(|e| AuthError::Sign(e.to_string()))?;
    key.choose_scheme(&[rustls::SignatureScheme::RSA_PKCS1_SHA256])
        .ok_or_else(|| AuthError::Sign("key does not support RSA_PKCS1_SHA256".to_string()))
}

/// Signed assertion `header.claims.signature` for `scope`, addressed to `audience`
/// (the token endpoint), valid from `issued_at` for one hour.
pub fn sign_assertion(
    key: &ServiceAccountKey,
    scope: &str,
    audience: &str,
    issued_at: OffsetDateTime,
) -> Result<String, AuthError> {
    let signer = signer(&key.private_key)?;

    let header = JwsHeader {
        alg: "RS256",
        typ: "JWT",
        kid: key.private_key_id.as_deref(),
    };
    let claims = JwsClaims {
        iss: &key.client_email,
        scope,
        aud: audience,
        iat: issued_at.unix_timestamp(),
        exp: (issued_at + ASSERTION_LIFETIME).unix_timestamp(),
    };

    let signing_input = format!("{}.{}", encode_segment(&header)?, encode_segment(&claims)?);
    let sig = signer
        .sign(signing_input.as_bytes())
        .map_err(|e| AuthError::Sign(e.to_string()))?;
    Ok(format!("{}.{}", signing_input, BASE64_URL_SAFE_NO_PAD.encode(sig)))
}
