//! OAuth 1.0a request signing for the posting API
//!
//! The v2 posting endpoint authenticates requests with an OAuth 1.0a
//! user-context header: HMAC-SHA1 over a canonical signature base string.
//! JSON request bodies do not participate in the signature.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

use crate::common::errors::{Result, WatcherError};

type HmacSha1 = Hmac<Sha1>;

/// Length of the generated oauth_nonce
const NONCE_LEN: usize = 32;

/// Credentials for OAuth 1.0a user-context signing
#[derive(Debug, Clone)]
pub struct OAuth1Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

/// Build a complete `Authorization` header value for one request
pub fn authorization_header(
    credentials: &OAuth1Credentials,
    method: &str,
    url: &str,
) -> Result<String> {
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect();
    let timestamp = chrono::Utc::now().timestamp();

    authorization_header_with(credentials, method, url, &nonce, timestamp)
}

/// Deterministic variant of [`authorization_header`] for a fixed nonce and timestamp
pub fn authorization_header_with(
    credentials: &OAuth1Credentials,
    method: &str,
    url: &str,
    nonce: &str,
    timestamp: i64,
) -> Result<String> {
    let timestamp = timestamp.to_string();
    // keys here are pre-sorted; keep them that way when adding params
    let params = [
        ("oauth_consumer_key", credentials.consumer_key.as_str()),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp.as_str()),
        ("oauth_token", credentials.access_token.as_str()),
        ("oauth_version", "1.0"),
    ];

    let signature = sign(credentials, method, url, &params)?;

    let mut header = String::from("OAuth ");
    for (key, value) in params
        .iter()
        .copied()
        .chain(std::iter::once(("oauth_signature", signature.as_str())))
    {
        header.push_str(&format!("{}=\"{}\", ", key, percent_encode(value)));
    }
    header.truncate(header.len() - 2);
    Ok(header)
}

/// Compute the base64 HMAC-SHA1 signature over the canonical base string
fn sign(
    credentials: &OAuth1Credentials,
    method: &str,
    url: &str,
    params: &[(&str, &str)],
) -> Result<String> {
    let param_string = params
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    );
    let signing_key = format!(
        "{}&{}",
        percent_encode(&credentials.consumer_secret),
        percent_encode(&credentials.access_token_secret)
    );

    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .map_err(|e| WatcherError::Authentication(format!("failed to create HMAC: {e}")))?;
    mac.update(base_string.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// RFC 3986 percent-encoding over raw bytes
///
/// Only unreserved characters pass through; everything else becomes an
/// uppercase `%XX` escape.
pub fn percent_encode(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char);
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
