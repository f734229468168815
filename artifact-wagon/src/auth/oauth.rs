//! HERE Account OAuth 1.0a `client_credentials` grant.
//!
//! The token request is a form POST signed with HMAC-SHA256 over the
//! normalized request URL and the sorted, percent-encoded oauth and form
//! parameters. The signing key is the encoded access key secret followed by
//! `&` (there is no token secret).

use std::fmt::Write as _;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::Rng;
use rand::distributions::Alphanumeric;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::{debug, instrument};
use url::Url;
use url::form_urlencoded;
use wagon_common::{HttpRequest, HttpTransport};

use super::TokenMinter;
use crate::credentials::{Credentials, HERE_ACCESS_ID_KEY, HERE_ACCESS_SECRET_KEY, HERE_ENDPOINT_URL_KEY};
use crate::error::{WagonError, WagonResult};
use crate::models::{TokenErrorResponse, TokenResponse};

const SIGNATURE_METHOD: &str = "HMAC-SHA256";
const OAUTH_VERSION: &str = "1.0";
const NONCE_LENGTH: usize = 32;
const GRANT_TYPE_FORM: [(&str, &str); 1] = [("grant_type", "client_credentials")];

/// Everything but the RFC 3986 unreserved characters.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

fn oauth_encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Per-request OAuth values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthParams {
    /// Access key id
    pub consumer_key: String,
    /// Random request nonce
    pub nonce: String,
    /// Seconds since the Unix epoch
    pub timestamp: i64,
}

impl OAuthParams {
    /// Fresh nonce and current timestamp.
    #[must_use]
    pub fn generate(consumer_key: impl Into<String>) -> Self {
        let nonce = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LENGTH)
            .map(char::from)
            .collect();
        Self {
            consumer_key: consumer_key.into(),
            nonce,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    fn oauth_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("oauth_consumer_key", self.consumer_key.clone()),
            ("oauth_nonce", self.nonce.clone()),
            ("oauth_signature_method", SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp", self.timestamp.to_string()),
            ("oauth_version", OAUTH_VERSION.to_string()),
        ]
    }
}

/// Build the OAuth signature base string.
///
/// # Errors
///
/// Returns an error if `url` is not an absolute URL.
pub fn signature_base_string(
    method: &Method,
    url: &str,
    oauth: &OAuthParams,
    form: &[(&str, &str)],
) -> WagonResult<String> {
    let parsed = Url::parse(url).map_err(|e| WagonError::invalid_config(format!("token endpoint {url}: {e}")))?;

    let mut normalized = format!("{}://{}", parsed.scheme(), parsed.host_str().unwrap_or_default());
    if let Some(port) = parsed.port() {
        let _ = write!(normalized, ":{port}");
    }
    normalized.push_str(parsed.path());

    let mut params: Vec<(String, String)> = oauth
        .oauth_pairs()
        .into_iter()
        .map(|(k, v)| (oauth_encode(k), oauth_encode(&v)))
        .chain(form.iter().map(|(k, v)| (oauth_encode(k), oauth_encode(v))))
        .chain(
            parsed
                .query_pairs()
                .map(|(k, v)| (oauth_encode(&k), oauth_encode(&v))),
        )
        .collect();
    params.sort();

    let joined = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    Ok(format!(
        "{}&{}&{}",
        method.as_str().to_ascii_uppercase(),
        oauth_encode(&normalized),
        oauth_encode(&joined)
    ))
}

fn sign(base_string: &str, secret: &SecretString) -> WagonResult<String> {
    let key = format!("{}&", oauth_encode(secret.expose_secret()));
    let mut mac = Hmac::<Sha256>::new_from_slice(key.as_bytes())
        .map_err(|e| WagonError::auth_failed(format!("signing key: {e}")))?;
    mac.update(base_string.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Build the `Authorization` header value for a signed request.
///
/// # Errors
///
/// Returns an error if `url` is not an absolute URL.
pub fn authorization_header(
    method: &Method,
    url: &str,
    oauth: &OAuthParams,
    form: &[(&str, &str)],
    secret: &SecretString,
) -> WagonResult<String> {
    let base_string = signature_base_string(method, url, oauth, form)?;
    let signature = sign(&base_string, secret)?;

    let mut pairs = oauth.oauth_pairs();
    pairs.push(("oauth_signature", signature));
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let fields = pairs
        .iter()
        .map(|(k, v)| format!("{k}=\"{}\"", oauth_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("OAuth {fields}"))
}

/// Mints tokens from the HERE Account token endpoint named in the credentials.
pub struct HereAccountMinter<T> {
    transport: T,
    credentials: Credentials,
}

impl<T: HttpTransport> HereAccountMinter<T> {
    /// Create a minter.
    #[must_use]
    pub const fn new(transport: T, credentials: Credentials) -> Self {
        Self { transport, credentials }
    }

    /// Credentials used for minting.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn required<'a>(value: Option<&'a str>, key: &str) -> WagonResult<&'a str> {
        value.ok_or_else(|| WagonError::invalid_config(format!("No {key} property specified")))
    }

    /// Request a token with the given OAuth values.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are incomplete, the request fails or
    /// the endpoint rejects it.
    #[instrument(skip_all)]
    pub fn request_token(&self, oauth: &OAuthParams) -> WagonResult<SecretString> {
        let endpoint = Self::required(self.credentials.token_endpoint_url.as_deref(), HERE_ENDPOINT_URL_KEY)?;
        let secret = self
            .credentials
            .access_key_secret
            .as_ref()
            .ok_or_else(|| WagonError::invalid_config(format!("No {HERE_ACCESS_SECRET_KEY} property specified")))?;

        let header = authorization_header(&Method::POST, endpoint, oauth, &GRANT_TYPE_FORM, secret)?;
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(GRANT_TYPE_FORM.iter())
            .finish();

        let request = HttpRequest::post(endpoint)
            .with_header(AUTHORIZATION, &header)?
            .with_header(CONTENT_TYPE, "application/x-www-form-urlencoded")?
            .with_header(ACCEPT, "application/json")?
            .with_body(body);

        debug!(endpoint, "Requesting client_credentials token");
        let response = self.transport.execute(&request)?;
        if response.status() != StatusCode::OK {
            let detail = response
                .json::<TokenErrorResponse>()
                .ok()
                .and_then(|e| e.describe())
                .unwrap_or_else(|| response.text());
            return Err(WagonError::auth_failed(format!(
                "token endpoint returned {}: {detail}",
                response.status()
            )));
        }

        let token: TokenResponse = serde_json::from_slice(response.body())?;
        Ok(SecretString::from(token.access_token))
    }
}

impl<T: HttpTransport> TokenMinter for HereAccountMinter<T> {
    fn mint(&self) -> WagonResult<SecretString> {
        let consumer_key = Self::required(self.credentials.access_key_id.as_deref(), HERE_ACCESS_ID_KEY)?;
        self.request_token(&OAuthParams::generate(consumer_key))
    }
}
