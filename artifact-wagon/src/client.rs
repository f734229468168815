//! Artifact Service client.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use secrecy::ExposeSecret;
use tracing::{debug, instrument, warn};
use url::Url;
use wagon_common::{HttpRequest, HttpResponse, HttpTransport, RateLimitRetryStrategy, RetryingTransport, build_http_client};

use crate::artifact::{Artifact, PathResolution};
use crate::auth::{AuthorizationCache, HereAccountMinter, TokenMinter};
use crate::config::WagonConfig;
use crate::credentials::{Credentials, HERE_ENDPOINT_URL_KEY};
use crate::error::{WagonError, WagonResult};
use crate::models::{RegisterResponse, ServiceExceptionResponse};
use crate::resolver::ResolverChain;

/// Repository URL prefix replaced by the resolved Artifact Service URL.
pub const ARTIFACT_SERVICE_URL_PLACEHOLDER: &str = "here+artifact-service";

/// Scheme rewrites, applied in order.
const PROTOCOL_MAP: [(&str, &str); 2] = [("here+http://", "http://"), ("here+https://", "https://")];

/// Client for one repository.
///
/// Every request is authorized with a bearer token minted once per client and
/// sent through a retrying transport.
pub struct ArtifactWagon<T = Client> {
    transport: RetryingTransport<Arc<T>>,
    resolver: ResolverChain,
    authorization: AuthorizationCache<Box<dyn TokenMinter>>,
    credentials: Credentials,
}

impl ArtifactWagon<Client> {
    /// Create a client with a `reqwest` transport built from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: WagonConfig) -> WagonResult<Self> {
        let client = build_http_client(&config.http)?;
        Ok(Self::with_transport(config, client))
    }
}

impl<T: HttpTransport + 'static> ArtifactWagon<T> {
    /// Create a client over an existing transport.
    #[must_use]
    pub fn with_transport(config: WagonConfig, transport: T) -> Self {
        let credentials = config.credentials.load();
        let base = Arc::new(transport);
        let retrying = RetryingTransport::new(Arc::clone(&base), RateLimitRetryStrategy::new(config.retry));
        let resolver = ResolverChain::standard(retrying.clone(), config.url_cache_path);

        let minting = credentials
            .clone()
            .with_overrides(config.username.as_deref(), config.password.as_ref());
        let minter = HereAccountMinter::new(base, minting);

        Self::from_parts(retrying, resolver, minter, credentials)
    }

    /// Assemble a client from explicit parts.
    #[must_use]
    pub fn from_parts(
        transport: RetryingTransport<Arc<T>>,
        resolver: ResolverChain,
        minter: impl TokenMinter + 'static,
        credentials: Credentials,
    ) -> Self {
        let minter: Box<dyn TokenMinter> = Box::new(minter);
        Self {
            transport,
            resolver,
            authorization: AuthorizationCache::new(minter),
            credentials,
        }
    }

    /// Loaded credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Whether a bearer token has been minted.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.authorization.is_minted()
    }

    /// Map a configured repository URL to the URL requests are sent to.
    ///
    /// # Errors
    ///
    /// Returns an error if the placeholder cannot be resolved.
    pub fn repository_url(&self, url: &str) -> WagonResult<String> {
        if url.starts_with(ARTIFACT_SERVICE_URL_PLACEHOLDER) {
            let endpoint = self
                .credentials
                .token_endpoint_url
                .as_deref()
                .ok_or_else(|| WagonError::invalid_config(format!("No {HERE_ENDPOINT_URL_KEY} property specified")))?;
            return Ok(self.resolver.resolve(endpoint)?);
        }

        for (from, to) in PROTOCOL_MAP {
            if let Some(rest) = url.strip_prefix(from) {
                return Ok(format!("{to}{rest}"));
            }
        }
        Ok(url.to_string())
    }

    /// Add the bearer token to a request, minting it on first use.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if no token could be minted.
    pub fn authorize(&self, request: HttpRequest) -> WagonResult<HttpRequest> {
        let token = self.authorization.get_or_mint()?;
        Ok(request.with_header(AUTHORIZATION, &format!("Bearer {}", token.expose_secret()))?)
    }

    /// Authorize and execute a request through the retrying transport.
    ///
    /// # Errors
    ///
    /// Returns an error if authorization fails or no response was received.
    pub fn execute(&self, request: HttpRequest) -> WagonResult<HttpResponse> {
        let request = self.authorize(request)?;
        Ok(self.transport.execute(&request)?)
    }

    /// Rewrite a `group/artifact/version/file` resource path to its HRN path.
    #[must_use]
    pub fn resolve_resource(&self, repository_url: &str, resource: &str) -> PathResolution {
        match self.repository_url(repository_url) {
            Ok(base) => self.resolve_resource_at(&base, resource),
            Err(e) => PathResolution::TransportError(e),
        }
    }

    fn resolve_resource_at(&self, base: &str, resource: &str) -> PathResolution {
        let Some(artifact) = Artifact::parse(resource) else {
            warn!(path = resource, "Invalid path passed into wagon provider");
            return PathResolution::Invalid(resource.to_string());
        };

        let url = match service_url(base, &["register", &artifact.group_id, &artifact.artifact_id]) {
            Ok(url) => url,
            Err(e) => return PathResolution::TransportError(e),
        };

        let response = match self.execute(HttpRequest::get(url)) {
            Ok(response) => response,
            Err(e) => return PathResolution::TransportError(e),
        };
        if response.status() != StatusCode::OK {
            debug!(status = response.status().as_u16(), artifact = %artifact, "Artifact is not registered");
            return PathResolution::NotFound(artifact.register_path());
        }

        match response.json::<RegisterResponse>() {
            Ok(registration) => {
                let path = artifact.hrn_path(&registration.group_hrn_prefix);
                debug!(path = %path, "Rewrote path for get");
                PathResolution::Resolved(path)
            }
            Err(e) => PathResolution::TransportError(e.into()),
        }
    }

    /// Download a resource.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the path is invalid, unregistered or not
    /// accessible, and other errors for transport or service failures.
    #[instrument(skip(self))]
    pub fn get(&self, repository_url: &str, resource: &str) -> WagonResult<Vec<u8>> {
        let base = self.repository_url(repository_url)?;
        let path = match self.resolve_resource_at(&base, resource) {
            PathResolution::Resolved(path) => path,
            PathResolution::NotFound(path) | PathResolution::Invalid(path) => {
                return Err(WagonError::not_found(path));
            }
            PathResolution::TransportError(e) => return Err(e),
        };

        let segments: Vec<&str> = path.split('/').collect();
        let url = service_url(&base, &segments)?;
        let response = self.execute(HttpRequest::get(url.as_str()))?;
        match response.status() {
            StatusCode::OK => Ok(response.into_body()),
            StatusCode::NOT_FOUND | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(WagonError::not_found(path))
            }
            status => {
                let message = response
                    .json::<ServiceExceptionResponse>()
                    .map(|e| e.message)
                    .unwrap_or_default();
                Err(WagonError::Status { status, url, message })
            }
        }
    }
}

/// Append percent-encoded path segments to a base URL.
fn service_url(base: &str, segments: &[&str]) -> WagonResult<String> {
    let mut url =
        Url::parse(base).map_err(|e| WagonError::invalid_config(format!("Invalid repository URL {base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| WagonError::invalid_config(format!("Repository URL {base} cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.into())
}

impl<T> std::fmt::Debug for ArtifactWagon<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactWagon")
            .field("resolver", &self.resolver)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
