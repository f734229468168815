use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use tracing::{debug, instrument};
use wagon_common::{HttpRequest, HttpTransport};

use super::{EndpointTable, ServiceUrlResolver};
use crate::error::ResolveError;
use crate::models::LookupPlatformApisResponse;

/// Lookup API path describing the Artifact Service.
pub const ARTIFACT_API_LOOKUP_PATH: &str = "/platform/apis/artifact/v1";

const ARTIFACT_SUFFIX: &str = "/artifact";

/// Authoritative tier asking the API Lookup service.
#[derive(Debug, Clone)]
pub struct LookupResolver<T> {
    transport: T,
    endpoints: EndpointTable,
}

impl<T: HttpTransport> LookupResolver<T> {
    /// Resolver for the known token endpoints.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_endpoints(transport, EndpointTable::known())
    }

    /// Resolver with a custom endpoint table.
    #[must_use]
    pub const fn with_endpoints(transport: T, endpoints: EndpointTable) -> Self {
        Self { transport, endpoints }
    }

    /// Lookup URL for a token endpoint.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEndpoint` if the endpoint is not in the table.
    pub fn lookup_url(&self, token_endpoint: &str) -> Result<String, ResolveError> {
        let base = self
            .endpoints
            .lookup_base(token_endpoint)
            .ok_or_else(|| ResolveError::UnknownEndpoint(token_endpoint.trim().to_string()))?;
        Ok(format!("{}{ARTIFACT_API_LOOKUP_PATH}", base.trim_end_matches('/')))
    }

    /// Query the Lookup API for the Artifact Service URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is unknown, the request fails or the
    /// response does not describe at least one service with a `baseURL`.
    #[instrument(skip(self))]
    pub fn fetch(&self, token_endpoint: &str) -> Result<String, ResolveError> {
        let url = self.lookup_url(token_endpoint)?;
        let request = HttpRequest::get(url.as_str()).with_header(ACCEPT, "application/json")?;

        let response = self.transport.execute(&request)?;
        if response.status() != StatusCode::OK {
            return Err(ResolveError::Status(response.status()));
        }
        if response.body().is_empty() {
            return Err(ResolveError::EmptyBody);
        }

        let apis: Vec<LookupPlatformApisResponse> = serde_json::from_slice(response.body())?;
        let api = apis.into_iter().next().ok_or(ResolveError::NoServices)?;
        if api.base_url.trim().is_empty() {
            return Err(ResolveError::EmptyBaseUrl);
        }
        let resolved = format!("{}{ARTIFACT_SUFFIX}", api.base_url);
        debug!(url = %resolved, "Resolved Artifact Service URL via Lookup API");
        Ok(resolved)
    }
}

impl<T: HttpTransport> ServiceUrlResolver for LookupResolver<T> {
    fn name(&self) -> &'static str {
        "lookup"
    }

    fn resolve(&self, token_endpoint: &str) -> Result<Option<String>, ResolveError> {
        self.fetch(token_endpoint).map(Some)
    }

    fn after_url_resolved(&self, _token_endpoint: &str, _url: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use test_utils::MockTransport;
    use test_utils::fixtures::{PROD_TOKEN_ENDPOINT, lookup_response};

    const CN_TOKEN: &str = "https://account.hereapi.cn/oauth2/token";

    fn resolver() -> (LookupResolver<Arc<MockTransport>>, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        (LookupResolver::new(Arc::clone(&transport)), transport)
    }

    #[test]
    fn test_lookup_url() {
        let (resolver, _) = resolver();
        assert_eq!(
            resolver.lookup_url(PROD_TOKEN_ENDPOINT).unwrap(),
            "https://api-lookup.data.api.platform.here.com/lookup/v1/platform/apis/artifact/v1"
        );
        assert_eq!(
            resolver.lookup_url(CN_TOKEN).unwrap(),
            "https://api-lookup.data.api.platform.hereolp.cn/lookup/v1/platform/apis/artifact/v1"
        );
    }

    #[test]
    fn test_resolves_first_descriptor() {
        let (resolver, transport) = resolver();
        transport.push_status(
            200,
            r#"[{"api":"artifact","version":"v1","baseURL":"https://artifact.example.com/v1"},{"baseURL":"https://other"}]"#,
        );

        assert_eq!(
            resolver.resolve(PROD_TOKEN_ENDPOINT).unwrap().as_deref(),
            Some("https://artifact.example.com/v1/artifact")
        );

        let seen = transport.requests();
        assert_eq!(seen[0].method, reqwest::Method::GET);
        assert_eq!(seen[0].headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn test_fixture_body() {
        let (resolver, transport) = resolver();
        transport.push_status(200, &lookup_response("https://artifact.example.com"));
        assert_eq!(resolver.fetch(PROD_TOKEN_ENDPOINT).unwrap(), "https://artifact.example.com/artifact");
    }

    #[test]
    fn test_unknown_endpoint() {
        let (resolver, transport) = resolver();
        let err = resolver.resolve("https://example.com/token").unwrap_err();
        assert!(matches!(err, ResolveError::UnknownEndpoint(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_non_200_status() {
        let (resolver, transport) = resolver();
        transport.push_status(503, "");
        let err = resolver.resolve(PROD_TOKEN_ENDPOINT).unwrap_err();
        assert!(matches!(err, ResolveError::Status(StatusCode::SERVICE_UNAVAILABLE)));
    }

    #[test]
    fn test_empty_body() {
        let (resolver, transport) = resolver();
        transport.push_status(200, "");
        assert!(matches!(resolver.resolve(PROD_TOKEN_ENDPOINT).unwrap_err(), ResolveError::EmptyBody));
    }

    #[test]
    fn test_empty_array() {
        let (resolver, transport) = resolver();
        transport.push_status(200, "[]");
        assert!(matches!(resolver.resolve(PROD_TOKEN_ENDPOINT).unwrap_err(), ResolveError::NoServices));
    }

    #[test]
    fn test_malformed_json() {
        let (resolver, transport) = resolver();
        transport.push_status(200, "{not json");
        assert!(matches!(resolver.resolve(PROD_TOKEN_ENDPOINT).unwrap_err(), ResolveError::Parse(_)));
    }

    #[test]
    fn test_missing_base_url() {
        let (resolver, transport) = resolver();
        transport.push_status(200, r#"[{"api":"artifact"}]"#);
        assert!(matches!(resolver.resolve(PROD_TOKEN_ENDPOINT).unwrap_err(), ResolveError::Parse(_)));
    }

    #[test]
    fn test_empty_base_url() {
        let (resolver, transport) = resolver();
        transport.push_status(200, r#"[{"api":"artifact","baseURL":""}]"#);
        assert!(matches!(resolver.resolve(PROD_TOKEN_ENDPOINT).unwrap_err(), ResolveError::EmptyBaseUrl));
    }

    #[test]
    fn test_transport_failure() {
        let (resolver, transport) = resolver();
        transport.push_error("refused");
        assert!(matches!(resolver.resolve(PROD_TOKEN_ENDPOINT).unwrap_err(), ResolveError::Transport(_)));
    }
}
