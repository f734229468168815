//! End-to-end tests against a local HTTP server.
//!
//! The client is blocking, so each test drives wiremock setup through its own
//! tokio runtime and calls the client from the test thread.

use std::sync::Arc;

use artifact_wagon::resolver::EndpointTable;
use artifact_wagon::{
    ArtifactWagon, Credentials, FileResolver, HereAccountMinter, InMemoryResolver, LookupResolver, PathResolution,
    ResolverChain, ServiceUrlResolver, WagonError,
};
use reqwest::blocking::Client;
use tempfile::TempDir;
use test_utils::fixtures::{ACCESS_TOKEN, credentials_properties, lookup_response, register_response, token_response};
use tokio::runtime::Runtime;
use wagon_common::{HttpConfig, Properties, RateLimitRetryStrategy, RetryingTransport, build_http_client};
use wiremock::matchers::{body_string, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GROUP: &str = "com.here.test";
const ARTIFACT: &str = "demo";
const PLACEHOLDER_URL: &str = "here+artifact-service://artifact-service";

struct Harness {
    server: MockServer,
    dir: TempDir,
    memory: InMemoryResolver,
    rt: Runtime,
}

impl Harness {
    fn start() -> Self {
        let rt = Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());
        Self {
            server,
            dir: TempDir::new().unwrap(),
            memory: InMemoryResolver::isolated(),
            rt,
        }
    }

    fn token_url(&self) -> String {
        format!("{}/oauth2/token", self.server.uri())
    }

    fn service_url(&self) -> String {
        format!("{}/svc/artifact", self.server.uri())
    }

    fn cache_file(&self) -> std::path::PathBuf {
        self.dir.path().join("url_cache.properties")
    }

    fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    fn mount_token(&self) {
        self.mount(
            Mock::given(method("POST"))
                .and(path("/oauth2/token"))
                .respond_with(ResponseTemplate::new(200).set_body_string(token_response(ACCESS_TOKEN))),
        );
    }

    fn mount_lookup(&self) {
        self.mount(
            Mock::given(method("GET"))
                .and(path("/lookup/v1/platform/apis/artifact/v1"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(lookup_response(&format!("{}/svc", self.server.uri()))),
                ),
        );
    }

    fn mount_register(&self, artifact: &str) {
        self.mount(
            Mock::given(method("GET"))
                .and(path(format!("/svc/artifact/register/{GROUP}/{artifact}")))
                .respond_with(ResponseTemplate::new(200).set_body_string(register_response(GROUP, artifact))),
        );
    }

    fn download_path(version: &str, file: &str) -> String {
        format!("/svc/artifact/hrn:here:artifact:::{GROUP}:{ARTIFACT}:{version}/{file}")
    }

    fn requests_to(&self, target: &str) -> Vec<wiremock::Request> {
        self.rt
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == target)
            .collect()
    }

    fn wagon(&self) -> ArtifactWagon<Client> {
        let token_url = self.token_url();
        let base = Arc::new(build_http_client(&HttpConfig::default()).unwrap());
        let retrying = RetryingTransport::new(Arc::clone(&base), RateLimitRetryStrategy::with_defaults());

        let endpoints =
            EndpointTable::known().with_endpoint(token_url.as_str(), format!("{}/lookup/v1", self.server.uri()));
        let chain = ResolverChain::new(vec![
            Box::new(self.memory.clone()),
            Box::new(FileResolver::with_path(self.cache_file())),
            Box::new(LookupResolver::with_endpoints(retrying.clone(), endpoints)),
        ]);

        let credentials = Credentials::from_properties(Properties::parse(&credentials_properties(&token_url)));
        let minter = HereAccountMinter::new(base, credentials.clone());
        ArtifactWagon::from_parts(retrying, chain, minter, credentials)
    }
}

#[test]
fn test_placeholder_resolves_through_lookup_and_writes_back() {
    let harness = Harness::start();
    harness.mount_lookup();
    let wagon = harness.wagon();

    let url = wagon.repository_url(PLACEHOLDER_URL).unwrap();
    assert_eq!(url, harness.service_url());

    assert_eq!(
        harness.memory.resolve(&harness.token_url()).unwrap(),
        Some(harness.service_url())
    );
    let cached = Properties::load(&harness.cache_file()).unwrap();
    assert_eq!(cached.get(&harness.token_url()), Some(harness.service_url().as_str()));

    assert_eq!(wagon.repository_url(PLACEHOLDER_URL).unwrap(), url);
    assert_eq!(harness.requests_to("/lookup/v1/platform/apis/artifact/v1").len(), 1);
}

#[test]
fn test_file_cache_answers_before_lookup() {
    let harness = Harness::start();
    let mut cached = Properties::new();
    cached.insert(harness.token_url(), "http://cached.example.com/artifact");
    cached.store(&harness.cache_file(), "seed").unwrap();

    let wagon = harness.wagon();
    assert_eq!(
        wagon.repository_url(PLACEHOLDER_URL).unwrap(),
        "http://cached.example.com/artifact"
    );
    assert!(harness.requests_to("/lookup/v1/platform/apis/artifact/v1").is_empty());
    assert_eq!(harness.memory.len(), 1);
}

#[test]
fn test_lookup_failure_fails_resolution() {
    let harness = Harness::start();
    harness.mount(
        Mock::given(method("GET"))
            .and(path("/lookup/v1/platform/apis/artifact/v1"))
            .respond_with(ResponseTemplate::new(503)),
    );
    let wagon = harness.wagon();

    let err = wagon.repository_url(PLACEHOLDER_URL).unwrap_err();
    assert!(matches!(err, WagonError::Resolve(_)));
    assert!(harness.memory.is_empty());
}

#[test]
fn test_download_mints_token_once_and_sends_bearer() {
    let harness = Harness::start();
    harness.mount_token();
    harness.mount_lookup();
    harness.mount_register(ARTIFACT);
    for file in ["demo-1.0.jar", "demo-1.0.pom"] {
        harness.mount(
            Mock::given(method("GET"))
                .and(path(Harness::download_path("1.0", file)))
                .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(file.as_bytes().to_vec())),
        );
    }
    let wagon = harness.wagon();
    assert!(!wagon.is_authorized());

    let jar = wagon.get(PLACEHOLDER_URL, "com.here.test/demo/1.0/demo-1.0.jar").unwrap();
    let pom = wagon.get(PLACEHOLDER_URL, "com.here.test/demo/1.0/demo-1.0.pom").unwrap();
    assert_eq!(jar, b"demo-1.0.jar");
    assert_eq!(pom, b"demo-1.0.pom");
    assert!(wagon.is_authorized());

    let token_requests = harness.requests_to("/oauth2/token");
    assert_eq!(token_requests.len(), 1);
    let authorization = token_requests[0].headers.get("authorization").unwrap().to_str().unwrap();
    assert!(authorization.starts_with("OAuth "));
    assert!(authorization.contains("oauth_consumer_key=\"test-access-key-id\""));
    assert!(authorization.contains("oauth_signature_method=\"HMAC-SHA256\""));
    assert_eq!(token_requests[0].body, b"grant_type=client_credentials");
}

#[test]
fn test_token_request_matches_form_contract() {
    let harness = Harness::start();
    harness.mount(
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(header_regex("authorization", "^OAuth .*oauth_signature=\"[^\"]+\""))
            .and(body_string("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_string(token_response(ACCESS_TOKEN))),
    );
    harness.mount_lookup();
    harness.mount_register(ARTIFACT);
    let wagon = harness.wagon();

    let resolution = wagon.resolve_resource(PLACEHOLDER_URL, "com.here.test/demo//demo.pom");
    assert_eq!(
        resolution.resolved(),
        Some("hrn:here:artifact:::com.here.test:demo:NONE/demo.pom")
    );
}

#[test]
fn test_rate_limited_download_is_retried() {
    let harness = Harness::start();
    harness.mount_token();
    harness.mount_lookup();
    harness.mount_register(ARTIFACT);
    let download = Harness::download_path("2.0", "demo-2.0.jar");
    harness.mount(
        Mock::given(method("GET"))
            .and(path(download.as_str()))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
            .up_to_n_times(1),
    );
    harness.mount(
        Mock::given(method("GET"))
            .and(path(download.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jar".to_vec())),
    );
    let wagon = harness.wagon();

    let body = wagon.get(PLACEHOLDER_URL, "com.here.test/demo/2.0/demo-2.0.jar").unwrap();
    assert_eq!(body, b"jar");
    assert_eq!(harness.requests_to(&download).len(), 2);
}

#[test]
fn test_unregistered_artifact_is_not_found() {
    let harness = Harness::start();
    harness.mount_token();
    harness.mount_lookup();
    harness.mount(
        Mock::given(method("GET"))
            .and(path(format!("/svc/artifact/register/{GROUP}/missing")))
            .respond_with(ResponseTemplate::new(404)),
    );
    let wagon = harness.wagon();

    match wagon.get(PLACEHOLDER_URL, "com.here.test/missing/1.0/missing-1.0.jar") {
        Err(WagonError::ResourceNotFound(path)) => assert_eq!(path, "register/com.here.test/missing"),
        other => panic!("expected ResourceNotFound, got {other:?}"),
    }
}

#[test]
fn test_invalid_path_skips_network() {
    let harness = Harness::start();
    harness.mount_lookup();
    let wagon = harness.wagon();

    let resolution = wagon.resolve_resource(PLACEHOLDER_URL, "com/here/test/demo/1.0/demo-1.0.jar");
    assert!(matches!(resolution, PathResolution::Invalid(_)));
    assert!(harness.requests_to("/oauth2/token").is_empty());
    assert!(!wagon.is_authorized());
}

#[test]
fn test_rejected_credentials_fail_authentication() {
    let harness = Harness::start();
    harness.mount(
        Mock::given(method("POST")).and(path("/oauth2/token")).respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"errorId":"E1","httpStatus":401,"errorCode":401300,"message":"Signature mismatch"}"#),
        ),
    );
    harness.mount_lookup();
    let wagon = harness.wagon();

    let err = wagon.get(PLACEHOLDER_URL, "com.here.test/demo/1.0/demo-1.0.jar").unwrap_err();
    assert!(matches!(err, WagonError::AuthenticationFailed(_)));
    assert!(!wagon.is_authorized());
}

#[test]
fn test_prefixed_scheme_is_rewritten() {
    let harness = Harness::start();
    harness.mount_token();
    harness.mount_register(ARTIFACT);
    harness.mount(
        Mock::given(method("GET"))
            .and(path(Harness::download_path("1.0", "demo-1.0.jar")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"direct".to_vec())),
    );
    let wagon = harness.wagon();

    let repository = format!("here+{}", harness.service_url());
    let body = wagon.get(&repository, "com.here.test/demo/1.0/demo-1.0.jar").unwrap();
    assert_eq!(body, b"direct");
    assert!(harness.requests_to("/lookup/v1/platform/apis/artifact/v1").is_empty());
}
