//! Property-based tests for artifact-wagon.
//!
//! Tests validate:
//! - Four-segment resource paths parse and rewrite to HRN paths
//! - Any other segment count is rejected
//! - Known token endpoints map to a well-formed lookup URL
//! - Unknown token endpoints fail without a network call
//! - `HereLayout` locations parse back to the same coordinates
//! - Credential secrets never appear in debug output

use std::sync::Arc;

use artifact_wagon::artifact::NO_VERSION;
use artifact_wagon::layout::{ArtifactCoordinates, MetadataCoordinates};
use artifact_wagon::resolver::ARTIFACT_API_LOOKUP_PATH;
use artifact_wagon::{
    Artifact, Credentials, HereLayout, LookupResolver, Maven2Layout, RepositoryLayout, ResolveError,
    ServiceUrlResolver,
};
use proptest::prelude::*;
use test_utils::fixtures::group_hrn_prefix;
use test_utils::{
    MockTransport, artifact_id_strategy, group_id_strategy, invalid_resource_path_strategy,
    resource_path_strategy, token_endpoint_strategy, unknown_token_endpoint_strategy,
};
use wagon_common::Properties;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_resource_path_rewrites_to_hrn((group, artifact, version, file) in resource_path_strategy()) {
        let path = format!("{group}/{artifact}/{version}/{file}");
        let parsed = Artifact::parse(&path).unwrap();
        prop_assert_eq!(&parsed.group_id, &group);
        prop_assert_eq!(&parsed.artifact_id, &artifact);

        let expected_version = if version.is_empty() { NO_VERSION } else { version.as_str() };
        let prefix = group_hrn_prefix(&group);
        prop_assert_eq!(
            parsed.hrn_path(&prefix),
            format!("{prefix}:{artifact}:{expected_version}/{file}")
        );
        prop_assert_eq!(parsed.register_path(), format!("register/{group}/{artifact}"));
    }

    #[test]
    fn prop_invalid_paths_rejected(path in invalid_resource_path_strategy()) {
        prop_assert!(Artifact::parse(&path).is_none());
    }

    #[test]
    fn prop_known_endpoints_have_lookup_url(endpoint in token_endpoint_strategy()) {
        let resolver = LookupResolver::new(MockTransport::new());
        let url = resolver.lookup_url(&endpoint).unwrap();
        prop_assert!(url.starts_with("https://api-lookup.data.api.platform."));
        prop_assert!(url.ends_with(ARTIFACT_API_LOOKUP_PATH));
        prop_assert!(!url.contains("//platform"));
    }

    #[test]
    fn prop_unknown_endpoints_fail_offline(endpoint in unknown_token_endpoint_strategy()) {
        let transport = Arc::new(MockTransport::new());
        let resolver = LookupResolver::new(Arc::clone(&transport));
        let result = resolver.resolve(&endpoint);
        prop_assert!(matches!(result, Err(ResolveError::UnknownEndpoint(_))));
        prop_assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn prop_here_layout_location_parses_back(
        group in group_id_strategy(),
        artifact in artifact_id_strategy(),
        version in "[0-9]{1,2}\\.[0-9]{1,2}",
        extension in "(jar|pom|zip)",
    ) {
        let layout = HereLayout::new(Maven2Layout);
        let coordinates = ArtifactCoordinates::new(group.as_str(), artifact.as_str(), version.as_str(), extension.as_str());
        let location = layout.artifact_location(&coordinates);

        let parsed = Artifact::parse(&location).unwrap();
        prop_assert_eq!(parsed.group_id, group);
        prop_assert_eq!(parsed.artifact_id, artifact.clone());
        prop_assert_eq!(parsed.version, version.clone());
        prop_assert_eq!(parsed.file, format!("{artifact}-{version}.{extension}"));
    }

    #[test]
    fn prop_here_layout_metadata_is_four_segments(
        group in group_id_strategy(),
        artifact in artifact_id_strategy(),
        version in prop_oneof![Just(String::new()), "[0-9]{1,2}\\.[0-9]{1,2}"],
    ) {
        let layout = HereLayout::new(Maven2Layout);
        let metadata = MetadataCoordinates {
            group_id: group.clone(),
            artifact_id: artifact,
            version: version.clone(),
            kind: "maven-metadata.xml".to_string(),
        };
        let location = layout.metadata_location(&metadata).unwrap();
        let parsed = Artifact::parse(&location).unwrap();
        prop_assert_eq!(parsed.group_id, group);
        prop_assert_eq!(parsed.version, if version.is_empty() { NO_VERSION.to_string() } else { version });
    }

    #[test]
    fn prop_credentials_debug_redacts_secret(secret in "[A-Za-z0-9]{12,40}") {
        let mut properties = Properties::new();
        properties.insert("here.access.key.id", "key-id");
        properties.insert("here.access.key.secret", secret.as_str());
        let credentials = Credentials::from_properties(properties);

        let debug = format!("{credentials:?}");
        prop_assert!(!debug.contains(&secret));
        prop_assert!(debug.contains("[REDACTED]"));
    }
}
