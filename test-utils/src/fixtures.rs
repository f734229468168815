//! Test fixtures with sample service payloads.

use serde_json::json;

/// Production token endpoint.
pub const PROD_TOKEN_ENDPOINT: &str = "https://account.api.here.com/oauth2/token";

/// Sample access key id.
pub const ACCESS_KEY_ID: &str = "test-access-key-id";

/// Sample access key secret.
pub const ACCESS_KEY_SECRET: &str = "test-access-key-secret";

/// Sample bearer token.
pub const ACCESS_TOKEN: &str = "test-bearer-token";

/// Lookup API body describing one Artifact Service at `base_url`.
#[must_use]
pub fn lookup_response(base_url: &str) -> String {
    json!([{
        "api": "artifact",
        "version": "v1",
        "baseURL": base_url,
        "parameters": {}
    }])
    .to_string()
}

/// Registration lookup body.
#[must_use]
pub fn register_response(group_id: &str, artifact_id: &str) -> String {
    json!({
        "groupId": group_id,
        "artifactId": artifact_id,
        "hrnPrefix": format!("hrn:here:artifact:::{group_id}:{artifact_id}"),
        "groupHrnPrefix": group_hrn_prefix(group_id),
        "created": false
    })
    .to_string()
}

/// Group HRN prefix used by [`register_response`].
#[must_use]
pub fn group_hrn_prefix(group_id: &str) -> String {
    format!("hrn:here:artifact:::{group_id}")
}

/// Token endpoint success body.
#[must_use]
pub fn token_response(access_token: &str) -> String {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": 86_399
    })
    .to_string()
}

/// Artifact Service error body.
#[must_use]
pub fn service_error(status: u16, message: &str) -> String {
    json!({
        "status": status.to_string(),
        "message": message,
        "code": "E000000"
    })
    .to_string()
}

/// Credentials properties text pointing at `token_endpoint`.
#[must_use]
pub fn credentials_properties(token_endpoint: &str) -> String {
    format!(
        "here.user.id = HERE-00000000-0000-0000-0000-000000000000\n\
         here.client.id = test-client\n\
         here.access.key.id = {ACCESS_KEY_ID}\n\
         here.access.key.secret = {ACCESS_KEY_SECRET}\n\
         here.token.endpoint.url = {token_endpoint}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_response_shape() {
        let value: serde_json::Value = serde_json::from_str(&lookup_response("http://x")).unwrap();
        assert_eq!(value[0]["baseURL"], "http://x");
    }

    #[test]
    fn test_credentials_properties() {
        let text = credentials_properties(PROD_TOKEN_ENDPOINT);
        assert!(text.contains("here.token.endpoint.url = https://account.api.here.com/oauth2/token\n"));
        assert_eq!(text.lines().count(), 5);
    }
}
