use std::collections::HashMap;

const API_LOOKUP_PROD_URL: &str = "https://api-lookup.data.api.platform.here.com/lookup/v1";
const API_LOOKUP_STAGING_URL: &str = "https://api-lookup.data.api.platform.sit.here.com/lookup/v1";
const API_LOOKUP_CN_PROD_URL: &str = "https://api-lookup.data.api.platform.hereolp.cn/lookup/v1/";
const API_LOOKUP_CN_STAGING_URL: &str = "https://api-lookup.data.api.platform.in.hereolp.cn/lookup/v1/";

const KNOWN_ENDPOINTS: [(&str, &str); 6] = [
    ("https://account.api.here.com/oauth2/token", API_LOOKUP_PROD_URL),
    ("https://stg.account.api.here.com/oauth2/token", API_LOOKUP_STAGING_URL),
    ("https://account.hereapi.cn/oauth2/token", API_LOOKUP_CN_PROD_URL),
    ("https://account.sit.hereapi.cn/oauth2/token", API_LOOKUP_CN_STAGING_URL),
    // Regional domains
    ("https://elb.cn-northwest-1.account.hereapi.cn/oauth2/token", API_LOOKUP_CN_PROD_URL),
    ("https://elb.cn-northwest-1.account.sit.hereapi.cn/oauth2/token", API_LOOKUP_CN_STAGING_URL),
];

/// Token endpoint to API Lookup base URL mapping.
#[derive(Debug, Clone)]
pub struct EndpointTable {
    entries: HashMap<String, String>,
}

impl EndpointTable {
    /// Table holding only the known HERE token endpoints.
    #[must_use]
    pub fn known() -> Self {
        Self {
            entries: KNOWN_ENDPOINTS
                .iter()
                .map(|(token, lookup)| ((*token).to_string(), (*lookup).to_string()))
                .collect(),
        }
    }

    /// Add or replace a mapping.
    #[must_use]
    pub fn with_endpoint(mut self, token_endpoint: impl Into<String>, lookup_base: impl Into<String>) -> Self {
        self.entries.insert(token_endpoint.into(), lookup_base.into());
        self
    }

    /// API Lookup base URL for a token endpoint. Surrounding whitespace is ignored.
    #[must_use]
    pub fn lookup_base(&self, token_endpoint: &str) -> Option<&str> {
        self.entries.get(token_endpoint.trim()).map(String::as_str)
    }
}

impl Default for EndpointTable {
    fn default() -> Self {
        Self::known()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_endpoints() {
        let table = EndpointTable::known();
        assert_eq!(
            table.lookup_base("https://account.api.here.com/oauth2/token"),
            Some(API_LOOKUP_PROD_URL)
        );
        assert_eq!(
            table.lookup_base("https://elb.cn-northwest-1.account.sit.hereapi.cn/oauth2/token"),
            Some(API_LOOKUP_CN_STAGING_URL)
        );
        assert_eq!(table.entries.len(), 6);
    }

    #[test]
    fn test_key_is_trimmed() {
        let table = EndpointTable::known();
        assert_eq!(
            table.lookup_base("  https://stg.account.api.here.com/oauth2/token\n"),
            Some(API_LOOKUP_STAGING_URL)
        );
    }

    #[test]
    fn test_unknown_endpoint() {
        assert_eq!(EndpointTable::known().lookup_base("https://example.com/oauth2/token"), None);
    }

    #[test]
    fn test_with_endpoint() {
        let table = EndpointTable::known().with_endpoint("http://localhost/token", "http://localhost/lookup/v1");
        assert_eq!(table.lookup_base("http://localhost/token"), Some("http://localhost/lookup/v1"));
    }
}
