//! Gateway configuration.
//!
//! Provides [`GatewayConfig`] for the hyper-facing service. Values are loaded
//! from environment variables; any field can also be set through the typed
//! builder.

use s3front_auth::{QueryOrdering, VerifyPolicy};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Default cap on structured XML payload reads (1 MiB).
pub const DEFAULT_MAX_XML_BODY: usize = 1_048_576;

/// Gateway configuration.
///
/// # Examples
///
/// ```
/// use s3front_http::config::GatewayConfig;
///
/// let config = GatewayConfig::default();
/// assert_eq!(config.gateway_listen, "0.0.0.0:8000");
/// assert!(config.base_domains.is_empty());
/// assert!(!config.enforce_signatures);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Bind address for the server binary (e.g. `"0.0.0.0:8000"`).
    #[builder(default = String::from("0.0.0.0:8000"))]
    pub gateway_listen: String,

    /// Base domains that make a `Host` header virtual-hosted
    /// (`<bucket>.<base domain>`).
    #[builder(default)]
    pub base_domains: Vec<String>,

    /// Region reported when a request's credential scope names none.
    #[builder(default = String::from("us-east-1"))]
    pub region: String,

    /// Reject requests whose SigV2/SigV4 signature does not verify.
    #[builder(default = false)]
    pub enforce_signatures: bool,

    /// Accept the cross-algorithm HMAC digest as a signature match.
    #[builder(default = false)]
    pub legacy_signature_fallback: bool,

    /// Parameter order in the SigV4 canonical query string.
    #[builder(default)]
    pub canonical_query_order: QueryOrdering,

    /// Upper bound on a structured payload read when `Content-Length` is
    /// absent or larger.
    #[builder(default = DEFAULT_MAX_XML_BODY)]
    pub max_xml_body: usize,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            gateway_listen: String::from("0.0.0.0:8000"),
            base_domains: Vec::new(),
            region: String::from("us-east-1"),
            enforce_signatures: false,
            legacy_signature_fallback: false,
            canonical_query_order: QueryOrdering::Sorted,
            max_xml_body: DEFAULT_MAX_XML_BODY,
            log_level: String::from("info"),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:8000` |
    /// | `S3_BASE_DOMAINS` | *(empty)*, comma-separated |
    /// | `S3_REGION` | `us-east-1` |
    /// | `S3_ENFORCE_SIGNATURES` | `false` |
    /// | `S3_LEGACY_SIGNATURE_FALLBACK` | `false` |
    /// | `S3_CANONICAL_QUERY_ORDER` | `sorted` (or `wire`) |
    /// | `S3_MAX_XML_BODY` | `1048576` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unparseable values keep their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(v) = lookup("S3_BASE_DOMAINS") {
            config.base_domains = v
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(ToOwned::to_owned)
                .collect();
        }
        if let Some(v) = lookup("S3_REGION") {
            config.region = v;
        }
        if let Some(v) = lookup("S3_ENFORCE_SIGNATURES") {
            config.enforce_signatures = parse_bool(&v);
        }
        if let Some(v) = lookup("S3_LEGACY_SIGNATURE_FALLBACK") {
            config.legacy_signature_fallback = parse_bool(&v);
        }
        if let Some(v) = lookup("S3_CANONICAL_QUERY_ORDER") {
            if v.eq_ignore_ascii_case("wire") {
                config.canonical_query_order = QueryOrdering::Wire;
            } else if v.eq_ignore_ascii_case("sorted") {
                config.canonical_query_order = QueryOrdering::Sorted;
            }
        }
        if let Some(v) = lookup("S3_MAX_XML_BODY") {
            if let Ok(n) = v.parse::<usize>() {
                config.max_xml_body = n;
            }
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// The signature acceptance policy these settings describe.
    #[must_use]
    pub fn verify_policy(&self) -> VerifyPolicy {
        VerifyPolicy {
            query_ordering: self.canonical_query_order,
            legacy_fallback: self.legacy_signature_fallback,
        }
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_should_create_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.gateway_listen, "0.0.0.0:8000");
        assert!(config.base_domains.is_empty());
        assert_eq!(config.region, "us-east-1");
        assert!(!config.enforce_signatures);
        assert!(!config.legacy_signature_fallback);
        assert_eq!(config.canonical_query_order, QueryOrdering::Sorted);
        assert_eq!(config.max_xml_body, 1_048_576);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_should_load_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("GATEWAY_LISTEN", "127.0.0.1:9000"),
            ("S3_BASE_DOMAINS", "s3.local, s3.example.com ,,"),
            ("S3_REGION", "eu-west-1"),
            ("S3_ENFORCE_SIGNATURES", "1"),
            ("S3_LEGACY_SIGNATURE_FALLBACK", "TRUE"),
            ("S3_CANONICAL_QUERY_ORDER", "wire"),
            ("S3_MAX_XML_BODY", "4096"),
            ("LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();
        let config = GatewayConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_owned()));

        assert_eq!(config.gateway_listen, "127.0.0.1:9000");
        assert_eq!(config.base_domains, vec!["s3.local", "s3.example.com"]);
        assert_eq!(config.region, "eu-west-1");
        assert!(config.enforce_signatures);
        assert!(config.legacy_signature_fallback);
        assert_eq!(config.canonical_query_order, QueryOrdering::Wire);
        assert_eq!(config.max_xml_body, 4096);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_should_keep_defaults_for_unparseable_values() {
        let config = GatewayConfig::from_lookup(|k| match k {
            "S3_MAX_XML_BODY" => Some("lots".to_owned()),
            "S3_CANONICAL_QUERY_ORDER" => Some("random".to_owned()),
            _ => None,
        });
        assert_eq!(config.max_xml_body, DEFAULT_MAX_XML_BODY);
        assert_eq!(config.canonical_query_order, QueryOrdering::Sorted);
    }

    #[test]
    fn test_should_build_with_typed_builder() {
        let config = GatewayConfig::builder()
            .base_domains(vec!["s3.local".to_owned()])
            .enforce_signatures(true)
            .build();
        assert_eq!(config.base_domains, vec!["s3.local"]);
        assert!(config.enforce_signatures);
        assert_eq!(config.gateway_listen, "0.0.0.0:8000");
        assert_eq!(config.verify_policy(), VerifyPolicy::default());
    }

    #[test]
    fn test_should_serialize_to_camel_case_json() {
        let config = GatewayConfig::default();
        let json = serde_json::to_string(&config).expect("test serialization");
        assert!(json.contains("gatewayListen"));
        assert!(json.contains("baseDomains"));
        assert!(json.contains("\"canonicalQueryOrder\":\"sorted\""));
    }

    #[test]
    fn test_should_parse_bool_values() {
        assert!(parse_bool("1"));
        assert!(parse_bool("True"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("yes"));
    }
}
