/// Config schema types (server, graphql endpoint, mock data generation).
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuillConfig {
    pub server: ServerConfig,
    pub graphql: GraphqlConfig,
    pub mocks: MocksConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "127.0.0.1".
    pub bind: String,
    /// Port to listen on. Defaults to 3000.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

/// Wire encoding of the `Date` scalar in responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// Milliseconds since the Unix epoch, as a GraphQL `Int`-shaped number.
    #[default]
    EpochMillis,
    /// RFC 3339 / ISO-8601 string with millisecond precision, always UTC.
    Iso8601,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphqlConfig {
    /// Whether `/graphql` executes queries. When off the endpoint answers 503.
    pub enabled: bool,
    /// Serve the GraphiQL editor on `GET /graphql` and `GET /graphiql`.
    pub graphiql: bool,
    pub date_format: DateFormat,
}

impl Default for GraphqlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            graphiql: true,
            date_format: DateFormat::default(),
        }
    }
}

/// Random data generation for the mock schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MocksConfig {
    /// Mount `/mock/graphql` and `/mock/graphiql`.
    pub enabled: bool,
    /// Fixed RNG seed. Unset means a fresh seed from the OS per process.
    pub seed: Option<u64>,
    pub int_min: i32,
    pub int_max: i32,
    pub float_min: f64,
    pub float_max: f64,
    /// Bounds for generated list lengths (inclusive).
    pub list_min: usize,
    pub list_max: usize,
}

impl Default for MocksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: None,
            int_min: 100,
            int_max: 99_999,
            float_min: 100.0,
            float_max: 99_999.0,
            list_min: 6,
            list_max: 12,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: QuillConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, QuillConfig::default());
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.graphql.date_format, DateFormat::EpochMillis);
        assert_eq!((cfg.mocks.list_min, cfg.mocks.list_max), (6, 12));
    }

    #[test]
    fn date_format_uses_snake_case_names() {
        let cfg: QuillConfig = toml::from_str(
            r#"
            [graphql]
            date_format = "iso8601"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.graphql.date_format, DateFormat::Iso8601);

        let json = serde_json::to_value(DateFormat::EpochMillis).unwrap();
        assert_eq!(json, "epoch_millis");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg: QuillConfig = toml::from_str(
            r#"
            [mocks]
            seed = 7
            list_max = 8
            "#,
        )
        .unwrap();
        assert_eq!(cfg.mocks.seed, Some(7));
        assert_eq!(cfg.mocks.list_max, 8);
        assert_eq!(cfg.mocks.list_min, 6);
        assert!(cfg.mocks.enabled);
    }
}
