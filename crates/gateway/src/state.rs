//! Shared state behind every HTTP handler.

use std::sync::atomic::{AtomicBool, Ordering};

use {
    quill_config::QuillConfig,
    quill_graphql::{MockSchema, QuillSchema, SchemaOptions, Stores, build_mock_schema, build_schema},
};

pub struct GatewayState {
    pub version: String,
    pub schema: QuillSchema,
    /// Present only when `mocks.enabled` is set.
    pub mock_schema: Option<MockSchema>,
    pub graphiql: bool,
    graphql_enabled: AtomicBool,
}

impl GatewayState {
    /// Build both schemas from `config`, over the given stores.
    pub fn new(config: &QuillConfig, stores: Stores) -> anyhow::Result<Self> {
        let options = SchemaOptions {
            date_format: config.graphql.date_format,
        };
        let schema = build_schema(stores, options)?;
        let mock_schema = config
            .mocks
            .enabled
            .then(|| build_mock_schema(config.mocks.clone(), options));

        Ok(Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            schema,
            mock_schema,
            graphiql: config.graphql.graphiql,
            graphql_enabled: AtomicBool::new(config.graphql.enabled),
        })
    }

    pub fn is_graphql_enabled(&self) -> bool {
        self.graphql_enabled.load(Ordering::Relaxed)
    }

    pub fn set_graphql_enabled(&self, enabled: bool) {
        self.graphql_enabled.store(enabled, Ordering::Relaxed);
    }
}
