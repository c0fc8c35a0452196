//! Schema construction and type aliases.

use std::sync::Arc;

use {
    async_graphql::{EmptySubscription, Schema},
    quill_config::{DateFormat, MocksConfig},
    tracing::debug,
};

use crate::{
    context::GqlContext,
    error::SchemaError,
    literal_guard::{DateLiteralGuard, ScalarPositions},
    mock::{MockMutation, MockQuery, Mocker},
    mutations::MutationRoot,
    queries::QueryRoot,
    scalars::DATE_SCALAR,
    store::Stores,
};

/// The authors/posts/messages schema.
pub type QuillSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// The generated-data schema.
pub type MockSchema = Schema<MockQuery, MockMutation, EmptySubscription>;

#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaOptions {
    pub date_format: DateFormat,
}

/// Build the schema over `stores`.
///
/// Inline `Date` literals are checked by a [`DateLiteralGuard`] indexed from
/// the schema's own SDL.
pub fn build_schema(stores: Stores, options: SchemaOptions) -> Result<QuillSchema, SchemaError> {
    let sdl = Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .finish()
        .sdl();
    let positions = ScalarPositions::from_sdl(&sdl, DATE_SCALAR)?;
    debug!(date_inputs = positions.len(), "indexed Date input positions");

    let ctx = Arc::new(GqlContext::new(stores, options.date_format));
    Ok(Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(ctx)
        .extension(DateLiteralGuard::new(positions))
        .finish())
}

pub fn build_mock_schema(config: MocksConfig, options: SchemaOptions) -> MockSchema {
    let mocker = Arc::new(Mocker::new(config).with_date_format(options.date_format));
    Schema::build(MockQuery, MockMutation, EmptySubscription)
        .data(mocker)
        .finish()
}
