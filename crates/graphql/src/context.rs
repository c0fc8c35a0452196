//! Data injected into every resolver.

use std::sync::Arc;

use {async_graphql::Context, quill_config::DateFormat};

use crate::store::Stores;

/// Context injected into every GraphQL resolver via `Context::data()`.
pub struct GqlContext {
    pub stores: Stores,

    /// Wire format for every `Date` the schema writes.
    pub date_format: DateFormat,
}

impl GqlContext {
    pub fn new(stores: Stores, date_format: DateFormat) -> Self {
        Self {
            stores,
            date_format,
        }
    }

    pub fn from_ctx<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Arc<Self>> {
        ctx.data::<Arc<Self>>()
    }
}
