//! Gateway: the HTTP surface in front of the Quill schemas.
//!
//! Routes: `/health`, `/graphql` (GraphiQL on GET, execution on POST),
//! `/graphiql`, and the mock schema under `/mock/graphql` and
//! `/mock/graphiql` when mocks are enabled.

pub mod graphql_routes;
pub mod server;
pub mod state;

pub use {
    server::{AppState, build_app, start_server},
    state::GatewayState,
};
