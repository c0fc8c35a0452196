//! HTTP endpoints for the Quill and mock schemas.
//!
//! GET on an endpoint serves GraphiQL, POST executes the request. Both
//! answer 503 while GraphQL is switched off.

use {
    async_graphql::http::GraphiQLSource,
    async_graphql_axum::{GraphQLRequest, GraphQLResponse},
    axum::{
        Json,
        extract::State,
        http::StatusCode,
        response::{Html, IntoResponse, Response},
    },
};

use crate::{server::AppState, state::GatewayState};

pub const GRAPHQL_PATH: &str = "/graphql";
pub const MOCK_GRAPHQL_PATH: &str = "/mock/graphql";

type Reply = Result<Response, Response>;

/// The gateway state, or the 503 reply when GraphQL is off.
fn enabled(state: &AppState) -> Result<&GatewayState, Response> {
    if state.gateway.is_graphql_enabled() {
        Ok(state.gateway.as_ref())
    } else {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": "graphql server is disabled" })),
        )
            .into_response())
    }
}

fn ide(endpoint: &str) -> Response {
    Html(GraphiQLSource::build().endpoint(endpoint).finish()).into_response()
}

/// GET `/graphql` and `/graphiql`.
pub async fn graphiql_handler(State(state): State<AppState>) -> Reply {
    let gateway = enabled(&state)?;
    if !gateway.graphiql {
        return Err(StatusCode::NOT_FOUND.into_response());
    }
    Ok(ide(GRAPHQL_PATH))
}

/// POST `/graphql`.
pub async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> Reply {
    let gateway = enabled(&state)?;
    let response = gateway.schema.execute(req.into_inner()).await;
    Ok(GraphQLResponse::from(response).into_response())
}

pub async fn mock_graphiql_handler(State(state): State<AppState>) -> Reply {
    let gateway = enabled(&state)?;
    if !gateway.graphiql || gateway.mock_schema.is_none() {
        return Err(StatusCode::NOT_FOUND.into_response());
    }
    Ok(ide(MOCK_GRAPHQL_PATH))
}

pub async fn mock_graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> Reply {
    let gateway = enabled(&state)?;
    let schema = gateway
        .mock_schema
        .as_ref()
        .ok_or_else(|| StatusCode::NOT_FOUND.into_response())?;
    Ok(GraphQLResponse::from(schema.execute(req.into_inner()).await).into_response())
}
