use std::{net::SocketAddr, sync::Arc};

use {
    axum::{
        Router,
        extract::State,
        response::{IntoResponse, Json},
        routing::get,
    },
    quill_config::QuillConfig,
    quill_graphql::Stores,
    tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    },
    tracing::info,
};

use crate::{
    graphql_routes::{
        GRAPHQL_PATH, MOCK_GRAPHQL_PATH, graphiql_handler, graphql_handler, mock_graphiql_handler,
        mock_graphql_handler,
    },
    state::GatewayState,
};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<GatewayState>,
}

/// Build the router (shared between production startup and tests).
pub fn build_app(state: Arc<GatewayState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route(GRAPHQL_PATH, get(graphiql_handler).post(graphql_handler))
        .route("/graphiql", get(graphiql_handler));

    if state.mock_schema.is_some() {
        router = router
            .route(
                MOCK_GRAPHQL_PATH,
                get(mock_graphiql_handler).post(mock_graphql_handler),
            )
            .route("/mock/graphiql", get(mock_graphiql_handler));
    }

    router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { gateway: state })
}

/// Start the HTTP server over the sample data and serve until shutdown.
pub async fn start_server(config: &QuillConfig) -> anyhow::Result<()> {
    let state = Arc::new(GatewayState::new(config, Stores::seeded())?);
    let mocks = state.mock_schema.is_some();
    let app = build_app(state);

    let bind = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    let addr = listener.local_addr()?;
    info!(%addr, mocks, date_format = ?config.graphql.date_format, "quill listening");
    info!("Go to http://{addr}/graphiql to run queries!");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}

async fn health_handler(State(AppState { gateway }): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": gateway.version,
        "graphql": gateway.is_graphql_enabled(),
    }))
}
