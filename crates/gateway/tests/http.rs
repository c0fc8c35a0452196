//! HTTP-level tests for the gateway router.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{net::SocketAddr, sync::Arc};

use {
    quill_config::QuillConfig,
    quill_gateway::{GatewayState, build_app},
    quill_graphql::Stores,
    serde_json::{Value, json},
    tokio::net::TcpListener,
};

/// Start a test server and also return its state for toggling flags.
async fn start_server_with_state(config: QuillConfig) -> (SocketAddr, Arc<GatewayState>) {
    let state = Arc::new(GatewayState::new(&config, Stores::seeded()).unwrap());
    let app = build_app(Arc::clone(&state));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    (addr, state)
}

async fn start_server(config: QuillConfig) -> SocketAddr {
    start_server_with_state(config).await.0
}

fn mocks_disabled() -> QuillConfig {
    let mut config = QuillConfig::default();
    config.mocks.enabled = false;
    config
}

async fn post_query(addr: SocketAddr, path: &str, query: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}{path}"))
        .json(&json!({ "query": query }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let addr = start_server(QuillConfig::default()).await;
    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn post_graphql_executes_queries() {
    let addr = start_server(QuillConfig::default()).await;
    let resp = post_query(
        addr,
        "/graphql",
        r#"{ searchUnion(text: "notice") { __typename ... on Notice { content noticeTime } } }"#,
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["data"]["searchUnion"],
        json!({"__typename": "Notice", "content": "这是 notice", "noticeTime": 1_524_710_641})
    );
}

#[tokio::test]
async fn get_graphql_and_graphiql_serve_the_ide() {
    let addr = start_server(QuillConfig::default()).await;
    for path in ["/graphql", "/graphiql", "/mock/graphiql"] {
        let resp = reqwest::get(format!("http://{addr}{path}")).await.unwrap();
        assert_eq!(resp.status(), 200, "{path}");
        let html = resp.text().await.unwrap();
        assert!(html.contains("graphiql"), "{path}");
    }
}

#[tokio::test]
async fn graphiql_can_be_turned_off() {
    let mut config = QuillConfig::default();
    config.graphql.graphiql = false;
    let addr = start_server(config).await;
    let resp = reqwest::get(format!("http://{addr}/graphiql")).await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn mock_schema_is_mounted_when_enabled() {
    let addr = start_server(QuillConfig::default()).await;
    let resp = post_query(addr, "/mock/graphql", "{ author(id: 5) { id name } }").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["author"]["id"], 5);

    let addr = start_server(mocks_disabled()).await;
    let resp = post_query(addr, "/mock/graphql", "{ anInt }").await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn disabled_graphql_returns_503() {
    let mut config = QuillConfig::default();
    config.graphql.enabled = false;
    let addr = start_server(config).await;

    let resp = post_query(addr, "/graphql", "{ posts { id } }").await;
    assert_eq!(resp.status(), 503);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "graphql server is disabled" }));

    let resp = reqwest::get(format!("http://{addr}/graphql")).await.unwrap();
    assert_eq!(resp.status(), 503);
}

#[tokio::test]
async fn graphql_can_be_toggled_at_runtime() {
    let (addr, state) = start_server_with_state(mocks_disabled()).await;
    state.set_graphql_enabled(false);
    let resp = post_query(addr, "/graphql", "{ posts { id } }").await;
    assert_eq!(resp.status(), 503);

    state.set_graphql_enabled(true);
    let resp = post_query(addr, "/graphql", "{ posts { id } }").await;
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn rejected_date_literal_comes_back_as_graphql_error() {
    let addr = start_server(mocks_disabled()).await;
    let resp = post_query(
        addr,
        "/graphql",
        r#"{ messagesBetween(from: "yesterday") { content } }"#,
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["errors"][0]["message"],
        "Invalid value for argument \"from\", expected type \"Date\""
    );
}
