//! Server Example
//!
//! An axum service with body logging on both sides: the requests it
//! receives and the responses it writes, plus the calls it makes to a
//! downstream service through a reqwest client.
//!
//! Run the downstream stub first, then the server:
//!   cargo run -p bodylog-demos --example downstream
//!   cargo run -p bodylog-demos --example server
//!
//! Try it:
//!   curl -v -d '{"a":"eugene"}' http://localhost:8080/
//!
//! Expected log lines (component `demo`):
//!   Incoming HTTP(s) request: POST http://localhost:8080/. Body: {"a":"eugene"}
//!   External HTTP(s) request: GET http://localhost:5008/hello. Body: <empty>
//!   External HTTP(s) response from http://localhost:5008/hello: 200, body: hello
//!   External HTTP(s) request: POST http://localhost:5008/send. Body: {"a":"eugene"}
//!   External HTTP(s) response from http://localhost:5008/send: 200, body: eugene
//!   Outgoing HTTP(s) request: 200. Body: hello eugene

use axum::http::StatusCode;
use axum::{Router, error_handling::HandleErrorLayer, extract::State, routing::post};
use bodylog::{BodyLogConfig, BodyLogger};
use bodylog_reqwest::OutboundLogMiddleware;
use bodylog_tower::InboundLog;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::Serialize;
use tower::{BoxError, ServiceBuilder};

const DOWNSTREAM: &str = "http://localhost:5008";

const CONFIG: &str = r#"
component: demo
empty_body: "<empty>"
"#;

#[derive(Debug, Serialize)]
struct Greeting {
    a: String,
}

// Handlers

async fn handle(
    State(client): State<ClientWithMiddleware>,
    input: String,
) -> Result<String, (StatusCode, String)> {
    tracing::info!("handler call");
    tracing::info!("{input}");

    call_downstream(&client)
        .await
        .map_err(|err| (StatusCode::BAD_GATEWAY, err.to_string()))
}

async fn call_downstream(
    client: &ClientWithMiddleware,
) -> Result<String, reqwest_middleware::Error> {
    let hello = client
        .get(format!("{DOWNSTREAM}/hello"))
        .send()
        .await?
        .text()
        .await?;

    let sent = client
        .post(format!("{DOWNSTREAM}/send"))
        .json(&Greeting {
            a: "eugene".to_string(),
        })
        .send()
        .await?
        .text()
        .await?;

    Ok(format!("{hello} {sent}"))
}

async fn handle_error(err: BoxError) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}

// Main

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = BodyLogConfig::from_yaml(CONFIG)?;
    let logger = BodyLogger::new(&config);

    let client = ClientBuilder::new(reqwest::Client::new())
        .with(OutboundLogMiddleware::builder().logger(logger.clone()).build())
        .build();

    let app = Router::new()
        .route("/", post(handle))
        .with_state(client)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_error))
                .layer(InboundLog::builder().logger(logger).build()),
        );

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
