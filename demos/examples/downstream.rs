//! Downstream stub for the server example.
//!
//! Run:
//!   cargo run -p bodylog-demos --example downstream
//!
//! Endpoints:
//!   - GET  http://localhost:5008/hello - Answers `hello`
//!   - POST http://localhost:5008/send  - Echoes the `a` field of a JSON body

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Greeting {
    a: String,
}

async fn hello() -> &'static str {
    "hello"
}

async fn send(Json(greeting): Json<Greeting>) -> String {
    tracing::info!("Received greeting for {}", greeting.a);
    greeting.a
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let app = Router::new()
        .route("/hello", get(hello))
        .route("/send", post(send));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:5008").await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
