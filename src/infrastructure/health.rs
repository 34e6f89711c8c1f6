use axum::{http::StatusCode, routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Liveness endpoint for the hosting platform: every GET answers `200 OK`.
pub fn router() -> Router {
    Router::new()
        .route("/", get(ok))
        .route("/*path", get(ok))
}

async fn ok() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

pub async fn serve(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("Health check listening on http://{}", addr);
    axum::serve(listener, router()).await
}
