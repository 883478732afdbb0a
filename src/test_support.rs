//! Helpers shared by the unit tests: a throwaway HTTP server standing in for
//! the dates page.

use axum::{http::StatusCode, response::Html, routing::get, Router};

use crate::config::DatesConfig;

/// Serve `body` with `status` at `/termine` on a random local port and
/// return the full URL.
pub async fn serve_page(status: StatusCode, body: &str) -> String {
    let body = body.to_string();
    let app = Router::new().route(
        "/termine",
        get(move || {
            let body = body.clone();
            async move { (status, Html(body)) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("test listener address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    format!("http://{}/termine", addr)
}

pub fn dates_config(url: &str) -> DatesConfig {
    DatesConfig {
        url: url.to_string(),
        timeout_secs: 5,
    }
}
