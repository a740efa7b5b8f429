mod apps;

use std::env;

use tower_http::cors::CorsLayer;
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let port: u16 = env::var("HOME_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(7879);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server port!");

    info!("listening on {addr}");

    let app = apps::router().layer(CorsLayer::permissive());
    axum::serve(listener, app).await.expect("Server error!");
}
