//! # Lottery Server
//!
//! Backend for the raffle/lottery management application: organizers create
//! drawing events, participants register, and a one-time draw picks a
//! winning number and winner.
//!
//! Lottery documents live as JSON in Redis; every state transition is a pure
//! function in [`lottery`] and the actual number/winner selection sits in
//! [`engine`], so the HTTP layer stays a thin fetch-mutate-save wrapper.

use tracing::info;

pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod extract;
pub mod images;
pub mod lottery;
pub mod routes;
pub mod state;

pub async fn start_server() {
    let state = state::AppState::new().await;

    let addr = format!("0.0.0.0:{}", state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server port!");

    info!("listening on {addr}");

    axum::serve(listener, routes::router(state))
        .await
        .expect("Server error!");
}
