//! Static directory of sibling applications.
//!
//! The home page only needs a read-only list of links, so the table is
//! compiled in rather than stored anywhere.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Serialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct AppEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub url: &'static str,
    pub color: &'static str,
    pub is_active: bool,
}

const APPS: &[AppEntry] = &[
    AppEntry {
        id: "lottery",
        title: "Lottery",
        description: "Create and manage online raffles with custom draw ranges and exclusions.",
        icon: "🎯",
        url: "https://lottery.toolmist.com",
        color: "#ff8303",
        is_active: true,
    },
    AppEntry {
        id: "gold",
        title: "Gold Tracker",
        description: "Gold price tracking and trading simulation with historical analysis.",
        icon: "💰",
        url: "https://gold.toolmist.com",
        color: "#ffc107",
        is_active: false,
    },
];

pub fn filter_apps(active_only: bool) -> Vec<AppEntry> {
    APPS.iter()
        .filter(|app| !active_only || app.is_active)
        .copied()
        .collect()
}

pub fn find_app(id: &str) -> Option<AppEntry> {
    APPS.iter().find(|app| app.id == id).copied()
}

#[derive(Deserialize)]
pub struct ListQuery {
    active: Option<bool>,
}

pub fn router() -> Router {
    Router::new()
        .route("/apps", get(list_apps))
        .route("/apps/{id}", get(get_app))
}

async fn list_apps(Query(query): Query<ListQuery>) -> impl IntoResponse {
    let apps = filter_apps(query.active.unwrap_or(false));

    Json(json!({ "success": true, "data": apps }))
}

async fn get_app(Path(id): Path<String>) -> impl IntoResponse {
    match find_app(&id) {
        Some(app) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": app })),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "error": "app not found" })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_filter_drops_inactive_apps() {
        let all = filter_apps(false);
        let active = filter_apps(true);

        assert!(active.len() < all.len());
        assert!(active.iter().all(|app| app.is_active));
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(find_app("lottery").unwrap().id, "lottery");
        assert!(find_app("nonexistent").is_none());
    }
}
