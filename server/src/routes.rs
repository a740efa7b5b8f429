use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;
use uuid::Uuid;

use crate::{
    database,
    error::AppError,
    extract::{AppJson, AppPath},
    images,
    lottery::{self, CreateLottery, DrawOptions, Lottery, NewParticipant, UpdateLottery},
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/lotteries", get(list_lotteries).post(create_lottery))
        .route("/lotteries/current", get(current_lottery))
        .route(
            "/lotteries/{id}",
            get(get_lottery)
                .patch(update_lottery)
                .delete(delete_lottery),
        )
        .route("/lotteries/{id}/participants", post(register_participant))
        .route("/lotteries/{id}/draw", post(draw_lottery))
        // Older clients call the draw through its "generate and save" name;
        // same body, same semantics.
        .route("/lotteries/{id}/generateAndSave", post(draw_lottery))
        // Raise the transport body cap above the configured image limit so
        // the handler's own size check is reachable; axum's stock 2 MB
        // default would reject valid uploads first.
        .route(
            "/images/upload",
            post(images::upload_image).layer(DefaultBodyLimit::max(images::body_limit(
                state.config.max_upload_bytes,
            ))),
        )
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    "lottery API is running"
}

async fn list_lotteries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Lottery>>, AppError> {
    let mut conn = state.redis.clone();
    let lotteries = database::fetch_all(&mut conn).await?;

    Ok(Json(lottery::newest_first(lotteries)))
}

async fn current_lottery(State(state): State<Arc<AppState>>) -> Result<Json<Lottery>, AppError> {
    let mut conn = state.redis.clone();
    let lotteries = database::fetch_all(&mut conn).await?;

    let current = lottery::current(lotteries).ok_or(AppError::NotFound)?;
    Ok(Json(current))
}

async fn get_lottery(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Lottery>, AppError> {
    let mut conn = state.redis.clone();
    let lottery = database::fetch(&mut conn, id).await?;

    Ok(Json(lottery))
}

async fn create_lottery(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<CreateLottery>,
) -> Result<impl IntoResponse, AppError> {
    let lottery = Lottery::create(body, Utc::now())?;

    let mut conn = state.redis.clone();
    database::save(&mut conn, &lottery).await?;

    info!("created lottery {} ({})", lottery.id, lottery.title);
    Ok((StatusCode::CREATED, Json(lottery)))
}

async fn update_lottery(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<UpdateLottery>,
) -> Result<Json<Lottery>, AppError> {
    let lock = state.lock_for(id);
    let _guard = lock.lock().await;

    let mut conn = state.redis.clone();
    let mut lottery = database::fetch(&mut conn, id).await?;
    lottery.apply_update(body, Utc::now())?;
    database::save(&mut conn, &lottery).await?;

    Ok(Json(lottery))
}

async fn register_participant(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<NewParticipant>,
) -> Result<impl IntoResponse, AppError> {
    let lock = state.lock_for(id);
    let _guard = lock.lock().await;

    let mut conn = state.redis.clone();
    let mut lottery = database::fetch(&mut conn, id).await?;
    lottery.register(body, Utc::now())?;
    database::save(&mut conn, &lottery).await?;

    Ok((StatusCode::CREATED, Json(lottery)))
}

async fn draw_lottery(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<DrawOptions>,
) -> Result<Json<Lottery>, AppError> {
    let lock = state.lock_for(id);
    let _guard = lock.lock().await;

    let mut conn = state.redis.clone();
    let mut lottery = database::fetch(&mut conn, id).await?;
    lottery.execute_draw(body, &mut rand::thread_rng(), Utc::now())?;
    database::save(&mut conn, &lottery).await?;

    info!(
        "drew lottery {}: result {:?}, winner {:?}",
        lottery.id, lottery.result, lottery.winner
    );
    Ok(Json(lottery))
}

async fn delete_lottery(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let lock = state.lock_for(id);

    {
        let _guard = lock.lock().await;
        let mut conn = state.redis.clone();
        database::remove(&mut conn, id).await?;
    }
    state.forget_lock(id);

    Ok(Json(json!({ "message": "lottery deleted" })))
}
