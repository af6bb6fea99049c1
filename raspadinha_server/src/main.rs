use axum::http::StatusCode;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::TypedHeader;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use raspadinha_core::{play_with_seeds, GameCatalog, Segment};
use raspadinha_shared::{AdminSetCatalogRequest, ApiError, RoundRequest, RoundResponse, VerifyResponse};

mod config;
mod error;
mod store;

use crate::config::ServerConfig;
use crate::error::AppResult;

const MAX_CLIENT_SEED_LEN: usize = 128;

struct AppState {
    db: SqlitePool,
    api_key: String,
    catalog: RwLock<GameCatalog>,
}

async fn route_verify(State(state): State<Arc<AppState>>) -> AppResult<Json<VerifyResponse>> {
    let p = store::get_params(&state.db).await?;
    Ok(Json(VerifyResponse {
        server_seed_hash: p.server_seed_hash,
    }))
}

async fn route_round(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RoundRequest>,
) -> AppResult<Json<RoundResponse>> {
    if req.client_seed.is_empty() || req.client_seed.len() > MAX_CLIENT_SEED_LEN {
        return Err(ApiError::Invalid(format!(
            "client_seed must be 1..={MAX_CLIENT_SEED_LEN} bytes"
        ))
        .into());
    }
    let segment = Segment::from_user_type(req.user_type.as_deref());
    let (setup, catalog_version) = {
        let catalog = state.catalog.read().await;
        (catalog.select(segment).clone(), catalog.version)
    };

    let p = store::next_round_params(&state.db).await?;
    let round = play_with_seeds(&p.server_seed, &req.client_seed, p.nonce as u64, &setup)?;
    store::record_round(&state.db, &p, &req.client_seed, segment, catalog_version, &round).await?;
    info!(
        nonce = p.nonce,
        segment = segment.as_str(),
        is_win = round.outcome.is_win(),
        prize = round.outcome.prize_value(),
        "round played"
    );

    Ok(Json(RoundResponse {
        server_seed_hash: p.server_seed_hash,
        nonce: p.nonce as u64,
        segment: segment.as_str().to_string(),
        catalog_version,
        is_win: round.outcome.is_win(),
        prize_value: round.outcome.prize_value(),
        grid: round.grid.labels(),
    }))
}

async fn route_admin_set_catalog(
    State(state): State<Arc<AppState>>,
    TypedHeader(axum_extra::headers::Authorization(bearer)): TypedHeader<
        axum_extra::headers::Authorization<axum_extra::headers::authorization::Bearer>,
    >,
    Json(req): Json<AdminSetCatalogRequest>,
) -> AppResult<StatusCode> {
    if bearer.token() != state.api_key {
        return Err(ApiError::Unauthorized.into());
    }
    req.catalog.validate()?;
    store::set_catalog(&state.db, &req.catalog).await?;
    let version = req.catalog.version;
    *state.catalog.write().await = req.catalog;
    info!(version, "game catalog replaced");
    Ok(StatusCode::NO_CONTENT)
}

async fn healthz() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cfg = ServerConfig::from_env();
    let override_catalog = match &cfg.game_config {
        Some(path) => {
            info!(path = %path.display(), "loading game catalog");
            Some(GameCatalog::load(path)?)
        }
        None => None,
    };

    let db = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&cfg.database_url)
        .await?;
    let catalog = store::init_db(&db, override_catalog).await?;

    let state = Arc::new(AppState {
        db,
        api_key: cfg.api_key,
        catalog: RwLock::new(catalog),
    });

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/verify", get(route_verify))
        .route("/round", post(route_round))
        .route("/admin/set-catalog", post(route_admin_set_catalog))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let listener = tokio::net::TcpListener::bind(&cfg.bind).await?;
    info!("listening on {}", cfg.bind);
    axum::serve(listener, app).await?;
    Ok(())
}
