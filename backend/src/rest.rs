//! REST surface for the store contract.
//!
//! Same operations a remote backend serves, over HTTP with JSON bodies.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use shared::{AddMoneyRequest, BuyTreeRequest, BuyTreeResponse, FootprintInputs};
use std::sync::Arc;
use tracing::info;

use crate::domain::{FootprintService, StoreError, TreeStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TreeStore>,
    pub footprint_service: FootprintService,
}

impl AppState {
    pub fn new(store: Arc<dyn TreeStore>, footprint_service: FootprintService) -> Self {
        Self {
            store,
            footprint_service,
        }
    }
}

/// Build the API router, nested under `/api`
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/trees/store", get(get_store_trees))
        .route("/trees/bought", get(get_bought_trees))
        .route("/trees/buy", post(buy_tree))
        .route("/wallet/add", post(add_money))
        .route("/profile", get(get_profile))
        .route("/footprint", get(get_footprint).post(calculate_footprint));

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Map a store error onto a status code; messages surface as-is
fn error_response(err: StoreError) -> Response {
    match err {
        StoreError::InvalidTreeType(_) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
        StoreError::InsufficientBalance { .. } => {
            (StatusCode::CONFLICT, err.to_string()).into_response()
        }
        StoreError::Persistence(_) => {
            tracing::error!("Persistence failure: {:?}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

/// Axum handler function for GET /api/trees/store
pub async fn get_store_trees(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/trees/store");

    match state.store.list_offers().await {
        Ok(offers) => (StatusCode::OK, Json(offers)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler function for GET /api/trees/bought
pub async fn get_bought_trees(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/trees/bought");

    match state.store.list_owned_trees().await {
        Ok(trees) => (StatusCode::OK, Json(trees)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler function for POST /api/trees/buy
pub async fn buy_tree(
    State(state): State<AppState>,
    Json(request): Json<BuyTreeRequest>,
) -> impl IntoResponse {
    info!("POST /api/trees/buy - type: {}", request.tree_type);

    match state.store.purchase(&request.tree_type).await {
        Ok(id) => (StatusCode::CREATED, Json(BuyTreeResponse { id })).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler function for POST /api/wallet/add
pub async fn add_money(
    State(state): State<AppState>,
    Json(request): Json<AddMoneyRequest>,
) -> impl IntoResponse {
    info!("POST /api/wallet/add - amount: {}", request.amount);

    match state.store.deposit(request.amount).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler function for GET /api/profile
pub async fn get_profile(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/profile");

    match state.store.profile().await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler function for GET /api/footprint
pub async fn get_footprint(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/footprint");

    match state.footprint_service.saved().await {
        Ok(Some(snapshot)) => (StatusCode::OK, Json(snapshot)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "No saved footprint").into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler function for POST /api/footprint
pub async fn calculate_footprint(
    State(state): State<AppState>,
    Json(inputs): Json<FootprintInputs>,
) -> impl IntoResponse {
    info!("POST /api/footprint");

    match state.footprint_service.calculate(&inputs).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(e),
    }
}
