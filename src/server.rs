//! HTTP API over the knowledge store.
//!
//! Thin JSON boundary: each route runs exactly one store operation and
//! translates error kinds into status codes. The store sits behind a mutex
//! because a SQLite connection can only be used from one thread at a time,
//! and every store call runs on the blocking pool since SQLite may wait on
//! a file lock held by another process.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::knowledge::storage::parse_item_id;
use crate::knowledge::{CreateItemRequest, KnowledgeError, KnowledgeStore};

/// Server state shared across requests.
#[derive(Clone)]
pub struct ApiState {
    store: Arc<Mutex<KnowledgeStore>>,
}

impl ApiState {
    pub fn new(store: KnowledgeStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `op` with exclusive access to the store, off the async worker threads
    async fn with_store<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&KnowledgeStore) -> Result<T, KnowledgeError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let store = store.lock().map_err(|_| ApiError::Poisoned)?;
            op(&store).map_err(ApiError::Knowledge)
        })
        .await
        .map_err(|e| ApiError::TaskFailed(e.to_string()))?
    }
}

/// Errors returned to HTTP clients as `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
    Knowledge(KnowledgeError),
    BadRequest(String),
    Poisoned,
    TaskFailed(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Knowledge(KnowledgeError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ApiError::Knowledge(err @ KnowledgeError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            ApiError::Knowledge(err @ KnowledgeError::Conflict(_)) => {
                (StatusCode::CONFLICT, err.to_string())
            }
            ApiError::Knowledge(err) => {
                log::error!("Knowledge store failure: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Poisoned => {
                log::error!("Knowledge store lock poisoned");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "knowledge store unavailable".to_string(),
                )
            }
            ApiError::TaskFailed(reason) => {
                log::error!("Knowledge store task failed: {}", reason);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "knowledge store unavailable".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult = Result<Response, ApiError>;

/// Build the API router
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/init", get(init_storage))
        .route("/api/knowledge", get(list_items).post(create_item))
        .route("/api/knowledge/{id}", patch(review_item).delete(delete_item))
        .route("/api/review", get(list_due_items))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn init_storage(State(state): State<ApiState>) -> ApiResult {
    state.with_store(|store| store.init()).await?;
    Ok(Json(json!({ "message": "storage initialized" })).into_response())
}

async fn list_items(State(state): State<ApiState>) -> ApiResult {
    let items = state.with_store(|store| store.list_all()).await?;
    Ok(Json(json!({ "items": items })).into_response())
}

async fn list_due_items(State(state): State<ApiState>) -> ApiResult {
    let items = state.with_store(|store| store.list_due_today()).await?;
    Ok(Json(json!({ "items": items })).into_response())
}

async fn create_item(
    State(state): State<ApiState>,
    body: Result<Json<CreateItemRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let title = request
        .title
        .ok_or_else(|| ApiError::BadRequest("title is required".to_string()))?;

    let item = state
        .with_store(move |store| store.add(&title))
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "item": item }))).into_response())
}

async fn review_item(State(state): State<ApiState>, Path(id): Path<String>) -> ApiResult {
    let id = parse_item_id(&id).map_err(ApiError::Knowledge)?;
    let item = state
        .with_store(move |store| store.mark_reviewed(id))
        .await?;
    Ok(Json(json!({ "item": item })).into_response())
}

async fn delete_item(State(state): State<ApiState>, Path(id): Path<String>) -> ApiResult {
    let id = parse_item_id(&id).map_err(ApiError::Knowledge)?;
    state
        .with_store(move |store| store.delete(id))
        .await?;
    Ok(Json(json!({ "success": true })).into_response())
}

/// Serve the API on `addr` until Ctrl-C is received.
pub async fn serve(store: KnowledgeStore, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(ApiState::new(store));
    let listener = TcpListener::bind(addr).await?;

    log::info!("Knowledge API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("Knowledge API shutting down");
        })
        .await
}
