use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// One request as the server saw it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub id: Uuid,
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Header names are lowercase, in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Echo {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Every echoed request, kept for the life of the server; nothing is evicted.
#[derive(Clone, Default)]
pub struct Captured {
    by_id: HashMap<Uuid, Echo>,
    order: Vec<Uuid>,
}

pub type Db = Arc<RwLock<Captured>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Captured::default()));
    Router::new()
        .route("/__captured", get(list_captured).delete(clear_captured))
        .route("/__captured/{id}", get(get_captured))
        .fallback(echo)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    State(db): State<Db>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Echo> {
    let echo = Echo {
        id: Uuid::new_v4(),
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect(),
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    tracing::info!(id = %echo.id, method = %echo.method, path = %echo.path, "echoed request");

    let mut captured = db.write().await;
    captured.order.push(echo.id);
    captured.by_id.insert(echo.id, echo.clone());
    Json(echo)
}

async fn list_captured(State(db): State<Db>) -> Json<Vec<Echo>> {
    let captured = db.read().await;
    Json(
        captured
            .order
            .iter()
            .filter_map(|id| captured.by_id.get(id).cloned())
            .collect(),
    )
}

async fn get_captured(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Echo>, StatusCode> {
    let captured = db.read().await;
    captured.by_id.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn clear_captured(State(db): State<Db>) -> StatusCode {
    let mut captured = db.write().await;
    captured.by_id.clear();
    captured.order.clear();
    StatusCode::NO_CONTENT
}
