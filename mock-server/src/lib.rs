use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub name: String,
    pub text: String,
}

#[derive(Deserialize)]
pub struct CreateComment {
    pub name: String,
    pub text: String,
}

#[derive(Deserialize)]
pub struct UpdateComment {
    pub name: Option<String>,
    pub text: Option<String>,
}

/// Success body: every response carries a `comments` list.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentsBody {
    pub comments: Vec<Comment>,
}

/// Error body: `{"errors": {"message": "..."}}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub errors: ErrorMessage,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

/// Server behaviour switches.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// When set, requests whose `Authorization` header differs get 401.
    pub authorization: Option<String>,
    /// Comment ids that reject updates with 403.
    pub locked: BTreeSet<i64>,
}

#[derive(Default)]
struct Store {
    last_id: i64,
    comments: BTreeMap<i64, Comment>,
}

#[derive(Clone)]
pub struct AppState {
    db: Arc<RwLock<Store>>,
    options: Arc<Options>,
}

struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            errors: ErrorMessage {
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    app_with(Options::default())
}

pub fn app_with(options: Options) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        options: Arc::new(options),
    };
    Router::new()
        .route("/comments", get(list_comments))
        .route("/comment", post(create_comment))
        .route("/comment/{id}", put(update_comment))
        .with_state(state)
}

pub async fn run(listener: TcpListener, options: Options) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(options)).await
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiFailure> {
    let Some(expected) = state.options.authorization.as_deref() else {
        return Ok(());
    };
    let given = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if given == expected {
        Ok(())
    } else {
        Err(ApiFailure::new(StatusCode::UNAUTHORIZED, "invalid authorization"))
    }
}

async fn list_comments(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CommentsBody>, ApiFailure> {
    authorize(&state, &headers)?;
    let store = state.db.read().await;
    Ok(Json(CommentsBody {
        comments: store.comments.values().cloned().collect(),
    }))
}

async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreateComment>,
) -> Result<(StatusCode, Json<CommentsBody>), ApiFailure> {
    authorize(&state, &headers)?;
    let mut store = state.db.write().await;
    store.last_id += 1;
    let comment = Comment {
        id: store.last_id,
        name: input.name,
        text: input.text,
    };
    store.comments.insert(comment.id, comment.clone());
    debug!(id = comment.id, "comment created");
    Ok((
        StatusCode::CREATED,
        Json(CommentsBody {
            comments: vec![comment],
        }),
    ))
}

async fn update_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<UpdateComment>,
) -> Result<Json<CommentsBody>, ApiFailure> {
    authorize(&state, &headers)?;
    if state.options.locked.contains(&id) {
        return Err(ApiFailure::new(
            StatusCode::FORBIDDEN,
            format!("comment {id} is locked"),
        ));
    }
    let mut store = state.db.write().await;
    let comment = store
        .comments
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, format!("comment {id} not found")))?;
    if let Some(name) = input.name {
        comment.name = name;
    }
    if let Some(text) = input.text {
        comment.text = text;
    }
    debug!(id, "comment updated");
    Ok(Json(CommentsBody {
        comments: vec![comment.clone()],
    }))
}
