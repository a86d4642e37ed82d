use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{
    application::todo_service::TodoService,
    domain::{
        error::TodoError,
        page::{Page, PageRequest, DEFAULT_LIMIT, DEFAULT_PAGE},
        todo::{Todo, TodoId, TodoInput},
    },
    http::types::{ApiError, MessageBody},
};

pub const BASE_PATH: &str = "/api/todos";

#[derive(Clone)]
pub struct AppState<S: TodoService> { pub service: S }

pub fn router<S: TodoService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route(BASE_PATH, get(list_todos::<S>).post(create_todo::<S>))
        .route(&format!("{BASE_PATH}/"), get(list_todos::<S>).post(create_todo::<S>))
        .route(&format!("{BASE_PATH}/:id"), get(get_todo::<S>).put(update_todo::<S>).delete(delete_todo::<S>))
        .with_state(state)
}

/// Raw query strings so that non-numeric values fall back to defaults instead of rejecting.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    page: Option<String>,
    limit: Option<String>,
}

impl ListParams {
    pub fn to_request(&self) -> PageRequest {
        PageRequest::new(parse_positive(self.page.as_deref(), DEFAULT_PAGE), parse_positive(self.limit.as_deref(), DEFAULT_LIMIT))
    }
}

/// Reads the leading run of digits (after an optional `+`), so `"2.5"` and `"2abc"` both
/// mean 2. Anything without leading digits, or that reads as zero, gets `default`.
fn parse_positive(raw: Option<&str>, default: u32) -> u32 {
    raw.map(|s| {
        let s = s.trim_start();
        let s = s.strip_prefix('+').unwrap_or(s);
        let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        &s[..end]
    })
    .filter(|digits| !digits.is_empty())
    .map(|digits| digits.parse::<u32>().unwrap_or(u32::MAX))
    .filter(|n| *n > 0)
    .unwrap_or(default)
}

async fn create_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let input = body(payload).map_err(|e| ApiError::from_service(e, "creating todo"))?;
    let todo = state.service.create(input).await.map_err(|e| ApiError::from_service(e, "creating todo"))?;
    tracing::debug!(id = %todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn list_todos<S: TodoService>(
    State(state): State<AppState<S>>,
    params: Option<Query<ListParams>>,
) -> Result<Json<Page<Todo>>, ApiError> {
    let request = params.map(|Query(p)| p.to_request()).unwrap_or_default();
    let page = state.service.list(request).await.map_err(|e| ApiError::from_service(e, "fetching todos"))?;
    Ok(Json(page))
}

async fn get_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    let todo = state.service.get(id).await.map_err(|e| ApiError::from_service(e, "fetching todo"))?;
    Ok(Json(todo))
}

async fn update_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    let input = body(payload).map_err(|e| ApiError::from_service(e, "updating todo"))?;
    let todo = state.service.update(id, input).await.map_err(|e| ApiError::from_service(e, "updating todo"))?;
    Ok(Json(todo))
}

async fn delete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<MessageBody>, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete(id).await.map_err(|e| ApiError::from_service(e, "deleting todo"))?;
    Ok(Json(MessageBody::new("Todo deleted successfully")))
}

/// An id that cannot name a stored record is simply absent.
fn parse_id(s: &str) -> Result<TodoId, ApiError> { s.parse().map_err(|_| ApiError::not_found()) }

fn body(payload: Result<Json<TodoInput>, JsonRejection>) -> Result<TodoInput, TodoError> {
    payload.map(|Json(input)| input).map_err(|rejection| TodoError::Validation(rejection.body_text()))
}
