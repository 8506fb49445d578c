use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
    sync::Arc,
};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, options, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct AppState {
    users: Arc<RwLock<HashMap<u64, User>>>,
    next_user_id: Arc<AtomicU64>,
    flaky_hits: Arc<RwLock<HashMap<String, u32>>>,
}

pub fn app() -> Router {
    let state = AppState {
        users: Arc::new(RwLock::new(HashMap::new())),
        next_user_id: Arc::new(AtomicU64::new(1)),
        flaky_hits: Arc::new(RwLock::new(HashMap::new())),
    };
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).patch(update_user).delete(delete_user),
        )
        .route("/auth/login", post(login))
        .route("/flaky/{key}", get(flaky))
        .route("/slow", get(slow))
        .route("/echo-headers", get(echo_headers))
        .route("/upload", post(upload))
        .route("/error/{kind}", get(canned_error))
        .route("/allowed", options(allowed))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    info!(addr = %listener.local_addr()?, "mock api listening");
    axum::serve(listener, app()).await
}

async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    let users = state.users.read().await;
    let mut all: Vec<User> = users.values().cloned().collect();
    all.sort_by_key(|user| user.id);
    Json(all)
}

async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> (StatusCode, Json<User>) {
    let id = state.next_user_id.fetch_add(1, Ordering::SeqCst);
    let user = User {
        id,
        name: input.name,
        email: input.email,
    };
    state.users.write().await.insert(id, user.clone());
    (StatusCode::CREATED, Json(user))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<User>, StatusCode> {
    let users = state.users.read().await;
    users.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<User>, StatusCode> {
    let mut users = state.users.write().await;
    let user = users.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        user.name = name;
    }
    if let Some(email) = input.email {
        user.email = email;
    }
    Ok(Json(user.clone()))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    let mut users = state.users.write().await;
    users
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn login(Json(input): Json<Credentials>) -> (StatusCode, Json<Value>) {
    if input.password.is_empty() || input.password == "wrong" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"code": "UNAUTHORIZED", "message": "Invalid credentials"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"token": format!("tok-{}", input.email)})),
    )
}

#[derive(Deserialize)]
struct FlakyParams {
    #[serde(default)]
    fail: u32,
}

// Fails the first `fail` requests per key with a 500, then succeeds. Counters
// live for the lifetime of one app(), so tests pick fresh keys.
async fn flaky(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<FlakyParams>,
) -> (StatusCode, Json<Value>) {
    let mut hits = state.flaky_hits.write().await;
    let count = hits.entry(key).or_insert(0);
    *count += 1;
    if *count <= params.fail {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"code": "UNKNOWN_ERROR", "message": format!("induced failure {count}")})),
        )
    } else {
        (StatusCode::OK, Json(json!({"attempts": *count})))
    }
}

#[derive(Deserialize)]
struct SlowParams {
    #[serde(default = "default_delay_ms")]
    delay_ms: u64,
}

fn default_delay_ms() -> u64 {
    1000
}

async fn slow(Query(params): Query<SlowParams>) -> Json<Value> {
    tokio::time::sleep(std::time::Duration::from_millis(params.delay_ms)).await;
    Json(json!({"delayedMs": params.delay_ms}))
}

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    let mut map = serde_json::Map::new();
    for (name, value) in &headers {
        map.insert(
            name.as_str().to_string(),
            Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
        );
    }
    Json(Value::Object(map))
}

async fn upload(mut multipart: Multipart) -> Result<Json<Value>, StatusCode> {
    let mut parts = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        parts.push(json!({
            "name": name,
            "filename": filename,
            "contentType": content_type,
            "size": data.len(),
        }));
    }
    Ok(Json(json!({"multipart": true, "parts": parts})))
}

async fn canned_error(Path(kind): Path<String>) -> (StatusCode, Json<Value>) {
    match kind.as_str() {
        "validation" => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"code": "VALIDATION_ERROR", "message": "email is required"})),
        ),
        "unauthorized" => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"code": "UNAUTHORIZED", "message": "token expired"})),
        ),
        "forbidden" => (
            StatusCode::FORBIDDEN,
            Json(json!({"code": "FORBIDDEN", "message": "admin only"})),
        ),
        "custom" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"code": "QUOTA_EXCEEDED", "message": "monthly quota exhausted"})),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"code": "NOT_FOUND", "message": "no such canned error"})),
        ),
    }
}

async fn allowed() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::ALLOW, "GET, HEAD, OPTIONS")],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_to_json() {
        let user = User {
            id: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["email"], "ada@example.com");
    }

    #[test]
    fn create_user_rejects_missing_email() {
        let result: Result<CreateUser, _> = serde_json::from_str(r#"{"name":"Ada"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_user_all_fields_optional() {
        let input: UpdateUser = serde_json::from_str("{}").unwrap();
        assert!(input.name.is_none());
        assert!(input.email.is_none());
    }

    #[test]
    fn update_user_partial_fields() {
        let input: UpdateUser = serde_json::from_str(r#"{"email":"new@example.com"}"#).unwrap();
        assert!(input.name.is_none());
        assert_eq!(input.email.as_deref(), Some("new@example.com"));
    }
}
