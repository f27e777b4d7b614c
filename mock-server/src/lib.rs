use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
}

/// Body of a GraphQL POST.
#[derive(Debug, Deserialize)]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(default)]
    pub variables: Map<String, Value>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Todo>>>;

/// Padding length of the `/large` reply, past common client read limits.
pub const LARGE_PADDING: usize = 11 * 1024 * 1024;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/graphql", post(graphql))
        .route("/slow", post(slow))
        .route("/status/{code}", post(status))
        .route("/empty", post(empty))
        .route("/array", post(array))
        .route("/large", post(large))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Resolves the handful of operations the client tests send. Dispatch is by
/// root field name in the document; there is no real parser.
async fn graphql(State(db): State<Db>, Json(request): Json<GraphQLRequest>) -> Json<Value> {
    let query = request.query.as_str();
    let vars = &request.variables;

    if query.contains("createTodo") {
        let Some(title) = vars.get("title").and_then(Value::as_str) else {
            return Json(error_only("variable \"title\" is required"));
        };
        let todo = Todo {
            id: Uuid::new_v4(),
            title: title.to_string(),
            completed: vars.get("completed").and_then(Value::as_bool).unwrap_or(false),
        };
        db.write().await.insert(todo.id, todo.clone());
        return Json(json!({ "data": { "createTodo": todo } }));
    }

    if query.contains("todos") {
        let todos: Vec<Todo> = db.read().await.values().cloned().collect();
        return Json(json!({ "data": { "todos": todos } }));
    }

    if query.contains("todo(") {
        let id = vars
            .get("id")
            .and_then(Value::as_str)
            .and_then(|id| id.parse::<Uuid>().ok());
        let todo = match id {
            Some(id) => db.read().await.get(&id).cloned(),
            None => None,
        };
        return Json(match todo {
            Some(todo) => json!({ "data": { "todo": todo } }),
            None => json!({
                "data": { "todo": null },
                "errors": [{ "message": "todo not found", "path": ["todo"] }],
            }),
        });
    }

    Json(error_only("unknown operation"))
}

fn error_only(message: &str) -> Value {
    json!({ "errors": [{ "message": message }] })
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(300)).await;
    Json(json!({ "data": { "slow": true } }))
}

/// Replies with the given status and its lowercased reason phrase as a text body.
async fn status(Path(code): Path<u16>) -> impl IntoResponse {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = status.canonical_reason().unwrap_or("unknown").to_lowercase();
    (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}

async fn empty() -> StatusCode {
    StatusCode::OK
}

async fn array() -> Json<Value> {
    Json(json!([1, 2, 3]))
}

/// An empty `todos` result padded out through `extensions`.
async fn large() -> Json<Value> {
    Json(json!({
        "data": { "todos": [] },
        "extensions": { "padding": "x".repeat(LARGE_PADDING) },
    }))
}
