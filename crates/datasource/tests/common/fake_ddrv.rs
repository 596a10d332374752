//! In-process stand-in for a ddrv server.

use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use filedock_config::DdrvConfig;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

pub const TOKEN: &str = "test-key";
pub const PARENT: &str = "root";

#[derive(Clone)]
struct StoredFile {
    id: String,
    name: String,
    data: Vec<u8>,
    dir: bool,
}

#[derive(Default)]
struct Inner {
    directories: HashMap<String, Vec<StoredFile>>,
    next_id: u64,
    fail_create: bool,
    file_deletes: usize,
}

impl Inner {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

#[derive(Clone)]
pub struct FakeDdrv {
    inner: Arc<Mutex<Inner>>,
    pub url: String,
}

impl FakeDdrv {
    /// Starts a server holding one empty directory with id `bucket`
    pub async fn start(bucket: &str) -> Self {
        let inner = Arc::new(Mutex::new(Inner::default()));
        inner.lock().directories.insert(bucket.to_string(), Vec::new());

        let app = Router::new()
            .route("/api/directories/", post(create_directory))
            .route(
                "/api/directories/:id",
                get(list_directory).delete(delete_directory),
            )
            .route("/api/directories/:id/files", post(upload_file))
            .route(
                "/api/directories/:id/files/:file_id",
                get(file_metadata).delete(delete_file),
            )
            .route("/files/:file_id", get(download_file))
            .with_state(Arc::clone(&inner));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service()).await.unwrap();
        });

        Self { inner, url }
    }

    pub fn config(&self, bucket: &str) -> DdrvConfig {
        DdrvConfig {
            url: self.url.clone(),
            key: TOKEN.to_string(),
            bucket: bucket.to_string(),
            parrent_bucket: PARENT.to_string(),
            directory_name: "zipline".to_string(),
        }
    }

    /// Adds an entry directly, bypassing upload, and returns its id
    pub fn seed(&self, bucket: &str, name: &str, data: &[u8], dir: bool) -> String {
        let mut inner = self.inner.lock();
        let id = inner.next_id(if dir { "dir" } else { "file" });
        inner
            .directories
            .get_mut(bucket)
            .expect("unknown directory")
            .push(StoredFile {
                id: id.clone(),
                name: name.to_string(),
                data: data.to_vec(),
                dir,
            });
        id
    }

    pub fn fail_create(&self) {
        self.inner.lock().fail_create = true;
    }

    pub fn directory_exists(&self, bucket: &str) -> bool {
        self.inner.lock().directories.contains_key(bucket)
    }

    pub fn file_deletes(&self) -> usize {
        self.inner.lock().file_deletes
    }
}

type Shared = Arc<Mutex<Inner>>;

fn error(status: StatusCode, error: &str, message: &str) -> Response {
    (status, Json(json!({ "error": error, "message": message }))).into_response()
}

fn check_auth(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {}", TOKEN);
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(error(StatusCode::UNAUTHORIZED, "Unauthorized", "invalid token")),
    }
}

fn describe(file: &StoredFile) -> serde_json::Value {
    json!({
        "id": file.id,
        "name": file.name,
        "size": file.data.len(),
        "dir": file.dir,
    })
}

#[derive(Deserialize)]
struct CreateDirectory {
    name: String,
    parent: String,
}

async fn create_directory(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<CreateDirectory>,
) -> Response {
    if let Err(response) = check_auth(&headers) {
        return response;
    }

    let mut inner = state.lock();
    if inner.fail_create {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "InternalError", "create failed");
    }

    let id = inner.next_id("dir");
    inner.directories.insert(id.clone(), Vec::new());
    Json(json!({ "data": { "id": id, "name": body.name, "parent": body.parent } })).into_response()
}

async fn list_directory(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = check_auth(&headers) {
        return response;
    }

    let inner = state.lock();
    match inner.directories.get(&id) {
        Some(files) => {
            let files: Vec<_> = files.iter().map(describe).collect();
            Json(json!({ "data": { "id": id, "files": files } })).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "NotFound", "directory not found"),
    }
}

async fn delete_directory(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = check_auth(&headers) {
        return response;
    }

    match state.lock().directories.remove(&id) {
        Some(_) => Json(json!({ "message": "deleted" })).into_response(),
        None => error(StatusCode::NOT_FOUND, "NotFound", "directory not found"),
    }
}

async fn upload_file(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    if let Err(response) = check_auth(&headers) {
        return response;
    }

    let mut uploaded = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.unwrap().to_vec();
        uploaded.push((name, data));
    }

    let mut inner = state.lock();
    if !inner.directories.contains_key(&id) {
        return error(StatusCode::NOT_FOUND, "NotFound", "directory not found");
    }

    let mut described = Vec::new();
    for (name, data) in uploaded {
        let file = StoredFile {
            id: inner.next_id("file"),
            name,
            data,
            dir: false,
        };
        described.push(describe(&file));
        if let Some(files) = inner.directories.get_mut(&id) {
            files.push(file);
        }
    }

    Json(json!({ "data": described })).into_response()
}

async fn file_metadata(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((id, file_id)): Path<(String, String)>,
) -> Response {
    if let Err(response) = check_auth(&headers) {
        return response;
    }

    let inner = state.lock();
    match inner
        .directories
        .get(&id)
        .and_then(|files| files.iter().find(|f| f.id == file_id))
    {
        Some(file) => Json(json!({ "data": describe(file) })).into_response(),
        None => error(StatusCode::NOT_FOUND, "NotFound", "file not found"),
    }
}

async fn delete_file(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((id, file_id)): Path<(String, String)>,
) -> Response {
    if let Err(response) = check_auth(&headers) {
        return response;
    }

    let mut inner = state.lock();
    inner.file_deletes += 1;
    let Some(files) = inner.directories.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, "NotFound", "directory not found");
    };
    let before = files.len();
    files.retain(|f| f.id != file_id);
    if files.len() == before {
        return error(StatusCode::NOT_FOUND, "NotFound", "file not found");
    }
    Json(json!({ "message": "deleted" })).into_response()
}

async fn download_file(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(file_id): Path<String>,
) -> Response {
    if let Err(response) = check_auth(&headers) {
        return response;
    }

    let inner = state.lock();
    let file = inner
        .directories
        .values()
        .flatten()
        .find(|f| f.id == file_id && !f.dir);
    match file {
        Some(file) => file.data.clone().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
