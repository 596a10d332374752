//! In-process stand-in for the Supabase Storage object API.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use filedock_config::SupabaseConfig;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const TOKEN: &str = "service-key";
pub const BUCKET: &str = "uploads";

type Shared = Arc<Mutex<BTreeMap<String, Vec<u8>>>>;

pub struct FakeSupabase {
    objects: Shared,
    pub url: String,
}

impl FakeSupabase {
    pub async fn start() -> Self {
        let objects: Shared = Arc::new(Mutex::new(BTreeMap::new()));
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&objects));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service()).await.unwrap();
        });

        Self { objects, url }
    }

    pub fn config(&self) -> SupabaseConfig {
        SupabaseConfig {
            url: self.url.clone(),
            key: TOKEN.to_string(),
            bucket: BUCKET.to_string(),
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().keys().cloned().collect()
    }
}

#[derive(Deserialize)]
struct ListBody {
    #[serde(default)]
    prefix: String,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    search: Option<String>,
}

/// Entries one folder level below `prefix`: files carry metadata, each
/// sub-folder appears once without it
fn list_level(objects: &BTreeMap<String, Vec<u8>>, prefix: &str) -> Vec<serde_json::Value> {
    let prefix = prefix.trim_matches('/');
    let prefix = if prefix.is_empty() {
        String::new()
    } else {
        format!("{}/", prefix)
    };

    let mut entries = Vec::new();
    let mut last_folder: Option<&str> = None;
    for (key, data) in objects {
        let Some(rest) = key.strip_prefix(&prefix) else {
            continue;
        };
        match rest.split_once('/') {
            Some((folder, _)) => {
                if last_folder != Some(folder) {
                    entries.push(json!({ "name": folder, "id": null, "metadata": null }));
                    last_folder = Some(folder);
                }
            }
            None => entries.push(json!({
                "name": rest,
                "id": key,
                "metadata": { "size": data.len(), "mimetype": "application/octet-stream" },
            })),
        }
    }
    entries
}

#[derive(Deserialize)]
struct DeleteBody {
    prefixes: Vec<String>,
}

fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "statusCode": status.as_u16().to_string(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message,
        })),
    )
        .into_response()
}

async fn handle(
    State(objects): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN));
    if !authorized {
        return error(StatusCode::UNAUTHORIZED, "invalid token");
    }

    let Some(rest) = uri.path().strip_prefix("/storage/v1/object/") else {
        return error(StatusCode::NOT_FOUND, "unknown route");
    };

    if let Some(bucket) = rest.strip_prefix("list/") {
        if method != Method::POST || bucket != BUCKET {
            return error(StatusCode::NOT_FOUND, "bucket not found");
        }
        let request: ListBody = serde_json::from_slice(&body).unwrap();
        let listed: Vec<_> = list_level(&objects.lock(), &request.prefix)
            .into_iter()
            .filter(|entry| {
                request.search.as_deref().map_or(true, |search| {
                    entry["name"].as_str().unwrap_or_default().contains(search)
                })
            })
            .skip(request.offset)
            .take(request.limit.unwrap_or(100))
            .collect();
        return Json(listed).into_response();
    }

    let (bucket, name) = match rest.split_once('/') {
        Some((bucket, name)) => (bucket, Some(urlencoding::decode(name).unwrap().into_owned())),
        None => (rest, None),
    };
    if bucket != BUCKET {
        return error(StatusCode::NOT_FOUND, "bucket not found");
    }

    match (method, name) {
        (Method::POST, Some(name)) => {
            let upsert = headers
                .get("x-upsert")
                .is_some_and(|v| v.as_bytes() == b"true");
            let mut objects = objects.lock();
            if objects.contains_key(&name) && !upsert {
                return error(StatusCode::BAD_REQUEST, "The resource already exists");
            }
            objects.insert(name.clone(), body.to_vec());
            Json(json!({ "Key": format!("{}/{}", BUCKET, name) })).into_response()
        }
        (Method::GET, Some(name)) => match objects.lock().get(&name) {
            Some(data) => data.clone().into_response(),
            None => error(StatusCode::BAD_REQUEST, "Object not found"),
        },
        (Method::DELETE, None) => {
            let request: DeleteBody = serde_json::from_slice(&body).unwrap();
            let mut objects = objects.lock();
            let removed: Vec<_> = request
                .prefixes
                .iter()
                .filter(|name| objects.remove(name.as_str()).is_some())
                .map(|name| json!({ "name": name }))
                .collect();
            Json(removed).into_response()
        }
        _ => error(StatusCode::METHOD_NOT_ALLOWED, "unsupported"),
    }
}
