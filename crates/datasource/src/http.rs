use crate::errors::{DatasourceError, Result};
use filedock_config::CoreSettings;
use serde_json::Value;
use std::time::Duration;

/// Builds the HTTP client shared by every request of one adapter
pub(crate) fn build_client(core: &CoreSettings) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if core.request_timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(core.request_timeout_secs));
    }
    Ok(builder.build()?)
}

/// Turns a `{error, message}` JSON body into a remote error, if it is one
pub(crate) fn remote_error(body: &Value) -> Option<DatasourceError> {
    let error = body.get("error").filter(|e| is_truthy(e))?;
    let error = match error {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let message = body
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or_default()
        .to_string();

    Some(DatasourceError::RemoteError { error, message })
}

/// `false`, `0`, `""` and `null` mean "no error"
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Reads a response that carries no payload the caller needs.
/// Empty bodies are accepted; JSON bodies are checked for an error envelope.
pub(crate) async fn expect_ok(response: reqwest::Response) -> Result<()> {
    let status = response.status();
    let url = response.url().to_string();
    let body = response.bytes().await?;

    if let Ok(value) = serde_json::from_slice::<Value>(&body) {
        if let Some(err) = remote_error(&value) {
            return Err(err);
        }
    }

    if !status.is_success() {
        return Err(DatasourceError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        });
    }

    Ok(())
}
