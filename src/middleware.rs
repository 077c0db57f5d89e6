use super::errors::ApiError;
use anyhow::anyhow;
use axum::{
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// axum's own rejections (unknown route, unparseable path id, wrong method)
/// come back as plain text. Rewrap any non-JSON error response so every
/// failure has the `{"error": ...}` shape.
pub async fn json_errors<B>(
    request: Request<B>,
    next: Next<B>,
) -> Result<Response, ApiError> {
    let response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error())
        || is_json(&response)
    {
        return Ok(response);
    }

    let body = hyper::body::to_bytes(response.into_body())
        .await
        .map_err(|e| anyhow!("could not read error body: {e}"))?;
    let message = if body.is_empty() {
        status.canonical_reason().unwrap_or("Error").to_string()
    } else {
        String::from_utf8_lossy(&body).into_owned()
    };

    Ok((status, Json(json!({ "error": message }))).into_response())
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false)
}
