//! Cache API Handlers
//!
//! HTTP endpoint that exposes the group/key surface to the rest of the
//! fleet. The handler translates a request into a [`Group::get`] call, so a
//! peer fetch benefits from the full lookup contract of the target node:
//! local cache, single flight, and loader fallback.
//!
//! [`Group::get`]: crate::group::Group::get

use axum::Router;
use axum::extract::Path;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use crate::group::get_group;

/// Builds the router serving the cache surface under `base_path`.
///
/// Requests outside the base path never reach the handler; the router simply
/// does not know them, so they cannot be misattributed to a group.
pub fn router(base_path: &str) -> Router {
    let base = base_path.trim_end_matches('/');
    Router::new().route(&format!("{}/*path", base), get(handle_fetch))
}

/// Serves `GET {base_path}{group}/{key}`.
///
/// The key may itself contain slashes; only the first segment names the
/// group. The value travels as the raw response body.
async fn handle_fetch(Path(path): Path<String>) -> Response {
    let mut parts = path.splitn(2, '/');
    let (Some(group_name), Some(key)) = (parts.next(), parts.next()) else {
        return (
            StatusCode::BAD_REQUEST,
            "bad request: expected {group}/{key}",
        )
            .into_response();
    };

    let Some(group) = get_group(group_name) else {
        return (
            StatusCode::NOT_FOUND,
            format!("no such group: {}", group_name),
        )
            .into_response();
    };

    tracing::debug!("serving {}/{}", group_name, key);

    match group.get(key).await {
        Ok(view) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            view.to_vec(),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("load for {}/{} failed: {}", group_name, key, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
