use axum::{Json, extract::{Query, State}, http::StatusCode};
use serde::Deserialize;
use crate::AppState;
use redis::AsyncCommands;

#[derive(serde::Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

#[derive(Deserialize)]
pub struct HealthQuery {
    mode: Option<String>,
}

/// Responds with the health status of the server.
///
/// - By default (no query parameters), performs a light check to confirm the web server
///   is running.
///
/// - If `mode=full` is passed as a query parameter, also pings Redis when the Redis
///   store backend is active. The in-memory backend has no external dependency, so
///   full mode reports the same as light.
///
/// # Query Parameters
/// - `mode`: Optional. Accepts `"light"` (default) or `"full"`.
///
/// # Responses
/// - `200 OK` with `{ "status": "ok" }` if server (and Redis, in full mode) are healthy.
/// - `500 INTERNAL SERVER ERROR` with `{ "status": "error" }` if Redis connection or ping fails in full mode.
///
/// # Examples
/// - `GET /health` → 200 OK
/// - `GET /health?mode=full` → 200 OK or 500 INTERNAL SERVER ERROR
pub async fn health_check(
    State(state): State<AppState>,
    Query(params): Query<HealthQuery>,
) -> (StatusCode, Json<HealthResponse>) {
    match params.mode.as_deref() {
        Some("full") => {
            // Full health check: Ping Redis when that backend is in use
            let Some(client) = state.redis_client() else {
                return (
                    StatusCode::OK,
                    Json(HealthResponse { status: "ok" })
                );
            };

            let mut conn = match client.get_multiplexed_async_connection().await {
                Ok(conn) => conn,
                Err(_) => {
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(HealthResponse { status: "error" })
                    )
                }
            };

            let ping_result: redis::RedisResult<String> = conn.ping().await;
            match ping_result {
                Ok(_) => (
                    StatusCode::OK,
                    Json(HealthResponse { status: "ok" })
                ),
                Err(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(HealthResponse { status: "error" })
                ),
            }
        }
        _ => {
            // Light health check
            (
                StatusCode::OK,
                Json(HealthResponse { status: "ok" })
            )
        }
    }
}
