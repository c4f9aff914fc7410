//! System endpoints: health check and hub introspection.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::GroupId;
use crate::error::GatewayError;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Fixed `"healthy"` marker.
    status: String,
    /// Current server time, RFC 3339.
    timestamp: String,
    /// Crate version.
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Live hub counters.
#[derive(Debug, Serialize, ToSchema)]
pub struct HubStatsResponse {
    /// Number of live connections.
    connections: usize,
    /// Number of currently populated groups.
    groups: usize,
}

/// `GET /hub/stats` — Live connection and group counts.
#[utoipa::path(
    get,
    path = "/hub/stats",
    tag = "Hub",
    summary = "Hub statistics",
    description = "Returns the number of live connections and populated groups.",
    responses(
        (status = 200, description = "Current hub counters", body = HubStatsResponse),
    )
)]
pub async fn hub_stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.hub.stats().await;
    (
        StatusCode::OK,
        Json(HubStatsResponse {
            connections: stats.connections,
            groups: stats.groups,
        }),
    )
}

/// Membership snapshot of one group.
#[derive(Debug, Serialize, ToSchema)]
pub struct GroupMembersResponse {
    /// The group identifier.
    group_id: String,
    /// Connection identifiers of the current members.
    members: Vec<String>,
}

/// `GET /hub/groups/{group_id}` — Membership snapshot of one group.
///
/// # Errors
///
/// Returns [`GatewayError::GroupNotFound`] when the group has no
/// current members; a group exists only while populated.
#[utoipa::path(
    get,
    path = "/hub/groups/{group_id}",
    tag = "Hub",
    summary = "Group membership snapshot",
    description = "Returns the connection ids currently joined to a group.",
    params(
        ("group_id" = String, Path, description = "Fleet group identifier"),
    ),
    responses(
        (status = 200, description = "Current members", body = GroupMembersResponse),
        (status = 404, description = "Group has no members"),
    )
)]
pub async fn group_members_handler(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupMembersResponse>, GatewayError> {
    let group = GroupId::from(group_id);
    let members = state.hub.group_members(&group).await;
    if members.is_empty() {
        return Err(GatewayError::GroupNotFound(group.as_str().to_string()));
    }
    Ok(Json(GroupMembersResponse {
        group_id: group.as_str().to_string(),
        members: members.iter().map(ToString::to_string).collect(),
    }))
}

/// System and hub introspection routes, mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/hub/stats", get(hub_stats_handler))
        .route("/hub/groups/{group_id}", get(group_members_handler))
}
