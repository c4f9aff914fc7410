//! REST surface: health and hub introspection.
//!
//! The real-time traffic all flows over `/ws`; these endpoints exist for
//! monitoring and operations tooling.

pub mod system;

use axum::Router;

use crate::app_state::AppState;

#[cfg(feature = "swagger-ui")]
use utoipa::OpenApi;

/// OpenAPI document for the REST surface.
#[cfg(feature = "swagger-ui")]
#[derive(OpenApi)]
#[openapi(
    paths(
        system::health_handler,
        system::hub_stats_handler,
        system::group_members_handler,
    ),
    components(schemas(
        system::HealthResponse,
        system::HubStatsResponse,
        system::GroupMembersResponse,
    ))
)]
struct ApiDoc;

/// Builds the REST router (with Swagger UI when the `swagger-ui`
/// feature is enabled).
pub fn build_router() -> Router<AppState> {
    let router = Router::new().merge(system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}
