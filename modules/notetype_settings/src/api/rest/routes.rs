//! Route registration for the configuration UI binder

use crate::domain::Service;
use super::{dto::*, error::Problem, handlers};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

/// OpenAPI schemas of the REST DTOs
#[derive(OpenApi)]
#[openapi(components(schemas(
    SettingValueDto,
    FamilyStatusDto,
    FamiliesListResponse,
    NamesResponse,
    SettingDescriptorDto,
    SettingSectionDto,
    SectionsResponse,
    CardTemplateDto,
    NotetypeFieldDto,
    NotetypeDto,
    FailedSettingDto,
    BatchReportDto,
    OpenSessionRequest,
    SessionDto,
    UpdateValuesRequest,
)))]
pub struct ApiDoc;

/// Register all REST routes
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let router = router
        // Family endpoints
        .route("/notetypes", get(list_families_handler))
        .route("/notetypes/reset", post(reset_all_handler))
        .route("/notetypes/update", post(update_all_handler))
        .route("/notetypes/convert-copies", post(convert_copies_handler))
        .route("/notetypes/{family}/definitions", get(family_definitions_handler))
        .route("/notetypes/{family}/import", post(import_family_handler))
        .route("/notetypes/{family}/reset", post(reset_family_handler))
        .route("/general/definitions", get(general_definitions_handler))
        // Session endpoints
        .route("/sessions", post(open_session_handler))
        .route(
            "/sessions/{id}",
            get(get_session_handler).delete(close_session_handler),
        )
        .route(
            "/sessions/{id}/settings/{scope}",
            get(session_settings_handler).put(update_session_settings_handler),
        )
        .route("/sessions/{id}/save", post(save_session_handler))
        // Add service as extension for handlers
        .layer(Extension(service));

    Ok(router)
}

// ===== Handler wrappers that extract service from Extension =====

async fn list_families_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<FamiliesListResponse>, Problem> {
    handlers::list_families(service).await
}

async fn family_definitions_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
) -> Result<Json<SectionsResponse>, Problem> {
    handlers::family_definitions(service, path).await
}

async fn general_definitions_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Json<SectionsResponse> {
    handlers::general_definitions(service).await
}

async fn import_family_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
) -> Result<(StatusCode, Json<NotetypeDto>), Problem> {
    handlers::import_family(service, path).await
}

async fn reset_family_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
) -> Result<Json<NamesResponse>, Problem> {
    handlers::reset_family(service, path).await
}

async fn reset_all_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<NamesResponse>, Problem> {
    handlers::reset_all(service).await
}

async fn update_all_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<BatchReportDto>, Problem> {
    handlers::update_all(service).await
}

async fn convert_copies_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<NamesResponse>, Problem> {
    handlers::convert_copies(service).await
}

async fn open_session_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<SessionDto>), Problem> {
    handlers::open_session(service, json).await
}

async fn get_session_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
) -> Result<Json<SessionDto>, Problem> {
    handlers::get_session(service, path).await
}

async fn close_session_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
) -> Result<StatusCode, Problem> {
    handlers::close_session(service, path).await
}

async fn session_settings_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<(Uuid, String)>,
) -> Result<Json<SectionsResponse>, Problem> {
    handlers::session_settings(service, path).await
}

async fn update_session_settings_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<(Uuid, String)>,
    json: Json<UpdateValuesRequest>,
) -> Result<Json<SessionDto>, Problem> {
    handlers::update_session_settings(service, path, json).await
}

async fn save_session_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
) -> Result<Json<BatchReportDto>, Problem> {
    handlers::save_session(service, path).await
}
