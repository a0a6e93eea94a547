//! HTTP request handlers - thin layer that delegates to domain service

use crate::api::native::client::update_values;
use crate::contract::{Notetype, SettingValue};
use crate::domain::{ConfigStore, Service};
use super::{dto::*, error::{map_domain_error, Problem}};
use axum::{extract::Path, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

// ===== Family Handlers =====

/// List families with their copies and update state
pub async fn list_families(service: Arc<Service>) -> Result<Json<FamiliesListResponse>, Problem> {
    let items: Vec<FamilyStatusDto> = service
        .family_status()
        .await
        .map_err(map_domain_error)?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = items.len();

    Ok(Json(FamiliesListResponse { items, total }))
}

/// Settings present on a family
pub async fn family_definitions(
    service: Arc<Service>,
    Path(family): Path<String>,
) -> Result<Json<SectionsResponse>, Problem> {
    let sections = service
        .definitions_for_family(&family)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(sections.into()))
}

/// Settings shared by all families
pub async fn general_definitions(service: Arc<Service>) -> Json<SectionsResponse> {
    Json(service.general_definitions().into())
}

/// Add the newest authored version of a family
pub async fn import_family(
    service: Arc<Service>,
    Path(family): Path<String>,
) -> Result<(StatusCode, Json<NotetypeDto>), Problem> {
    let notetype = service
        .import_family(&family)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(notetype.into())))
}

/// Reset one family to its authored templates
pub async fn reset_family(
    service: Arc<Service>,
    Path(family): Path<String>,
) -> Result<Json<NamesResponse>, Problem> {
    let names = service
        .reset_family(&family)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(NamesResponse { names }))
}

/// Reset every family
pub async fn reset_all(service: Arc<Service>) -> Result<Json<NamesResponse>, Problem> {
    let names = service.reset_all().await.map_err(map_domain_error)?;
    Ok(Json(NamesResponse { names }))
}

/// Upgrade outdated copies, keeping their settings
pub async fn update_all(service: Arc<Service>) -> Result<Json<BatchReportDto>, Problem> {
    let report = service.update_all().await.map_err(map_domain_error)?;
    Ok(Json(report.into()))
}

/// Merge generated copies into their families
pub async fn convert_copies(service: Arc<Service>) -> Result<Json<NamesResponse>, Problem> {
    let names = service.convert_copies().await.map_err(map_domain_error)?;
    Ok(Json(NamesResponse { names }))
}

// ===== Session Handlers =====

/// Open the editing session
pub async fn open_session(
    service: Arc<Service>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<SessionDto>), Problem> {
    let live: Option<Notetype> = req.live.map(Into::into);
    let session = service
        .open_session(req.family, live)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Get the editing session
pub async fn get_session(
    service: Arc<Service>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionDto>, Problem> {
    let session = service.session(id).map_err(map_domain_error)?;
    Ok(Json(session.into()))
}

/// Settings of one scope with the session's values
pub async fn session_settings(
    service: Arc<Service>,
    Path((id, scope)): Path<(Uuid, String)>,
) -> Result<Json<SectionsResponse>, Problem> {
    let sections = service
        .session_settings(id, &scope)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(sections.into()))
}

/// Change values of one scope
pub async fn update_session_settings(
    service: Arc<Service>,
    Path((id, scope)): Path<(Uuid, String)>,
    Json(req): Json<UpdateValuesRequest>,
) -> Result<Json<SessionDto>, Problem> {
    let values: Vec<(String, SettingValue)> = req
        .values
        .into_iter()
        .map(|(setting, value)| (ConfigStore::key(&scope, &setting), value.into()))
        .collect();

    let session = update_values(&service, id, values).map_err(map_domain_error)?;
    Ok(Json(session.into()))
}

/// Write the session's values to the collection
pub async fn save_session(
    service: Arc<Service>,
    Path(id): Path<Uuid>,
) -> Result<Json<BatchReportDto>, Problem> {
    let report = service.save_session(id).await.map_err(map_domain_error)?;
    Ok(Json(report.into()))
}

/// Close the editing session
pub async fn close_session(
    service: Arc<Service>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service.close_session(id).map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}
