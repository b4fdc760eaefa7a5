use crate::{
    auth::CurrentPrincipal,
    dtos::court::{CourtQueryParams, CourtResponse, CreateCourtRequest, UpdateCourtRequest},
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::catalog::CatalogService;

/// List the courts the caller manages
#[utoipa::path(
    get,
    path = "/panel/courts",
    params(CourtQueryParams),
    responses(
        (status = 200, description = "Managed courts, newest first", body = Vec<CourtResponse>),
        (status = 403, description = "Caller is not an owner or admin")
    ),
    security(("jwt" = [])),
    tag = "Courts"
)]
pub async fn list_courts(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Query(params): Query<CourtQueryParams>,
) -> Result<Json<Vec<CourtResponse>>, ApiError> {
    let courts = CatalogService::list_managed_courts(&state.db, &actor, params.venue_id).await?;
    Ok(Json(courts.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/panel/courts",
    request_body = CreateCourtRequest,
    responses(
        (status = 201, description = "Court created", body = CourtResponse),
        (status = 400, description = "Invalid court data"),
        (status = 403, description = "Venue belongs to another owner"),
        (status = 404, description = "Venue not found")
    ),
    security(("jwt" = [])),
    tag = "Courts"
)]
pub async fn create_court(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Json(body): Json<CreateCourtRequest>,
) -> Result<(StatusCode, Json<CourtResponse>), ApiError> {
    let court = CatalogService::create_court(&state.db, &actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(court.into())))
}

#[utoipa::path(
    put,
    path = "/panel/courts/{id}",
    params(("id" = i64, Path, description = "Court ID")),
    request_body = UpdateCourtRequest,
    responses(
        (status = 200, description = "Court updated", body = CourtResponse),
        (status = 400, description = "Invalid court data"),
        (status = 403, description = "Court belongs to another owner"),
        (status = 404, description = "Court not found")
    ),
    security(("jwt" = [])),
    tag = "Courts"
)]
pub async fn update_court(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCourtRequest>,
) -> Result<Json<CourtResponse>, ApiError> {
    let court = CatalogService::update_court(&state.db, &actor, id, body.into()).await?;
    Ok(Json(court.into()))
}

/// Delete a court together with its images and reservations
#[utoipa::path(
    delete,
    path = "/panel/courts/{id}",
    params(("id" = i64, Path, description = "Court ID")),
    responses(
        (status = 204, description = "Court deleted"),
        (status = 403, description = "Court belongs to another owner"),
        (status = 404, description = "Court not found")
    ),
    security(("jwt" = [])),
    tag = "Courts"
)]
pub async fn delete_court(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    CatalogService::delete_court(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
