use crate::{
    auth::CurrentPrincipal,
    dtos::venue::{CreateVenueRequest, UpdateVenueRequest, VenueResponse},
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::services::catalog::CatalogService;

/// List the venues the caller manages
#[utoipa::path(
    get,
    path = "/panel/venues",
    responses(
        (status = 200, description = "Managed venues, newest first", body = Vec<VenueResponse>),
        (status = 401, description = "Missing or invalid JWT"),
        (status = 403, description = "Caller is not an owner or admin")
    ),
    security(("jwt" = [])),
    tag = "Venues"
)]
pub async fn list_venues(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
) -> Result<Json<Vec<VenueResponse>>, ApiError> {
    let venues = CatalogService::list_managed_venues(&state.db, &actor).await?;
    Ok(Json(venues.into_iter().map(Into::into).collect()))
}

/// Create a venue, subject to the owner's plan limit
#[utoipa::path(
    post,
    path = "/panel/venues",
    request_body = CreateVenueRequest,
    responses(
        (status = 201, description = "Venue created", body = VenueResponse),
        (status = 400, description = "Invalid venue data"),
        (status = 403, description = "Not allowed or plan limit reached")
    ),
    security(("jwt" = [])),
    tag = "Venues"
)]
pub async fn create_venue(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Json(body): Json<CreateVenueRequest>,
) -> Result<(StatusCode, Json<VenueResponse>), ApiError> {
    let venue = CatalogService::create_venue(&state.db, &actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(venue.into())))
}

#[utoipa::path(
    get,
    path = "/panel/venues/{id}",
    params(("id" = i64, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Venue found", body = VenueResponse),
        (status = 403, description = "Venue belongs to another owner"),
        (status = 404, description = "Venue not found")
    ),
    security(("jwt" = [])),
    tag = "Venues"
)]
pub async fn get_venue(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Path(id): Path<i64>,
) -> Result<Json<VenueResponse>, ApiError> {
    let venue = CatalogService::get_managed_venue(&state.db, &actor, id).await?;
    Ok(Json(venue.into()))
}

/// Update venue details; a new slug must be free
#[utoipa::path(
    put,
    path = "/panel/venues/{id}",
    params(("id" = i64, Path, description = "Venue ID")),
    request_body = UpdateVenueRequest,
    responses(
        (status = 200, description = "Venue updated", body = VenueResponse),
        (status = 400, description = "Invalid venue data"),
        (status = 403, description = "Venue belongs to another owner"),
        (status = 404, description = "Venue not found"),
        (status = 409, description = "Slug already in use")
    ),
    security(("jwt" = [])),
    tag = "Venues"
)]
pub async fn update_venue(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Path(id): Path<i64>,
    Json(body): Json<UpdateVenueRequest>,
) -> Result<Json<VenueResponse>, ApiError> {
    let venue = CatalogService::update_venue(&state.db, &actor, id, body.into()).await?;
    Ok(Json(venue.into()))
}

/// Assign a venue to an owner account (admin only)
#[utoipa::path(
    post,
    path = "/panel/venues/{id}/owner/{user_id}",
    params(
        ("id" = i64, Path, description = "Venue ID"),
        ("user_id" = i64, Path, description = "New owner's user ID")
    ),
    responses(
        (status = 200, description = "Owner assigned", body = VenueResponse),
        (status = 400, description = "User cannot own venues"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Venue or user not found")
    ),
    security(("jwt" = [])),
    tag = "Venues"
)]
pub async fn assign_owner(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<Json<VenueResponse>, ApiError> {
    let venue = CatalogService::assign_venue_owner(&state.db, &actor, id, user_id).await?;
    Ok(Json(venue.into()))
}
