use crate::{
    dtos::{
        court::{PublicCourtResponse, project_public_court},
        venue::PublicVenueResponse,
    },
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
};
use database::services::catalog::CatalogService;

/// List active venues with their courts
#[utoipa::path(
    get,
    path = "/venues",
    responses(
        (status = 200, description = "Public venue catalog", body = Vec<PublicVenueResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Catalog"
)]
pub async fn list_venues(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicVenueResponse>>, ApiError> {
    let venues = CatalogService::list_public_venues(&state.db).await?;
    Ok(Json(venues.into_iter().map(Into::into).collect()))
}

/// Get an active venue by its slug
#[utoipa::path(
    get,
    path = "/venues/{slug}",
    params(
        ("slug" = String, Path, description = "Venue slug")
    ),
    responses(
        (status = 200, description = "Venue found", body = PublicVenueResponse),
        (status = 404, description = "Venue not found or inactive"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Catalog"
)]
pub async fn get_venue(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicVenueResponse>, ApiError> {
    let venue = CatalogService::find_public_venue(&state.db, &slug).await?;
    Ok(Json(venue.into()))
}

/// List active courts with their venue's location and amenities
#[utoipa::path(
    get,
    path = "/courts",
    responses(
        (status = 200, description = "Public court listing", body = Vec<PublicCourtResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Catalog"
)]
pub async fn list_courts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicCourtResponse>>, ApiError> {
    let courts = CatalogService::list_public_courts(&state.db).await?;
    Ok(Json(courts.into_iter().map(project_public_court).collect()))
}
