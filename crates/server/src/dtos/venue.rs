use crate::dtos::court::CourtResponse;
use chrono::NaiveDateTime;
use database::{
    entities::venues,
    services::catalog::{NewVenue, VenueChanges, VenueEntry},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct VenueResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub department: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub covered: bool,
    pub lighting: bool,
    pub changing_rooms: bool,
    pub parking: bool,
    pub cafeteria: bool,
    pub photo_url: Option<String>,
    pub is_active: bool,
    pub owner_id: Option<i64>,
    pub created_at: NaiveDateTime,
}

impl From<venues::Model> for VenueResponse {
    fn from(venue: venues::Model) -> Self {
        Self {
            id: venue.id,
            name: venue.name,
            slug: venue.slug,
            description: venue.description,
            address: venue.address,
            district: venue.district,
            province: venue.province,
            department: venue.department,
            latitude: venue.latitude,
            longitude: venue.longitude,
            covered: venue.covered,
            lighting: venue.lighting,
            changing_rooms: venue.changing_rooms,
            parking: venue.parking,
            cafeteria: venue.cafeteria,
            photo_url: venue.photo_url,
            is_active: venue.is_active,
            owner_id: venue.owner_id,
            created_at: venue.created_at,
        }
    }
}

/// A venue in the public catalog, with its bookable courts
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicVenueResponse {
    #[serde(flatten)]
    pub venue: VenueResponse,
    pub owner_phone: Option<String>,
    pub courts: Vec<CourtResponse>,
}

impl From<VenueEntry> for PublicVenueResponse {
    fn from(entry: VenueEntry) -> Self {
        Self {
            venue: entry.venue.into(),
            owner_phone: entry.owner_phone,
            courts: entry
                .courts
                .into_iter()
                .map(|c| CourtResponse::with_images(c.court, c.images))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVenueRequest {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub department: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub covered: bool,
    #[serde(default)]
    pub lighting: bool,
    #[serde(default)]
    pub changing_rooms: bool,
    #[serde(default)]
    pub parking: bool,
    #[serde(default)]
    pub cafeteria: bool,
    pub photo_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Admins only; owners always create venues for themselves
    pub owner_id: Option<i64>,
}

fn default_active() -> bool {
    true
}

impl From<CreateVenueRequest> for NewVenue {
    fn from(req: CreateVenueRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            address: req.address,
            district: req.district,
            province: req.province,
            department: req.department,
            latitude: req.latitude,
            longitude: req.longitude,
            covered: req.covered,
            lighting: req.lighting,
            changing_rooms: req.changing_rooms,
            parking: req.parking,
            cafeteria: req.cafeteria,
            photo_url: req.photo_url,
            is_active: req.is_active,
            owner_id: req.owner_id,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateVenueRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub department: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub covered: Option<bool>,
    pub lighting: Option<bool>,
    pub changing_rooms: Option<bool>,
    pub parking: Option<bool>,
    pub cafeteria: Option<bool>,
    pub photo_url: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateVenueRequest> for VenueChanges {
    fn from(req: UpdateVenueRequest) -> Self {
        Self {
            name: req.name,
            slug: req.slug,
            description: req.description,
            address: req.address,
            district: req.district,
            province: req.province,
            department: req.department,
            latitude: req.latitude,
            longitude: req.longitude,
            covered: req.covered,
            lighting: req.lighting,
            changing_rooms: req.changing_rooms,
            parking: req.parking,
            cafeteria: req.cafeteria,
            photo_url: req.photo_url,
            is_active: req.is_active,
        }
    }
}
