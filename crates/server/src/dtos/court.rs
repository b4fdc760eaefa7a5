use database::{
    entities::{court_images, courts},
    services::catalog::{CourtChanges, CourtListing, NewCourt},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct CourtResponse {
    pub id: i64,
    pub venue_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sport: String,
    pub surface: String,
    pub hourly_price: Decimal,
    pub rating: Decimal,
    pub is_active: bool,
    pub images: Vec<String>,
}

impl CourtResponse {
    pub fn with_images(court: courts::Model, images: Vec<court_images::Model>) -> Self {
        Self {
            id: court.id,
            venue_id: court.venue_id,
            name: court.name,
            description: court.description,
            latitude: court.latitude,
            longitude: court.longitude,
            sport: court.sport,
            surface: court.surface,
            hourly_price: court.hourly_price,
            rating: court.rating,
            is_active: court.is_active,
            images: images.into_iter().map(|i| i.url).collect(),
        }
    }
}

impl From<courts::Model> for CourtResponse {
    fn from(court: courts::Model) -> Self {
        Self::with_images(court, vec![])
    }
}

/// A court as listed publicly, carrying the location and amenities of its venue
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicCourtResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub sport: String,
    pub surface: String,
    pub hourly_price: Decimal,
    pub rating: Decimal,
    pub images: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_slug: String,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub department: Option<String>,
    pub covered: bool,
    pub lighting: bool,
    pub changing_rooms: bool,
    pub parking: bool,
    pub cafeteria: bool,
    pub owner_phone: Option<String>,
}

/// Courts without their own coordinates take the venue's
pub fn project_public_court(listing: CourtListing) -> PublicCourtResponse {
    let CourtListing {
        court,
        venue,
        owner_phone,
        images,
    } = listing;

    PublicCourtResponse {
        id: court.id,
        name: court.name,
        description: court.description,
        sport: court.sport,
        surface: court.surface,
        hourly_price: court.hourly_price,
        rating: court.rating,
        images: images.into_iter().map(|i| i.url).collect(),
        latitude: court.latitude.or(venue.latitude),
        longitude: court.longitude.or(venue.longitude),
        venue_id: venue.id,
        venue_name: venue.name,
        venue_slug: venue.slug,
        address: venue.address,
        district: venue.district,
        province: venue.province,
        department: venue.department,
        covered: venue.covered,
        lighting: venue.lighting,
        changing_rooms: venue.changing_rooms,
        parking: venue.parking,
        cafeteria: venue.cafeteria,
        owner_phone,
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourtRequest {
    pub venue_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sport: String,
    pub surface: String,
    pub hourly_price: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl From<CreateCourtRequest> for NewCourt {
    fn from(req: CreateCourtRequest) -> Self {
        Self {
            venue_id: req.venue_id,
            name: req.name,
            description: req.description,
            latitude: req.latitude,
            longitude: req.longitude,
            sport: req.sport,
            surface: req.surface,
            hourly_price: req.hourly_price,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCourtRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sport: Option<String>,
    pub surface: Option<String>,
    pub hourly_price: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl From<UpdateCourtRequest> for CourtChanges {
    fn from(req: UpdateCourtRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            latitude: req.latitude,
            longitude: req.longitude,
            sport: req.sport,
            surface: req.surface,
            hourly_price: req.hourly_price,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CourtQueryParams {
    pub venue_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use database::entities::venues;

    fn listing(court_coords: Option<(f64, f64)>) -> CourtListing {
        let at = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let venue = venues::Model {
            id: 3,
            name: "Complejo Los Olivos".to_owned(),
            slug: "complejo-los-olivos".to_owned(),
            description: None,
            address: Some("Av. Peru 123".to_owned()),
            district: Some("Los Olivos".to_owned()),
            province: Some("Lima".to_owned()),
            department: Some("Lima".to_owned()),
            latitude: Some(-11.97),
            longitude: Some(-77.07),
            covered: true,
            lighting: true,
            changing_rooms: false,
            parking: true,
            cafeteria: false,
            photo_url: None,
            is_active: true,
            owner_id: Some(8),
            created_by: None,
            created_at: at,
            updated_at: at,
        };
        let court = courts::Model {
            id: 11,
            venue_id: 3,
            name: "Cancha 2".to_owned(),
            description: None,
            latitude: court_coords.map(|c| c.0),
            longitude: court_coords.map(|c| c.1),
            sport: "futbol".to_owned(),
            surface: "sintetico".to_owned(),
            hourly_price: Decimal::from(70),
            rating: Decimal::ZERO,
            is_active: true,
            created_by: None,
            created_at: at,
            updated_at: at,
        };
        let image = court_images::Model {
            id: 1,
            court_id: 11,
            url: "/static/courts/11/1.jpg".to_owned(),
            position: 0,
            created_at: at,
        };

        CourtListing {
            court,
            venue,
            owner_phone: Some("987654321".to_owned()),
            images: vec![image],
        }
    }

    #[test]
    fn test_projection_falls_back_to_venue_location() {
        let projected = project_public_court(listing(None));

        assert_eq!(projected.latitude, Some(-11.97));
        assert_eq!(projected.longitude, Some(-77.07));
        assert_eq!(projected.district.as_deref(), Some("Los Olivos"));
        assert!(projected.covered && projected.parking);
        assert_eq!(projected.owner_phone.as_deref(), Some("987654321"));
        assert_eq!(projected.images, vec!["/static/courts/11/1.jpg"]);
        assert_eq!(projected.venue_slug, "complejo-los-olivos");
    }

    #[test]
    fn test_projection_keeps_court_location() {
        let projected = project_public_court(listing(Some((-12.0, -77.0))));

        assert_eq!(projected.latitude, Some(-12.0));
        assert_eq!(projected.longitude, Some(-77.0));
    }
}
