use crate::{
    error::ErrorBody,
    routes::{courts, health, public, reports, reservations, venues},
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "jwt",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        public::list_venues,
        public::get_venue,
        public::list_courts,
        venues::list_venues,
        venues::create_venue,
        venues::get_venue,
        venues::update_venue,
        venues::assign_owner,
        courts::list_courts,
        courts::create_court,
        courts::update_court,
        courts::delete_court,
        reservations::list_reservations,
        reservations::create_reservation,
        reservations::list_in_range,
        reservations::list_for_month,
        reservations::record_payment,
        reservations::cancel_reservation,
        reports::export_csv,
        reports::export_printable
    ),
    components(schemas(ErrorBody)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Catalog", description = "Public venue and court catalog"),
        (name = "Venues", description = "Venue management"),
        (name = "Courts", description = "Court management"),
        (name = "Reservations", description = "Court bookings and payments"),
        (name = "Reports", description = "Reservation exports"),
    ),
    info(
        title = "Canchas API",
        version = "1.0.0",
        description = "Sports venue catalog and court booking API",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_booking_routes() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/panel/reservations"));
        assert!(doc.paths.paths.contains_key("/panel/reservations/{id}/payment"));
        assert!(doc.paths.paths.contains_key("/venues/{slug}"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("jwt"));
    }
}
