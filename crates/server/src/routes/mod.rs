use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub mod courts;
pub mod health;
pub mod public;
pub mod reports;
pub mod reservations;
pub mod venues;

/// Routes served without authentication
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/venues", get(public::list_venues))
        .route("/venues/{slug}", get(public::get_venue))
        .route("/courts", get(public::list_courts))
}

/// Management routes, nested under `/panel` behind the JWT layer
pub fn panel_router() -> Router<AppState> {
    Router::new()
        .route(
            "/venues",
            get(venues::list_venues).post(venues::create_venue),
        )
        .route("/venues/{id}", get(venues::get_venue).put(venues::update_venue))
        .route("/venues/{id}/owner/{user_id}", post(venues::assign_owner))
        .route("/courts", get(courts::list_courts).post(courts::create_court))
        .route(
            "/courts/{id}",
            put(courts::update_court).delete(courts::delete_court),
        )
        .route(
            "/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route("/reservations/range", get(reservations::list_in_range))
        .route("/reservations/month", get(reservations::list_for_month))
        .route("/reservations/export.csv", get(reports::export_csv))
        .route("/reservations/export.txt", get(reports::export_printable))
        .route(
            "/reservations/{id}/payment",
            put(reservations::record_payment),
        )
        .route(
            "/reservations/{id}/cancel",
            put(reservations::cancel_reservation),
        )
}
