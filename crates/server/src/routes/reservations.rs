use crate::{
    auth::{CurrentPrincipal, require_staff},
    dtos::reservation::{
        CreateReservationRequest, MonthQueryParams, PaymentRequest, RangeQueryParams,
        ReservationQueryParams, ReservationResponse,
    },
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::{
    entities::reservations,
    services::{
        query_reservation::{QueryReservationService, ReservationDetails},
        reservation::ReservationService,
    },
};
use sea_orm::DatabaseConnection;

/// List reservations visible to the caller
///
/// Customers see their own bookings, owners the bookings on their venues and
/// admins everything.
#[utoipa::path(
    get,
    path = "/panel/reservations",
    params(ReservationQueryParams),
    responses(
        (status = 200, description = "Reservations ordered by start", body = Vec<ReservationResponse>),
        (status = 400, description = "Inverted date range"),
        (status = 401, description = "Missing or invalid JWT")
    ),
    security(("jwt" = [])),
    tag = "Reservations"
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Query(params): Query<ReservationQueryParams>,
) -> Result<Json<Vec<ReservationResponse>>, ApiError> {
    let reservations =
        ReservationService::list_reservations(&state.db, &actor, params.filter()).await?;
    Ok(Json(reservations.into_iter().map(Into::into).collect()))
}

/// Book a court
#[utoipa::path(
    post,
    path = "/panel/reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ReservationResponse),
        (status = 400, description = "Invalid window or amounts"),
        (status = 403, description = "Court belongs to another owner"),
        (status = 404, description = "Court not found"),
        (status = 409, description = "Slot already booked")
    ),
    security(("jwt" = [])),
    tag = "Reservations"
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Json(body): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), ApiError> {
    require_staff(&actor)?;
    let reservation =
        ReservationService::create_reservation(&state.db, &actor, body.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(detailed(&state.db, reservation).await?),
    ))
}

/// Reservations intersecting an inclusive range of days
#[utoipa::path(
    get,
    path = "/panel/reservations/range",
    params(RangeQueryParams),
    responses(
        (status = 200, description = "Reservations ordered by start", body = Vec<ReservationResponse>),
        (status = 400, description = "`to` is before `from`")
    ),
    security(("jwt" = [])),
    tag = "Reservations"
)]
pub async fn list_in_range(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Query(params): Query<RangeQueryParams>,
) -> Result<Json<Vec<ReservationResponse>>, ApiError> {
    let reservations = ReservationService::list_reservations_in_range(
        &state.db,
        &actor,
        params.from,
        params.to,
        params.court_id,
    )
    .await?;
    Ok(Json(reservations.into_iter().map(Into::into).collect()))
}

/// Reservations starting within a calendar month
#[utoipa::path(
    get,
    path = "/panel/reservations/month",
    params(MonthQueryParams),
    responses(
        (status = 200, description = "Reservations ordered by start", body = Vec<ReservationResponse>),
        (status = 400, description = "Year or month out of range")
    ),
    security(("jwt" = [])),
    tag = "Reservations"
)]
pub async fn list_for_month(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Query(params): Query<MonthQueryParams>,
) -> Result<Json<Vec<ReservationResponse>>, ApiError> {
    let reservations = ReservationService::list_reservations_for_month(
        &state.db,
        &actor,
        params.year,
        params.month,
    )
    .await?;
    Ok(Json(reservations.into_iter().map(Into::into).collect()))
}

/// Record a payment, clamped to the reservation total
#[utoipa::path(
    put,
    path = "/panel/reservations/{id}/payment",
    params(("id" = i64, Path, description = "Reservation ID")),
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Payment recorded", body = ReservationResponse),
        (status = 400, description = "Negative amount"),
        (status = 403, description = "Reservation belongs to another owner"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Reservation is cancelled")
    ),
    security(("jwt" = [])),
    tag = "Reservations"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Path(id): Path<i64>,
    Json(body): Json<PaymentRequest>,
) -> Result<Json<ReservationResponse>, ApiError> {
    require_staff(&actor)?;
    let reservation =
        ReservationService::record_payment(&state.db, &actor, id, body.into()).await?;
    Ok(Json(detailed(&state.db, reservation).await?))
}

/// Cancel a reservation; cancelling twice returns it unchanged
#[utoipa::path(
    put,
    path = "/panel/reservations/{id}/cancel",
    params(("id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = ReservationResponse),
        (status = 403, description = "Reservation belongs to another owner"),
        (status = 404, description = "Reservation not found")
    ),
    security(("jwt" = [])),
    tag = "Reservations"
)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Path(id): Path<i64>,
) -> Result<Json<ReservationResponse>, ApiError> {
    require_staff(&actor)?;
    let reservation = ReservationService::cancel_reservation(&state.db, &actor, id).await?;
    Ok(Json(detailed(&state.db, reservation).await?))
}

async fn detailed(
    db: &DatabaseConnection,
    reservation: reservations::Model,
) -> Result<ReservationResponse, ApiError> {
    let details = QueryReservationService::with_details(db, vec![reservation.clone()])
        .await?
        .pop()
        .unwrap_or(ReservationDetails {
            reservation,
            court_name: None,
            venue_id: None,
            venue_name: None,
        });

    Ok(details.into())
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::{app, claims, send};
    use axum::{Router, http::Method, http::StatusCode};
    use database::test_support::{insert_court, insert_user, insert_venue, setup_db};
    use models::Role;
    use serde_json::{Value, json};

    struct Fixture {
        app: Router,
        owner_id: i64,
        court_id: i64,
    }

    async fn fixture() -> Fixture {
        let db = setup_db().await;
        let owner = insert_user(&db, Role::Propietario).await;
        let venue = insert_venue(&db, Some(owner.id), "Complejo Sur").await;
        let court = insert_court(&db, venue.id, "Cancha 1").await;

        Fixture {
            app: app(db),
            owner_id: owner.id,
            court_id: court.id,
        }
    }

    fn booking(court_id: i64, start: &str, end: &str) -> Value {
        json!({
            "court_id": court_id,
            "start_at": start,
            "end_at": end,
            "total_amount": 100,
            "paid_amount": 40,
            "payment_method": "efectivo"
        })
    }

    #[tokio::test]
    async fn test_create_returns_enriched_reservation() {
        let f = fixture().await;
        let owner = claims(f.owner_id, Role::Propietario);

        let reply = send(
            &f.app,
            Method::POST,
            "/panel/reservations",
            Some(owner.clone()),
            Some(booking(f.court_id, "2025-03-01T10:00:00", "2025-03-01T11:00:00")),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CREATED);

        let body = reply.json();
        assert_eq!(body["court_id"], f.court_id);
        assert_eq!(body["court_name"], "Cancha 1");
        assert_eq!(body["venue_name"], "Complejo Sur");
        assert_eq!(body["payment_status"], "parcial");
        assert_eq!(body["total_amount"].as_f64(), Some(100.0));
        assert_eq!(body["paid_amount"].as_f64(), Some(40.0));
        assert_eq!(body["created_by"], f.owner_id);
        assert_eq!(body["start_at"], "2025-03-01T10:00:00");
    }

    #[tokio::test]
    async fn test_overlapping_create_conflicts_with_window() {
        let f = fixture().await;
        let owner = claims(f.owner_id, Role::Propietario);

        let first = send(
            &f.app,
            Method::POST,
            "/panel/reservations",
            Some(owner.clone()),
            Some(booking(f.court_id, "2025-03-01T10:00:00", "2025-03-01T11:00:00")),
        )
        .await;
        assert_eq!(first.status, StatusCode::CREATED);

        let reply = send(
            &f.app,
            Method::POST,
            "/panel/reservations",
            Some(owner),
            Some(booking(f.court_id, "2025-03-01T10:30:00", "2025-03-01T12:00:00")),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CONFLICT);

        let body = reply.json();
        assert_eq!(body["code"], "CONFLICT");
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("2025-03-01 10:00:00"), "{message}");
        assert!(message.contains("2025-03-01 11:00:00"), "{message}");
    }

    #[tokio::test]
    async fn test_invalid_window_and_oversized_amount_are_bad_requests() {
        let f = fixture().await;
        let owner = claims(f.owner_id, Role::Propietario);

        let inverted = send(
            &f.app,
            Method::POST,
            "/panel/reservations",
            Some(owner.clone()),
            Some(booking(f.court_id, "2025-03-01T11:00:00", "2025-03-01T10:00:00")),
        )
        .await;
        assert_eq!(inverted.status, StatusCode::BAD_REQUEST);
        assert_eq!(inverted.json()["code"], "VALIDATION_ERROR");

        let mut huge = booking(f.court_id, "2025-03-01T10:00:00", "2025-03-01T11:00:00");
        huge["total_amount"] = json!(1_000_000_000);
        let reply = send(&f.app, Method::POST, "/panel/reservations", Some(owner), Some(huge)).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.json()["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_payment_and_cancel_round_trip() {
        let f = fixture().await;
        let owner = claims(f.owner_id, Role::Propietario);

        let created = send(
            &f.app,
            Method::POST,
            "/panel/reservations",
            Some(owner.clone()),
            Some(booking(f.court_id, "2025-03-02T18:00:00", "2025-03-02T19:00:00")),
        )
        .await
        .json();
        let id = created["id"].as_i64().unwrap();

        let paid = send(
            &f.app,
            Method::PUT,
            &format!("/panel/reservations/{id}/payment"),
            Some(owner.clone()),
            Some(json!({ "add_paid": 500, "payment_method": "yape" })),
        )
        .await;
        assert_eq!(paid.status, StatusCode::OK);
        let body = paid.json();
        assert_eq!(body["paid_amount"].as_f64(), Some(100.0));
        assert_eq!(body["payment_status"], "pagada");
        assert_eq!(body["payment_method"], "yape");

        let cancelled = send(
            &f.app,
            Method::PUT,
            &format!("/panel/reservations/{id}/cancel"),
            Some(owner.clone()),
            None,
        )
        .await;
        assert_eq!(cancelled.status, StatusCode::OK);
        assert_eq!(cancelled.json()["payment_status"], "cancelada");

        let reply = send(
            &f.app,
            Method::PUT,
            &format!("/panel/reservations/{id}/payment"),
            Some(owner),
            Some(json!({ "mark_paid_full": true })),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CONFLICT);
        assert_eq!(reply.json()["code"], "INVALID_STATE");
    }

    #[tokio::test]
    async fn test_customers_cannot_change_bookings() {
        let f = fixture().await;
        let owner = claims(f.owner_id, Role::Propietario);
        let created = send(
            &f.app,
            Method::POST,
            "/panel/reservations",
            Some(owner),
            Some(booking(f.court_id, "2025-03-03T09:00:00", "2025-03-03T10:00:00")),
        )
        .await
        .json();
        let id = created["id"].as_i64().unwrap();
        let customer = claims(f.owner_id + 1, Role::Usuario);

        let create = send(
            &f.app,
            Method::POST,
            "/panel/reservations",
            Some(customer.clone()),
            Some(booking(f.court_id, "2025-03-04T09:00:00", "2025-03-04T10:00:00")),
        )
        .await;
        let pay = send(
            &f.app,
            Method::PUT,
            &format!("/panel/reservations/{id}/payment"),
            Some(customer.clone()),
            Some(json!({ "add_paid": 10 })),
        )
        .await;
        let cancel = send(
            &f.app,
            Method::PUT,
            &format!("/panel/reservations/{id}/cancel"),
            Some(customer.clone()),
            None,
        )
        .await;

        for reply in [create, pay, cancel] {
            assert_eq!(reply.status, StatusCode::FORBIDDEN);
            assert_eq!(reply.json()["code"], "FORBIDDEN");
        }

        // Listing is allowed, scoped to the customer's own bookings
        let listed = send(&f.app, Method::GET, "/panel/reservations", Some(customer), None).await;
        assert_eq!(listed.status, StatusCode::OK);
        assert_eq!(listed.json(), json!([]));
    }

    #[tokio::test]
    async fn test_missing_claims_are_unauthenticated() {
        let f = fixture().await;

        let reply = send(&f.app, Method::GET, "/panel/reservations", None, None).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply.json()["code"], "UNAUTHENTICATED");
    }
}
