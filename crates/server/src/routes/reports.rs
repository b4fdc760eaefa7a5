use crate::{
    auth::{CurrentPrincipal, require_staff},
    dtos::reservation::ReservationQueryParams,
    error::ApiError,
    state::AppState,
};
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use database::services::reservation::ReservationService;
use models::Principal;
use reports::ReportRow;

const REPORT_TITLE: &str = "Reservations report";

/// Export reservations as CSV
#[utoipa::path(
    get,
    path = "/panel/reservations/export.csv",
    params(ReservationQueryParams),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 403, description = "Caller is not an owner or admin")
    ),
    security(("jwt" = [])),
    tag = "Reports"
)]
pub async fn export_csv(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Query(params): Query<ReservationQueryParams>,
) -> Result<Response, ApiError> {
    let rows = report_rows(&state, &actor, &params).await?;
    let body = reports::to_csv(&rows)?;

    Ok(attachment(
        "text/csv; charset=utf-8",
        reports::export_filename(params.single_day(), "csv"),
        body,
    ))
}

/// Export reservations as a paginated plain-text report for printing
#[utoipa::path(
    get,
    path = "/panel/reservations/export.txt",
    params(ReservationQueryParams),
    responses(
        (status = 200, description = "Printable report", content_type = "text/plain", body = String),
        (status = 403, description = "Caller is not an owner or admin")
    ),
    security(("jwt" = [])),
    tag = "Reports"
)]
pub async fn export_printable(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Query(params): Query<ReservationQueryParams>,
) -> Result<Response, ApiError> {
    let rows = report_rows(&state, &actor, &params).await?;
    let body = reports::render_printable(REPORT_TITLE, &rows);

    Ok(attachment(
        "text/plain; charset=utf-8",
        reports::export_filename(params.single_day(), "txt"),
        body.into_bytes(),
    ))
}

async fn report_rows(
    state: &AppState,
    actor: &Principal,
    params: &ReservationQueryParams,
) -> Result<Vec<ReportRow>, ApiError> {
    require_staff(actor)?;

    let mut filter = params.filter();
    filter.court_id = None;
    let reservations = ReservationService::list_reservations(&state.db, actor, filter).await?;

    Ok(reservations.iter().map(ReportRow::from).collect())
}

fn attachment(content_type: &'static str, filename: String, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::{app, claims, send};
    use axum::http::{Method, StatusCode, header};
    use database::test_support::{insert_court, insert_user, insert_venue, setup_db};
    use models::Role;
    use serde_json::json;

    #[tokio::test]
    async fn test_exports_are_staff_only_attachments() {
        let db = setup_db().await;
        let owner = insert_user(&db, Role::Propietario).await;
        let venue = insert_venue(&db, Some(owner.id), "Complejo Sur").await;
        let court = insert_court(&db, venue.id, "Cancha 1").await;
        let app = app(db);
        let customer = claims(owner.id + 1, Role::Usuario);
        let owner = claims(owner.id, Role::Propietario);

        let created = send(
            &app,
            Method::POST,
            "/panel/reservations",
            Some(owner.clone()),
            Some(json!({
                "court_id": court.id,
                "start_at": "2025-03-01T10:00:00",
                "end_at": "2025-03-01T11:00:00",
                "total_amount": 80,
                "payment_method": "yape"
            })),
        )
        .await;
        assert_eq!(created.status, StatusCode::CREATED);

        for uri in [
            "/panel/reservations/export.csv",
            "/panel/reservations/export.txt",
        ] {
            let reply = send(&app, Method::GET, uri, Some(customer.clone()), None).await;
            assert_eq!(reply.status, StatusCode::FORBIDDEN);
        }

        let csv = send(
            &app,
            Method::GET,
            "/panel/reservations/export.csv?date=2025-03-01",
            Some(owner.clone()),
            None,
        )
        .await;
        assert_eq!(csv.status, StatusCode::OK);
        assert_eq!(
            csv.headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"reservations_2025-03-01.csv\""
        );
        assert!(
            csv.headers[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/csv")
        );
        let text = csv.text();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Court,Start,End,Amount,Paid,Payment method,Status")
        );
        assert_eq!(
            lines.next(),
            Some("Cancha 1,2025-03-01 10:00,2025-03-01 11:00,80.00,0.00,yape,pendiente")
        );
        assert_eq!(lines.next(), None);

        let printable = send(
            &app,
            Method::GET,
            "/panel/reservations/export.txt",
            Some(owner),
            None,
        )
        .await;
        assert_eq!(printable.status, StatusCode::OK);
        assert_eq!(
            printable.headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"reservations.txt\""
        );
        assert!(printable.text().contains("S/80.00"));
    }
}
