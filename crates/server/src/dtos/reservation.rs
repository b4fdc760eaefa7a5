use chrono::{NaiveDate, NaiveDateTime};
use database::services::{
    query_reservation::{ReservationDetails, ReservationFilter},
    reservation::{NewReservation, PaymentUpdate},
};
use models::{DayRange, PaymentStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationResponse {
    pub id: i64,
    pub court_id: i64,
    pub court_name: Option<String>,
    pub venue_id: Option<i64>,
    pub venue_name: Option<String>,
    pub customer_id: Option<i64>,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub payment_method: Option<String>,
    #[schema(value_type = String, example = "parcial")]
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ReservationDetails> for ReservationResponse {
    fn from(details: ReservationDetails) -> Self {
        let r = details.reservation;
        Self {
            id: r.id,
            court_id: r.court_id,
            court_name: details.court_name,
            venue_id: details.venue_id,
            venue_name: details.venue_name,
            customer_id: r.customer_id,
            start_at: r.start_at,
            end_at: r.end_at,
            total_amount: r.total_amount,
            paid_amount: r.paid_amount,
            payment_method: r.payment_method,
            payment_status: r.payment_status,
            notes: r.notes,
            created_by: r.created_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    pub court_id: i64,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub total_amount: Decimal,
    #[serde(default)]
    pub paid_amount: Decimal,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    /// Registered customer; omit for walk-ins
    pub customer_id: Option<i64>,
}

impl From<CreateReservationRequest> for NewReservation {
    fn from(req: CreateReservationRequest) -> Self {
        Self {
            court_id: req.court_id,
            start_at: req.start_at,
            end_at: req.end_at,
            total_amount: req.total_amount,
            paid_amount: req.paid_amount,
            payment_method: req.payment_method,
            notes: req.notes,
            customer_id: req.customer_id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentRequest {
    #[serde(default)]
    pub add_paid: Decimal,
    pub payment_method: Option<String>,
    /// Settle the whole total, ignoring `add_paid`
    #[serde(default)]
    pub mark_paid_full: bool,
}

impl From<PaymentRequest> for PaymentUpdate {
    fn from(req: PaymentRequest) -> Self {
        Self {
            add_paid: req.add_paid,
            payment_method: req.payment_method,
            mark_paid_full: req.mark_paid_full,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReservationQueryParams {
    pub court_id: Option<i64>,
    /// A single day; ignored when `date_from` or `date_to` is given
    pub date: Option<NaiveDate>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Matches customer name or email, court name and payment status
    pub q: Option<String>,
}

impl ReservationQueryParams {
    pub fn filter(&self) -> ReservationFilter {
        ReservationFilter {
            court_id: self.court_id,
            range: DayRange::from_params(self.date, self.date_from, self.date_to),
            search: self.q.clone(),
        }
    }

    /// The day an export covers, when exactly one was requested
    pub fn single_day(&self) -> Option<NaiveDate> {
        match (self.date, self.date_from, self.date_to) {
            (Some(day), None, None) => Some(day),
            (_, Some(from), Some(to)) if from == to => Some(from),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RangeQueryParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub court_id: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthQueryParams {
    pub year: i32,
    pub month: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn test_single_date_covers_whole_day() {
        let params = ReservationQueryParams {
            date: Some(day(3)),
            ..Default::default()
        };
        let filter = params.filter();

        assert_eq!(filter.range, DayRange::between(day(3), day(3)));
        assert_eq!(params.single_day(), Some(day(3)));
    }

    #[test]
    fn test_explicit_range_wins_over_date() {
        let params = ReservationQueryParams {
            date: Some(day(3)),
            date_from: Some(day(1)),
            q: Some("ana".to_owned()),
            ..Default::default()
        };
        let filter = params.filter();

        assert!(filter.range.start.is_some());
        assert!(filter.range.end.is_none());
        assert_eq!(filter.search.as_deref(), Some("ana"));
        assert_eq!(params.single_day(), None);
    }

    #[test]
    fn test_create_request_defaults() {
        let req: CreateReservationRequest = serde_json::from_str(
            r#"{"court_id": 4, "start_at": "2025-06-03T10:00:00", "end_at": "2025-06-03T11:00:00", "total_amount": 80}"#,
        )
        .unwrap();
        let new = NewReservation::from(req);

        assert_eq!(new.paid_amount, Decimal::ZERO);
        assert_eq!(new.total_amount, Decimal::from(80));
        assert_eq!(new.customer_id, None);
    }
}
