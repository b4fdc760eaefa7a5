use crate::{
    ServiceError, ServiceResult,
    entities::reservations,
    services::{
        catalog::CatalogService,
        query_reservation::{QueryReservationService, ReservationDetails, ReservationFilter},
    },
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use log::{info, warn};
use models::{
    AMOUNT_CEILING, DayRange, PaymentStatus, Principal, TimeWindow, Visibility, is_authorized,
    month_bounds, stored_amount,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, DatabaseConnection, DbErr,
    TransactionTrait,
};

#[derive(Debug, Clone)]
pub struct NewReservation {
    pub court_id: i64,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub customer_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentUpdate {
    pub add_paid: Decimal,
    pub payment_method: Option<String>,
    pub mark_paid_full: bool,
}

pub struct ReservationService;

impl ReservationService {
    /// Oldest and newest year accepted by the month listing
    const MONTH_YEARS: std::ops::RangeInclusive<i32> = 2000..=2100;

    /// Book a court slot for the actor's venue.
    ///
    /// The court row is locked for the duration of the transaction, so two
    /// overlapping requests for the same court cannot both pass the overlap
    /// check.
    pub async fn create_reservation(
        db: &DatabaseConnection,
        actor: &Principal,
        new: NewReservation,
    ) -> ServiceResult<reservations::Model> {
        let window = TimeWindow::new(new.start_at, new.end_at)
            .ok_or_else(|| ServiceError::validation("end_at must be after start_at"))?;
        let total = non_negative("total_amount", new.total_amount)?;
        let paid = non_negative("paid_amount", new.paid_amount)?;
        if paid > total {
            return Err(ServiceError::validation(
                "paid_amount cannot exceed total_amount",
            ));
        }

        let txn = db.begin().await?;

        let court = CatalogService::resolve_court_for_update(&txn, new.court_id).await?;
        if !is_authorized(actor, court.owner_id) {
            return Err(ServiceError::unauthorized(format!(
                "court {} is managed by another owner",
                court.id
            )));
        }

        if let Some(existing) =
            QueryReservationService::find_overlapping(&txn, court.id, &window).await?
        {
            warn!(
                "Rejected booking on court {} for {} - {}: overlaps reservation {}",
                court.id, window.start, window.end, existing.id
            );
            return Err(ServiceError::Conflict(format!(
                "court {} is already booked from {} to {}",
                court.id, existing.start_at, existing.end_at
            )));
        }

        let now = Utc::now().naive_utc();
        let reservation = reservations::ActiveModel {
            court_id: Set(court.id),
            customer_id: Set(new.customer_id),
            start_at: Set(window.start),
            end_at: Set(window.end),
            total_amount: Set(total),
            paid_amount: Set(paid),
            payment_method: Set(clean_text(new.payment_method)),
            payment_status: Set(PaymentStatus::from_amounts(total, paid)),
            notes: Set(clean_text(new.notes)),
            created_by: Set(Some(actor.id)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(overlap_conflict)?;

        txn.commit().await.map_err(overlap_conflict)?;
        info!(
            "Reservation {} created on court {} ({} - {}) by user {}",
            reservation.id, court.id, window.start, window.end, actor.id
        );

        Ok(reservation)
    }

    /// Add a payment to a reservation, or settle it entirely
    pub async fn record_payment(
        db: &DatabaseConnection,
        actor: &Principal,
        reservation_id: i64,
        update: PaymentUpdate,
    ) -> ServiceResult<reservations::Model> {
        if update.add_paid < Decimal::ZERO {
            return Err(ServiceError::validation("add_paid must not be negative"));
        }
        let add_paid = update.add_paid.round_dp(2);

        let txn = db.begin().await?;
        let reservation = Self::find_managed_for_update(&txn, actor, reservation_id).await?;

        if reservation.payment_status.is_cancelled() {
            return Err(ServiceError::State(format!(
                "reservation {reservation_id} is cancelled"
            )));
        }

        let total = reservation.total_amount;
        let paid = if update.mark_paid_full {
            total
        } else {
            // Anything past the total is clamped, including sums beyond Decimal's range
            reservation
                .paid_amount
                .checked_add(add_paid)
                .map_or(total, |paid| paid.min(total))
        };
        let status = PaymentStatus::from_amounts(total, paid);

        let mut active: reservations::ActiveModel = reservation.into();
        active.paid_amount = Set(paid);
        active.payment_status = Set(status);
        if let Some(method) = clean_text(update.payment_method) {
            active.payment_method = Set(Some(method));
        }
        active.updated_at = Set(Utc::now().naive_utc());
        let reservation = active.update(&txn).await?;

        txn.commit().await?;
        info!(
            "Payment recorded on reservation {}: paid {} of {} ({})",
            reservation.id, reservation.paid_amount, reservation.total_amount, status
        );

        Ok(reservation)
    }

    /// Cancel a reservation, releasing its slot. Cancelling twice is a no-op.
    pub async fn cancel_reservation(
        db: &DatabaseConnection,
        actor: &Principal,
        reservation_id: i64,
    ) -> ServiceResult<reservations::Model> {
        let txn = db.begin().await?;
        let reservation = Self::find_managed_for_update(&txn, actor, reservation_id).await?;

        if reservation.payment_status.is_cancelled() {
            txn.commit().await?;
            return Ok(reservation);
        }

        let mut active: reservations::ActiveModel = reservation.into();
        active.payment_status = Set(PaymentStatus::Cancelada);
        active.updated_at = Set(Utc::now().naive_utc());
        let reservation = active.update(&txn).await?;

        txn.commit().await?;
        info!("Reservation {} cancelled by user {}", reservation.id, actor.id);

        Ok(reservation)
    }

    /// Reservations the actor may see, narrowed by `filter`
    pub async fn list_reservations(
        db: &DatabaseConnection,
        actor: &Principal,
        filter: ReservationFilter,
    ) -> ServiceResult<Vec<ReservationDetails>> {
        if filter.range.is_inverted() {
            return Err(ServiceError::validation("date_from must not be after date_to"));
        }

        let visibility = Visibility::for_principal(actor);
        let reservations = QueryReservationService::list(db, visibility, &filter).await?;

        Ok(QueryReservationService::with_details(db, reservations).await?)
    }

    /// Reservations intersecting the days `from..=to`
    pub async fn list_reservations_in_range(
        db: &DatabaseConnection,
        actor: &Principal,
        from: NaiveDate,
        to: NaiveDate,
        court_id: Option<i64>,
    ) -> ServiceResult<Vec<ReservationDetails>> {
        if to < from {
            return Err(ServiceError::validation("to must not be before from"));
        }

        let filter = ReservationFilter {
            court_id,
            range: DayRange::between(from, to),
            search: None,
        };
        Self::list_reservations(db, actor, filter).await
    }

    /// Reservations starting within the given calendar month
    pub async fn list_reservations_for_month(
        db: &DatabaseConnection,
        actor: &Principal,
        year: i32,
        month: u32,
    ) -> ServiceResult<Vec<ReservationDetails>> {
        if !Self::MONTH_YEARS.contains(&year) {
            return Err(ServiceError::validation(format!(
                "year must be between {} and {}",
                Self::MONTH_YEARS.start(),
                Self::MONTH_YEARS.end()
            )));
        }
        let (start, end) = month_bounds(year, month)
            .ok_or_else(|| ServiceError::validation("month must be between 1 and 12"))?;

        let visibility = Visibility::for_principal(actor);
        let reservations =
            QueryReservationService::list_starting_between(db, visibility, start, end).await?;

        Ok(QueryReservationService::with_details(db, reservations).await?)
    }

    async fn find_managed_for_update<C: ConnectionTrait>(
        txn: &C,
        actor: &Principal,
        reservation_id: i64,
    ) -> ServiceResult<reservations::Model> {
        let reservation = QueryReservationService::find_by_id_for_update(txn, reservation_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("reservation", reservation_id))?;

        let court = CatalogService::resolve_court(txn, reservation.court_id).await?;
        if !is_authorized(actor, court.owner_id) {
            return Err(ServiceError::unauthorized(format!(
                "reservation {reservation_id} belongs to another owner"
            )));
        }

        Ok(reservation)
    }
}

fn non_negative(field: &str, amount: Decimal) -> ServiceResult<Decimal> {
    if amount < Decimal::ZERO {
        return Err(ServiceError::validation(format!(
            "{field} must not be negative"
        )));
    }
    stored_amount(amount).ok_or_else(|| {
        ServiceError::validation(format!("{field} must be less than {AMOUNT_CEILING}"))
    })
}

fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// The database-level exclusion constraint backs up the overlap check
fn overlap_conflict(err: DbErr) -> ServiceError {
    if err.to_string().contains(migration::OVERLAP_CONSTRAINT) {
        ServiceError::Conflict("time slot overlaps an existing reservation".to_owned())
    } else {
        ServiceError::Db(err)
    }
}
