use crate::entities::{courts, reservations, users, venues};
use chrono::NaiveDateTime;
use models::{DayRange, PaymentStatus, TimeWindow, Visibility};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
    sea_query::{Expr, Func, LikeExpr},
};
use std::collections::HashMap;

const LIKE_ESCAPE: char = '\\';

/// Narrowing applied on top of the caller's visibility
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub court_id: Option<i64>,
    pub range: DayRange,
    pub search: Option<String>,
}

/// A reservation enriched with the names shown in listings
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationDetails {
    pub reservation: reservations::Model,
    pub court_name: Option<String>,
    pub venue_id: Option<i64>,
    pub venue_name: Option<String>,
}

pub struct QueryReservationService;

impl QueryReservationService {
    /// Fetch a reservation and lock its row until the transaction ends
    pub async fn find_by_id_for_update<C: ConnectionTrait>(
        db: &C,
        id: i64,
    ) -> Result<Option<reservations::Model>, DbErr> {
        reservations::Entity::find_by_id(id)
            .lock_exclusive()
            .one(db)
            .await
    }

    /// First non-cancelled reservation on the court overlapping `window`
    pub async fn find_overlapping<C: ConnectionTrait>(
        db: &C,
        court_id: i64,
        window: &TimeWindow,
    ) -> Result<Option<reservations::Model>, DbErr> {
        reservations::Entity::find()
            .filter(reservations::Column::CourtId.eq(court_id))
            .filter(reservations::Column::PaymentStatus.ne(PaymentStatus::Cancelada))
            .filter(reservations::Column::StartAt.lt(window.end))
            .filter(reservations::Column::EndAt.gt(window.start))
            .order_by_asc(reservations::Column::StartAt)
            .one(db)
            .await
    }

    /// Reservations visible under `visibility` that match `filter`, earliest first
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        visibility: Visibility,
        filter: &ReservationFilter,
    ) -> Result<Vec<reservations::Model>, DbErr> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(&s.to_lowercase())));

        let mut query = reservations::Entity::find();
        let mut condition = Self::visibility_condition(visibility);

        let owner_scoped = matches!(visibility, Visibility::Owner(_));
        if owner_scoped || search.is_some() {
            query = query.join(JoinType::InnerJoin, reservations::Relation::Court.def());
        }
        if owner_scoped {
            query = query.join(JoinType::InnerJoin, courts::Relation::Venue.def());
        }

        if let Some(court_id) = filter.court_id {
            condition = condition.add(reservations::Column::CourtId.eq(court_id));
        }
        if let Some(end) = filter.range.end {
            condition = condition.add(reservations::Column::StartAt.lte(end));
        }
        if let Some(start) = filter.range.start {
            condition = condition.add(reservations::Column::EndAt.gte(start));
        }

        if let Some(pattern) = search {
            query = query.join(JoinType::LeftJoin, reservations::Relation::Customer.def());
            condition = condition.add(Self::search_condition(&pattern));
        }

        query
            .filter(condition)
            .order_by_asc(reservations::Column::StartAt)
            .order_by_asc(reservations::Column::Id)
            .all(db)
            .await
    }

    /// Reservations visible under `visibility` starting in `[start, end)`
    pub async fn list_starting_between<C: ConnectionTrait>(
        db: &C,
        visibility: Visibility,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<reservations::Model>, DbErr> {
        let mut query = reservations::Entity::find();
        if matches!(visibility, Visibility::Owner(_)) {
            query = query
                .join(JoinType::InnerJoin, reservations::Relation::Court.def())
                .join(JoinType::InnerJoin, courts::Relation::Venue.def());
        }

        query
            .filter(Self::visibility_condition(visibility))
            .filter(reservations::Column::StartAt.gte(start))
            .filter(reservations::Column::StartAt.lt(end))
            .order_by_asc(reservations::Column::StartAt)
            .order_by_asc(reservations::Column::Id)
            .all(db)
            .await
    }

    /// Attach court and venue names, fetching each table once
    pub async fn with_details<C: ConnectionTrait>(
        db: &C,
        reservations: Vec<reservations::Model>,
    ) -> Result<Vec<ReservationDetails>, DbErr> {
        if reservations.is_empty() {
            return Ok(vec![]);
        }

        let mut court_ids: Vec<i64> = reservations.iter().map(|r| r.court_id).collect();
        court_ids.sort_unstable();
        court_ids.dedup();

        let courts: HashMap<i64, courts::Model> = courts::Entity::find()
            .filter(courts::Column::Id.is_in(court_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut venue_ids: Vec<i64> = courts.values().map(|c| c.venue_id).collect();
        venue_ids.sort_unstable();
        venue_ids.dedup();

        let venue_names: HashMap<i64, String> = venues::Entity::find()
            .filter(venues::Column::Id.is_in(venue_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|v| (v.id, v.name))
            .collect();

        Ok(reservations
            .into_iter()
            .map(|reservation| {
                let court = courts.get(&reservation.court_id);
                let venue_id = court.map(|c| c.venue_id);
                ReservationDetails {
                    court_name: court.map(|c| c.name.clone()),
                    venue_name: venue_id.and_then(|id| venue_names.get(&id).cloned()),
                    venue_id,
                    reservation,
                }
            })
            .collect())
    }

    fn visibility_condition(visibility: Visibility) -> Condition {
        match visibility {
            Visibility::Customer(id) => {
                Condition::all().add(reservations::Column::CustomerId.eq(id))
            }
            Visibility::Owner(id) => Condition::all().add(venues::Column::OwnerId.eq(id)),
            Visibility::All => Condition::all(),
        }
    }

    /// Case-insensitive substring match over customer, court and status
    fn search_condition(pattern: &str) -> Condition {
        let lowered = |col: Expr| {
            Expr::expr(Func::lower(col)).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
        };

        Condition::any()
            .add(lowered(Expr::col((users::Entity, users::Column::FirstName))))
            .add(lowered(Expr::col((users::Entity, users::Column::LastName))))
            .add(lowered(Expr::col((users::Entity, users::Column::Email))))
            .add(lowered(Expr::col((courts::Entity, courts::Column::Name))))
            .add(lowered(Expr::col((
                reservations::Entity,
                reservations::Column::PaymentStatus,
            ))))
    }
}

/// Match `%`, `_` and the escape character literally in a LIKE pattern
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
