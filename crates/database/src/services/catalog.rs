use crate::{
    ServiceError, ServiceResult,
    entities::{court_images, courts, plans, subscriptions, users, venues},
};
use chrono::Utc;
use log::info;
use models::{AMOUNT_CEILING, PlanTier, Principal, is_authorized, slug, stored_amount};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    SqlErr, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

/// A court together with the owner derived from its venue
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCourt {
    pub id: i64,
    pub venue_id: i64,
    pub owner_id: Option<i64>,
    pub active: bool,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewVenue {
    pub name: String,
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
    /// Only honoured for admins; owners always create venues for themselves
    pub owner_id: Option<i64>,
}

/// Partial update of a venue; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct VenueChanges {
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

#[derive(Debug, Clone)]
pub struct NewCourt {
    pub venue_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sport: String,
    pub surface: String,
    pub hourly_price: Decimal,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CourtChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sport: Option<String>,
    pub surface: Option<String>,
    pub hourly_price: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct CourtEntry {
    pub court: courts::Model,
    pub images: Vec<court_images::Model>,
}

/// A public venue with its active courts and the owner's contact phone
#[derive(Debug, Clone)]
pub struct VenueEntry {
    pub venue: venues::Model,
    pub owner_phone: Option<String>,
    pub courts: Vec<CourtEntry>,
}

/// A public court listed with the venue it belongs to
#[derive(Debug, Clone)]
pub struct CourtListing {
    pub court: courts::Model,
    pub venue: venues::Model,
    pub owner_phone: Option<String>,
    pub images: Vec<court_images::Model>,
}

pub struct CatalogService;

impl CatalogService {
    /// Resolve a court and the owner of its venue
    pub async fn resolve_court<C: ConnectionTrait>(
        db: &C,
        court_id: i64,
    ) -> ServiceResult<ResolvedCourt> {
        Self::resolve(db, court_id, false).await
    }

    /// Same as [`Self::resolve_court`] but takes a row lock on the court for
    /// the rest of the transaction, serializing bookings on it
    pub async fn resolve_court_for_update<C: ConnectionTrait>(
        db: &C,
        court_id: i64,
    ) -> ServiceResult<ResolvedCourt> {
        Self::resolve(db, court_id, true).await
    }

    async fn resolve<C: ConnectionTrait>(
        db: &C,
        court_id: i64,
        lock: bool,
    ) -> ServiceResult<ResolvedCourt> {
        let mut query = courts::Entity::find_by_id(court_id);
        if lock {
            query = query.lock_exclusive();
        }

        let court = query
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("court", court_id))?;

        // Locked separately; FOR UPDATE is not allowed on the nullable side of an outer join
        let venue = venues::Entity::find_by_id(court.venue_id).one(db).await?;

        Ok(ResolvedCourt {
            id: court.id,
            venue_id: court.venue_id,
            owner_id: venue.and_then(|v| v.owner_id),
            active: court.is_active,
            name: court.name,
        })
    }

    /// The plan the user is subscribed to, falling back to the default plan
    pub async fn current_plan<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
    ) -> Result<Option<PlanTier>, DbErr> {
        let subscribed = subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .order_by_desc(subscriptions::Column::StartedAt)
            .order_by_desc(subscriptions::Column::Id)
            .find_also_related(plans::Entity)
            .one(db)
            .await?
            .and_then(|(_, plan)| plan);

        let plan = match subscribed {
            Some(plan) => Some(plan),
            None => {
                plans::Entity::find()
                    .order_by_asc(plans::Column::Id)
                    .one(db)
                    .await?
            }
        };

        Ok(plan.map(|p| PlanTier {
            code: p.code,
            name: p.name,
            max_venues: p.max_venues,
        }))
    }

    pub async fn create_venue(
        db: &DatabaseConnection,
        actor: &Principal,
        new: NewVenue,
    ) -> ServiceResult<venues::Model> {
        require_staff(actor)?;
        let name = required_text("venue name", &new.name)?;

        let txn = db.begin().await?;

        let owner_id = if actor.is_admin() {
            if let Some(owner_id) = new.owner_id {
                users::Entity::find_by_id(owner_id)
                    .one(&txn)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("user", owner_id))?;
            }
            new.owner_id
        } else {
            // Held until commit, so concurrent creations by one owner count each other
            users::Entity::find_by_id(actor.id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or_else(|| ServiceError::not_found("user", actor.id))?;

            let plan = Self::current_plan(&txn, actor.id).await?;
            let limit = PlanTier::venue_limit(plan.as_ref());
            let owned = venues::Entity::find()
                .filter(venues::Column::OwnerId.eq(actor.id))
                .count(&txn)
                .await?;
            if owned >= limit {
                return Err(ServiceError::LimitReached { limit });
            }
            Some(actor.id)
        };

        let now = Utc::now().naive_utc();
        let base = slug::slug_base(&name);

        // The id is needed to disambiguate the slug, so insert under a throwaway one first
        let venue = venues::ActiveModel {
            name: Set(name),
            slug: Set(format!("{base}-tmp-{}", Uuid::new_v4().simple())),
            description: Set(new.description),
            address: Set(new.address),
            district: Set(new.district),
            province: Set(new.province),
            department: Set(new.department),
            latitude: Set(new.latitude),
            longitude: Set(new.longitude),
            covered: Set(new.covered),
            lighting: Set(new.lighting),
            changing_rooms: Set(new.changing_rooms),
            parking: Set(new.parking),
            cafeteria: Set(new.cafeteria),
            photo_url: Set(new.photo_url),
            is_active: Set(new.is_active),
            owner_id: Set(owner_id),
            created_by: Set(Some(actor.id)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let taken = slug_taken(&txn, &base, venue.id).await?;
        let venue_id = venue.id;
        let mut active: venues::ActiveModel = venue.into();
        active.slug = Set(slug::disambiguate(&base, venue_id, taken));
        let venue = active.update(&txn).await.map_err(slug_conflict)?;

        txn.commit().await?;
        info!(
            "Venue {} created with slug {} by user {}",
            venue.id, venue.slug, actor.id
        );

        Ok(venue)
    }

    pub async fn update_venue(
        db: &DatabaseConnection,
        actor: &Principal,
        venue_id: i64,
        changes: VenueChanges,
    ) -> ServiceResult<venues::Model> {
        let venue = Self::get_managed_venue(db, actor, venue_id).await?;
        let mut active: venues::ActiveModel = venue.into();

        if let Some(name) = changes.name {
            active.name = Set(required_text("venue name", &name)?);
        }
        if let Some(requested) = changes.slug {
            let slug = slug::slugify(&requested);
            if slug.is_empty() {
                return Err(ServiceError::validation("slug must contain letters or digits"));
            }
            if slug_taken(db, &slug, venue_id).await? {
                return Err(ServiceError::Conflict(format!("slug {slug} is already in use")));
            }
            active.slug = Set(slug);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(address) = changes.address {
            active.address = Set(Some(address));
        }
        if let Some(district) = changes.district {
            active.district = Set(Some(district));
        }
        if let Some(province) = changes.province {
            active.province = Set(Some(province));
        }
        if let Some(department) = changes.department {
            active.department = Set(Some(department));
        }
        if let Some(latitude) = changes.latitude {
            active.latitude = Set(Some(latitude));
        }
        if let Some(longitude) = changes.longitude {
            active.longitude = Set(Some(longitude));
        }
        if let Some(covered) = changes.covered {
            active.covered = Set(covered);
        }
        if let Some(lighting) = changes.lighting {
            active.lighting = Set(lighting);
        }
        if let Some(changing_rooms) = changes.changing_rooms {
            active.changing_rooms = Set(changing_rooms);
        }
        if let Some(parking) = changes.parking {
            active.parking = Set(parking);
        }
        if let Some(cafeteria) = changes.cafeteria {
            active.cafeteria = Set(cafeteria);
        }
        if let Some(photo_url) = changes.photo_url {
            active.photo_url = Set(Some(photo_url));
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().naive_utc());

        Ok(active.update(db).await.map_err(slug_conflict)?)
    }

    /// Hand a venue to an owner account. Admin only.
    pub async fn assign_venue_owner(
        db: &DatabaseConnection,
        actor: &Principal,
        venue_id: i64,
        user_id: i64,
    ) -> ServiceResult<venues::Model> {
        if !actor.is_admin() {
            return Err(ServiceError::unauthorized("only admins can assign venue owners"));
        }

        let venue = venues::Entity::find_by_id(venue_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("venue", venue_id))?;
        let user = users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", user_id))?;

        if !user.role.is_staff() {
            return Err(ServiceError::validation(format!(
                "user {user_id} cannot own venues"
            )));
        }

        let mut active: venues::ActiveModel = venue.into();
        active.owner_id = Set(Some(user.id));
        active.updated_at = Set(Utc::now().naive_utc());
        let venue = active.update(db).await?;

        info!("Venue {} assigned to owner {}", venue.id, user.id);
        Ok(venue)
    }

    /// Venues the actor manages, newest first
    pub async fn list_managed_venues(
        db: &DatabaseConnection,
        actor: &Principal,
    ) -> ServiceResult<Vec<venues::Model>> {
        require_staff(actor)?;

        let mut query = venues::Entity::find();
        if !actor.is_admin() {
            query = query.filter(venues::Column::OwnerId.eq(actor.id));
        }

        Ok(query.order_by_desc(venues::Column::Id).all(db).await?)
    }

    pub async fn get_managed_venue(
        db: &DatabaseConnection,
        actor: &Principal,
        venue_id: i64,
    ) -> ServiceResult<venues::Model> {
        let venue = venues::Entity::find_by_id(venue_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("venue", venue_id))?;

        if !is_authorized(actor, venue.owner_id) {
            return Err(ServiceError::unauthorized(format!(
                "venue {venue_id} is managed by another owner"
            )));
        }

        Ok(venue)
    }

    pub async fn create_court(
        db: &DatabaseConnection,
        actor: &Principal,
        new: NewCourt,
    ) -> ServiceResult<courts::Model> {
        require_staff(actor)?;
        let venue = Self::get_managed_venue(db, actor, new.venue_id).await?;
        let name = required_text("court name", &new.name)?;
        let hourly_price = positive_price(new.hourly_price)?;

        let now = Utc::now().naive_utc();
        let court = courts::ActiveModel {
            venue_id: Set(venue.id),
            name: Set(name),
            description: Set(new.description),
            latitude: Set(new.latitude),
            longitude: Set(new.longitude),
            sport: Set(new.sport),
            surface: Set(new.surface),
            hourly_price: Set(hourly_price),
            rating: Set(Decimal::ZERO),
            is_active: Set(new.is_active),
            created_by: Set(Some(actor.id)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!("Court {} created in venue {}", court.id, venue.id);
        Ok(court)
    }

    pub async fn update_court(
        db: &DatabaseConnection,
        actor: &Principal,
        court_id: i64,
        changes: CourtChanges,
    ) -> ServiceResult<courts::Model> {
        let court = Self::get_managed_court(db, actor, court_id).await?;
        let mut active: courts::ActiveModel = court.into();

        if let Some(name) = changes.name {
            active.name = Set(required_text("court name", &name)?);
        }
        if let Some(price) = changes.hourly_price {
            active.hourly_price = Set(positive_price(price)?);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(latitude) = changes.latitude {
            active.latitude = Set(Some(latitude));
        }
        if let Some(longitude) = changes.longitude {
            active.longitude = Set(Some(longitude));
        }
        if let Some(sport) = changes.sport {
            active.sport = Set(sport);
        }
        if let Some(surface) = changes.surface {
            active.surface = Set(surface);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().naive_utc());

        Ok(active.update(db).await?)
    }

    /// Delete a court; its images and reservations go with it
    pub async fn delete_court(
        db: &DatabaseConnection,
        actor: &Principal,
        court_id: i64,
    ) -> ServiceResult<()> {
        let court = Self::get_managed_court(db, actor, court_id).await?;
        courts::Entity::delete_by_id(court.id).exec(db).await?;

        info!("Court {} deleted by user {}", court_id, actor.id);
        Ok(())
    }

    pub async fn get_managed_court(
        db: &DatabaseConnection,
        actor: &Principal,
        court_id: i64,
    ) -> ServiceResult<courts::Model> {
        let resolved = Self::resolve_court(db, court_id).await?;
        if !is_authorized(actor, resolved.owner_id) {
            return Err(ServiceError::unauthorized(format!(
                "court {court_id} is managed by another owner"
            )));
        }

        courts::Entity::find_by_id(court_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("court", court_id))
    }

    /// Courts the actor manages, optionally within one venue, newest first
    pub async fn list_managed_courts(
        db: &DatabaseConnection,
        actor: &Principal,
        venue_id: Option<i64>,
    ) -> ServiceResult<Vec<courts::Model>> {
        require_staff(actor)?;

        let mut query = courts::Entity::find();
        if !actor.is_admin() {
            query = query
                .join(JoinType::InnerJoin, courts::Relation::Venue.def())
                .filter(venues::Column::OwnerId.eq(actor.id));
        }
        if let Some(venue_id) = venue_id {
            query = query.filter(courts::Column::VenueId.eq(venue_id));
        }

        Ok(query.order_by_desc(courts::Column::Id).all(db).await?)
    }

    /// Active venues with their active courts, for the public catalog
    pub async fn list_public_venues(db: &DatabaseConnection) -> Result<Vec<VenueEntry>, DbErr> {
        let venues = venues::Entity::find()
            .filter(venues::Column::IsActive.eq(true))
            .order_by_asc(venues::Column::Name)
            .all(db)
            .await?;

        Self::venue_entries(db, venues).await
    }

    pub async fn find_public_venue(
        db: &DatabaseConnection,
        slug: &str,
    ) -> ServiceResult<VenueEntry> {
        let venue = venues::Entity::find()
            .filter(venues::Column::Slug.eq(slug))
            .filter(venues::Column::IsActive.eq(true))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("venue", slug))?;

        let mut entries = Self::venue_entries(db, vec![venue]).await?;
        entries
            .pop()
            .ok_or_else(|| ServiceError::not_found("venue", slug))
    }

    /// Active courts of active venues, newest first
    pub async fn list_public_courts(db: &DatabaseConnection) -> Result<Vec<CourtListing>, DbErr> {
        let rows = courts::Entity::find()
            .filter(courts::Column::IsActive.eq(true))
            .find_also_related(venues::Entity)
            .filter(venues::Column::IsActive.eq(true))
            .order_by_desc(courts::Column::Id)
            .all(db)
            .await?;

        let rows: Vec<(courts::Model, venues::Model)> = rows
            .into_iter()
            .filter_map(|(court, venue)| venue.map(|v| (court, v)))
            .collect();

        let court_ids: Vec<i64> = rows.iter().map(|(c, _)| c.id).collect();
        let owner_ids: Vec<i64> = rows.iter().filter_map(|(_, v)| v.owner_id).collect();
        let mut images_by_court = Self::images_by_court(db, court_ids).await?;
        let phones = Self::owner_phones(db, owner_ids).await?;

        Ok(rows
            .into_iter()
            .map(|(court, venue)| CourtListing {
                images: images_by_court.remove(&court.id).unwrap_or_default(),
                owner_phone: venue.owner_id.and_then(|id| phones.get(&id).cloned()),
                court,
                venue,
            })
            .collect())
    }

    async fn venue_entries(
        db: &DatabaseConnection,
        venues: Vec<venues::Model>,
    ) -> Result<Vec<VenueEntry>, DbErr> {
        if venues.is_empty() {
            return Ok(vec![]);
        }

        let venue_ids: Vec<i64> = venues.iter().map(|v| v.id).collect();
        let owner_ids: Vec<i64> = venues.iter().filter_map(|v| v.owner_id).collect();

        let courts = courts::Entity::find()
            .filter(courts::Column::VenueId.is_in(venue_ids))
            .filter(courts::Column::IsActive.eq(true))
            .order_by_asc(courts::Column::Id)
            .all(db)
            .await?;

        let court_ids: Vec<i64> = courts.iter().map(|c| c.id).collect();
        let mut images_by_court = Self::images_by_court(db, court_ids).await?;
        let phones = Self::owner_phones(db, owner_ids).await?;

        let mut courts_by_venue: HashMap<i64, Vec<CourtEntry>> = HashMap::new();
        for court in courts {
            let images = images_by_court.remove(&court.id).unwrap_or_default();
            courts_by_venue
                .entry(court.venue_id)
                .or_default()
                .push(CourtEntry { court, images });
        }

        Ok(venues
            .into_iter()
            .map(|venue| VenueEntry {
                courts: courts_by_venue.remove(&venue.id).unwrap_or_default(),
                owner_phone: venue.owner_id.and_then(|id| phones.get(&id).cloned()),
                venue,
            })
            .collect())
    }

    async fn images_by_court(
        db: &DatabaseConnection,
        court_ids: Vec<i64>,
    ) -> Result<HashMap<i64, Vec<court_images::Model>>, DbErr> {
        if court_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let images = court_images::Entity::find()
            .filter(court_images::Column::CourtId.is_in(court_ids))
            .order_by_asc(court_images::Column::Position)
            .order_by_asc(court_images::Column::Id)
            .all(db)
            .await?;

        let mut by_court: HashMap<i64, Vec<court_images::Model>> = HashMap::new();
        for image in images {
            by_court.entry(image.court_id).or_default().push(image);
        }
        Ok(by_court)
    }

    async fn owner_phones(
        db: &DatabaseConnection,
        owner_ids: Vec<i64>,
    ) -> Result<HashMap<i64, String>, DbErr> {
        if owner_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let owners = users::Entity::find()
            .filter(users::Column::Id.is_in(owner_ids))
            .all(db)
            .await?;

        Ok(owners
            .into_iter()
            .filter_map(|u| u.phone.map(|phone| (u.id, phone)))
            .collect())
    }
}

fn require_staff(actor: &Principal) -> ServiceResult<()> {
    if actor.role.is_staff() {
        Ok(())
    } else {
        Err(ServiceError::unauthorized("owner or admin role required"))
    }
}

fn required_text(field: &str, value: &str) -> ServiceResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::validation(format!("{field} must not be empty")));
    }
    Ok(value.to_owned())
}

fn positive_price(price: Decimal) -> ServiceResult<Decimal> {
    if price <= Decimal::ZERO {
        return Err(ServiceError::validation("hourly price must be greater than zero"));
    }
    stored_amount(price).ok_or_else(|| {
        ServiceError::validation(format!("hourly price must be less than {AMOUNT_CEILING}"))
    })
}

async fn slug_taken<C: ConnectionTrait>(db: &C, slug: &str, except_id: i64) -> Result<bool, DbErr> {
    let count = venues::Entity::find()
        .filter(venues::Column::Slug.eq(slug))
        .filter(venues::Column::Id.ne(except_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

fn slug_conflict(err: DbErr) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ServiceError::Conflict("slug is already in use".to_owned())
        }
        _ => ServiceError::Db(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        insert_court, insert_plan, insert_user, insert_venue, postgres_db, setup_db,
    };
    use models::Role;

    fn venue_named(name: &str) -> NewVenue {
        NewVenue {
            name: name.to_owned(),
            is_active: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_resolve_court_derives_owner_from_venue() {
        let db = setup_db().await;
        let owner = insert_user(&db, Role::Propietario).await;
        let venue = insert_venue(&db, Some(owner.id), "Complejo Norte").await;
        let court = insert_court(&db, venue.id, "Cancha 1").await;

        let resolved = CatalogService::resolve_court(&db, court.id).await.unwrap();
        assert_eq!(resolved.owner_id, Some(owner.id));
        assert_eq!(resolved.venue_id, venue.id);
        assert_eq!(resolved.name, "Cancha 1");

        let missing = CatalogService::resolve_court(&db, 999).await;
        assert!(matches!(missing, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_unclaimed_venue_court_has_no_owner() {
        let db = setup_db().await;
        let venue = insert_venue(&db, None, "Sin Dueño").await;
        let court = insert_court(&db, venue.id, "Cancha A").await;

        let resolved = CatalogService::resolve_court_for_update(&db, court.id)
            .await
            .unwrap();
        assert_eq!(resolved.owner_id, None);
    }

    #[tokio::test]
    async fn test_create_venue_respects_plan_limit() {
        let db = setup_db().await;
        insert_plan(&db, "free", 1).await;
        let owner = insert_user(&db, Role::Propietario).await;
        let actor = Principal::new(owner.id, Role::Propietario);

        let venue = CatalogService::create_venue(&db, &actor, venue_named("La Bombonera"))
            .await
            .unwrap();
        assert_eq!(venue.owner_id, Some(owner.id));
        assert_eq!(venue.slug, "la-bombonera");

        let second = CatalogService::create_venue(&db, &actor, venue_named("Otra")).await;
        assert!(matches!(
            second,
            Err(ServiceError::LimitReached { limit: 1 })
        ));

        let unknown = Principal::new(owner.id + 100, Role::Propietario);
        let result = CatalogService::create_venue(&db, &unknown, venue_named("Fantasma")).await;
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore = "needs DATABASE_URL pointing at a scratch Postgres database"]
    async fn test_concurrent_venue_creation_respects_plan_limit() {
        let (_guard, db) = postgres_db().await;
        let owner = insert_user(&db, Role::Propietario).await;
        let actor = Principal::new(owner.id, Role::Propietario);
        let plan = CatalogService::current_plan(&db, owner.id).await.unwrap();
        let limit = PlanTier::venue_limit(plan.as_ref());

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let db = db.clone();
                tokio::spawn(async move {
                    CatalogService::create_venue(&db, &actor, venue_named(&format!("Sede {i}")))
                        .await
                })
            })
            .collect();

        let (mut created, mut rejected) = (0u64, 0u64);
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(ServiceError::LimitReached { .. }) => rejected += 1,
                Err(err) => panic!("unexpected error: {err}"),
            }
        }
        assert_eq!(created, limit);
        assert_eq!(rejected, 6 - limit);
    }

    #[tokio::test]
    async fn test_create_venue_disambiguates_slug() {
        let db = setup_db().await;
        let admin = Principal::new(1, Role::Admin);

        let first = CatalogService::create_venue(&db, &admin, venue_named("Sport Center"))
            .await
            .unwrap();
        let second = CatalogService::create_venue(&db, &admin, venue_named("Sport  Center!"))
            .await
            .unwrap();

        assert_eq!(first.slug, "sport-center");
        assert_eq!(second.slug, format!("sport-center-{}", second.id));
        assert_eq!(second.owner_id, None);
    }

    #[tokio::test]
    async fn test_customers_cannot_manage_catalog() {
        let db = setup_db().await;
        let customer = Principal::new(5, Role::Usuario);

        let result = CatalogService::create_venue(&db, &customer, venue_named("Mine")).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));

        let result = CatalogService::list_managed_venues(&db, &customer).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_update_venue_rejects_taken_slug() {
        let db = setup_db().await;
        let owner = insert_user(&db, Role::Propietario).await;
        let actor = Principal::new(owner.id, Role::Propietario);
        insert_venue(&db, None, "Taken").await;
        let venue = insert_venue(&db, Some(owner.id), "Mine").await;

        let changes = VenueChanges {
            slug: Some("Taken".to_owned()),
            ..Default::default()
        };
        let result = CatalogService::update_venue(&db, &actor, venue.id, changes).await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));

        let changes = VenueChanges {
            name: Some("  Renamed ".to_owned()),
            parking: Some(true),
            ..Default::default()
        };
        let updated = CatalogService::update_venue(&db, &actor, venue.id, changes)
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert!(updated.parking);
    }

    #[tokio::test]
    async fn test_assign_owner_requires_admin_and_staff_user() {
        let db = setup_db().await;
        let owner = insert_user(&db, Role::Propietario).await;
        let customer = insert_user(&db, Role::Usuario).await;
        let venue = insert_venue(&db, None, "Libre").await;
        let admin = Principal::new(999, Role::Admin);

        let as_owner = Principal::new(owner.id, Role::Propietario);
        let result = CatalogService::assign_venue_owner(&db, &as_owner, venue.id, owner.id).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));

        let result = CatalogService::assign_venue_owner(&db, &admin, venue.id, customer.id).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));

        let venue = CatalogService::assign_venue_owner(&db, &admin, venue.id, owner.id)
            .await
            .unwrap();
        assert_eq!(venue.owner_id, Some(owner.id));
    }

    #[tokio::test]
    async fn test_court_management_is_scoped_to_owner() {
        let db = setup_db().await;
        let owner = insert_user(&db, Role::Propietario).await;
        let other = insert_user(&db, Role::Propietario).await;
        let venue = insert_venue(&db, Some(owner.id), "Club").await;
        let actor = Principal::new(owner.id, Role::Propietario);
        let intruder = Principal::new(other.id, Role::Propietario);

        let new_court = NewCourt {
            venue_id: venue.id,
            name: "Cancha 1".to_owned(),
            description: None,
            latitude: None,
            longitude: None,
            sport: "futbol".to_owned(),
            surface: "sintetico".to_owned(),
            hourly_price: Decimal::from(80),
            is_active: true,
        };

        let result = CatalogService::create_court(&db, &intruder, new_court.clone()).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));

        let free = NewCourt {
            hourly_price: Decimal::ZERO,
            ..new_court.clone()
        };
        let result = CatalogService::create_court(&db, &actor, free).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));

        let overpriced = NewCourt {
            hourly_price: Decimal::from(100_000_000),
            ..new_court.clone()
        };
        let result = CatalogService::create_court(&db, &actor, overpriced).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));

        let court = CatalogService::create_court(&db, &actor, new_court).await.unwrap();
        assert_eq!(court.venue_id, venue.id);

        let mine = CatalogService::list_managed_courts(&db, &actor, None).await.unwrap();
        assert_eq!(mine.len(), 1);
        let theirs = CatalogService::list_managed_courts(&db, &intruder, None)
            .await
            .unwrap();
        assert!(theirs.is_empty());

        let result = CatalogService::delete_court(&db, &intruder, court.id).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));
        CatalogService::delete_court(&db, &actor, court.id).await.unwrap();
        let result = CatalogService::resolve_court(&db, court.id).await;
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_public_catalog_hides_inactive_entries() {
        let db = setup_db().await;
        let venue = insert_venue(&db, None, "Publica").await;
        insert_court(&db, venue.id, "Abierta").await;
        let closed = insert_court(&db, venue.id, "Cerrada").await;

        let mut active: courts::ActiveModel = closed.into();
        active.is_active = Set(false);
        active.update(&db).await.unwrap();

        let venues = CatalogService::list_public_venues(&db).await.unwrap();
        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].courts.len(), 1);
        assert_eq!(venues[0].courts[0].court.name, "Abierta");

        let entry = CatalogService::find_public_venue(&db, &venue.slug).await.unwrap();
        assert_eq!(entry.venue.id, venue.id);

        let listings = CatalogService::list_public_courts(&db).await.unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].venue.id, venue.id);

        let missing = CatalogService::find_public_venue(&db, "nope").await;
        assert!(matches!(missing, Err(ServiceError::NotFound { .. })));
    }
}
