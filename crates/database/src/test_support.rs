use crate::entities::{court_images, courts, plans, reservations, subscriptions, users, venues};
use chrono::Utc;
use models::{Role, slug};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectOptions, ConnectionTrait, Database,
    DatabaseConnection, EntityTrait, Schema,
};
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_EMAIL: AtomicU32 = AtomicU32::new(1);

#[cfg(test)]
static POSTGRES: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

/// Scratch Postgres database named by `DATABASE_URL`, migrated from scratch.
///
/// Every call resets the schema, so the returned guard must live as long as the test.
#[cfg(test)]
pub async fn postgres_db() -> (tokio::sync::MutexGuard<'static, ()>, DatabaseConnection) {
    use migration::{Migrator, MigratorTrait};

    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must point at a scratch Postgres database");
    let guard = POSTGRES.lock().await;
    let db = crate::db::create_connection(&url, 16).await.unwrap();
    Migrator::fresh(&db).await.unwrap();

    (guard, db)
}

/// Fresh in-memory SQLite database with every table created from the entities
pub async fn setup_db() -> DatabaseConnection {
    // A single connection, since each SQLite memory connection is its own database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    create_table(&db, &schema, users::Entity).await;
    create_table(&db, &schema, plans::Entity).await;
    create_table(&db, &schema, subscriptions::Entity).await;
    create_table(&db, &schema, venues::Entity).await;
    create_table(&db, &schema, courts::Entity).await;
    create_table(&db, &schema, court_images::Entity).await;
    create_table(&db, &schema, reservations::Entity).await;

    db
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, schema: &Schema, entity: E) {
    let statement = schema.create_table_from_entity(entity);
    db.execute(db.get_database_backend().build(&statement))
        .await
        .unwrap();
}

pub async fn insert_user(db: &DatabaseConnection, role: Role) -> users::Model {
    let n = NEXT_EMAIL.fetch_add(1, Ordering::Relaxed);
    let now = Utc::now().naive_utc();

    users::ActiveModel {
        role: Set(role),
        first_name: Set(format!("User{n}")),
        last_name: Set("Tester".to_owned()),
        email: Set(format!("user{n}@example.com")),
        business_name: Set(None),
        phone: Set(Some(format!("9000000{n:02}"))),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_customer(
    db: &DatabaseConnection,
    first_name: &str,
    last_name: &str,
    email: &str,
) -> users::Model {
    let now = Utc::now().naive_utc();

    users::ActiveModel {
        role: Set(Role::Usuario),
        first_name: Set(first_name.to_owned()),
        last_name: Set(last_name.to_owned()),
        email: Set(email.to_owned()),
        business_name: Set(None),
        phone: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_plan(db: &DatabaseConnection, code: &str, max_venues: i32) -> plans::Model {
    plans::ActiveModel {
        code: Set(code.to_owned()),
        name: Set(code.to_uppercase()),
        monthly_price: Set(Decimal::ZERO),
        max_venues: Set(max_venues),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_venue(
    db: &DatabaseConnection,
    owner_id: Option<i64>,
    name: &str,
) -> venues::Model {
    let now = Utc::now().naive_utc();

    venues::ActiveModel {
        name: Set(name.to_owned()),
        slug: Set(slug::slug_base(name)),
        description: Set(None),
        address: Set(None),
        district: Set(None),
        province: Set(None),
        department: Set(None),
        latitude: Set(None),
        longitude: Set(None),
        covered: Set(false),
        lighting: Set(false),
        changing_rooms: Set(false),
        parking: Set(false),
        cafeteria: Set(false),
        photo_url: Set(None),
        is_active: Set(true),
        owner_id: Set(owner_id),
        created_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_court(db: &DatabaseConnection, venue_id: i64, name: &str) -> courts::Model {
    let now = Utc::now().naive_utc();

    courts::ActiveModel {
        venue_id: Set(venue_id),
        name: Set(name.to_owned()),
        description: Set(None),
        latitude: Set(None),
        longitude: Set(None),
        sport: Set("futbol".to_owned()),
        surface: Set("sintetico".to_owned()),
        hourly_price: Set(Decimal::from(60)),
        rating: Set(Decimal::ZERO),
        is_active: Set(true),
        created_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
