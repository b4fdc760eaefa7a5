use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

/// Name of the exclusion constraint that forbids overlapping live bookings.
///
/// The database crate matches on it to report violations as conflicts.
pub const OVERLAP_CONSTRAINT: &str = "reservations_no_overlap";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Range types and exclusion constraints are Postgres-only
        if manager.get_database_backend() != DbBackend::Postgres {
            return Ok(());
        }

        let db = manager.get_connection();

        // Lets a gist index combine equality on court_id with range overlap
        db.execute_unprepared("CREATE EXTENSION IF NOT EXISTS btree_gist;")
            .await?;

        db.execute_unprepared(
            "ALTER TABLE reservations
             ADD CONSTRAINT reservations_amounts_valid
             CHECK (total_amount >= 0 AND paid_amount >= 0 AND paid_amount <= total_amount);",
        )
        .await?;

        db.execute_unprepared(
            "ALTER TABLE reservations
             ADD CONSTRAINT reservations_window_valid
             CHECK (end_at > start_at);",
        )
        .await?;

        db.execute_unprepared(&format!(
            "ALTER TABLE reservations
             ADD CONSTRAINT {OVERLAP_CONSTRAINT}
             EXCLUDE USING gist (
                 court_id WITH =,
                 tsrange(start_at, end_at, '[)') WITH &&
             ) WHERE (payment_status <> 'cancelada');"
        ))
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() != DbBackend::Postgres {
            return Ok(());
        }

        let db = manager.get_connection();

        for constraint in [
            OVERLAP_CONSTRAINT,
            "reservations_window_valid",
            "reservations_amounts_valid",
        ] {
            db.execute_unprepared(&format!(
                "ALTER TABLE reservations DROP CONSTRAINT IF EXISTS {constraint};"
            ))
            .await?;
        }

        Ok(())
    }
}
