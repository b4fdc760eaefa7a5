use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Overlap checks and day listings scan a court's reservations by start
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_court_id_start_at")
                    .table(Reservations::Table)
                    .col(Reservations::CourtId)
                    .col(Reservations::StartAt)
                    .to_owned(),
            )
            .await?;

        // Customer history listings
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_customer_id")
                    .table(Reservations::Table)
                    .col(Reservations::CustomerId)
                    .to_owned(),
            )
            .await?;

        // Index on courts.venue_id for faster joins
        manager
            .create_index(
                Index::create()
                    .name("idx_courts_venue_id")
                    .table(Courts::Table)
                    .col(Courts::VenueId)
                    .to_owned(),
            )
            .await?;

        // Owner-scoped listings join through venues.owner_id
        manager
            .create_index(
                Index::create()
                    .name("idx_venues_owner_id")
                    .table(Venues::Table)
                    .col(Venues::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_court_images_court_id")
                    .table(CourtImages::Table)
                    .col(CourtImages::CourtId)
                    .to_owned(),
            )
            .await?;

        // Current plan lookup orders a user's subscriptions by start
        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_user_id_started_at")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::UserId)
                    .col(Subscriptions::StartedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_subscriptions_user_id_started_at",
            "idx_court_images_court_id",
            "idx_venues_owner_id",
            "idx_courts_venue_id",
            "idx_reservations_customer_id",
            "idx_reservations_court_id_start_at",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
enum Reservations {
    Table,
    CourtId,
    CustomerId,
    StartAt,
}

#[derive(Iden)]
enum Courts {
    Table,
    VenueId,
}

#[derive(Iden)]
enum Venues {
    Table,
    OwnerId,
}

#[derive(Iden)]
enum CourtImages {
    Table,
    CourtId,
}

#[derive(Iden)]
enum Subscriptions {
    Table,
    UserId,
    StartedAt,
}
