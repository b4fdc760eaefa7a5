use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table (rows are provisioned by the identity service)
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(20)
                            .not_null()
                            .default("usuario"),
                    )
                    .col(ColumnDef::new(Users::FirstName).string_len(80).not_null())
                    .col(ColumnDef::new(Users::LastName).string_len(80).not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::BusinessName).string_len(120))
                    .col(ColumnDef::new(Users::Phone).string_len(40))
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create plans table
        manager
            .create_table(
                Table::create()
                    .table(Plans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Plans::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Plans::Code)
                            .string_len(40)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Plans::Name).string_len(80).not_null())
                    .col(
                        ColumnDef::new(Plans::MonthlyPrice)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Plans::MaxVenues)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Plans::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create subscriptions table
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscriptions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subscriptions::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Subscriptions::PlanId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Subscriptions::Status)
                            .string_len(20)
                            .not_null()
                            .default("activa"),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::StartedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Subscriptions::EndedAt).date_time())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subscriptions-user_id")
                            .from(Subscriptions::Table, Subscriptions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subscriptions-plan_id")
                            .from(Subscriptions::Table, Subscriptions::PlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create venues table
        manager
            .create_table(
                Table::create()
                    .table(Venues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Venues::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Venues::Name).string_len(160).not_null())
                    .col(
                        ColumnDef::new(Venues::Slug)
                            .string_len(220)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Venues::Description).text())
                    .col(ColumnDef::new(Venues::Address).string_len(240))
                    .col(ColumnDef::new(Venues::District).string_len(120))
                    .col(ColumnDef::new(Venues::Province).string_len(120))
                    .col(ColumnDef::new(Venues::Department).string_len(120))
                    .col(ColumnDef::new(Venues::Latitude).double())
                    .col(ColumnDef::new(Venues::Longitude).double())
                    // Amenity flags
                    .col(
                        ColumnDef::new(Venues::Covered)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Venues::Lighting)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Venues::ChangingRooms)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Venues::Parking)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Venues::Cafeteria)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Venues::PhotoUrl).text())
                    .col(
                        ColumnDef::new(Venues::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Venues::OwnerId).big_integer())
                    .col(ColumnDef::new(Venues::CreatedBy).big_integer())
                    .col(
                        ColumnDef::new(Venues::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Venues::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-venues-owner_id")
                            .from(Venues::Table, Venues::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-venues-created_by")
                            .from(Venues::Table, Venues::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create courts table
        manager
            .create_table(
                Table::create()
                    .table(Courts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courts::VenueId).big_integer().not_null())
                    .col(ColumnDef::new(Courts::Name).string_len(140).not_null())
                    .col(ColumnDef::new(Courts::Description).text())
                    .col(ColumnDef::new(Courts::Latitude).double())
                    .col(ColumnDef::new(Courts::Longitude).double())
                    .col(ColumnDef::new(Courts::Sport).string_len(20).not_null())
                    .col(ColumnDef::new(Courts::Surface).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Courts::HourlyPrice)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Courts::Rating)
                            .decimal_len(3, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Courts::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Courts::CreatedBy).big_integer())
                    .col(
                        ColumnDef::new(Courts::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Courts::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-courts-venue_id")
                            .from(Courts::Table, Courts::VenueId)
                            .to(Venues::Table, Venues::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-courts-created_by")
                            .from(Courts::Table, Courts::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create court_images table
        manager
            .create_table(
                Table::create()
                    .table(CourtImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourtImages::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourtImages::CourtId).big_integer().not_null())
                    .col(ColumnDef::new(CourtImages::Url).text().not_null())
                    .col(
                        ColumnDef::new(CourtImages::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CourtImages::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-court_images-court_id")
                            .from(CourtImages::Table, CourtImages::CourtId)
                            .to(Courts::Table, Courts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create reservations table
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::CourtId).big_integer().not_null())
                    .col(ColumnDef::new(Reservations::CustomerId).big_integer())
                    .col(ColumnDef::new(Reservations::StartAt).date_time().not_null())
                    .col(ColumnDef::new(Reservations::EndAt).date_time().not_null())
                    .col(
                        ColumnDef::new(Reservations::TotalAmount)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Reservations::PaidAmount)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Reservations::PaymentMethod).string_len(30))
                    .col(
                        ColumnDef::new(Reservations::PaymentStatus)
                            .string_len(20)
                            .not_null()
                            .default("pendiente"),
                    )
                    .col(ColumnDef::new(Reservations::Notes).text())
                    .col(ColumnDef::new(Reservations::CreatedBy).big_integer())
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Reservations::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reservations-court_id")
                            .from(Reservations::Table, Reservations::CourtId)
                            .to(Courts::Table, Courts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reservations-customer_id")
                            .from(Reservations::Table, Reservations::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reservations-created_by")
                            .from(Reservations::Table, Reservations::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CourtImages::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Venues::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Plans::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Role,
    FirstName,
    LastName,
    Email,
    BusinessName,
    Phone,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Plans {
    Table,
    Id,
    Code,
    Name,
    MonthlyPrice,
    MaxVenues,
    CreatedAt,
}

#[derive(Iden)]
enum Subscriptions {
    Table,
    Id,
    UserId,
    PlanId,
    Status,
    StartedAt,
    EndedAt,
}

#[derive(Iden)]
enum Venues {
    Table,
    Id,
    Name,
    Slug,
    Description,
    Address,
    District,
    Province,
    Department,
    Latitude,
    Longitude,
    Covered,
    Lighting,
    ChangingRooms,
    Parking,
    Cafeteria,
    PhotoUrl,
    IsActive,
    OwnerId,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Courts {
    Table,
    Id,
    VenueId,
    Name,
    Description,
    Latitude,
    Longitude,
    Sport,
    Surface,
    HourlyPrice,
    Rating,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CourtImages {
    Table,
    Id,
    CourtId,
    Url,
    Position,
    CreatedAt,
}

#[derive(Iden)]
enum Reservations {
    Table,
    Id,
    CourtId,
    CustomerId,
    StartAt,
    EndAt,
    TotalAmount,
    PaidAmount,
    PaymentMethod,
    PaymentStatus,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
