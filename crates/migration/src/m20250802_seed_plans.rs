use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The free plan must be inserted first; owners without a subscription
        // fall back to the lowest plan id
        let insert = Query::insert()
            .into_table(Plans::Table)
            .columns([
                Plans::Code,
                Plans::Name,
                Plans::MonthlyPrice,
                Plans::MaxVenues,
            ])
            .values_panic(["free".into(), "Free".into(), 0.into(), 1.into()])
            .values_panic(["premium".into(), "Premium".into(), 49.into(), 2.into()])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Plans::Table)
            .and_where(Expr::col(Plans::Code).is_in(["free", "premium"]))
            .to_owned();

        manager.exec_stmt(delete).await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Plans {
    Table,
    Code,
    Name,
    MonthlyPrice,
    MaxVenues,
}
