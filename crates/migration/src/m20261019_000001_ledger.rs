use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::Date).date().not_null())
                    .col(ColumnDef::new(Expenses::SourceName).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::PersonName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(ColumnDef::new(Expenses::ItemName).string().not_null())
                    .col(ColumnDef::new(Expenses::Note).string().not_null().default(""))
                    .col(
                        ColumnDef::new(Expenses::Quantity)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Expenses::Unit).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::UnitPriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Expenses::TotalAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::Direction).string().not_null())
                    .col(ColumnDef::new(Expenses::Channel).string())
                    .col(
                        ColumnDef::new(Expenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-date-source_name")
                    .table(Expenses::Table)
                    .col(Expenses::Date)
                    .col(Expenses::SourceName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transfers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transfers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transfers::Date).date().not_null())
                    .col(ColumnDef::new(Transfers::FromHolder).string().not_null())
                    .col(ColumnDef::new(Transfers::FromSource).string().not_null())
                    .col(ColumnDef::new(Transfers::FromAccountRef).string().not_null())
                    .col(ColumnDef::new(Transfers::ToHolder).string().not_null())
                    .col(ColumnDef::new(Transfers::ToSource).string().not_null())
                    .col(ColumnDef::new(Transfers::ToAccountRef).string().not_null())
                    .col(ColumnDef::new(Transfers::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Transfers::Direction).string().not_null())
                    .col(ColumnDef::new(Transfers::Channel).string())
                    .col(
                        ColumnDef::new(Transfers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transfers-date")
                    .table(Transfers::Table)
                    .col(Transfers::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BankBalances::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BankBalances::Date).date().not_null())
                    .col(ColumnDef::new(BankBalances::SourceName).string().not_null())
                    .col(
                        ColumnDef::new(BankBalances::OpeningCashMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BankBalances::OpeningChequeMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BankBalances::OpeningCardMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(BankBalances::Date)
                            .col(BankBalances::SourceName),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BankBalances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transfers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    Date,
    SourceName,
    PersonName,
    Category,
    ItemName,
    Note,
    Quantity,
    Unit,
    UnitPriceMinor,
    TotalAmountMinor,
    Direction,
    Channel,
    CreatedAt,
}

#[derive(Iden)]
enum Transfers {
    Table,
    Id,
    Date,
    FromHolder,
    FromSource,
    FromAccountRef,
    ToHolder,
    ToSource,
    ToAccountRef,
    AmountMinor,
    Direction,
    Channel,
    CreatedAt,
}

#[derive(Iden)]
enum BankBalances {
    Table,
    Date,
    SourceName,
    OpeningCashMinor,
    OpeningChequeMinor,
    OpeningCardMinor,
}
