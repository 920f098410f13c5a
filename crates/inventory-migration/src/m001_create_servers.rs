//! Миграция: создание таблицы servers.

use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m001_create_servers"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Servers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Servers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Servers::IpAddress)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Servers::Name).string().null())
                    .col(ColumnDef::new(Servers::Memory).string().null())
                    .col(ColumnDef::new(Servers::Type).string().null())
                    .col(ColumnDef::new(Servers::ImageUrl).string().not_null())
                    .col(
                        ColumnDef::new(Servers::Status)
                            .string_len(16)
                            .not_null()
                            .default("SERVER_UP"),
                    )
                    .to_owned(),
            )
            .await?;

        // Поиск по имени используется при заполнении демо-данными
        manager
            .create_index(
                Index::create()
                    .table(Servers::Table)
                    .col(Servers::Name)
                    .name("idx_servers_name")
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Servers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Servers {
    Table,
    Id,
    IpAddress,
    Name,
    Memory,
    Type,
    ImageUrl,
    Status,
}
