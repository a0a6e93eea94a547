//! Database migrations for notetype settings

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_notetypes::Migration),
            Box::new(m20250301_000002_create_notes::Migration),
        ]
    }
}

mod m20250301_000001_create_notetypes {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_notetypes"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Notetypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Notetypes::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Notetypes::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Notetypes::Templates).json().not_null())
                        .col(ColumnDef::new(Notetypes::Fields).json().not_null())
                        .col(ColumnDef::new(Notetypes::Css).text().not_null())
                        .col(
                            ColumnDef::new(Notetypes::Modified)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Notetypes::Usn)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Notetypes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Notetypes {
        Table,
        Id,
        Name,
        Templates,
        Fields,
        Css,
        Modified,
        Usn,
    }
}

mod m20250301_000002_create_notes {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_notes"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Notes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Notes::Id)
                                .big_integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Notes::NotetypeId).big_integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_notes_notetype")
                                .from(Notes::Table, Notes::NotetypeId)
                                .to(Notetypes::Table, Notetypes::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_notes_notetype_id")
                        .table(Notes::Table)
                        .col(Notes::NotetypeId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Notes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Notes {
        Table,
        Id,
        NotetypeId,
    }

    #[derive(DeriveIden)]
    enum Notetypes {
        Table,
        Id,
    }
}
