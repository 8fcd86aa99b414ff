use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::Name))
                    .col(string(Users::HashedPassword))
                    .col(boolean(Users::IsSuperadmin).default(false))
                    .to_owned(),
            )
            .await?;

        // Create events table
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(pk_auto(Events::Id))
                    .col(string(Events::Name))
                    .col(string_null(Events::Description))
                    .col(date_time(Events::Date))
                    .col(string(Events::Location))
                    .col(integer(Events::CreatedById))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_created_by")
                            .from(Events::Table, Events::CreatedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create event_admins table
        manager
            .create_table(
                Table::create()
                    .table(EventAdmins::Table)
                    .if_not_exists()
                    .col(pk_auto(EventAdmins::Id))
                    .col(integer(EventAdmins::EventId))
                    .col(integer(EventAdmins::UserId))
                    .col(string_len(EventAdmins::Role, 16))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_admins_event")
                            .from(EventAdmins::Table, EventAdmins::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_admins_user")
                            .from(EventAdmins::Table, EventAdmins::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_admins_event_user")
                    .table(EventAdmins::Table)
                    .col(EventAdmins::EventId)
                    .col(EventAdmins::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(pk_auto(Students::Id))
                    .col(string(Students::FirstName))
                    .col(string(Students::LastName))
                    .col(string(Students::Email).unique_key())
                    .col(boolean(Students::IsExternal).default(false))
                    .col(text(Students::SearchKey))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_students_last_name")
                    .table(Students::Table)
                    .col(Students::LastName)
                    .to_owned(),
            )
            .await?;

        // Create tickets table (one row per registered participant)
        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(pk_auto(Tickets::Id))
                    .col(integer(Tickets::EventId))
                    .col(string(Tickets::FirstName))
                    .col(string(Tickets::LastName))
                    .col(string_null(Tickets::Promo))
                    .col(string_null(Tickets::Email))
                    .col(string_null(Tickets::Tarif))
                    .col(string(Tickets::QrCodeToken).unique_key())
                    .col(string_len(Tickets::Status, 16).default("UNUSED"))
                    .col(timestamp_with_time_zone_null(Tickets::ScannedAt))
                    .col(timestamp_with_time_zone(Tickets::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_event")
                            .from(Tickets::Table, Tickets::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_event")
                    .table(Tickets::Table)
                    .col(Tickets::EventId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(EventAdmins::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    HashedPassword,
    IsSuperadmin,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Name,
    Description,
    Date,
    Location,
    CreatedById,
}

#[derive(DeriveIden)]
enum EventAdmins {
    Table,
    Id,
    EventId,
    UserId,
    Role,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    IsExternal,
    SearchKey,
}

#[derive(DeriveIden)]
enum Tickets {
    Table,
    Id,
    EventId,
    FirstName,
    LastName,
    Promo,
    Email,
    Tarif,
    QrCodeToken,
    Status,
    ScannedAt,
    CreatedAt,
}
