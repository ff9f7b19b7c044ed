use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(pk(Contacts::Id))
                    .col(ColumnDef::new(Contacts::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Contacts::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Contacts::Company).string_len(100).null())
                    .col(ColumnDef::new(Contacts::Project).string_len(200).null())
                    .col(ColumnDef::new(Contacts::Message).text().not_null())
                    .col(created_at(Contacts::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Applications::Table)
                    .if_not_exists()
                    .col(pk(Applications::Id))
                    .col(ColumnDef::new(Applications::JobTitle).string_len(200).not_null())
                    .col(ColumnDef::new(Applications::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Applications::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Applications::ResumePath).string_len(500).not_null())
                    .col(ColumnDef::new(Applications::PortfolioUrl).string_len(500).null())
                    .col(ColumnDef::new(Applications::CoverLetter).text().null())
                    .col(created_at(Applications::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(pk(Posts::Id))
                    .col(ColumnDef::new(Posts::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Posts::Excerpt).text().not_null())
                    .col(ColumnDef::new(Posts::Content).text().not_null())
                    .col(ColumnDef::new(Posts::Author).string_len(100).not_null())
                    .col(ColumnDef::new(Posts::Category).string_len(50).not_null())
                    .col(ColumnDef::new(Posts::Icon).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Posts::Slug)
                            .string_len(200)
                            .not_null()
                            .unique_key(),
                    )
                    .col(created_at(Posts::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(pk(Jobs::Id))
                    .col(ColumnDef::new(Jobs::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Jobs::Tag).string_len(50).not_null())
                    .col(ColumnDef::new(Jobs::Location).string_len(100).not_null())
                    .col(ColumnDef::new(Jobs::Type).string_len(50).not_null())
                    .col(ColumnDef::new(Jobs::Description).text().not_null())
                    .col(created_at(Jobs::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(pk(Admins::Id))
                    .col(
                        ColumnDef::new(Admins::Username)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Admins::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(Admins::Email).string_len(255).null().unique_key())
                    .col(created_at(Admins::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Admins::Table.into_iden(),
            Jobs::Table.into_iden(),
            Posts::Table.into_iden(),
            Applications::Table.into_iden(),
            Contacts::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

fn pk<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn created_at<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
enum Contacts {
    Table,
    Id,
    Name,
    Email,
    Company,
    Project,
    Message,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Applications {
    Table,
    Id,
    JobTitle,
    Name,
    Email,
    ResumePath,
    PortfolioUrl,
    CoverLetter,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    Title,
    Excerpt,
    Content,
    Author,
    Category,
    Icon,
    Slug,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
    Title,
    Tag,
    Location,
    Type,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Admins {
    Table,
    Id,
    Username,
    PasswordHash,
    Email,
    CreatedAt,
}
