use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FirstName).string().null())
                    .col(ColumnDef::new(Users::LastName).string().null())
                    .col(
                        ColumnDef::new(Users::IsStaff)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::DateJoined)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::Slug).string().not_null())
                    .col(ColumnDef::new(Categories::ParentId).integer().null())
                    .col(
                        ColumnDef::new(Categories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Categories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Categories::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_parent")
                            .from(Categories::Table, Categories::ParentId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tags::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tags::Name).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Tags::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tags::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentTypes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentTypes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentTypes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Businesses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Businesses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Businesses::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Businesses::Slug).string().not_null())
                    .col(ColumnDef::new(Businesses::CategoryId).integer().null())
                    .col(ColumnDef::new(Businesses::Slogan).string().not_null())
                    .col(ColumnDef::new(Businesses::Description).string().not_null())
                    .col(ColumnDef::new(Businesses::Website).string().not_null())
                    .col(ColumnDef::new(Businesses::Email).string().not_null())
                    .col(ColumnDef::new(Businesses::Notes).text().not_null())
                    .col(
                        ColumnDef::new(Businesses::Status)
                            .string_len(25)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Businesses::AcceptedAt).date().null())
                    .col(ColumnDef::new(Businesses::LastUpdatedBy).integer().null())
                    .col(
                        ColumnDef::new(Businesses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Businesses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Businesses::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_category")
                            .from(Businesses::Table, Businesses::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_last_updated_by")
                            .from(Businesses::Table, Businesses::LastUpdatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BusinessTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BusinessTags::BusinessId).integer().not_null())
                    .col(ColumnDef::new(BusinessTags::TagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(BusinessTags::BusinessId)
                            .col(BusinessTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_tag_business")
                            .from(BusinessTags::Table, BusinessTags::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_tag_tag")
                            .from(BusinessTags::Table, BusinessTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BusinessPaymentTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusinessPaymentTypes::BusinessId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BusinessPaymentTypes::PaymentTypeId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(BusinessPaymentTypes::BusinessId)
                            .col(BusinessPaymentTypes::PaymentTypeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_payment_type_business")
                            .from(
                                BusinessPaymentTypes::Table,
                                BusinessPaymentTypes::BusinessId,
                            )
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_payment_type_payment_type")
                            .from(
                                BusinessPaymentTypes::Table,
                                BusinessPaymentTypes::PaymentTypeId,
                            )
                            .to(PaymentTypes::Table, PaymentTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Phones::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Phones::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Phones::BusinessId).integer().not_null())
                    .col(ColumnDef::new(Phones::Number).string().not_null())
                    .col(ColumnDef::new(Phones::Type).string_len(25).not_null())
                    .col(ColumnDef::new(Phones::Extension).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_phone_business")
                            .from(Phones::Table, Phones::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SocialLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SocialLinks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SocialLinks::BusinessId).integer().not_null())
                    .col(ColumnDef::new(SocialLinks::Link).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_social_link_business")
                            .from(SocialLinks::Table, SocialLinks::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OpeningHours::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OpeningHours::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OpeningHours::BusinessId).integer().not_null())
                    .col(ColumnDef::new(OpeningHours::Day).integer().not_null())
                    .col(ColumnDef::new(OpeningHours::OpeningTime).time().null())
                    .col(ColumnDef::new(OpeningHours::ClosingTime).time().null())
                    .col(
                        ColumnDef::new(OpeningHours::Closed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_opening_hour_business")
                            .from(OpeningHours::Table, OpeningHours::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Addresses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Addresses::BusinessId).integer().not_null())
                    .col(
                        ColumnDef::new(Addresses::AppOfficeNumber)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Addresses::StreetNumber).integer().not_null())
                    .col(
                        ColumnDef::new(Addresses::StreetType)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Addresses::StreetName).string().not_null())
                    .col(
                        ColumnDef::new(Addresses::Direction)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Addresses::City)
                            .string()
                            .not_null()
                            .default("Montreal"),
                    )
                    .col(
                        ColumnDef::new(Addresses::Province)
                            .string_len(2)
                            .not_null()
                            .default("qc"),
                    )
                    .col(
                        ColumnDef::new(Addresses::PostalCode)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_address_business")
                            .from(Addresses::Table, Addresses::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Suggestions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Suggestions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Suggestions::Name).string().not_null())
                    .col(ColumnDef::new(Suggestions::Email).string().not_null())
                    .col(
                        ColumnDef::new(Suggestions::IsOwner)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Suggestions::BusinessId).integer().null())
                    .col(
                        ColumnDef::new(Suggestions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Suggestions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_suggestion_business")
                            .from(Suggestions::Table, Suggestions::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Suggestions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Addresses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OpeningHours::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SocialLinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Phones::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BusinessPaymentTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BusinessTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Businesses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
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
    PasswordHash,
    FirstName,
    LastName,
    IsStaff,
    IsActive,
    DateJoined,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    Slug,
    ParentId,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PaymentTypes {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Businesses {
    Table,
    Id,
    Name,
    Slug,
    CategoryId,
    Slogan,
    Description,
    Website,
    Email,
    Notes,
    Status,
    AcceptedAt,
    LastUpdatedBy,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum BusinessTags {
    Table,
    BusinessId,
    TagId,
}

#[derive(DeriveIden)]
enum BusinessPaymentTypes {
    Table,
    BusinessId,
    PaymentTypeId,
}

#[derive(DeriveIden)]
enum Phones {
    Table,
    Id,
    BusinessId,
    Number,
    Type,
    Extension,
}

#[derive(DeriveIden)]
enum SocialLinks {
    Table,
    Id,
    BusinessId,
    Link,
}

#[derive(DeriveIden)]
enum OpeningHours {
    Table,
    Id,
    BusinessId,
    Day,
    OpeningTime,
    ClosingTime,
    Closed,
}

#[derive(DeriveIden)]
enum Addresses {
    Table,
    Id,
    BusinessId,
    AppOfficeNumber,
    StreetNumber,
    StreetType,
    StreetName,
    Direction,
    City,
    Province,
    PostalCode,
}

#[derive(DeriveIden)]
enum Suggestions {
    Table,
    Id,
    Name,
    Email,
    IsOwner,
    BusinessId,
    CreatedAt,
    UpdatedAt,
}
