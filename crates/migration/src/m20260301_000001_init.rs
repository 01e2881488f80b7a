//! Initial schema migration - creates all marketplace tables.
//!
//! - `users`: accounts, roles and verification flags
//! - `farms`: farms owned by farmer accounts
//! - `listings`: produce offered for sale by a farm
//! - `offers`: buyer bids against a listing
//! - `contracts`: binding records created from accepted offers
//! - `escrows`: funds held against a contract
//! - `orders`: delivery tracking for a funded contract
//! - `kyc_submissions`: identity documents pending admin review

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    Username,
    HashedPassword,
    FullName,
    Phone,
    Role,
    IsActive,
    IsVerified,
    KycStatus,
    BusinessName,
    BusinessAddress,
    BusinessRegistration,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Farms {
    Table,
    Id,
    FarmerId,
    Name,
    Description,
    Location,
    SizeHectares,
    SoilType,
    IrrigationType,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Listings {
    Table,
    Id,
    FarmId,
    FarmerId,
    Title,
    Description,
    ProduceType,
    QuantityKg,
    UnitPriceNgn,
    TotalPriceNgn,
    HarvestDate,
    ExpiryDate,
    Status,
    IsOrganic,
    QualityGrade,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Offers {
    Table,
    Id,
    ListingId,
    BuyerId,
    QuantityKg,
    UnitPriceNgn,
    TotalPriceNgn,
    DeliveryDate,
    DeliveryLocation,
    Notes,
    Status,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Contracts {
    Table,
    Id,
    ContractNumber,
    FarmerId,
    BuyerId,
    ListingId,
    OfferId,
    QuantityKg,
    UnitPriceNgn,
    TotalAmountNgn,
    DeliveryDate,
    DeliveryLocation,
    TermsAndConditions,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Escrows {
    Table,
    Id,
    EscrowNumber,
    ContractId,
    BuyerId,
    SellerId,
    AmountNgn,
    Status,
    PaymentReference,
    FundedAt,
    ReleasedAt,
    RefundedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Orders {
    Table,
    Id,
    OrderNumber,
    ContractId,
    FarmerId,
    BuyerId,
    LogisticsId,
    QuantityKg,
    DeliveryAddress,
    DeliveryInstructions,
    Status,
    ConfirmedAt,
    ShippedAt,
    DeliveredAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum KycSubmissions {
    Table,
    Id,
    UserId,
    DocumentType,
    DocumentNumber,
    DocumentFilePath,
    SelfieFilePath,
    BusinessRegistrationPath,
    BusinessAddress,
    Status,
    AdminNotes,
    ReviewedBy,
    ReviewedAt,
    CreatedAt,
    UpdatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::HashedPassword).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::Phone).string())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::KycStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Users::BusinessName).string())
                    .col(ColumnDef::new(Users::BusinessAddress).string())
                    .col(ColumnDef::new(Users::BusinessRegistration).string())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Farms
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Farms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Farms::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Farms::FarmerId).string().not_null())
                    .col(ColumnDef::new(Farms::Name).string().not_null())
                    .col(ColumnDef::new(Farms::Description).string())
                    .col(ColumnDef::new(Farms::Location).string().not_null())
                    .col(ColumnDef::new(Farms::SizeHectares).double().not_null())
                    .col(ColumnDef::new(Farms::SoilType).string())
                    .col(ColumnDef::new(Farms::IrrigationType).string())
                    .col(
                        ColumnDef::new(Farms::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Farms::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Farms::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-farms-farmer_id")
                            .from(Farms::Table, Farms::FarmerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-farms-farmer_id")
                    .table(Farms::Table)
                    .col(Farms::FarmerId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Listings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Listings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Listings::FarmId).string().not_null())
                    .col(ColumnDef::new(Listings::FarmerId).string().not_null())
                    .col(ColumnDef::new(Listings::Title).string().not_null())
                    .col(ColumnDef::new(Listings::Description).string())
                    .col(ColumnDef::new(Listings::ProduceType).string().not_null())
                    .col(ColumnDef::new(Listings::QuantityKg).double().not_null())
                    .col(ColumnDef::new(Listings::UnitPriceNgn).double().not_null())
                    .col(ColumnDef::new(Listings::TotalPriceNgn).double().not_null())
                    .col(ColumnDef::new(Listings::HarvestDate).timestamp())
                    .col(ColumnDef::new(Listings::ExpiryDate).timestamp())
                    .col(
                        ColumnDef::new(Listings::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Listings::IsOrganic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Listings::QualityGrade).string())
                    .col(ColumnDef::new(Listings::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Listings::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-listings-farm_id")
                            .from(Listings::Table, Listings::FarmId)
                            .to(Farms::Table, Farms::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-listings-farmer_id")
                            .from(Listings::Table, Listings::FarmerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-listings-status")
                    .table(Listings::Table)
                    .col(Listings::Status)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Offers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Offers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Offers::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Offers::ListingId).string().not_null())
                    .col(ColumnDef::new(Offers::BuyerId).string().not_null())
                    .col(ColumnDef::new(Offers::QuantityKg).double().not_null())
                    .col(ColumnDef::new(Offers::UnitPriceNgn).double().not_null())
                    .col(ColumnDef::new(Offers::TotalPriceNgn).double().not_null())
                    .col(ColumnDef::new(Offers::DeliveryDate).timestamp())
                    .col(ColumnDef::new(Offers::DeliveryLocation).string().not_null())
                    .col(ColumnDef::new(Offers::Notes).string())
                    .col(
                        ColumnDef::new(Offers::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Offers::ExpiresAt).timestamp().not_null())
                    .col(ColumnDef::new(Offers::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Offers::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-offers-listing_id")
                            .from(Offers::Table, Offers::ListingId)
                            .to(Listings::Table, Listings::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-offers-buyer_id")
                            .from(Offers::Table, Offers::BuyerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-offers-listing_id")
                    .table(Offers::Table)
                    .col(Offers::ListingId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Contracts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Contracts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contracts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Contracts::ContractNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Contracts::FarmerId).string().not_null())
                    .col(ColumnDef::new(Contracts::BuyerId).string().not_null())
                    .col(ColumnDef::new(Contracts::ListingId).string().not_null())
                    .col(
                        ColumnDef::new(Contracts::OfferId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Contracts::QuantityKg).double().not_null())
                    .col(ColumnDef::new(Contracts::UnitPriceNgn).double().not_null())
                    .col(
                        ColumnDef::new(Contracts::TotalAmountNgn)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contracts::DeliveryDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contracts::DeliveryLocation)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Contracts::TermsAndConditions).string())
                    .col(
                        ColumnDef::new(Contracts::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Contracts::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Contracts::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-contracts-offer_id")
                            .from(Contracts::Table, Contracts::OfferId)
                            .to(Offers::Table, Offers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-contracts-listing_id")
                            .from(Contracts::Table, Contracts::ListingId)
                            .to(Listings::Table, Listings::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Escrows
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Escrows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Escrows::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Escrows::EscrowNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Escrows::ContractId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Escrows::BuyerId).string().not_null())
                    .col(ColumnDef::new(Escrows::SellerId).string().not_null())
                    .col(ColumnDef::new(Escrows::AmountNgn).double().not_null())
                    .col(
                        ColumnDef::new(Escrows::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Escrows::PaymentReference).string())
                    .col(ColumnDef::new(Escrows::FundedAt).timestamp())
                    .col(ColumnDef::new(Escrows::ReleasedAt).timestamp())
                    .col(ColumnDef::new(Escrows::RefundedAt).timestamp())
                    .col(ColumnDef::new(Escrows::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Escrows::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-escrows-contract_id")
                            .from(Escrows::Table, Escrows::ContractId)
                            .to(Contracts::Table, Contracts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Orders
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Orders::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Orders::OrderNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Orders::ContractId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Orders::FarmerId).string().not_null())
                    .col(ColumnDef::new(Orders::BuyerId).string().not_null())
                    .col(ColumnDef::new(Orders::LogisticsId).string())
                    .col(ColumnDef::new(Orders::QuantityKg).double().not_null())
                    .col(ColumnDef::new(Orders::DeliveryAddress).string().not_null())
                    .col(ColumnDef::new(Orders::DeliveryInstructions).string())
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Orders::ConfirmedAt).timestamp())
                    .col(ColumnDef::new(Orders::ShippedAt).timestamp())
                    .col(ColumnDef::new(Orders::DeliveredAt).timestamp())
                    .col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Orders::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-orders-contract_id")
                            .from(Orders::Table, Orders::ContractId)
                            .to(Contracts::Table, Contracts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. KYC submissions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(KycSubmissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(KycSubmissions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(KycSubmissions::UserId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(KycSubmissions::DocumentType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(KycSubmissions::DocumentNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(KycSubmissions::DocumentFilePath)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(KycSubmissions::SelfieFilePath).string())
                    .col(ColumnDef::new(KycSubmissions::BusinessRegistrationPath).string())
                    .col(ColumnDef::new(KycSubmissions::BusinessAddress).string())
                    .col(
                        ColumnDef::new(KycSubmissions::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(KycSubmissions::AdminNotes).string())
                    .col(ColumnDef::new(KycSubmissions::ReviewedBy).string())
                    .col(ColumnDef::new(KycSubmissions::ReviewedAt).timestamp())
                    .col(
                        ColumnDef::new(KycSubmissions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(KycSubmissions::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-kyc_submissions-user_id")
                            .from(KycSubmissions::Table, KycSubmissions::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-kyc_submissions-status")
                    .table(KycSubmissions::Table)
                    .col(KycSubmissions::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(KycSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Escrows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contracts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Offers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Listings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Farms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
