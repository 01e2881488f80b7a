//! JSON shapes exchanged with the marketplace API.
//!
//! Enums serialize as their lowercase storage strings (`in_transit`,
//! `national_id`, ...). Identifiers are UUIDs serialized as strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Farmer,
    Aggregator,
    Buyer,
    Logistics,
    Admin,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub email: String,
        pub username: String,
        pub password: String,
        pub full_name: String,
        pub phone: Option<String>,
        pub role: Role,
        pub business_name: Option<String>,
        pub business_address: Option<String>,
        pub business_registration: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    /// Issued on register and login.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Token {
        pub access_token: String,
        /// Always `bearer`.
        pub token_type: String,
        /// Seconds until `access_token` expires.
        pub expires_in: i64,
        pub user: super::user::User,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct User {
        pub id: Uuid,
        pub email: String,
        pub username: String,
        pub full_name: String,
        pub phone: Option<String>,
        pub role: Role,
        pub is_active: bool,
        pub is_verified: bool,
        pub kyc_status: super::kyc::KycStatus,
        pub business_name: Option<String>,
        pub business_address: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserUpdate {
        pub full_name: Option<String>,
        pub phone: Option<String>,
        pub business_name: Option<String>,
        pub business_address: Option<String>,
        pub business_registration: Option<String>,
    }
}

pub mod farm {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FarmNew {
        pub name: String,
        pub description: Option<String>,
        pub location: String,
        pub size_hectares: f64,
        pub soil_type: Option<String>,
        pub irrigation_type: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct FarmUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub location: Option<String>,
        pub size_hectares: Option<f64>,
        pub soil_type: Option<String>,
        pub irrigation_type: Option<String>,
        pub is_active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Farm {
        pub id: Uuid,
        pub farmer_id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub location: String,
        pub size_hectares: f64,
        pub soil_type: Option<String>,
        pub irrigation_type: Option<String>,
        pub is_active: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod listing {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ProduceType {
        Grains,
        Vegetables,
        Fruits,
        Tubers,
        Legumes,
        Other,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ListingStatus {
        Active,
        Sold,
        Expired,
        Cancelled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ListingNew {
        pub farm_id: Uuid,
        pub title: String,
        pub description: Option<String>,
        pub produce_type: ProduceType,
        pub quantity_kg: f64,
        pub unit_price_ngn: f64,
        pub harvest_date: Option<DateTime<Utc>>,
        pub expiry_date: Option<DateTime<Utc>>,
        #[serde(default)]
        pub is_organic: bool,
        pub quality_grade: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ListingUpdate {
        pub title: Option<String>,
        pub description: Option<String>,
        pub quantity_kg: Option<f64>,
        pub unit_price_ngn: Option<f64>,
        pub expiry_date: Option<DateTime<Utc>>,
        pub is_organic: Option<bool>,
        pub quality_grade: Option<String>,
        pub status: Option<ListingStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Listing {
        pub id: Uuid,
        pub farm_id: Uuid,
        pub farmer_id: Uuid,
        pub title: String,
        pub description: Option<String>,
        pub produce_type: ProduceType,
        pub quantity_kg: f64,
        pub unit_price_ngn: f64,
        pub total_price_ngn: f64,
        pub harvest_date: Option<DateTime<Utc>>,
        pub expiry_date: Option<DateTime<Utc>>,
        pub status: ListingStatus,
        pub is_organic: bool,
        pub quality_grade: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod offer {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum OfferStatus {
        Pending,
        Accepted,
        Rejected,
        Expired,
        Cancelled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OfferNew {
        pub listing_id: Uuid,
        pub quantity_kg: f64,
        pub unit_price_ngn: f64,
        pub delivery_date: Option<DateTime<Utc>>,
        pub delivery_location: String,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Offer {
        pub id: Uuid,
        pub listing_id: Uuid,
        pub buyer_id: Uuid,
        pub quantity_kg: f64,
        pub unit_price_ngn: f64,
        pub total_price_ngn: f64,
        pub delivery_date: Option<DateTime<Utc>>,
        pub delivery_location: String,
        pub notes: Option<String>,
        pub status: OfferStatus,
        pub expires_at: DateTime<Utc>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod contract {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ContractStatus {
        Active,
        Completed,
        Cancelled,
        Disputed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Contract {
        pub id: Uuid,
        pub contract_number: String,
        pub farmer_id: Uuid,
        pub buyer_id: Uuid,
        pub listing_id: Uuid,
        pub offer_id: Uuid,
        pub quantity_kg: f64,
        pub unit_price_ngn: f64,
        pub total_amount_ngn: f64,
        pub delivery_date: DateTime<Utc>,
        pub delivery_location: String,
        pub terms_and_conditions: Option<String>,
        pub status: ContractStatus,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod escrow {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum EscrowStatus {
        Pending,
        Funded,
        Released,
        Refunded,
        Disputed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Escrow {
        pub id: Uuid,
        pub escrow_number: String,
        pub contract_id: Uuid,
        pub buyer_id: Uuid,
        pub seller_id: Uuid,
        pub amount_ngn: f64,
        pub status: EscrowStatus,
        pub payment_reference: Option<String>,
        pub funded_at: Option<DateTime<Utc>>,
        pub released_at: Option<DateTime<Utc>>,
        pub refunded_at: Option<DateTime<Utc>>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod order {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum OrderStatus {
        Pending,
        Confirmed,
        InTransit,
        Delivered,
        Cancelled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderNew {
        pub delivery_address: String,
        pub delivery_instructions: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Order {
        pub id: Uuid,
        pub order_number: String,
        pub contract_id: Uuid,
        pub farmer_id: Uuid,
        pub buyer_id: Uuid,
        pub logistics_id: Option<Uuid>,
        pub quantity_kg: f64,
        pub delivery_address: String,
        pub delivery_instructions: Option<String>,
        pub status: OrderStatus,
        pub confirmed_at: Option<DateTime<Utc>>,
        pub shipped_at: Option<DateTime<Utc>>,
        pub delivered_at: Option<DateTime<Utc>>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod kyc {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DocumentType {
        NationalId,
        DriversLicense,
        Passport,
        CacCertificate,
        UtilityBill,
        BankStatement,
        Other,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum KycStatus {
        Pending,
        Approved,
        Rejected,
        UnderReview,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Kyc {
        pub id: Uuid,
        pub user_id: Uuid,
        pub document_type: DocumentType,
        pub document_number: String,
        pub document_file_path: String,
        pub selfie_file_path: Option<String>,
        pub business_registration_path: Option<String>,
        pub business_address: Option<String>,
        pub status: KycStatus,
        pub admin_notes: Option<String>,
        pub reviewed_by: Option<Uuid>,
        pub reviewed_at: Option<DateTime<Utc>>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct KycReview {
        pub status: KycStatus,
        pub admin_notes: Option<String>,
    }
}

pub mod health {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ServiceState {
        Healthy,
        Unhealthy,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Services {
        pub api: ServiceState,
        pub database: ServiceState,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: ServiceState,
        pub timestamp: DateTime<Utc>,
        pub version: String,
        pub services: Services,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Readiness {
        pub ready: bool,
        pub timestamp: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Liveness {
        pub alive: bool,
        pub timestamp: DateTime<Utc>,
    }
}
