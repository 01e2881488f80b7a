//! Command structs for engine operations.
//!
//! These types group parameters for write operations (registration, farm and
//! listing edits, offers, orders, KYC), keeping call sites readable and
//! avoiding long argument lists. Update commands are partial: `None` leaves
//! the stored value untouched.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{DocumentType, KycStatus, ListingStatus, ProduceType, Role};

/// Register a new account.
#[derive(Clone, Debug)]
pub struct NewUser {
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

impl NewUser {
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        full_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            password: password.into(),
            full_name: full_name.into(),
            phone: None,
            role,
            business_name: None,
            business_address: None,
            business_registration: None,
        }
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn business_name(mut self, name: impl Into<String>) -> Self {
        self.business_name = Some(name.into());
        self
    }
}

/// Profile fields a user (or an admin) may change. The role is not here.
#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    pub business_address: Option<String>,
    pub business_registration: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewFarm {
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub size_hectares: f64,
    pub soil_type: Option<String>,
    pub irrigation_type: Option<String>,
}

impl NewFarm {
    #[must_use]
    pub fn new(name: impl Into<String>, location: impl Into<String>, size_hectares: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            location: location.into(),
            size_hectares,
            soil_type: None,
            irrigation_type: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FarmUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub size_hectares: Option<f64>,
    pub soil_type: Option<String>,
    pub irrigation_type: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct NewListing {
    pub farm_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub produce_type: ProduceType,
    pub quantity_kg: f64,
    pub unit_price_ngn: f64,
    pub harvest_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_organic: bool,
    pub quality_grade: Option<String>,
}

impl NewListing {
    #[must_use]
    pub fn new(
        farm_id: Uuid,
        title: impl Into<String>,
        produce_type: ProduceType,
        quantity_kg: f64,
        unit_price_ngn: f64,
    ) -> Self {
        Self {
            farm_id,
            title: title.into(),
            description: None,
            produce_type,
            quantity_kg,
            unit_price_ngn,
            harvest_date: None,
            expiry_date: None,
            is_organic: false,
            quality_grade: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
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

#[derive(Clone, Debug)]
pub struct NewOffer {
    pub listing_id: Uuid,
    pub quantity_kg: f64,
    pub unit_price_ngn: f64,
    pub delivery_date: Option<DateTime<Utc>>,
    pub delivery_location: String,
    pub notes: Option<String>,
}

impl NewOffer {
    #[must_use]
    pub fn new(
        listing_id: Uuid,
        quantity_kg: f64,
        unit_price_ngn: f64,
        delivery_location: impl Into<String>,
    ) -> Self {
        Self {
            listing_id,
            quantity_kg,
            unit_price_ngn,
            delivery_date: None,
            delivery_location: delivery_location.into(),
            notes: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewOrder {
    pub delivery_address: String,
    pub delivery_instructions: Option<String>,
}

/// A KYC submission whose files were already persisted by the caller.
#[derive(Clone, Debug)]
pub struct KycSubmission {
    pub document_type: DocumentType,
    pub document_number: String,
    pub document_file_path: String,
    pub selfie_file_path: Option<String>,
    pub business_registration_path: Option<String>,
    pub business_address: Option<String>,
}

#[derive(Clone, Debug)]
pub struct KycReview {
    pub status: KycStatus,
    pub admin_notes: Option<String>,
}
