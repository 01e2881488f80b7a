//! Contracts formed from accepted offers. Financial terms never change after
//! creation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    ContractStatus, EngineError, Listing, Offer,
    util::{parse_uuid, reference_number},
};

#[derive(Clone, Debug, PartialEq)]
pub struct Contract {
    pub id: Uuid,
    /// `CTR-` followed by 8 upper-case hex digits.
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

impl Contract {
    /// Materialize an accepted offer. Terms are copied from the offer; a
    /// missing delivery date falls back to `now`.
    pub(crate) fn from_offer(offer: &Offer, listing: &Listing, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            contract_number: reference_number("CTR"),
            farmer_id: listing.farmer_id,
            buyer_id: offer.buyer_id,
            listing_id: listing.id,
            offer_id: offer.id,
            quantity_kg: offer.quantity_kg,
            unit_price_ngn: offer.unit_price_ngn,
            total_amount_ngn: offer.total_price_ngn,
            delivery_date: offer.delivery_date.unwrap_or(now),
            delivery_location: offer.delivery_location.clone(),
            terms_and_conditions: None,
            status: ContractStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub contract_number: String,
    pub farmer_id: String,
    pub buyer_id: String,
    pub listing_id: String,
    #[sea_orm(unique)]
    pub offer_id: String,
    pub quantity_kg: f64,
    pub unit_price_ngn: f64,
    pub total_amount_ngn: f64,
    pub delivery_date: DateTimeUtc,
    pub delivery_location: String,
    pub terms_and_conditions: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Contract {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "contract")?,
            farmer_id: parse_uuid(&model.farmer_id, "farmer")?,
            buyer_id: parse_uuid(&model.buyer_id, "buyer")?,
            listing_id: parse_uuid(&model.listing_id, "listing")?,
            offer_id: parse_uuid(&model.offer_id, "offer")?,
            status: ContractStatus::try_from(model.status.as_str())?,
            contract_number: model.contract_number,
            quantity_kg: model.quantity_kg,
            unit_price_ngn: model.unit_price_ngn,
            total_amount_ngn: model.total_amount_ngn,
            delivery_date: model.delivery_date,
            delivery_location: model.delivery_location,
            terms_and_conditions: model.terms_and_conditions,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Contract> for ActiveModel {
    fn from(value: &Contract) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            contract_number: ActiveValue::Set(value.contract_number.clone()),
            farmer_id: ActiveValue::Set(value.farmer_id.to_string()),
            buyer_id: ActiveValue::Set(value.buyer_id.to_string()),
            listing_id: ActiveValue::Set(value.listing_id.to_string()),
            offer_id: ActiveValue::Set(value.offer_id.to_string()),
            quantity_kg: ActiveValue::Set(value.quantity_kg),
            unit_price_ngn: ActiveValue::Set(value.unit_price_ngn),
            total_amount_ngn: ActiveValue::Set(value.total_amount_ngn),
            delivery_date: ActiveValue::Set(value.delivery_date),
            delivery_location: ActiveValue::Set(value.delivery_location.clone()),
            terms_and_conditions: ActiveValue::Set(value.terms_and_conditions.clone()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}
