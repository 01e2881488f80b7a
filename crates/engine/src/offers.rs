//! Buyer offers against a listing.

use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, OfferStatus, ResultEngine,
    commands::NewOffer,
    util::{
        normalize_optional_text, normalize_required_text, parse_uuid, require_positive,
        total_price,
    },
};

/// How long a buyer's offer stays acceptable.
pub const OFFER_LIFETIME_DAYS: i64 = 7;

#[derive(Clone, Debug, PartialEq)]
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

impl Offer {
    pub(crate) fn new(buyer_id: Uuid, cmd: NewOffer, now: DateTime<Utc>) -> ResultEngine<Self> {
        let quantity_kg = require_positive(cmd.quantity_kg, "quantity_kg")?;
        let unit_price_ngn = require_positive(cmd.unit_price_ngn, "unit_price_ngn")?;
        let total_price_ngn = total_price(quantity_kg, unit_price_ngn)?;
        Ok(Self {
            id: Uuid::new_v4(),
            listing_id: cmd.listing_id,
            buyer_id,
            quantity_kg,
            unit_price_ngn,
            total_price_ngn,
            delivery_date: cmd.delivery_date,
            delivery_location: normalize_required_text(
                &cmd.delivery_location,
                "delivery_location",
            )?,
            notes: normalize_optional_text(cmd.notes),
            status: OfferStatus::Pending,
            expires_at: now + Duration::days(OFFER_LIFETIME_DAYS),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "offers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub listing_id: String,
    pub buyer_id: String,
    pub quantity_kg: f64,
    pub unit_price_ngn: f64,
    pub total_price_ngn: f64,
    pub delivery_date: Option<DateTimeUtc>,
    pub delivery_location: String,
    pub notes: Option<String>,
    pub status: String,
    pub expires_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::listings::Entity",
        from = "Column::ListingId",
        to = "super::listings::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Listing,
}

impl Related<super::listings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Offer {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "offer")?,
            listing_id: parse_uuid(&model.listing_id, "listing")?,
            buyer_id: parse_uuid(&model.buyer_id, "buyer")?,
            status: OfferStatus::try_from(model.status.as_str())?,
            quantity_kg: model.quantity_kg,
            unit_price_ngn: model.unit_price_ngn,
            total_price_ngn: model.total_price_ngn,
            delivery_date: model.delivery_date,
            delivery_location: model.delivery_location,
            notes: model.notes,
            expires_at: model.expires_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Offer> for ActiveModel {
    fn from(value: &Offer) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            listing_id: ActiveValue::Set(value.listing_id.to_string()),
            buyer_id: ActiveValue::Set(value.buyer_id.to_string()),
            quantity_kg: ActiveValue::Set(value.quantity_kg),
            unit_price_ngn: ActiveValue::Set(value.unit_price_ngn),
            total_price_ngn: ActiveValue::Set(value.total_price_ngn),
            delivery_date: ActiveValue::Set(value.delivery_date),
            delivery_location: ActiveValue::Set(value.delivery_location.clone()),
            notes: ActiveValue::Set(value.notes.clone()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            expires_at: ActiveValue::Set(value.expires_at),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_offer_expires_in_seven_days() {
        let now = Utc::now();
        let offer = Offer::new(
            Uuid::new_v4(),
            NewOffer::new(Uuid::new_v4(), 50.0, 450.0, "Kano"),
            now,
        )
        .unwrap();

        assert_eq!(offer.total_price_ngn, 22_500.0);
        assert_eq!(offer.expires_at - offer.created_at, Duration::days(7));
        assert_eq!(offer.status, OfferStatus::Pending);
    }

    #[test]
    fn new_offer_rejects_a_total_that_overflows() {
        let cmd = NewOffer::new(Uuid::new_v4(), 1e200, 1e200, "Kano");
        assert_eq!(
            Offer::new(Uuid::new_v4(), cmd, Utc::now()),
            Err(EngineError::InvalidInput(
                "total_price_ngn out of range".to_string()
            ))
        );
    }

    #[test]
    fn new_offer_requires_a_delivery_location() {
        let cmd = NewOffer::new(Uuid::new_v4(), 50.0, 450.0, "  ");
        assert!(matches!(
            Offer::new(Uuid::new_v4(), cmd, Utc::now()),
            Err(EngineError::InvalidInput(_))
        ));
    }
}
