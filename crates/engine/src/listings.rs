//! Produce listings offered for sale by a farm.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ListingStatus, ResultEngine,
    commands::ListingUpdate,
    util::{
        normalize_optional_text, normalize_required_text, parse_uuid, require_positive,
        string_enum, total_price,
    },
};

string_enum! {
    /// Category of produce.
    pub enum ProduceType("produce type") {
        Grains => "grains",
        Vegetables => "vegetables",
        Fruits => "fruits",
        Tubers => "tubers",
        Legumes => "legumes",
        Other => "other",
    }
}

/// A listing.
///
/// `total_price_ngn` is derived: it always equals
/// `quantity_kg * unit_price_ngn` after construction and after [`apply`].
///
///  [`apply`]: Listing::apply
#[derive(Clone, Debug, PartialEq)]
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

impl Listing {
    pub(crate) fn new(
        farmer_id: Uuid,
        cmd: crate::commands::NewListing,
        now: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        let quantity_kg = require_positive(cmd.quantity_kg, "quantity_kg")?;
        let unit_price_ngn = require_positive(cmd.unit_price_ngn, "unit_price_ngn")?;
        let total_price_ngn = total_price(quantity_kg, unit_price_ngn)?;
        Ok(Self {
            id: Uuid::new_v4(),
            farm_id: cmd.farm_id,
            farmer_id,
            title: normalize_required_text(&cmd.title, "title")?,
            description: normalize_optional_text(cmd.description),
            produce_type: cmd.produce_type,
            quantity_kg,
            unit_price_ngn,
            total_price_ngn,
            harvest_date: cmd.harvest_date,
            expiry_date: cmd.expiry_date,
            status: ListingStatus::Active,
            is_organic: cmd.is_organic,
            quality_grade: normalize_optional_text(cmd.quality_grade),
            created_at: now,
            updated_at: now,
        })
    }

    /// Merge a partial update. A status change is routed through the listing
    /// state machine; the total is recomputed whenever a price factor is
    /// supplied. Only contract formation may mark a listing sold.
    pub(crate) fn apply(&mut self, update: ListingUpdate, now: DateTime<Utc>) -> ResultEngine<()> {
        if update.status == Some(ListingStatus::Sold) && self.status != ListingStatus::Sold {
            return Err(EngineError::InvalidState(
                "a listing is sold by forming a contract".to_string(),
            ));
        }
        if let Some(target) = update.status
            && let Some(event) = self.status.event_towards(target)
        {
            self.status = self.status.transition(event)?;
        }
        if let Some(title) = update.title {
            self.title = normalize_required_text(&title, "title")?;
        }
        if update.description.is_some() {
            self.description = normalize_optional_text(update.description);
        }
        if update.quality_grade.is_some() {
            self.quality_grade = normalize_optional_text(update.quality_grade);
        }
        if let Some(expiry_date) = update.expiry_date {
            self.expiry_date = Some(expiry_date);
        }
        if let Some(is_organic) = update.is_organic {
            self.is_organic = is_organic;
        }

        if update.quantity_kg.is_some() || update.unit_price_ngn.is_some() {
            let quantity_kg = match update.quantity_kg {
                Some(quantity_kg) => require_positive(quantity_kg, "quantity_kg")?,
                None => self.quantity_kg,
            };
            let unit_price_ngn = match update.unit_price_ngn {
                Some(unit_price_ngn) => require_positive(unit_price_ngn, "unit_price_ngn")?,
                None => self.unit_price_ngn,
            };
            self.total_price_ngn = total_price(quantity_kg, unit_price_ngn)?;
            self.quantity_kg = quantity_kg;
            self.unit_price_ngn = unit_price_ngn;
        }

        self.updated_at = now;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub farm_id: String,
    pub farmer_id: String,
    pub title: String,
    pub description: Option<String>,
    pub produce_type: String,
    pub quantity_kg: f64,
    pub unit_price_ngn: f64,
    pub total_price_ngn: f64,
    pub harvest_date: Option<DateTimeUtc>,
    pub expiry_date: Option<DateTimeUtc>,
    pub status: String,
    pub is_organic: bool,
    pub quality_grade: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::farms::Entity",
        from = "Column::FarmId",
        to = "super::farms::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Farm,
    #[sea_orm(has_many = "super::offers::Entity")]
    Offers,
}

impl Related<super::farms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farm.def()
    }
}

impl Related<super::offers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Listing {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "listing")?,
            farm_id: parse_uuid(&model.farm_id, "farm")?,
            farmer_id: parse_uuid(&model.farmer_id, "farmer")?,
            produce_type: ProduceType::try_from(model.produce_type.as_str())?,
            status: ListingStatus::try_from(model.status.as_str())?,
            title: model.title,
            description: model.description,
            quantity_kg: model.quantity_kg,
            unit_price_ngn: model.unit_price_ngn,
            total_price_ngn: model.total_price_ngn,
            harvest_date: model.harvest_date,
            expiry_date: model.expiry_date,
            is_organic: model.is_organic,
            quality_grade: model.quality_grade,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Listing> for ActiveModel {
    fn from(value: &Listing) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            farm_id: ActiveValue::Set(value.farm_id.to_string()),
            farmer_id: ActiveValue::Set(value.farmer_id.to_string()),
            title: ActiveValue::Set(value.title.clone()),
            description: ActiveValue::Set(value.description.clone()),
            produce_type: ActiveValue::Set(value.produce_type.as_str().to_string()),
            quantity_kg: ActiveValue::Set(value.quantity_kg),
            unit_price_ngn: ActiveValue::Set(value.unit_price_ngn),
            total_price_ngn: ActiveValue::Set(value.total_price_ngn),
            harvest_date: ActiveValue::Set(value.harvest_date),
            expiry_date: ActiveValue::Set(value.expiry_date),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            is_organic: ActiveValue::Set(value.is_organic),
            quality_grade: ActiveValue::Set(value.quality_grade.clone()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::commands::NewListing;

    fn listing() -> Listing {
        let now = Utc.timestamp_opt(0, 0).unwrap();
        let cmd = NewListing::new(
            Uuid::new_v4(),
            "Yellow maize",
            ProduceType::Grains,
            100.0,
            500.0,
        );
        Listing::new(Uuid::new_v4(), cmd, now).unwrap()
    }

    #[test]
    fn new_listing_computes_total() {
        let listing = listing();
        assert_eq!(listing.total_price_ngn, 50_000.0);
        assert_eq!(listing.status, ListingStatus::Active);
    }

    #[test]
    fn new_listing_rejects_non_positive_quantity() {
        let cmd = NewListing::new(Uuid::new_v4(), "Yams", ProduceType::Tubers, 0.0, 500.0);
        assert_eq!(
            Listing::new(Uuid::new_v4(), cmd, Utc::now()),
            Err(EngineError::InvalidInput(
                "quantity_kg must be > 0".to_string()
            ))
        );
    }

    #[test]
    fn new_listing_rejects_a_total_that_overflows() {
        let cmd = NewListing::new(Uuid::new_v4(), "Maize", ProduceType::Grains, 1e200, 1e200);
        assert_eq!(
            Listing::new(Uuid::new_v4(), cmd, Utc::now()),
            Err(EngineError::InvalidInput(
                "total_price_ngn out of range".to_string()
            ))
        );
    }

    #[test]
    fn repricing_into_overflow_leaves_the_listing_untouched() {
        let mut listing = listing();
        let err = listing.apply(
            ListingUpdate {
                quantity_kg: Some(1e200),
                unit_price_ngn: Some(1e200),
                ..ListingUpdate::default()
            },
            Utc::now(),
        );
        assert_eq!(
            err,
            Err(EngineError::InvalidInput(
                "total_price_ngn out of range".to_string()
            ))
        );
        assert_eq!(listing.quantity_kg, 100.0);
        assert_eq!(listing.total_price_ngn, 50_000.0);
    }

    #[test]
    fn update_of_one_factor_recomputes_total() {
        let mut listing = listing();
        listing
            .apply(
                ListingUpdate {
                    unit_price_ngn: Some(600.0),
                    ..ListingUpdate::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(listing.total_price_ngn, 60_000.0);

        listing
            .apply(
                ListingUpdate {
                    quantity_kg: Some(10.0),
                    ..ListingUpdate::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(listing.total_price_ngn, 6_000.0);
    }

    #[test]
    fn update_status_goes_through_the_state_machine() {
        let mut listing = listing();
        listing
            .apply(
                ListingUpdate {
                    status: Some(ListingStatus::Cancelled),
                    ..ListingUpdate::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(listing.status, ListingStatus::Cancelled);

        let err = listing.apply(
            ListingUpdate {
                status: Some(ListingStatus::Sold),
                ..ListingUpdate::default()
            },
            Utc::now(),
        );
        assert!(matches!(err, Err(EngineError::InvalidState(_))));
        assert_eq!(listing.status, ListingStatus::Cancelled);
    }
}
