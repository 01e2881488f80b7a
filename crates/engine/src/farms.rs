//! Farms owned by farmer accounts.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq)]
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

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "farms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub farmer_id: String,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub size_hectares: f64,
    pub soil_type: Option<String>,
    pub irrigation_type: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FarmerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Farmer,
    #[sea_orm(has_many = "super::listings::Entity")]
    Listings,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farmer.def()
    }
}

impl Related<super::listings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Farm {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "farm")?,
            farmer_id: parse_uuid(&model.farmer_id, "farmer")?,
            name: model.name,
            description: model.description,
            location: model.location,
            size_hectares: model.size_hectares,
            soil_type: model.soil_type,
            irrigation_type: model.irrigation_type,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Farm> for ActiveModel {
    fn from(value: &Farm) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            farmer_id: ActiveValue::Set(value.farmer_id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            location: ActiveValue::Set(value.location.clone()),
            size_hectares: ActiveValue::Set(value.size_hectares),
            soil_type: ActiveValue::Set(value.soil_type.clone()),
            irrigation_type: ActiveValue::Set(value.irrigation_type.clone()),
            is_active: ActiveValue::Set(value.is_active),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}
