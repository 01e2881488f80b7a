//! Delivery tracking for a funded contract.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    Contract, EngineError, OrderStatus, ResultEngine,
    commands::NewOrder,
    util::{
        normalize_optional_text, normalize_required_text, parse_optional_uuid, parse_uuid,
        reference_number,
    },
};

#[derive(Clone, Debug, PartialEq)]
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

impl Order {
    pub(crate) fn for_contract(
        contract: &Contract,
        cmd: NewOrder,
        now: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            order_number: reference_number("ORD"),
            contract_id: contract.id,
            farmer_id: contract.farmer_id,
            buyer_id: contract.buyer_id,
            logistics_id: None,
            quantity_kg: contract.quantity_kg,
            delivery_address: normalize_required_text(&cmd.delivery_address, "delivery_address")?,
            delivery_instructions: normalize_optional_text(cmd.delivery_instructions),
            status: OrderStatus::Pending,
            confirmed_at: None,
            shipped_at: None,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub order_number: String,
    #[sea_orm(unique)]
    pub contract_id: String,
    pub farmer_id: String,
    pub buyer_id: String,
    pub logistics_id: Option<String>,
    pub quantity_kg: f64,
    pub delivery_address: String,
    pub delivery_instructions: Option<String>,
    pub status: String,
    pub confirmed_at: Option<DateTimeUtc>,
    pub shipped_at: Option<DateTimeUtc>,
    pub delivered_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Order {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "order")?,
            contract_id: parse_uuid(&model.contract_id, "contract")?,
            farmer_id: parse_uuid(&model.farmer_id, "farmer")?,
            buyer_id: parse_uuid(&model.buyer_id, "buyer")?,
            logistics_id: parse_optional_uuid(model.logistics_id.as_deref(), "logistics")?,
            status: OrderStatus::try_from(model.status.as_str())?,
            order_number: model.order_number,
            quantity_kg: model.quantity_kg,
            delivery_address: model.delivery_address,
            delivery_instructions: model.delivery_instructions,
            confirmed_at: model.confirmed_at,
            shipped_at: model.shipped_at,
            delivered_at: model.delivered_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Order> for ActiveModel {
    fn from(value: &Order) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            order_number: ActiveValue::Set(value.order_number.clone()),
            contract_id: ActiveValue::Set(value.contract_id.to_string()),
            farmer_id: ActiveValue::Set(value.farmer_id.to_string()),
            buyer_id: ActiveValue::Set(value.buyer_id.to_string()),
            logistics_id: ActiveValue::Set(value.logistics_id.map(|id| id.to_string())),
            quantity_kg: ActiveValue::Set(value.quantity_kg),
            delivery_address: ActiveValue::Set(value.delivery_address.clone()),
            delivery_instructions: ActiveValue::Set(value.delivery_instructions.clone()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            confirmed_at: ActiveValue::Set(value.confirmed_at),
            shipped_at: ActiveValue::Set(value.shipped_at),
            delivered_at: ActiveValue::Set(value.delivered_at),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}
