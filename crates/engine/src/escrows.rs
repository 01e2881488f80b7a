//! Funds held against a contract until delivery.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    Contract, EngineError, EscrowStatus,
    util::{parse_uuid, reference_number},
};

#[derive(Clone, Debug, PartialEq)]
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

impl Escrow {
    pub(crate) fn for_contract(contract: &Contract, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            escrow_number: reference_number("ESC"),
            contract_id: contract.id,
            buyer_id: contract.buyer_id,
            seller_id: contract.farmer_id,
            amount_ngn: contract.total_amount_ngn,
            status: EscrowStatus::Pending,
            payment_reference: None,
            funded_at: None,
            released_at: None,
            refunded_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "escrows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub escrow_number: String,
    #[sea_orm(unique)]
    pub contract_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub amount_ngn: f64,
    pub status: String,
    pub payment_reference: Option<String>,
    pub funded_at: Option<DateTimeUtc>,
    pub released_at: Option<DateTimeUtc>,
    pub refunded_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Escrow {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "escrow")?,
            contract_id: parse_uuid(&model.contract_id, "contract")?,
            buyer_id: parse_uuid(&model.buyer_id, "buyer")?,
            seller_id: parse_uuid(&model.seller_id, "seller")?,
            status: EscrowStatus::try_from(model.status.as_str())?,
            escrow_number: model.escrow_number,
            amount_ngn: model.amount_ngn,
            payment_reference: model.payment_reference,
            funded_at: model.funded_at,
            released_at: model.released_at,
            refunded_at: model.refunded_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Escrow> for ActiveModel {
    fn from(value: &Escrow) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            escrow_number: ActiveValue::Set(value.escrow_number.clone()),
            contract_id: ActiveValue::Set(value.contract_id.to_string()),
            buyer_id: ActiveValue::Set(value.buyer_id.to_string()),
            seller_id: ActiveValue::Set(value.seller_id.to_string()),
            amount_ngn: ActiveValue::Set(value.amount_ngn),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            payment_reference: ActiveValue::Set(value.payment_reference.clone()),
            funded_at: ActiveValue::Set(value.funded_at),
            released_at: ActiveValue::Set(value.released_at),
            refunded_at: ActiveValue::Set(value.refunded_at),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}
