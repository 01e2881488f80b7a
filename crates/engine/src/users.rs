//! Marketplace accounts.
//!
//! The password hash only lives in the storage [`Model`]; the [`User`] handed
//! out of the engine never carries it.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, KycStatus, Principal, Role, util::parse_uuid};

#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub is_verified: bool,
    pub kyc_status: KycStatus,
    pub business_name: Option<String>,
    pub business_address: Option<String>,
    pub business_registration: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn principal(&self) -> Principal {
        Principal::new(self.id, self.role, self.is_verified)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    pub hashed_password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub kyc_status: String,
    pub business_name: Option<String>,
    pub business_address: Option<String>,
    pub business_registration: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::farms::Entity")]
    Farms,
}

impl Related<super::farms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "user")?,
            role: Role::try_from(model.role.as_str())?,
            kyc_status: KycStatus::try_from(model.kyc_status.as_str())?,
            email: model.email,
            username: model.username,
            full_name: model.full_name,
            phone: model.phone,
            is_active: model.is_active,
            is_verified: model.is_verified,
            business_name: model.business_name,
            business_address: model.business_address,
            business_registration: model.business_registration,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl ActiveModel {
    /// Builds the insert model for a new account. The hash is produced by the
    /// caller; accounts always start active, unverified and with KYC pending.
    pub(crate) fn new_account(
        user: &crate::commands::NewUser,
        hashed_password: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            email: ActiveValue::Set(user.email.clone()),
            username: ActiveValue::Set(user.username.clone()),
            hashed_password: ActiveValue::Set(hashed_password),
            full_name: ActiveValue::Set(user.full_name.clone()),
            phone: ActiveValue::Set(user.phone.clone()),
            role: ActiveValue::Set(user.role.as_str().to_string()),
            is_active: ActiveValue::Set(true),
            is_verified: ActiveValue::Set(false),
            kyc_status: ActiveValue::Set(KycStatus::Pending.as_str().to_string()),
            business_name: ActiveValue::Set(user.business_name.clone()),
            business_address: ActiveValue::Set(user.business_address.clone()),
            business_registration: ActiveValue::Set(user.business_registration.clone()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
    }
}
