//! KYC submissions: one per user, reviewed by admins.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, KycStatus, ResultEngine,
    commands::KycSubmission,
    util::{
        normalize_optional_text, normalize_required_text, parse_optional_uuid, parse_uuid,
        string_enum,
    },
};

string_enum! {
    /// Kind of identity document attached to a submission.
    pub enum DocumentType("document type") {
        NationalId => "national_id",
        DriversLicense => "drivers_license",
        Passport => "passport",
        CacCertificate => "cac_certificate",
        UtilityBill => "utility_bill",
        BankStatement => "bank_statement",
        Other => "other",
    }
}

#[derive(Clone, Debug, PartialEq)]
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

impl Kyc {
    pub(crate) fn new(
        user_id: Uuid,
        submission: KycSubmission,
        now: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            document_type: submission.document_type,
            document_number: normalize_required_text(
                &submission.document_number,
                "document_number",
            )?,
            document_file_path: submission.document_file_path,
            selfie_file_path: submission.selfie_file_path,
            business_registration_path: submission.business_registration_path,
            business_address: normalize_optional_text(submission.business_address),
            status: KycStatus::Pending,
            admin_notes: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "kyc_submissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub user_id: String,
    pub document_type: String,
    pub document_number: String,
    pub document_file_path: String,
    pub selfie_file_path: Option<String>,
    pub business_registration_path: Option<String>,
    pub business_address: Option<String>,
    pub status: String,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Kyc {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "kyc")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            document_type: DocumentType::try_from(model.document_type.as_str())?,
            status: KycStatus::try_from(model.status.as_str())?,
            reviewed_by: parse_optional_uuid(model.reviewed_by.as_deref(), "reviewer")?,
            document_number: model.document_number,
            document_file_path: model.document_file_path,
            selfie_file_path: model.selfie_file_path,
            business_registration_path: model.business_registration_path,
            business_address: model.business_address,
            admin_notes: model.admin_notes,
            reviewed_at: model.reviewed_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Kyc> for ActiveModel {
    fn from(value: &Kyc) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.to_string()),
            document_type: ActiveValue::Set(value.document_type.as_str().to_string()),
            document_number: ActiveValue::Set(value.document_number.clone()),
            document_file_path: ActiveValue::Set(value.document_file_path.clone()),
            selfie_file_path: ActiveValue::Set(value.selfie_file_path.clone()),
            business_registration_path: ActiveValue::Set(value.business_registration_path.clone()),
            business_address: ActiveValue::Set(value.business_address.clone()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            admin_notes: ActiveValue::Set(value.admin_notes.clone()),
            reviewed_by: ActiveValue::Set(value.reviewed_by.map(|id| id.to_string())),
            reviewed_at: ActiveValue::Set(value.reviewed_at),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}
