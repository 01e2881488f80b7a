use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Action, EngineError, Kyc, KycEvent, KycReview, KycStatus, KycSubmission, Principal,
    ResultEngine, kyc, users, util::normalize_optional_text,
};

use super::{Engine, convert_all, find_required, with_tx};

const ALREADY_SUBMITTED: &str = "KYC already submitted";

impl Engine {
    /// Whether the user already has a KYC submission on file.
    ///
    /// Callers storing documents check this first so no files are written
    /// for a submission that would be rejected.
    pub async fn has_kyc(&self, user_id: Uuid) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let found = kyc::Entity::find()
                .filter(kyc::Column::UserId.eq(user_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            Ok(found)
        })
    }

    /// Record the principal's KYC submission. Only one per user.
    pub async fn submit_kyc(
        &self,
        principal: &Principal,
        submission: KycSubmission,
    ) -> ResultEngine<Kyc> {
        let record = Kyc::new(principal.id, submission, Utc::now())?;
        with_tx!(self, |db_tx| {
            let exists = kyc::Entity::find()
                .filter(kyc::Column::UserId.eq(principal.id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(ALREADY_SUBMITTED.to_string()));
            }

            kyc::ActiveModel::from(&record)
                .insert(&db_tx)
                .await
                .map_err(|err| EngineError::conflict_on_unique(err, ALREADY_SUBMITTED))?;
            tracing::info!(kyc_id = %record.id, user_id = %record.user_id, "kyc submitted");
            Ok(record)
        })
    }

    /// The principal's own submission.
    pub async fn kyc_status(&self, principal: &Principal) -> ResultEngine<Kyc> {
        with_tx!(self, |db_tx| {
            let model = kyc::Entity::find()
                .filter(kyc::Column::UserId.eq(principal.id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("KYC not found".to_string()))?;
            Kyc::try_from(model)
        })
    }

    /// Pending submissions, oldest first. Admin only.
    pub async fn kyc_queue(&self, principal: &Principal) -> ResultEngine<Vec<Kyc>> {
        principal.authorize(Action::ReviewKyc)?;
        with_tx!(self, |db_tx| {
            let models = kyc::Entity::find()
                .filter(kyc::Column::Status.eq(KycStatus::Pending.as_str()))
                .order_by_asc(kyc::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            convert_all(models)
        })
    }

    /// Apply an admin decision. Approval verifies the account; rejection
    /// marks it rejected. Both happen in the same transaction as the review.
    pub async fn review_kyc(
        &self,
        principal: &Principal,
        kyc_id: Uuid,
        review: KycReview,
    ) -> ResultEngine<Kyc> {
        principal.authorize(Action::ReviewKyc)?;
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let mut record = Kyc::try_from(
                find_required::<kyc::Entity>(&db_tx, kyc_id, "KYC not found").await?,
            )?;

            record.status = record.status.transition(KycEvent::Review(review.status))?;
            record.admin_notes = normalize_optional_text(review.admin_notes);
            record.reviewed_by = Some(principal.id);
            record.reviewed_at = Some(now);
            record.updated_at = now;
            kyc::ActiveModel::from(&record).update(&db_tx).await?;

            let user = find_required::<users::Entity>(&db_tx, record.user_id, "User not found")
                .await?;
            let mut user: users::ActiveModel = user.into();
            // A final decision decides verification; a move to under_review leaves it.
            match record.status {
                KycStatus::Approved => user.is_verified = ActiveValue::Set(true),
                KycStatus::Rejected => user.is_verified = ActiveValue::Set(false),
                KycStatus::Pending | KycStatus::UnderReview => {}
            }
            user.kyc_status = ActiveValue::Set(record.status.as_str().to_string());
            user.updated_at = ActiveValue::Set(now);
            user.update(&db_tx).await?;

            tracing::info!(kyc_id = %record.id, status = %record.status, reviewer = %principal.id, "kyc reviewed");
            Ok(record)
        })
    }
}
