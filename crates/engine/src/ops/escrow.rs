use chrono::Utc;
use sea_orm::{Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Action, Contract, EngineError, Escrow, EscrowEvent, Principal, ResultEngine, contracts,
    escrows,
};

use super::{Engine, convert_all, find_required, with_tx};

const DUPLICATE_ESCROW: &str = "Escrow already exists for this contract";

impl Engine {
    /// Open a pending escrow for the full contract amount. Buyer only, at
    /// most one per contract.
    pub async fn create_escrow(
        &self,
        principal: &Principal,
        contract_id: Uuid,
    ) -> ResultEngine<Escrow> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let contract = Contract::try_from(
                find_required::<contracts::Entity>(&db_tx, contract_id, "Contract not found")
                    .await?,
            )?;
            principal.authorize(Action::CreateEscrow {
                buyer: contract.buyer_id,
            })?;

            let exists = escrows::Entity::find()
                .filter(escrows::Column::ContractId.eq(contract.id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(DUPLICATE_ESCROW.to_string()));
            }

            let escrow = Escrow::for_contract(&contract, now);
            escrows::ActiveModel::from(&escrow)
                .insert(&db_tx)
                .await
                .map_err(|err| EngineError::conflict_on_unique(err, DUPLICATE_ESCROW))?;
            tracing::info!(escrow_number = %escrow.escrow_number, amount = escrow.amount_ngn, "escrow opened");
            Ok(escrow)
        })
    }

    /// Charge the buyer through the payment gateway and mark the escrow funded.
    pub async fn fund_escrow(&self, principal: &Principal, escrow_id: Uuid) -> ResultEngine<Escrow> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let mut escrow = Escrow::try_from(
                find_required::<escrows::Entity>(&db_tx, escrow_id, "Escrow not found").await?,
            )?;
            principal.authorize(Action::FundEscrow {
                buyer: escrow.buyer_id,
            })?;

            escrow.status = escrow.status.transition(EscrowEvent::Fund)?;
            let reference = self
                .payment
                .charge(&escrow.escrow_number, escrow.amount_ngn)?;
            escrow.payment_reference = Some(reference);
            escrow.funded_at = Some(now);
            escrow.updated_at = now;

            escrows::ActiveModel::from(&escrow).update(&db_tx).await?;
            tracing::info!(escrow_number = %escrow.escrow_number, "escrow funded");
            Ok(escrow)
        })
    }

    /// Escrows where the principal is the buyer or the seller.
    pub async fn escrows(&self, principal: &Principal) -> ResultEngine<Vec<Escrow>> {
        with_tx!(self, |db_tx| {
            let id = principal.id.to_string();
            let models = escrows::Entity::find()
                .filter(
                    Condition::any()
                        .add(escrows::Column::BuyerId.eq(id.clone()))
                        .add(escrows::Column::SellerId.eq(id)),
                )
                .order_by_desc(escrows::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            convert_all(models)
        })
    }

    pub async fn escrow(&self, principal: &Principal, escrow_id: Uuid) -> ResultEngine<Escrow> {
        with_tx!(self, |db_tx| {
            let escrow = Escrow::try_from(
                find_required::<escrows::Entity>(&db_tx, escrow_id, "Escrow not found").await?,
            )?;
            principal.authorize(Action::ViewEscrow {
                buyer: escrow.buyer_id,
                seller: escrow.seller_id,
            })?;
            Ok(escrow)
        })
    }
}
