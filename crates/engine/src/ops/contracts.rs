use chrono::Utc;
use sea_orm::{Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Action, Contract, EngineError, Listing, ListingEvent, Offer, OfferStatus, Principal,
    ResultEngine, contracts, listings, offers,
};

use super::{Engine, convert_all, find_required, with_tx};

impl Engine {
    /// Turn an accepted offer into a contract and mark its listing sold, in
    /// one transaction.
    pub async fn create_contract(
        &self,
        principal: &Principal,
        offer_id: Uuid,
    ) -> ResultEngine<Contract> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let offer = offers::Entity::find_by_id(offer_id.to_string())
                .one(&db_tx)
                .await?
                .map(Offer::try_from)
                .transpose()?
                .filter(|offer| offer.status == OfferStatus::Accepted)
                .ok_or_else(|| {
                    EngineError::InvalidInput("Invalid or unaccepted offer".to_string())
                })?;
            let mut listing = Listing::try_from(
                find_required::<listings::Entity>(&db_tx, offer.listing_id, "Listing not found")
                    .await?,
            )?;
            principal.authorize(Action::CreateContract {
                listing_owner: listing.farmer_id,
            })?;

            let exists = contracts::Entity::find()
                .filter(contracts::Column::OfferId.eq(offer.id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(
                    "Contract already exists for this offer".to_string(),
                ));
            }

            listing.status = listing.status.transition(ListingEvent::Sell)?;
            listing.updated_at = now;
            listings::ActiveModel::from(&listing).update(&db_tx).await?;

            let contract = Contract::from_offer(&offer, &listing, now);
            contracts::ActiveModel::from(&contract)
                .insert(&db_tx)
                .await
                .map_err(|err| {
                    EngineError::conflict_on_unique(err, "Contract already exists for this offer")
                })?;
            tracing::info!(
                contract_number = %contract.contract_number,
                listing_id = %listing.id,
                "contract formed"
            );
            Ok(contract)
        })
    }

    /// Contracts where the principal is the farmer or the buyer.
    pub async fn contracts(&self, principal: &Principal) -> ResultEngine<Vec<Contract>> {
        with_tx!(self, |db_tx| {
            let id = principal.id.to_string();
            let models = contracts::Entity::find()
                .filter(
                    Condition::any()
                        .add(contracts::Column::FarmerId.eq(id.clone()))
                        .add(contracts::Column::BuyerId.eq(id)),
                )
                .order_by_desc(contracts::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            convert_all(models)
        })
    }

    pub async fn contract(&self, principal: &Principal, contract_id: Uuid) -> ResultEngine<Contract> {
        with_tx!(self, |db_tx| {
            let contract = Contract::try_from(
                find_required::<contracts::Entity>(&db_tx, contract_id, "Contract not found")
                    .await?,
            )?;
            principal.authorize(Action::ViewContract {
                farmer: contract.farmer_id,
                buyer: contract.buyer_id,
            })?;
            Ok(contract)
        })
    }
}
