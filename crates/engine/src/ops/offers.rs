use chrono::Utc;
use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Action, EngineError, Listing, ListingStatus, NewOffer, Offer, OfferEvent, OfferStatus,
    Principal, ResultEngine, Role, listings, offers,
};

use super::{Engine, convert_all, find_required, with_tx};

impl Engine {
    /// Bid on an active listing. The offer is pending and expires after
    /// [`OFFER_LIFETIME_DAYS`](crate::OFFER_LIFETIME_DAYS).
    pub async fn create_offer(&self, principal: &Principal, cmd: NewOffer) -> ResultEngine<Offer> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let listing = listings::Entity::find_by_id(cmd.listing_id.to_string())
                .one(&db_tx)
                .await?
                .map(Listing::try_from)
                .transpose()?
                .filter(|listing| listing.status == ListingStatus::Active)
                .ok_or_else(|| {
                    EngineError::InvalidInput("Invalid or inactive listing".to_string())
                })?;
            principal.authorize(Action::CreateOffer {
                listing_owner: listing.farmer_id,
            })?;

            let offer = Offer::new(principal.id, cmd, now)?;
            offers::ActiveModel::from(&offer).insert(&db_tx).await?;
            tracing::info!(offer_id = %offer.id, listing_id = %offer.listing_id, "offer created");
            Ok(offer)
        })
    }

    /// Farmers see offers made on their listings; everybody else sees the
    /// offers they made.
    pub async fn offers(&self, principal: &Principal) -> ResultEngine<Vec<Offer>> {
        with_tx!(self, |db_tx| {
            let query = offers::Entity::find().order_by_desc(offers::Column::CreatedAt);
            let query = if principal.role == Role::Farmer {
                query
                    .inner_join(listings::Entity)
                    .filter(listings::Column::FarmerId.eq(principal.id.to_string()))
            } else {
                query.filter(offers::Column::BuyerId.eq(principal.id.to_string()))
            };
            convert_all(query.all(&db_tx).await?)
        })
    }

    pub async fn offer(&self, principal: &Principal, offer_id: Uuid) -> ResultEngine<Offer> {
        with_tx!(self, |db_tx| {
            let offer = Offer::try_from(
                find_required::<offers::Entity>(&db_tx, offer_id, "Offer not found").await?,
            )?;
            let listing = Listing::try_from(
                find_required::<listings::Entity>(&db_tx, offer.listing_id, "Listing not found")
                    .await?,
            )?;
            principal.authorize(Action::ViewOffer {
                buyer: offer.buyer_id,
                listing_owner: listing.farmer_id,
            })?;
            Ok(offer)
        })
    }

    /// Accept a pending, unexpired offer on one of the principal's listings.
    ///
    /// The listing must still be active and must not already have an
    /// accepted offer. Any failure leaves the offer untouched.
    pub async fn accept_offer(&self, principal: &Principal, offer_id: Uuid) -> ResultEngine<Offer> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let mut offer = Offer::try_from(
                find_required::<offers::Entity>(&db_tx, offer_id, "Offer not found").await?,
            )?;
            let listing = Listing::try_from(
                find_required::<listings::Entity>(&db_tx, offer.listing_id, "Listing not found")
                    .await?,
            )?;
            principal.authorize(Action::AcceptOffer {
                listing_owner: listing.farmer_id,
            })?;

            offer.status = offer.status.transition(OfferEvent::Accept {
                expires_at: offer.expires_at,
                now,
            })?;
            if listing.status != ListingStatus::Active {
                return Err(EngineError::InvalidState(
                    "Listing is no longer active".to_string(),
                ));
            }
            let already_accepted = offers::Entity::find()
                .filter(offers::Column::ListingId.eq(listing.id.to_string()))
                .filter(offers::Column::Status.eq(OfferStatus::Accepted.as_str()))
                .count(&db_tx)
                .await?;
            if already_accepted > 0 {
                return Err(EngineError::InvalidState(
                    "Listing already has an accepted offer".to_string(),
                ));
            }

            offer.updated_at = now;
            offers::ActiveModel::from(&offer).update(&db_tx).await?;
            tracing::info!(offer_id = %offer.id, "offer accepted");
            Ok(offer)
        })
    }
}
