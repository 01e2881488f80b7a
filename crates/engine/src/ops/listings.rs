use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Action, EngineError, Listing, ListingStatus, ListingUpdate, NewListing, Principal,
    ResultEngine, Role, farms, listings,
};

use super::{Engine, convert_all, find_required, with_tx};

impl Engine {
    /// Publish produce from one of the principal's farms. The listing starts
    /// active with `total_price_ngn = quantity_kg * unit_price_ngn`.
    pub async fn create_listing(
        &self,
        principal: &Principal,
        cmd: NewListing,
    ) -> ResultEngine<Listing> {
        principal.authorize(Action::CreateListing)?;
        let listing = Listing::new(principal.id, cmd, Utc::now())?;

        with_tx!(self, |db_tx| {
            let owns_farm = farms::Entity::find_by_id(listing.farm_id.to_string())
                .filter(farms::Column::FarmerId.eq(principal.id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if !owns_farm {
                return Err(EngineError::InvalidInput(
                    "Invalid farm or farm ownership".to_string(),
                ));
            }

            listings::ActiveModel::from(&listing).insert(&db_tx).await?;
            tracing::info!(listing_id = %listing.id, total = listing.total_price_ngn, "listing created");
            Ok(listing)
        })
    }

    /// Farmers see all of their own listings; everybody else sees the
    /// active catalog.
    pub async fn listings(&self, principal: &Principal) -> ResultEngine<Vec<Listing>> {
        with_tx!(self, |db_tx| {
            let query = listings::Entity::find().order_by_desc(listings::Column::CreatedAt);
            let query = if principal.role == Role::Farmer {
                query.filter(listings::Column::FarmerId.eq(principal.id.to_string()))
            } else {
                query.filter(listings::Column::Status.eq(ListingStatus::Active.as_str()))
            };
            convert_all(query.all(&db_tx).await?)
        })
    }

    pub async fn listing(&self, listing_id: Uuid) -> ResultEngine<Listing> {
        with_tx!(self, |db_tx| {
            let model =
                find_required::<listings::Entity>(&db_tx, listing_id, "Listing not found").await?;
            Listing::try_from(model)
        })
    }

    /// Merge the supplied fields into an owned listing, recomputing the total
    /// when a price factor changes.
    pub async fn update_listing(
        &self,
        principal: &Principal,
        listing_id: Uuid,
        update: ListingUpdate,
    ) -> ResultEngine<Listing> {
        with_tx!(self, |db_tx| {
            let model =
                find_required::<listings::Entity>(&db_tx, listing_id, "Listing not found").await?;
            let mut listing = Listing::try_from(model)?;
            principal.authorize(Action::UpdateListing {
                owner: listing.farmer_id,
            })?;

            listing.apply(update, Utc::now())?;
            listings::ActiveModel::from(&listing).update(&db_tx).await?;
            Ok(listing)
        })
    }
}
