//! Listing API endpoints

use api_types::listing::{Listing, ListingNew, ListingUpdate};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<ListingNew>,
) -> Result<Json<Listing>, ServerError> {
    let listing = state
        .engine
        .create_listing(
            &user.principal(),
            engine::NewListing {
                farm_id: payload.farm_id,
                title: payload.title,
                description: payload.description,
                produce_type: views::engine_produce_type(payload.produce_type),
                quantity_kg: payload.quantity_kg,
                unit_price_ngn: payload.unit_price_ngn,
                harvest_date: payload.harvest_date,
                expiry_date: payload.expiry_date,
                is_organic: payload.is_organic,
                quality_grade: payload.quality_grade,
            },
        )
        .await?;
    Ok(Json(views::listing(listing)))
}

/// Farmers see their own listings, everyone else the active catalog.
pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Listing>>, ServerError> {
    let listings = state.engine.listings(&user.principal()).await?;
    Ok(Json(listings.into_iter().map(views::listing).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Listing>, ServerError> {
    let listing = state.engine.listing(id).await?;
    Ok(Json(views::listing(listing)))
}

pub async fn update(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ListingUpdate>,
) -> Result<Json<Listing>, ServerError> {
    let listing = state
        .engine
        .update_listing(
            &user.principal(),
            id,
            engine::ListingUpdate {
                title: payload.title,
                description: payload.description,
                quantity_kg: payload.quantity_kg,
                unit_price_ngn: payload.unit_price_ngn,
                expiry_date: payload.expiry_date,
                is_organic: payload.is_organic,
                quality_grade: payload.quality_grade,
                status: payload.status.map(views::engine_listing_status),
            },
        )
        .await?;
    Ok(Json(views::listing(listing)))
}
