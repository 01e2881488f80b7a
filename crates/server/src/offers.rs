//! Offer API endpoints

use api_types::offer::{Offer, OfferNew};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<OfferNew>,
) -> Result<Json<Offer>, ServerError> {
    let offer = state
        .engine
        .create_offer(
            &user.principal(),
            engine::NewOffer {
                listing_id: payload.listing_id,
                quantity_kg: payload.quantity_kg,
                unit_price_ngn: payload.unit_price_ngn,
                delivery_date: payload.delivery_date,
                delivery_location: payload.delivery_location,
                notes: payload.notes,
            },
        )
        .await?;
    Ok(Json(views::offer(offer)))
}

/// Offers made by a buyer, or received on a farmer's listings.
pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Offer>>, ServerError> {
    let offers = state.engine.offers(&user.principal()).await?;
    Ok(Json(offers.into_iter().map(views::offer).collect()))
}

pub async fn get(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Offer>, ServerError> {
    let offer = state.engine.offer(&user.principal(), id).await?;
    Ok(Json(views::offer(offer)))
}

pub async fn accept(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Offer>, ServerError> {
    let offer = state.engine.accept_offer(&user.principal(), id).await?;
    Ok(Json(views::offer(offer)))
}
