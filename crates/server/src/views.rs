//! Conversions between engine values and their JSON shapes.

use api_types::{
    contract::Contract, escrow::Escrow, farm::Farm, kyc::Kyc, listing::Listing, offer::Offer,
    order::Order, user::User,
};

/// Both directions of a variant-for-variant enum mapping.
macro_rules! mirror_enum {
    ($to_api:ident, $to_engine:ident, $engine:ty, $api:ty, [$($variant:ident),+ $(,)?]) => {
        pub fn $to_api(value: $engine) -> $api {
            type E = $engine;
            type A = $api;
            match value {
                $(E::$variant => A::$variant),+
            }
        }

        #[allow(dead_code)]
        pub fn $to_engine(value: $api) -> $engine {
            type E = $engine;
            type A = $api;
            match value {
                $(A::$variant => E::$variant),+
            }
        }
    };
}

mirror_enum!(role, engine_role, engine::Role, api_types::Role, [
    Farmer, Aggregator, Buyer, Logistics, Admin
]);
mirror_enum!(kyc_status, engine_kyc_status, engine::KycStatus, api_types::kyc::KycStatus, [
    Pending, Approved, Rejected, UnderReview
]);
mirror_enum!(document_type, engine_document_type, engine::DocumentType, api_types::kyc::DocumentType, [
    NationalId, DriversLicense, Passport, CacCertificate, UtilityBill, BankStatement, Other
]);
mirror_enum!(produce_type, engine_produce_type, engine::ProduceType, api_types::listing::ProduceType, [
    Grains, Vegetables, Fruits, Tubers, Legumes, Other
]);
mirror_enum!(listing_status, engine_listing_status, engine::ListingStatus, api_types::listing::ListingStatus, [
    Active, Sold, Expired, Cancelled
]);
mirror_enum!(offer_status, engine_offer_status, engine::OfferStatus, api_types::offer::OfferStatus, [
    Pending, Accepted, Rejected, Expired, Cancelled
]);
mirror_enum!(contract_status, engine_contract_status, engine::ContractStatus, api_types::contract::ContractStatus, [
    Active, Completed, Cancelled, Disputed
]);
mirror_enum!(escrow_status, engine_escrow_status, engine::EscrowStatus, api_types::escrow::EscrowStatus, [
    Pending, Funded, Released, Refunded, Disputed
]);
mirror_enum!(order_status, engine_order_status, engine::OrderStatus, api_types::order::OrderStatus, [
    Pending, Confirmed, InTransit, Delivered, Cancelled
]);

pub fn user(user: engine::User) -> User {
    User {
        id: user.id,
        email: user.email,
        username: user.username,
        full_name: user.full_name,
        phone: user.phone,
        role: role(user.role),
        is_active: user.is_active,
        is_verified: user.is_verified,
        kyc_status: kyc_status(user.kyc_status),
        business_name: user.business_name,
        business_address: user.business_address,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

pub fn farm(farm: engine::Farm) -> Farm {
    Farm {
        id: farm.id,
        farmer_id: farm.farmer_id,
        name: farm.name,
        description: farm.description,
        location: farm.location,
        size_hectares: farm.size_hectares,
        soil_type: farm.soil_type,
        irrigation_type: farm.irrigation_type,
        is_active: farm.is_active,
        created_at: farm.created_at,
        updated_at: farm.updated_at,
    }
}

pub fn listing(listing: engine::Listing) -> Listing {
    Listing {
        id: listing.id,
        farm_id: listing.farm_id,
        farmer_id: listing.farmer_id,
        title: listing.title,
        description: listing.description,
        produce_type: produce_type(listing.produce_type),
        quantity_kg: listing.quantity_kg,
        unit_price_ngn: listing.unit_price_ngn,
        total_price_ngn: listing.total_price_ngn,
        harvest_date: listing.harvest_date,
        expiry_date: listing.expiry_date,
        status: listing_status(listing.status),
        is_organic: listing.is_organic,
        quality_grade: listing.quality_grade,
        created_at: listing.created_at,
        updated_at: listing.updated_at,
    }
}

pub fn offer(offer: engine::Offer) -> Offer {
    Offer {
        id: offer.id,
        listing_id: offer.listing_id,
        buyer_id: offer.buyer_id,
        quantity_kg: offer.quantity_kg,
        unit_price_ngn: offer.unit_price_ngn,
        total_price_ngn: offer.total_price_ngn,
        delivery_date: offer.delivery_date,
        delivery_location: offer.delivery_location,
        notes: offer.notes,
        status: offer_status(offer.status),
        expires_at: offer.expires_at,
        created_at: offer.created_at,
        updated_at: offer.updated_at,
    }
}

pub fn contract(contract: engine::Contract) -> Contract {
    Contract {
        id: contract.id,
        contract_number: contract.contract_number,
        farmer_id: contract.farmer_id,
        buyer_id: contract.buyer_id,
        listing_id: contract.listing_id,
        offer_id: contract.offer_id,
        quantity_kg: contract.quantity_kg,
        unit_price_ngn: contract.unit_price_ngn,
        total_amount_ngn: contract.total_amount_ngn,
        delivery_date: contract.delivery_date,
        delivery_location: contract.delivery_location,
        terms_and_conditions: contract.terms_and_conditions,
        status: contract_status(contract.status),
        created_at: contract.created_at,
        updated_at: contract.updated_at,
    }
}

pub fn escrow(escrow: engine::Escrow) -> Escrow {
    Escrow {
        id: escrow.id,
        escrow_number: escrow.escrow_number,
        contract_id: escrow.contract_id,
        buyer_id: escrow.buyer_id,
        seller_id: escrow.seller_id,
        amount_ngn: escrow.amount_ngn,
        status: escrow_status(escrow.status),
        payment_reference: escrow.payment_reference,
        funded_at: escrow.funded_at,
        released_at: escrow.released_at,
        refunded_at: escrow.refunded_at,
        created_at: escrow.created_at,
        updated_at: escrow.updated_at,
    }
}

pub fn order(order: engine::Order) -> Order {
    Order {
        id: order.id,
        order_number: order.order_number,
        contract_id: order.contract_id,
        farmer_id: order.farmer_id,
        buyer_id: order.buyer_id,
        logistics_id: order.logistics_id,
        quantity_kg: order.quantity_kg,
        delivery_address: order.delivery_address,
        delivery_instructions: order.delivery_instructions,
        status: order_status(order.status),
        confirmed_at: order.confirmed_at,
        shipped_at: order.shipped_at,
        delivered_at: order.delivered_at,
        created_at: order.created_at,
        updated_at: order.updated_at,
    }
}

pub fn kyc(kyc: engine::Kyc) -> Kyc {
    Kyc {
        id: kyc.id,
        user_id: kyc.user_id,
        document_type: document_type(kyc.document_type),
        document_number: kyc.document_number,
        document_file_path: kyc.document_file_path,
        selfie_file_path: kyc.selfie_file_path,
        business_registration_path: kyc.business_registration_path,
        business_address: kyc.business_address,
        status: kyc_status(kyc.status),
        admin_notes: kyc.admin_notes,
        reviewed_by: kyc.reviewed_by,
        reviewed_at: kyc.reviewed_at,
        created_at: kyc.created_at,
        updated_at: kyc.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_map_both_ways() {
        assert_eq!(
            order_status(engine::OrderStatus::InTransit),
            api_types::order::OrderStatus::InTransit
        );
        assert_eq!(
            engine_role(api_types::Role::Logistics),
            engine::Role::Logistics
        );
        assert_eq!(
            engine_document_type(document_type(engine::DocumentType::CacCertificate)),
            engine::DocumentType::CacCertificate
        );
    }
}
