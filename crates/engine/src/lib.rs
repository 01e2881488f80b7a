//! Domain engine of the marketplace.
//!
//! The engine owns the database connection and exposes every workflow step
//! (identity, farms, listings, offers, contracts, escrow, orders, KYC) as an
//! async method on [`Engine`]. Each method runs inside a single database
//! transaction and checks the caller's [`Principal`] before touching state.

pub use access::{Action, Principal, Role};
pub use commands::{
    FarmUpdate, KycReview, KycSubmission, ListingUpdate, NewFarm, NewListing, NewOffer, NewOrder,
    NewUser, UserUpdate,
};
pub use contracts::Contract;
pub use error::EngineError;
pub use escrows::Escrow;
pub use farms::Farm;
pub use kyc::{DocumentType, Kyc};
pub use listings::{Listing, ProduceType};
pub use offers::{OFFER_LIFETIME_DAYS, Offer};
pub use ops::{Engine, EngineBuilder};
pub use orders::Order;
pub use payment::{MockPaymentGateway, PaymentGateway};
pub use status::{
    ContractStatus, EscrowEvent, EscrowStatus, KycEvent, KycStatus, ListingEvent, ListingStatus,
    OfferEvent, OfferStatus, OrderEvent, OrderStatus,
};
pub use users::User;

mod access;
mod commands;
mod contracts;
mod error;
mod escrows;
mod farms;
mod kyc;
mod listings;
mod offers;
mod ops;
mod orders;
mod payment;
mod status;
mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
