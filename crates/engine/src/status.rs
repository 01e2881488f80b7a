//! Lifecycle state machines.
//!
//! Every entity with a workflow status exposes exactly one `transition`
//! function. Handlers never assign a status directly: they feed an event and
//! persist whatever the machine returns, so an illegal move is rejected in one
//! place with [`EngineError::InvalidState`].
//!
//! Some declared states have no incoming edge yet (offer `rejected`/
//! `cancelled`, escrow `refunded`/`disputed`, order `in_transit`/`cancelled`,
//! every contract state but `active`). They are stored and rendered but only
//! reachable once the corresponding operations exist.

use chrono::{DateTime, Utc};

use crate::{EngineError, ResultEngine, util::string_enum};

string_enum! {
    /// Status of a produce listing.
    pub enum ListingStatus("listing status") {
        Active => "active",
        Sold => "sold",
        Expired => "expired",
        Cancelled => "cancelled",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListingEvent {
    /// The contract for an accepted offer was formed.
    Sell,
    Expire,
    Cancel,
    /// The owner puts an expired or cancelled listing back on sale.
    Reactivate,
}

impl ListingStatus {
    pub fn transition(self, event: ListingEvent) -> ResultEngine<Self> {
        match (self, event) {
            (Self::Active, ListingEvent::Sell) => Ok(Self::Sold),
            (Self::Active, ListingEvent::Expire) => Ok(Self::Expired),
            (Self::Active, ListingEvent::Cancel) => Ok(Self::Cancelled),
            (Self::Expired | Self::Cancelled, ListingEvent::Reactivate) => Ok(Self::Active),
            (Self::Sold, _) => Err(EngineError::InvalidState(
                "Listing has already been sold".to_string(),
            )),
            (from, event) => Err(EngineError::InvalidState(format!(
                "cannot apply {event:?} to a {from} listing"
            ))),
        }
    }

    /// Event that moves a listing from `self` into `target`, if one exists.
    pub fn event_towards(self, target: Self) -> Option<ListingEvent> {
        match target {
            Self::Sold => Some(ListingEvent::Sell),
            Self::Expired => Some(ListingEvent::Expire),
            Self::Cancelled => Some(ListingEvent::Cancel),
            Self::Active if self != Self::Active => Some(ListingEvent::Reactivate),
            Self::Active => None,
        }
    }
}

string_enum! {
    /// Status of a buyer's offer.
    pub enum OfferStatus("offer status") {
        Pending => "pending",
        Accepted => "accepted",
        Rejected => "rejected",
        Expired => "expired",
        Cancelled => "cancelled",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OfferEvent {
    Accept {
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    },
}

impl OfferStatus {
    /// Expiry is enforced reactively: an offer past `expires_at` keeps its
    /// stored status but can no longer be accepted.
    pub fn transition(self, event: OfferEvent) -> ResultEngine<Self> {
        match (self, event) {
            (Self::Pending, OfferEvent::Accept { expires_at, now }) if expires_at > now => {
                Ok(Self::Accepted)
            }
            _ => Err(EngineError::InvalidState(
                "Offer is no longer valid".to_string(),
            )),
        }
    }
}

string_enum! {
    /// Status of a contract. Only `active` is assigned today.
    pub enum ContractStatus("contract status") {
        Active => "active",
        Completed => "completed",
        Cancelled => "cancelled",
        Disputed => "disputed",
    }
}

string_enum! {
    /// Status of the funds held for a contract.
    pub enum EscrowStatus("escrow status") {
        Pending => "pending",
        Funded => "funded",
        Released => "released",
        Refunded => "refunded",
        Disputed => "disputed",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscrowEvent {
    Fund,
    Release,
}

impl EscrowStatus {
    pub fn transition(self, event: EscrowEvent) -> ResultEngine<Self> {
        match (self, event) {
            (Self::Pending, EscrowEvent::Fund) => Ok(Self::Funded),
            (Self::Funded, EscrowEvent::Release) => Ok(Self::Released),
            (_, EscrowEvent::Fund) => Err(EngineError::InvalidState(
                "Escrow is not in pending status".to_string(),
            )),
            (_, EscrowEvent::Release) => Err(EngineError::InvalidState(
                "Escrow is not funded".to_string(),
            )),
        }
    }
}

string_enum! {
    /// Status of an order's delivery.
    pub enum OrderStatus("order status") {
        Pending => "pending",
        Confirmed => "confirmed",
        InTransit => "in_transit",
        Delivered => "delivered",
        Cancelled => "cancelled",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderEvent {
    Confirm,
    Deliver,
}

impl OrderStatus {
    pub fn transition(self, event: OrderEvent) -> ResultEngine<Self> {
        match (self, event) {
            (Self::Pending, OrderEvent::Confirm) => Ok(Self::Confirmed),
            (Self::Confirmed, OrderEvent::Deliver) => Ok(Self::Delivered),
            (_, OrderEvent::Confirm) => Err(EngineError::InvalidState(
                "Order is not in pending status".to_string(),
            )),
            (_, OrderEvent::Deliver) => Err(EngineError::InvalidState(
                "Order must be confirmed before delivery".to_string(),
            )),
        }
    }
}

string_enum! {
    /// Status of a KYC submission.
    pub enum KycStatus("kyc status") {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        UnderReview => "under_review",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KycEvent {
    /// An admin decision. Later reviews overwrite earlier ones.
    Review(KycStatus),
}

impl KycStatus {
    pub fn transition(self, event: KycEvent) -> ResultEngine<Self> {
        match event {
            KycEvent::Review(Self::Pending) => Err(EngineError::InvalidState(
                "a review must approve, reject or mark the submission under review".to_string(),
            )),
            KycEvent::Review(outcome) => Ok(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn listing_sells_only_once() {
        let sold = ListingStatus::Active
            .transition(ListingEvent::Sell)
            .unwrap();
        assert_eq!(sold, ListingStatus::Sold);
        assert_eq!(
            sold.transition(ListingEvent::Sell),
            Err(EngineError::InvalidState(
                "Listing has already been sold".to_string()
            ))
        );
        assert!(sold.transition(ListingEvent::Reactivate).is_err());
    }

    #[test]
    fn listing_can_be_reactivated_after_cancel() {
        let cancelled = ListingStatus::Active
            .transition(ListingEvent::Cancel)
            .unwrap();
        assert_eq!(
            cancelled.transition(ListingEvent::Reactivate).unwrap(),
            ListingStatus::Active
        );
        assert!(
            ListingStatus::Cancelled
                .transition(ListingEvent::Sell)
                .is_err()
        );
    }

    #[test]
    fn listing_event_towards_same_status_is_none() {
        assert_eq!(
            ListingStatus::Active.event_towards(ListingStatus::Active),
            None
        );
        assert_eq!(
            ListingStatus::Expired.event_towards(ListingStatus::Active),
            Some(ListingEvent::Reactivate)
        );
    }

    #[test]
    fn offer_accepts_only_pending_and_unexpired() {
        let now = Utc::now();
        let fresh = OfferEvent::Accept {
            expires_at: now + Duration::days(7),
            now,
        };
        let stale = OfferEvent::Accept {
            expires_at: now - Duration::seconds(1),
            now,
        };

        assert_eq!(
            OfferStatus::Pending.transition(fresh).unwrap(),
            OfferStatus::Accepted
        );
        assert!(OfferStatus::Pending.transition(stale).is_err());
        assert!(OfferStatus::Accepted.transition(fresh).is_err());
        assert!(OfferStatus::Rejected.transition(fresh).is_err());
    }

    #[test]
    fn offer_expiring_exactly_now_is_rejected() {
        let now = Utc::now();
        let event = OfferEvent::Accept {
            expires_at: now,
            now,
        };
        assert!(OfferStatus::Pending.transition(event).is_err());
    }

    #[test]
    fn escrow_funds_then_releases() {
        let funded = EscrowStatus::Pending
            .transition(EscrowEvent::Fund)
            .unwrap();
        assert_eq!(funded, EscrowStatus::Funded);
        assert_eq!(
            funded.transition(EscrowEvent::Release).unwrap(),
            EscrowStatus::Released
        );
        assert_eq!(
            funded.transition(EscrowEvent::Fund),
            Err(EngineError::InvalidState(
                "Escrow is not in pending status".to_string()
            ))
        );
        assert!(
            EscrowStatus::Pending
                .transition(EscrowEvent::Release)
                .is_err()
        );
    }

    #[test]
    fn order_delivers_only_from_confirmed() {
        assert!(
            OrderStatus::Pending
                .transition(OrderEvent::Deliver)
                .is_err()
        );
        let confirmed = OrderStatus::Pending
            .transition(OrderEvent::Confirm)
            .unwrap();
        assert_eq!(
            confirmed.transition(OrderEvent::Deliver).unwrap(),
            OrderStatus::Delivered
        );
        assert!(confirmed.transition(OrderEvent::Confirm).is_err());
    }

    #[test]
    fn kyc_review_overwrites_but_never_resets_to_pending() {
        let approved = KycStatus::Rejected
            .transition(KycEvent::Review(KycStatus::Approved))
            .unwrap();
        assert_eq!(approved, KycStatus::Approved);
        assert!(
            approved
                .transition(KycEvent::Review(KycStatus::Pending))
                .is_err()
        );
    }

    #[test]
    fn statuses_round_trip_through_storage_strings() {
        assert_eq!(
            OrderStatus::try_from("in_transit").unwrap(),
            OrderStatus::InTransit
        );
        assert_eq!(KycStatus::UnderReview.as_str(), "under_review");
        assert_eq!(
            EscrowStatus::try_from("lost"),
            Err(EngineError::InvalidInput(
                "invalid escrow status: lost".to_string()
            ))
        );
    }
}
