//! Roles and the capability check applied before every workflow operation.
//!
//! A [`Principal`] is the authenticated caller. Operations describe what they
//! are about to do with an [`Action`] (carrying the ownership facts they
//! loaded) and ask [`Principal::authorize`] whether it is allowed.

use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::string_enum};

string_enum! {
    /// Marketplace role, fixed at registration.
    pub enum Role("role") {
        Farmer => "farmer",
        Aggregator => "aggregator",
        Buyer => "buyer",
        Logistics => "logistics",
        Admin => "admin",
    }
}

/// The authenticated caller of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
    pub is_verified: bool,
}

/// Something a principal wants to do, with the owners involved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    CreateFarm,
    ViewFarm {
        owner: Uuid,
    },
    UpdateFarm {
        owner: Uuid,
    },
    CreateListing,
    UpdateListing {
        owner: Uuid,
    },
    CreateOffer {
        listing_owner: Uuid,
    },
    ViewOffer {
        buyer: Uuid,
        listing_owner: Uuid,
    },
    AcceptOffer {
        listing_owner: Uuid,
    },
    CreateContract {
        listing_owner: Uuid,
    },
    ViewContract {
        farmer: Uuid,
        buyer: Uuid,
    },
    CreateEscrow {
        buyer: Uuid,
    },
    FundEscrow {
        buyer: Uuid,
    },
    ViewEscrow {
        buyer: Uuid,
        seller: Uuid,
    },
    CreateOrder {
        buyer: Uuid,
    },
    ConfirmOrder {
        farmer: Uuid,
    },
    DeliverOrder {
        farmer: Uuid,
        logistics: Option<Uuid>,
    },
    ViewOrder {
        farmer: Uuid,
        buyer: Uuid,
        logistics: Option<Uuid>,
    },
    ViewUser {
        user: Uuid,
    },
    UpdateUser {
        user: Uuid,
    },
    ListUsers,
    ReviewKyc,
}

fn forbidden(message: &str) -> EngineError {
    EngineError::Forbidden(message.to_string())
}

const NOT_ENOUGH_PERMISSIONS: &str = "Not enough permissions";

impl Principal {
    pub fn new(id: Uuid, role: Role, is_verified: bool) -> Self {
        Self {
            id,
            role,
            is_verified,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    fn require_role(&self, role: Role) -> ResultEngine<()> {
        if self.role != role {
            return Err(forbidden(NOT_ENOUGH_PERMISSIONS));
        }
        Ok(())
    }

    fn require_verified_farmer(&self, what: &str) -> ResultEngine<()> {
        self.require_role(Role::Farmer)?;
        if !self.is_verified {
            return Err(EngineError::InvalidInput(format!(
                "KYC verification required to create {what}"
            )));
        }
        Ok(())
    }

    fn require_self(&self, owner: Uuid, message: &str) -> ResultEngine<()> {
        if self.id != owner {
            return Err(forbidden(message));
        }
        Ok(())
    }

    fn require_one_of(&self, parties: &[Option<Uuid>]) -> ResultEngine<()> {
        if parties.iter().flatten().any(|party| *party == self.id) {
            return Ok(());
        }
        Err(forbidden(NOT_ENOUGH_PERMISSIONS))
    }

    /// Decide whether this principal may perform `action`.
    ///
    /// Rejections are `Forbidden`, except the verification and offer rules
    /// which the API reports as bad requests.
    pub fn authorize(&self, action: Action) -> ResultEngine<()> {
        match action {
            Action::CreateFarm => self.require_verified_farmer("farms"),
            Action::CreateListing => self.require_verified_farmer("listings"),
            Action::ViewFarm { owner } => {
                if self.role == Role::Farmer {
                    self.require_self(owner, NOT_ENOUGH_PERMISSIONS)?;
                }
                Ok(())
            }
            Action::UpdateFarm { owner }
            | Action::UpdateListing { owner }
            | Action::AcceptOffer {
                listing_owner: owner,
            }
            | Action::CreateContract {
                listing_owner: owner,
            } => {
                self.require_role(Role::Farmer)?;
                self.require_self(owner, NOT_ENOUGH_PERMISSIONS)
            }
            Action::CreateOffer { listing_owner } => {
                if self.role == Role::Farmer {
                    return Err(EngineError::InvalidInput(
                        "Farmers cannot make offers".to_string(),
                    ));
                }
                if self.id == listing_owner {
                    return Err(EngineError::InvalidInput(
                        "Cannot make offer on your own listing".to_string(),
                    ));
                }
                Ok(())
            }
            Action::ViewOffer {
                buyer,
                listing_owner,
            } => self.require_one_of(&[Some(buyer), Some(listing_owner)]),
            Action::ViewContract { farmer, buyer } => {
                self.require_one_of(&[Some(farmer), Some(buyer)])
            }
            Action::CreateEscrow { buyer } => {
                self.require_self(buyer, "Only buyers can create escrow")
            }
            Action::FundEscrow { buyer } => self.require_self(buyer, "Only buyers can fund escrow"),
            Action::ViewEscrow { buyer, seller } => {
                self.require_one_of(&[Some(buyer), Some(seller)])
            }
            Action::CreateOrder { buyer } => {
                self.require_self(buyer, "Only buyers can create orders")
            }
            Action::ConfirmOrder { farmer } => {
                self.require_role(Role::Farmer)?;
                self.require_self(farmer, "Only farmers can confirm orders")
            }
            Action::DeliverOrder { farmer, logistics } => {
                if self.role == Role::Logistics {
                    return Ok(());
                }
                self.require_one_of(&[Some(farmer), logistics])
            }
            Action::ViewOrder {
                farmer,
                buyer,
                logistics,
            } => self.require_one_of(&[Some(farmer), Some(buyer), logistics]),
            Action::ViewUser { user } | Action::UpdateUser { user } => {
                if self.is_admin() {
                    return Ok(());
                }
                self.require_self(user, NOT_ENOUGH_PERMISSIONS)
            }
            Action::ListUsers | Action::ReviewKyc => self.require_role(Role::Admin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role, is_verified: bool) -> Principal {
        Principal::new(Uuid::new_v4(), role, is_verified)
    }

    #[test]
    fn only_verified_farmers_create_farms() {
        assert!(principal(Role::Farmer, true).authorize(Action::CreateFarm).is_ok());
        assert_eq!(
            principal(Role::Farmer, false).authorize(Action::CreateFarm),
            Err(EngineError::InvalidInput(
                "KYC verification required to create farms".to_string()
            ))
        );
        assert!(matches!(
            principal(Role::Buyer, true).authorize(Action::CreateListing),
            Err(EngineError::Forbidden(_))
        ));
    }

    #[test]
    fn farmers_see_only_their_own_farms() {
        let farmer = principal(Role::Farmer, true);
        let buyer = principal(Role::Buyer, false);
        let other = Uuid::new_v4();

        assert!(farmer.authorize(Action::ViewFarm { owner: farmer.id }).is_ok());
        assert!(farmer.authorize(Action::ViewFarm { owner: other }).is_err());
        assert!(buyer.authorize(Action::ViewFarm { owner: other }).is_ok());
    }

    #[test]
    fn offers_reject_farmers_and_self_dealing() {
        let buyer = principal(Role::Buyer, false);
        assert!(
            buyer
                .authorize(Action::CreateOffer {
                    listing_owner: Uuid::new_v4()
                })
                .is_ok()
        );
        assert_eq!(
            buyer.authorize(Action::CreateOffer {
                listing_owner: buyer.id
            }),
            Err(EngineError::InvalidInput(
                "Cannot make offer on your own listing".to_string()
            ))
        );
        assert_eq!(
            principal(Role::Farmer, true).authorize(Action::CreateOffer {
                listing_owner: Uuid::new_v4()
            }),
            Err(EngineError::InvalidInput(
                "Farmers cannot make offers".to_string()
            ))
        );
    }

    #[test]
    fn accept_requires_listing_owner() {
        let farmer = principal(Role::Farmer, true);
        assert!(
            farmer
                .authorize(Action::AcceptOffer {
                    listing_owner: farmer.id
                })
                .is_ok()
        );
        assert_eq!(
            farmer.authorize(Action::AcceptOffer {
                listing_owner: Uuid::new_v4()
            }),
            Err(EngineError::Forbidden("Not enough permissions".to_string()))
        );
    }

    #[test]
    fn any_logistics_principal_may_deliver() {
        let farmer = Uuid::new_v4();
        let courier = principal(Role::Logistics, false);
        let buyer = principal(Role::Buyer, false);
        let action = Action::DeliverOrder {
            farmer,
            logistics: None,
        };

        assert!(courier.authorize(action).is_ok());
        assert!(buyer.authorize(action).is_err());
        assert!(
            buyer
                .authorize(Action::DeliverOrder {
                    farmer,
                    logistics: Some(buyer.id)
                })
                .is_ok()
        );
    }

    #[test]
    fn order_visibility_includes_assigned_logistics() {
        let courier = principal(Role::Logistics, false);
        let action = Action::ViewOrder {
            farmer: Uuid::new_v4(),
            buyer: Uuid::new_v4(),
            logistics: Some(courier.id),
        };
        assert!(courier.authorize(action).is_ok());
        assert!(principal(Role::Logistics, false).authorize(action).is_err());
    }

    #[test]
    fn admins_manage_users_and_kyc() {
        let admin = principal(Role::Admin, true);
        let buyer = principal(Role::Buyer, false);

        assert!(admin.authorize(Action::ListUsers).is_ok());
        assert!(admin.authorize(Action::ReviewKyc).is_ok());
        assert!(admin.authorize(Action::UpdateUser { user: buyer.id }).is_ok());
        assert!(buyer.authorize(Action::ReviewKyc).is_err());
        assert!(buyer.authorize(Action::ViewUser { user: buyer.id }).is_ok());
        assert!(buyer.authorize(Action::ViewUser { user: admin.id }).is_err());
    }
}
