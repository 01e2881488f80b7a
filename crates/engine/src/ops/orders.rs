use chrono::Utc;
use sea_orm::{Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Action, Contract, EngineError, Escrow, EscrowEvent, EscrowStatus, NewOrder, Order, OrderEvent,
    Principal, ResultEngine, contracts, escrows, orders,
};

use super::{Engine, convert_all, find_required, with_tx};

const DUPLICATE_ORDER: &str = "Order already exists for this contract";

impl Engine {
    /// Place the delivery order for a contract whose escrow is funded.
    pub async fn create_order(
        &self,
        principal: &Principal,
        contract_id: Uuid,
        cmd: NewOrder,
    ) -> ResultEngine<Order> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let contract = Contract::try_from(
                find_required::<contracts::Entity>(&db_tx, contract_id, "Contract not found")
                    .await?,
            )?;
            principal.authorize(Action::CreateOrder {
                buyer: contract.buyer_id,
            })?;

            let funded = escrows::Entity::find()
                .filter(escrows::Column::ContractId.eq(contract.id.to_string()))
                .filter(escrows::Column::Status.eq(EscrowStatus::Funded.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if !funded {
                return Err(EngineError::InvalidState(
                    "Escrow must be funded before creating order".to_string(),
                ));
            }

            let exists = orders::Entity::find()
                .filter(orders::Column::ContractId.eq(contract.id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(DUPLICATE_ORDER.to_string()));
            }

            let order = Order::for_contract(&contract, cmd, now)?;
            orders::ActiveModel::from(&order)
                .insert(&db_tx)
                .await
                .map_err(|err| EngineError::conflict_on_unique(err, DUPLICATE_ORDER))?;
            tracing::info!(order_number = %order.order_number, "order placed");
            Ok(order)
        })
    }

    pub async fn confirm_order(&self, principal: &Principal, order_id: Uuid) -> ResultEngine<Order> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let mut order = Order::try_from(
                find_required::<orders::Entity>(&db_tx, order_id, "Order not found").await?,
            )?;
            principal.authorize(Action::ConfirmOrder {
                farmer: order.farmer_id,
            })?;

            order.status = order.status.transition(OrderEvent::Confirm)?;
            order.confirmed_at = Some(now);
            order.updated_at = now;
            orders::ActiveModel::from(&order).update(&db_tx).await?;
            Ok(order)
        })
    }

    /// Mark a confirmed order delivered and release its escrow in the same
    /// transaction.
    pub async fn deliver_order(&self, principal: &Principal, order_id: Uuid) -> ResultEngine<Order> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let mut order = Order::try_from(
                find_required::<orders::Entity>(&db_tx, order_id, "Order not found").await?,
            )?;
            principal.authorize(Action::DeliverOrder {
                farmer: order.farmer_id,
                logistics: order.logistics_id,
            })?;

            order.status = order.status.transition(OrderEvent::Deliver)?;
            order.delivered_at = Some(now);
            order.updated_at = now;
            orders::ActiveModel::from(&order).update(&db_tx).await?;

            let escrow_model = escrows::Entity::find()
                .filter(escrows::Column::ContractId.eq(order.contract_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("Escrow not found".to_string()))?;
            let mut escrow = Escrow::try_from(escrow_model)?;
            escrow.status = escrow.status.transition(EscrowEvent::Release)?;
            escrow.released_at = Some(now);
            escrow.updated_at = now;
            escrows::ActiveModel::from(&escrow).update(&db_tx).await?;

            tracing::info!(
                order_number = %order.order_number,
                escrow_number = %escrow.escrow_number,
                "order delivered, escrow released"
            );
            Ok(order)
        })
    }

    /// Orders where the principal is the farmer, the buyer or the assigned
    /// logistics provider.
    pub async fn orders(&self, principal: &Principal) -> ResultEngine<Vec<Order>> {
        with_tx!(self, |db_tx| {
            let id = principal.id.to_string();
            let models = orders::Entity::find()
                .filter(
                    Condition::any()
                        .add(orders::Column::FarmerId.eq(id.clone()))
                        .add(orders::Column::BuyerId.eq(id.clone()))
                        .add(orders::Column::LogisticsId.eq(id)),
                )
                .order_by_desc(orders::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            convert_all(models)
        })
    }

    pub async fn order(&self, principal: &Principal, order_id: Uuid) -> ResultEngine<Order> {
        with_tx!(self, |db_tx| {
            let order = Order::try_from(
                find_required::<orders::Entity>(&db_tx, order_id, "Order not found").await?,
            )?;
            principal.authorize(Action::ViewOrder {
                farmer: order.farmer_id,
                buyer: order.buyer_id,
                logistics: order.logistics_id,
            })?;
            Ok(order)
        })
    }
}
