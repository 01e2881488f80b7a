use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction, EntityTrait, PrimaryKeyTrait};
use uuid::Uuid;

use crate::{EngineError, MockPaymentGateway, PaymentGateway, ResultEngine};

mod contracts;
mod escrow;
mod farms;
mod health;
mod kyc;
mod listings;
mod offers;
mod orders;
mod users;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    password_cost: u32,
    payment: Arc<dyn PaymentGateway>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Load a row by its UUID key or fail with `KeyNotFound(not_found)`.
async fn find_required<E>(
    db: &DatabaseTransaction,
    id: Uuid,
    not_found: &str,
) -> ResultEngine<E::Model>
where
    E: EntityTrait,
    String: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    E::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(not_found.to_string()))
}

/// Convert a batch of storage rows into domain values.
fn convert_all<M, T>(models: Vec<M>) -> ResultEngine<Vec<T>>
where
    T: TryFrom<M, Error = EngineError>,
{
    models.into_iter().map(T::try_from).collect()
}

// Bounds accepted by bcrypt.
const MIN_PASSWORD_COST: u32 = 4;
const MAX_PASSWORD_COST: u32 = 31;

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    password_cost: u32,
    payment: Arc<dyn PaymentGateway>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            password_cost: bcrypt::DEFAULT_COST,
            payment: Arc::new(MockPaymentGateway),
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// bcrypt work factor used when hashing new passwords.
    pub fn password_cost(mut self, cost: u32) -> EngineBuilder {
        self.password_cost = cost;
        self
    }

    pub fn payment_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> EngineBuilder {
        self.payment = gateway;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        if !(MIN_PASSWORD_COST..=MAX_PASSWORD_COST).contains(&self.password_cost) {
            return Err(EngineError::InvalidInput(format!(
                "password cost must be between {MIN_PASSWORD_COST} and {MAX_PASSWORD_COST}"
            )));
        }
        Ok(Engine {
            database: self.database,
            password_cost: self.password_cost,
            payment: self.payment,
        })
    }
}
