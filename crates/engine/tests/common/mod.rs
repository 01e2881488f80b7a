#![allow(dead_code)]

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Engine, Farm, Listing, NewFarm, NewListing, NewOffer, NewUser, Offer, Principal, ProduceType,
    Role, User,
};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .password_cost(4)
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn register(engine: &Engine, name: &str, role: Role) -> User {
    engine
        .register(NewUser::new(
            format!("{name}@example.com"),
            name,
            "password",
            format!("{name} test"),
            role,
        ))
        .await
        .unwrap()
}

/// A farmer whose account was already verified.
pub async fn verified_farmer(engine: &Engine, name: &str) -> Principal {
    let user = register(engine, name, Role::Farmer).await;
    engine.verify_user(user.id).await.unwrap().principal()
}

pub async fn buyer(engine: &Engine, name: &str) -> Principal {
    register(engine, name, Role::Buyer).await.principal()
}

pub async fn farm(engine: &Engine, farmer: &Principal) -> Farm {
    engine
        .create_farm(farmer, NewFarm::new("Green Acres", "Kaduna", 12.5))
        .await
        .unwrap()
}

/// An active listing of 100 kg at 500 NGN/kg.
pub async fn listing(engine: &Engine, farmer: &Principal) -> Listing {
    let farm = farm(engine, farmer).await;
    engine
        .create_listing(
            farmer,
            NewListing::new(farm.id, "Yellow maize", ProduceType::Grains, 100.0, 500.0),
        )
        .await
        .unwrap()
}

/// A pending offer of 50 kg at 450 NGN/kg.
pub async fn offer(engine: &Engine, buyer: &Principal, listing: &Listing) -> Offer {
    engine
        .create_offer(buyer, NewOffer::new(listing.id, 50.0, 450.0, "Lagos depot"))
        .await
        .unwrap()
}

pub async fn count_rows(db: &DatabaseConnection, table: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS n FROM {table};"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}
