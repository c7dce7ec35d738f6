#![allow(dead_code)]

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{Engine, Money, NewWalletCmd, User, Wallet};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    engine_with_batch_size(engine::DEFAULT_SYNC_BATCH_SIZE).await
}

pub async fn engine_with_batch_size(batch_size: u64) -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .sync_batch_size(batch_size)
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub fn money(value: &str) -> Money {
    value.parse().unwrap()
}

pub async fn user_with_wallet(engine: &Engine, username: &str, opening: &str) -> (User, Wallet) {
    let user = engine.new_user(username).await.unwrap();
    let wallet = engine
        .new_wallet(NewWalletCmd::new(user.id, "Cash").opening_balance(money(opening)))
        .await
        .unwrap();
    (user, wallet)
}

pub async fn balance(engine: &Engine, wallet_id: Uuid, user_id: Uuid) -> Money {
    engine.wallet(wallet_id, user_id).await.unwrap().balance
}

/// Writes a balance behind the engine's back.
pub async fn tamper_balance(db: &DatabaseConnection, wallet_id: Uuid, balance: Money) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE wallets SET balance = ? WHERE id = ?",
        vec![balance.minor().into(), wallet_id.to_string().into()],
    ))
    .await
    .unwrap();
}
