use uuid::Uuid;

use sea_orm::TransactionTrait;

use crate::{EngineError, ResultEngine, User, UserStore, util::normalize_required_name};

use super::{Engine, with_tx};

impl Engine {
    /// Registers a user id the ledger can attach wallets and transactions to.
    ///
    /// Usernames are unique (case-sensitive, trimmed).
    pub async fn new_user(&self, username: &str) -> ResultEngine<User> {
        let username = normalize_required_name(username, "user")?;
        with_tx!(self, |db_tx| {
            if db_tx.user_by_username(&username).await?.is_some() {
                return Err(EngineError::ExistingKey(username));
            }

            let user = User::new(username);
            db_tx.create_user(&user).await?;
            tracing::debug!(user_id = %user.id, "created user");
            Ok(user)
        })
    }

    /// Return a user snapshot from DB.
    pub async fn user(&self, user_id: Uuid) -> ResultEngine<User> {
        self.database
            .user_by_id(user_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    pub async fn user_by_username(&self, username: &str) -> ResultEngine<User> {
        self.database
            .user_by_username(username.trim())
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("user {} not exists", username.trim())))
    }
}
