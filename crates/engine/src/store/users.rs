use async_trait::async_trait;
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{ResultEngine, User, users};

#[async_trait]
pub trait UserStore {
    async fn user_exists(&self, id: Uuid) -> ResultEngine<bool>;

    async fn user_by_id(&self, id: Uuid) -> ResultEngine<Option<User>>;

    async fn user_by_username(&self, username: &str) -> ResultEngine<Option<User>>;

    async fn create_user(&self, user: &User) -> ResultEngine<()>;
}

#[async_trait]
impl<C> UserStore for C
where
    C: ConnectionTrait,
{
    async fn user_exists(&self, id: Uuid) -> ResultEngine<bool> {
        let count = users::Entity::find_by_id(id.to_string())
            .count(self)
            .await?;
        Ok(count > 0)
    }

    async fn user_by_id(&self, id: Uuid) -> ResultEngine<Option<User>> {
        users::Entity::find_by_id(id.to_string())
            .one(self)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn user_by_username(&self, username: &str) -> ResultEngine<Option<User>> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(self)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn create_user(&self, user: &User) -> ResultEngine<()> {
        users::ActiveModel::from(user).insert(self).await?;
        Ok(())
    }
}
