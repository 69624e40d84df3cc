//! Users service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::users::{
        errors::UsersServiceError,
        models::{NewUser, User, UserUuid},
        repository::PgUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn create_user(&self, user: NewUser) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_user(&self, user: UserUuid) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(user)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Creates a new user account.
    async fn create_user(&self, user: NewUser) -> Result<User, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<User, UsersServiceError>;
}
