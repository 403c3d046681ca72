//! User repository for managing account operations.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use uuid::Uuid;

use crate::model::{NewUser, UpdateUser, User};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for user database operations.
pub trait UserRepository {
    /// Creates a new user.
    fn create_user(&mut self, new_user: NewUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Finds a user by ID.
    fn find_user_by_id(&mut self, user_id: Uuid) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by email.
    fn find_user_by_email(&mut self, email: &str) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Updates a user.
    fn update_user(&mut self, user_id: Uuid, changes: UpdateUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Soft deletes a user.
    fn delete_user(&mut self, user_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;
}

impl UserRepository for PgConnection {
    async fn create_user(&mut self, new_user: NewUser) -> PgResult<User> {
        use schema::users;

        let user = diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(user)
    }

    async fn find_user_by_id(&mut self, user_id: Uuid) -> PgResult<Option<User>> {
        use schema::users::dsl::*;

        let user = users
            .filter(id.eq(user_id))
            .filter(deleted_at.is_null())
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(user)
    }

    async fn find_user_by_email(&mut self, user_email: &str) -> PgResult<Option<User>> {
        use schema::users::dsl::*;

        let user = users
            .filter(email.eq(user_email))
            .filter(deleted_at.is_null())
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(user)
    }

    async fn update_user(&mut self, user_id: Uuid, changes: UpdateUser) -> PgResult<User> {
        use schema::users::dsl::*;

        let user = diesel::update(users)
            .filter(id.eq(user_id))
            .set(&changes)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(user)
    }

    async fn delete_user(&mut self, user_id: Uuid) -> PgResult<()> {
        use schema::users::dsl::*;

        diesel::update(users)
            .filter(id.eq(user_id))
            .set(deleted_at.eq(Some(jiff_diesel::Timestamp::from(Timestamp::now()))))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }
}
