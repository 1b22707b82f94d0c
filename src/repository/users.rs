//! Users repository for database operations

use async_trait::async_trait;

use super::{db::Database, UserRepository};
use crate::{
    error::AppResult,
    models::{FieldValue, RecordSet, User, UserColumn, UserFields},
};

#[derive(Clone)]
pub struct PgUserRepository {
    db: Database,
}

impl PgUserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    /// Duplicate emails are rejected by the `users.email` unique constraint
    async fn add(&self, user: &UserFields) -> AppResult<i32> {
        let id = self
            .db
            .insert_returning_id(
                sqlx::query_as("INSERT INTO users (name, email, role) VALUES ($1, $2, $3) RETURNING user_id")
                    .bind(&user.name)
                    .bind(&user.email)
                    .bind(&user.role),
            )
            .await?;

        tracing::debug!("User added with id {}", id);
        Ok(id)
    }

    async fn get_by(&self, column: UserColumn, value: &FieldValue, fetch_one: bool) -> AppResult<RecordSet<User>> {
        self.db.select::<User>(Some((column, value)), fetch_one).await
    }

    async fn get_all(&self, fetch_one: bool) -> AppResult<RecordSet<User>> {
        self.db.select::<User>(None, fetch_one).await
    }

    async fn update(&self, id: i32, user: &UserFields) -> AppResult<u64> {
        self.db
            .execute(
                sqlx::query("UPDATE users SET name = $1, email = $2, role = $3 WHERE user_id = $4")
                    .bind(&user.name)
                    .bind(&user.email)
                    .bind(&user.role)
                    .bind(id),
            )
            .await
    }

    async fn delete(&self, id: i32) -> AppResult<u64> {
        self.db.delete_by_key::<User>(id).await
    }
}
