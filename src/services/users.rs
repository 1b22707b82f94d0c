//! User use cases

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{FieldValue, LoanColumn, RecordSet, User, UserColumn, UserFields},
    repository::Repository,
};

pub const USER_NOT_FOUND: &str = "User not found.";
pub const USER_HAS_OPEN_LOANS: &str = "Cannot delete user: There are active loans associated with it.";

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn register_user(&self, user: UserFields) -> AppResult<i32> {
        user.validate()?;
        let id = self.repository.users.add(&user).await?;
        tracing::info!("New user registered: {} (id {})", user.name, id);
        Ok(id)
    }

    pub async fn update_user_info(&self, user_id: i32, user: UserFields) -> AppResult<()> {
        user.validate()?;
        let affected = self.repository.users.update(user_id, &user).await?;
        if affected == 0 {
            tracing::debug!("Update of user {} matched no row", user_id);
        }
        Ok(())
    }

    pub async fn can_delete_user(&self, user_id: i32) -> AppResult<bool> {
        let open = self
            .repository
            .loans
            .count_open_by(LoanColumn::UserId, &FieldValue::Int(user_id))
            .await?;
        Ok(open == 0)
    }

    /// Delete a user, refused while they still hold a book
    pub async fn delete_user(&self, user_id: i32) -> AppResult<()> {
        if !self.can_delete_user(user_id).await? {
            tracing::info!("Refused to delete user {}: open loans", user_id);
            return Err(AppError::Refused(USER_HAS_OPEN_LOANS.to_string()));
        }

        self.repository.users.delete(user_id).await?;
        tracing::info!("User {} deleted", user_id);
        Ok(())
    }

    pub async fn search_user(
        &self,
        column: UserColumn,
        value: &FieldValue,
        fetch_one: bool,
    ) -> AppResult<RecordSet<User>> {
        let found = self.repository.users.get_by(column, value, fetch_one).await?;
        if found.is_empty() {
            return Err(AppError::NotFound(USER_NOT_FOUND.to_string()));
        }
        Ok(found)
    }
}
