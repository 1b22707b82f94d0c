use crate::{
    models::{Column, TableView, UserColumn, UserFields},
    services::users::UsersService,
};

use super::{outcome, shown};

#[derive(Clone)]
pub struct UsersController {
    service: UsersService,
}

impl UsersController {
    pub fn new(service: UsersService) -> Self {
        Self { service }
    }

    pub async fn register_user(&self, name: &str, email: &str, role: &str) -> String {
        outcome(
            self.service.register_user(fields(name, email, role)).await,
            "User registered successfully.",
        )
    }

    pub async fn update_user_info(&self, user_id: i32, name: &str, email: &str, role: &str) -> String {
        outcome(
            self.service.update_user_info(user_id, fields(name, email, role)).await,
            "User information updated successfully.",
        )
    }

    pub async fn delete_user(&self, user_id: i32) -> String {
        outcome(self.service.delete_user(user_id).await, "User deleted successfully.")
    }

    pub async fn search_user(&self, field: &str, value: &str, fetch_one: bool) -> Result<TableView, String> {
        let found = async {
            let column: UserColumn = field.parse()?;
            let value = column.parse_value(value)?;
            self.service.search_user(column, &value, fetch_one).await
        };
        shown(found.await).map(|set| set.to_view())
    }
}

fn fields(name: &str, email: &str, role: &str) -> UserFields {
    UserFields {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        role: role.trim().to_string(),
    }
}
