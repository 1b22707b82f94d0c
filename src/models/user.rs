//! User (patron) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use validator::Validate;

use super::record::{Column, ColumnKind, FieldValue, Record};
use crate::error::AppError;

/// User row from the `users` table
///
/// `role` is free text; "student", "teacher" and "admin" are conventional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserFields {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserColumn {
    UserId,
    Name,
    Email,
    Role,
}

impl Column for UserColumn {
    fn name(self) -> &'static str {
        match self {
            UserColumn::UserId => "user_id",
            UserColumn::Name => "name",
            UserColumn::Email => "email",
            UserColumn::Role => "role",
        }
    }

    fn kind(self) -> ColumnKind {
        match self {
            UserColumn::UserId => ColumnKind::Int,
            _ => ColumnKind::Text,
        }
    }
}

impl FromStr for UserColumn {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        User::COLUMNS
            .iter()
            .copied()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| AppError::Validation(format!("Unknown column '{}' for users", s.trim())))
    }
}

impl Record for User {
    type Column = UserColumn;

    const TABLE: &'static str = "users";

    const KEY: UserColumn = UserColumn::UserId;

    const COLUMNS: &'static [UserColumn] = &[
        UserColumn::UserId,
        UserColumn::Name,
        UserColumn::Email,
        UserColumn::Role,
    ];

    fn value(&self, column: UserColumn) -> Option<FieldValue> {
        match column {
            UserColumn::UserId => Some(FieldValue::Int(self.user_id)),
            UserColumn::Name => Some(FieldValue::Text(self.name.clone())),
            UserColumn::Email => Some(FieldValue::Text(self.email.clone())),
            UserColumn::Role => Some(FieldValue::Text(self.role.clone())),
        }
    }
}
