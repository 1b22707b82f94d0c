//! Controllers: primitive parameters in, display text out
//!
//! Each controller method calls exactly one use case and turns its outcome
//! into the message a front end shows unchanged.

pub mod books;
pub mod loans;
pub mod tables;
pub mod users;

use crate::{error::AppResult, services::Services};

#[derive(Clone)]
pub struct Controllers {
    pub books: books::BooksController,
    pub users: users::UsersController,
    pub loans: loans::LoansController,
    pub tables: tables::TablesController,
}

impl Controllers {
    pub fn new(services: &Services) -> Self {
        Self {
            books: books::BooksController::new(services.books.clone()),
            users: users::UsersController::new(services.users.clone()),
            loans: loans::LoansController::new(services.loans.clone()),
            tables: tables::TablesController::new(services.tables.clone()),
        }
    }
}

/// Success text, or the failure's user message
fn outcome<T>(result: AppResult<T>, success: &str) -> String {
    match result {
        Ok(_) => success.to_string(),
        Err(e) => {
            tracing::debug!("Operation failed: {}", e);
            e.user_message()
        }
    }
}

fn shown<T>(result: AppResult<T>) -> Result<T, String> {
    result.map_err(|e| {
        tracing::debug!("Lookup failed: {}", e);
        e.user_message()
    })
}
