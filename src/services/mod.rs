//! Business logic services

pub mod books;
pub mod loans;
pub mod tables;
pub mod users;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub users: users::UsersService,
    pub loans: loans::LoansService,
    pub tables: tables::TablesService,
}

impl Services {
    pub fn new(repository: Repository) -> Self {
        Self {
            books: books::BooksService::new(repository.clone()),
            users: users::UsersService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            tables: tables::TablesService::new(repository),
        }
    }
}
