//! Repository layer for database operations
//!
//! One repository per entity, each behind a trait so the use cases can be
//! exercised without a live database.

pub mod books;
pub mod db;
pub mod loans;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{
        Book, BookColumn, BookFields, CreateLoan, FieldValue, Loan, LoanColumn, LoanFields, RecordSet,
        User, UserColumn, UserFields,
    },
};

pub use db::Database;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a book, returning its generated id
    async fn add(&self, book: &BookFields) -> AppResult<i32>;

    async fn get_by(&self, column: BookColumn, value: &FieldValue, fetch_one: bool) -> AppResult<RecordSet<Book>>;

    async fn get_all(&self, fetch_one: bool) -> AppResult<RecordSet<Book>>;

    /// Full-row update; returns rows affected (0 when the id does not exist)
    async fn update(&self, id: i32, book: &BookFields) -> AppResult<u64>;

    async fn delete(&self, id: i32) -> AppResult<u64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn add(&self, user: &UserFields) -> AppResult<i32>;

    async fn get_by(&self, column: UserColumn, value: &FieldValue, fetch_one: bool) -> AppResult<RecordSet<User>>;

    async fn get_all(&self, fetch_one: bool) -> AppResult<RecordSet<User>>;

    async fn update(&self, id: i32, user: &UserFields) -> AppResult<u64>;

    async fn delete(&self, id: i32) -> AppResult<u64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanRepository: Send + Sync {
    async fn add(&self, loan: &CreateLoan) -> AppResult<i32>;

    async fn get_by(&self, column: LoanColumn, value: &FieldValue, fetch_one: bool) -> AppResult<RecordSet<Loan>>;

    async fn get_all(&self, fetch_one: bool) -> AppResult<RecordSet<Loan>>;

    async fn update(&self, id: i32, loan: &LoanFields) -> AppResult<u64>;

    async fn delete(&self, id: i32) -> AppResult<u64>;

    /// Number of loans without a return date whose `column` equals `value`
    async fn count_open_by(&self, column: LoanColumn, value: &FieldValue) -> AppResult<i64>;
}

/// Main repository struct holding one store per entity
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookRepository>,
    pub users: Arc<dyn UserRepository>,
    pub loans: Arc<dyn LoanRepository>,
}

impl Repository {
    /// Create the Postgres-backed repositories sharing one database handle
    pub fn new(db: Database) -> Self {
        Self {
            books: Arc::new(books::PgBookRepository::new(db.clone())),
            users: Arc::new(users::PgUserRepository::new(db.clone())),
            loans: Arc::new(loans::PgLoanRepository::new(db)),
        }
    }

    pub fn with_stores(
        books: Arc<dyn BookRepository>,
        users: Arc<dyn UserRepository>,
        loans: Arc<dyn LoanRepository>,
    ) -> Self {
        Self { books, users, loans }
    }
}
