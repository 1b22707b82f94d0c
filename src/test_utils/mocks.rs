//! In-memory repository implementations
//!
//! Rows live in per-table maps keyed by primary key. Ids are handed out
//! sequentially from 1, and deleting a book or user clears the matching
//! loan references the way the schema's `ON DELETE SET NULL` does.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::{
    error::AppResult,
    models::{
        parse_timestamp, Book, BookColumn, BookFields, CreateLoan, FieldValue, Loan, LoanColumn, LoanFields,
        Record, RecordSet, User, UserColumn, UserFields,
    },
    repository::{BookRepository, LoanRepository, Repository, UserRepository},
};

/// One table: rows ordered by key plus the next id to assign
pub struct MemoryTable<T> {
    rows: RwLock<BTreeMap<i32, T>>,
    next_id: RwLock<i32>,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: RwLock::new(1),
        }
    }
}

impl<T: Record> MemoryTable<T> {
    pub fn insert_with(&self, build: impl FnOnce(i32) -> T) -> i32 {
        let mut next = self.next_id.write().unwrap();
        let id = *next;
        *next += 1;
        self.rows.write().unwrap().insert(id, build(id));
        id
    }

    pub fn get(&self, id: i32) -> Option<T> {
        self.rows.read().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the row when present; returns rows affected
    pub fn replace(&self, id: i32, row: T) -> u64 {
        match self.rows.write().unwrap().get_mut(&id) {
            Some(slot) => {
                *slot = row;
                1
            }
            None => 0,
        }
    }

    pub fn remove(&self, id: i32) -> u64 {
        u64::from(self.rows.write().unwrap().remove(&id).is_some())
    }

    pub fn filter(&self, filter: Option<(T::Column, &FieldValue)>) -> Vec<T> {
        self.rows
            .read()
            .unwrap()
            .values()
            .filter(|row| match filter {
                Some((column, value)) => row.value(column).as_ref() == Some(value),
                None => true,
            })
            .cloned()
            .collect()
    }

    pub fn select(&self, filter: Option<(T::Column, &FieldValue)>, fetch_one: bool) -> RecordSet<T> {
        RecordSet::from_rows(self.filter(filter), fetch_one)
    }

    fn update_all(&self, mut change: impl FnMut(&mut T)) {
        for row in self.rows.write().unwrap().values_mut() {
            change(row);
        }
    }
}

/// The three tables behind one in-memory library
#[derive(Default)]
pub struct MemoryStore {
    pub books: MemoryTable<Book>,
    pub users: MemoryTable<User>,
    pub loans: MemoryTable<Loan>,
}

impl MemoryStore {
    /// Repositories reading and writing these tables
    pub fn repository(store: &Arc<Self>) -> Repository {
        Repository::with_stores(
            Arc::new(InMemoryBookRepository(store.clone())),
            Arc::new(InMemoryUserRepository(store.clone())),
            Arc::new(InMemoryLoanRepository(store.clone())),
        )
    }

    /// Insert an open loan lent on 2024-01-01 and due 2024-01-15
    pub fn open_loan(&self, book_id: i32, user_id: i32) -> i32 {
        self.loans.insert_with(|loan_id| Loan {
            loan_id,
            book_id: Some(book_id),
            user_id: Some(user_id),
            loan_date: parse_timestamp("2024-01-01").ok(),
            due_date: parse_timestamp("2024-01-15").ok(),
            return_date: None,
        })
    }

    /// Mark a loan returned on 2024-01-10
    pub fn close_loan(&self, loan_id: i32) {
        if let Some(mut loan) = self.loans.get(loan_id) {
            loan.return_date = parse_timestamp("2024-01-10").ok();
            self.loans.replace(loan_id, loan);
        }
    }
}

pub struct InMemoryBookRepository(Arc<MemoryStore>);

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn add(&self, book: &BookFields) -> AppResult<i32> {
        Ok(self.0.books.insert_with(|book_id| book_from(book_id, book)))
    }

    async fn get_by(&self, column: BookColumn, value: &FieldValue, fetch_one: bool) -> AppResult<RecordSet<Book>> {
        Ok(self.0.books.select(Some((column, value)), fetch_one))
    }

    async fn get_all(&self, fetch_one: bool) -> AppResult<RecordSet<Book>> {
        Ok(self.0.books.select(None, fetch_one))
    }

    async fn update(&self, id: i32, book: &BookFields) -> AppResult<u64> {
        Ok(self.0.books.replace(id, book_from(id, book)))
    }

    async fn delete(&self, id: i32) -> AppResult<u64> {
        let removed = self.0.books.remove(id);
        if removed > 0 {
            self.0.loans.update_all(|loan| {
                if loan.book_id == Some(id) {
                    loan.book_id = None;
                }
            });
        }
        Ok(removed)
    }
}

fn book_from(book_id: i32, book: &BookFields) -> Book {
    Book {
        book_id,
        title: book.title.clone(),
        author: book.author.clone(),
        isbn: Some(book.isbn.clone()),
        publication_year: Some(book.publication_year),
        genre: Some(book.genre.clone()),
    }
}

pub struct InMemoryUserRepository(Arc<MemoryStore>);

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn add(&self, user: &UserFields) -> AppResult<i32> {
        Ok(self.0.users.insert_with(|user_id| user_from(user_id, user)))
    }

    async fn get_by(&self, column: UserColumn, value: &FieldValue, fetch_one: bool) -> AppResult<RecordSet<User>> {
        Ok(self.0.users.select(Some((column, value)), fetch_one))
    }

    async fn get_all(&self, fetch_one: bool) -> AppResult<RecordSet<User>> {
        Ok(self.0.users.select(None, fetch_one))
    }

    async fn update(&self, id: i32, user: &UserFields) -> AppResult<u64> {
        Ok(self.0.users.replace(id, user_from(id, user)))
    }

    async fn delete(&self, id: i32) -> AppResult<u64> {
        let removed = self.0.users.remove(id);
        if removed > 0 {
            self.0.loans.update_all(|loan| {
                if loan.user_id == Some(id) {
                    loan.user_id = None;
                }
            });
        }
        Ok(removed)
    }
}

fn user_from(user_id: i32, user: &UserFields) -> User {
    User {
        user_id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
    }
}

pub struct InMemoryLoanRepository(Arc<MemoryStore>);

#[async_trait]
impl LoanRepository for InMemoryLoanRepository {
    async fn add(&self, loan: &CreateLoan) -> AppResult<i32> {
        Ok(self.0.loans.insert_with(|loan_id| Loan {
            loan_id,
            book_id: Some(loan.book_id),
            user_id: Some(loan.user_id),
            loan_date: Some(loan.loan_date),
            due_date: Some(loan.due_date),
            return_date: None,
        }))
    }

    async fn get_by(&self, column: LoanColumn, value: &FieldValue, fetch_one: bool) -> AppResult<RecordSet<Loan>> {
        Ok(self.0.loans.select(Some((column, value)), fetch_one))
    }

    async fn get_all(&self, fetch_one: bool) -> AppResult<RecordSet<Loan>> {
        Ok(self.0.loans.select(None, fetch_one))
    }

    async fn update(&self, id: i32, loan: &LoanFields) -> AppResult<u64> {
        Ok(self.0.loans.replace(
            id,
            Loan {
                loan_id: id,
                book_id: loan.book_id,
                user_id: loan.user_id,
                loan_date: loan.loan_date,
                due_date: loan.due_date,
                return_date: loan.return_date,
            },
        ))
    }

    async fn delete(&self, id: i32) -> AppResult<u64> {
        Ok(self.0.loans.remove(id))
    }

    async fn count_open_by(&self, column: LoanColumn, value: &FieldValue) -> AppResult<i64> {
        let open = self
            .0
            .loans
            .filter(Some((column, value)))
            .into_iter()
            .filter(Loan::is_open)
            .count();
        Ok(open as i64)
    }
}
