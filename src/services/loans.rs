//! Loan use cases: borrowing, returning and loan record housekeeping

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{BookColumn, CreateLoan, FieldValue, Loan, LoanColumn, RecordSet},
    repository::Repository,
};

pub const LOAN_NOT_FOUND: &str = "Loan not found.";
pub const LOAN_RECORD_NOT_FOUND: &str = "Loan record not found.";

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Lend a book to a user.
    ///
    /// Only the book's existence is checked. The user id, the date order and
    /// whether the book is already out are left unchecked.
    pub async fn borrow_book(&self, loan: CreateLoan) -> AppResult<i32> {
        let book = self
            .repository
            .books
            .get_by(BookColumn::BookId, &FieldValue::Int(loan.book_id), true)
            .await?;

        if book.is_empty() {
            return Err(AppError::NotFound(super::books::BOOK_NOT_FOUND.to_string()));
        }

        let loan_id = self.repository.loans.add(&loan).await?;
        tracing::info!(
            "Book {} lent to user {} (loan {}), due {}",
            loan.book_id,
            loan.user_id,
            loan_id,
            loan.due_date
        );
        Ok(loan_id)
    }

    /// Record the return of a loan. Returning twice overwrites the date.
    pub async fn return_book(&self, loan_id: i32, return_date: DateTime<Utc>) -> AppResult<()> {
        let loan = self
            .repository
            .loans
            .get_by(LoanColumn::LoanId, &FieldValue::Int(loan_id), true)
            .await?
            .into_first()
            .ok_or_else(|| AppError::NotFound(LOAN_RECORD_NOT_FOUND.to_string()))?;

        if loan.is_overdue_at(return_date) {
            tracing::info!("Loan {} returned late", loan_id);
        }

        self.repository.loans.update(loan_id, &loan.returned_on(return_date)).await?;
        tracing::info!("Loan {} returned", loan_id);
        Ok(())
    }

    /// Remove a loan record. Unknown ids are a no-op.
    pub async fn delete_loan(&self, loan_id: i32) -> AppResult<()> {
        self.repository.loans.delete(loan_id).await?;
        tracing::info!("Loan record {} deleted", loan_id);
        Ok(())
    }

    pub async fn search_loan(
        &self,
        column: LoanColumn,
        value: &FieldValue,
        fetch_one: bool,
    ) -> AppResult<RecordSet<Loan>> {
        let found = self.repository.loans.get_by(column, value, fetch_one).await?;
        if found.is_empty() {
            return Err(AppError::NotFound(LOAN_NOT_FOUND.to_string()));
        }
        Ok(found)
    }

    /// Open loans whose due date has passed
    pub async fn overdue_loans(&self) -> AppResult<Vec<Loan>> {
        let now = Utc::now();
        let all = self.repository.loans.get_all(false).await?;
        Ok(all.into_rows().into_iter().filter(|l| l.is_overdue_at(now)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::parse_timestamp,
        services::books::BOOK_NOT_FOUND,
        test_utils::{dune, fixture_repository},
    };

    fn request(book_id: i32, user_id: i32) -> CreateLoan {
        CreateLoan {
            book_id,
            user_id,
            loan_date: parse_timestamp("2024-01-01").unwrap(),
            due_date: parse_timestamp("2024-01-15").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_borrow_existing_book_creates_open_loan() {
        let (repository, store) = fixture_repository();
        let book_id = repository.books.add(&dune()).await.unwrap();
        let service = LoansService::new(repository);

        let loan_id = service.borrow_book(request(book_id, 7)).await.unwrap();
        let loan = store.loans.get(loan_id).unwrap();

        assert_eq!(loan.book_id, Some(book_id));
        assert_eq!(loan.user_id, Some(7));
        assert!(loan.is_open());
    }

    #[tokio::test]
    async fn test_borrow_unknown_book_is_refused() {
        let (repository, store) = fixture_repository();
        let service = LoansService::new(repository);

        let err = service.borrow_book(request(99, 1)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == BOOK_NOT_FOUND));
        assert_eq!(store.loans.len(), 0);
    }

    #[tokio::test]
    async fn test_same_book_can_be_lent_twice() {
        let (repository, store) = fixture_repository();
        let book_id = repository.books.add(&dune()).await.unwrap();
        let service = LoansService::new(repository);

        service.borrow_book(request(book_id, 1)).await.unwrap();
        service.borrow_book(request(book_id, 2)).await.unwrap();
        assert_eq!(store.loans.len(), 2);
    }

    #[tokio::test]
    async fn test_return_sets_only_return_date() {
        let (repository, store) = fixture_repository();
        let book_id = repository.books.add(&dune()).await.unwrap();
        let service = LoansService::new(repository);
        let loan_id = service.borrow_book(request(book_id, 1)).await.unwrap();
        let before = store.loans.get(loan_id).unwrap();

        let returned = parse_timestamp("2024-01-10").unwrap();
        service.return_book(loan_id, returned).await.unwrap();

        let after = store.loans.get(loan_id).unwrap();
        assert_eq!(after.return_date, Some(returned));
        assert_eq!(after.book_id, before.book_id);
        assert_eq!(after.user_id, before.user_id);
        assert_eq!(after.loan_date, before.loan_date);
        assert_eq!(after.due_date, before.due_date);
    }

    #[tokio::test]
    async fn test_second_return_overwrites_date() {
        let (repository, store) = fixture_repository();
        let book_id = repository.books.add(&dune()).await.unwrap();
        let service = LoansService::new(repository);
        let loan_id = service.borrow_book(request(book_id, 1)).await.unwrap();

        service.return_book(loan_id, parse_timestamp("2024-01-10").unwrap()).await.unwrap();
        let later = parse_timestamp("2024-01-12").unwrap();
        service.return_book(loan_id, later).await.unwrap();

        assert_eq!(store.loans.get(loan_id).unwrap().return_date, Some(later));
    }

    #[tokio::test]
    async fn test_return_unknown_loan() {
        let (repository, _) = fixture_repository();
        let service = LoansService::new(repository);

        let err = service
            .return_book(5, parse_timestamp("2024-01-10").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == LOAN_RECORD_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_delete_loan_is_unconditional() {
        let (repository, store) = fixture_repository();
        let loan_id = store.open_loan(1, 1);
        let service = LoansService::new(repository);

        service.delete_loan(loan_id).await.unwrap();
        service.delete_loan(loan_id).await.unwrap();
        assert_eq!(store.loans.len(), 0);
    }

    #[tokio::test]
    async fn test_search_by_user() {
        let (repository, store) = fixture_repository();
        store.open_loan(1, 3);
        store.open_loan(2, 3);
        store.open_loan(2, 4);
        let service = LoansService::new(repository);

        let found = service
            .search_loan(LoanColumn::UserId, &FieldValue::Int(3), false)
            .await
            .unwrap();
        assert_eq!(found.rows().len(), 2);

        let err = service
            .search_loan(LoanColumn::UserId, &FieldValue::Int(9), false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == LOAN_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_overdue_loans_excludes_returned() {
        let (repository, store) = fixture_repository();
        let overdue = store.open_loan(1, 1);
        let returned = store.open_loan(2, 1);
        store.close_loan(returned);
        let service = LoansService::new(repository);

        let ids: Vec<i32> = service
            .overdue_loans()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.loan_id)
            .collect();
        assert_eq!(ids, vec![overdue]);
    }

    #[tokio::test]
    async fn test_borrow_does_not_insert_when_lookup_fails() {
        use crate::repository::{MockBookRepository, MockLoanRepository, MockUserRepository};
        use std::sync::Arc;

        let mut books = MockBookRepository::new();
        books
            .expect_get_by()
            .returning(|_, _, _| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        let mut loans = MockLoanRepository::new();
        loans.expect_add().never();

        let repository = Repository::with_stores(Arc::new(books), Arc::new(MockUserRepository::new()), Arc::new(loans));
        let service = LoansService::new(repository);

        assert!(matches!(service.borrow_book(request(1, 1)).await, Err(AppError::Database(_))));
    }
}
