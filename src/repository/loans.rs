//! Loans repository for database operations

use async_trait::async_trait;

use super::{
    db::{bind_value, Database},
    LoanRepository,
};
use crate::{
    error::AppResult,
    models::{Column, CreateLoan, FieldValue, Loan, LoanColumn, LoanFields, RecordSet},
};

#[derive(Clone)]
pub struct PgLoanRepository {
    db: Database,
}

impl PgLoanRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LoanRepository for PgLoanRepository {
    async fn add(&self, loan: &CreateLoan) -> AppResult<i32> {
        let id = self
            .db
            .insert_returning_id(
                sqlx::query_as(
                    r#"
                    INSERT INTO loans (book_id, user_id, loan_date, due_date)
                    VALUES ($1, $2, $3, $4)
                    RETURNING loan_id
                    "#,
                )
                .bind(loan.book_id)
                .bind(loan.user_id)
                .bind(loan.loan_date)
                .bind(loan.due_date),
            )
            .await?;

        tracing::debug!("Loan created with id {}", id);
        Ok(id)
    }

    async fn get_by(&self, column: LoanColumn, value: &FieldValue, fetch_one: bool) -> AppResult<RecordSet<Loan>> {
        self.db.select::<Loan>(Some((column, value)), fetch_one).await
    }

    async fn get_all(&self, fetch_one: bool) -> AppResult<RecordSet<Loan>> {
        self.db.select::<Loan>(None, fetch_one).await
    }

    async fn update(&self, id: i32, loan: &LoanFields) -> AppResult<u64> {
        self.db
            .execute(
                sqlx::query(
                    r#"
                    UPDATE loans
                    SET book_id = $1, user_id = $2, loan_date = $3, due_date = $4, return_date = $5
                    WHERE loan_id = $6
                    "#,
                )
                .bind(loan.book_id)
                .bind(loan.user_id)
                .bind(loan.loan_date)
                .bind(loan.due_date)
                .bind(loan.return_date)
                .bind(id),
            )
            .await
    }

    async fn delete(&self, id: i32) -> AppResult<u64> {
        self.db.delete_by_key::<Loan>(id).await
    }

    async fn count_open_by(&self, column: LoanColumn, value: &FieldValue) -> AppResult<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM loans WHERE {} = $1 AND return_date IS NULL",
            column.name()
        );

        let query = bind_value(sqlx::query_as::<_, (i64,)>(&sql), value);
        let (count,) = self.db.fetch_one(query).await?;
        Ok(count)
    }
}
