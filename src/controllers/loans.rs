use crate::{
    models::{parse_timestamp, Column, CreateLoan, LoanColumn, RecordSet, TableView},
    services::loans::LoansService,
};

use super::{outcome, shown};

#[derive(Clone)]
pub struct LoansController {
    service: LoansService,
}

impl LoansController {
    pub fn new(service: LoansService) -> Self {
        Self { service }
    }

    /// Dates are `YYYY-MM-DD` or a full date-time
    pub async fn borrow_book(&self, book_id: i32, user_id: i32, loan_date: &str, due_date: &str) -> String {
        let borrowed = async {
            let loan = CreateLoan {
                book_id,
                user_id,
                loan_date: parse_timestamp(loan_date)?,
                due_date: parse_timestamp(due_date)?,
            };
            self.service.borrow_book(loan).await
        };
        outcome(borrowed.await, "Book borrowed successfully.")
    }

    pub async fn return_book(&self, loan_id: i32, return_date: &str) -> String {
        let returned = async {
            let return_date = parse_timestamp(return_date)?;
            self.service.return_book(loan_id, return_date).await
        };
        outcome(returned.await, "Book returned successfully.")
    }

    pub async fn delete_loan(&self, loan_id: i32) -> String {
        outcome(self.service.delete_loan(loan_id).await, "Loan record deleted successfully.")
    }

    pub async fn search_loan(&self, field: &str, value: &str, fetch_one: bool) -> Result<TableView, String> {
        let found = async {
            let column: LoanColumn = field.parse()?;
            let value = column.parse_value(value)?;
            self.service.search_loan(column, &value, fetch_one).await
        };
        shown(found.await).map(|set| set.to_view())
    }

    /// Open loans past their due date
    pub async fn overdue_loans(&self) -> Result<TableView, String> {
        shown(self.service.overdue_loans().await).map(|loans| RecordSet::many(loans).to_view())
    }
}
