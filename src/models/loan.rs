//! Loan model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

use super::record::{Column, ColumnKind, FieldValue, Record};
use crate::error::AppError;

/// Loan row from the `loans` table
///
/// `book_id` and `user_id` become NULL when the referenced row is deleted
/// after the loan was closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub loan_id: i32,
    pub book_id: Option<i32>,
    pub user_id: Option<i32>,
    pub loan_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub return_date: Option<DateTime<Utc>>,
}

impl Loan {
    /// Still outstanding
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }

    /// Open and strictly past its due date at `now`
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        match (self.return_date, self.due_date) {
            (None, Some(due)) => now > due,
            _ => false,
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }

    /// Full-row image of this loan with only the return date replaced
    pub fn returned_on(&self, return_date: DateTime<Utc>) -> LoanFields {
        LoanFields {
            book_id: self.book_id,
            user_id: self.user_id,
            loan_date: self.loan_date,
            due_date: self.due_date,
            return_date: Some(return_date),
        }
    }
}

impl std::fmt::Display for Loan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |id: Option<i32>| id.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "Loan ID: {}, Book ID: {}, User ID: {}",
            self.loan_id,
            show(self.book_id),
            show(self.user_id)
        )
    }
}

/// Borrow request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLoan {
    pub book_id: i32,
    pub user_id: i32,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// Every writable loan column, for full-row updates
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoanFields {
    pub book_id: Option<i32>,
    pub user_id: Option<i32>,
    pub loan_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub return_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanColumn {
    LoanId,
    BookId,
    UserId,
    LoanDate,
    DueDate,
    ReturnDate,
}

impl Column for LoanColumn {
    fn name(self) -> &'static str {
        match self {
            LoanColumn::LoanId => "loan_id",
            LoanColumn::BookId => "book_id",
            LoanColumn::UserId => "user_id",
            LoanColumn::LoanDate => "loan_date",
            LoanColumn::DueDate => "due_date",
            LoanColumn::ReturnDate => "return_date",
        }
    }

    fn kind(self) -> ColumnKind {
        match self {
            LoanColumn::LoanId | LoanColumn::BookId | LoanColumn::UserId => ColumnKind::Int,
            LoanColumn::LoanDate | LoanColumn::DueDate | LoanColumn::ReturnDate => ColumnKind::Timestamp,
        }
    }
}

impl FromStr for LoanColumn {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Loan::COLUMNS
            .iter()
            .copied()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| AppError::Validation(format!("Unknown column '{}' for loans", s.trim())))
    }
}

impl Record for Loan {
    type Column = LoanColumn;

    const TABLE: &'static str = "loans";

    const KEY: LoanColumn = LoanColumn::LoanId;

    const COLUMNS: &'static [LoanColumn] = &[
        LoanColumn::LoanId,
        LoanColumn::BookId,
        LoanColumn::UserId,
        LoanColumn::LoanDate,
        LoanColumn::DueDate,
        LoanColumn::ReturnDate,
    ];

    fn value(&self, column: LoanColumn) -> Option<FieldValue> {
        match column {
            LoanColumn::LoanId => Some(FieldValue::Int(self.loan_id)),
            LoanColumn::BookId => self.book_id.map(FieldValue::Int),
            LoanColumn::UserId => self.user_id.map(FieldValue::Int),
            LoanColumn::LoanDate => self.loan_date.map(FieldValue::Timestamp),
            LoanColumn::DueDate => self.due_date.map(FieldValue::Timestamp),
            LoanColumn::ReturnDate => self.return_date.map(FieldValue::Timestamp),
        }
    }
}
