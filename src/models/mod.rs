//! Data models for Bibliotheca

pub mod book;
pub mod loan;
pub mod record;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookColumn, BookFields};
pub use loan::{CreateLoan, Loan, LoanColumn, LoanFields};
pub use record::{
    parse_timestamp, Column, ColumnKind, FieldValue, Fetched, Record, RecordSet, TableName, TableView,
};
pub use user::{User, UserColumn, UserFields};
