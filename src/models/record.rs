//! Shared record plumbing: filterable columns, typed values, result sets

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Storage type of a column, used to parse raw filter text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Text,
    Timestamp,
}

/// A typed filter value bound into a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(i32),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Text(v) => write!(f, "{}", v),
            FieldValue::Timestamp(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// A column of an entity table that may appear in a filter clause.
///
/// Implementors are closed enums, so only known column names ever reach
/// statement text.
pub trait Column: Copy + fmt::Debug + FromStr<Err = AppError> + Send + Sync + 'static {
    fn name(self) -> &'static str;

    fn kind(self) -> ColumnKind;

    /// Parse user-supplied text into a value of this column's type
    fn parse_value(self, raw: &str) -> AppResult<FieldValue> {
        let raw = raw.trim();
        match self.kind() {
            ColumnKind::Int => raw.parse::<i32>().map(FieldValue::Int).map_err(|_| {
                AppError::Validation(format!("'{}' is not a valid value for {}", raw, self.name()))
            }),
            ColumnKind::Text => Ok(FieldValue::Text(raw.to_string())),
            ColumnKind::Timestamp => parse_timestamp(raw).map(FieldValue::Timestamp),
        }
    }
}

/// A row of one of the entity tables
pub trait Record: Clone + Send + Sync + 'static {
    type Column: Column;

    const TABLE: &'static str;

    /// Primary key column
    const KEY: Self::Column;

    /// All columns in storage order
    const COLUMNS: &'static [Self::Column];

    /// Value held in `column`, `None` when the column is NULL
    fn value(&self, column: Self::Column) -> Option<FieldValue>;

    fn headers() -> Vec<&'static str> {
        Self::COLUMNS.iter().map(|c| c.name()).collect()
    }

    /// Display cells in column order, NULL rendered as an empty cell
    fn cells(&self) -> Vec<String> {
        Self::COLUMNS
            .iter()
            .map(|c| self.value(*c).map(|v| v.to_string()).unwrap_or_default())
            .collect()
    }
}

/// Either a single optional row or the full matching set
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    One(Option<T>),
    Many(Vec<T>),
}

/// Rows plus ordered column names
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet<T> {
    pub content: Fetched<T>,
    pub headers: Vec<&'static str>,
}

impl<T: Record> RecordSet<T> {
    pub fn one(row: Option<T>) -> Self {
        Self {
            content: Fetched::One(row),
            headers: T::headers(),
        }
    }

    pub fn many(rows: Vec<T>) -> Self {
        Self {
            content: Fetched::Many(rows),
            headers: T::headers(),
        }
    }

    /// Builds the shape requested by `fetch_one` from a full result
    pub fn from_rows(rows: Vec<T>, fetch_one: bool) -> Self {
        if fetch_one {
            Self::one(rows.into_iter().next())
        } else {
            Self::many(rows)
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.content {
            Fetched::One(row) => row.is_none(),
            Fetched::Many(rows) => rows.is_empty(),
        }
    }

    pub fn rows(&self) -> Vec<&T> {
        match &self.content {
            Fetched::One(row) => row.iter().collect(),
            Fetched::Many(rows) => rows.iter().collect(),
        }
    }

    pub fn into_rows(self) -> Vec<T> {
        match self.content {
            Fetched::One(row) => row.into_iter().collect(),
            Fetched::Many(rows) => rows,
        }
    }

    pub fn into_first(self) -> Option<T> {
        self.into_rows().into_iter().next()
    }

    pub fn to_view(&self) -> TableView {
        TableView {
            title: T::TABLE.to_string(),
            headers: self.headers.iter().map(|h| h.to_string()).collect(),
            rows: self.rows().into_iter().map(|row| row.cells()).collect(),
        }
    }
}

/// Front-end neutral rendering of a result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The entity tables addressable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableName {
    Books,
    Users,
    Loans,
}

impl TableName {
    pub const ALL: [TableName; 3] = [TableName::Books, TableName::Users, TableName::Loans];

    pub fn as_str(self) -> &'static str {
        match self {
            TableName::Books => "books",
            TableName::Users => "users",
            TableName::Loans => "loans",
        }
    }
}

impl FromStr for TableName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "books" => Ok(TableName::Books),
            "users" => Ok(TableName::Users),
            "loans" => Ok(TableName::Loans),
            other => Err(AppError::Validation(format!(
                "Couldn't retrieve table '{}': expected one of books, users, loans",
                other
            ))),
        }
    }
}

/// Parse a date or date-time entered by a person.
///
/// Accepts `YYYY-MM-DD` (midnight UTC), `YYYY-MM-DD HH:MM[:SS]` (UTC) and RFC 3339.
pub fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(AppError::Validation(format!(
        "'{}' is not a date (expected YYYY-MM-DD)",
        raw
    )))
}
