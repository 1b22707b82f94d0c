//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use validator::Validate;

use super::record::{Column, ColumnKind, FieldValue, Record};
use crate::error::AppError;

/// Book row from the `books` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub publication_year: Option<i32>,
    pub genre: Option<String>,
}

/// Writable book fields, used for both insert and full-row update
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookFields {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    pub isbn: String,
    pub publication_year: i32,
    pub genre: String,
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} by {}", self.title, self.author)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookColumn {
    BookId,
    Title,
    Author,
    Isbn,
    PublicationYear,
    Genre,
}

impl Column for BookColumn {
    fn name(self) -> &'static str {
        match self {
            BookColumn::BookId => "book_id",
            BookColumn::Title => "title",
            BookColumn::Author => "author",
            BookColumn::Isbn => "isbn",
            BookColumn::PublicationYear => "publication_year",
            BookColumn::Genre => "genre",
        }
    }

    fn kind(self) -> ColumnKind {
        match self {
            BookColumn::BookId | BookColumn::PublicationYear => ColumnKind::Int,
            _ => ColumnKind::Text,
        }
    }
}

impl FromStr for BookColumn {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Book::COLUMNS
            .iter()
            .copied()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| AppError::Validation(format!("Unknown column '{}' for books", s.trim())))
    }
}

impl Record for Book {
    type Column = BookColumn;

    const TABLE: &'static str = "books";

    const KEY: BookColumn = BookColumn::BookId;

    const COLUMNS: &'static [BookColumn] = &[
        BookColumn::BookId,
        BookColumn::Title,
        BookColumn::Author,
        BookColumn::Isbn,
        BookColumn::PublicationYear,
        BookColumn::Genre,
    ];

    fn value(&self, column: BookColumn) -> Option<FieldValue> {
        match column {
            BookColumn::BookId => Some(FieldValue::Int(self.book_id)),
            BookColumn::Title => Some(FieldValue::Text(self.title.clone())),
            BookColumn::Author => Some(FieldValue::Text(self.author.clone())),
            BookColumn::Isbn => self.isbn.clone().map(FieldValue::Text),
            BookColumn::PublicationYear => self.publication_year.map(FieldValue::Int),
            BookColumn::Genre => self.genre.clone().map(FieldValue::Text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_allow_list() {
        assert_eq!("publication_year".parse::<BookColumn>().unwrap(), BookColumn::PublicationYear);
        assert!("book_id = 1 OR 1=1 --".parse::<BookColumn>().is_err());
        assert!("email".parse::<BookColumn>().is_err());
    }

    #[test]
    fn test_values_are_typed_per_column() {
        assert_eq!(BookColumn::BookId.parse_value("7").unwrap(), FieldValue::Int(7));
        assert_eq!(
            BookColumn::Title.parse_value("Dune").unwrap(),
            FieldValue::Text("Dune".to_string())
        );
        assert!(BookColumn::PublicationYear.parse_value("nineteen").is_err());
    }

    #[test]
    fn test_cells_render_nulls_empty() {
        let book = Book {
            book_id: 3,
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            isbn: None,
            publication_year: Some(1965),
            genre: None,
        };
        assert_eq!(Book::headers(), vec!["book_id", "title", "author", "isbn", "publication_year", "genre"]);
        assert_eq!(book.cells(), vec!["3", "Dune", "Herbert", "", "1965", ""]);
        assert_eq!(book.to_string(), "Dune by Herbert");
    }
}
