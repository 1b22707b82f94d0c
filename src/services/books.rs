//! Book use cases

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookColumn, BookFields, FieldValue, LoanColumn, RecordSet},
    repository::Repository,
};

pub const BOOK_NOT_FOUND: &str = "Book not found.";
pub const BOOK_HAS_OPEN_LOANS: &str = "Cannot delete book: There are active loans associated with it.";

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a new book to the catalogue. No uniqueness or ISBN format check.
    pub async fn add_book(&self, book: BookFields) -> AppResult<i32> {
        book.validate()?;
        let id = self.repository.books.add(&book).await?;
        tracing::info!("New book added: {} (id {})", book.title, id);
        Ok(id)
    }

    /// Overwrite every field of a book.
    ///
    /// An unknown id is a no-op, not an error.
    pub async fn update_book_info(&self, book_id: i32, book: BookFields) -> AppResult<()> {
        book.validate()?;
        let affected = self.repository.books.update(book_id, &book).await?;
        if affected == 0 {
            tracing::debug!("Update of book {} matched no row", book_id);
        }
        Ok(())
    }

    /// True when no open loan references the book
    pub async fn can_delete_book(&self, book_id: i32) -> AppResult<bool> {
        let open = self
            .repository
            .loans
            .count_open_by(LoanColumn::BookId, &FieldValue::Int(book_id))
            .await?;
        Ok(open == 0)
    }

    pub async fn delete_book(&self, book_id: i32) -> AppResult<()> {
        if !self.can_delete_book(book_id).await? {
            tracing::info!("Refused to delete book {}: open loans", book_id);
            return Err(AppError::Refused(BOOK_HAS_OPEN_LOANS.to_string()));
        }

        self.repository.books.delete(book_id).await?;
        tracing::info!("Book {} deleted", book_id);
        Ok(())
    }

    pub async fn search_book(
        &self,
        column: BookColumn,
        value: &FieldValue,
        fetch_one: bool,
    ) -> AppResult<RecordSet<Book>> {
        let found = self.repository.books.get_by(column, value, fetch_one).await?;
        if found.is_empty() {
            return Err(AppError::NotFound(BOOK_NOT_FOUND.to_string()));
        }
        Ok(found)
    }
}
