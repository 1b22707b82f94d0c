use crate::{
    models::{BookColumn, BookFields, Column, TableView},
    services::books::BooksService,
};

use super::{outcome, shown};

#[derive(Clone)]
pub struct BooksController {
    service: BooksService,
}

impl BooksController {
    pub fn new(service: BooksService) -> Self {
        Self { service }
    }

    pub async fn add_book(&self, title: &str, author: &str, isbn: &str, publication_year: i32, genre: &str) -> String {
        let book = fields(title, author, isbn, publication_year, genre);
        outcome(self.service.add_book(book).await, "Book added successfully.")
    }

    pub async fn update_book_info(
        &self,
        book_id: i32,
        title: &str,
        author: &str,
        isbn: &str,
        publication_year: i32,
        genre: &str,
    ) -> String {
        let book = fields(title, author, isbn, publication_year, genre);
        outcome(
            self.service.update_book_info(book_id, book).await,
            "Book information updated successfully.",
        )
    }

    pub async fn delete_book(&self, book_id: i32) -> String {
        outcome(self.service.delete_book(book_id).await, "Book deleted successfully.")
    }

    /// Search by column name and raw value, e.g. `("author", "Herbert")`
    pub async fn search_book(&self, field: &str, value: &str, fetch_one: bool) -> Result<TableView, String> {
        let found = async {
            let column: BookColumn = field.parse()?;
            let value = column.parse_value(value)?;
            self.service.search_book(column, &value, fetch_one).await
        };
        shown(found.await).map(|set| set.to_view())
    }
}

fn fields(title: &str, author: &str, isbn: &str, publication_year: i32, genre: &str) -> BookFields {
    BookFields {
        title: title.trim().to_string(),
        author: author.trim().to_string(),
        isbn: isbn.trim().to_string(),
        publication_year,
        genre: genre.trim().to_string(),
    }
}
