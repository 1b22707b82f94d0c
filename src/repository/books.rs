//! Books repository for database operations

use async_trait::async_trait;

use super::{db::Database, BookRepository};
use crate::{
    error::AppResult,
    models::{Book, BookColumn, BookFields, FieldValue, RecordSet},
};

#[derive(Clone)]
pub struct PgBookRepository {
    db: Database,
}

impl PgBookRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn add(&self, book: &BookFields) -> AppResult<i32> {
        let id = self
            .db
            .insert_returning_id(
                sqlx::query_as(
                    r#"
                    INSERT INTO books (title, author, isbn, publication_year, genre)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING book_id
                    "#,
                )
                .bind(&book.title)
                .bind(&book.author)
                .bind(&book.isbn)
                .bind(book.publication_year)
                .bind(&book.genre),
            )
            .await?;

        tracing::debug!("Book added with id {}", id);
        Ok(id)
    }

    async fn get_by(&self, column: BookColumn, value: &FieldValue, fetch_one: bool) -> AppResult<RecordSet<Book>> {
        self.db.select::<Book>(Some((column, value)), fetch_one).await
    }

    async fn get_all(&self, fetch_one: bool) -> AppResult<RecordSet<Book>> {
        self.db.select::<Book>(None, fetch_one).await
    }

    async fn update(&self, id: i32, book: &BookFields) -> AppResult<u64> {
        self.db
            .execute(
                sqlx::query(
                    r#"
                    UPDATE books
                    SET title = $1, author = $2, isbn = $3, publication_year = $4, genre = $5
                    WHERE book_id = $6
                    "#,
                )
                .bind(&book.title)
                .bind(&book.author)
                .bind(&book.isbn)
                .bind(book.publication_year)
                .bind(&book.genre)
                .bind(id),
            )
            .await
    }

    async fn delete(&self, id: i32) -> AppResult<u64> {
        self.db.delete_by_key::<Book>(id).await
    }
}
