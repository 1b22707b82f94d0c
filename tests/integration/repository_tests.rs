//! Postgres-backed repository and use case tests

use sqlx::PgPool;

use bibliotheca::{
    controllers::Controllers,
    models::{parse_timestamp, BookColumn, BookFields, CreateLoan, FieldValue, LoanColumn, UserFields},
    repository::{Database, Repository},
    services::Services,
    AppError,
};

fn dune() -> BookFields {
    BookFields {
        title: "Dune".to_string(),
        author: "Herbert".to_string(),
        isbn: "9780441013593".to_string(),
        publication_year: 1965,
        genre: "SciFi".to_string(),
    }
}

fn ana() -> UserFields {
    UserFields {
        name: "Ana".to_string(),
        email: "ana@x.com".to_string(),
        role: "student".to_string(),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_book_round_trip(pool: PgPool) {
    let repository = Repository::new(Database::from_pool(pool));

    let id = repository.books.add(&dune()).await.unwrap();
    let book = repository
        .books
        .get_by(BookColumn::BookId, &FieldValue::Int(id), true)
        .await
        .unwrap()
        .into_first()
        .unwrap();

    assert_eq!(book.title, "Dune");
    assert_eq!(book.isbn.as_deref(), Some("9780441013593"));
    assert_eq!(book.publication_year, Some(1965));

    let all = repository.books.get_all(false).await.unwrap();
    assert_eq!(all.headers, vec!["book_id", "title", "author", "isbn", "publication_year", "genre"]);
    assert_eq!(all.rows().len(), 1);

    assert_eq!(repository.books.update(id + 100, &dune()).await.unwrap(), 0);
    assert_eq!(repository.books.delete(id).await.unwrap(), 1);
    assert!(repository.books.get_all(true).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_duplicate_email_is_a_storage_error(pool: PgPool) {
    let services = Services::new(Repository::new(Database::from_pool(pool)));

    services.users.register_user(ana()).await.unwrap();
    let err = services.users.register_user(ana()).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
    assert_eq!(err.user_message(), "An error occurred: database operation failed");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_open_loan_count_and_set_null(pool: PgPool) {
    let repository = Repository::new(Database::from_pool(pool));
    let services = Services::new(repository.clone());

    let book_id = services.books.add_book(dune()).await.unwrap();
    let user_id = services.users.register_user(ana()).await.unwrap();
    let loan_id = services
        .loans
        .borrow_book(CreateLoan {
            book_id,
            user_id,
            loan_date: parse_timestamp("2024-01-01").unwrap(),
            due_date: parse_timestamp("2024-01-15").unwrap(),
        })
        .await
        .unwrap();

    let open = repository
        .loans
        .count_open_by(LoanColumn::BookId, &FieldValue::Int(book_id))
        .await
        .unwrap();
    assert_eq!(open, 1);

    services
        .loans
        .return_book(loan_id, parse_timestamp("2024-01-10").unwrap())
        .await
        .unwrap();
    services.books.delete_book(book_id).await.unwrap();

    let loan = services
        .loans
        .search_loan(LoanColumn::LoanId, &FieldValue::Int(loan_id), true)
        .await
        .unwrap()
        .into_first()
        .unwrap();
    assert_eq!(loan.book_id, None);
    assert_eq!(loan.user_id, Some(user_id));
    assert_eq!(loan.return_date, Some(parse_timestamp("2024-01-10").unwrap()));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_end_to_end_messages(pool: PgPool) {
    let services = Services::new(Repository::new(Database::from_pool(pool)));
    let c = Controllers::new(&services);

    assert_eq!(
        c.books.add_book("Dune", "Herbert", "9780441013593", 1965, "SciFi").await,
        "Book added successfully."
    );
    assert_eq!(c.users.register_user("Ana", "ana@x.com", "student").await, "User registered successfully.");
    assert_eq!(c.loans.borrow_book(1, 1, "2024-01-01", "2024-01-15").await, "Book borrowed successfully.");
    assert_eq!(
        c.books.delete_book(1).await,
        "Cannot delete book: There are active loans associated with it."
    );
    assert_eq!(c.loans.return_book(1, "2024-01-10").await, "Book returned successfully.");
    assert_eq!(c.books.delete_book(1).await, "Book deleted successfully.");
    assert_eq!(c.books.search_book("book_id", "1", true).await.unwrap_err(), "Book not found.");
}
