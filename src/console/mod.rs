//! Line-based console menu
//!
//! Generic over the input and output streams so the whole menu can be
//! driven from a byte slice in tests.

mod render;

pub use render::render_table;

use std::str::FromStr;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

use crate::{controllers::Controllers, models::TableView};

const MENU: &str = "
Library Management System
 1. Add Book
 2. Update Book Info
 3. Register User
 4. Update User Info
 5. Borrow Book
 6. Return Book
 7. View Database Tables
 8. Delete User
 9. Delete Loan
10. Delete Book
11. Search User
12. Search Loan
13. Search Book
 0. Exit
";

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input closed before the prompt was answered
    #[error("end of input")]
    Eof,

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddBook,
    UpdateBook,
    RegisterUser,
    UpdateUser,
    BorrowBook,
    ReturnBook,
    ViewTables,
    DeleteUser,
    DeleteLoan,
    DeleteBook,
    SearchUser,
    SearchLoan,
    SearchBook,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let choice = match s.trim() {
            "1" => MenuChoice::AddBook,
            "2" => MenuChoice::UpdateBook,
            "3" => MenuChoice::RegisterUser,
            "4" => MenuChoice::UpdateUser,
            "5" => MenuChoice::BorrowBook,
            "6" => MenuChoice::ReturnBook,
            "7" => MenuChoice::ViewTables,
            "8" => MenuChoice::DeleteUser,
            "9" => MenuChoice::DeleteLoan,
            "10" => MenuChoice::DeleteBook,
            "11" => MenuChoice::SearchUser,
            "12" => MenuChoice::SearchLoan,
            "13" => MenuChoice::SearchBook,
            "0" => MenuChoice::Exit,
            other => return Err(ConsoleError::Invalid(format!("Invalid choice '{}'. Please try again.", other))),
        };
        Ok(choice)
    }
}

pub struct Console<R, W> {
    controllers: Controllers,
    input: Lines<R>,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(controllers: Controllers, input: R, output: W) -> Self {
        Self {
            controllers,
            input: input.lines(),
            output,
        }
    }

    /// Run the menu until Exit or end of input
    pub async fn run(&mut self) -> Result<(), ConsoleError> {
        loop {
            self.write(MENU).await?;
            let choice = match self.prompt("Enter your choice: ").await {
                Ok(raw) => raw.parse::<MenuChoice>(),
                Err(ConsoleError::Eof) => break,
                Err(e) => return Err(e),
            };

            let result = match choice {
                Ok(MenuChoice::Exit) => break,
                Ok(choice) => self.dispatch(choice).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => {}
                Err(ConsoleError::Invalid(msg)) => self.write_line(&msg).await?,
                Err(ConsoleError::Eof) => break,
                Err(e) => return Err(e),
            }
        }

        self.write_line("Goodbye.").await?;
        tracing::info!("Console session ended");
        Ok(())
    }

    async fn dispatch(&mut self, choice: MenuChoice) -> Result<(), ConsoleError> {
        tracing::debug!("Menu choice {:?}", choice);

        match choice {
            MenuChoice::AddBook => {
                let (title, author, isbn, year, genre) = self.book_fields().await?;
                let message = self.controllers.books.add_book(&title, &author, &isbn, year, &genre).await;
                self.write_line(&message).await
            }
            MenuChoice::UpdateBook => {
                let id = self.prompt_int("Book ID: ").await?;
                let (title, author, isbn, year, genre) = self.book_fields().await?;
                let message = self.controllers.books.update_book_info(id, &title, &author, &isbn, year, &genre).await;
                self.write_line(&message).await
            }
            MenuChoice::RegisterUser => {
                let (name, email, role) = self.user_fields().await?;
                let message = self.controllers.users.register_user(&name, &email, &role).await;
                self.write_line(&message).await
            }
            MenuChoice::UpdateUser => {
                let id = self.prompt_int("User ID: ").await?;
                let (name, email, role) = self.user_fields().await?;
                let message = self.controllers.users.update_user_info(id, &name, &email, &role).await;
                self.write_line(&message).await
            }
            MenuChoice::BorrowBook => {
                let book_id = self.prompt_int("Book ID: ").await?;
                let user_id = self.prompt_int("User ID: ").await?;
                let loan_date = self.prompt("Loan date (YYYY-MM-DD): ").await?;
                let due_date = self.prompt("Due date (YYYY-MM-DD): ").await?;
                let message = self.controllers.loans.borrow_book(book_id, user_id, &loan_date, &due_date).await;
                self.write_line(&message).await
            }
            MenuChoice::ReturnBook => {
                let loan_id = self.prompt_int("Loan ID: ").await?;
                let return_date = self.prompt("Return date (YYYY-MM-DD): ").await?;
                let message = self.controllers.loans.return_book(loan_id, &return_date).await;
                self.write_line(&message).await
            }
            MenuChoice::ViewTables => {
                let table = self
                    .prompt("Table name (books, users, loans; blank for all): ")
                    .await?;
                if table.is_empty() {
                    return match self.controllers.tables.show_all().await {
                        Ok(views) => {
                            for view in views {
                                self.write_line(&view.title).await?;
                                self.write(&render_table(&view)).await?;
                            }
                            Ok(())
                        }
                        Err(message) => self.write_line(&message).await,
                    };
                }
                let fetch_one = self.prompt_yes_no("Show only the first row? (y/n): ").await?;
                let shown = self.controllers.tables.show_table(&table, fetch_one).await;
                self.show(shown).await
            }
            MenuChoice::DeleteUser => {
                let id = self.prompt_int("User ID: ").await?;
                let message = self.controllers.users.delete_user(id).await;
                self.write_line(&message).await
            }
            MenuChoice::DeleteLoan => {
                let id = self.prompt_int("Loan ID: ").await?;
                let message = self.controllers.loans.delete_loan(id).await;
                self.write_line(&message).await
            }
            MenuChoice::DeleteBook => {
                let id = self.prompt_int("Book ID: ").await?;
                let message = self.controllers.books.delete_book(id).await;
                self.write_line(&message).await
            }
            MenuChoice::SearchUser => {
                let (field, value, fetch_one) = self.search_terms("user_id, name, email, role").await?;
                let found = self.controllers.users.search_user(&field, &value, fetch_one).await;
                self.show(found).await
            }
            MenuChoice::SearchLoan => {
                let (field, value, fetch_one) = self
                    .search_terms("loan_id, book_id, user_id, loan_date, due_date, return_date")
                    .await?;
                let found = self.controllers.loans.search_loan(&field, &value, fetch_one).await;
                self.show(found).await
            }
            MenuChoice::SearchBook => {
                let (field, value, fetch_one) = self
                    .search_terms("book_id, title, author, isbn, publication_year, genre")
                    .await?;
                let found = self.controllers.books.search_book(&field, &value, fetch_one).await;
                self.show(found).await
            }
            MenuChoice::Exit => Ok(()),
        }
    }

    async fn book_fields(&mut self) -> Result<(String, String, String, i32, String), ConsoleError> {
        let title = self.prompt("Title: ").await?;
        let author = self.prompt("Author: ").await?;
        let isbn = self.prompt("ISBN: ").await?;
        let year = self.prompt_int("Publication year: ").await?;
        let genre = self.prompt("Genre: ").await?;
        Ok((title, author, isbn, year, genre))
    }

    async fn user_fields(&mut self) -> Result<(String, String, String), ConsoleError> {
        let name = self.prompt("Name: ").await?;
        let email = self.prompt("Email: ").await?;
        let role = self.prompt("Role (student, teacher, admin): ").await?;
        Ok((name, email, role))
    }

    async fn search_terms(&mut self, columns: &str) -> Result<(String, String, bool), ConsoleError> {
        let field = self.prompt(&format!("Search by ({}): ", columns)).await?;
        let value = self.prompt("Value: ").await?;
        let fetch_one = self.prompt_yes_no("Only the first match? (y/n): ").await?;
        Ok((field, value, fetch_one))
    }

    async fn show(&mut self, shown: Result<TableView, String>) -> Result<(), ConsoleError> {
        match shown {
            Ok(view) => {
                let grid = render_table(&view);
                self.write(&grid).await
            }
            Err(message) => self.write_line(&message).await,
        }
    }

    async fn prompt(&mut self, label: &str) -> Result<String, ConsoleError> {
        self.write(label).await?;
        match self.input.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(ConsoleError::Eof),
        }
    }

    async fn prompt_int(&mut self, label: &str) -> Result<i32, ConsoleError> {
        let raw = self.prompt(label).await?;
        raw.parse::<i32>()
            .map_err(|_| ConsoleError::Invalid(format!("Invalid input: '{}' is not a whole number", raw)))
    }

    async fn prompt_yes_no(&mut self, label: &str) -> Result<bool, ConsoleError> {
        let raw = self.prompt(label).await?;
        Ok(matches!(raw.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    async fn write(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }

    async fn write_line(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.write(text).await?;
        self.write("\n").await
    }
}
