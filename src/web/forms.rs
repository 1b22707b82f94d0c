//! Form pages and their submission handlers

use axum::{
    extract::{Query, State},
    response::Html,
    Form,
};
use serde::Deserialize;

use super::pages::{self, Field, FieldKind, FormSpec};
use crate::AppState;

const fn text(name: &'static str, label: &'static str) -> Field {
    Field { name, label, kind: FieldKind::Text }
}

const fn number(name: &'static str, label: &'static str) -> Field {
    Field { name, label, kind: FieldKind::Number }
}

const fn date(name: &'static str, label: &'static str) -> Field {
    Field { name, label, kind: FieldKind::Date }
}

const FETCH_ONE: Field = Field {
    name: "fetch_one",
    label: "First match only",
    kind: FieldKind::Checkbox,
};

const BOOK_FIELDS: [Field; 5] = [
    text("title", "Title"),
    text("author", "Author"),
    text("isbn", "ISBN"),
    number("publication_year", "Publication year"),
    text("genre", "Genre"),
];

pub const ADD_BOOK: FormSpec = FormSpec {
    title: "Add Book",
    action: "/books/add",
    fields: &BOOK_FIELDS,
};

pub const UPDATE_BOOK: FormSpec = FormSpec {
    title: "Update Book Info",
    action: "/books/update",
    fields: &[
        number("book_id", "Book ID"),
        text("title", "Title"),
        text("author", "Author"),
        text("isbn", "ISBN"),
        number("publication_year", "Publication year"),
        text("genre", "Genre"),
    ],
};

pub const DELETE_BOOK: FormSpec = FormSpec {
    title: "Delete Book",
    action: "/books/delete",
    fields: &[number("book_id", "Book ID")],
};

pub const SEARCH_BOOK: FormSpec = FormSpec {
    title: "Search Book",
    action: "/books/search",
    fields: &[text("field", "Field"), text("value", "Value"), FETCH_ONE],
};

pub const REGISTER_USER: FormSpec = FormSpec {
    title: "Register User",
    action: "/users/register",
    fields: &[text("name", "Name"), text("email", "Email"), text("role", "Role")],
};

pub const UPDATE_USER: FormSpec = FormSpec {
    title: "Update User Info",
    action: "/users/update",
    fields: &[
        number("user_id", "User ID"),
        text("name", "Name"),
        text("email", "Email"),
        text("role", "Role"),
    ],
};

pub const DELETE_USER: FormSpec = FormSpec {
    title: "Delete User",
    action: "/users/delete",
    fields: &[number("user_id", "User ID")],
};

pub const SEARCH_USER: FormSpec = FormSpec {
    title: "Search User",
    action: "/users/search",
    fields: &[text("field", "Field"), text("value", "Value"), FETCH_ONE],
};

pub const BORROW_BOOK: FormSpec = FormSpec {
    title: "Borrow Book",
    action: "/loans/borrow",
    fields: &[
        number("book_id", "Book ID"),
        number("user_id", "User ID"),
        date("loan_date", "Loan date"),
        date("due_date", "Due date"),
    ],
};

pub const RETURN_BOOK: FormSpec = FormSpec {
    title: "Return Book",
    action: "/loans/return",
    fields: &[number("loan_id", "Loan ID"), date("return_date", "Return date")],
};

pub const DELETE_LOAN: FormSpec = FormSpec {
    title: "Delete Loan",
    action: "/loans/delete",
    fields: &[number("loan_id", "Loan ID")],
};

pub const SEARCH_LOAN: FormSpec = FormSpec {
    title: "Search Loan",
    action: "/loans/search",
    fields: &[text("field", "Field"), text("value", "Value"), FETCH_ONE],
};

/// Parse a whole number typed into a form
fn whole(raw: &str) -> Result<i32, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("Invalid input: '{}' is not a whole number", raw.trim()))
}

// Missing fields deserialize as empty strings and fail the usual input checks.

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct BookForm {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: String,
    pub genre: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UserForm {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct IdForm {
    #[serde(alias = "book_id", alias = "user_id", alias = "loan_id")]
    pub id: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct SearchForm {
    pub field: String,
    pub value: String,
    pub fetch_one: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct BorrowForm {
    pub book_id: String,
    pub user_id: String,
    pub loan_date: String,
    pub due_date: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ReturnForm {
    pub loan_id: String,
    pub return_date: String,
}

#[derive(Deserialize)]
pub struct TableQuery {
    pub name: Option<String>,
    pub fetch_one: Option<String>,
}

/// Home page: the connected database, then every table in full
pub async fn home(State(state): State<AppState>) -> Html<String> {
    match state.controllers.tables.show_all().await {
        Ok(views) => {
            let mut body = vec![format!(
                "<p>Bibliotheca v{} on database <code>{}</code></p>",
                env!("CARGO_PKG_VERSION"),
                pages::escape(&state.config.database.name)
            )];
            body.extend(views.iter().map(pages::table));
            pages::layout("Home", &body.join("\n"))
        }
        Err(text) => pages::message("Home", &text),
    }
}

pub async fn show_table(State(state): State<AppState>, Query(query): Query<TableQuery>) -> Html<String> {
    let Some(name) = query.name.filter(|n| !n.trim().is_empty()) else {
        return pages::layout(
            "View Table",
            "<form method=\"get\" action=\"/tables\">\n\
             <p><label for=\"name\">Table</label> <select id=\"name\" name=\"name\">\
             <option>books</option><option>users</option><option>loans</option></select></p>\n\
             <p><label for=\"fetch_one\">First row only</label> \
             <input type=\"checkbox\" id=\"fetch_one\" name=\"fetch_one\" value=\"on\"></p>\n\
             <p><button type=\"submit\">Show</button></p>\n</form>",
        );
    };

    let shown = state
        .controllers
        .tables
        .show_table(&name, query.fetch_one.is_some())
        .await;
    pages::tables("View Table", shown.map(|view| vec![view]))
}

pub async fn add_book(State(state): State<AppState>, Form(form): Form<BookForm>) -> Html<String> {
    let message = match whole(&form.publication_year) {
        Ok(year) => {
            state
                .controllers
                .books
                .add_book(&form.title, &form.author, &form.isbn, year, &form.genre)
                .await
        }
        Err(e) => e,
    };
    pages::message(ADD_BOOK.title, &message)
}

pub async fn update_book(State(state): State<AppState>, Form(form): Form<BookForm>) -> Html<String> {
    let message = match (whole(&form.book_id), whole(&form.publication_year)) {
        (Ok(id), Ok(year)) => {
            state
                .controllers
                .books
                .update_book_info(id, &form.title, &form.author, &form.isbn, year, &form.genre)
                .await
        }
        (Err(e), _) | (_, Err(e)) => e,
    };
    pages::message(UPDATE_BOOK.title, &message)
}

pub async fn delete_book(State(state): State<AppState>, Form(form): Form<IdForm>) -> Html<String> {
    let message = match whole(&form.id) {
        Ok(id) => state.controllers.books.delete_book(id).await,
        Err(e) => e,
    };
    pages::message(DELETE_BOOK.title, &message)
}

pub async fn search_book(State(state): State<AppState>, Form(form): Form<SearchForm>) -> Html<String> {
    let found = state
        .controllers
        .books
        .search_book(&form.field, &form.value, form.fetch_one.is_some())
        .await;
    pages::tables(SEARCH_BOOK.title, found.map(|view| vec![view]))
}

pub async fn register_user(State(state): State<AppState>, Form(form): Form<UserForm>) -> Html<String> {
    let message = state
        .controllers
        .users
        .register_user(&form.name, &form.email, &form.role)
        .await;
    pages::message(REGISTER_USER.title, &message)
}

pub async fn update_user(State(state): State<AppState>, Form(form): Form<UserForm>) -> Html<String> {
    let message = match whole(&form.user_id) {
        Ok(id) => {
            state
                .controllers
                .users
                .update_user_info(id, &form.name, &form.email, &form.role)
                .await
        }
        Err(e) => e,
    };
    pages::message(UPDATE_USER.title, &message)
}

pub async fn delete_user(State(state): State<AppState>, Form(form): Form<IdForm>) -> Html<String> {
    let message = match whole(&form.id) {
        Ok(id) => state.controllers.users.delete_user(id).await,
        Err(e) => e,
    };
    pages::message(DELETE_USER.title, &message)
}

pub async fn search_user(State(state): State<AppState>, Form(form): Form<SearchForm>) -> Html<String> {
    let found = state
        .controllers
        .users
        .search_user(&form.field, &form.value, form.fetch_one.is_some())
        .await;
    pages::tables(SEARCH_USER.title, found.map(|view| vec![view]))
}

pub async fn borrow_book(State(state): State<AppState>, Form(form): Form<BorrowForm>) -> Html<String> {
    let message = match (whole(&form.book_id), whole(&form.user_id)) {
        (Ok(book_id), Ok(user_id)) => {
            state
                .controllers
                .loans
                .borrow_book(book_id, user_id, &form.loan_date, &form.due_date)
                .await
        }
        (Err(e), _) | (_, Err(e)) => e,
    };
    pages::message(BORROW_BOOK.title, &message)
}

pub async fn return_book(State(state): State<AppState>, Form(form): Form<ReturnForm>) -> Html<String> {
    let message = match whole(&form.loan_id) {
        Ok(id) => state.controllers.loans.return_book(id, &form.return_date).await,
        Err(e) => e,
    };
    pages::message(RETURN_BOOK.title, &message)
}

pub async fn delete_loan(State(state): State<AppState>, Form(form): Form<IdForm>) -> Html<String> {
    let message = match whole(&form.id) {
        Ok(id) => state.controllers.loans.delete_loan(id).await,
        Err(e) => e,
    };
    pages::message(DELETE_LOAN.title, &message)
}

pub async fn search_loan(State(state): State<AppState>, Form(form): Form<SearchForm>) -> Html<String> {
    let found = state
        .controllers
        .loans
        .search_loan(&form.field, &form.value, form.fetch_one.is_some())
        .await;
    pages::tables(SEARCH_LOAN.title, found.map(|view| vec![view]))
}

pub async fn overdue_loans(State(state): State<AppState>) -> Html<String> {
    pages::tables("Overdue Loans", state.controllers.loans.overdue_loans().await.map(|view| vec![view]))
}
