//! Web form front end

pub mod forms;
pub mod health;
pub mod pages;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(forms::home))
        .route("/tables", get(forms::show_table))
        // Books
        .route("/books/add", get(|| async { pages::form(&forms::ADD_BOOK) }).post(forms::add_book))
        .route("/books/update", get(|| async { pages::form(&forms::UPDATE_BOOK) }).post(forms::update_book))
        .route("/books/delete", get(|| async { pages::form(&forms::DELETE_BOOK) }).post(forms::delete_book))
        .route("/books/search", get(|| async { pages::form(&forms::SEARCH_BOOK) }).post(forms::search_book))
        // Users
        .route("/users/register", get(|| async { pages::form(&forms::REGISTER_USER) }).post(forms::register_user))
        .route("/users/update", get(|| async { pages::form(&forms::UPDATE_USER) }).post(forms::update_user))
        .route("/users/delete", get(|| async { pages::form(&forms::DELETE_USER) }).post(forms::delete_user))
        .route("/users/search", get(|| async { pages::form(&forms::SEARCH_USER) }).post(forms::search_user))
        // Loans
        .route("/loans/borrow", get(|| async { pages::form(&forms::BORROW_BOOK) }).post(forms::borrow_book))
        .route("/loans/return", get(|| async { pages::form(&forms::RETURN_BOOK) }).post(forms::return_book))
        .route("/loans/delete", get(|| async { pages::form(&forms::DELETE_LOAN) }).post(forms::delete_loan))
        .route("/loans/search", get(|| async { pages::form(&forms::SEARCH_LOAN) }).post(forms::search_loan))
        .route("/loans/overdue", get(forms::overdue_loans))
        // Health
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
