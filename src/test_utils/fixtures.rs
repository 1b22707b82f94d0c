//! Test fixtures

use std::sync::Arc;

use crate::{
    controllers::Controllers,
    models::{BookFields, UserFields},
    repository::Repository,
    services::Services,
};

use super::mocks::MemoryStore;

/// The book used throughout the lending scenarios
pub fn dune() -> BookFields {
    BookFields {
        title: "Dune".to_string(),
        author: "Herbert".to_string(),
        isbn: "9780441013593".to_string(),
        publication_year: 1965,
        genre: "SciFi".to_string(),
    }
}

pub fn ana() -> UserFields {
    UserFields {
        name: "Ana".to_string(),
        email: "ana@x.io".to_string(),
        role: "member".to_string(),
    }
}

/// A repository over fresh in-memory tables, plus a handle on those tables
pub fn fixture_repository() -> (Repository, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    (MemoryStore::repository(&store), store)
}

pub fn fixture_controllers() -> (Controllers, Arc<MemoryStore>) {
    let (repository, store) = fixture_repository();
    (Controllers::new(&Services::new(repository)), store)
}
