//! Whole-table listings

use crate::{
    error::AppResult,
    models::{TableName, TableView},
    repository::Repository,
};

#[derive(Clone)]
pub struct TablesService {
    repository: Repository,
}

impl TablesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List a table by name. Unknown names fail validation.
    pub async fn show_table(&self, name: &str, fetch_one: bool) -> AppResult<TableView> {
        let table: TableName = name.parse()?;
        self.show(table, fetch_one).await
    }

    pub async fn show(&self, table: TableName, fetch_one: bool) -> AppResult<TableView> {
        tracing::debug!("Listing table {}", table.as_str());
        let view = match table {
            TableName::Books => self.repository.books.get_all(fetch_one).await?.to_view(),
            TableName::Users => self.repository.users.get_all(fetch_one).await?.to_view(),
            TableName::Loans => self.repository.loans.get_all(fetch_one).await?.to_view(),
        };
        Ok(view)
    }

    /// Every table in order, as shown on the home page
    pub async fn show_all(&self) -> AppResult<Vec<TableView>> {
        let mut views = Vec::with_capacity(TableName::ALL.len());
        for table in TableName::ALL {
            views.push(self.show(table, false).await?);
        }
        Ok(views)
    }
}
