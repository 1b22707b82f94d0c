use crate::{models::TableView, services::tables::TablesService};

use super::shown;

#[derive(Clone)]
pub struct TablesController {
    service: TablesService,
}

impl TablesController {
    pub fn new(service: TablesService) -> Self {
        Self { service }
    }

    pub async fn show_table(&self, table_name: &str, fetch_one: bool) -> Result<TableView, String> {
        shown(self.service.show_table(table_name, fetch_one).await)
    }

    pub async fn show_all(&self) -> Result<Vec<TableView>, String> {
        shown(self.service.show_all().await)
    }
}
