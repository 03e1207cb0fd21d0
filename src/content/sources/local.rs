//! The site's own content tables, as edited through the admin console.

use async_trait::async_trait;

use crate::content::fallback::sort_by_display_order;
use crate::content::query::QueryDescriptor;
use crate::content::record::ContentRecord;
use crate::content::source::{BackendKind, ContentSource};
use crate::database::models::AdminTable;
use crate::database::{Database, Queries};
use crate::error::{SiteError, SiteResult};

pub struct LocalSource {
    database: Database,
}

impl LocalSource {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl ContentSource for LocalSource {
    fn backend(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn fetch_many(&self, descriptor: &QueryDescriptor) -> SiteResult<Vec<ContentRecord>> {
        let table = AdminTable::from_name(&descriptor.collection).ok_or_else(|| {
            SiteError::backend(
                "local",
                format!("no content table named {}", descriptor.collection),
            )
        })?;

        let mut records: Vec<ContentRecord> = Queries::list_rows(self.database.pool(), table)
            .await?
            .iter()
            .map(|row| row.to_record(table))
            .filter(|record| descriptor.matches(record))
            .collect();

        if descriptor.order_by.is_some() {
            sort_by_display_order(&mut records);
        }

        Ok(records)
    }
}
