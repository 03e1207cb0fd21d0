//! Table managers behind the admin console.

use serde::Serialize;
use tracing::info;

use crate::database::models::{
    AdminTable, ContentRow, ContentRowInput, Submission, SubmissionKind, SubmissionStatus,
};
use crate::database::{Database, Queries};
use crate::error::{SiteError, SiteResult};

#[derive(Debug, Clone, Serialize)]
pub struct SaveOutcome {
    pub created: bool,
    pub row: ContentRow,
}

#[derive(Clone)]
pub struct AdminManager {
    database: Database,
}

impl AdminManager {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// All rows ascending by `display_order`.
    pub async fn list(&self, table: AdminTable) -> SiteResult<Vec<ContentRow>> {
        Queries::list_rows(self.database.pool(), table).await
    }

    pub async fn get(&self, table: AdminTable, id: &str) -> SiteResult<ContentRow> {
        Queries::get_row(self.database.pool(), table, id)
            .await?
            .ok_or_else(|| SiteError::NotFound(format!("{} row {}", table, id)))
    }

    /// One upsert: insert when the input has no id, otherwise update that id.
    pub async fn save(&self, table: AdminTable, input: &ContentRowInput) -> SiteResult<SaveOutcome> {
        match input.existing_id() {
            None => {
                let row = Queries::insert_row(self.database.pool(), table, input).await?;
                info!("Inserted {} row {}", table, row.id);
                Ok(SaveOutcome { created: true, row })
            }
            Some(id) => {
                let row = Queries::update_row(self.database.pool(), table, id, input)
                    .await?
                    .ok_or_else(|| SiteError::NotFound(format!("{} row {}", table, id)))?;
                info!("Updated {} row {}", table, row.id);
                Ok(SaveOutcome { created: false, row })
            }
        }
    }

    /// First step of a delete. Nothing is removed until the returned
    /// [`PendingDelete`] is confirmed.
    pub async fn request_delete(&self, table: AdminTable, id: &str) -> SiteResult<PendingDelete> {
        let row = self.get(table, id).await?;
        Ok(PendingDelete {
            database: self.database.clone(),
            table,
            row,
        })
    }

    pub async fn set_visibility(&self, table: AdminTable, id: &str, visible: bool) -> SiteResult<()> {
        if !Queries::set_visibility(self.database.pool(), table, id, visible).await? {
            return Err(SiteError::NotFound(format!("{} row {}", table, id)));
        }
        info!("Set {} row {} {}={}", table, id, table.visibility_column(), visible);
        Ok(())
    }

    pub async fn submissions(&self, kind: Option<SubmissionKind>) -> SiteResult<Vec<Submission>> {
        Queries::list_submissions(self.database.pool(), kind).await
    }

    pub async fn update_submission_status(
        &self,
        id: &str,
        status: SubmissionStatus,
    ) -> SiteResult<Submission> {
        let submission = Queries::update_submission_status(self.database.pool(), id, status)
            .await?
            .ok_or_else(|| SiteError::NotFound(format!("submission {}", id)))?;
        info!("Submission {} marked {}", id, status.as_str());
        Ok(submission)
    }
}

/// A delete awaiting confirmation.
pub struct PendingDelete {
    database: Database,
    table: AdminTable,
    row: ContentRow,
}

impl PendingDelete {
    pub fn table(&self) -> AdminTable {
        self.table
    }

    /// The row that will be removed.
    pub fn row(&self) -> &ContentRow {
        &self.row
    }

    pub fn into_row(self) -> ContentRow {
        self.row
    }

    pub async fn confirm(self) -> SiteResult<ContentRow> {
        if !Queries::delete_row(self.database.pool(), self.table, &self.row.id).await? {
            return Err(SiteError::NotFound(format!("{} row {}", self.table, self.row.id)));
        }
        info!("Deleted {} row {}", self.table, self.row.id);
        Ok(self.row)
    }
}
