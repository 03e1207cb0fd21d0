use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::database::models::*;
use crate::error::{SiteError, SiteResult};

pub struct Queries;

impl Queries {
    /// All rows of a content table, ascending by `display_order`; insertion
    /// order breaks ties.
    pub async fn list_rows(pool: &SqlitePool, table: AdminTable) -> SiteResult<Vec<ContentRow>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT id, fields, display_order, visible, created_at, updated_at
            FROM {}
            ORDER BY display_order ASC, rowid ASC
            "#,
            table.table_name()
        ))
        .fetch_all(pool)
        .await?;

        rows.iter().map(content_row).collect()
    }

    pub async fn get_row(
        pool: &SqlitePool,
        table: AdminTable,
        id: &str,
    ) -> SiteResult<Option<ContentRow>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT id, fields, display_order, visible, created_at, updated_at
            FROM {}
            WHERE id = ?
            "#,
            table.table_name()
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        row.as_ref().map(content_row).transpose()
    }

    pub async fn insert_row(
        pool: &SqlitePool,
        table: AdminTable,
        input: &ContentRowInput,
    ) -> SiteResult<ContentRow> {
        let now = Utc::now();
        let row = ContentRow {
            id: Uuid::new_v4().to_string(),
            fields: input.fields.clone(),
            display_order: input.display_order,
            visible: input.visible,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(&format!(
            r#"
            INSERT INTO {} (id, fields, display_order, visible, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            table.table_name()
        ))
        .bind(&row.id)
        .bind(serde_json::to_string(&row.fields)?)
        .bind(row.display_order)
        .bind(row.visible)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(pool)
        .await
        .map_err(|e| SiteError::DatabaseError(format!("Failed to insert into {}: {}", table, e)))?;

        Ok(row)
    }

    /// Overwrite a row by id. Returns `None` when no row has that id.
    pub async fn update_row(
        pool: &SqlitePool,
        table: AdminTable,
        id: &str,
        input: &ContentRowInput,
    ) -> SiteResult<Option<ContentRow>> {
        let result = sqlx::query(&format!(
            r#"
            UPDATE {}
            SET fields = ?, display_order = ?, visible = ?, updated_at = ?
            WHERE id = ?
            "#,
            table.table_name()
        ))
        .bind(serde_json::to_string(&input.fields)?)
        .bind(input.display_order)
        .bind(input.visible)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| SiteError::DatabaseError(format!("Failed to update {}: {}", table, e)))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::get_row(pool, table, id).await
    }

    pub async fn set_visibility(
        pool: &SqlitePool,
        table: AdminTable,
        id: &str,
        visible: bool,
    ) -> SiteResult<bool> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET visible = ?, updated_at = ? WHERE id = ?",
            table.table_name()
        ))
        .bind(visible)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_row(pool: &SqlitePool, table: AdminTable, id: &str) -> SiteResult<bool> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", table.table_name()))
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| SiteError::DatabaseError(format!("Failed to delete from {}: {}", table, e)))?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_submission(
        pool: &SqlitePool,
        kind: SubmissionKind,
        payload: &Value,
        job_listing_id: Option<&str>,
    ) -> SiteResult<Submission> {
        let submission = Submission {
            id: Uuid::new_v4().to_string(),
            kind,
            payload: payload.clone(),
            status: SubmissionStatus::New,
            job_listing_id: job_listing_id.map(str::to_string),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO submissions (id, kind, payload, status, job_listing_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&submission.id)
        .bind(kind.as_str())
        .bind(serde_json::to_string(payload)?)
        .bind(submission.status.as_str())
        .bind(&submission.job_listing_id)
        .bind(submission.created_at)
        .execute(pool)
        .await
        .map_err(|e| SiteError::DatabaseError(format!("Failed to store submission: {}", e)))?;

        Ok(submission)
    }

    /// Newest first, optionally limited to one kind.
    pub async fn list_submissions(
        pool: &SqlitePool,
        kind: Option<SubmissionKind>,
    ) -> SiteResult<Vec<Submission>> {
        let rows = match kind {
            Some(kind) => {
                sqlx::query(
                    r#"
                    SELECT id, kind, payload, status, job_listing_id, created_at
                    FROM submissions
                    WHERE kind = ?
                    ORDER BY created_at DESC, rowid DESC
                    "#,
                )
                .bind(kind.as_str())
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, kind, payload, status, job_listing_id, created_at
                    FROM submissions
                    ORDER BY created_at DESC, rowid DESC
                    "#,
                )
                .fetch_all(pool)
                .await?
            }
        };

        rows.iter().map(submission_row).collect()
    }

    pub async fn update_submission_status(
        pool: &SqlitePool,
        id: &str,
        status: SubmissionStatus,
    ) -> SiteResult<Option<Submission>> {
        let result = sqlx::query("UPDATE submissions SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let row = sqlx::query(
            r#"
            SELECT id, kind, payload, status, job_listing_id, created_at
            FROM submissions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        row.as_ref().map(submission_row).transpose()
    }
}

fn content_row(row: &SqliteRow) -> SiteResult<ContentRow> {
    let fields: String = row.try_get("fields")?;
    let fields: Map<String, Value> = serde_json::from_str(&fields).map_err(|e| {
        SiteError::DatabaseError(format!("Corrupt fields column: {}", e))
    })?;

    Ok(ContentRow {
        id: row.try_get("id")?,
        fields,
        display_order: row.try_get("display_order")?,
        visible: row.try_get("visible")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn submission_row(row: &SqliteRow) -> SiteResult<Submission> {
    let kind: String = row.try_get("kind")?;
    let status: String = row.try_get("status")?;
    let payload: String = row.try_get("payload")?;

    Ok(Submission {
        id: row.try_get("id")?,
        kind: kind.parse()?,
        payload: serde_json::from_str(&payload).map_err(|e| {
            SiteError::DatabaseError(format!("Corrupt payload column: {}", e))
        })?,
        status: status.parse()?,
        job_listing_id: row.try_get("job_listing_id")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}
