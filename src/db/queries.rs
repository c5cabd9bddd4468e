use std::collections::HashMap;

use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::models::format::CaptionFormat;
use crate::models::job::{Job, JobOutput};

const JOB_COLUMNS: &str = "id, parent_id, media_url, provider, provider_params, provider_id, \
                           language, output_types, status, done, canceled, outputs, created_at, updated_at";

/// Insert a job, or overwrite every mutable column if it already exists.
///
/// Rows that are already done or canceled are left as they are, so a write
/// from a copy loaded before completion cannot clear outputs or a cancel.
/// Returns whether a row was written.
pub async fn upsert_job(pool: &PgPool, job: &Job) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO caption_jobs (id, parent_id, media_url, provider, provider_params, provider_id,
                                  language, output_types, status, done, canceled, outputs,
                                  created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        ON CONFLICT (id) DO UPDATE
        SET provider_params = EXCLUDED.provider_params,
            provider_id = EXCLUDED.provider_id,
            status = EXCLUDED.status,
            done = EXCLUDED.done,
            canceled = EXCLUDED.canceled,
            outputs = EXCLUDED.outputs,
            updated_at = EXCLUDED.updated_at
        WHERE NOT caption_jobs.done AND NOT caption_jobs.canceled
        "#,
    )
    .bind(&job.id)
    .bind(&job.parent_id)
    .bind(&job.media_url)
    .bind(&job.provider)
    .bind(Json(&job.provider_params))
    .bind(&job.provider_id)
    .bind(&job.language)
    .bind(Json(&job.output_types))
    .bind(&job.status)
    .bind(job.done)
    .bind(job.canceled)
    .bind(Json(&job.outputs))
    .bind(job.created_at)
    .bind(job.updated_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Get a job by ID
pub async fn get_job(pool: &PgPool, job_id: &str) -> Result<Option<Job>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {JOB_COLUMNS} FROM caption_jobs WHERE id = $1"))
        .bind(job_id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| job_from_row(&r)).transpose()
}

/// All jobs of a parent, newest first
pub async fn get_jobs_by_parent(pool: &PgPool, parent_id: &str) -> Result<Vec<Job>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "SELECT {JOB_COLUMNS} FROM caption_jobs WHERE parent_id = $1 ORDER BY created_at DESC"
    ))
    .bind(parent_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(job_from_row).collect()
}

/// Dispatched jobs still waiting on their vendor, oldest first
pub async fn get_pending_jobs(pool: &PgPool, limit: i64) -> Result<Vec<Job>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {JOB_COLUMNS}
        FROM caption_jobs
        WHERE done = FALSE AND canceled = FALSE AND provider_id IS NOT NULL
        ORDER BY created_at ASC
        LIMIT $1
        "#
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter().map(job_from_row).collect()
}

/// Delete a job; returns whether a row was removed
pub async fn delete_job(pool: &PgPool, job_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM caption_jobs WHERE id = $1")
        .bind(job_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn job_from_row(row: &PgRow) -> Result<Job, sqlx::Error> {
    let provider_params: Json<HashMap<String, String>> = row.try_get("provider_params")?;
    let output_types: Json<Vec<CaptionFormat>> = row.try_get("output_types")?;
    let outputs: Json<Vec<JobOutput>> = row.try_get("outputs")?;

    Ok(Job {
        id: row.try_get("id")?,
        parent_id: row.try_get("parent_id")?,
        media_url: row.try_get("media_url")?,
        provider: row.try_get("provider")?,
        provider_params: provider_params.0,
        provider_id: row.try_get("provider_id")?,
        language: row.try_get("language")?,
        output_types: output_types.0,
        status: row.try_get("status")?,
        done: row.try_get("done")?,
        canceled: row.try_get("canceled")?,
        outputs: outputs.0,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
