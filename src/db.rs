use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{AssessmentVersion, ImportResult};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

// Versions are append-only; the whole result goes into the JSONB payload.
pub async fn save_assessment(
    pool: &PgPool,
    company: &str,
    result: &ImportResult,
) -> anyhow::Result<i32> {
    let payload = serde_json::to_value(result)?;

    let version: i32 = sqlx::query(
        "SELECT COALESCE(MAX(version), 0) + 1 AS version \
         FROM qualityscore.assessments WHERE company = $1",
    )
    .bind(company)
    .fetch_one(pool)
    .await?
    .get("version");

    sqlx::query(
        r#"
        INSERT INTO qualityscore.assessments
        (id, company, version, valid_respondents, invalid_rows, payload, imported_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(company)
    .bind(version)
    .bind(result.valid_respondents as i32)
    .bind(result.invalid_rows as i32)
    .bind(payload)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(version)
}

pub async fn list_versions(
    pool: &PgPool,
    company: &str,
) -> anyhow::Result<Vec<AssessmentVersion>> {
    let rows = sqlx::query(
        "SELECT version, imported_at, valid_respondents, invalid_rows \
         FROM qualityscore.assessments \
         WHERE company = $1 \
         ORDER BY version",
    )
    .bind(company)
    .fetch_all(pool)
    .await?;

    let mut versions = Vec::new();
    for row in rows {
        versions.push(AssessmentVersion {
            version: row.get("version"),
            imported_at: row.get("imported_at"),
            valid_respondents: row.get("valid_respondents"),
            invalid_rows: row.get("invalid_rows"),
        });
    }

    Ok(versions)
}
