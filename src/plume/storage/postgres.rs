//! Postgres-backed storage. Schema in `sql/schema.sql`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::Instrument;

use super::{GalleryRepo, MenuRepo};
use crate::plume::audit::{AuditEntry, AuditSink};
use crate::plume::auth::account::{Account, AccountStore};
use crate::plume::models::{Gallery, Menu};

pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn fetch(&self) -> Result<Option<Account>> {
        let query = r"
            SELECT login_name, email, display_name, password_digest,
                   login_enabled, failure_count, last_login_at
            FROM account
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to fetch account")?;

        Ok(row.map(|row| Account {
            login_name: row.get("login_name"),
            email: row.get("email"),
            display_name: row.get("display_name"),
            password_digest: row.get::<String, _>("password_digest").trim().to_string(),
            login_enabled: row.get("login_enabled"),
            failure_count: u32::try_from(row.get::<i32, _>("failure_count")).unwrap_or(0),
            last_login_at: row.get::<Option<DateTime<Utc>>, _>("last_login_at"),
        }))
    }

    async fn record_success(&self, now: DateTime<Utc>) -> Result<()> {
        let query = r"
            UPDATE account
            SET failure_count = 0, login_enabled = TRUE, last_login_at = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(now)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to record login success")?;
        Ok(())
    }

    async fn record_failure(&self, threshold: u32) -> Result<u32> {
        // Single statement, so concurrent attempts cannot interleave the
        // increment and the enable flip.
        let query = r"
            UPDATE account
            SET failure_count = failure_count + 1,
                login_enabled = CASE
                    WHEN failure_count + 1 >= $1 THEN FALSE
                    ELSE login_enabled
                END
            RETURNING failure_count
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(i32::try_from(threshold).unwrap_or(i32::MAX))
            .fetch_one(&self.pool)
            .instrument(span)
            .await
            .context("failed to record login failure")?;

        Ok(u32::try_from(row.get::<i32, _>("failure_count")).unwrap_or(0))
    }
}

pub struct PgGalleryRepo {
    pool: PgPool,
}

impl PgGalleryRepo {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn gallery_from_row(row: &sqlx::postgres::PgRow) -> Gallery {
    Gallery {
        gallery_id: row.get("gallery_id"),
        gallery_name: row.get("gallery_name"),
        gallery_desc: row.get("gallery_desc"),
        gallery_date: row.get("gallery_date"),
        gallery_location: row.get("gallery_location"),
        gallery_thumbnail_url: row.get("gallery_thumbnail_url"),
        gallery_url: row.get("gallery_url"),
    }
}

#[async_trait]
impl GalleryRepo for PgGalleryRepo {
    async fn find_all(&self) -> Result<Vec<Gallery>> {
        let query = r"
            SELECT gallery_id, gallery_name, gallery_desc, gallery_date,
                   gallery_location, gallery_thumbnail_url, gallery_url
            FROM galleries
            ORDER BY gallery_id
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .instrument(span)
            .await
            .context("failed to list galleries")?;
        Ok(rows.iter().map(gallery_from_row).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Gallery>> {
        let query = r"
            SELECT gallery_id, gallery_name, gallery_desc, gallery_date,
                   gallery_location, gallery_thumbnail_url, gallery_url
            FROM galleries
            WHERE gallery_id = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to fetch gallery")?;
        Ok(row.as_ref().map(gallery_from_row))
    }
}

pub struct PgMenuRepo {
    pool: PgPool,
}

impl PgMenuRepo {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuRepo for PgMenuRepo {
    async fn find_all(&self) -> Result<Vec<Menu>> {
        let query = r"
            SELECT menu_id, menu_name, menu_url, menu_sort, menu_icon, menu_target
            FROM menus
            ORDER BY menu_sort, menu_id
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .instrument(span)
            .await
            .context("failed to list menus")?;
        Ok(rows
            .iter()
            .map(|row| Menu {
                menu_id: row.get("menu_id"),
                menu_name: row.get("menu_name"),
                menu_url: row.get("menu_url"),
                menu_sort: row.get("menu_sort"),
                menu_icon: row.get("menu_icon"),
                menu_target: row.get("menu_target"),
            })
            .collect())
    }
}

/// Audit sink writing the blog's `logs` table.
pub struct PgAuditSink {
    pool: PgPool,
}

impl PgAuditSink {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PgAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<()> {
        let query = r"
            INSERT INTO logs (log_action, log_outcome, log_detail, log_ip, created_at)
            VALUES ($1, $2, $3, $4, $5)
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(entry.action.as_str())
            .bind(entry.outcome.as_str())
            .bind(&entry.detail)
            .bind(entry.ip.as_deref())
            .bind(entry.at)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to insert audit entry")?;
        Ok(())
    }
}
