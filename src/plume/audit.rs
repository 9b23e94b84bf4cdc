//! Best-effort audit trail for admin activity.
//!
//! Sinks must never block or fail a login response; callers log and swallow
//! sink errors.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

/// Which surface the entry came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuditAction {
    Login,
    Logout,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
        }
    }
}

/// How the audited attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuditOutcome {
    Succeeded,
    Rejected,
    Denied,
}

impl AuditOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Rejected => "rejected",
            Self::Denied => "denied",
        }
    }
}

/// One audited event. `detail` may embed untrusted input and must be
/// sanitized with [`escape_html`] before construction.
#[derive(Clone, Debug)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub outcome: AuditOutcome,
    pub detail: String,
    pub ip: Option<String>,
    pub at: DateTime<Utc>,
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persist one entry.
    ///
    /// # Errors
    /// Returns an error when the underlying sink is unavailable; callers
    /// treat this as best-effort.
    async fn record(&self, entry: AuditEntry) -> Result<()>;
}

/// Writes audit entries to the tracing pipeline.
#[derive(Clone, Debug)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<()> {
        info!(
            action = entry.action.as_str(),
            outcome = entry.outcome.as_str(),
            ip = entry.ip.as_deref().unwrap_or("-"),
            "{}",
            entry.detail
        );
        Ok(())
    }
}

/// Discards entries; for wiring where no trail is wanted.
#[derive(Clone, Debug)]
pub struct NoopAuditSink;

#[async_trait]
impl AuditSink for NoopAuditSink {
    async fn record(&self, _entry: AuditEntry) -> Result<()> {
        Ok(())
    }
}

/// Escape markup-significant characters in untrusted input. Audit details may
/// be surfaced in rendered views later.
#[must_use]
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
