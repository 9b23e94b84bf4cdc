//! The administrative account and its storage contract.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single administrative account, lockout bookkeeping included.
///
/// `failure_count` only grows between successful logins; a success resets it
/// to zero, re-enables login, and stamps `last_login_at` in one atomic
/// operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub login_name: String,
    pub email: String,
    pub display_name: String,
    /// Lowercase MD5 hex of the password.
    pub password_digest: String,
    pub login_enabled: bool,
    pub failure_count: u32,
    /// Absent until the first successful login.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Snapshot copied into the session on login.
    #[must_use]
    pub fn identity(&self) -> AccountIdentity {
        AccountIdentity {
            login_name: self.login_name.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// Identity fields safe to hold in a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountIdentity {
    pub login_name: String,
    pub email: String,
    pub display_name: String,
}

/// Errors callers may want to branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no account provisioned")]
    AccountMissing,
}

/// Storage contract for the singleton account.
///
/// `record_success` and `record_failure` apply all lockout-field mutations of
/// one attempt as a single atomic operation; concurrent attempts must not
/// observe or produce a partial update.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// The provisioned account, if any.
    async fn fetch(&self) -> Result<Option<Account>>;

    /// Reset `failure_count` to zero, re-enable login, stamp `last_login_at`.
    async fn record_success(&self, now: DateTime<Utc>) -> Result<()>;

    /// Increment `failure_count`, disabling login when the new count reaches
    /// `threshold`. Returns the new count.
    async fn record_failure(&self, threshold: u32) -> Result<u32>;
}
