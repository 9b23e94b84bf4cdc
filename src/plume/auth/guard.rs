//! Login admission and lockout bookkeeping for the administrative account.
//!
//! Flow overview:
//! 1) Admission gate: a disabled account is denied until the cooldown window
//!    has passed since the last successful login, then lazily re-admitted.
//! 2) Credential check: the identifier resolves by email or by login name,
//!    the secret by its MD5 digest, both against the singleton account.
//! 3) Bookkeeping: success resets the failure count and re-enables login; a
//!    mismatch increments the count and disables the account at the
//!    threshold. Each side is one atomic store operation.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{error, warn};

use super::account::{AccountIdentity, AccountStore};
use crate::plume::audit::{escape_html, AuditAction, AuditEntry, AuditOutcome, AuditSink};
use crate::plume::digest::md5_hex;

/// Consecutive failures that disable the account.
pub const FAILURE_THRESHOLD: u32 = 5;
/// Minutes a disabled account stays denied before lazy re-admission.
pub const COOLDOWN_MINUTES: i64 = 10;

/// Lockout tuning, injectable for tests.
#[derive(Clone, Copy, Debug)]
pub struct LockoutPolicy {
    pub threshold: u32,
    pub cooldown: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            threshold: FAILURE_THRESHOLD,
            cooldown: Duration::minutes(COOLDOWN_MINUTES),
        }
    }
}

/// Locale-free outcome of one login attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials matched; the snapshot is ready for session issue.
    Success(AccountIdentity),
    /// Credentials did not match.
    InvalidCredentials { attempts_left: u32 },
    /// The account is disabled and the cooldown window has not passed.
    AccountLocked,
    /// No account has been provisioned.
    AccountMissing,
}

/// How the identifier resolves against the account. Email-shaped identifiers
/// never match the login name, and vice versa.
enum CredentialLookup<'a> {
    ByEmail(&'a str),
    ByName(&'a str),
}

fn classify(identifier: &str) -> CredentialLookup<'_> {
    if is_email(identifier) {
        CredentialLookup::ByEmail(identifier)
    } else {
        CredentialLookup::ByName(identifier)
    }
}

fn is_email(identifier: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(identifier))
}

pub struct AuthGuard {
    store: Arc<dyn AccountStore>,
    audit: Arc<dyn AuditSink>,
    policy: LockoutPolicy,
}

impl AuthGuard {
    #[must_use]
    pub fn new(store: Arc<dyn AccountStore>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            store,
            audit,
            policy: LockoutPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: LockoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run one login attempt end to end.
    ///
    /// # Errors
    /// Returns an error only when the account store fails; audit problems are
    /// logged and swallowed.
    pub async fn attempt(
        &self,
        identifier: &str,
        secret: &SecretString,
        ip: Option<&str>,
    ) -> Result<LoginOutcome> {
        self.attempt_at(identifier, secret, ip, Utc::now()).await
    }

    /// [`Self::attempt`] with an explicit clock, for cooldown boundary tests.
    pub async fn attempt_at(
        &self,
        identifier: &str,
        secret: &SecretString,
        ip: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome> {
        let Some(account) = self.store.fetch().await? else {
            return Ok(LoginOutcome::AccountMissing);
        };

        if self.denied(account.login_enabled, account.last_login_at, now) {
            // No digest comparison on denial: the response must not leak
            // timing or validity information.
            self.audit(
                AuditOutcome::Denied,
                "login denied while account disabled".to_string(),
                ip,
                now,
            )
            .await;
            return Ok(LoginOutcome::AccountLocked);
        }

        // The digest runs outside the store's critical section; it is pure.
        let digest = md5_hex(secret.expose_secret().as_bytes());

        let identity_matches = match classify(identifier) {
            CredentialLookup::ByEmail(email) => account.email == email,
            CredentialLookup::ByName(name) => account.login_name == name,
        };

        if identity_matches && account.password_digest == digest {
            self.store.record_success(now).await?;
            self.audit(
                AuditOutcome::Succeeded,
                format!("user {} logged in", account.display_name),
                ip,
                now,
            )
            .await;
            return Ok(LoginOutcome::Success(account.identity()));
        }

        let failure_count = self.store.record_failure(self.policy.threshold).await?;
        let attempts_left = self.policy.threshold.saturating_sub(failure_count);
        self.audit(
            AuditOutcome::Rejected,
            format!(
                "login failed [{},{}]",
                escape_html(identifier),
                escape_html(secret.expose_secret())
            ),
            ip,
            now,
        )
        .await;

        Ok(LoginOutcome::InvalidCredentials { attempts_left })
    }

    /// The admission gate: denied only while disabled AND still inside the
    /// cooldown window.
    fn denied(
        &self,
        login_enabled: bool,
        last_login_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> bool {
        if login_enabled {
            return false;
        }
        match last_login_at {
            Some(last) => now.signed_duration_since(last) < self.policy.cooldown,
            None => {
                // A lockout before the first successful login has no reprieve
                // timestamp to measure against; the account stays denied
                // until one exists.
                warn!("disabled account has no last-login timestamp; lockout cannot lapse");
                true
            }
        }
    }

    async fn audit(
        &self,
        outcome: AuditOutcome,
        detail: String,
        ip: Option<&str>,
        at: DateTime<Utc>,
    ) {
        let entry = AuditEntry {
            action: AuditAction::Login,
            outcome,
            detail,
            ip: ip.map(str::to_string),
            at,
        };
        if let Err(err) = self.audit.record(entry).await {
            error!("Failed to record audit entry: {err}");
        }
    }
}
