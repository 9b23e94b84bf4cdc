//! In-memory storage. The account store doubles as the reference
//! implementation of the atomic-update contract and as the test double the
//! rest of the crate is exercised with.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{GalleryRepo, MenuRepo};
use crate::plume::auth::account::{Account, AccountStore, StoreError};
use crate::plume::models::{Gallery, Menu};

/// Mutex-serialized singleton account. Every lockout mutation happens inside
/// one lock acquisition, so concurrent attempts cannot interleave partial
/// updates.
pub struct MemoryAccountStore {
    account: Mutex<Option<Account>>,
}

impl MemoryAccountStore {
    #[must_use]
    pub fn new(account: Option<Account>) -> Self {
        Self {
            account: Mutex::new(account),
        }
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn fetch(&self) -> Result<Option<Account>> {
        Ok(self.account.lock().await.clone())
    }

    async fn record_success(&self, now: DateTime<Utc>) -> Result<()> {
        let mut slot = self.account.lock().await;
        let account = slot.as_mut().ok_or(StoreError::AccountMissing)?;
        account.failure_count = 0;
        account.login_enabled = true;
        account.last_login_at = Some(now);
        Ok(())
    }

    async fn record_failure(&self, threshold: u32) -> Result<u32> {
        let mut slot = self.account.lock().await;
        let account = slot.as_mut().ok_or(StoreError::AccountMissing)?;
        account.failure_count += 1;
        if account.failure_count >= threshold {
            account.login_enabled = false;
        }
        Ok(account.failure_count)
    }
}

pub struct MemoryGalleryRepo {
    galleries: Vec<Gallery>,
}

impl MemoryGalleryRepo {
    #[must_use]
    pub fn new(galleries: Vec<Gallery>) -> Self {
        Self { galleries }
    }
}

#[async_trait]
impl GalleryRepo for MemoryGalleryRepo {
    async fn find_all(&self) -> Result<Vec<Gallery>> {
        Ok(self.galleries.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Gallery>> {
        Ok(self
            .galleries
            .iter()
            .find(|gallery| gallery.gallery_id == id)
            .cloned())
    }
}

pub struct MemoryMenuRepo {
    menus: Vec<Menu>,
}

impl MemoryMenuRepo {
    #[must_use]
    pub fn new(menus: Vec<Menu>) -> Self {
        Self { menus }
    }
}

#[async_trait]
impl MenuRepo for MemoryMenuRepo {
    async fn find_all(&self) -> Result<Vec<Menu>> {
        Ok(self.menus.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::sync::Arc;

    fn account() -> Account {
        Account {
            login_name: "admin".to_string(),
            email: "admin@example.com".to_string(),
            display_name: "Admin".to_string(),
            password_digest: "0".repeat(32),
            login_enabled: true,
            failure_count: 0,
            last_login_at: None,
        }
    }

    #[tokio::test]
    async fn record_failure_disables_at_threshold() -> Result<()> {
        let store = MemoryAccountStore::new(Some(account()));

        assert_eq!(store.record_failure(3).await?, 1);
        assert_eq!(store.record_failure(3).await?, 2);
        let fetched = store.fetch().await?.context("account")?;
        assert!(fetched.login_enabled);

        assert_eq!(store.record_failure(3).await?, 3);
        let fetched = store.fetch().await?.context("account")?;
        assert!(!fetched.login_enabled);
        Ok(())
    }

    #[tokio::test]
    async fn record_success_resets_everything() -> Result<()> {
        let mut seeded = account();
        seeded.failure_count = 4;
        seeded.login_enabled = false;
        let store = MemoryAccountStore::new(Some(seeded));

        let now = Utc::now();
        store.record_success(now).await?;

        let fetched = store.fetch().await?.context("account")?;
        assert_eq!(fetched.failure_count, 0);
        assert!(fetched.login_enabled);
        assert_eq!(fetched.last_login_at, Some(now));
        Ok(())
    }

    #[tokio::test]
    async fn mutations_on_empty_store_report_missing_account() {
        let store = MemoryAccountStore::new(None);
        assert!(store.record_failure(5).await.is_err());
        assert!(store.record_success(Utc::now()).await.is_err());
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() -> Result<()> {
        let store = Arc::new(MemoryAccountStore::new(Some(account())));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.record_failure(5).await }));
        }
        for handle in handles {
            handle.await??;
        }

        let fetched = store.fetch().await?.context("account")?;
        assert_eq!(fetched.failure_count, 5);
        assert!(!fetched.login_enabled);
        Ok(())
    }

    #[tokio::test]
    async fn gallery_repo_finds_by_id() -> Result<()> {
        let gallery = Gallery {
            gallery_id: 2,
            gallery_name: "Hills".to_string(),
            gallery_desc: String::new(),
            gallery_date: String::new(),
            gallery_location: String::new(),
            gallery_thumbnail_url: "/t.jpg".to_string(),
            gallery_url: "/f.jpg".to_string(),
        };
        let repo = MemoryGalleryRepo::new(vec![gallery.clone()]);
        assert_eq!(repo.find_by_id(2).await?, Some(gallery));
        assert_eq!(repo.find_by_id(9).await?, None);
        Ok(())
    }
}
