//! Storage contracts and implementations for listing data.
//!
//! The account contract lives with the auth module; the listing repos here
//! are read-only wrappers with no invariants beyond returning what is stored.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Gallery, Menu};

pub mod memory;
pub mod postgres;

#[async_trait]
pub trait GalleryRepo: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Gallery>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Gallery>>;
}

#[async_trait]
pub trait MenuRepo: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Menu>>;
}
