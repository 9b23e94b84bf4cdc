//! Public menu listing API.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::error;

use crate::plume::response::{JsonResult, ResponseStatus};
use crate::plume::state::AppState;

#[utoipa::path(
    get,
    path = "/api/menus",
    responses(
        (status = 200, description = "Menu listing envelope", body = JsonResult)
    ),
    tag = "api"
)]
pub async fn menus(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    match state.menus().find_all().await {
        Ok(menus) if menus.is_empty() => {
            Json(JsonResult::from_status(ResponseStatus::Empty)).into_response()
        }
        Ok(menus) => Json(JsonResult::with_result(
            ResponseStatus::Success.code(),
            ResponseStatus::Success.msg(),
            menus,
        ))
        .into_response(),
        Err(err) => {
            error!("Failed to list menus: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list menus".to_string(),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plume::audit::{AuditSink, NoopAuditSink};
    use crate::plume::auth::account::AccountStore;
    use crate::plume::auth::{AuthGuard, MemorySessionStore, SessionIssuer};
    use crate::plume::models::Menu;
    use crate::plume::state::AppConfig;
    use crate::plume::storage::memory::{MemoryAccountStore, MemoryGalleryRepo, MemoryMenuRepo};
    use crate::plume::storage::{GalleryRepo, MenuRepo};
    use anyhow::{Context, Result};
    use axum::body::to_bytes;
    use chrono::Duration;

    fn state_with(menus: Vec<Menu>) -> Arc<AppState> {
        let accounts: Arc<dyn AccountStore> = Arc::new(MemoryAccountStore::new(None));
        let audit: Arc<dyn AuditSink> = Arc::new(NoopAuditSink);
        let guard = AuthGuard::new(accounts, audit.clone());
        let sessions = SessionIssuer::new(Arc::new(MemorySessionStore::new(Duration::hours(1))));
        let galleries: Arc<dyn GalleryRepo> = Arc::new(MemoryGalleryRepo::new(Vec::new()));
        let menu_repo: Arc<dyn MenuRepo> = Arc::new(MemoryMenuRepo::new(menus));
        Arc::new(AppState::new(
            AppConfig::default(),
            guard,
            sessions,
            audit,
            galleries,
            menu_repo,
        ))
    }

    #[tokio::test]
    async fn listing_orders_and_wraps_records() -> Result<()> {
        let menu = Menu {
            menu_id: 1,
            menu_name: "Home".to_string(),
            menu_url: "/".to_string(),
            menu_sort: 0,
            menu_icon: String::new(),
            menu_target: "_self".to_string(),
        };
        let response = menus(Extension(state_with(vec![menu]))).await.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)?;
        assert_eq!(
            body.get("code").and_then(serde_json::Value::as_i64),
            Some(200)
        );
        let result = body
            .get("result")
            .and_then(serde_json::Value::as_array)
            .context("missing result")?;
        assert_eq!(
            result[0].get("menuName").and_then(serde_json::Value::as_str),
            Some("Home")
        );
        Ok(())
    }

    #[tokio::test]
    async fn empty_listing_reports_empty_status() -> Result<()> {
        let response = menus(Extension(state_with(Vec::new()))).await.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)?;
        assert_eq!(
            body.get("code").and_then(serde_json::Value::as_i64),
            Some(204)
        );
        assert!(body.get("result").is_none());
        Ok(())
    }
}
