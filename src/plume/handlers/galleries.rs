//! Public gallery listing API.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::error;

use crate::plume::response::{JsonResult, ResponseStatus};
use crate::plume::state::AppState;

#[utoipa::path(
    get,
    path = "/api/galleries",
    responses(
        (status = 200, description = "Gallery listing envelope", body = JsonResult)
    ),
    tag = "api"
)]
pub async fn galleries(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    match state.galleries().find_all().await {
        Ok(galleries) if galleries.is_empty() => {
            Json(JsonResult::from_status(ResponseStatus::Empty)).into_response()
        }
        Ok(galleries) => Json(JsonResult::with_result(
            ResponseStatus::Success.code(),
            ResponseStatus::Success.msg(),
            galleries,
        ))
        .into_response(),
        Err(err) => {
            error!("Failed to list galleries: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list galleries".to_string(),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/galleries/{id}",
    params(
        ("id" = i64, Path, description = "Gallery id")
    ),
    responses(
        (status = 200, description = "Single gallery envelope", body = JsonResult)
    ),
    tag = "api"
)]
pub async fn gallery(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.galleries().find_by_id(id).await {
        Ok(Some(gallery)) => Json(JsonResult::with_result(
            ResponseStatus::Success.code(),
            ResponseStatus::Success.msg(),
            gallery,
        ))
        .into_response(),
        Ok(None) => Json(JsonResult::from_status(ResponseStatus::NotFound)).into_response(),
        Err(err) => {
            error!("Failed to fetch gallery {id}: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch gallery".to_string(),
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
    use crate::plume::models::Gallery;
    use crate::plume::state::AppConfig;
    use crate::plume::storage::memory::{MemoryAccountStore, MemoryGalleryRepo, MemoryMenuRepo};
    use crate::plume::storage::{GalleryRepo, MenuRepo};
    use anyhow::{Context, Result};
    use axum::body::to_bytes;
    use chrono::Duration;

    fn sample() -> Gallery {
        Gallery {
            gallery_id: 1,
            gallery_name: "Sunset".to_string(),
            gallery_desc: String::new(),
            gallery_date: "2018-06-06".to_string(),
            gallery_location: String::new(),
            gallery_thumbnail_url: "/upload/thumb.jpg".to_string(),
            gallery_url: "/upload/full.jpg".to_string(),
        }
    }

    fn state_with(galleries: Vec<Gallery>) -> Arc<AppState> {
        let accounts: Arc<dyn AccountStore> = Arc::new(MemoryAccountStore::new(None));
        let audit: Arc<dyn AuditSink> = Arc::new(NoopAuditSink);
        let guard = AuthGuard::new(accounts, audit.clone());
        let sessions = SessionIssuer::new(Arc::new(MemorySessionStore::new(Duration::hours(1))));
        let gallery_repo: Arc<dyn GalleryRepo> = Arc::new(MemoryGalleryRepo::new(galleries));
        let menus: Arc<dyn MenuRepo> = Arc::new(MemoryMenuRepo::new(Vec::new()));
        Arc::new(AppState::new(
            AppConfig::default(),
            guard,
            sessions,
            audit,
            gallery_repo,
            menus,
        ))
    }

    async fn body_json(response: axum::response::Response) -> Result<serde_json::Value> {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .context("failed to read body")?;
        serde_json::from_slice(&bytes).context("body is not JSON")
    }

    #[tokio::test]
    async fn listing_wraps_records() -> Result<()> {
        let response = galleries(Extension(state_with(vec![sample()])))
            .await
            .into_response();
        let body = body_json(response).await?;
        assert_eq!(
            body.get("code").and_then(serde_json::Value::as_i64),
            Some(200)
        );
        let result = body
            .get("result")
            .and_then(serde_json::Value::as_array)
            .context("missing result")?;
        assert_eq!(result.len(), 1);
        assert!(result[0].get("galleryId").is_some());
        Ok(())
    }

    #[tokio::test]
    async fn empty_listing_omits_result() -> Result<()> {
        let response = galleries(Extension(state_with(Vec::new())))
            .await
            .into_response();
        let body = body_json(response).await?;
        assert_eq!(
            body.get("code").and_then(serde_json::Value::as_i64),
            Some(204)
        );
        assert!(body.get("result").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn single_lookup_distinguishes_found_and_missing() -> Result<()> {
        let state = state_with(vec![sample()]);

        let response = gallery(Extension(state.clone()), Path(1)).await.into_response();
        let body = body_json(response).await?;
        assert_eq!(
            body.get("code").and_then(serde_json::Value::as_i64),
            Some(200)
        );

        let response = gallery(Extension(state), Path(42)).await.into_response();
        let body = body_json(response).await?;
        assert_eq!(
            body.get("code").and_then(serde_json::Value::as_i64),
            Some(404)
        );
        assert!(body.get("result").is_none());
        Ok(())
    }
}
