//! OpenAPI document assembly for the admin and listing surfaces.

use axum::response::Json;
use utoipa::OpenApi;

use super::handlers;
use super::handlers::admin::LoginRequest;
use super::models::{Gallery, Menu};
use super::response::JsonResult;

#[derive(OpenApi)]
#[openapi(
    info(description = "Single-admin blog platform"),
    paths(
        handlers::admin::login,
        handlers::admin::logout,
        handlers::admin::get_token,
        handlers::galleries::galleries,
        handlers::galleries::gallery,
        handlers::menus::menus,
    ),
    components(schemas(LoginRequest, JsonResult, Gallery, Menu)),
    tags(
        (name = "admin", description = "Admin login surface"),
        (name = "api", description = "Public listing API")
    )
)]
pub struct ApiDoc;

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
