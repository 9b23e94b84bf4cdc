//! Admin surface: login, logout, and the opaque token endpoint.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Redirect},
};
use chrono::Utc;
use secrecy::SecretString;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;

use super::extract_client_ip;
use crate::plume::audit::{AuditAction, AuditEntry, AuditOutcome};
use crate::plume::auth::session::{clear_session_cookie, extract_session_token, session_cookie};
use crate::plume::auth::{token, LoginOutcome};
use crate::plume::locale::{resolve, Locale, MessageKey};
use crate::plume::response::{JsonResult, ResponseStatus, CODE_FAIL, CODE_SUCCESS};
use crate::plume::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub login_name: String,
    #[schema(value_type = String)]
    pub login_pwd: SecretString,
}

#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login outcome envelope", body = JsonResult),
        (status = 400, description = "Missing payload", body = JsonResult)
    ),
    tag = "admin"
)]
pub async fn login(
    headers: HeaderMap,
    Extension(state): Extension<Arc<AppState>>,
    Extension(locale): Extension<Locale>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(JsonResult::new(CODE_FAIL, "Missing payload")),
        )
            .into_response();
    };

    let client_ip = extract_client_ip(&headers);
    let outcome = match state
        .guard()
        .attempt(&request.login_name, &request.login_pwd, client_ip.as_deref())
        .await
    {
        Ok(outcome) => outcome,
        Err(err) => {
            error!("Login attempt failed: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(JsonResult::new(CODE_FAIL, "Login failed")),
            )
                .into_response();
        }
    };

    match outcome {
        LoginOutcome::Success(identity) => {
            let session_token = match state.sessions().establish(identity).await {
                Ok(token) => token,
                Err(err) => {
                    error!("Failed to establish session: {err}");
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(JsonResult::new(CODE_FAIL, "Login failed")),
                    )
                        .into_response();
                }
            };

            let mut response_headers = HeaderMap::new();
            if let Ok(cookie) = session_cookie(
                &session_token,
                state.config().session_ttl_seconds(),
                state.config().session_cookie_secure(),
            ) {
                response_headers.insert(SET_COOKIE, cookie);
            }

            (
                response_headers,
                Json(JsonResult::new(
                    CODE_SUCCESS,
                    resolve(locale, MessageKey::LoginSuccess),
                )),
            )
                .into_response()
        }
        LoginOutcome::InvalidCredentials { attempts_left } => Json(JsonResult::new(
            CODE_FAIL,
            resolve(locale, MessageKey::LoginFailed { attempts_left }),
        ))
        .into_response(),
        LoginOutcome::AccountLocked => Json(JsonResult::new(
            CODE_FAIL,
            resolve(locale, MessageKey::LoginDisabled),
        ))
        .into_response(),
        LoginOutcome::AccountMissing => Json(JsonResult::new(
            CODE_FAIL,
            resolve(locale, MessageKey::AccountMissing),
        ))
        .into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/admin/logout",
    responses(
        (status = 303, description = "Session destroyed, redirected to the login surface")
    ),
    tag = "admin"
)]
pub async fn logout(
    headers: HeaderMap,
    Extension(state): Extension<Arc<AppState>>,
) -> impl IntoResponse {
    if let Some(session_token) = extract_session_token(&headers) {
        if let Ok(Some(session)) = state.sessions().resolve(&session_token).await {
            info!("User {} has logged out", session.identity.login_name);
            let entry = AuditEntry {
                action: AuditAction::Logout,
                outcome: AuditOutcome::Succeeded,
                detail: session.identity.login_name,
                ip: extract_client_ip(&headers),
                at: Utc::now(),
            };
            if let Err(err) = state.audit().record(entry).await {
                error!("Failed to record audit entry: {err}");
            }
        }
        if let Err(err) = state.sessions().destroy(&session_token).await {
            error!("Failed to destroy session: {err}");
        }
    }

    // Always clear the cookie, even when no session was found.
    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(state.config().session_cookie_secure()) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (response_headers, Redirect::to("/admin/login")).into_response()
}

#[utoipa::path(
    get,
    path = "/admin/token",
    responses(
        (status = 200, description = "Minted token envelope", body = JsonResult)
    ),
    tag = "admin"
)]
pub async fn get_token() -> impl IntoResponse {
    Json(JsonResult::with_result(
        CODE_SUCCESS,
        ResponseStatus::Success.msg(),
        token::mint(),
    ))
}
