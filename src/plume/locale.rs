//! Locale selection and the message catalog for the admin surface.
//!
//! The lockout guard emits locale-free message keys with typed arguments;
//! everything user-readable is resolved here, at the boundary.

use axum::{
    body::Body,
    extract::Extension,
    http::Request,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::state::AppState;

/// Supported display locales. The blog ships with a Chinese default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "zh_CN")]
    ZhCn,
    #[serde(rename = "en_US")]
    EnUs,
}

impl Locale {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ZhCn => "zh_CN",
            Self::EnUs => "en_US",
        }
    }

    /// Parse a configuration value such as `zh_CN`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "zh_CN" => Some(Self::ZhCn),
            "en_US" => Some(Self::EnUs),
            _ => None,
        }
    }
}

/// Locale-independent message codes plus their typed arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKey {
    LoginSuccess,
    LoginFailed { attempts_left: u32 },
    LoginDisabled,
    AccountMissing,
}

/// Resolve a message key against the catalog for the given locale.
#[must_use]
pub fn resolve(locale: Locale, key: MessageKey) -> String {
    match (locale, key) {
        (Locale::ZhCn, MessageKey::LoginSuccess) => "登录成功".to_string(),
        (Locale::ZhCn, MessageKey::LoginFailed { attempts_left }) => {
            format!("用户名或者密码错误，您还有{attempts_left}次机会")
        }
        (Locale::ZhCn, MessageKey::LoginDisabled) => "账号已被禁用，请10分钟后再试".to_string(),
        (Locale::ZhCn, MessageKey::AccountMissing) => "该用户不存在".to_string(),
        (Locale::EnUs, MessageKey::LoginSuccess) => "Login successful".to_string(),
        (Locale::EnUs, MessageKey::LoginFailed { attempts_left }) => {
            format!("Invalid username or password, {attempts_left} attempts remaining")
        }
        (Locale::EnUs, MessageKey::LoginDisabled) => {
            "The account has been disabled, try again in 10 minutes".to_string()
        }
        (Locale::EnUs, MessageKey::AccountMissing) => "The user does not exist".to_string(),
    }
}

/// Stamp the configured locale onto the request, so handlers resolve messages
/// without reaching back into configuration.
pub async fn select_locale(
    Extension(state): Extension<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(state.config().locale());
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_supported_locales() {
        assert_eq!(Locale::parse("zh_CN"), Some(Locale::ZhCn));
        assert_eq!(Locale::parse("en_US"), Some(Locale::EnUs));
        assert_eq!(Locale::parse("fr_FR"), None);
    }

    #[test]
    fn default_locale_is_chinese() {
        assert_eq!(Locale::default(), Locale::ZhCn);
        assert_eq!(Locale::default().as_str(), "zh_CN");
    }

    #[test]
    fn failed_login_message_carries_attempts_left() {
        let message = resolve(Locale::EnUs, MessageKey::LoginFailed { attempts_left: 3 });
        assert!(message.contains('3'));

        let message = resolve(Locale::ZhCn, MessageKey::LoginFailed { attempts_left: 0 });
        assert!(message.contains('0'));
    }

    #[test]
    fn every_key_resolves_in_both_locales() {
        let keys = [
            MessageKey::LoginSuccess,
            MessageKey::LoginFailed { attempts_left: 1 },
            MessageKey::LoginDisabled,
            MessageKey::AccountMissing,
        ];
        for locale in [Locale::ZhCn, Locale::EnUs] {
            for key in keys {
                assert!(!resolve(locale, key).is_empty());
            }
        }
    }
}
