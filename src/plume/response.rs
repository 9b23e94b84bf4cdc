//! The JSON envelope shared by the admin and public listing surfaces.

use serde::Serialize;
use utoipa::ToSchema;

/// Envelope code for a successful admin operation.
pub const CODE_SUCCESS: i32 = 1;
/// Envelope code for a failed admin operation.
pub const CODE_FAIL: i32 = 0;

/// Status codes for the public listing API. Distinct codes for success,
/// empty, and not-found, carried inside the envelope rather than the HTTP
/// status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseStatus {
    Success,
    Empty,
    NotFound,
}

impl ResponseStatus {
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Success => 200,
            Self::Empty => 204,
            Self::NotFound => 404,
        }
    }

    #[must_use]
    pub const fn msg(self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Empty => "No available data",
            Self::NotFound => "Not found",
        }
    }
}

/// `{code, msg, result?}` — `result` is omitted entirely when there is no
/// payload.
#[derive(Serialize, Debug, ToSchema)]
pub struct JsonResult {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub result: Option<serde_json::Value>,
}

impl JsonResult {
    #[must_use]
    pub fn new(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            result: None,
        }
    }

    /// Envelope carrying a payload.
    #[must_use]
    pub fn with_result(code: i32, msg: impl Into<String>, result: impl Serialize) -> Self {
        Self {
            code,
            msg: msg.into(),
            result: serde_json::to_value(result).ok(),
        }
    }

    /// Payload-free envelope for a listing status.
    #[must_use]
    pub fn from_status(status: ResponseStatus) -> Self {
        Self::new(status.code(), status.msg())
    }
}
