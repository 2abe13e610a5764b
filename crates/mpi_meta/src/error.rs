//! Error values and parse errors.
//!
//! Domain-level failures travel as Metas of kind `"Error"` carrying `message`
//! and `code` attributes. [`MetaError`] only covers JSON text that cannot be
//! parsed at all.

use crate::meta::{ERROR_KIND, Meta};

/// Error parsing JSON text into a Meta.
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    /// The text is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// HTTP-style status codes used in error Metas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpCode {
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 500
    InternalServer,
    /// 502
    BadGateway,
}

impl HttpCode {
    /// Numeric status code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::InternalServer => 500,
            Self::BadGateway => 502,
        }
    }

    /// Default message for this code.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not found",
            Self::InternalServer => "Internal server error",
            Self::BadGateway => "Bad gateway",
        }
    }

    /// An error Meta with this code and its default message.
    #[must_use]
    pub fn error(self) -> Meta {
        new_error(self.message(), Some(self.as_u16()))
    }
}

/// Creates an error Meta. The code is stored as a decimal string.
#[must_use]
pub fn new_error(message: impl Into<String>, code: Option<u16>) -> Meta {
    Meta::new(ERROR_KIND)
        .with_attr("message", message.into())
        .with_attr("code", code)
}

/// 400 error.
#[must_use]
pub fn bad_request(message: impl Into<String>) -> Meta {
    new_error(message, Some(HttpCode::BadRequest.as_u16()))
}

/// 401 error.
#[must_use]
pub fn unauthorized(message: impl Into<String>) -> Meta {
    new_error(message, Some(HttpCode::Unauthorized.as_u16()))
}

/// 403 error.
#[must_use]
pub fn forbidden(message: impl Into<String>) -> Meta {
    new_error(message, Some(HttpCode::Forbidden.as_u16()))
}

/// 404 error.
#[must_use]
pub fn not_found(message: impl Into<String>) -> Meta {
    new_error(message, Some(HttpCode::NotFound.as_u16()))
}

/// 500 error.
#[must_use]
pub fn server_error(message: impl Into<String>) -> Meta {
    new_error(message, Some(HttpCode::InternalServer.as_u16()))
}
