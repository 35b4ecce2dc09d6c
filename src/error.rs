use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::dtos::ErrorResponse;

/// 服务层错误 -- 将驱动错误归类，不向上层泄露驱动细节
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("user not found")]
    NotFound,

    #[error("database connection error: {0}")]
    Connectivity(String),

    #[error("{0}")]
    Unknown(String),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ServiceError::NotFound,
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_) => ServiceError::Connectivity(err.to_string()),
            other => ServiceError::Unknown(other.to_string()),
        }
    }
}

// -- 常用的错误前缀
#[derive(Debug, PartialEq, Eq)]
pub enum ErrorMessage {
    BadRequest,
    ServerError,
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorMessage::BadRequest => "bad request",
            ErrorMessage::ServerError => "internal server error",
        })
    }
}

/// HTTP 错误 -- 状态码加错误信息，响应体为 `{"error": message}`
#[derive(Debug, Clone)]
pub struct HttpError {
    pub message: String,
    pub status: StatusCode,
}

impl HttpError {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        HttpError {
            message: message.into(),
            status,
        }
    }

    // -- 400，信息以 "bad request: " 开头
    pub fn bad_request(detail: impl fmt::Display) -> Self {
        HttpError::new(
            format!("{}: {}", ErrorMessage::BadRequest, detail),
            StatusCode::BAD_REQUEST,
        )
    }

    // -- 500，信息以 "internal server error: " 开头
    pub fn server_error(detail: impl fmt::Display) -> Self {
        HttpError::new(
            format!("{}: {}", ErrorMessage::ServerError, detail),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    }

    pub fn into_http_response(self) -> Response {
        let json_response = Json(ErrorResponse {
            error: self.message,
        });

        (self.status, json_response).into_response()
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HttpError: message: {}, status: {}", self.message, self.status)
    }
}

impl std::error::Error for HttpError {}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

// -- 服务层的所有错误在 HTTP 层统一映射为 500
impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        HttpError::server_error(err)
    }
}
