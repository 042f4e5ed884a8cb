use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::http::header::InvalidHeaderValue;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database migration error: {0}")]
    DatabaseMigration(#[from] sqlx::migrate::MigrateError),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("Invalid CORS origin: {0}")]
    Origin(#[from] InvalidHeaderValue),
    #[error("Missing secret: {0} must not be empty")]
    MissingSecret(&'static str),
    #[error("jwt_secret and jwt_admin_secret must differ")]
    SharedSecret,
}

/// Which guard rejected a token. Only changes the wording of the rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Realm {
    User,
    Admin,
}

impl Realm {
    fn invalid_token(&self) -> &'static str {
        match self {
            Realm::User => "invalid token",
            Realm::Admin => "invalid admin token",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub(crate) enum AuthError {
    #[error("Unauthorized: token missing")]
    TokenMissing,
    #[error("Unauthorized: {}", .0.invalid_token())]
    TokenInvalid(Realm),
    #[error("Forbidden: insufficient privileges")]
    InsufficientPrivilege,
}

impl AuthError {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            AuthError::TokenMissing | AuthError::TokenInvalid(_) => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPrivilege => StatusCode::FORBIDDEN,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Invalid admin credentials")]
    InvalidAdminCredentials,
    #[error("{0}")]
    Validation(String),
    #[error("Invalid request body: {}", .0.body_text())]
    Body(#[from] JsonRejection),
    #[error("User with this email already exists")]
    UserAlreadyExists,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Error::Sql(_) | Error::Jwt(_) | Error::Bcrypt(_) | Error::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::Auth(e) => e.status(),
            Error::InvalidCredentials | Error::InvalidAdminCredentials => StatusCode::UNAUTHORIZED,
            Error::Validation(_) | Error::Body(_) => StatusCode::BAD_REQUEST,
            Error::UserAlreadyExists | Error::Conflict(_) => StatusCode::CONFLICT,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            tracing::error!("{:?}", self);
            "Internal server error".to_string()
        } else {
            tracing::debug!("{:?}", self);
            self.to_string()
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_distinct_statuses() {
        assert_eq!(AuthError::TokenMissing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::TokenInvalid(Realm::Admin).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InsufficientPrivilege.status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn invalid_token_wording_follows_realm() {
        assert_eq!(
            AuthError::TokenInvalid(Realm::User).to_string(),
            "Unauthorized: invalid token"
        );
        assert_eq!(
            AuthError::TokenInvalid(Realm::Admin).to_string(),
            "Unauthorized: invalid admin token"
        );
    }

    #[test]
    fn server_errors_hide_details() {
        let response = Error::Sql(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = Error::UserAlreadyExists.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
