use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, header};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{AuthError, Error, Realm};

pub(crate) const ADMIN_AUTHORIZATION: HeaderName = HeaderName::from_static("admin-authorization");

const ADMIN_ROLE: &str = "admin";

/// Claims written into user tokens. The subject travels under `userId`.
#[derive(Deserialize, Serialize, Debug)]
pub(crate) struct UserClaims {
    #[serde(rename = "userId")]
    pub(crate) user_id: i32,
    pub(crate) email: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
}

/// What user tokens may contain on the way in. Older tokens carry the
/// subject under `id` or `subjectId` instead of `userId`.
#[derive(Deserialize, Debug)]
struct IncomingUserClaims {
    #[serde(rename = "subjectId")]
    subject_id: Option<i32>,
    #[serde(rename = "userId")]
    user_id: Option<i32>,
    id: Option<i32>,
    email: Option<String>,
    iat: Option<i64>,
    exp: i64,
}

/// Identity attached to requests that passed [`require_user`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserIdentity {
    pub(crate) id: i32,
    pub(crate) email: Option<String>,
    pub(crate) issued_at: Option<i64>,
    pub(crate) expires_at: i64,
}

/// Admin token claims, attached to requests that passed [`require_admin`].
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AdminClaims {
    pub(crate) is_admin: bool,
    pub(crate) username: String,
    pub(crate) role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) iat: Option<i64>,
    pub(crate) exp: i64,
}

/// What admin-signed tokens may contain on the way in. Only `exp` has to be
/// well-formed; every other claim is checked after the signature.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct IncomingAdminClaims {
    #[serde(default)]
    is_admin: Value,
    #[serde(default)]
    username: Value,
    #[serde(default)]
    role: Value,
    #[serde(default)]
    iat: Value,
    exp: i64,
}

impl IncomingAdminClaims {
    fn username(&self) -> &str {
        self.username.as_str().unwrap_or_default()
    }

    /// Privilege needs the boolean `isAdmin` flag and the admin role together.
    fn into_privileged(self) -> Option<AdminClaims> {
        let privileged =
            self.is_admin == Value::Bool(true) && self.role.as_str() == Some(ADMIN_ROLE);

        privileged.then(|| AdminClaims {
            is_admin: true,
            username: self.username().to_string(),
            role: Some(ADMIN_ROLE.to_string()),
            iat: self.iat.as_i64(),
            exp: self.exp,
        })
    }
}

#[derive(Clone)]
pub(crate) struct TokenIssuer {
    user_key: EncodingKey,
    admin_key: EncodingKey,
    user_ttl: Duration,
    admin_ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("user_ttl", &self.user_ttl)
            .field("admin_ttl", &self.admin_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub(crate) fn new(user_secret: &str, admin_secret: &str) -> Self {
        Self {
            user_key: EncodingKey::from_secret(user_secret.as_bytes()),
            admin_key: EncodingKey::from_secret(admin_secret.as_bytes()),
            user_ttl: Duration::days(7),
            admin_ttl: Duration::hours(24),
        }
    }

    pub(crate) fn issue_user_token(&self, subject_id: i32, email: &str) -> Result<String, Error> {
        self.issue_user_token_at(subject_id, email, Utc::now())
    }

    pub(crate) fn issue_user_token_at(
        &self,
        subject_id: i32,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, Error> {
        let claims = UserClaims {
            user_id: subject_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.user_ttl).timestamp(),
        };

        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.user_key,
        )?)
    }

    pub(crate) fn issue_admin_token(&self, username: &str) -> Result<String, Error> {
        self.issue_admin_token_at(username, Utc::now())
    }

    pub(crate) fn issue_admin_token_at(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<String, Error> {
        let claims = AdminClaims {
            is_admin: true,
            username: username.to_string(),
            role: Some(ADMIN_ROLE.to_string()),
            iat: Some(now.timestamp()),
            exp: (now + self.admin_ttl).timestamp(),
        };

        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.admin_key,
        )?)
    }
}

#[derive(Clone)]
pub(crate) struct TokenVerifier {
    user_key: DecodingKey,
    admin_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub(crate) fn new(user_secret: &str, admin_secret: &str) -> Self {
        // Expiry is checked against an injected clock in `expired`, not by
        // the library, so the boundary is exact and testable.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            user_key: DecodingKey::from_secret(user_secret.as_bytes()),
            admin_key: DecodingKey::from_secret(admin_secret.as_bytes()),
            validation,
        }
    }

    pub(crate) fn verify_user(&self, headers: &HeaderMap) -> Result<UserIdentity, AuthError> {
        self.verify_user_at(headers, Utc::now())
    }

    pub(crate) fn verify_user_at(
        &self,
        headers: &HeaderMap,
        now: DateTime<Utc>,
    ) -> Result<UserIdentity, AuthError> {
        let invalid = AuthError::TokenInvalid(Realm::User);

        let token = bearer_token(headers, &[header::AUTHORIZATION], Realm::User)?;

        let claims = jsonwebtoken::decode::<IncomingUserClaims>(token, &self.user_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("Rejected user token: {}", e);
                invalid
            })?
            .claims;

        if expired(claims.exp, now) {
            tracing::debug!("Rejected user token: expired");
            return Err(invalid);
        }

        let id = claims
            .subject_id
            .or(claims.user_id)
            .or(claims.id)
            .ok_or_else(|| {
                tracing::debug!("Rejected user token: no subject");
                invalid
            })?;

        Ok(UserIdentity {
            id,
            email: claims.email,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }

    pub(crate) fn verify_admin(&self, headers: &HeaderMap) -> Result<AdminClaims, AuthError> {
        self.verify_admin_at(headers, Utc::now())
    }

    pub(crate) fn verify_admin_at(
        &self,
        headers: &HeaderMap,
        now: DateTime<Utc>,
    ) -> Result<AdminClaims, AuthError> {
        let invalid = AuthError::TokenInvalid(Realm::Admin);

        let token = bearer_token(
            headers,
            &[header::AUTHORIZATION, ADMIN_AUTHORIZATION],
            Realm::Admin,
        )?;

        let claims = jsonwebtoken::decode::<IncomingAdminClaims>(token, &self.admin_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("Rejected admin token: {}", e);
                invalid
            })?
            .claims;

        if expired(claims.exp, now) {
            tracing::debug!("Rejected admin token: expired");
            return Err(invalid);
        }

        let username = claims.username().to_string();

        claims.into_privileged().ok_or_else(|| {
            tracing::debug!(username = %username, "Admin token lacks privileges");
            AuthError::InsufficientPrivilege
        })
    }
}

fn expired(exp: i64, now: DateTime<Utc>) -> bool {
    now.timestamp() >= exp
}

/// Returns the first non-empty token among `sources`, in order. The `Bearer `
/// prefix is optional.
fn bearer_token<'a>(
    headers: &'a HeaderMap,
    sources: &[HeaderName],
    realm: Realm,
) -> Result<&'a str, AuthError> {
    for source in sources {
        let Some(value) = headers.get(source) else {
            continue;
        };

        let value = value
            .to_str()
            .map_err(|_| AuthError::TokenInvalid(realm))?;

        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();

        if !token.is_empty() {
            return Ok(token);
        }
    }

    Err(AuthError::TokenMissing)
}

pub(crate) async fn require_user(
    State(verifier): State<TokenVerifier>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    let identity = verifier.verify_user(request.headers())?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

pub(crate) async fn require_admin(
    State(verifier): State<TokenVerifier>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    let admin = verifier.verify_admin(request.headers())?;

    request.extensions_mut().insert(admin);

    Ok(next.run(request).await)
}
