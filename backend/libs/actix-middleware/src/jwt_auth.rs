//! Session token authentication
//!
//! Tokens are HS256 JWTs whose `sub` is the user's UUID. A
//! [`SessionVerifier`] is registered as `web::Data` and handlers take a
//! [`Principal`] argument; the extractor rejects the request with 401 when
//! the bearer token is missing, malformed or expired.

use actix_web::{
    dev::Payload, http::header, http::StatusCode, web, FromRequest, HttpMessage, HttpRequest,
    HttpResponse, ResponseError,
};
use chrono::{Duration, Utc};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Minimum HS256 secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

const DEFAULT_TTL_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("session secret too short: need at least 32 bytes")]
    WeakSecret,

    #[error("missing Authorization header")]
    MissingToken,

    #[error("Authorization must use Bearer scheme")]
    InvalidScheme,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("invalid token: malformed user id")]
    MalformedSubject,

    #[error("failed to issue token: {0}")]
    Issue(String),

    #[error("session verifier not configured")]
    NotConfigured,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::WeakSecret | AuthError::Issue(_) | AuthError::NotConfigured => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: usize,
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// The authenticated user for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
    pub email: Option<String>,
}

impl TryFrom<SessionClaims> for Principal {
    type Error = AuthError;

    fn try_from(claims: SessionClaims) -> Result<Self, Self::Error> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
            tracing::warn!("Invalid user_id UUID in token: {}", e);
            AuthError::MalformedSubject
        })?;

        Ok(Principal {
            user_id,
            username: claims.username,
            email: claims.email,
        })
    }
}

/// Issues and verifies HS256 session tokens.
#[derive(Clone)]
pub struct SessionVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: Option<String>,
    ttl: Duration,
}

impl fmt::Debug for SessionVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionVerifier")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionVerifier {
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::WeakSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            issuer: None,
            ttl: Duration::hours(DEFAULT_TTL_HOURS),
        })
    }

    /// Requires and stamps the `iss` claim.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();
        self.validation.set_issuer(&[issuer.as_str()]);
        self.issuer = Some(issuer);
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Mints a token for a user.
    pub fn issue(&self, user_id: Uuid, username: &str, email: Option<&str>) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            email: email.map(str::to_string),
            exp: (now + self.ttl).timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Issue(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("session token rejected: {}", e);
                AuthError::InvalidToken(e.to_string())
            })
    }

    pub fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        self.verify(token).and_then(Principal::try_from)
    }
}

/// Extracts the bearer token from the `Authorization` header.
pub fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidScheme)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidScheme)
}

fn authenticate_request(req: &HttpRequest) -> Result<Principal, AuthError> {
    if let Some(principal) = req.extensions().get::<Principal>() {
        return Ok(principal.clone());
    }

    let verifier = req.app_data::<web::Data<SessionVerifier>>().ok_or_else(|| {
        tracing::error!("SessionVerifier missing from app data");
        AuthError::NotConfigured
    })?;

    let principal = verifier.authenticate(bearer_token(req)?)?;
    req.extensions_mut().insert(principal.clone());
    Ok(principal)
}

impl FromRequest for Principal {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate_request(req).map_err(actix_web::Error::from))
    }
}
