//! Bearer-token authentication.
//!
//! Tokens are HMAC-signed JWTs issued by the identity provider and verified
//! with the shared `JWT_SECRET`. `exp` and `nbf` are checked when present;
//! no claim is mandatory.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Role carried by tokens of backend services.
pub const SERVICE_ROLE: &str = "service_role";

/// Authentication and authorization failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingHeader,

    #[error("Invalid authorization header format")]
    InvalidFormat,

    /// Bad signature, malformed token or expired.
    #[error("Invalid token")]
    InvalidToken,

    /// Signature is fine but the payload does not fit [`Claims`].
    #[error("Invalid token claims")]
    InvalidClaims,

    #[error("Insufficient permissions")]
    Forbidden,
}

impl AuthError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "Authentication rejected");
        (self.status(), Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Claims the gateway reads from a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

/// The authenticated caller, attached to the request by [`require_auth`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthUser {
    pub sub: String,
    pub email: String,
    pub role: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { sub: claims.sub, email: claims.email, role: claims.role }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or(AuthError::MissingHeader)
    }
}

/// Verifies tokens against the shared secret.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Create a verifier for HMAC tokens signed with `secret`.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.required_spec_claims.clear();
        validation.validate_aud = false;

        Self { key: DecodingKey::from_secret(secret.as_bytes()), validation }
    }

    /// Verify a raw token and read its claims.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidToken`] when the token fails verification,
    /// [`AuthError::InvalidClaims`] when its payload cannot be read.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<serde_json::Value>(token, &self.key, &self.validation)
            .map_err(|err| {
                tracing::debug!(error = %err, "Token verification failed");
                AuthError::InvalidToken
            })?;

        serde_json::from_value(data.claims).map_err(|_| AuthError::InvalidClaims)
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier").field("algorithms", &self.validation.algorithms).finish()
    }
}

/// Middleware requiring a valid bearer token.
///
/// On success the caller is available to handlers as an [`AuthUser`] extension.
pub async fn require_auth(
    State(verifier): State<JwtVerifier>,
    header: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let TypedHeader(Authorization(bearer)) = header.map_err(|rejection| {
        if rejection.is_missing() { AuthError::MissingHeader } else { AuthError::InvalidFormat }
    })?;

    let user = AuthUser::from(verifier.verify(bearer.token())?);
    tracing::debug!(sub = %user.sub, role = %user.role, "Request authenticated");
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Role a route group requires, used as middleware state for [`require_role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredRole(pub &'static str);

/// Middleware requiring the authenticated caller to hold a role.
///
/// Must run after [`require_auth`].
pub async fn require_role(
    State(RequiredRole(role)): State<RequiredRole>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let allowed = request.extensions().get::<AuthUser>().is_some_and(|user| user.role == role);
    if !allowed {
        return Err(AuthError::Forbidden);
    }
    Ok(next.run(request).await)
}
