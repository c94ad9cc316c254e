//! Identity middleware and request-scoped user context.
//!
//! Every request behind [`require_identity`] must carry a non-empty identity
//! claim in the configured header. The claim is resolved to an internal user
//! identifier through [`UserService::resolve_or_create`] and the identifier is
//! attached to the request extensions as a [`UserContext`] before the request
//! is forwarded.
//!
//! | Outcome | Response |
//! |---------|----------|
//! | header missing or empty | `400 {"reason": "identity header is empty"}` |
//! | header bytes not UTF-8 | `400 {"reason": "identity header is not valid UTF-8"}` |
//! | resolution failed | `500 {"reason": "<store error message>"}` |
//! | resolved | forwarded unchanged |
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware, routing::get};
//! use crate::middleware::identity::{CurrentUser, IdentityGate, require_identity};
//!
//! async fn whoami(CurrentUser(user_id): CurrentUser) -> String {
//!     user_id.to_string()
//! }
//!
//! let gate = IdentityGate::new("Columbus-User-ID", user_service)?;
//! let app = Router::new()
//!     .route("/whoami", get(whoami))
//!     .route_layer(middleware::from_fn_with_state(gate, require_identity));
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        Extensions, HeaderMap, HeaderName, StatusCode,
        header::InvalidHeaderName,
        request::Parts,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use columbus_config::IdentityConfig;
use columbus_core::AppError;
use columbus_models::UserId;
use tracing::{error, warn};

use crate::metrics::track_identity_rejection;
use crate::modules::users::{UserError, UserService};

/// Rejections produced by the identity middleware.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The client did not send a usable identity claim.
    #[error("identity header is empty")]
    EmptyIdentity,

    /// The claim is present but its bytes do not decode as UTF-8.
    #[error("identity header is not valid UTF-8")]
    MalformedIdentity,

    /// The user store failed while resolving the claim.
    #[error(transparent)]
    Backend(#[from] UserError),
}

impl IdentityError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyIdentity | Self::MalformedIdentity => StatusCode::BAD_REQUEST,
            Self::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        AppError::new(self.status(), self).into_response()
    }
}

/// Resolved identity of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: UserId,
}

/// Returns the user resolved for this request, or `None` when the request
/// did not pass through [`require_identity`].
pub fn user_id_from_extensions(extensions: &Extensions) -> Option<&UserId> {
    extensions.get::<UserContext>().map(|ctx| &ctx.user_id)
}

/// Header name and user service, fixed when the router is built.
#[derive(Clone, Debug)]
pub struct IdentityGate {
    header: HeaderName,
    users: UserService,
}

impl IdentityGate {
    pub fn new(header_key: &str, users: UserService) -> Result<Self, InvalidHeaderName> {
        Ok(Self {
            header: HeaderName::try_from(header_key)?,
            users,
        })
    }

    pub fn from_config(
        config: &IdentityConfig,
        users: UserService,
    ) -> Result<Self, InvalidHeaderName> {
        Self::new(&config.header_key, users)
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.header
    }

    /// Reads the identity claim as UTF-8. The value is not trimmed.
    pub fn claim<'a>(&self, headers: &'a HeaderMap) -> Result<&'a str, IdentityError> {
        let value = match headers.get(&self.header) {
            Some(value) if !value.is_empty() => value,
            _ => return Err(IdentityError::EmptyIdentity),
        };

        std::str::from_utf8(value.as_bytes()).map_err(|_| IdentityError::MalformedIdentity)
    }

    /// Extracts the claim and resolves it to a user identifier.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<UserId, IdentityError> {
        let claim = match self.claim(headers) {
            Ok(claim) => claim,
            Err(err) => {
                let kind = match &err {
                    IdentityError::MalformedIdentity => "malformed_header",
                    _ => "empty_header",
                };
                warn!(header = %self.header, kind, "Rejected request without usable identity claim");
                track_identity_rejection(kind);
                return Err(err);
            }
        };

        self.users.resolve_or_create(claim).await.map_err(|err| {
            error!(error = %err, "Identity resolution failed");
            track_identity_rejection("backend");
            IdentityError::Backend(err)
        })
    }
}

/// Middleware gating a router behind identity resolution.
///
/// Use with `axum::middleware::from_fn_with_state(gate, require_identity)`.
pub async fn require_identity(
    State(gate): State<IdentityGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, IdentityError> {
    let user_id = gate.resolve(req.headers()).await?;

    req.extensions_mut().insert(UserContext { user_id });
    Ok(next.run(req).await)
}

/// Extractor for the user resolved by [`require_identity`].
///
/// Rejects with 500 when the route is not behind the middleware, since that
/// is a wiring mistake rather than a client error.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_id_from_extensions(&parts.extensions)
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::internal(anyhow::anyhow!("user context is missing")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::InMemoryUserRepository;
    use axum::http::HeaderValue;
    use std::sync::Arc;

    fn gate() -> IdentityGate {
        let config = IdentityConfig::default();
        let users = UserService::new(Arc::new(InMemoryUserRepository::new()), &config);
        IdentityGate::from_config(&config, users).unwrap()
    }

    fn headers_with(value: HeaderValue) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_bytes(b"Columbus-User-ID").unwrap(), value);
        headers
    }

    #[test]
    fn test_new_rejects_invalid_header_names() {
        let users = UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            &IdentityConfig::default(),
        );

        assert!(IdentityGate::new("", users.clone()).is_err());
        assert!(IdentityGate::new("not a header", users.clone()).is_err());
        assert!(IdentityGate::new("X-Auth-Email", users).is_ok());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let gate = gate();
        assert_eq!(gate.header_name().as_str(), "columbus-user-id");

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(b"COLUMBUS-USER-ID").unwrap(),
            HeaderValue::from_static("user@example.com"),
        );
        assert_eq!(gate.claim(&headers).unwrap(), "user@example.com");
    }

    #[test]
    fn test_claim_missing_or_empty() {
        let gate = gate();

        assert!(matches!(
            gate.claim(&HeaderMap::new()),
            Err(IdentityError::EmptyIdentity)
        ));
        assert!(matches!(
            gate.claim(&headers_with(HeaderValue::from_static(""))),
            Err(IdentityError::EmptyIdentity)
        ));
    }

    #[test]
    fn test_claim_accepts_utf8() {
        let gate = gate();
        let value = HeaderValue::from_bytes("josé@example.com".as_bytes()).unwrap();

        assert_eq!(gate.claim(&headers_with(value)).unwrap(), "josé@example.com");
    }

    #[test]
    fn test_claim_invalid_utf8_is_malformed() {
        let gate = gate();
        let value = HeaderValue::from_bytes(b"caf\xe9@example.com").unwrap();

        let err = gate.claim(&headers_with(value)).unwrap_err();
        assert!(matches!(err, IdentityError::MalformedIdentity));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "identity header is not valid UTF-8");
    }

    #[tokio::test]
    async fn test_resolve_utf8_claim_creates_user() {
        let config = IdentityConfig::default();
        let repo = Arc::new(InMemoryUserRepository::new());
        let users = UserService::new(repo.clone(), &config);
        let gate = IdentityGate::from_config(&config, users).unwrap();
        let value = HeaderValue::from_bytes("josé@example.com".as_bytes()).unwrap();

        let user_id = gate.resolve(&headers_with(value)).await.unwrap();

        let user = repo.find_by_email("josé@example.com").await.unwrap();
        assert_eq!(user.id, user_id);
    }

    #[test]
    fn test_claim_is_not_trimmed() {
        let gate = gate();
        let headers = headers_with(HeaderValue::from_static(" user@example.com"));
        assert_eq!(gate.claim(&headers).unwrap(), " user@example.com");
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(IdentityError::EmptyIdentity.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            IdentityError::Backend(UserError::Duplicate).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            IdentityError::Backend(anyhow::anyhow!("some error").into()).to_string(),
            "some error"
        );
    }

    #[test]
    fn test_accessor_without_context() {
        assert!(user_id_from_extensions(&Extensions::new()).is_none());

        let mut extensions = Extensions::new();
        extensions.insert(UserContext {
            user_id: UserId::from("user-id"),
        });
        assert_eq!(
            user_id_from_extensions(&extensions),
            Some(&UserId::from("user-id"))
        );
    }

    #[tokio::test]
    async fn test_resolve_assigns_stable_id() {
        let gate = gate();
        let headers = headers_with(HeaderValue::from_static("user@example.com"));

        let first = gate.resolve(&headers).await.unwrap();
        let second = gate.resolve(&headers).await.unwrap();
        assert_eq!(first, second);
    }
}
