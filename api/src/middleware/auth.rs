//! JWT authentication middleware for protecting API endpoints.
//!
//! Extracts the access token from the `Authorization: Bearer` header or,
//! when cookie storage is enabled, from the access-token cookie, verifies
//! it through the core token service and injects an [`AuthContext`] into
//! the request. Missing or invalid tokens are rejected with 401 before the
//! handler runs.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use sgms_core::domain::entities::token::{Claims, TokenKind};
use sgms_core::domain::entities::user::UserRole;
use sgms_core::errors::{DomainError, TokenError};
use sgms_core::services::token::TokenService;

use crate::error::ApiError;

/// User authentication context injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID extracted from JWT claims
    pub user_id: Uuid,
    /// Email carried in the claims
    pub email: String,
    /// Role carried in the claims
    pub role: UserRole,
    /// JWT ID for tracing
    pub jti: String,
}

impl AuthContext {
    /// Creates an authentication context from verified claims
    pub fn from_claims(claims: Claims) -> Result<Self, DomainError> {
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidClaims))?;
        Ok(Self {
            user_id,
            email: claims.email,
            role: claims.role,
            jti: claims.jti,
        })
    }
}

/// JWT authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    token_service: Arc<TokenService>,
    /// Access-token cookie consulted when the header is absent
    access_cookie_name: Option<String>,
}

impl JwtAuth {
    /// Creates a new JWT authentication middleware
    pub fn new(token_service: Arc<TokenService>) -> Self {
        Self {
            token_service,
            access_cookie_name: None,
        }
    }

    /// Also accept the access token from the named cookie
    pub fn with_cookie(mut self, cookie_name: impl Into<String>) -> Self {
        self.access_cookie_name = Some(cookie_name.into());
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            token_service: Arc::clone(&self.token_service),
            access_cookie_name: self.access_cookie_name.clone(),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    token_service: Arc<TokenService>,
    access_cookie_name: Option<String>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let token_service = Arc::clone(&self.token_service);
        let cookie_name = self.access_cookie_name.clone();

        Box::pin(async move {
            let token = extract_bearer_token(&req)
                .or_else(|| extract_cookie_token(&req, cookie_name.as_deref()));

            let Some(token) = token else {
                return Err(ApiError(DomainError::Token(TokenError::MalformedToken)).into());
            };

            let auth_context = token_service
                .verify(&token, TokenKind::Access)
                .and_then(AuthContext::from_claims)
                .map_err(ApiError)?;

            req.extensions_mut().insert(auth_context);
            service.call(req).await
        })
    }
}

/// Extracts a Bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Extracts the access token from its cookie, when configured
fn extract_cookie_token(req: &ServiceRequest, cookie_name: Option<&str>) -> Option<String> {
    let name = cookie_name?;
    req.request().cookie(name).map(|c| c.value().to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError(DomainError::Token(TokenError::MalformedToken)).into());

        ready(result)
    }
}
