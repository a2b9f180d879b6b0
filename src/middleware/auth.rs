use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::core::AppError;
use crate::modules::auth::models::Claims;
use crate::modules::auth::services::token_service;

/// Paths under the API scope that must stay reachable without a token
const PUBLIC_PATHS: &[&str] = &["/api/admin/auth/login", "/api/admin/auth/refresh"];

/// Authenticated caller, extracted from the verified bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub role: String,
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<AuthUser>().cloned();
        ready(user.ok_or_else(|| Error::from(AppError::unauthorized("Authentication required"))))
    }
}

/// Authenticated caller that must hold the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let result = match AuthUser::from_request(req, payload).into_inner() {
            Ok(user) if user.role == "admin" => Ok(AdminUser(user)),
            Ok(_) => Err(Error::from(AppError::unauthorized("Admin role required"))),
            Err(e) => Err(e),
        };
        ready(result)
    }
}

/// Bearer-token authentication middleware for the API scope
pub struct JwtAuth {
    secret: String,
}

impl JwtAuth {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
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
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            secret: self.secret.clone(),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    secret: String,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let secret = self.secret.clone();

        Box::pin(async move {
            let path = req.path();
            if PUBLIC_PATHS.contains(&path) {
                return svc.call(req).await;
            }

            let claims = authenticate(&req, &secret).map_err(Error::from)?;

            req.extensions_mut().insert(AuthUser {
                user_id: claims.sub.clone(),
                role: claims.role.clone(),
            });
            req.extensions_mut().insert(claims);

            svc.call(req).await
        })
    }
}

fn authenticate(req: &ServiceRequest, secret: &str) -> crate::core::Result<Claims> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("Expected a bearer token"))?;

    token_service::verify_access_token(token, secret)
}
