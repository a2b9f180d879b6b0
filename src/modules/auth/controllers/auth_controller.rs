use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};

use crate::core::error::AppError;
use crate::core::ApiResponse;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::models::{LoginRequest, RefreshRequest, SessionContext};
use crate::modules::auth::services::AuthService;

/// POST /auth/login
pub async fn login(
    service: web::Data<Arc<AuthService>>,
    req: HttpRequest,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    if !body.email.contains('@') {
        return Err(AppError::validation("Invalid email"));
    }
    if body.password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }

    let session = service
        .login(&body.email, &body.password, session_context(&req))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(session, "Login successful")))
}

/// POST /auth/refresh
pub async fn refresh(
    service: web::Data<Arc<AuthService>>,
    req: HttpRequest,
    body: web::Json<RefreshRequest>,
) -> Result<HttpResponse, AppError> {
    if body.refresh_token.is_empty() {
        return Err(AppError::validation("Refresh token is required"));
    }

    let session = service
        .refresh(&body.refresh_token, session_context(&req))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        session,
        "Token refreshed successfully",
    )))
}

/// POST /auth/logout
pub async fn logout(
    service: web::Data<Arc<AuthService>>,
    _user: AuthUser,
    body: web::Json<RefreshRequest>,
) -> Result<HttpResponse, AppError> {
    if body.refresh_token.is_empty() {
        return Err(AppError::validation("Refresh token is required"));
    }

    service.logout(&body.refresh_token).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message((), "Logged out successfully")))
}

/// Device info and client address captured on each session open
fn session_context(req: &HttpRequest) -> SessionContext {
    let device_info = req
        .headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    // First hop of X-Forwarded-For, falling back to the peer address
    let ip_address = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()));

    SessionContext {
        device_info,
        ip_address,
    }
}

/// Configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh))
            .route("/logout", web::post().to(logout)),
    );
}
