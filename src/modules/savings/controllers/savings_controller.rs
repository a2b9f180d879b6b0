use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::core::ApiResponse;
use crate::middleware::auth::AdminUser;
use crate::modules::savings::services::SavingsService;

/// GET /savings/analytics
pub async fn analytics(
    service: web::Data<Arc<SavingsService>>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let stats = service.analytics().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}

/// Configure savings routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/savings").route("/analytics", web::get().to(analytics)));
}
