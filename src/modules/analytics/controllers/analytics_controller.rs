use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::core::ApiResponse;
use crate::middleware::auth::AdminUser;
use crate::modules::analytics::services::AnalyticsService;

/// GET /analytics/overview
pub async fn overview(
    service: web::Data<Arc<AnalyticsService>>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let overview = service.overview().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(overview)))
}

/// Configure analytics routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/analytics").route("/overview", web::get().to(overview)));
}
