use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::core::PaginatedResponse;
use crate::middleware::auth::AuthUser;
use crate::modules::notifications::services::NotificationService;

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

/// GET /notifications — the caller's in-app feed, newest first
pub async fn list_notifications(
    service: web::Data<Arc<NotificationService>>,
    user: AuthUser,
    query: web::Query<ListNotificationsQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = query.limit.clamp(1, 100);
    let page = query.page.max(1);

    let (items, total) = service.list_for_user(&user.user_id, page, limit).await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse::new(items, page, limit, total)))
}

/// Configure notification routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/notifications").route("", web::get().to(list_notifications)));
}
