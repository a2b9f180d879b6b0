use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::core::{ApiResponse, PaginatedResponse};
use crate::middleware::auth::AdminUser;
use crate::modules::credit::models::RejectRequestBody;
use crate::modules::credit::services::CreditService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequestsQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub status: Option<String>,
    #[serde(default = "default_sort")]
    pub sort_by: String,
    #[serde(default = "default_order")]
    pub order: String,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

fn default_sort() -> String {
    "createdAt".to_string()
}

fn default_order() -> String {
    "desc".to_string()
}

/// GET /credit/requests
pub async fn list_requests(
    service: web::Data<Arc<CreditService>>,
    _admin: AdminUser,
    query: web::Query<ListRequestsQuery>,
) -> Result<HttpResponse, AppError> {
    let page = query.page.max(1);
    let limit = query.limit.clamp(1, 100);
    let descending = match query.order.as_str() {
        "asc" => false,
        "desc" => true,
        other => {
            return Err(AppError::validation(format!(
                "Invalid order '{other}', expected asc or desc"
            )))
        }
    };

    let (items, total) = service
        .list_requests(
            page,
            limit,
            query.status.as_deref(),
            &query.sort_by,
            descending,
        )
        .await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse::new(items, page, limit, total)))
}

/// GET /credit/requests/{id}
pub async fn request_details(
    service: web::Data<Arc<CreditService>>,
    _admin: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let detail = service.request_details(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(detail)))
}

/// PATCH /credit/requests/{id}/approve
pub async fn approve_request(
    service: web::Data<Arc<CreditService>>,
    admin: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let updated = service
        .approve(&path.into_inner(), &admin.0.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(updated, "Approved")))
}

/// PATCH /credit/requests/{id}/reject
pub async fn reject_request(
    service: web::Data<Arc<CreditService>>,
    admin: AdminUser,
    path: web::Path<String>,
    body: web::Json<RejectRequestBody>,
) -> Result<HttpResponse, AppError> {
    // Blank reasons never reach the service
    if body.reason.trim().is_empty() {
        return Err(AppError::validation("Rejection reason is required"));
    }

    let updated = service
        .reject(&path.into_inner(), &admin.0.user_id, &body.reason)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(updated, "Rejected")))
}

/// Configure admin credit routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/credit")
            .route("/requests", web::get().to(list_requests))
            .route("/requests/{id}", web::get().to(request_details))
            .route("/requests/{id}/approve", web::patch().to(approve_request))
            .route("/requests/{id}/reject", web::patch().to(reject_request)),
    );
}
