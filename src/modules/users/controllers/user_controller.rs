use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::core::{ApiResponse, PaginatedResponse};
use crate::middleware::auth::{AdminUser, AuthUser};
use crate::modules::users::models::{
    ChangePasswordRequest, UpdateProfileRequest, UpdateStatusRequest,
};
use crate::modules::users::repositories::UserListFilter;
use crate::modules::users::services::UserService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub role: Option<String>,
    pub status: Option<String>,
    pub email: Option<String>,
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

/// GET /users/profile — the caller's own profile
pub async fn get_profile(
    service: web::Data<Arc<UserService>>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let profile = service.get_profile(&user.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(profile)))
}

/// PUT /users/profile
pub async fn update_profile(
    service: web::Data<Arc<UserService>>,
    user: AuthUser,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let profile = service
        .update_profile(&user.user_id, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(profile, "Profile updated")))
}

/// PATCH /users/password
pub async fn change_password(
    service: web::Data<Arc<UserService>>,
    user: AuthUser,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    service
        .change_password(&user.user_id, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message((), "Password changed")))
}

/// GET /users — admin directory listing
pub async fn list_users(
    service: web::Data<Arc<UserService>>,
    _admin: AdminUser,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse, AppError> {
    let page = query.page.max(1);
    let limit = query.limit.clamp(1, 100);
    let descending = query.order != "asc";

    let filter = UserListFilter {
        role: query.role.clone(),
        status: query.status.clone(),
        email: query.email.clone(),
    };

    let (items, total) = service
        .list_users(filter, page, limit, &query.sort_by, descending)
        .await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse::new(items, page, limit, total)))
}

/// GET /users/{id}
pub async fn user_details(
    service: web::Data<Arc<UserService>>,
    _admin: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let detail = service.user_details(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(detail)))
}

/// PATCH /users/{id}/status
pub async fn update_status(
    service: web::Data<Arc<UserService>>,
    _admin: AdminUser,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let profile = service
        .update_status(&path.into_inner(), &body.status)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(profile, "Status updated")))
}

/// DELETE /users/{id} — soft delete
pub async fn delete_user(
    service: web::Data<Arc<UserService>>,
    _admin: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.soft_delete(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message((), "User deleted")))
}

/// Configure user routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/profile", web::get().to(get_profile))
            .route("/profile", web::put().to(update_profile))
            .route("/password", web::patch().to(change_password))
            .route("", web::get().to(list_users))
            .route("/{id}", web::get().to(user_details))
            .route("/{id}/status", web::patch().to(update_status))
            .route("/{id}", web::delete().to(delete_user)),
    );
}
