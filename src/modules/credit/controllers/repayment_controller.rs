use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::core::ApiResponse;
use crate::middleware::auth::AuthUser;
use crate::modules::credit::models::RepaymentBody;
use crate::modules::credit::services::CreditService;

/// POST /credit/requests/{id}/repayments
///
/// End-user endpoint: the actor comes from the token subject, and the
/// service treats a request owned by anyone else as not found.
pub async fn make_repayment(
    service: web::Data<Arc<CreditService>>,
    user: AuthUser,
    path: web::Path<String>,
    body: web::Json<RepaymentBody>,
) -> Result<HttpResponse, AppError> {
    let repayment = service
        .repay(&path.into_inner(), &user.user_id, body.amount)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(repayment, "Repayment recorded")))
}

/// Configure end-user repayment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/credit").route(
        "/requests/{id}/repayments",
        web::post().to(make_repayment),
    ));
}
