use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sacco_admin::config::Config;
use sacco_admin::middleware::{JwtAuth, RequestId};
use sacco_admin::modules::analytics::controllers::analytics_controller;
use sacco_admin::modules::analytics::services::AnalyticsService;
use sacco_admin::modules::auth::controllers::auth_controller;
use sacco_admin::modules::auth::repositories::{MySqlTokenRepository, TokenRepository};
use sacco_admin::modules::auth::services::AuthService;
use sacco_admin::modules::credit::controllers::{credit_controller, repayment_controller};
use sacco_admin::modules::credit::repositories::{CreditRepository, MySqlCreditRepository};
use sacco_admin::modules::credit::services::CreditService;
use sacco_admin::modules::notifications::controllers::notification_controller;
use sacco_admin::modules::notifications::repositories::{
    MySqlNotificationRepository, NotificationRepository,
};
use sacco_admin::modules::notifications::services::{
    InAppSender, NotificationService, OutboxWorker,
};
use sacco_admin::modules::savings::controllers::savings_controller;
use sacco_admin::modules::savings::repositories::{MySqlSavingsRepository, SavingsRepository};
use sacco_admin::modules::savings::services::SavingsService;
use sacco_admin::modules::users::controllers::user_controller;
use sacco_admin::modules::users::repositories::{MySqlUserRepository, UserRepository};
use sacco_admin::modules::users::services::UserService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sacco_admin=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting SACCO Admin API");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool and apply migrations
    let db_pool = config
        .database
        .create_pool()
        .await
        .expect("Failed to create database pool");

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    // Repositories
    let user_repo: Arc<dyn UserRepository> = Arc::new(MySqlUserRepository::new(db_pool.clone()));
    let token_repo: Arc<dyn TokenRepository> = Arc::new(MySqlTokenRepository::new(db_pool.clone()));
    let credit_repo: Arc<dyn CreditRepository> =
        Arc::new(MySqlCreditRepository::new(db_pool.clone()));
    let savings_repo: Arc<dyn SavingsRepository> =
        Arc::new(MySqlSavingsRepository::new(db_pool.clone()));
    let notification_repo: Arc<dyn NotificationRepository> =
        Arc::new(MySqlNotificationRepository::new(db_pool.clone()));

    // Services
    let auth_service = Arc::new(AuthService::new(
        user_repo.clone(),
        token_repo.clone(),
        config.jwt.clone(),
    ));
    let user_service = Arc::new(UserService::new(
        user_repo.clone(),
        credit_repo.clone(),
        token_repo.clone(),
        notification_repo.clone(),
    ));
    let credit_service = Arc::new(CreditService::new(
        credit_repo.clone(),
        notification_repo.clone(),
    ));
    let savings_service = Arc::new(SavingsService::new(savings_repo.clone()));
    let analytics_service = Arc::new(AnalyticsService::new(
        user_repo.clone(),
        credit_repo.clone(),
        savings_repo.clone(),
        token_repo.clone(),
    ));
    let notification_service = Arc::new(NotificationService::new(notification_repo.clone()));

    // Notification delivery runs independently of request handling
    let worker = OutboxWorker::new(
        notification_repo.clone(),
        Arc::new(InAppSender),
        config.outbox.clone(),
    );
    tokio::spawn(worker.run());

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let jwt_secret = config.jwt.secret.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestId)
            .wrap(Cors::permissive())
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(credit_service.clone()))
            .app_data(web::Data::new(savings_service.clone()))
            .app_data(web::Data::new(analytics_service.clone()))
            .app_data(web::Data::new(notification_service.clone()))
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .wrap(JwtAuth::new(jwt_secret.clone()))
                    .service(
                        web::scope("/admin")
                            .configure(auth_controller::configure)
                            .configure(user_controller::configure)
                            .configure(credit_controller::configure)
                            .configure(savings_controller::configure)
                            .configure(analytics_controller::configure)
                            .configure(notification_controller::configure),
                    )
                    .configure(repayment_controller::configure),
            )
    })
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "sacco-admin"
    }))
}
