mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::activity::{routes as activity_routes, ActivityService};
use crate::features::airports::{routes as airports_routes, services::AirportService};
use crate::features::attachments::{routes as attachments_routes, AttachmentService};
use crate::features::auth::routes as auth_routes;
use crate::features::auth::services::{AuthService, PgUserDirectory};
use crate::features::auth::{AuthState, JwtService, SessionCookies, SessionResolver};
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::documents::routes::{self as documents_routes, DocumentsState};
use crate::features::documents::services::{DocumentFileService, FolderService};
use crate::features::flight_records::{
    routes as flight_records_routes, services::FlightRecordService,
};
use crate::features::incoming_inspections::{
    routes as inspections_routes, services::IncomingInspectionService,
};
use crate::features::sdr_reports::{routes as sdr_routes, services::SdrReportService};
use crate::features::sms_reports::{routes as sms_routes, services::SmsReportService};
use crate::features::stock_inventory::{routes as stock_routes, services::StockItemService};
use crate::features::technical_queries::routes::{
    self as technical_queries_routes, TechnicalQueriesState,
};
use crate::features::technical_queries::services::{
    TechnicalQueryService, TechnicalResponseService,
};
use crate::features::technician_training::{
    routes as training_routes, services::TrainingService,
};
use crate::modules::mail::{HttpMailer, MailSender};
use crate::modules::storage::{MinIOClient, ObjectStore};
use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware::from_fn,
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Configuration loaded: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );

    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Object storage
    let minio_client = MinIOClient::new(config.minio.clone())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?;
    minio_client
        .ensure_bucket_exists()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to ensure MinIO bucket exists: {}", e))?;
    tracing::info!(
        "MinIO client initialized for bucket: {}",
        minio_client.bucket_name()
    );
    let store: Arc<dyn ObjectStore> = Arc::new(minio_client);

    // Outbound mail
    let mailer: Arc<dyn MailSender> = Arc::new(
        HttpMailer::new(config.mail.clone())
            .map_err(|e| anyhow::anyhow!("Failed to initialize mailer: {}", e))?,
    );
    tracing::info!("Mailer initialized");

    let limits = config.app.search_limits();
    let activity_service = Arc::new(ActivityService::new(pool.clone(), limits));

    // Sessions
    let jwt_service = Arc::new(JwtService::from_config(&config.auth));
    let session_resolver = Arc::new(SessionResolver::new(
        Arc::clone(&jwt_service),
        Arc::new(PgUserDirectory::new(pool.clone())),
        config.auth.cookie_name.clone(),
    ));
    let auth_service = Arc::new(AuthService::new(
        pool.clone(),
        Arc::clone(&jwt_service),
        Arc::clone(&mailer),
        Arc::clone(&activity_service),
    ));
    let auth_state = AuthState {
        cookies: SessionCookies::new(
            config.auth.cookie_name.clone(),
            config.auth.cookie_secure,
            auth_service.session_max_age_secs(),
        ),
        service: auth_service,
    };
    tracing::info!("Auth services initialized");

    // Records
    let attachment_service = Arc::new(AttachmentService::new(
        pool.clone(),
        Arc::clone(&store),
        Arc::clone(&activity_service),
    ));
    let flight_record_service = Arc::new(FlightRecordService::new(
        pool.clone(),
        limits,
        Arc::clone(&activity_service),
        Arc::clone(&attachment_service),
    ));
    let airport_service = Arc::new(AirportService::new(
        pool.clone(),
        limits,
        Arc::clone(&activity_service),
    ));
    let stock_item_service = Arc::new(StockItemService::new(
        pool.clone(),
        limits,
        Arc::clone(&activity_service),
        Arc::clone(&attachment_service),
    ));
    let inspection_service = Arc::new(IncomingInspectionService::new(
        pool.clone(),
        limits,
        Arc::clone(&activity_service),
        Arc::clone(&attachment_service),
    ));
    let sdr_report_service = Arc::new(SdrReportService::new(
        pool.clone(),
        limits,
        Arc::clone(&activity_service),
        Arc::clone(&attachment_service),
    ));
    let sms_report_service = Arc::new(SmsReportService::new(
        pool.clone(),
        limits,
        Arc::clone(&activity_service),
        Arc::clone(&attachment_service),
    ));
    let training_service = Arc::new(TrainingService::new(
        pool.clone(),
        limits,
        Arc::clone(&activity_service),
        Arc::clone(&attachment_service),
    ));
    tracing::info!("Record services initialized");

    // Document library
    let folder_service = Arc::new(FolderService::new(
        pool.clone(),
        Arc::clone(&store),
        Arc::clone(&activity_service),
    ));
    let documents_state = DocumentsState {
        files: Arc::new(DocumentFileService::new(
            pool.clone(),
            Arc::clone(&store),
            Arc::clone(&activity_service),
            Arc::clone(&folder_service),
        )),
        folders: folder_service,
    };

    // Technical queries
    let response_service = Arc::new(TechnicalResponseService::new(
        pool.clone(),
        Arc::clone(&activity_service),
    ));
    let technical_queries_state = TechnicalQueriesState {
        queries: Arc::new(TechnicalQueryService::new(
            pool.clone(),
            limits,
            Arc::clone(&activity_service),
            Arc::clone(&response_service),
        )),
        responses: response_service,
    };

    let dashboard_service = Arc::new(DashboardService::new(pool.clone()));
    tracing::info!("Document, query and dashboard services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require a session)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(auth_state.clone()))
        .merge(activity_routes::routes(Arc::clone(&activity_service)))
        .merge(attachments_routes::routes(attachment_service))
        .merge(flight_records_routes::routes(flight_record_service))
        .merge(airports_routes::routes(airport_service))
        .merge(stock_routes::routes(stock_item_service))
        .merge(inspections_routes::routes(inspection_service))
        .merge(sdr_routes::routes(sdr_report_service))
        .merge(sms_routes::routes(sms_report_service))
        .merge(training_routes::routes(training_service))
        .merge(documents_routes::routes(documents_state))
        .merge(technical_queries_routes::routes(technical_queries_state))
        .merge(dashboard_routes::routes(dashboard_service))
        .route_layer(axum::middleware::from_fn_with_state(
            session_resolver,
            middleware::auth_middleware,
        ));

    // Liveness and readiness probes (no auth required)
    async fn health_check() -> StatusCode {
        StatusCode::OK
    }
    async fn readiness_check(State(pool): State<PgPool>) -> StatusCode {
        match database::ping(&pool).await {
            Ok(()) => StatusCode::OK,
            Err(e) => {
                tracing::warn!("Readiness check failed: {}", e);
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
    let health_routes = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/ready", axum::routing::get(readiness_check))
        .with_state(pool.clone());

    let public_routes = Router::new().merge(auth_routes::public_routes(auth_state));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_routes)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
