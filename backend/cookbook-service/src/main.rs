use actix_cors::Cors;
use actix_middleware::{CorrelationIdMiddleware, MetricsMiddleware, SessionVerifier};
use actix_web::{web, App, HttpResponse, HttpServer};
use cookbook_service::handlers::{self, health};
use cookbook_service::openapi::ApiDoc;
use cookbook_service::realtime::ChatHub;
use cookbook_service::services::{PgFactStore, RankingService};
use cookbook_service::{db, Config};
use std::io;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn openapi_json(doc: web::Data<utoipa::openapi::OpenApi>) -> actix_web::Result<HttpResponse> {
    let body = serde_json::to_string(&*doc).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_cors(allowed_origins: &str) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed_origins.split(',') {
        let origin = origin.trim();
        if origin.is_empty() {
            continue;
        }
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method().allow_any_header().max_age(3600)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting cookbook-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let verifier = {
        let verifier = SessionVerifier::new(&config.auth.session_secret)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
        match &config.auth.issuer {
            Some(issuer) => verifier.with_issuer(issuer.clone()),
            None => verifier,
        }
    };

    let db_pool = match db::create_pool(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = db::migrate(&db_pool).await {
        tracing::error!("Database migration failed: {:#}", e);
        return Err(io::Error::new(io::ErrorKind::Other, format!("migration failed: {}", e)));
    }

    let ranking = web::Data::new(RankingService::new(
        Arc::new(PgFactStore::new(db_pool.clone())),
        &config.feed,
    ));
    tracing::info!(
        preferred_order = ?config.feed.preferred_order(),
        failure_policy = ?config.feed.failure_policy(),
        "Feed ranking configured"
    );

    let hub = web::Data::new(ChatHub::new(config.chat.channel_capacity));
    let verifier = web::Data::new(verifier);
    let pool_data = web::Data::new(db_pool.clone());
    let health_state = web::Data::new(health::HealthState::new(db_pool.clone()));
    let chat_config = web::Data::new(config.chat.clone());
    let upload_config = web::Data::new(config.upload.clone());

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        let openapi_doc = ApiDoc::openapi();

        App::new()
            .app_data(web::Data::new(openapi_doc.clone()))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url(ApiDoc::openapi_json_path(), openapi_doc.clone()),
            )
            .route(ApiDoc::openapi_json_path(), web::get().to(openapi_json))
            .app_data(pool_data.clone())
            .app_data(ranking.clone())
            .app_data(hub.clone())
            .app_data(verifier.clone())
            .app_data(health_state.clone())
            .app_data(chat_config.clone())
            .app_data(upload_config.clone())
            .wrap(MetricsMiddleware)
            .wrap(CorrelationIdMiddleware)
            .wrap(build_cors(&allowed_origins))
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(cookbook_service::metrics::serve_metrics),
            )
            .route("/health", web::get().to(health::health_summary))
            .route("/health/ready", web::get().to(health::readiness_summary))
            .route("/health/live", web::get().to(health::liveness_check))
            .configure(handlers::configure)
    })
    .bind(&http_bind_address)?
    .run();

    let server_handle = server.handle();

    let mut tasks: JoinSet<io::Result<()>> = JoinSet::new();
    tasks.spawn(async move {
        tracing::info!("HTTP server is running");
        server.await
    });

    let mut first_error: Option<io::Error> = None;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = tasks.join_next() => {
                match result {
                    Some(Ok(Ok(_))) => {
                        tracing::info!("HTTP server stopped");
                    }
                    Some(Ok(Err(e))) => {
                        tracing::error!("Task returned error: {}", e);
                        first_error.get_or_insert(e);
                        server_handle.stop(true).await;
                        tasks.shutdown().await;
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::error!("Task join error: {}", e);
                        first_error.get_or_insert(io::Error::new(io::ErrorKind::Other, e.to_string()));
                        server_handle.stop(true).await;
                        tasks.shutdown().await;
                        break;
                    }
                    None => break,
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received");
                server_handle.stop(true).await;
                tasks.shutdown().await;
                break;
            }
        }
    }

    db_pool.close().await;
    tracing::info!("cookbook-service shutting down");

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
