use actix_web::{web, App, HttpServer};
use kinquest_backend::config::app::AppConfig;
use kinquest_backend::config::db::DbKind;
use kinquest_backend::infra::state::build_state;
use kinquest_backend::infra::sweeper::spawn_idle_sweeper;
use kinquest_backend::middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
use kinquest_backend::routes;
use kinquest_backend::state::security_config::SecurityConfig;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment comes from the runtime (compose env_file, or `set -a; . ./.env`).
    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    let security = match SecurityConfig::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Invalid security configuration");
            std::process::exit(1);
        }
    };
    let db_kind = match DbKind::from_env() {
        Ok(k) => k,
        Err(e) => {
            error!(error = %e, "Invalid KINQUEST_DB_KIND");
            std::process::exit(1);
        }
    };

    let (host, port) = (config.host.clone(), config.port);
    let llm_enabled = config.llm.is_some();

    let app_state = match build_state()
        .with_db(db_kind)
        .with_security(security)
        .with_config(config)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            std::process::exit(1);
        }
    };

    info!(host = %host, port, db_kind = ?db_kind, llm_enabled, "Starting Kinquest backend");

    let data = web::Data::new(app_state);
    spawn_idle_sweeper(data.clone());

    HttpServer::new(move || {
        App::new()
            .wrap(TraceSpan)
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .wrap(cors_middleware(&data.config.cors_origins))
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
