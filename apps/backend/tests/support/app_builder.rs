use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use kinquest_backend::config::app::AppConfig;
use kinquest_backend::content::{ContentSource, FallbackCatalog};
use kinquest_backend::infra::state::build_state;
use kinquest_backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use kinquest_backend::routes;
use kinquest_backend::state::app_state::AppState;

/// Fresh in-memory database with migrations applied and the static catalog.
pub async fn test_state() -> AppState {
    test_state_with(AppConfig::default(), Arc::new(FallbackCatalog::new())).await
}

pub async fn test_state_with(config: AppConfig, content: Arc<dyn ContentSource>) -> AppState {
    build_state()
        .with_config(config)
        .with_content(content)
        .build()
        .await
        .expect("test state should build")
}

/// Full route table behind the production middleware stack.
pub async fn create_test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    let data = web::Data::new(state);
    test::init_service(
        App::new()
            .wrap(TraceSpan)
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data)
            .configure(routes::configure),
    )
    .await
}
