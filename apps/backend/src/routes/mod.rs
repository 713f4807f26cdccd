use actix_web::web;

pub mod auth;
pub mod content;
pub mod health;
pub mod missions;
pub mod profiles;
pub mod realtime;
pub mod sessions;

/// Register every route. Middleware is wrapped by the caller (`main` or tests).
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root));
    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));
    cfg.service(web::scope("/api/profiles").configure(profiles::configure_routes));
    cfg.service(web::scope("/api/sessions").configure(sessions::configure_routes));
    cfg.service(web::scope("/api/missions").configure(missions::configure_routes));
    cfg.service(web::scope("/api/content").configure(content::configure_routes));
    cfg.service(web::scope("/api/ws").configure(realtime::configure_routes));
}
