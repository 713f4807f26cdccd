use actix_cors::Cors;
use actix_web::http::header;

/// Explicit-origin CORS; entries that are not http(s) origins are ignored.
pub fn cors_middleware(origins: &[String]) -> Cors {
    let valid: Vec<&str> = origins
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .collect();

    let effective: Vec<&str> = if valid.is_empty() {
        vec!["http://localhost:3000", "http://127.0.0.1:3000"]
    } else {
        valid
    };

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::IF_MATCH,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::ETAG,
        ])
        .max_age(3600);

    for origin in effective {
        cors = cors.allowed_origin(origin);
    }

    cors
}
