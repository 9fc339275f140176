//! CORS configuration

use actix_cors::Cors;
use actix_web::http::header;

use sgms_shared::config::CorsConfig;

/// Build the CORS middleware from configuration
///
/// An empty origin list means same-origin only; credentials stay enabled
/// because tokens ride in cookies.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .max_age(config.max_age);

    for origin in &config.allowed_origins {
        cors = cors.allowed_origin(origin);
    }

    if config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors
}
