//! CORS policy.
//!
//! Development mirrors any origin. Everywhere else only the configured
//! allowlist gets CORS headers.

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::AppConfig;

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");
const X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");

pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            X_REQUESTED_WITH,
            header::ACCEPT,
            X_API_KEY,
        ])
        .allow_credentials(true);

    if config.is_development() {
        return base.allow_origin(AllowOrigin::mirror_request());
    }

    let origins: Vec<HeaderValue> = config
        .cors
        .origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    tracing::debug!(count = origins.len(), "CORS allowlist loaded");

    base.allow_origin(AllowOrigin::list(origins))
}
