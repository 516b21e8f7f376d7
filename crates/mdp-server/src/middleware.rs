//! HTTP middleware helpers

use crate::config::CorsConfig;
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;

/// Build the CORS layer from configured origins.
///
/// Origins that fail to parse are skipped rather than rejecting startup.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_skips_invalid_origins() {
        let config = CorsConfig {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "not a header value\u{0}".to_string(),
            ],
        };
        // Construction must not panic on the malformed origin
        let _ = cors_layer(&config);
    }
}
