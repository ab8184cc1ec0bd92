//! CORS policy: explicit origins, credentials allowed.

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::CorsSection;

/// Build the CORS layer from a validated config section.
///
/// Methods and headers are pinned (no wildcards) so the layer stays valid
/// with credentials enabled.
pub fn build_cors_layer(cfg: &CorsSection) -> CorsLayer {
    let wildcard = cfg.allowed_origins.iter().any(|o| o == "*");

    let origin = if wildcard {
        tracing::warn!("cors allows any origin");
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = cfg
            .allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();
        AllowOrigin::list(origins)
    };

    let mut layer = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::HEAD])
        .allow_headers([
            header::ORIGIN,
            header::ACCEPT,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-requested-with"),
        ]);

    if cfg.allow_credentials && !wildcard {
        layer = layer.allow_credentials(true);
    }

    layer
}
