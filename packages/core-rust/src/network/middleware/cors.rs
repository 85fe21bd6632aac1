use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::network::config::CorsPolicy;

/// Builds the CORS layer from the configured policy.
///
/// A wildcard `"*"` in the origins list mirrors the request origin, which
/// unlike a literal `*` stays valid with credentials allowed. Otherwise,
/// each origin string is parsed and added to an explicit allowlist.
pub fn build_cors_layer(policy: &CorsPolicy) -> CorsLayer {
    let allow_origin = if policy.allows_any_origin() {
        AllowOrigin::mirror_request()
    } else {
        let parsed: Vec<_> = policy
            .allow_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring unparsable CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(policy.allow_methods.clone())
        .allow_headers(policy.allow_headers.clone())
        .expose_headers(policy.expose_headers.clone())
        .allow_credentials(policy.allow_credentials)
        .max_age(policy.max_age)
}
