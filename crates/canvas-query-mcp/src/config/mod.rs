//! Configuration loading and resolution.

use canvas_query::{ClientConfig, DEFAULT_BASE_URL};

/// Environment variable holding the Canvas access token.
pub const TOKEN_ENV: &str = "CANVAS_API_TOKEN";
/// Environment variable overriding the Canvas base URL.
pub const BASE_URL_ENV: &str = "CANVAS_BASE_URL";

/// Resolve the access token: explicit flag, then `CANVAS_API_TOKEN`.
pub fn resolve_token(explicit: Option<&str>) -> Option<String> {
    resolve(explicit, std::env::var(TOKEN_ENV).ok())
}

/// Resolve the base URL: explicit flag, then `CANVAS_BASE_URL`, then the public Canvas host.
pub fn resolve_base_url(explicit: Option<&str>) -> String {
    resolve(explicit, std::env::var(BASE_URL_ENV).ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Build the upstream client configuration from flags and environment.
pub fn client_config(token: Option<&str>, base_url: Option<&str>) -> ClientConfig {
    ClientConfig::new(resolve_token(token)).with_base_url(resolve_base_url(base_url))
}

/// First non-blank value, trimmed. A blank flag counts as unset.
fn resolve(explicit: Option<&str>, env: Option<String>) -> Option<String> {
    let non_blank = |v: &str| {
        let v = v.trim();
        (!v.is_empty()).then(|| v.to_string())
    };
    explicit
        .and_then(non_blank)
        .or_else(|| env.as_deref().and_then(non_blank))
}
