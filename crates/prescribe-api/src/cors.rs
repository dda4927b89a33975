//! CORS allow-list for browser callers.
//!
//! A request whose `Origin` is on the list gets it echoed back in
//! `Access-Control-Allow-Origin`; any other origin gets no CORS headers
//! granting access. Only `GET` is allowed.

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Build the CORS layer for `allowed_origins`.
///
/// Origins are compared exactly as browsers send them, so a trailing `/` in
/// configuration is dropped. Entries that are not valid header values, and
/// the `*` wildcard, are skipped with a warning.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
  let origins: Vec<HeaderValue> = allowed_origins
    .iter()
    .map(|o| o.trim().trim_end_matches('/'))
    .filter_map(|o| {
      if o == "*" {
        tracing::warn!("ignoring wildcard CORS origin; list origins explicitly");
        return None;
      }
      match HeaderValue::from_str(o) {
        Ok(v) => Some(v),
        Err(_) => {
          tracing::warn!(origin = %o, "ignoring invalid CORS origin");
          None
        }
      }
    })
    .collect();

  CorsLayer::new()
    .allow_origin(AllowOrigin::list(origins))
    .allow_methods([Method::GET])
}
