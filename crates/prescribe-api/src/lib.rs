//! HTTP API for prescription assignments.
//!
//! Exposes an axum [`Router`] over a [`Resolver`] backed by any
//! [`AssignmentStore`]. Request logging, CORS and metric events live here;
//! the resolver itself stays free of them.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = prescribe_api::router(Arc::new(resolver), &settings);
//! axum::serve(listener, app).await?;
//! ```

pub mod cors;
pub mod error;
pub mod metrics;
pub mod prescriptions;

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use prescribe_core::{AssignmentStore, Resolver};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use metrics::Metrics;

// ─── Settings ─────────────────────────────────────────────────────────────────

/// Runtime settings for the HTTP layer.
#[derive(Debug, Clone)]
pub struct ApiSettings {
  /// Deployment stage attached to metric events, e.g. `dev` or `prod`.
  pub stage:                Option<String>,
  pub cors_allowed_origins: Vec<String>,
  /// Upper bound on one resolution, store round-trips included.
  pub request_timeout:      Duration,
}

impl Default for ApiSettings {
  fn default() -> Self {
    Self {
      stage:                None,
      cors_allowed_origins: Vec::new(),
      request_timeout:      Duration::from_secs(5),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub resolver:        Arc<Resolver<S>>,
  pub metrics:         Metrics,
  pub request_timeout: Duration,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `resolver`.
pub fn router<S>(resolver: Arc<Resolver<S>>, settings: &ApiSettings) -> Router
where
  S: AssignmentStore + Clone + 'static,
{
  let state = AppState {
    resolver,
    metrics: Metrics::new(settings.stage.clone()),
    request_timeout: settings.request_timeout,
  };

  Router::new()
    .route("/", get(prescriptions::root))
    .route(
      "/prescription/{site}/{visitor_id}",
      get(prescriptions::get_one::<S>),
    )
    .layer(cors::cors_layer(&settings.cors_allowed_origins))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
