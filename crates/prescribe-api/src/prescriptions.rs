//! Handlers for the root and `/prescription` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | Liveness message |
//! | `GET`  | `/prescription/{site}/{visitor_id}` | Optional `?wa=&wb=&wc=` weights, default 1 |

use axum::{
  Json,
  extract::{Path, Query, State, rejection::QueryRejection},
};
use prescribe_core::{
  Assignment, AssignmentStore, Error as CoreError, Group, Weights,
  assignment::parse_visitor_id,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppState, error::ApiError};

pub const ROOT_MESSAGE: &str =
  "This is the root endpoint for the prescription API.";

// ─── Root ─────────────────────────────────────────────────────────────────────

/// `GET /`
pub async fn root() -> Json<Value> { Json(json!({ "message": ROOT_MESSAGE })) }

// ─── Prescription ─────────────────────────────────────────────────────────────

/// Creation-path weights, kept as raw strings so that a malformed value is
/// reported by name as a validation error instead of a query rejection.
#[derive(Debug, Default, Deserialize)]
pub struct WeightParams {
  pub wa: Option<String>,
  pub wb: Option<String>,
  pub wc: Option<String>,
}

impl WeightParams {
  pub fn into_weights(self) -> Result<Weights, CoreError> {
    let mut weights = Weights::default();
    for (name, group, raw) in [
      ("wa", Group::A, self.wa),
      ("wb", Group::B, self.wb),
      ("wc", Group::C, self.wc),
    ] {
      if let Some(raw) = raw {
        weights = weights.with(group, parse_weight(name, &raw)?);
      }
    }
    Ok(weights)
  }
}

fn parse_weight(name: &str, raw: &str) -> Result<u32, CoreError> {
  raw.trim().parse::<u32>().map_err(|_| {
    CoreError::InvalidWeights(format!(
      "{name} must be a non-negative integer no larger than {}, got {raw:?}",
      u32::MAX
    ))
  })
}

/// `GET /prescription/{site}/{visitor_id}[?wa=&wb=&wc=]`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path((site, visitor_id)): Path<(String, String)>,
  query: Result<Query<WeightParams>, QueryRejection>,
) -> Result<Json<Assignment>, ApiError>
where
  S: AssignmentStore + Clone + 'static,
{
  tracing::info!(
    route = "/prescription/{site}/{visitor_id}",
    %site,
    %visitor_id,
    "Received request"
  );

  // Key errors are reported ahead of weight errors.
  state.resolver.catalog().validate(&site)?;
  parse_visitor_id(&visitor_id)?;
  let Query(params) =
    query.map_err(|e| CoreError::InvalidWeights(e.body_text()))?;
  let weights = params.into_weights()?;

  let resolved = tokio::time::timeout(
    state.request_timeout,
    state.resolver.resolve(&site, &visitor_id, &weights),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      %site,
      %visitor_id,
      timeout_ms = state.request_timeout.as_millis() as u64,
      "prescription resolution timed out"
    );
    ApiError::Timeout
  })?;

  let resolution = resolved.inspect_err(|e| {
    if !e.is_validation() {
      tracing::error!(%site, %visitor_id, error = %e, "failed to resolve prescription");
    }
  })?;

  state.metrics.record_resolution(&resolution);
  Ok(Json(resolution.assignment))
}
