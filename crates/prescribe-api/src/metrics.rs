//! Prescription metrics.
//!
//! Each successful resolution emits one count metric as a structured
//! `tracing` event on the `prescribe::metrics` target, with the site, group
//! and, when configured, the stage as dimensions. Emitting a metric cannot fail
//! the request that triggered it.

use prescribe_core::{Assignment, Resolution};

/// Target used for every metric event.
pub const METRICS_TARGET: &str = "prescribe::metrics";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
  PrescriptionsCreated,
  PrescriptionsRead,
}

impl Metric {
  pub fn name(self) -> &'static str {
    match self {
      Self::PrescriptionsCreated => "PrescriptionsCreated",
      Self::PrescriptionsRead => "PrescriptionsRead",
    }
  }

  /// The metric a resolution counts towards.
  pub fn for_resolution(resolution: &Resolution) -> Self {
    if resolution.created {
      Self::PrescriptionsCreated
    } else {
      Self::PrescriptionsRead
    }
  }
}

/// Emits metric events, tagged with the deployment stage.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
  stage: Option<String>,
}

impl Metrics {
  pub fn new(stage: Option<String>) -> Self { Self { stage } }

  pub fn stage(&self) -> Option<&str> { self.stage.as_deref() }

  pub fn record_resolution(&self, resolution: &Resolution) {
    self.emit(Metric::for_resolution(resolution), &resolution.assignment);
  }

  fn emit(&self, metric: Metric, assignment: &Assignment) {
    tracing::info!(
      target: METRICS_TARGET,
      metric = metric.name(),
      value = 1u64,
      unit = "Count",
      site_name = %assignment.site,
      group = %assignment.group,
      stage = self.stage.as_deref(),
      "metric"
    );
  }
}

#[cfg(test)]
mod tests {
  use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, Mutex},
  };

  use prescribe_core::{Group, SiteName};
  use tracing::field::{Field, Visit};
  use tracing_subscriber::{Layer, layer::SubscriberExt as _};

  use super::*;

  type Fields = BTreeMap<String, String>;

  /// Collects the fields of every event on the metrics target.
  #[derive(Clone, Default)]
  struct Capture(Arc<Mutex<Vec<Fields>>>);

  struct FieldVisitor<'a>(&'a mut Fields);

  impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
      self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
      self.0.insert(field.name().to_owned(), format!("{value:?}"));
    }
  }

  impl<S: tracing::Subscriber> Layer<S> for Capture {
    fn on_event(
      &self,
      event: &tracing::Event<'_>,
      _: tracing_subscriber::layer::Context<'_, S>,
    ) {
      if event.metadata().target() != METRICS_TARGET {
        return;
      }
      let mut fields = Fields::new();
      event.record(&mut FieldVisitor(&mut fields));
      self.0.lock().unwrap().push(fields);
    }
  }

  fn captured(metrics: &Metrics, resolution: &Resolution) -> Vec<Fields> {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, || {
      metrics.record_resolution(resolution);
    });
    capture.0.lock().unwrap().clone()
  }

  fn resolution(created: bool) -> Resolution {
    Resolution {
      assignment: Assignment {
        site:       SiteName::new("afro-la"),
        visitor_id: "3800ac11-781a-4cf2-a675-9bbaa9c0729b".parse().unwrap(),
        group:      Group::A,
      },
      created,
    }
  }

  #[test]
  fn creation_and_read_count_separately() {
    assert_eq!(
      Metric::for_resolution(&resolution(true)),
      Metric::PrescriptionsCreated
    );
    assert_eq!(
      Metric::for_resolution(&resolution(false)),
      Metric::PrescriptionsRead
    );
  }

  #[test]
  fn names_are_pascal_case() {
    assert_eq!(Metric::PrescriptionsCreated.name(), "PrescriptionsCreated");
    assert_eq!(Metric::PrescriptionsRead.name(), "PrescriptionsRead");
  }

  #[test]
  fn recording_without_subscriber_is_harmless() {
    let metrics = Metrics::new(Some("dev".into()));
    assert_eq!(metrics.stage(), Some("dev"));
    metrics.record_resolution(&resolution(true));
    metrics.record_resolution(&resolution(false));
  }

  #[test]
  fn event_carries_dimensions_and_stage() {
    let events = captured(&Metrics::new(Some("prod".into())), &resolution(true));
    assert_eq!(events.len(), 1);
    let fields = &events[0];
    assert_eq!(fields["metric"], "PrescriptionsCreated");
    assert_eq!(fields["site_name"], "afro-la");
    assert_eq!(fields["group"], "A");
    assert_eq!(fields["stage"], "prod");
  }

  #[test]
  fn unset_stage_is_left_out() {
    let events = captured(&Metrics::default(), &resolution(false));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["metric"], "PrescriptionsRead");
    assert!(!events[0].contains_key("stage"), "{:?}", events[0]);
  }
}
