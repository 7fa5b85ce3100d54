//! Monitor runs against the in-memory adapters.

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, PoisonError};

use clap::Parser;

use scribeops_cli::{MonitorArgs, run_monitor};
use scribeops_core::{JobState, ServiceError};
use scribeops_infra::{InMemoryMetricsSink, InMemoryTranscribeService};
use scribeops_monitor::{
    DEFAULT_NAMESPACE, Dimension, METRIC_NAME, MetricUnit, MetricsError, NAMESPACE_ENV,
    SampleError,
};

fn service_with(in_progress: usize, completed: usize) -> InMemoryTranscribeService {
    let service = InMemoryTranscribeService::new();
    for i in 0..in_progress {
        service.insert_job(format!("CallAnalyticsJob-run-{i:04}"), JobState::InProgress);
    }
    for i in 0..completed {
        service.insert_job(format!("CallAnalyticsJob-done-{i:04}"), JobState::Completed);
    }
    service
}

/// Serializes every test here that reads or writes the process environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sets or clears `CLOUDWATCH_NAMESPACE` for one test; restores it on drop.
struct NamespaceEnv {
    previous: Option<OsString>,
    _lock: MutexGuard<'static, ()>,
}

impl NamespaceEnv {
    fn set(value: Option<&str>) -> Self {
        let lock = env_lock();
        let previous = env::var_os(NAMESPACE_ENV);
        // SAFETY: ENV_LOCK is held, so no other test in this binary touches the environment.
        unsafe {
            match value {
                Some(value) => env::set_var(NAMESPACE_ENV, value),
                None => env::remove_var(NAMESPACE_ENV),
            }
        }
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for NamespaceEnv {
    fn drop(&mut self) {
        // SAFETY: the lock field is still held until after this body runs.
        unsafe {
            match self.previous.take() {
                Some(value) => env::set_var(NAMESPACE_ENV, value),
                None => env::remove_var(NAMESPACE_ENV),
            }
        }
    }
}

fn args(namespace: &str) -> MonitorArgs {
    let _lock = env_lock();
    MonitorArgs::try_parse_from(["transcribe-monitor", "--namespace", namespace]).unwrap()
}

#[test]
fn namespace_defaults_when_unset() {
    let _env = NamespaceEnv::set(None);

    let args = MonitorArgs::try_parse_from(["transcribe-monitor"]).unwrap();

    assert_eq!(args.namespace, DEFAULT_NAMESPACE);
    assert_eq!(args.monitor_config().namespace, DEFAULT_NAMESPACE);
    assert_eq!(args.region, None);
}

#[test]
fn namespace_follows_environment() {
    let _env = NamespaceEnv::set(Some("LoadTestFromEnv"));

    let args = MonitorArgs::try_parse_from(["transcribe-monitor"]).unwrap();

    assert_eq!(args.monitor_config().namespace, "LoadTestFromEnv");
}

#[test]
fn namespace_flag_beats_environment() {
    let _env = NamespaceEnv::set(Some("LoadTestFromEnv"));

    let args =
        MonitorArgs::try_parse_from(["transcribe-monitor", "--namespace", "FromFlag"]).unwrap();

    assert_eq!(args.monitor_config().namespace, "FromFlag");
}

#[test]
fn counts_every_page_and_publishes_once() {
    let service = service_with(250, 40);
    let sink = InMemoryMetricsSink::new();

    let response = run_monitor(args("LoadTest").monitor_config(), &service, &sink).unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "Current concurrent Transcribe jobs: 250");
    assert_eq!(service.list_calls(), 3);

    let published = sink.published();
    assert_eq!(published.len(), 1);
    let (namespace, datum) = &published[0];
    assert_eq!(namespace, "LoadTest");
    assert_eq!(datum.metric_name, METRIC_NAME);
    assert_eq!(datum.value, 250.0);
    assert_eq!(datum.unit, MetricUnit::Count);
    assert_eq!(datum.dimensions, vec![Dimension::new("Service", "Transcribe")]);
}

#[test]
fn no_jobs_reports_zero() {
    let service = InMemoryTranscribeService::new();
    let sink = InMemoryMetricsSink::new();

    let response = run_monitor(args("LoadTest").monitor_config(), &service, &sink).unwrap();

    assert_eq!(response.body, "Current concurrent Transcribe jobs: 0");
    assert_eq!(sink.published()[0].1.value, 0.0);
}

#[test]
fn error_after_two_pages_reports_partial_count() {
    let service = service_with(250, 0);
    service.fail_list_call(3, ServiceError::limit_exceeded("rate exceeded"));
    let sink = InMemoryMetricsSink::new();

    let response = run_monitor(args("LoadTest").monitor_config(), &service, &sink).unwrap();

    assert_eq!(response.body, "Current concurrent Transcribe jobs: 200");
    assert_eq!(sink.published()[0].1.value, 200.0);
}

#[test]
fn error_on_first_page_is_fatal_and_publishes_nothing() {
    let service = service_with(10, 0);
    service.fail_next_list(ServiceError::unavailable("down for maintenance"));
    let sink = InMemoryMetricsSink::new();

    let err = run_monitor(args("LoadTest").monitor_config(), &service, &sink).unwrap_err();

    assert!(matches!(err, SampleError::UpstreamUnavailable(_)));
    assert!(sink.published().is_empty());
}

#[test]
fn publish_failure_does_not_fail_the_run() {
    let service = service_with(5, 0);
    let sink = InMemoryMetricsSink::failing(MetricsError::Transport("connection reset".into()));

    let response = run_monitor(args("LoadTest").monitor_config(), &service, &sink).unwrap();

    assert_eq!(response.body, "Current concurrent Transcribe jobs: 5");
    assert_eq!(sink.published().len(), 1);
}

#[test]
fn response_serializes_in_trigger_shape() {
    let service = service_with(7, 0);
    let sink = InMemoryMetricsSink::new();

    let response = run_monitor(args("LoadTest").monitor_config(), &service, &sink).unwrap();

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        serde_json::json!({
            "statusCode": 200,
            "body": "Current concurrent Transcribe jobs: 7",
        })
    );
}
