//! Command-line arguments for both tools.

use std::time::Duration;

use clap::Parser;

use scribeops_core::{JobTemplate, S3Location};
use scribeops_jobs::{BatchConfig, RetryPolicy};
use scribeops_monitor::{DEFAULT_NAMESPACE, MonitorConfig, NAMESPACE_ENV};
use scribeops_observability::{LogConfig, LogFormat};

/// Parse a non-negative, finite number of seconds (e.g. `0.1`, `60`).
pub fn parse_seconds(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a number of seconds"))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("`{raw}` must be a non-negative, finite number of seconds"));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}

/// Load generator: start many Call Analytics jobs against one input file.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "transcribe-load",
    about = "Start multiple Amazon Transcribe Call Analytics jobs"
)]
pub struct LoadArgs {
    /// S3 bucket containing the input audio file
    #[arg(long)]
    pub input_bucket: String,

    /// S3 key of the input audio file
    #[arg(long)]
    pub input_file: String,

    /// S3 bucket for transcription output
    #[arg(long)]
    pub output_bucket: String,

    /// IAM role ARN Transcribe assumes to access S3
    #[arg(long)]
    pub role_arn: String,

    /// Number of jobs to start
    #[arg(long, default_value_t = 10_000)]
    pub count: u64,

    /// Delay between job starts, in seconds
    #[arg(
        long,
        default_value = "0.1",
        allow_negative_numbers = true,
        value_parser = parse_seconds
    )]
    pub delay: Duration,

    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Retries per job for throttling and transient errors
    #[arg(long, default_value_t = 5)]
    pub max_retries: u32,

    /// Initial backoff, in seconds
    #[arg(
        long,
        default_value = "1.0",
        allow_negative_numbers = true,
        value_parser = parse_seconds
    )]
    pub base_delay: Duration,

    /// Backoff ceiling before jitter, in seconds
    #[arg(
        long,
        default_value = "60.0",
        allow_negative_numbers = true,
        value_parser = parse_seconds
    )]
    pub max_delay: Duration,

    /// Log output: text or json
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,
}

impl LoadArgs {
    pub fn template(&self) -> JobTemplate {
        JobTemplate::call_analytics(
            S3Location::new(&self.input_bucket, &self.input_file),
            &self.output_bucket,
            &self.role_arn,
        )
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(self.max_retries, self.base_delay, self.max_delay)
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig::default()
            .with_count(self.count)
            .with_delay(self.delay)
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig::default().with_format(self.log_format)
    }
}

/// One-shot concurrency sample, published as a metric.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "transcribe-monitor",
    about = "Count in-progress Transcribe jobs and publish the total to CloudWatch"
)]
pub struct MonitorArgs {
    /// AWS region; the SDK default chain is used when omitted
    #[arg(long)]
    pub region: Option<String>,

    /// CloudWatch metrics namespace
    #[arg(long, env = NAMESPACE_ENV, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Log output: text or json
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,
}

impl MonitorArgs {
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig::default().with_namespace(&self.namespace)
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig::default().with_format(self.log_format)
    }
}
