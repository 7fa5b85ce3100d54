use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use scribeops_cli::MonitorArgs;
use scribeops_cli::runtime::build_runtime;
use scribeops_infra::{AwsTranscribeService, CloudWatchMetricsSink, load_sdk_config};
use scribeops_monitor::MonitorResponse;

fn main() -> ExitCode {
    let args = MonitorArgs::parse();
    scribeops_observability::init(&args.log_config());

    match scribeops_cli::catch_panic(|| run(&args)) {
        Ok(response) => {
            println!("{}", serde_json::to_string(&response).unwrap_or(response.body));
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = format!("{err:#}"), "monitor run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &MonitorArgs) -> anyhow::Result<MonitorResponse> {
    let runtime = build_runtime().context("failed to start async runtime")?;
    let sdk_config = load_sdk_config(runtime.handle(), args.region.clone());

    let listing = AwsTranscribeService::from_sdk_config(&sdk_config, runtime.handle().clone());
    let sink = CloudWatchMetricsSink::from_sdk_config(&sdk_config, runtime.handle().clone());

    let response = scribeops_cli::run_monitor(args.monitor_config(), listing, sink)
        .context("failed to count in-progress jobs")?;
    Ok(response)
}
