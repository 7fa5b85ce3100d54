use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use scribeops_cli::LoadArgs;
use scribeops_cli::runtime::{build_runtime, install_ctrl_c};
use scribeops_infra::{AwsTranscribeService, load_sdk_config};
use scribeops_jobs::{BatchReport, Shutdown, ThreadSleeper};

fn main() -> ExitCode {
    let args = LoadArgs::parse();
    scribeops_observability::init(&args.log_config());

    match scribeops_cli::catch_panic(|| run(&args)) {
        Ok(report) => {
            tracing::debug!(?report, "load run finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = format!("{err:#}"), "load run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &LoadArgs) -> anyhow::Result<BatchReport> {
    let runtime = build_runtime().context("failed to start async runtime")?;
    let shutdown = Shutdown::new();
    install_ctrl_c(runtime.handle(), shutdown.clone());

    let sdk_config = load_sdk_config(runtime.handle(), Some(args.region.clone()));
    let service = AwsTranscribeService::from_sdk_config(&sdk_config, runtime.handle().clone());

    Ok(scribeops_cli::run_load(
        args,
        service,
        ThreadSleeper::new(shutdown),
    ))
}
