//! Runtime plumbing shared by the AWS binaries.

use std::process;

use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{info, warn};

use scribeops_jobs::Shutdown;

/// One small multi-thread runtime.
///
/// `Handle::block_on` only makes IO progress when worker threads drive the
/// reactor, so a current-thread runtime would stall the adapters.
pub fn build_runtime() -> std::io::Result<Runtime> {
    Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("scribeops-io")
        .enable_all()
        .build()
}

/// Trigger `shutdown` on the first Ctrl-C; exit at once on the second.
pub fn install_ctrl_c(runtime: &Handle, shutdown: Shutdown) {
    runtime.spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "could not listen for ctrl-c");
            return;
        }
        info!("interrupt received; finishing current step");
        shutdown.trigger();

        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("second interrupt; exiting immediately");
            process::exit(0);
        }
    });
}
