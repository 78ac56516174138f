//! CLI run loop.

use shelfmove_batch_transfer::{BatchOrchestrator, Outcome, TransferBatch};
use shelfmove_move_client::Client;
use tracing::{info, warn};

use crate::config::Config;
use crate::terminal::TerminalSink;

/// Runs one batch against the configured Move Service.
///
/// Ctrl-C cancels the batch; the outcome is still returned.
pub async fn run(config: Config, batch: TransferBatch) -> anyhow::Result<Outcome> {
    let client = Client::new(&config.service_url, config.request_timeout())?;
    info!(service = %client.base_url(), items = batch.len(), "move service ready");

    let orchestrator = BatchOrchestrator::new(config.transfer_config());
    let cancel = orchestrator.cancel_token();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling batch");
            cancel.cancel();
        }
    });

    let sink = TerminalSink::new();
    let outcome = orchestrator.run_with_sink(&client, &batch, &sink).await;
    ctrl_c.abort();

    Ok(outcome)
}

/// Process exit code for an outcome.
pub fn exit_code(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Completed { failed: 0, .. } => 0,
        Outcome::Completed { .. } => 1,
        _ => 2,
    }
}
