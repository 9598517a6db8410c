use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use paperfeed_core::{ActionOutcome, FeedController};

use crate::tui_event::{FeedCommand, FeedEvent};

/// Install an observer on `controller` that forwards every state change to
/// the UI as a [`FeedEvent::Snapshot`].
pub fn forward_snapshots(
    controller: FeedController,
    tx: mpsc::UnboundedSender<FeedEvent>,
) -> FeedController {
    controller.with_observer(move |snapshot| {
        // The UI may already be gone during shutdown.
        let _ = tx.send(FeedEvent::Snapshot(Box::new(snapshot)));
    })
}

/// Own the controller for the lifetime of the UI.
///
/// Loads the first batch, then serves commands and merges recommendation
/// arrivals as they land. Commands are handled one at a time, so a command
/// that waits on a fallback fetch holds later ones in the channel while the
/// render loop keeps running on its own task.
pub async fn run_feed(
    mut controller: FeedController,
    mut cmd_rx: mpsc::UnboundedReceiver<FeedCommand>,
    cancel: CancellationToken,
) {
    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = controller.initialize() => {}
    }

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break };
                handle_command(&mut controller, cmd).await;
            }
            arrival = controller.next_arrival() => {
                if let Some(arrival) = arrival {
                    controller.apply_arrival(arrival);
                }
            }
        }
    }
    tracing::debug!("feed task stopped");
}

async fn handle_command(controller: &mut FeedController, cmd: FeedCommand) {
    let outcome = match cmd {
        FeedCommand::Feedback { liked } => controller.submit_feedback(liked).await,
        FeedCommand::Skip => controller.skip().await,
        FeedCommand::Reset => {
            controller.reset().await;
            return;
        }
    };
    if outcome != ActionOutcome::Accepted {
        tracing::debug!(?cmd, ?outcome, "command had no effect");
    }
}
