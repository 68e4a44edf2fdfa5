// Runs API submissions off the UI loop.
use crate::controller::WordController;
use crate::tui::action::{Action, AppEvent};
use tokio::sync::mpsc::{Receiver, Sender};

/// Processes actions one at a time until `Quit` or the sender goes away.
///
/// Flash messages, overlay and tags are updated by the controller itself; the
/// events only tell the UI loop that something finished.
pub async fn run_network_actor(
    controller: WordController,
    csrf_token: String,
    mut action_rx: Receiver<Action>,
    event_tx: Sender<AppEvent>,
) {
    while let Some(action) = action_rx.recv().await {
        match action {
            Action::Quit => break,

            Action::Submit(endpoint, parent) => {
                match controller
                    .submit(endpoint, parent.as_ref(), &csrf_token)
                    .await
                {
                    Ok(outcome) => {
                        let _ = event_tx.send(AppEvent::Finished(endpoint, outcome)).await;
                    }
                    Err(e) => {
                        let _ = event_tx.send(AppEvent::Error(e.to_string())).await;
                    }
                }
            }

            Action::Retry(flash_id) => match controller.retry(flash_id).await {
                Ok(outcome) => {
                    let _ = event_tx.send(AppEvent::Retried(flash_id, outcome)).await;
                }
                Err(e) => {
                    let _ = event_tx.send(AppEvent::Error(e.to_string())).await;
                }
            },
        }
    }
    log::debug!("network actor stopped");
}
