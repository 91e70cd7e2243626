use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::dto::player_event::PlayerEvent;

#[derive(Clone, Debug, Error)]
#[error("{0}")]
pub struct PresenterError(pub String);

/// Renders the current session state as a now-playing surface. Strictly
/// best-effort: the player never blocks on or fails because of a presenter.
#[async_trait]
pub trait NowPlayingPresenter: Send + Sync + 'static {
    async fn on_state_changed(&self, event: PlayerEvent) -> Result<(), PresenterError>;
}

/// Forwards player events to a presenter, logging and swallowing failures.
pub(crate) async fn drive_presenter(
    presenter: Arc<dyn NowPlayingPresenter>,
    mut events: broadcast::Receiver<PlayerEvent>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Err(e) = presenter.on_state_changed(event).await {
                    warn!("Presenter failed to render state change: {e}");
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Presenter lagged behind by {skipped} events");
            }
            Err(broadcast::error::RecvError::Closed) => {
                info!("Event channel closed, presenter loop completed");
                return;
            }
        }
    }
}
