use flume::{Receiver, Sender};
use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Clone, Debug, Error)]
pub(crate) enum ChannelError {
    #[error("command channel closed")]
    Closed,
    #[error("response channel dropped before a response was sent")]
    NoResponse,
}

/// A command paired with an optional oneshot for the reply.
type Envelope<TIn, TOut> = (TIn, Option<oneshot::Sender<TOut>>);

pub(crate) fn two_way_channel<TIn, TOut>() -> (TwoWaySender<TIn, TOut>, TwoWayReceiver<TIn, TOut>) {
    let (main_tx, main_rx) = flume::unbounded();
    (
        TwoWaySender { main_tx },
        TwoWayReceiver {
            main_rx,
            responder: None,
        },
    )
}

#[derive(Debug)]
pub(crate) struct TwoWaySender<TIn, TOut> {
    main_tx: Sender<Envelope<TIn, TOut>>,
}

// Manual impl because the message types themselves don't need to be Clone.
impl<TIn, TOut> Clone for TwoWaySender<TIn, TOut> {
    fn clone(&self) -> Self {
        Self {
            main_tx: self.main_tx.clone(),
        }
    }
}

impl<TIn, TOut> TwoWaySender<TIn, TOut> {
    pub(crate) fn send(&self, message: TIn) -> Result<(), ChannelError> {
        self.main_tx
            .send((message, None))
            .map_err(|_| ChannelError::Closed)
    }

    pub(crate) async fn send_async(&self, message: TIn) -> Result<(), ChannelError> {
        self.main_tx
            .send_async((message, None))
            .await
            .map_err(|_| ChannelError::Closed)
    }

    /// Sends a message and waits for the receiver to respond.
    pub(crate) async fn request(&self, message: TIn) -> Result<TOut, ChannelError> {
        let (oneshot_tx, oneshot_rx) = oneshot::channel();
        self.main_tx
            .send_async((message, Some(oneshot_tx)))
            .await
            .map_err(|_| ChannelError::Closed)?;
        oneshot_rx.await.map_err(|_| ChannelError::NoResponse)
    }
}

#[derive(Debug)]
pub(crate) struct TwoWayReceiver<TIn, TOut> {
    main_rx: Receiver<Envelope<TIn, TOut>>,
    responder: Option<oneshot::Sender<TOut>>,
}

impl<TIn, TOut> TwoWayReceiver<TIn, TOut> {
    pub(crate) async fn recv_async(&mut self) -> Result<TIn, ChannelError> {
        let (message, responder) = self
            .main_rx
            .recv_async()
            .await
            .map_err(|_| ChannelError::Closed)?;
        self.responder = responder;
        Ok(message)
    }

    /// Replies to the most recently received message. A no-op when the
    /// sender did not ask for a response.
    pub(crate) fn respond(&mut self, response: TOut) -> Result<(), TOut> {
        match self.responder.take() {
            Some(responder) => responder.send(response),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_receives_response() {
        let (tx, mut rx) = two_way_channel::<u32, u32>();
        let handle = tokio::spawn(async move {
            let message = rx.recv_async().await.unwrap();
            rx.respond(message * 2).unwrap();
        });
        let response = tx.request(21).await.unwrap();
        assert_eq!(response, 42);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn respond_without_responder_is_noop() {
        let (tx, mut rx) = two_way_channel::<u32, u32>();
        tx.send(1).unwrap();
        rx.recv_async().await.unwrap();
        assert!(rx.respond(0).is_ok());
    }

    #[tokio::test]
    async fn request_on_dropped_receiver_fails() {
        let (tx, rx) = two_way_channel::<u32, u32>();
        drop(rx);
        assert!(matches!(tx.request(1).await, Err(ChannelError::Closed)));
    }
}
