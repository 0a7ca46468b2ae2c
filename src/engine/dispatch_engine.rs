use std::sync::Arc;

use tokio::spawn;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::dispatcher::Dispatcher;
use crate::telegram::IncomingMessage;

const MAX_CONCURRENCY: u32 = 1024;

/// Bounded intake for webhook deliveries.
///
/// Messages wait in a queue of `backpressure` slots and are handled by at most
/// `concurrency` tasks at a time. A full queue rejects new messages instead of
/// growing.
pub struct DispatchEngine {
    sender: mpsc::Sender<IncomingMessage>,
    handle: JoinHandle<()>
}

impl DispatchEngine {
    pub fn spawn(dispatcher: Arc<Dispatcher>, concurrency: usize, backpressure: usize) -> Self {
        let concurrency = u32::try_from(concurrency).unwrap_or(MAX_CONCURRENCY).clamp(1, MAX_CONCURRENCY);
        let (sender, receiver) = mpsc::channel::<IncomingMessage>(backpressure.max(1));
        let handle = spawn(Self::run(dispatcher, receiver, concurrency));

        Self { sender, handle }
    }

    /// Queues a message without waiting. Returns `false` when it was dropped.
    pub fn submit(&self, message: IncomingMessage) -> bool {
        match self.sender.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(message)) => {
                warn!("Dispatch queue is full, dropping message from [{}]", message.sender_id);
                false
            },
            Err(TrySendError::Closed(message)) => {
                error!("Dispatch engine has stopped, dropping message from [{}]", message.sender_id);
                false
            }
        }
    }

    /// Stops accepting messages and waits until every queued and in-flight message is handled.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        drop(self.sender);
        self.handle.await?;

        Ok(())
    }

    async fn run(dispatcher: Arc<Dispatcher>, mut receiver: mpsc::Receiver<IncomingMessage>, concurrency: u32) {
        let permits = Arc::new(Semaphore::new(concurrency as usize));

        while let Some(message) = receiver.recv().await {
            let permit = match permits.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(error) => {
                    error!("Dispatch permits are unavailable: {error}");
                    break;
                }
            };

            let dispatcher = dispatcher.clone();

            spawn(async move {
                dispatcher.handle(message).await;
                drop(permit);
            });
        }

        //NOTE: Holding every permit means no handler is still running
        if let Err(error) = permits.acquire_many(concurrency).await {
            error!("Could not wait for in-flight messages: {error}");
        }

        debug!("Dispatch engine drained");
    }
}
