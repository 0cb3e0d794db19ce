use std::{future::Future, pin::Pin, sync::Arc, thread, time::Duration};

use anyhow::anyhow;
use tokio::runtime::Builder;

use super::{to_generic_error, StoreError, StoreResult};

pub type Reply<T> = oneshot::Sender<StoreResult<T>>;

pub type ClientFuture<C> = Pin<Box<dyn Future<Output = StoreResult<C>> + Send + 'static>>;

pub type TaskFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Synchronous handle onto a store whose client lives on its own tokio runtime.
///
/// Requests travel over a flume channel (plain `send` is safe from inside or outside a
/// runtime) and each one carries a oneshot sender for its reply.
pub struct NetworkStore<A> {
    action_sender: flume::Sender<A>,
    reply_timeout: Duration,
}

impl<A: Send + 'static> NetworkStore<A> {
    /// Spawns the runtime thread and blocks until the client has connected
    pub fn start<C: Send + Sync + 'static>(
        thread_name: &str,
        reply_timeout: Duration,
        client: ClientFuture<C>,
        task: fn(Arc<C>, A) -> TaskFuture,
    ) -> StoreResult<Self> {
        let (action_sender, action_receiver) = flume::unbounded::<A>();
        let (ready_sender, ready_receiver) = oneshot::channel::<StoreResult<()>>();

        thread::Builder::new()
            .name(thread_name.to_string())
            .spawn(move || {
                let rt = match Builder::new_current_thread().enable_all().build() {
                    Ok(rt) => rt,
                    Err(e) => {
                        let _ = ready_sender.send(Err(StoreError::Unavailable(to_generic_error(e))));
                        return;
                    }
                };

                rt.block_on(async move {
                    let client = match client.await {
                        Ok(client) => Arc::new(client),
                        Err(e) => {
                            let _ = ready_sender.send(Err(e));
                            return;
                        }
                    };

                    let _ = ready_sender.send(Ok(()));

                    // Exits once every NetworkStore handle has been dropped
                    while let Ok(request) = action_receiver.recv_async().await {
                        tokio::spawn(task(client.clone(), request));
                    }
                });
            })
            .map_err(|e| StoreError::Unavailable(to_generic_error(e)))?;

        ready_receiver
            .recv()
            .map_err(|_| StoreError::Unavailable(anyhow!("store runtime exited before connecting")))??;

        Ok(Self {
            action_sender,
            reply_timeout,
        })
    }

    pub fn request<T>(&self, action: impl FnOnce(Reply<T>) -> A) -> StoreResult<T> {
        let (sender, receiver) = oneshot::channel::<StoreResult<T>>();

        self.action_sender
            .send(action(sender))
            .map_err(|_| StoreError::Unavailable(anyhow!("store runtime has shut down")))?;

        match receiver.recv_timeout(self.reply_timeout) {
            Ok(result) => result,
            Err(oneshot::RecvTimeoutError::Timeout) => Err(StoreError::Unavailable(anyhow!(
                "store did not reply within {}ms",
                self.reply_timeout.as_millis()
            ))),
            Err(oneshot::RecvTimeoutError::Disconnected) => Err(StoreError::Unavailable(anyhow!(
                "store dropped the request"
            ))),
        }
    }
}
