//! Host execution contexts.
//!
//! - **Primary**: a single tokio task that runs queued closures one at a
//!   time, in submission order. All block mutation happens here.
//! - **Auxiliary**: `spawn_blocking` for searches that may take a while.
//! - **Delayed**: sleep on a timer task, then run.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Clone)]
pub struct Scheduler {
    primary: mpsc::UnboundedSender<Job>,
}

impl Scheduler {
    /// Spawn the primary task. Must be called from inside a tokio runtime.
    ///
    /// The primary task exits once every `Scheduler` clone has been dropped
    /// and the queue has drained.
    pub fn start() -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let handle = tokio::spawn(async move {
            tracing::debug!("Primary context started");
            let mut executed = 0u64;
            while let Some(job) = rx.recv().await {
                job();
                executed += 1;
            }
            tracing::debug!("Primary context stopped after {} jobs", executed);
        });
        (Self { primary: tx }, handle)
    }

    /// Queue `job` on the primary context. Returns false if the primary
    /// task is gone.
    pub fn run_on_primary(&self, job: impl FnOnce() + Send + 'static) -> bool {
        self.primary.send(Box::new(job)).is_ok()
    }

    /// Run `f` on the primary context and wait for its result.
    pub async fn call_on_primary<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let queued = self.run_on_primary(move || {
            // The caller may have given up waiting.
            let _ = tx.send(f());
        });
        if !queued {
            return Err(anyhow!("primary context is not running"));
        }
        rx.await.context("primary context dropped the job")
    }

    /// Run `f` on the blocking pool.
    pub async fn run_auxiliary<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        tokio::task::spawn_blocking(f)
            .await
            .context("auxiliary task panicked or was cancelled")
    }

    /// Run `fut` on its own task after `delay`. Any block mutation it does
    /// still has to go through the primary context.
    pub fn spawn_later<R, F>(&self, delay: Duration, fut: F) -> JoinHandle<R>
    where
        R: Send + 'static,
        F: Future<Output = R> + Send + 'static,
    {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fut.await
        })
    }
}
