//! Dedicated OS thread acting as the UI-owning execution context.
//!
//! The thread owns the receiving end of a `std::sync::mpsc` channel and runs
//! each job to completion before taking the next one, which gives the FIFO,
//! one-at-a-time guarantee the executor relies on.  On platforms with a real
//! main loop the same role is played by the loop itself; on a headless agent
//! this thread *is* the UI context.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use super::{UiContext, UiFault, UiJob};

/// A named thread that drains [`UiJob`]s in submission order.
pub struct DedicatedUiThread {
    name: String,
    /// `None` once [`shutdown`](Self::shutdown) has been called.
    sender: Mutex<Option<Sender<UiJob>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl DedicatedUiThread {
    /// Spawns the UI thread.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the OS refuses to create the thread.
    pub fn spawn(name: impl Into<String>) -> std::io::Result<Self> {
        let name = name.into();
        let (tx, rx) = mpsc::channel::<UiJob>();

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || run_ui_loop(rx))?;

        info!("UI context thread '{name}' started");

        Ok(Self {
            name,
            sender: Mutex::new(Some(tx)),
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Stops accepting work, lets already-queued jobs finish, and joins the thread.
    ///
    /// Blocks the calling thread until the queue has drained.  Calling it more
    /// than once is harmless.
    pub fn shutdown(&self) {
        // Dropping the last sender ends the `recv` loop once the queue is empty.
        self.sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        let handle = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::error!("UI context thread '{}' terminated abnormally", self.name);
            } else {
                info!("UI context thread '{}' stopped", self.name);
            }
        }
    }
}

impl DedicatedUiThread {
    /// [`shutdown`](Self::shutdown) for async callers.
    ///
    /// The join runs on tokio's blocking pool, so a unit of work that is still
    /// running on the UI thread does not stall a runtime worker.
    pub async fn close(self: Arc<Self>) {
        let name = self.name.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || self.shutdown()).await {
            tracing::error!("joining UI context thread '{name}' failed: {e}");
        }
    }
}

impl UiContext for DedicatedUiThread {
    fn submit(&self, job: UiJob) -> Result<(), UiFault> {
        let guard = self
            .sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match guard.as_ref() {
            Some(tx) => tx.send(job).map_err(|_| UiFault::Unavailable),
            None => Err(UiFault::Unavailable),
        }
    }
}

impl Drop for DedicatedUiThread {
    fn drop(&mut self) {
        // Close the queue; the thread exits on its own after draining it.
        if let Ok(mut sender) = self.sender.lock() {
            sender.take();
        }
    }
}

/// Entry point of the UI thread.
fn run_ui_loop(rx: Receiver<UiJob>) {
    let mut executed: u64 = 0;
    while let Ok(job) = rx.recv() {
        job();
        executed += 1;
    }
    debug!("UI loop drained after {executed} jobs");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use std::time::Duration;

    #[test]
    fn test_submitted_job_runs_on_named_thread() {
        // Arrange
        let ui = DedicatedUiThread::spawn("overlay-ui-test").unwrap();
        let (tx, rx) = channel();

        // Act
        ui.submit(Box::new(move || {
            tx.send(thread::current().name().map(str::to_string)).unwrap();
        }))
        .unwrap();

        // Assert
        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some("overlay-ui-test"));
    }

    #[test]
    fn test_shutdown_drains_queued_jobs_first() {
        let ui = DedicatedUiThread::spawn("drain-test").unwrap();
        let (tx, rx) = channel();
        for i in 0..5 {
            let tx = tx.clone();
            ui.submit(Box::new(move || tx.send(i).unwrap())).unwrap();
        }

        ui.shutdown();

        let got: Vec<i32> = rx.try_iter().collect();
        assert_eq!(got, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_close_does_not_block_the_runtime() {
        // Arrange: a slow job is running when close is requested
        let ui = Arc::new(DedicatedUiThread::spawn("close-test").unwrap());
        let (tx, rx) = channel();
        ui.submit(Box::new(move || {
            thread::sleep(Duration::from_millis(300));
            tx.send(()).unwrap();
        }))
        .unwrap();

        let ticks = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let ticker_ticks = Arc::clone(&ticks);
        let ticker = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(10)).await;
                ticker_ticks.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            }
        });

        // Act
        ui.clone().close().await;
        ticker.abort();

        // Assert: the single runtime thread kept running other tasks
        assert!(rx.try_recv().is_ok(), "queued job must finish before close returns");
        assert!(ticks.load(std::sync::atomic::Ordering::Relaxed) >= 5);
        assert_eq!(ui.submit(Box::new(|| {})), Err(UiFault::Unavailable));
    }

    #[test]
    fn test_submit_after_shutdown_is_unavailable() {
        let ui = DedicatedUiThread::spawn("closed-test").unwrap();
        ui.shutdown();
        ui.shutdown(); // second call is a no-op

        let result = ui.submit(Box::new(|| {}));
        assert_eq!(result, Err(UiFault::Unavailable));
    }
}
