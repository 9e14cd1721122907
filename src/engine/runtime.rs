use {
    anyhow::{Context, Result},
    std::thread,
    tokio::{runtime::Handle, sync::oneshot},
};

/// Dedicated thread driving a single-threaded tokio runtime for all sync work.
/// The UI thread never blocks on it; it only spawns onto `handle()`.
pub struct SyncRuntime {
    handle: Handle,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl SyncRuntime {
    pub fn start() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build sync runtime")?;
        let handle = runtime.handle().clone();
        let (shutdown, stop) = oneshot::channel::<()>();

        let thread = thread::Builder::new()
            .name("sync-runtime".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    // Either an explicit shutdown or the sender being dropped
                    let _ = stop.await;
                });
                log::info!("Sync runtime stopped");
            })
            .context("Failed to spawn sync runtime thread")?;

        Ok(Self {
            handle,
            shutdown: Some(shutdown),
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }
}

impl Drop for SyncRuntime {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            log::error!("Sync runtime thread panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn spawned_work_runs_on_the_sync_thread() {
        let runtime = SyncRuntime::start().unwrap();
        let (tx, rx) = mpsc::channel();

        runtime.handle().spawn(async move {
            tx.send(thread::current().name().map(str::to_string)).unwrap();
        });

        let name = rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some("sync-runtime"));
    }
}
