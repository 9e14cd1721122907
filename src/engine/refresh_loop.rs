use {
    async_trait::async_trait,
    std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    },
    tokio::{runtime::Handle, task::JoinHandle},
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Cleared once the owner of a fetch has gone away.
/// Checked under the snapshot write lock before any completion is applied.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn kill(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// One tick's worth of work for a refresh loop.
#[async_trait]
pub trait RefreshTask: Send + Sync + 'static {
    fn label(&self) -> &'static str;

    /// Fetch and apply. Must not write anything once `alive` is cleared.
    async fn run_once(&self, alive: &Liveness);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

/// Fixed-rate repeating fetch with an immediate first tick.
///
/// Every tick spawns its own fetch, so a slow fetch never delays the next tick.
/// Overlapping completions are ordered by the snapshot's sequence numbers.
/// `Stopped` is terminal: restart by building a new loop.
pub struct RefreshLoop {
    task: Arc<dyn RefreshTask>,
    interval: Duration,
    state: LoopState,
    alive: Liveness,
    ticker: Option<JoinHandle<()>>,
}

impl RefreshLoop {
    pub fn new(task: Arc<dyn RefreshTask>, interval: Duration) -> Self {
        Self {
            task,
            // tokio intervals panic on zero
            interval: interval.max(Duration::from_millis(1)),
            state: LoopState::Idle,
            alive: Liveness::new(),
            ticker: None,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Idle -> Running. Returns false (and does nothing) from any other state.
    pub fn start(&mut self, handle: &Handle) -> bool {
        if self.state != LoopState::Idle {
            log::warn!(
                "Ignoring start of {} loop in state {:?}",
                self.task.label(),
                self.state
            );
            return false;
        }

        #[cfg(debug_assertions)]
        if DF.log_loop_lifecycle {
            log::info!(
                "[loop] start {} every {:?}",
                self.task.label(),
                self.interval
            );
        }

        let task = self.task.clone();
        let alive = self.alive.clone();
        let interval = self.interval;
        let spawner = handle.clone();

        self.ticker = Some(handle.spawn(async move {
            // First tick completes immediately; missed ticks are caught up (fixed-rate)
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if !alive.is_alive() {
                    break;
                }
                let task = task.clone();
                let alive = alive.clone();
                spawner.spawn(async move {
                    task.run_once(&alive).await;
                });
            }
        }));
        self.state = LoopState::Running;
        true
    }

    /// Running -> Stopped. In-flight fetches keep running but can no longer write.
    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.alive.kill();
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }

        #[cfg(debug_assertions)]
        if DF.log_loop_lifecycle && self.state == LoopState::Running {
            log::info!("[loop] stop {}", self.task.label());
        }

        self.state = LoopState::Stopped;
    }
}

impl Drop for RefreshLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::time::{advance, sleep};

    #[derive(Default)]
    struct CountingTask {
        runs: AtomicUsize,
        work: Duration,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl RefreshTask for CountingTask {
        fn label(&self) -> &'static str {
            "counting"
        }

        async fn run_once(&self, alive: &Liveness) {
            self.runs.fetch_add(1, Ordering::SeqCst);
            sleep(self.work).await;
            if alive.is_alive() {
                self.writes.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_is_immediate_then_fixed_rate() {
        let task = Arc::new(CountingTask::default());
        let mut refresh = RefreshLoop::new(task.clone(), Duration::from_secs(60));
        assert_eq!(refresh.state(), LoopState::Idle);

        assert!(refresh.start(&Handle::current()));
        settle().await;
        assert_eq!(task.runs.load(Ordering::SeqCst), 1);

        advance(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(task.runs.load(Ordering::SeqCst), 2);

        advance(Duration::from_secs(120)).await;
        settle().await;
        assert_eq!(task.runs.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_does_not_delay_next_tick() {
        let task = Arc::new(CountingTask {
            work: Duration::from_secs(25),
            ..Default::default()
        });
        let mut refresh = RefreshLoop::new(task.clone(), Duration::from_secs(10));
        refresh.start(&Handle::current());

        sleep(Duration::from_secs(21)).await;
        settle().await;
        assert_eq!(task.runs.load(Ordering::SeqCst), 3);
        assert_eq!(task.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_terminal_and_silences_in_flight_work() {
        let task = Arc::new(CountingTask {
            work: Duration::from_secs(5),
            ..Default::default()
        });
        let mut refresh = RefreshLoop::new(task.clone(), Duration::from_secs(60));
        refresh.start(&Handle::current());
        settle().await;

        refresh.stop();
        assert_eq!(refresh.state(), LoopState::Stopped);
        assert!(!refresh.start(&Handle::current()));

        sleep(Duration::from_secs(300)).await;
        assert_eq!(task.runs.load(Ordering::SeqCst), 1);
        assert_eq!(task.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_a_loop_stops_it() {
        let task = Arc::new(CountingTask::default());
        {
            let mut refresh = RefreshLoop::new(task.clone(), Duration::from_secs(1));
            refresh.start(&Handle::current());
            settle().await;
        }
        sleep(Duration::from_secs(10)).await;
        assert_eq!(task.runs.load(Ordering::SeqCst), 1);
    }
}
