use {
    async_trait::async_trait,
    futures::future::join_all,
    std::{
        sync::{
            Arc, Mutex, PoisonError,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    },
    tokio::{runtime::Handle, task::JoinHandle, time::Instant},
};

use crate::{
    data::BackendApi,
    domain::SeriesId,
    engine::{Liveness, RefreshLoop, RefreshTask, SharedSnapshot, feeds::refresh_series},
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// One burst tick refreshes every burst series concurrently.
struct BurstTask {
    api: Arc<BackendApi>,
    snapshot: SharedSnapshot,
}

#[async_trait]
impl RefreshTask for BurstTask {
    fn label(&self) -> &'static str {
        "burst"
    }

    async fn run_once(&self, alive: &Liveness) {
        join_all(
            SeriesId::BURST
                .iter()
                .map(|series| refresh_series(*series, &self.api, &self.snapshot, alive)),
        )
        .await;
    }
}

struct BurstSession {
    armed_at: Instant,
    deadline: Instant,
    // Dropping the session stops the loop
    _burst_loop: RefreshLoop,
    deadline_timer: JoinHandle<()>,
}

type SessionSlot = Arc<Mutex<Option<BurstSession>>>;

/// Decrements the live-timer count however the timer task ends (fired or aborted).
struct TimerGuard(Arc<AtomicUsize>);

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Time-boxed fast polling of characters and wealth history after a login round-trip.
///
/// The backend sync it waits on has no completion signal, so the session ends
/// on its wall-clock deadline no matter what the fetches return.
pub struct BurstSyncController {
    api: Arc<BackendApi>,
    snapshot: SharedSnapshot,
    handle: Handle,
    poll_interval: Duration,
    max_duration: Duration,
    session: SessionSlot,
    live_timers: Arc<AtomicUsize>,
}

impl BurstSyncController {
    pub fn new(
        api: Arc<BackendApi>,
        snapshot: SharedSnapshot,
        handle: Handle,
        poll_interval: Duration,
        max_duration: Duration,
    ) -> Self {
        Self {
            api,
            snapshot,
            handle,
            poll_interval,
            max_duration,
            session: Arc::new(Mutex::new(None)),
            live_timers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Start a session, or push the deadline of the running one out to
    /// `now + max_duration`. Never runs two burst loops.
    pub fn arm(&self) {
        let now = Instant::now();
        let deadline = now + self.max_duration;
        let mut session = lock(&self.session);

        match session.as_mut() {
            Some(active) => {
                active.deadline_timer.abort();
                active.deadline = deadline;
                active.deadline_timer = self.spawn_deadline_timer(deadline);

                #[cfg(debug_assertions)]
                if DF.log_burst_sync {
                    log::info!(
                        "[burst] re-armed {:?} after start, deadline reset to {:?}",
                        now - active.armed_at,
                        self.max_duration
                    );
                }
            }
            None => {
                let mut burst_loop = RefreshLoop::new(
                    Arc::new(BurstTask {
                        api: self.api.clone(),
                        snapshot: self.snapshot.clone(),
                    }),
                    self.poll_interval,
                );
                burst_loop.start(&self.handle);

                *session = Some(BurstSession {
                    armed_at: now,
                    deadline,
                    _burst_loop: burst_loop,
                    deadline_timer: self.spawn_deadline_timer(deadline),
                });
                self.snapshot.write().burst_active = true;

                log::info!(
                    "Burst sync armed: every {:?} for up to {:?}",
                    self.poll_interval,
                    self.max_duration
                );
            }
        }
    }

    /// Stop the session early. No-op when not armed.
    pub fn disarm(&self) {
        let ended = {
            let mut session = lock(&self.session);
            let Some(ended) = session.take() else {
                return;
            };
            // Flag follows the session under the same lock `arm` holds
            self.snapshot.write().burst_active = false;
            ended
        };
        ended.deadline_timer.abort();
        log::info!(
            "Burst sync disarmed after {:?}",
            Instant::now() - ended.armed_at
        );
    }

    pub fn is_armed(&self) -> bool {
        lock(&self.session).is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        lock(&self.session).as_ref().map(|s| s.deadline)
    }

    /// Deadline timer tasks that have neither fired nor been cancelled.
    pub fn live_deadline_timers(&self) -> usize {
        self.live_timers.load(Ordering::SeqCst)
    }

    fn spawn_deadline_timer(&self, deadline: Instant) -> JoinHandle<()> {
        let session = self.session.clone();
        let snapshot = self.snapshot.clone();
        self.live_timers.fetch_add(1, Ordering::SeqCst);
        let guard = TimerGuard(self.live_timers.clone());

        self.handle.spawn(async move {
            let _guard = guard;
            tokio::time::sleep_until(deadline).await;

            let expired = {
                let mut slot = lock(&session);
                // A re-arm may have raced this wake-up
                match slot.as_ref() {
                    Some(active) if Instant::now() >= active.deadline => {
                        snapshot.write().burst_active = false;
                        slot.take()
                    }
                    _ => None,
                }
            };
            if let Some(ended) = expired {
                log::info!(
                    "Burst sync expired after {:?}",
                    Instant::now() - ended.armed_at
                );
            }
        })
    }
}

impl Drop for BurstSyncController {
    fn drop(&mut self) {
        self.disarm();
    }
}

fn lock(session: &SessionSlot) -> std::sync::MutexGuard<'_, Option<BurstSession>> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{LaunchContext, ResilientFetcher},
        testing::ScriptedTransport,
    };
    use tokio::time::sleep;

    const SECS_3: Duration = Duration::from_secs(3);
    const SECS_90: Duration = Duration::from_secs(90);

    fn controller(transport: Arc<ScriptedTransport>) -> BurstSyncController {
        let nav = Arc::new(LaunchContext::parse("http://localhost:5173/").unwrap());
        let api = Arc::new(BackendApi::new(ResilientFetcher::new(transport, "", nav)));
        BurstSyncController::new(api, SharedSnapshot::new(), Handle::current(), SECS_3, SECS_90)
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn expires_on_deadline_even_when_every_fetch_fails() {
        let transport = ScriptedTransport::new();
        transport.unreachable("http://localhost");
        let burst = controller(transport.clone());

        burst.arm();
        assert!(burst.is_armed());
        assert!(burst.snapshot.read().burst_active);

        sleep(Duration::from_secs(89)).await;
        assert!(burst.is_armed());

        sleep(Duration::from_secs(1)).await;
        settle().await;
        assert!(!burst.is_armed());
        assert!(!burst.snapshot.read().burst_active);
        assert_eq!(burst.live_deadline_timers(), 0);

        // Both endpoints were tried for both series on every tick
        let during = transport.calls().len();
        assert!(during >= 4 * 30);
        sleep(Duration::from_secs(30)).await;
        assert_eq!(transport.calls().len(), during);
    }

    #[tokio::test(start_paused = true)]
    async fn re_arm_resets_deadline_without_a_second_loop() {
        let transport = ScriptedTransport::new();
        transport.respond("/api/user/characters", 200, r#"{"characters": [], "total_gold": 0}"#);
        transport.respond("/api/user/gold-history", 200, r#"{"history": []}"#);
        let burst = controller(transport.clone());

        burst.arm();
        let first_deadline = burst.deadline().unwrap();

        sleep(Duration::from_secs(60)).await;
        burst.arm();
        settle().await;
        assert_eq!(burst.live_deadline_timers(), 1);
        assert_eq!(burst.deadline().unwrap(), first_deadline + Duration::from_secs(60));

        // One loop: one characters call per 3 s tick, not two
        let before = transport.calls_to("/api/user/characters");
        sleep(Duration::from_secs(30)).await;
        settle().await;
        let ticks = transport.calls_to("/api/user/characters") - before;
        assert!((10..=12).contains(&ticks), "ticks = {}", ticks);

        // Past the original deadline, still armed
        assert!(burst.is_armed());
        sleep(Duration::from_secs(61)).await;
        settle().await;
        assert!(!burst.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn active_flag_tracks_session_across_expiry_and_rearm() {
        let burst = controller(ScriptedTransport::healthy());

        burst.arm();
        sleep(SECS_90).await;
        settle().await;
        assert!(!burst.is_armed());
        assert!(!burst.snapshot.read().burst_active);

        burst.arm();
        settle().await;
        assert!(burst.is_armed());
        assert!(burst.snapshot.read().burst_active);

        burst.disarm();
        assert!(!burst.snapshot.read().burst_active);
        burst.arm();
        assert!(burst.snapshot.read().burst_active);
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_disarm_wins_over_deadline() {
        let transport = ScriptedTransport::new();
        let burst = controller(transport.clone());

        burst.arm();
        sleep(Duration::from_secs(10)).await;
        burst.disarm();
        settle().await;

        assert!(!burst.is_armed());
        assert_eq!(burst.live_deadline_timers(), 0);
        let calls = transport.calls().len();
        sleep(Duration::from_secs(120)).await;
        assert_eq!(transport.calls().len(), calls);

        // Disarming twice is harmless
        burst.disarm();
    }
}
