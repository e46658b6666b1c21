//! Tick scheduling and transition orchestration around `TimerEngine`.
//!
//! The driver owns the one-second tick schedule and translates engine
//! transitions into their side effects: durable session recording,
//! presenter callbacks and side-channel dispatch. Engine access is
//! serialized through a mutex, so tick handlers run to completion
//! before any control call proceeds -- the cooperative model of a
//! single event loop, kept under concurrency.
//!
//! ## Schedule ownership
//!
//! At most one tick schedule is live. Every `start`, `stop` and
//! `manual_break` bumps a generation counter; a tick that wakes up
//! holding a stale generation belongs to a superseded schedule and
//! exits without touching the engine. Storing a freshly spawned
//! schedule re-checks the generation under the same lock, so two
//! racing control calls always leave the newest schedule in place.
//! `stop` additionally aborts the schedule task, so no further ticks
//! fire once it returns.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::channels::ChannelSet;
use crate::error::StoreError;
use crate::events::{Indicator, Presenter, SoundKind};
use crate::storage::{self, Config, SessionStore};

use super::engine::{TickEvent, TimerEngine, TimerSnapshot};

const TICK_PERIOD: Duration = Duration::from_secs(1);
const BREAK_MESSAGE: &str = "Time for a break";
const FOCUS_MESSAGE: &str = "Back to work";

/// Drives a `TimerEngine` on a one-second schedule.
///
/// Must be created and used within a tokio runtime.
pub struct TimerDriver {
    shared: Arc<Shared>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

struct Shared {
    engine: Mutex<TimerEngine>,
    /// Generation of the active tick schedule; stale ticks are no-ops.
    generation: AtomicU64,
    store: Arc<SessionStore>,
    presenter: Arc<dyn Presenter>,
    channels: Arc<ChannelSet>,
    notify_enabled: bool,
    habit_enabled: bool,
    habit_goal: String,
    /// Outstanding completion side effects, awaited by `settle`.
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl TimerDriver {
    pub fn new(
        config: &Config,
        store: Arc<SessionStore>,
        presenter: Arc<dyn Presenter>,
        channels: Arc<ChannelSet>,
    ) -> Self {
        let shared = Arc::new(Shared {
            engine: Mutex::new(TimerEngine::new(config.intervals())),
            generation: AtomicU64::new(0),
            store,
            presenter,
            channels,
            notify_enabled: config.notifications.enabled,
            habit_enabled: config.habit.enabled,
            habit_goal: config.habit.goal.clone(),
            pending: Mutex::new(Vec::new()),
        });
        Self {
            shared,
            ticker: Mutex::new(None),
        }
    }

    /// Begin a fresh focus interval and (re)start the tick schedule.
    /// Any prior schedule is superseded, never doubled.
    pub fn start(&self) {
        let gen = self.shared.next_generation();
        {
            let mut engine = self.shared.lock_engine();
            engine.start();
            self.shared.presenter.on_indicator(Indicator::Active);
            self.shared
                .presenter
                .on_display_update(engine.mode(), &engine.display_time());
        }
        self.spawn_ticker(gen);
    }

    /// Halt the timer and cancel the tick schedule synchronously: once
    /// this returns, no further ticks fire.
    pub fn stop(&self) {
        self.shared.next_generation();
        if let Some(handle) = self.lock_ticker().take() {
            handle.abort();
        }
        let mut engine = self.shared.lock_engine();
        engine.stop();
        self.shared.presenter.on_indicator(Indicator::Idle);
        self.shared
            .presenter
            .on_display_update(engine.mode(), &engine.display_time());
    }

    /// Enter a break immediately, restarting the tick schedule. Counts
    /// nothing; the habit channel still hears about the break.
    pub fn manual_break(&self) {
        let gen = self.shared.next_generation();
        {
            let mut engine = self.shared.lock_engine();
            engine.begin_manual_break();
            self.shared.presenter.on_indicator(Indicator::Break);
            self.shared
                .presenter
                .on_display_update(engine.mode(), &engine.display_time());
        }
        self.shared.dispatch_habit();
        self.spawn_ticker(gen);
    }

    /// Today's completed-session count, straight from the store.
    pub fn today_count(&self) -> Result<u32, StoreError> {
        self.shared.store.count_for(storage::today())
    }

    /// Engine snapshot with today's count filled in (best effort; the
    /// slot stays empty if the read fails).
    pub fn snapshot(&self) -> TimerSnapshot {
        let mut snapshot = self.shared.lock_engine().snapshot();
        snapshot.today_count = self.shared.store.count_for(storage::today()).ok();
        snapshot
    }

    /// Wait for every dispatched completion side effect to finish.
    /// Called before shutdown so a recording in flight is not lost.
    pub async fn settle(&self) {
        let handles: Vec<JoinHandle<()>> = self.shared.lock_pending().drain(..).collect();
        for handle in handles {
            let _ = handle.await;
        }
    }

    fn spawn_ticker(&self, gen: u64) {
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            let first = time::Instant::now() + TICK_PERIOD;
            let mut interval = time::interval_at(first, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !shared.run_tick(gen) {
                    break;
                }
            }
        });
        let mut slot = self.lock_ticker();
        // A racing control call may have bumped the generation again
        // before this handle was stored; the superseded task must not
        // displace the live schedule.
        if gen != self.shared.generation.load(Ordering::SeqCst) {
            handle.abort();
            return;
        }
        if let Some(old) = slot.replace(handle) {
            old.abort();
        }
    }

    fn lock_ticker(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.ticker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TimerDriver {
    fn drop(&mut self) {
        let slot = self.ticker.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

impl Shared {
    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn lock_engine(&self) -> MutexGuard<'_, TimerEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_pending(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One tick of the active schedule. Returns false when this
    /// schedule has been superseded and its task should exit.
    ///
    /// Holds the engine lock for the whole handler so control calls
    /// observe either the state before the tick or after it, never a
    /// half-applied transition.
    fn run_tick(&self, gen: u64) -> bool {
        let mut engine = self.lock_engine();
        if gen != self.generation.load(Ordering::SeqCst) {
            return false;
        }
        if !engine.is_running() {
            return false;
        }

        match engine.tick() {
            Some(TickEvent::FocusCompleted) => {
                self.presenter.on_indicator(Indicator::Break);
                self.dispatch_completion();
                self.presenter.on_sound(SoundKind::FocusEnd);
                if self.notify_enabled {
                    self.channels.dispatch_notify(BREAK_MESSAGE);
                }
                self.dispatch_habit();
            }
            Some(TickEvent::BreakCompleted) => {
                self.presenter.on_indicator(Indicator::Active);
                self.presenter.on_sound(SoundKind::BreakEnd);
                if self.notify_enabled {
                    self.channels.dispatch_notify(FOCUS_MESSAGE);
                }
            }
            None => {}
        }

        self.presenter
            .on_display_update(engine.mode(), &engine.display_time());
        true
    }

    /// Record today's completion off the tick path and tell the
    /// presenter the updated count. A failed write is logged and the
    /// count re-read so the display can still move; the tick schedule
    /// never waits on any of it.
    fn dispatch_completion(&self) {
        let store = Arc::clone(&self.store);
        let presenter = Arc::clone(&self.presenter);
        let date = storage::today();
        let handle = tokio::task::spawn_blocking(move || {
            match store.record_completion(date) {
                Ok(count) => presenter.on_session_completed(count),
                Err(e) => {
                    tracing::error!("failed to record completed session: {e}");
                    match store.count_for(date) {
                        Ok(count) => presenter.on_session_completed(count),
                        Err(e) => tracing::error!("failed to re-read today's count: {e}"),
                    }
                }
            }
        });
        let mut pending = self.lock_pending();
        pending.retain(|handle| !handle.is_finished());
        pending.push(handle);
    }

    fn dispatch_habit(&self) {
        if self.habit_enabled && !self.habit_goal.is_empty() {
            self.channels.dispatch_habit(&self.habit_goal);
        }
    }
}
