//! Fixed-cadence tick source for an [`IntervalEngine`].
//!
//! The engine itself holds no timer. `Ticker` owns at most one tokio task
//! that calls `tick()` once per period, and starts or cancels it as the
//! engine accepts commands. Every engine access, tick or command, happens
//! under one mutex.
//!
//! A generation counter lives next to the engine under that mutex. Each
//! accepted command bumps it, and a tick task only touches the engine while
//! its own generation is current, so a canceled task can never fire one
//! more tick even if it was already waiting on the lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::events::Event;
use crate::timer::IntervalEngine;

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Shared {
    engine: IntervalEngine,
    generation: u64,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drives an engine from a single repeating tokio interval.
///
/// Accepted commands are forwarded on the event channel. While ticking, every
/// tick sends the transition event (if any) followed by a `StateSnapshot`.
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Ticker {
    shared: Arc<Mutex<Shared>>,
    events: mpsc::UnboundedSender<Event>,
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Wrap an engine with the default one-second period.
    pub fn new(engine: IntervalEngine) -> (Self, mpsc::UnboundedReceiver<Event>) {
        Self::with_period(engine, DEFAULT_TICK_PERIOD)
    }

    pub fn with_period(
        engine: IntervalEngine,
        period: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (events, rx) = mpsc::unbounded_channel();
        let ticker = Self {
            shared: Arc::new(Mutex::new(Shared {
                engine,
                generation: 0,
            })),
            events,
            period,
            task: None,
        };
        (ticker, rx)
    }

    /// Whether a tick task is currently active.
    pub fn is_ticking(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Read the engine under the lock.
    pub fn with_engine<R>(&self, f: impl FnOnce(&IntervalEngine) -> R) -> R {
        f(&lock(&self.shared).engine)
    }

    /// Mutate the engine configuration under the lock.
    ///
    /// Not for commands: use the methods on `Ticker` so the tick task
    /// follows the engine.
    pub fn configure<R>(&self, f: impl FnOnce(&mut IntervalEngine) -> R) -> R {
        f(&mut lock(&self.shared).engine)
    }

    pub fn snapshot(&self) -> Event {
        self.with_engine(IntervalEngine::snapshot)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.command(true, IntervalEngine::start)
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.command(false, IntervalEngine::pause)
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.command(true, IntervalEngine::resume)
    }

    pub fn restart(&mut self) -> Option<Event> {
        self.command(true, IntervalEngine::restart)
    }

    pub fn clear(&mut self) -> Option<Event> {
        self.command(false, IntervalEngine::clear)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn command<F>(&mut self, respawn: bool, f: F) -> Option<Event>
    where
        F: FnOnce(&mut IntervalEngine) -> Option<Event>,
    {
        let (event, generation) = {
            let mut shared = lock(&self.shared);
            let event = f(&mut shared.engine)?;
            shared.generation += 1;
            (event, shared.generation)
        };
        self.cancel_task();
        if respawn {
            self.spawn_task(generation);
        }
        // receiver may be gone during teardown
        let _ = self.events.send(event.clone());
        Some(event)
    }

    fn cancel_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("tick task canceled");
        }
    }

    fn spawn_task(&mut self, generation: u64) {
        let shared = Arc::clone(&self.shared);
        let events = self.events.clone();
        let period = self.period;
        debug!(generation, ?period, "tick task started");

        self.task = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let (transition, snapshot) = {
                    let mut shared = lock(&shared);
                    if shared.generation != generation {
                        trace!(generation, "stale tick task exiting");
                        return;
                    }
                    let transition = shared.engine.tick();
                    (transition, shared.engine.snapshot())
                };
                let done = matches!(transition, Some(Event::WorkoutCompleted { .. }));
                if let Some(event) = transition {
                    if events.send(event).is_err() {
                        return;
                    }
                }
                if events.send(snapshot).is_err() || done {
                    return;
                }
            }
        }));
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        lock(&self.shared).generation += 1;
        self.cancel_task();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{Phase, Workout};

    fn engine(get_ready: u32, secs: u32) -> IntervalEngine {
        let mut w = Workout::default();
        w.set_get_ready_secs(get_ready);
        w.set_global_exercise_secs(secs).unwrap();
        w.set_rounds(1).unwrap();
        IntervalEngine::new(w)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    fn snapshots(events: &[Event]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, Event::StateSnapshot { .. }))
            .count()
    }

    #[tokio::test(start_paused = true)]
    async fn runs_to_completion_once_per_second() {
        let (mut ticker, mut rx) = Ticker::new(engine(2, 3));
        let began = Instant::now();
        assert!(ticker.start().is_some());
        assert!(ticker.is_ticking());

        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            let done = matches!(event, Event::WorkoutCompleted { .. });
            seen.push(event);
            if done {
                break;
            }
        }
        assert_eq!(began.elapsed(), Duration::from_secs(5));
        assert!(matches!(seen[0], Event::WorkoutStarted { .. }));
        assert_eq!(snapshots(&seen), 4, "completion tick sends its snapshot after");
        assert!(seen
            .iter()
            .any(|e| matches!(e, Event::PhaseEntered { phase: Phase::Run, .. })));

        assert!(matches!(rx.recv().await, Some(Event::StateSnapshot { phase: Phase::Completed, .. })));
        ticker.with_engine(|e| assert_eq!(e.phase(), Phase::Completed));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_ticks_and_resume_continues() {
        let (mut ticker, mut rx) = Ticker::new(engine(10, 30));
        ticker.start();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(snapshots(&drain(&mut rx)), 2);

        assert!(ticker.pause().is_some());
        assert!(!ticker.is_ticking());
        assert!(ticker.pause().is_none());
        tokio::time::sleep(Duration::from_secs(10)).await;
        let after_pause = drain(&mut rx);
        assert_eq!(after_pause.len(), 1);
        assert!(matches!(after_pause[0], Event::WorkoutPaused { remaining_secs: 8, .. }));

        ticker.resume();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(snapshots(&drain(&mut rx)), 1);
        ticker.with_engine(|e| assert_eq!(e.remaining_secs(), 7));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_keeps_a_single_tick_source() {
        let (mut ticker, mut rx) = Ticker::new(engine(10, 30));
        ticker.start();
        tokio::time::sleep(Duration::from_millis(3500)).await;
        ticker.pause();
        assert!(ticker.restart().is_some());
        drain(&mut rx);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(snapshots(&drain(&mut rx)), 3);
        ticker.with_engine(|e| {
            assert_eq!(e.phase(), Phase::GetReady);
            assert_eq!(e.remaining_secs(), 7);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn ignored_commands_leave_task_alone() {
        let (mut ticker, mut rx) = Ticker::new(engine(10, 30));
        ticker.start();
        assert!(ticker.clear().is_none());
        assert!(ticker.start().is_none());
        assert!(ticker.is_ticking());
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(snapshots(&drain(&mut rx)), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cancels_the_task() {
        let (mut ticker, mut rx) = Ticker::new(engine(10, 30));
        ticker.start();
        drop(ticker);
        let closed = tokio::time::timeout(Duration::from_secs(5), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(closed.is_ok(), "channel should close once the task is gone");
    }

    #[tokio::test(start_paused = true)]
    async fn configure_goes_through_the_lock() {
        let (ticker, _rx) = Ticker::new(engine(10, 30));
        ticker.configure(|e| e.set_rounds(4)).unwrap();
        ticker.with_engine(|e| assert_eq!(e.workout().rounds(), 4));
    }
}
