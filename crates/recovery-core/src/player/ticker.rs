//! Async tick source for the routine player.
//!
//! A [`Ticker`] owns the player behind a mutex and at most one interval
//! task. Every tick locks the player and applies one `tick()` as a single
//! read-modify-write. Starting a routine aborts any previous task before
//! spawning the next one, and `exit()` or dropping the ticker releases it,
//! so there is never more than one live tick source.
//!
//! Missed ticks are not replayed: the modeled countdown may drift from
//! wall-clock time when the runtime is busy.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::clock::Clock;
use super::engine::{CompletedRun, PlayerState, PlayerStatus, RoutinePlayer};
use crate::events::Event;
use crate::routine::Routine;

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct Ticker {
    player: Arc<Mutex<RoutinePlayer>>,
    task: Option<JoinHandle<()>>,
    period: Duration,
    events: mpsc::UnboundedSender<Event>,
}

impl Ticker {
    /// Create a ticker and the receiving end of its event stream.
    pub fn new(period: Duration) -> (Self, mpsc::UnboundedReceiver<Event>) {
        Self::from_player(period, RoutinePlayer::new())
    }

    /// Like [`Ticker::new`], with event timestamps taken from `clock`.
    pub fn with_clock(
        period: Duration,
        clock: Arc<dyn Clock>,
    ) -> (Self, mpsc::UnboundedReceiver<Event>) {
        Self::from_player(period, RoutinePlayer::with_clock(clock))
    }

    fn from_player(
        period: Duration,
        player: RoutinePlayer,
    ) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let ticker = Self {
            player: Arc::new(Mutex::new(player)),
            task: None,
            period,
            events: tx,
        };
        (ticker, rx)
    }

    /// True while an interval task is alive.
    pub fn is_ticking(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub async fn status(&self) -> PlayerStatus {
        self.player.lock().await.status()
    }

    pub async fn state(&self) -> PlayerState {
        self.player.lock().await.state()
    }

    pub async fn snapshot(&self) -> Event {
        self.player.lock().await.snapshot()
    }

    pub async fn completion(&self) -> Option<CompletedRun> {
        self.player.lock().await.completion()
    }

    /// Start `routine`, replacing whatever was running.
    pub async fn start(&mut self, routine: Routine) -> Event {
        self.release();
        let event = self.player.lock().await.start(routine);
        self.emit(&event);
        self.spawn();
        event
    }

    pub async fn pause(&self) -> Option<Event> {
        let event = self.player.lock().await.pause();
        self.emit_opt(&event);
        event
    }

    pub async fn resume(&self) -> Option<Event> {
        let event = self.player.lock().await.resume();
        self.emit_opt(&event);
        event
    }

    /// Stop without completing. A stopped run cannot resume, so the tick
    /// source is released here too.
    pub async fn stop(&mut self) -> Option<Event> {
        self.release();
        let event = self.player.lock().await.stop();
        self.emit_opt(&event);
        event
    }

    /// Leave the routine and release the tick source.
    pub async fn exit(&mut self) -> Option<Event> {
        self.release();
        let event = self.player.lock().await.exit();
        self.emit_opt(&event);
        event
    }

    fn spawn(&mut self) {
        let player = Arc::clone(&self.player);
        let events = self.events.clone();
        let period = self.period;

        tracing::debug!(period_ms = period.as_millis() as u64, "ticker started");
        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let (event, done) = {
                    let mut guard = player.lock().await;
                    let event = guard.tick();
                    (event, guard.status() == PlayerStatus::Completed)
                };
                if let Some(event) = event {
                    // Nobody listening is fine; the player state is the source of truth.
                    let _ = events.send(event);
                }
                if done {
                    tracing::debug!("ticker finished");
                    break;
                }
            }
        }));
    }

    fn release(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                tracing::debug!("ticker aborted");
            }
            task.abort();
        }
    }

    fn emit(&self, event: &Event) {
        let _ = self.events.send(event.clone());
    }

    fn emit_opt(&self, event: &Option<Event>) {
        if let Some(event) = event {
            self.emit(event);
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::test_support::routine;
    use crate::routine::{RecoveryType, Situation};

    fn three_minutes(id: &str) -> Routine {
        routine(id, Situation::Stuck, 3, RecoveryType::Planning)
    }

    async fn sleep_ms(ms: u64) {
        time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let (mut ticker, _rx) = Ticker::new(DEFAULT_TICK_PERIOD);
        ticker.start(three_minutes("A")).await;
        assert!(ticker.is_ticking());

        sleep_ms(61_500).await;
        let s = ticker.state().await;
        assert_eq!((s.step_index, s.step_remaining, s.total_remaining), (1, 59, 119));
    }

    #[tokio::test(start_paused = true)]
    async fn runs_to_completion_and_releases_task() {
        let (mut ticker, mut rx) = Ticker::new(DEFAULT_TICK_PERIOD);
        ticker.start(three_minutes("A")).await;

        sleep_ms(181_000).await;
        assert_eq!(ticker.status().await, PlayerStatus::Completed);
        assert!(!ticker.is_ticking());
        assert!(ticker.completion().await.is_some());

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push(match event {
                Event::RoutineStarted { .. } => "started",
                Event::StepAdvanced { .. } => "step",
                Event::RoutineCompleted { .. } => "completed",
                _ => "other",
            });
        }
        assert_eq!(kinds, vec!["started", "step", "step", "completed"]);
    }

    #[tokio::test(start_paused = true)]
    async fn paused_time_is_not_counted() {
        let (mut ticker, _rx) = Ticker::new(DEFAULT_TICK_PERIOD);
        ticker.start(three_minutes("A")).await;
        sleep_ms(5_500).await;
        assert!(ticker.pause().await.is_some());
        sleep_ms(10_000).await;
        assert_eq!(ticker.state().await.total_remaining, 175);
        assert!(ticker.resume().await.is_some());
        sleep_ms(2_000).await;
        assert_eq!(ticker.state().await.total_remaining, 173);
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_leaves_a_single_tick_source() {
        let (mut ticker, _rx) = Ticker::new(DEFAULT_TICK_PERIOD);
        ticker.start(three_minutes("A")).await;
        sleep_ms(3_500).await;
        ticker.start(three_minutes("B")).await;
        sleep_ms(1_500).await;
        assert_eq!(ticker.state().await.total_remaining, 179);
        sleep_ms(10_000).await;
        assert_eq!(ticker.state().await.total_remaining, 169);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_releases_tick_source() {
        let (mut ticker, _rx) = Ticker::new(DEFAULT_TICK_PERIOD);
        ticker.start(three_minutes("A")).await;
        sleep_ms(4_500).await;
        assert!(ticker.stop().await.is_some());
        assert!(!ticker.is_ticking());
        assert_eq!(ticker.status().await, PlayerStatus::Stopped);
        assert_eq!(ticker.state().await.total_remaining, 176);
        assert!(matches!(ticker.exit().await, Some(Event::RoutineAbandoned { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn exit_abandons_and_stops_ticking() {
        let (mut ticker, _rx) = Ticker::new(DEFAULT_TICK_PERIOD);
        ticker.start(three_minutes("A")).await;
        sleep_ms(2_500).await;
        assert!(matches!(ticker.exit().await, Some(Event::RoutineAbandoned { .. })));
        assert!(!ticker.is_ticking());
        assert_eq!(ticker.status().await, PlayerStatus::Abandoned);
        assert!(ticker.completion().await.is_none());
        let frozen = ticker.state().await;
        sleep_ms(5_000).await;
        assert_eq!(ticker.state().await, frozen);
    }
}
