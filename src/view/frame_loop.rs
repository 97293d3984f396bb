//! Headless frame-loop view.
//!
//! Hosts a [`Game`] whose frame loop runs on a tokio task owned by the view.
//! The host never drives frames: `resume`/`suspend` only flip a run flag the
//! loop waits on.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::{EmbeddedView, ViewId};

/// Per-tick information handed to [`Game::update`].
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo {
    /// Number of frames completed before this one.
    pub frame: u64,
    /// Time since the previous tick, zero on the first tick after a resume.
    pub delta: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("game terminated")]
    Terminated,

    #[error("game update failed: {0}")]
    Failed(String),
}

/// Game logic run by a [`FrameLoopView`].
pub trait Game: Send + 'static {
    fn update(&mut self, frame: &FrameInfo) -> Result<(), GameError>;
}

#[derive(Debug, Clone)]
pub struct FrameLoopConfig {
    /// Ticks per second while running.
    pub tick_rate: u32,
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self { tick_rate: 60 }
    }
}

impl FrameLoopConfig {
    /// Highest tick rate honored; faster rates run at this one.
    pub const MAX_TICK_RATE: u32 = 1000;

    /// Time between ticks, between 1ms and 1s.
    pub fn frame_period(&self) -> Duration {
        let rate = self.tick_rate.clamp(1, Self::MAX_TICK_RATE);
        Duration::from_secs_f64(1.0 / f64::from(rate))
    }
}

/// [`EmbeddedView`] running a [`Game`] on its own task.
///
/// Starts suspended. Dropping the view stops the task without waiting for the
/// frame in flight.
pub struct FrameLoopView {
    id: ViewId,
    run: watch::Sender<bool>,
    frames: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl FrameLoopView {
    pub fn spawn<G: Game>(
        id: impl Into<ViewId>,
        config: FrameLoopConfig,
        game: G,
        runtime: &tokio::runtime::Handle,
    ) -> Arc<Self> {
        let id = id.into();
        let (run, run_rx) = watch::channel(false);
        let frames = Arc::new(AtomicU64::new(0));
        let task = runtime.spawn(run_loop(
            id.clone(),
            game,
            config.frame_period(),
            run_rx,
            Arc::clone(&frames),
        ));
        tracing::debug!(view = %id, tick_rate = config.tick_rate, "Frame loop spawned");
        Arc::new(Self {
            id,
            run,
            frames,
            task,
        })
    }

    /// Frames executed so far.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    /// Whether the loop task has exited, either after a game error or termination.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl EmbeddedView for FrameLoopView {
    fn id(&self) -> &ViewId {
        &self.id
    }

    fn resume(&self) {
        self.run.send_replace(true);
    }

    fn suspend(&self) {
        self.run.send_replace(false);
    }

    fn is_running(&self) -> bool {
        *self.run.borrow() && !self.task.is_finished()
    }
}

impl Drop for FrameLoopView {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_loop<G: Game>(
    id: ViewId,
    mut game: G,
    period: Duration,
    mut run: watch::Receiver<bool>,
    frames: Arc<AtomicU64>,
) {
    loop {
        let resumed = run.wait_for(|running| *running).await.is_ok();
        if !resumed {
            return;
        }
        tracing::debug!(view = %id, "Frame loop running");

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_tick: Option<Instant> = None;

        loop {
            tokio::select! {
                // A pending suspend wins over a due tick.
                biased;

                changed = run.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    if !*run.borrow_and_update() {
                        tracing::debug!(view = %id, "Frame loop suspended");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    profiling::scope!("frame_loop::tick");
                    let now = Instant::now();
                    let info = FrameInfo {
                        frame: frames.load(Ordering::Acquire),
                        delta: last_tick.map_or(Duration::ZERO, |last| now - last),
                    };
                    last_tick = Some(now);

                    match game.update(&info) {
                        Ok(()) => {
                            frames.fetch_add(1, Ordering::AcqRel);
                        }
                        Err(GameError::Terminated) => {
                            tracing::info!(view = %id, frames = info.frame, "Game terminated");
                            return;
                        }
                        Err(err) => {
                            tracing::error!(view = %id, "Frame loop stopped: {err}");
                            return;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter;

    impl Game for Counter {
        fn update(&mut self, _frame: &FrameInfo) -> Result<(), GameError> {
            Ok(())
        }
    }

    struct StopAfter(u64);

    impl Game for StopAfter {
        fn update(&mut self, frame: &FrameInfo) -> Result<(), GameError> {
            if frame.frame >= self.0 {
                Err(GameError::Failed("out of levels".into()))
            } else {
                Ok(())
            }
        }
    }

    // 10ms period; sleeps below end between ticks so counts are exact.
    fn config() -> FrameLoopConfig {
        FrameLoopConfig { tick_rate: 100 }
    }

    fn spawn<G: Game>(config: FrameLoopConfig, game: G) -> Arc<FrameLoopView> {
        FrameLoopView::spawn("game", config, game, &tokio::runtime::Handle::current())
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[test]
    fn test_frame_period() {
        assert_eq!(
            FrameLoopConfig { tick_rate: 50 }.frame_period(),
            Duration::from_millis(20)
        );
        assert_eq!(
            FrameLoopConfig { tick_rate: 0 }.frame_period(),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_frame_period_is_never_zero() {
        assert_eq!(
            FrameLoopConfig { tick_rate: u32::MAX }.frame_period(),
            Duration::from_millis(1)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_suspended() {
        let view = spawn(config(), Counter);
        sleep_ms(35).await;
        assert!(!view.is_running());
        assert_eq!(view.frames(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_only_while_resumed() {
        let view = spawn(config(), Counter);

        view.resume();
        assert!(view.is_running());
        // Ticks at 0, 10 and 20ms.
        sleep_ms(25).await;
        assert_eq!(view.frames(), 3);

        view.suspend();
        sleep_ms(50).await;
        assert_eq!(view.frames(), 3);
        assert!(!view.is_running());

        view.resume();
        sleep_ms(25).await;
        assert_eq!(view.frames(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_error_stops_loop() {
        let view = spawn(config(), StopAfter(3));
        view.resume();
        sleep_ms(100).await;
        assert!(view.is_finished());
        assert!(!view.is_running());
        assert_eq!(view.frames(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_tick_rate_keeps_running() {
        let view = spawn(FrameLoopConfig { tick_rate: u32::MAX }, Counter);
        view.resume();
        sleep_ms(5).await;
        assert!(!view.is_finished());
        assert!(view.is_running());
        assert!(view.frames() > 0);
    }
}
