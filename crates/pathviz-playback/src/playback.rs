//! The replay state machine.
//!
//! [`Playback`] owns the displayed grid and walks a [`SearchResult`] one
//! scheduled tick at a time:
//!
//! ```text
//! idle --start--> running <--pause/resume--> paused
//!                    |                         |
//!                    +------> finished <-------+  (last step shown)
//! any --reset--> idle
//! ```
//!
//! Every tick carries the generation it was scheduled for. Generations are
//! unique across all playbacks in the process. Pausing, resetting or
//! restarting cancels the pending tick and moves to a fresh generation, so
//! a tick that slips through cancellation, or one meant for another
//! playback sharing the same channel, is recognised as stale and ignored.
//! Dropping a playback cancels its pending tick.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use pathviz_core::Grid;
use pathviz_search::SearchResult;

use crate::error::PlaybackError;
use crate::schedule::{ManualScheduler, Scheduler, Tick};
use crate::speed::Speed;

/// Message shown when nothing has been run yet.
pub const IDLE_MESSAGE: &str =
    "Select an algorithm and press Start, or draw walls by clicking and dragging on the grid";

/// Delay before the first tick of a fresh start.
pub const START_DELAY: Duration = Duration::from_millis(100);

/// Where the replay stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlaybackState {
    #[default]
    Idle,
    Running,
    Paused,
    Finished,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Finished => "finished",
        })
    }
}

/// Configuration for creating a [`Playback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaybackConfig {
    pub speed: Speed,
    /// Delay before the first tick after [`Playback::start`].
    pub start_delay: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: Speed::default(),
            start_delay: START_DELAY,
        }
    }
}

/// What a renderer needs to draw the current frame.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackView<'a> {
    pub grid: &'a Grid,
    pub message: &'a str,
    /// Index of the next step to show.
    pub index: usize,
    /// Number of steps in the loaded trace, 0 if none.
    pub len: usize,
    pub state: PlaybackState,
    pub speed: Speed,
}

impl PlaybackView<'_> {
    /// A replay is in progress, possibly paused.
    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self.state, PlaybackState::Running | PlaybackState::Paused)
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }
}

type Listener = Box<dyn FnMut(&PlaybackView<'_>)>;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Replays a search trace onto the displayed grid.
pub struct Playback<S: Scheduler> {
    scheduler: S,
    config: PlaybackConfig,
    grid: Grid,
    message: String,
    trace: Option<SearchResult>,
    index: usize,
    speed: Speed,
    state: PlaybackState,
    generation: u64,
    pending: Option<(u64, S::Handle)>,
    listeners: Vec<Listener>,
}

impl<S: Scheduler> Playback<S> {
    /// Create an idle playback showing `grid`.
    pub fn new(scheduler: S, grid: Grid, config: PlaybackConfig) -> Self {
        Self {
            scheduler,
            config,
            grid,
            message: IDLE_MESSAGE.to_string(),
            trace: None,
            index: 0,
            speed: config.speed,
            state: PlaybackState::Idle,
            generation: 0,
            pending: None,
            listeners: Vec::new(),
        }
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Index of the next step to show.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn trace(&self) -> Option<&SearchResult> {
        self.trace.as_ref()
    }

    /// Whether a tick is scheduled.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn view(&self) -> PlaybackView<'_> {
        PlaybackView {
            grid: &self.grid,
            message: &self.message,
            index: self.index,
            len: self.trace.as_ref().map_or(0, SearchResult::len),
            state: self.state,
            speed: self.speed,
        }
    }

    /// Call `f` with the view after every change to what is shown.
    pub fn subscribe(&mut self, f: impl FnMut(&PlaybackView<'_>) + 'static) {
        self.listeners.push(Box::new(f));
    }

    // -----------------------------------------------------------------
    // Controls
    // -----------------------------------------------------------------

    /// Begin replaying `result` from its first step.
    ///
    /// When paused this resumes the loaded trace instead and `result` is
    /// dropped. Refused while running.
    pub fn start(&mut self, result: SearchResult) -> Result<(), PlaybackError> {
        match self.state {
            PlaybackState::Running => Err(PlaybackError::InvalidState {
                action: "start",
                state: self.state,
            }),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Idle | PlaybackState::Finished => {
                let replay = self.state == PlaybackState::Finished;
                self.install(result)?;
                // A finished run leaves its marks on the grid.
                self.grid.clear_search();
                self.state = PlaybackState::Running;
                log::debug!("playback started");
                self.schedule(self.config.start_delay);
                if replay {
                    self.notify();
                }
                Ok(())
            }
        }
    }

    /// Install `result` without running it; the playback is left paused
    /// before its first step.
    pub fn load(&mut self, result: SearchResult) -> Result<(), PlaybackError> {
        self.install(result)?;
        self.state = PlaybackState::Paused;
        Ok(())
    }

    /// Continue a paused replay. The next step is shown immediately.
    pub fn resume(&mut self) -> Result<(), PlaybackError> {
        if self.state != PlaybackState::Paused {
            return Err(PlaybackError::InvalidState {
                action: "resume",
                state: self.state,
            });
        }
        self.state = PlaybackState::Running;
        log::debug!("playback resumed at step {}", self.index);
        self.advance();
        Ok(())
    }

    /// Stop scheduled advancing, keeping the current position.
    ///
    /// Returns whether the playback was running.
    pub fn pause(&mut self) -> bool {
        if self.state != PlaybackState::Running {
            return false;
        }
        self.cancel_pending();
        self.state = PlaybackState::Paused;
        log::debug!("playback paused at step {}", self.index);
        true
    }

    /// Show exactly one more step, pausing first if running.
    pub fn step(&mut self) -> Result<(), PlaybackError> {
        let len = self.trace.as_ref().ok_or(PlaybackError::NoTrace)?.len();
        if self.index >= len {
            return Err(PlaybackError::Exhausted);
        }
        self.pause();
        self.apply(self.index);
        self.index += 1;
        self.state = if self.index >= len {
            PlaybackState::Finished
        } else {
            PlaybackState::Paused
        };
        self.notify();
        Ok(())
    }

    /// Show the terminal step at once, without intermediate ticks.
    pub fn jump_to_end(&mut self) -> Result<(), PlaybackError> {
        let len = self.trace.as_ref().ok_or(PlaybackError::NoTrace)?.len();
        self.cancel_pending();
        self.apply(len - 1);
        self.index = len;
        self.state = PlaybackState::Finished;
        log::debug!("playback jumped to end");
        self.notify();
        Ok(())
    }

    /// Drop the trace and return to idle, clearing search marks from the
    /// displayed grid. Walls and endpoints are kept.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.trace = None;
        self.index = 0;
        self.state = PlaybackState::Idle;
        self.grid.clear_search();
        self.message = IDLE_MESSAGE.to_string();
        log::debug!("playback reset");
        self.notify();
    }

    /// Change the speed. A tick already scheduled keeps its delay.
    pub fn set_speed(&mut self, speed: impl Into<Speed>) {
        self.speed = speed.into();
    }

    /// Jump to [`Speed::FAST_FORWARD`], resuming a paused replay.
    pub fn fast_forward(&mut self) -> Result<(), PlaybackError> {
        self.speed = Speed::FAST_FORWARD;
        if self.state == PlaybackState::Paused {
            self.resume()?;
        }
        Ok(())
    }

    /// Deliver a scheduled tick. Returns whether it advanced the replay;
    /// ticks from a superseded generation are ignored.
    pub fn tick(&mut self, tick: Tick) -> bool {
        let current = matches!(self.pending, Some((generation, _)) if generation == tick.0);
        if !current || self.state != PlaybackState::Running {
            log::trace!("ignoring stale tick {}", tick.0);
            return false;
        }
        self.pending = None;
        self.advance();
        true
    }

    // -----------------------------------------------------------------
    // Editing surface
    // -----------------------------------------------------------------

    /// The displayed grid, for editing. Refused while running.
    pub fn grid_mut(&mut self) -> Result<&mut Grid, PlaybackError> {
        if self.state == PlaybackState::Running {
            return Err(PlaybackError::InvalidState {
                action: "edit the grid",
                state: self.state,
            });
        }
        Ok(&mut self.grid)
    }

    /// Replace the status line.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.notify();
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    fn install(&mut self, result: SearchResult) -> Result<(), PlaybackError> {
        if result.is_empty() {
            return Err(PlaybackError::EmptyTrace);
        }
        self.cancel_pending();
        log::debug!(
            "loaded {} trace with {} steps",
            result.algorithm,
            result.len()
        );
        self.trace = Some(result);
        self.index = 0;
        Ok(())
    }

    /// Show the step at `index` and move on per the speed policy.
    fn advance(&mut self) {
        let Some(len) = self.trace.as_ref().map(SearchResult::len) else {
            self.state = PlaybackState::Idle;
            return;
        };
        if self.index >= len {
            self.state = PlaybackState::Finished;
            return;
        }
        self.apply(self.index);
        self.index = self.speed.next_index(self.index, len);
        if self.index >= len {
            self.state = PlaybackState::Finished;
            log::debug!("playback finished");
        } else {
            self.schedule(self.speed.delay());
        }
        self.notify();
    }

    fn apply(&mut self, index: usize) {
        let Some(step) = self.trace.as_ref().and_then(|t| t.steps.get(index)) else {
            return;
        };
        log::trace!("step {index}: {}", step.message);
        self.grid.clone_from(&step.grid);
        self.message.clone_from(&step.message);
    }

    fn schedule(&mut self, delay: Duration) {
        self.cancel_pending();
        let handle = self.scheduler.schedule(delay, Tick(self.generation));
        self.pending = Some((self.generation, handle));
    }

    fn cancel_pending(&mut self) {
        if let Some((_, handle)) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
        // Anything still in flight is now stale.
        self.generation = next_generation();
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let view = PlaybackView {
            grid: &self.grid,
            message: &self.message,
            index: self.index,
            len: self.trace.as_ref().map_or(0, SearchResult::len),
            state: self.state,
            speed: self.speed,
        };
        for listener in self.listeners.iter_mut() {
            listener(&view);
        }
    }
}

impl Playback<ManualScheduler> {
    /// Move the virtual clock forward by `by`, delivering every tick that
    /// falls due on the way. Returns the number of steps shown.
    pub fn advance_clock(&mut self, by: Duration) -> usize {
        let until = self.scheduler.now() + by;
        let mut shown = 0;
        while let Some(tick) = self.scheduler.pop_due(until) {
            if self.tick(tick) {
                shown += 1;
            }
        }
        self.scheduler.set_now(until);
        shown
    }

    /// Deliver ticks until none are pending.
    pub fn run_until_idle(&mut self) -> usize {
        let mut shown = 0;
        while let Some(due) = self.scheduler.next_due() {
            let by = due.saturating_sub(self.scheduler.now());
            shown += self.advance_clock(by);
        }
        shown
    }
}

impl<S: Scheduler> Drop for Playback<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

impl<S: Scheduler> fmt::Debug for Playback<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Playback")
            .field("state", &self.state)
            .field("index", &self.index)
            .field("len", &self.trace.as_ref().map_or(0, SearchResult::len))
            .field("speed", &self.speed)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pathviz_core::Status;
    use pathviz_search::{AlgorithmId, run};

    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn grid() -> Grid {
        "S....\n.##..\n....E".parse().unwrap()
    }

    fn trace() -> SearchResult {
        run(AlgorithmId::Bfs, &grid()).unwrap()
    }

    fn playback() -> Playback<ManualScheduler> {
        Playback::new(ManualScheduler::new(), grid(), PlaybackConfig::default())
    }

    #[test]
    fn starts_after_the_start_delay() {
        let mut p = playback();
        p.start(trace()).unwrap();
        assert_eq!(p.state(), PlaybackState::Running);
        assert_eq!(p.advance_clock(99 * MS), 0);
        assert_eq!(p.index(), 0);
        assert_eq!(p.advance_clock(MS), 1);
        assert_eq!(p.index(), 1);
        assert_eq!(p.message(), trace().steps[0].message);
    }

    #[test]
    fn ticks_follow_the_speed_delay() {
        let mut p = playback();
        p.start(trace()).unwrap();
        p.advance_clock(100 * MS);
        // Default speed 50 waits 750 ms per step.
        assert_eq!(p.advance_clock(749 * MS), 0);
        assert_eq!(p.advance_clock(MS), 1);
        assert_eq!(p.index(), 2);
    }

    #[test]
    fn runs_to_the_final_snapshot() {
        let t = trace();
        let mut p = playback();
        p.start(t.clone()).unwrap();
        let shown = p.run_until_idle();
        assert_eq!(shown, t.len());
        assert_eq!(p.state(), PlaybackState::Finished);
        assert_eq!(p.grid(), t.final_grid().unwrap());
        assert_eq!(p.message(), t.last().unwrap().message);
        assert!(!p.has_pending());
    }

    #[test]
    fn start_is_refused_while_running() {
        let mut p = playback();
        p.start(trace()).unwrap();
        assert_eq!(
            p.start(trace()),
            Err(PlaybackError::InvalidState {
                action: "start",
                state: PlaybackState::Running
            })
        );
    }

    #[test]
    fn pause_cancels_the_pending_tick() {
        let mut p = playback();
        p.start(trace()).unwrap();
        p.advance_clock(100 * MS);
        assert!(p.pause());
        assert!(!p.has_pending());
        assert_eq!(p.scheduler().pending(), 0);
        assert_eq!(p.advance_clock(Duration::from_secs(10)), 0);
        assert_eq!(p.index(), 1);
        assert!(!p.pause());
    }

    #[test]
    fn start_while_paused_resumes_in_place() {
        let mut p = playback();
        p.start(trace()).unwrap();
        p.advance_clock(100 * MS);
        p.pause();
        let other = run(AlgorithmId::Dfs, &grid()).unwrap();
        p.start(other).unwrap();
        assert_eq!(p.state(), PlaybackState::Running);
        // Resuming shows the next step at once, from the loaded trace.
        assert_eq!(p.index(), 2);
        assert_eq!(p.trace().unwrap().algorithm, AlgorithmId::Bfs);
    }

    #[test]
    fn stale_ticks_are_ignored() {
        let mut p = playback();
        p.start(trace()).unwrap();
        p.advance_clock(100 * MS);
        p.pause();
        p.resume().unwrap();
        // An early generation is no longer awaited.
        assert!(!p.tick(Tick(1)));
        assert_eq!(p.index(), 2);
    }

    #[test]
    fn ticks_from_another_playback_are_ignored() {
        let mut a = playback();
        let mut b = playback();
        a.start(trace()).unwrap();
        b.start(trace()).unwrap();
        let foreign = a.scheduler_mut().pop_due(Duration::MAX).unwrap();
        assert!(!b.tick(foreign));
        assert_eq!(b.index(), 0);
        assert!(a.tick(foreign));
    }

    #[test]
    fn restarting_a_finished_replay_clears_its_marks() {
        let mut p = playback();
        p.start(trace()).unwrap();
        p.run_until_idle();
        assert_eq!(p.state(), PlaybackState::Finished);
        assert!(p.grid().count(Status::Path) > 0);

        let frames = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&frames);
        p.subscribe(move |_| *seen.borrow_mut() += 1);
        p.start(trace()).unwrap();
        assert_eq!(p.state(), PlaybackState::Running);
        assert_eq!(p.index(), 0);
        assert_eq!(p.grid().count(Status::Path), 0);
        assert_eq!(p.grid().count(Status::Visited), 0);
        assert_eq!(*frames.borrow(), 1);
    }

    #[test]
    fn step_advances_exactly_one() {
        let t = trace();
        let mut p = playback();
        p.load(t.clone()).unwrap();
        assert_eq!(p.state(), PlaybackState::Paused);
        p.step().unwrap();
        assert_eq!(p.index(), 1);
        assert_eq!(p.message(), t.steps[0].message);
        for _ in 1..t.len() {
            p.step().unwrap();
        }
        assert_eq!(p.state(), PlaybackState::Finished);
        assert_eq!(p.step(), Err(PlaybackError::Exhausted));
    }

    #[test]
    fn step_pauses_a_running_replay() {
        let mut p = playback();
        p.set_speed(Speed::new(1000));
        p.start(trace()).unwrap();
        p.advance_clock(100 * MS);
        let before = p.index();
        p.step().unwrap();
        assert_eq!(p.state(), PlaybackState::Paused);
        assert_eq!(p.index(), before + 1);
        assert!(!p.has_pending());
    }

    #[test]
    fn step_without_trace_is_an_error() {
        let mut p = playback();
        assert_eq!(p.step(), Err(PlaybackError::NoTrace));
        assert_eq!(p.jump_to_end(), Err(PlaybackError::NoTrace));
    }

    #[test]
    fn jump_to_end_shows_the_terminal_step() {
        let t = trace();
        let mut p = playback();
        p.start(t.clone()).unwrap();
        p.jump_to_end().unwrap();
        assert_eq!(p.state(), PlaybackState::Finished);
        assert_eq!(p.index(), t.len());
        assert_eq!(p.grid(), t.final_grid().unwrap());
        assert_eq!(p.advance_clock(Duration::from_secs(60)), 0);
    }

    #[test]
    fn reset_returns_to_idle_keeping_walls() {
        let mut p = playback();
        p.start(trace()).unwrap();
        p.run_until_idle();
        p.reset();
        assert_eq!(p.state(), PlaybackState::Idle);
        assert_eq!(p.index(), 0);
        assert!(p.trace().is_none());
        assert_eq!(p.grid(), &grid());
        assert_eq!(p.message(), IDLE_MESSAGE);
    }

    #[test]
    fn restart_after_finish() {
        let mut p = playback();
        p.start(trace()).unwrap();
        p.run_until_idle();
        p.start(trace()).unwrap();
        assert_eq!(p.state(), PlaybackState::Running);
        assert_eq!(p.index(), 0);
    }

    #[test]
    fn fast_forward_resumes_at_high_speed() {
        let mut p = playback();
        p.load(trace()).unwrap();
        p.fast_forward().unwrap();
        assert_eq!(p.speed(), Speed::FAST_FORWARD);
        assert_eq!(p.state(), PlaybackState::Running);
        assert_eq!(p.index(), 1);
        assert_eq!(p.advance_clock(50 * MS), 1);
    }

    #[test]
    fn grid_is_locked_while_running() {
        let mut p = playback();
        assert!(p.grid_mut().is_ok());
        p.start(trace()).unwrap();
        assert!(p.grid_mut().is_err());
        p.pause();
        assert!(p.grid_mut().is_ok());
    }

    #[test]
    fn listeners_see_every_step_in_order() {
        let t = trace();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut p = playback();
        p.subscribe(move |v| sink.borrow_mut().push((v.index, v.message.to_string())));
        p.start(t.clone()).unwrap();
        p.run_until_idle();
        let seen = seen.borrow();
        assert_eq!(seen.len(), t.len());
        assert!(seen.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(seen.last().unwrap().1, t.last().unwrap().message);
    }

    #[test]
    fn view_flags() {
        let mut p = playback();
        assert!(!p.view().is_running());
        p.load(trace()).unwrap();
        assert!(p.view().is_running());
        assert!(p.view().is_paused());
        p.resume().unwrap();
        assert!(!p.view().is_paused());
    }
}
