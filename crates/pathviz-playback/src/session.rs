//! [`Session`]: the editing layer on top of search and playback.
//!
//! A session owns the [`Playback`] (and through it the displayed grid), the
//! selected algorithm and the wall density. It decides when a search is
//! computed: `start`, `step` and `jump_to_end` run one on demand, after a
//! reachability check.

use rand::Rng;

use pathviz_core::{Endpoint, Grid, MAX_UI_WALL_DENSITY, Pos, Status, random_walls};
use pathviz_search::{AlgorithmId, run_search};

use crate::error::SessionError;
use crate::playback::{Playback, PlaybackConfig, PlaybackState, PlaybackView};
use crate::schedule::{Scheduler, Tick};
use crate::speed::Speed;

/// Shown instead of running a search when the end cannot be reached.
pub const UNREACHABLE_MESSAGE: &str = "No path is possible from start to end with the current walls!";

/// Configuration for creating a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    pub rows: i32,
    pub cols: i32,
    pub start: Pos,
    pub end: Pos,
    pub algorithm: AlgorithmId,
    pub speed: Speed,
    /// Percentage of cells turned into walls by [`Session::generate_walls`].
    pub wall_density: u8,
    pub playback: PlaybackConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 40,
            start: Pos::new(5, 5),
            end: Pos::new(15, 35),
            algorithm: AlgorithmId::Bfs,
            speed: Speed::default(),
            wall_density: pathviz_core::DEFAULT_WALL_DENSITY,
            playback: PlaybackConfig::default(),
        }
    }
}

/// Endpoints that fit a `rows x cols` grid: each one outside the grid is
/// moved to the quarter point (start) or three-quarter point (end).
pub fn fallback_endpoints(rows: i32, cols: i32, start: Pos, end: Pos) -> (Pos, Pos) {
    let inside = |p: Pos| p.row >= 0 && p.col >= 0 && p.row < rows && p.col < cols;
    let start = if inside(start) {
        start
    } else {
        Pos::new(rows / 4, cols / 4)
    };
    let end = if inside(end) {
        end
    } else {
        Pos::new(3 * rows / 4, 3 * cols / 4)
    };
    (start, end)
}

/// One interactive visualization session.
pub struct Session<S: Scheduler> {
    playback: Playback<S>,
    algorithm: AlgorithmId,
    wall_density: u8,
}

impl<S: Scheduler> Session<S> {
    /// Create a session with an empty grid built from `config`.
    pub fn new(config: SessionConfig, scheduler: S) -> Result<Self, SessionError> {
        let (start, end) = fallback_endpoints(config.rows, config.cols, config.start, config.end);
        let grid = Grid::new(config.rows, config.cols, start, end)?;
        let playback = Playback::new(
            scheduler,
            grid,
            PlaybackConfig {
                speed: config.speed,
                ..config.playback
            },
        );
        log::debug!(
            "session {}x{} with {}",
            config.rows,
            config.cols,
            config.algorithm
        );
        Ok(Self {
            playback,
            algorithm: config.algorithm,
            wall_density: config.wall_density.min(MAX_UI_WALL_DENSITY),
        })
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    pub fn view(&self) -> PlaybackView<'_> {
        self.playback.view()
    }

    pub fn grid(&self) -> &Grid {
        self.playback.grid()
    }

    pub fn state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    pub fn speed(&self) -> Speed {
        self.playback.speed()
    }

    pub fn wall_density(&self) -> u8 {
        self.wall_density
    }

    pub fn playback(&self) -> &Playback<S> {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut Playback<S> {
        &mut self.playback
    }

    /// Whether the grid can be edited now: anything but an active replay.
    pub fn is_editable(&self) -> bool {
        self.playback.state() != PlaybackState::Running
    }

    // -----------------------------------------------------------------
    // Replay controls
    // -----------------------------------------------------------------

    /// Start (or resume) the replay. Returns whether a replay is running
    /// afterwards; `false` means the end is unreachable and the status line
    /// says so.
    pub fn start(&mut self) -> Result<bool, SessionError> {
        match self.playback.state() {
            PlaybackState::Running => return Ok(true),
            PlaybackState::Paused => {
                self.playback.resume()?;
                return Ok(true);
            }
            PlaybackState::Idle | PlaybackState::Finished => {}
        }
        if !self.check_reachable() {
            return Ok(false);
        }
        let result = self.compute()?;
        self.playback.start(result)?;
        Ok(true)
    }

    pub fn pause(&mut self) -> bool {
        self.playback.pause()
    }

    /// Show one more step, computing the trace first if none is loaded.
    /// Returns whether a step was shown.
    pub fn step(&mut self) -> Result<bool, SessionError> {
        if self.playback.trace().is_none() {
            if !self.check_reachable() {
                return Ok(false);
            }
            let result = self.compute()?;
            self.playback.load(result)?;
        }
        if self.playback.state() == PlaybackState::Finished {
            return Ok(false);
        }
        self.playback.step()?;
        Ok(true)
    }

    /// Switch to fast-forward speed, resuming when paused. Does nothing
    /// without a replay in progress.
    pub fn fast_forward(&mut self) -> Result<(), SessionError> {
        if !self.view().is_running() {
            return Ok(());
        }
        self.playback.fast_forward()?;
        Ok(())
    }

    /// Show the final state straight away, computing the trace if needed.
    /// Returns `false` when the end is unreachable.
    pub fn jump_to_end(&mut self) -> Result<bool, SessionError> {
        if !self.check_reachable() {
            return Ok(false);
        }
        if self.playback.trace().is_none() {
            let result = self.compute()?;
            self.playback.load(result)?;
        }
        self.playback.jump_to_end()?;
        Ok(true)
    }

    /// Clear search marks and the trace; walls stay.
    pub fn reset(&mut self) {
        self.playback.reset();
    }

    /// Start over with an empty grid of the same size and endpoints.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.playback.reset();
        let grid = self.playback.grid_mut()?;
        let (start, end) = (grid.start(), grid.end());
        *grid = Grid::new(grid.rows(), grid.cols(), start, end)?;
        log::debug!("grid cleared");
        Ok(())
    }

    /// Deliver a scheduled tick to the playback.
    pub fn tick(&mut self, tick: Tick) -> bool {
        self.playback.tick(tick)
    }

    pub fn set_speed(&mut self, speed: impl Into<Speed>) {
        self.playback.set_speed(speed);
    }

    // -----------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------

    /// Select the algorithm used by the next run. A loaded trace of a
    /// different algorithm is dropped.
    pub fn set_algorithm(&mut self, algorithm: AlgorithmId) -> Result<(), SessionError> {
        if !self.is_editable() {
            return Err(SessionError::Busy);
        }
        if algorithm != self.algorithm && self.playback.trace().is_some() {
            self.playback.reset();
        }
        self.algorithm = algorithm;
        Ok(())
    }

    /// Set the density used by [`generate_walls`](Self::generate_walls),
    /// clamped to the interactive range.
    pub fn set_wall_density(&mut self, density: u8) {
        self.wall_density = density.min(MAX_UI_WALL_DENSITY);
    }

    /// Replace the walls with a random layout at the current density.
    /// Returns the number of walls placed.
    pub fn generate_walls(&mut self, rng: &mut impl Rng) -> Result<usize, SessionError> {
        let density = self.wall_density;
        let grid = self.edit()?;
        Ok(random_walls(grid, density, rng))
    }

    /// Flip a cell between empty and wall.
    pub fn toggle_wall(&mut self, p: Pos) -> Result<Status, SessionError> {
        let grid = self.edit()?;
        Ok(grid.toggle_wall(p)?)
    }

    /// Paint or erase a wall; endpoints are left alone.
    pub fn set_wall(&mut self, p: Pos, wall: bool) -> Result<bool, SessionError> {
        let grid = self.edit()?;
        Ok(grid.set_wall(p, wall))
    }

    /// Move the start or end cell.
    pub fn move_endpoint(&mut self, which: Endpoint, to: Pos) -> Result<(), SessionError> {
        let grid = self.edit()?;
        grid.relocate(which, to)?;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    /// The displayed grid, ready for an edit: refused while running, and
    /// any loaded trace is dropped since it no longer matches.
    fn edit(&mut self) -> Result<&mut Grid, SessionError> {
        if !self.is_editable() {
            return Err(SessionError::Busy);
        }
        if self.playback.trace().is_some() {
            self.playback.reset();
        }
        Ok(self.playback.grid_mut()?)
    }

    fn check_reachable(&mut self) -> bool {
        if self.playback.grid().is_reachable() {
            return true;
        }
        log::debug!("end unreachable, search skipped");
        self.playback.set_message(UNREACHABLE_MESSAGE);
        false
    }

    fn compute(&self) -> Result<pathviz_search::SearchResult, SessionError> {
        let grid = self.playback.grid();
        Ok(run_search(self.algorithm, grid, grid.start(), grid.end())?)
    }
}
