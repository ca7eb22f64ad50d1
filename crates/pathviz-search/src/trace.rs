//! Recorded search traces: [`SearchStep`], [`SearchResult`], [`Outcome`],
//! and the private [`Tracer`] strategies record through.

use pathviz_core::{Grid, Pos, Status, UNREACHABLE};

use crate::algorithm::AlgorithmId;

/// Final message of a run whose frontier emptied without reaching the end.
pub const NO_PATH_MESSAGE: &str = "No path found from start to end!";

/// One recorded instant: a full copy of the working grid plus a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStep {
    pub grid: Grid,
    pub message: String,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Outcome {
    /// `path` runs from start to end inclusive.
    PathFound { path: Vec<Pos> },
    NoPath,
}

impl Outcome {
    /// The path, start to end inclusive.
    pub fn path(&self) -> Option<&[Pos]> {
        match self {
            Self::PathFound { path } => Some(path),
            Self::NoPath => None,
        }
    }

    /// Number of moves along the path.
    pub fn path_len(&self) -> Option<usize> {
        self.path().map(|p| p.len().saturating_sub(1))
    }

    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::PathFound { .. })
    }
}

/// Everything one run produced: the ordered steps and the outcome.
///
/// The steps can be iterated any number of times; each pass replays the run
/// from its first snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    pub algorithm: AlgorithmId,
    pub steps: Vec<SearchStep>,
    pub outcome: Outcome,
}

impl SearchResult {
    /// Number of recorded steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterate over the steps in order.
    pub fn iter(&self) -> std::slice::Iter<'_, SearchStep> {
        self.steps.iter()
    }

    /// The terminal step.
    pub fn last(&self) -> Option<&SearchStep> {
        self.steps.last()
    }

    /// Grid state after the whole run.
    pub fn final_grid(&self) -> Option<&Grid> {
        self.last().map(|s| &s.grid)
    }

    pub fn path(&self) -> Option<&[Pos]> {
        self.outcome.path()
    }

    pub fn path_len(&self) -> Option<usize> {
        self.outcome.path_len()
    }

    pub fn is_found(&self) -> bool {
        self.outcome.is_found()
    }
}

impl<'a> IntoIterator for &'a SearchResult {
    type Item = &'a SearchStep;
    type IntoIter = std::slice::Iter<'a, SearchStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// `row R, column C`, as used in step messages.
pub(crate) fn cell_label(p: Pos) -> String {
    format!("row {}, column {}", p.row, p.col)
}

// ---------------------------------------------------------------------------
// Snapshot policy
// ---------------------------------------------------------------------------

/// Decides which expansions get a snapshot: the first one and then every
/// `every`-th.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Throttle {
    every: usize,
    count: usize,
}

impl Throttle {
    pub(crate) const fn every(every: usize) -> Self {
        Self {
            every: if every == 0 { 1 } else { every },
            count: 0,
        }
    }

    /// Count one expansion and report whether it is snapshotted.
    pub(crate) fn tick(&mut self) -> bool {
        self.count += 1;
        self.count == 1 || self.on_beat()
    }

    /// Whether the current expansion falls on the period, ignoring the
    /// forced first snapshot.
    #[inline]
    pub(crate) fn on_beat(&self) -> bool {
        self.count % self.every == 0
    }
}

/// Which path cells get a snapshot while the path is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathSampling {
    EveryCell,
    /// First, last and every n-th cell.
    Periodic(usize),
}

impl PathSampling {
    fn records(self, i: usize, len: usize) -> bool {
        match self {
            Self::EveryCell => true,
            Self::Periodic(n) => i == 0 || i + 1 == len || i % n.max(1) == 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tracer
// ---------------------------------------------------------------------------

/// A private working copy of the grid plus the steps recorded so far.
///
/// The caller's grid is never touched: the tracer clones it and clears any
/// search state left from an earlier run.
pub(crate) struct Tracer {
    grid: Grid,
    steps: Vec<SearchStep>,
}

impl Tracer {
    pub(crate) fn new(base: &Grid) -> Self {
        let mut grid = base.clone();
        grid.clear_search();
        Self {
            grid,
            steps: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Paint a search mark; endpoints keep their own colouring.
    #[inline]
    pub(crate) fn mark(&mut self, p: Pos, status: Status) {
        self.grid.mark(p, status);
    }

    /// Snapshot the working grid.
    pub(crate) fn record(&mut self, message: impl Into<String>) {
        self.steps.push(SearchStep {
            grid: self.grid.clone(),
            message: message.into(),
        });
    }

    #[inline]
    pub(crate) fn distance(&self, p: Pos) -> i32 {
        self.grid.at(p).map_or(UNREACHABLE, |c| c.distance)
    }

    #[inline]
    pub(crate) fn previous(&self, p: Pos) -> Option<Pos> {
        self.grid.at(p).and_then(|c| c.previous)
    }

    pub(crate) fn set_distance(&mut self, p: Pos, distance: i32) {
        if let Some(c) = self.grid.at_mut(p) {
            c.distance = distance;
        }
    }

    /// Record that `p` is reached from `from` at `distance`.
    pub(crate) fn link(&mut self, p: Pos, from: Pos, distance: i32) {
        if let Some(c) = self.grid.at_mut(p) {
            c.distance = distance;
            c.previous = Some(from);
        }
    }

    /// Colour the interior of `path` and finish with the summary step.
    ///
    /// Start and end are not recoloured, so the end cell is joined by the
    /// terminal step itself.
    pub(crate) fn draw_path(&mut self, path: &[Pos], sampling: PathSampling, summary: String) {
        let inner = if path.len() > 2 {
            &path[1..path.len() - 1]
        } else {
            &[][..]
        };
        for (i, &p) in inner.iter().enumerate() {
            self.mark(p, Status::Path);
            if sampling.records(i, inner.len()) {
                self.record(format!("Adding cell at {} to the path", cell_label(p)));
            }
        }
        self.record(summary);
    }

    /// Draw `path` (or report that none exists) and close the trace.
    pub(crate) fn conclude(mut self, algorithm: AlgorithmId, path: Option<Vec<Pos>>) -> SearchResult {
        match path {
            Some(path) => {
                let summary = algorithm.summary(path.len().saturating_sub(1));
                self.draw_path(&path, algorithm.path_sampling(), summary);
                self.finish(algorithm, Outcome::PathFound { path })
            }
            None => {
                self.record(NO_PATH_MESSAGE);
                self.finish(algorithm, Outcome::NoPath)
            }
        }
    }

    pub(crate) fn finish(self, algorithm: AlgorithmId, outcome: Outcome) -> SearchResult {
        SearchResult {
            algorithm,
            steps: self.steps,
            outcome,
        }
    }
}
