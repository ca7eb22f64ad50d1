use thiserror::Error;

use pathviz_core::{GridError, Pos};

/// Failure of a search run.
///
/// An exhausted frontier is not an error; it is reported as
/// [`Outcome::NoPath`](crate::Outcome::NoPath).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Following predecessor links from a reached cell never arrived back
    /// at the root. This is a bug in a strategy, not a property of the grid.
    #[error("backpointer chain broken at {at}: no route back to {root}")]
    BrokenChain { at: Pos, root: Pos },

    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),
}
