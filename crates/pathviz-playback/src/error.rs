use thiserror::Error;

use pathviz_core::GridError;
use pathviz_search::SearchError;

use crate::playback::PlaybackState;

/// A playback control that does not apply in the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("no trace is loaded")]
    NoTrace,

    #[error("the trace has no steps")]
    EmptyTrace,

    #[error("every step has already been shown")]
    Exhausted,

    #[error("cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: PlaybackState,
    },
}

/// Failure of a session operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    /// Edits are refused while a replay is actively running.
    #[error("the grid cannot be edited while a replay is running")]
    Busy,
}
