use thiserror::Error;

use crate::geom::Pos;

/// Rejected grid construction or edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    Empty { rows: i32, cols: i32 },

    #[error("position {pos} is outside the grid")]
    OutOfBounds { pos: Pos },

    #[error("start and end cannot share position {pos}")]
    SameEndpoints { pos: Pos },

    #[error("position {pos} is a wall")]
    Blocked { pos: Pos },

    #[error("position {pos} holds an endpoint")]
    Endpoint { pos: Pos },

    #[error("malformed grid text: {message}")]
    Parse { message: String },

    /// Serialized cells that disagree with the declared shape or endpoints.
    #[error("inconsistent cell data: {message}")]
    Cells { message: String },
}

impl GridError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}
