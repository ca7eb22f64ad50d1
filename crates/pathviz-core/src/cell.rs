//! The [`Cell`] type and its [`Status`] tag.

use crate::geom::Pos;

/// Sentinel distance meaning "not reached yet".
pub const UNREACHABLE: i32 = i32::MAX;

/// What a cell currently shows. Exactly one tag applies at a time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Status {
    #[default]
    Empty,
    Wall,
    Start,
    End,
    Visited,
    Visiting,
    Path,
}

impl Status {
    /// Start or end.
    #[inline]
    pub const fn is_endpoint(self) -> bool {
        matches!(self, Self::Start | Self::End)
    }

    /// A mark left by a search run (visited, visiting or path).
    #[inline]
    pub const fn is_search_mark(self) -> bool {
        matches!(self, Self::Visited | Self::Visiting | Self::Path)
    }

    /// Single-character rendering used by the text form of a grid.
    pub const fn glyph(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Wall => '#',
            Self::Start => 'S',
            Self::End => 'E',
            Self::Visited => 'o',
            Self::Visiting => '+',
            Self::Path => '*',
        }
    }

    /// Inverse of [`glyph`](Self::glyph).
    pub const fn from_glyph(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Self::Empty),
            '#' => Some(Self::Wall),
            'S' => Some(Self::Start),
            'E' => Some(Self::End),
            'o' => Some(Self::Visited),
            '+' => Some(Self::Visiting),
            '*' => Some(Self::Path),
            _ => None,
        }
    }
}

/// A grid cell: its status plus search scratch state.
///
/// `distance` and `previous` belong to whichever search run last touched the
/// grid; they are reset at the start of every run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub status: Status,
    pub distance: i32,
    pub previous: Option<Pos>,
}

impl Cell {
    /// A cell with the given status and cleared scratch state.
    #[inline]
    pub const fn with_status(status: Status) -> Self {
        Self {
            status,
            distance: UNREACHABLE,
            previous: None,
        }
    }

    /// Whether searches may step onto this cell.
    #[inline]
    pub const fn is_passable(&self) -> bool {
        !matches!(self.status, Status::Wall)
    }

    /// Clear the scratch state, leaving the status alone.
    #[inline]
    pub fn clear_scratch(&mut self) {
        self.distance = UNREACHABLE;
        self.previous = None;
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::with_status(Status::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_round_trip() {
        for s in [
            Status::Empty,
            Status::Wall,
            Status::Start,
            Status::End,
            Status::Visited,
            Status::Visiting,
            Status::Path,
        ] {
            assert_eq!(Status::from_glyph(s.glyph()), Some(s));
        }
        assert_eq!(Status::from_glyph('x'), None);
    }

    #[test]
    fn default_cell_is_empty_and_unreached() {
        let c = Cell::default();
        assert_eq!(c.status, Status::Empty);
        assert_eq!(c.distance, UNREACHABLE);
        assert!(c.previous.is_none());
        assert!(c.is_passable());
        assert!(!Cell::with_status(Status::Wall).is_passable());
    }

    #[test]
    fn status_classes() {
        assert!(Status::Start.is_endpoint());
        assert!(Status::End.is_endpoint());
        assert!(!Status::Wall.is_endpoint());
        assert!(Status::Path.is_search_mark());
        assert!(!Status::Empty.is_search_mark());
    }
}
