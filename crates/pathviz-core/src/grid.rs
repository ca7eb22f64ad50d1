//! The [`Grid`] type: a rectangular matrix of [`Cell`]s with one start and
//! one end.
//!
//! Unlike a shared-buffer view, a `Grid` owns its cells. Cloning yields an
//! independent deep copy, which is what search runs and recorded snapshots
//! rely on.

use std::fmt;
use std::str::FromStr;

use crate::cell::{Cell, Status};
use crate::error::GridError;
use crate::geom::Pos;

/// Which endpoint an edit refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    /// The status an endpoint cell carries.
    #[inline]
    pub const fn status(self) -> Status {
        match self {
            Self::Start => Status::Start,
            Self::End => Status::End,
        }
    }
}

/// A `rows x cols` grid of cells, indexed from `(0, 0)`.
///
/// Invariants upheld by every constructor and edit:
/// - exactly one cell is `Start` and exactly one is `End`, at different
///   positions;
/// - a wall is never an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "GridData"))]
pub struct Grid {
    rows: i32,
    cols: i32,
    cells: Vec<Cell>,
    start: Pos,
    end: Pos,
}

/// Unchecked wire form of a [`Grid`]; deserialization goes through
/// [`Grid::new`] and then checks the cells against it.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct GridData {
    rows: i32,
    cols: i32,
    cells: Vec<Cell>,
    start: Pos,
    end: Pos,
}

#[cfg(feature = "serde")]
impl TryFrom<GridData> for Grid {
    type Error = GridError;

    fn try_from(data: GridData) -> Result<Self, GridError> {
        let mut grid = Grid::new(data.rows, data.cols, data.start, data.end)?;
        if data.cells.len() != grid.cells.len() {
            return Err(GridError::Cells {
                message: format!(
                    "{}x{} grid needs {} cells, got {}",
                    data.rows,
                    data.cols,
                    grid.cells.len(),
                    data.cells.len()
                ),
            });
        }
        for (i, cell) in data.cells.iter().enumerate() {
            let pos = grid.pos(i);
            let expected = grid.cells[i].status;
            let consistent = if expected.is_endpoint() {
                cell.status == expected
            } else {
                !cell.status.is_endpoint()
            };
            if !consistent {
                return Err(GridError::Cells {
                    message: format!("{pos} is {:?}, expected {expected:?}", cell.status),
                });
            }
        }
        grid.cells = data.cells;
        Ok(grid)
    }
}

impl Grid {
    /// Create a grid of empty cells with the given endpoints.
    pub fn new(rows: i32, cols: i32, start: Pos, end: Pos) -> Result<Self, GridError> {
        if rows <= 0 || cols <= 0 {
            return Err(GridError::Empty { rows, cols });
        }
        let mut grid = Self {
            rows,
            cols,
            cells: vec![Cell::default(); (rows as usize) * (cols as usize)],
            start,
            end,
        };
        for pos in [start, end] {
            if !grid.contains(pos) {
                return Err(GridError::OutOfBounds { pos });
            }
        }
        if start == end {
            return Err(GridError::SameEndpoints { pos: start });
        }
        grid.set_status(start, Status::Start);
        grid.set_status(end, Status::End);
        Ok(grid)
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: a grid has at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Start position.
    #[inline]
    pub fn start(&self) -> Pos {
        self.start
    }

    /// End position.
    #[inline]
    pub fn end(&self) -> Pos {
        self.end
    }

    /// Position of the given endpoint.
    #[inline]
    pub fn endpoint(&self, which: Endpoint) -> Pos {
        match which {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    /// Whether `p` lies inside the grid.
    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        p.row >= 0 && p.col >= 0 && p.row < self.rows && p.col < self.cols
    }

    /// Flat row-major index of `p`, or `None` if out of bounds.
    #[inline]
    pub fn index(&self, p: Pos) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some((p.row as usize) * (self.cols as usize) + p.col as usize)
    }

    /// Inverse of [`index`](Self::index).
    #[inline]
    pub fn pos(&self, idx: usize) -> Pos {
        let cols = self.cols as usize;
        Pos::new((idx / cols) as i32, (idx % cols) as i32)
    }

    /// The cell at `p`.
    #[inline]
    pub fn at(&self, p: Pos) -> Option<&Cell> {
        self.index(p).map(|i| &self.cells[i])
    }

    /// Mutable access to the cell at `p`.
    ///
    /// Callers must not write `Start`, `End` or `Wall` through this; use the
    /// editing methods, which keep the endpoint invariants.
    #[inline]
    pub fn at_mut(&mut self, p: Pos) -> Option<&mut Cell> {
        let i = self.index(p)?;
        Some(&mut self.cells[i])
    }

    /// Status at `p`, if in bounds.
    #[inline]
    pub fn status(&self, p: Pos) -> Option<Status> {
        self.at(p).map(|c| c.status)
    }

    /// Whether `p` is in bounds and not a wall.
    #[inline]
    pub fn is_passable(&self, p: Pos) -> bool {
        self.at(p).is_some_and(Cell::is_passable)
    }

    /// Paint a search mark (`Visiting`, `Visited`, `Path`) or `Empty` on
    /// `p`. Endpoints and walls keep their status; returns whether the cell
    /// changed.
    pub fn mark(&mut self, p: Pos, status: Status) -> bool {
        debug_assert!(status.is_search_mark() || status == Status::Empty);
        match self.at_mut(p) {
            Some(c) if !c.status.is_endpoint() && c.status != Status::Wall => {
                let changed = c.status != status;
                c.status = status;
                changed
            }
            _ => false,
        }
    }

    fn set_status(&mut self, p: Pos, status: Status) {
        if let Some(c) = self.at_mut(p) {
            c.status = status;
        }
    }

    /// Append the 4-connected, in-bounds, non-wall neighbours of `p` into
    /// `buf`, in the order up, right, down, left. The caller clears `buf`.
    pub fn neighbors(&self, p: Pos, buf: &mut Vec<Pos>) {
        for n in p.neighbors_4() {
            if self.is_passable(n) {
                buf.push(n);
            }
        }
    }

    /// Flip `p` between empty and wall, returning the new status.
    ///
    /// Any non-wall cell (search marks included) becomes a wall. Endpoints
    /// are rejected.
    pub fn toggle_wall(&mut self, p: Pos) -> Result<Status, GridError> {
        let cell = self.at_mut(p).ok_or(GridError::OutOfBounds { pos: p })?;
        if cell.status.is_endpoint() {
            return Err(GridError::Endpoint { pos: p });
        }
        cell.status = if cell.status == Status::Wall {
            Status::Empty
        } else {
            Status::Wall
        };
        cell.clear_scratch();
        Ok(cell.status)
    }

    /// Paint (`wall == true`) or erase a wall at `p`. Endpoints and
    /// out-of-bounds positions are left alone; returns whether the cell
    /// changed.
    pub fn set_wall(&mut self, p: Pos, wall: bool) -> bool {
        match self.at_mut(p) {
            Some(c) if !c.status.is_endpoint() => {
                let target = if wall { Status::Wall } else { Status::Empty };
                if c.status == target || (!wall && c.status != Status::Wall) {
                    return false;
                }
                c.status = target;
                c.clear_scratch();
                true
            }
            _ => false,
        }
    }

    /// Move an endpoint to `to`, clearing its old cell back to empty.
    ///
    /// Rejected when `to` is out of bounds, a wall, or the other endpoint.
    pub fn relocate(&mut self, which: Endpoint, to: Pos) -> Result<(), GridError> {
        let status = self.status(to).ok_or(GridError::OutOfBounds { pos: to })?;
        let from = self.endpoint(which);
        if to == from {
            return Ok(());
        }
        match status {
            Status::Wall => return Err(GridError::Blocked { pos: to }),
            Status::Start | Status::End => return Err(GridError::SameEndpoints { pos: to }),
            _ => {}
        }
        self.set_status(from, Status::Empty);
        self.set_status(to, which.status());
        match which {
            Endpoint::Start => self.start = to,
            Endpoint::End => self.end = to,
        }
        Ok(())
    }

    /// Reset search marks to empty and all scratch state to unreached.
    /// Walls and endpoints are kept.
    pub fn clear_search(&mut self) {
        for c in &mut self.cells {
            if c.status.is_search_mark() {
                c.status = Status::Empty;
            }
            c.clear_scratch();
        }
    }

    /// Remove every wall.
    pub fn clear_walls(&mut self) {
        for c in &mut self.cells {
            if c.status == Status::Wall {
                c.status = Status::Empty;
            }
        }
    }

    /// Count cells with the given status.
    pub fn count(&self, status: Status) -> usize {
        self.cells.iter().filter(|c| c.status == status).count()
    }

    /// Iterate over `(Pos, &Cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, &Cell)> + '_ {
        self.cells.iter().enumerate().map(|(i, c)| (self.pos(i), c))
    }

    /// One row of cells.
    pub fn row(&self, row: i32) -> Option<&[Cell]> {
        if row < 0 || row >= self.rows {
            return None;
        }
        let cols = self.cols as usize;
        let from = row as usize * cols;
        Some(&self.cells[from..from + cols])
    }
}

impl fmt::Display for Grid {
    /// One line per row, one glyph per cell (see [`Status::glyph`]).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.cols as usize).enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for c in row {
                write!(f, "{}", c.status.glyph())?;
            }
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GridError;

    /// Parse the text form. Blank lines and surrounding whitespace are
    /// ignored; search marks parse as empty cells.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let rows = lines.len() as i32;
        let cols = lines.first().map_or(0, |l| l.chars().count()) as i32;

        let mut walls = Vec::new();
        let mut start = None;
        let mut end = None;
        for (r, line) in lines.iter().enumerate() {
            if line.chars().count() as i32 != cols {
                return Err(GridError::parse(format!("row {r} is not {cols} cells wide")));
            }
            for (c, ch) in line.chars().enumerate() {
                let p = Pos::new(r as i32, c as i32);
                let status = Status::from_glyph(ch)
                    .ok_or_else(|| GridError::parse(format!("unknown cell '{ch}' at {p}")))?;
                let slot = match status {
                    Status::Wall => {
                        walls.push(p);
                        continue;
                    }
                    Status::Start => &mut start,
                    Status::End => &mut end,
                    _ => continue,
                };
                if slot.replace(p).is_some() {
                    return Err(GridError::parse(format!("duplicate '{ch}' at {p}")));
                }
            }
        }

        let start = start.ok_or_else(|| GridError::parse("missing start 'S'"))?;
        let end = end.ok_or_else(|| GridError::parse("missing end 'E'"))?;
        let mut grid = Grid::new(rows, cols, start, end)?;
        for p in walls {
            grid.set_status(p, Status::Wall);
        }
        Ok(grid)
    }
}
