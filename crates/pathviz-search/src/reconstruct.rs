//! Backpointer walks from a reached cell to its search root.

use pathviz_core::{Grid, Pos};

use crate::error::SearchError;

/// Follow `prev` from `from` until `root`, returning `[from, ..., root]`.
///
/// A missing link, or a chain longer than `limit` cells (a cycle), is a
/// [`SearchError::BrokenChain`].
pub fn walk(
    from: Pos,
    root: Pos,
    limit: usize,
    mut prev: impl FnMut(Pos) -> Option<Pos>,
) -> Result<Vec<Pos>, SearchError> {
    let mut chain = vec![from];
    let mut cur = from;
    while cur != root {
        if chain.len() >= limit {
            return Err(SearchError::BrokenChain { at: cur, root });
        }
        cur = prev(cur).ok_or(SearchError::BrokenChain { at: cur, root })?;
        chain.push(cur);
    }
    Ok(chain)
}

/// The path from the grid's start to its end along the `previous` links
/// stored in its cells, start and end inclusive.
pub fn reconstruct(grid: &Grid) -> Result<Vec<Pos>, SearchError> {
    let mut path = walk(grid.end(), grid.start(), grid.len(), |p| {
        grid.at(p).and_then(|c| c.previous)
    })?;
    path.reverse();
    Ok(path)
}

/// Join two half-paths at `meet`: forward links lead from `meet` back to
/// `start`, backward links lead from `meet` on to `end`.
pub fn reconstruct_joined(
    meet: Pos,
    start: Pos,
    end: Pos,
    limit: usize,
    forward: impl FnMut(Pos) -> Option<Pos>,
    backward: impl FnMut(Pos) -> Option<Pos>,
) -> Result<Vec<Pos>, SearchError> {
    let mut path = walk(meet, start, limit, forward)?;
    path.reverse();
    let tail = walk(meet, end, limit, backward)?;
    path.extend(tail.into_iter().skip(1));
    Ok(path)
}
