use pathviz_core::{Pos, Status};

use crate::algorithm::AlgorithmId;
use crate::error::SearchError;
use crate::reconstruct::reconstruct;
use crate::trace::{SearchResult, Tracer, cell_label};
use crate::traits::Pather;

/// One cell on the explicit DFS stack.
struct Frame {
    pos: Pos,
    depth: i32,
    nbrs: Vec<Pos>,
    next: usize,
}

/// Enter `p`: mark it, record it, and report whether it is the end.
fn enter(tracer: &mut Tracer, seen: &mut [bool], p: Pos, depth: i32) -> bool {
    if let Some(i) = tracer.grid().index(p) {
        seen[i] = true;
    }
    tracer.mark(p, Status::Visiting);
    tracer.record(format!("Visiting cell at {} (depth: {depth})", cell_label(p)));
    p == tracer.grid().end()
}

/// Depth-first search on an explicit stack.
///
/// Neighbours are taken in the fixed order and the search stops the moment
/// the end is entered, so the reported path is whatever branch got there
/// first. Exhausted cells are marked visited and stay that way.
pub(crate) fn search<P: Pather>(pather: &P, mut tracer: Tracer) -> Result<SearchResult, SearchError> {
    let start = tracer.grid().start();
    let mut seen = vec![false; tracer.grid().len()];
    let mut stack: Vec<Frame> = Vec::new();

    tracer.set_distance(start, 0);
    let mut found = enter(&mut tracer, &mut seen, start, 0);
    if !found {
        let mut nbrs = Vec::with_capacity(4);
        pather.neighbors(start, &mut nbrs);
        stack.push(Frame {
            pos: start,
            depth: 0,
            nbrs,
            next: 0,
        });
    }

    while !found {
        let Some(top) = stack.last_mut() else {
            break;
        };
        match top.nbrs.get(top.next).copied() {
            Some(np) => {
                top.next += 1;
                let (cur, depth) = (top.pos, top.depth);
                let Some(ni) = tracer.grid().index(np) else {
                    continue;
                };
                if seen[ni] {
                    continue;
                }
                tracer.link(np, cur, depth + 1);
                found = enter(&mut tracer, &mut seen, np, depth + 1);
                if !found {
                    let mut nbrs = Vec::with_capacity(4);
                    pather.neighbors(np, &mut nbrs);
                    stack.push(Frame {
                        pos: np,
                        depth: depth + 1,
                        nbrs,
                        next: 0,
                    });
                }
            }
            None => {
                let pos = top.pos;
                stack.pop();
                tracer.mark(pos, Status::Visited);
                tracer.record(format!("Backtracking from cell at {}", cell_label(pos)));
            }
        }
    }

    let path = if found {
        Some(reconstruct(tracer.grid())?)
    } else {
        None
    };
    Ok(tracer.conclude(AlgorithmId::Dfs, path))
}
