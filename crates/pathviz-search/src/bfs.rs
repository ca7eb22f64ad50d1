use std::collections::VecDeque;

use pathviz_core::Status;

use crate::algorithm::AlgorithmId;
use crate::error::SearchError;
use crate::reconstruct::reconstruct;
use crate::trace::{SearchResult, Tracer, cell_label};
use crate::traits::Pather;

/// Breadth-first search with a FIFO frontier.
///
/// Every expansion is recorded twice: once when the cell starts being
/// processed and once when all its neighbours have been discovered. The
/// end cell is never expanded; popping it terminates the search.
pub(crate) fn search<P: Pather>(pather: &P, mut tracer: Tracer) -> Result<SearchResult, SearchError> {
    let (start, end) = (tracer.grid().start(), tracer.grid().end());
    let mut seen = vec![false; tracer.grid().len()];
    let mut queue = VecDeque::new();
    let mut nbuf = Vec::with_capacity(4);

    if let Some(si) = tracer.grid().index(start) {
        seen[si] = true;
        tracer.set_distance(start, 0);
        queue.push_back(start);
    }

    let mut found = false;
    while let Some(cur) = queue.pop_front() {
        if cur == end {
            found = true;
            break;
        }
        let label = cell_label(cur);
        tracer.mark(cur, Status::Visiting);
        tracer.record(format!("Visiting cell at {label}"));

        let dist = tracer.distance(cur);
        nbuf.clear();
        pather.neighbors(cur, &mut nbuf);
        for &np in nbuf.iter() {
            let Some(ni) = tracer.grid().index(np) else {
                continue;
            };
            if seen[ni] {
                continue;
            }
            seen[ni] = true;
            tracer.link(np, cur, dist + 1);
            tracer.mark(np, Status::Visiting);
            queue.push_back(np);
        }

        tracer.mark(cur, Status::Visited);
        tracer.record(format!("Finished visiting cell at {label}"));
    }

    let path = if found {
        Some(reconstruct(tracer.grid())?)
    } else {
        None
    };
    Ok(tracer.conclude(AlgorithmId::Bfs, path))
}
