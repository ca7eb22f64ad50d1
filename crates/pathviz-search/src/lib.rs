//! **pathviz-search**: traced search strategies over a [`pathviz_core::Grid`].
//!
//! Each run works on a private deep copy of the caller's grid and records a
//! [`SearchResult`]: the ordered [`SearchStep`] snapshots a player replays,
//! plus the [`Outcome`].
//!
//! | Strategy | Frontier | Shortest path |
//! |---|---|---|
//! | [`AlgorithmId::Bfs`] | FIFO queue | yes |
//! | [`AlgorithmId::Dfs`] | explicit stack | no |
//! | [`AlgorithmId::Dijkstra`] | min distance | yes |
//! | [`AlgorithmId::Astar`] | min `g + h` | yes |
//! | [`AlgorithmId::Greedy`] | min `h` | no |
//! | [`AlgorithmId::Bidirectional`] | two FIFO queues | yes |
//!
//! All strategies expand neighbours in the fixed order up, right, down,
//! left, so traces are reproducible.
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Pather`] | BFS, DFS, bidirectional |
//! | [`WeightedPather`] : [`Pather`] | Dijkstra |
//! | [`AstarPather`] : [`WeightedPather`] | A*, greedy |

mod algorithm;
mod best_first;
mod bfs;
mod bidirectional;
mod dfs;
mod dijkstra;
mod distance;
mod error;
mod frontier;
pub mod reconstruct;
mod trace;
mod traits;

pub use algorithm::{AlgorithmId, run, run_search};
pub use distance::manhattan;
pub use error::SearchError;
pub use trace::{NO_PATH_MESSAGE, Outcome, SearchResult, SearchStep};
pub use traits::{AstarPather, Pather, WeightedPather};
