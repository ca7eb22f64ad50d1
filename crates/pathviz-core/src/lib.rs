//! **pathviz-core**: grid model for the pathfinding visualizer.
//!
//! Provides the [`Grid`] of [`Cell`]s that every other layer works on:
//! construction with validated endpoints, wall editing, endpoint
//! relocation, a reachability precheck and random wall generation.

pub mod cell;
pub mod error;
pub mod geom;
pub mod grid;
pub mod mapgen;
pub mod reach;

pub use cell::{Cell, Status, UNREACHABLE};
pub use error::GridError;
pub use geom::Pos;
pub use grid::{Endpoint, Grid};
pub use mapgen::{DEFAULT_WALL_DENSITY, MAX_UI_WALL_DENSITY, random_walls};
pub use reach::is_reachable;
