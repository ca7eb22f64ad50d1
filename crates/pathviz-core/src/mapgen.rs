//! Random wall generation.

use rand::{Rng, RngExt};

use crate::cell::Status;
use crate::grid::Grid;

/// Upper bound offered by editing front ends for the density control.
pub const MAX_UI_WALL_DENSITY: u8 = 40;

/// Default wall density, in percent.
pub const DEFAULT_WALL_DENSITY: u8 = 20;

/// Scatter walls over `grid`.
///
/// Existing walls are cleared first; then every cell that is not an
/// endpoint becomes a wall with probability `density_pct / 100` (clamped to
/// 100). Search marks on cells that stay open are left in place. Returns the
/// number of walls placed.
pub fn random_walls(grid: &mut Grid, density_pct: u8, rng: &mut impl Rng) -> usize {
    grid.clear_walls();
    let p = f64::from(density_pct.min(100)) / 100.0;

    let mut placed = 0;
    for i in 0..grid.len() {
        let pos = grid.pos(i);
        if grid.status(pos).is_some_and(Status::is_endpoint) {
            continue;
        }
        if rng.random_bool(p) && grid.set_wall(pos, true) {
            placed += 1;
        }
    }
    log::debug!(
        "placed {placed} walls on a {}x{} grid at {density_pct}% density",
        grid.rows(),
        grid.cols()
    );
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Pos;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn grid() -> Grid {
        Grid::new(10, 20, Pos::new(1, 1), Pos::new(8, 18)).unwrap()
    }

    #[test]
    fn zero_density_clears_walls() {
        let mut g = grid();
        g.toggle_wall(Pos::new(3, 3)).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(random_walls(&mut g, 0, &mut rng), 0);
        assert_eq!(g.count(Status::Wall), 0);
    }

    #[test]
    fn full_density_walls_everything_but_endpoints() {
        let mut g = grid();
        let mut rng = StdRng::seed_from_u64(7);
        let placed = random_walls(&mut g, 100, &mut rng);
        assert_eq!(placed, g.len() - 2);
        assert_eq!(g.status(g.start()), Some(Status::Start));
        assert_eq!(g.status(g.end()), Some(Status::End));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let mut a = grid();
        let mut b = grid();
        random_walls(&mut a, 30, &mut StdRng::seed_from_u64(42));
        random_walls(&mut b, 30, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert_eq!(a.count(Status::Wall), b.count(Status::Wall));
    }

    #[test]
    fn density_is_roughly_honoured() {
        let mut g = Grid::new(50, 50, Pos::ZERO, Pos::new(49, 49)).unwrap();
        let placed = random_walls(&mut g, 20, &mut StdRng::seed_from_u64(1));
        // 2498 candidate cells at 20%: expect ~500.
        assert!((350..650).contains(&placed), "placed {placed}");
    }
}
