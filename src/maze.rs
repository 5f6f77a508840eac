//! Random wall layouts.

use crate::config::BoardConfig;
use crate::grid::Cell;
use crate::grid::Coord;
use crate::grid::CoordIntrinsic;
use crate::grid::Grid;
use crate::grid::GridError;
use crate::grid::MAX_CELLS;

/// Scatters walls independently over a board, keeping both corners free.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MazeGenerator {
    rows: CoordIntrinsic,
    columns: CoordIntrinsic,
    /// Probability for a cell to become a wall.
    wall_threshold: f64,
}

impl MazeGenerator {
    pub fn new(rows: CoordIntrinsic, columns: CoordIntrinsic, wall_threshold: f64) -> Self {
        Self {
            rows,
            columns,
            wall_threshold,
        }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(config.board_size, config.board_size, config.wall_threshold)
    }

    /// Draws one number per cell in row-major order, the start and goal
    /// corners excluded.
    pub fn generate<R: rand::Rng>(&self, r: &mut R) -> Result<Grid, GridError> {
        let (rows, columns) = (self.rows as usize, self.columns as usize);
        if rows == 0 || columns == 0 {
            return Err(GridError::Empty);
        }
        if !rows.checked_mul(columns).is_some_and(|l| l <= MAX_CELLS) {
            return Err(GridError::TooLarge { rows, columns });
        }

        let start = Coord::new(0, 0);
        let goal = Coord::new(self.rows - 1, self.columns - 1);
        let mut cells = Vec::with_capacity(rows * columns);
        for row in 0..self.rows {
            for column in 0..self.columns {
                let c = Coord::new(row, column);
                cells.push(if c == start || c == goal {
                    Cell::Empty
                } else {
                    Cell::from(r.random::<f64>() < self.wall_threshold)
                });
            }
        }

        let grid = Grid::from_cells(rows, columns, cells)?;
        log::debug!(
            "Generated {:?} with {} walls",
            grid,
            grid.walls().count()
        );
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn endpoints_stay_free() {
        let generator = MazeGenerator::new(10, 10, 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let grid = generator.generate(&mut rng).unwrap();

        assert!(!grid.is_wall(grid.start()).unwrap());
        assert!(!grid.is_wall(grid.goal()).unwrap());
        assert_eq!(grid.walls().count(), 100 - 2);
    }

    #[test]
    fn zero_threshold_has_no_walls() {
        let generator = MazeGenerator::new(50, 50, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let grid = generator.generate(&mut rng).unwrap();

        assert_eq!(grid.walls().count(), 0);
        assert_eq!(grid, Grid::open(50, 50).unwrap());
    }

    #[test]
    fn same_seed_same_maze() {
        let generator = MazeGenerator::new(50, 50, 0.1);
        let a = generator
            .generate(&mut ChaCha8Rng::seed_from_u64(42))
            .unwrap();
        let b = generator
            .generate(&mut ChaCha8Rng::seed_from_u64(42))
            .unwrap();
        let c = generator
            .generate(&mut ChaCha8Rng::seed_from_u64(43))
            .unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn wall_density_follows_threshold() {
        let generator = MazeGenerator::new(100, 100, 0.1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let walls = generator.generate(&mut rng).unwrap().walls().count();

        // ~1000 expected, the binomial deviation is ~30
        assert!((800..1200).contains(&walls), "{walls} walls");
    }

    #[test]
    fn empty_board_is_rejected() {
        let generator = MazeGenerator::new(0, 5, 0.1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(generator.generate(&mut rng), Err(GridError::Empty));
    }
}
