use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

use super::grid::{Cell, Grid};
use super::powerup::PowerUp;
use super::snake::Snake;

/// Bonus food granting a power-up when collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialFood {
    pub cell: Cell,
    pub kind: PowerUp,
}

/// Random placement of ordinary and special food.
///
/// Cells are drawn uniformly from the grid and redrawn while they land on
/// something. The retry loop has no bound of its own; the only guard is a
/// free-cell count taken up front so a completely full grid yields `None`
/// instead of spinning forever.
pub struct FoodPlacer {
    rng: StdRng,
}

impl FoodPlacer {
    /// Seeded placer, or one seeded from OS entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Pick a cell for ordinary food, avoiding the snake and any active special food
    pub fn place_food(
        &mut self,
        grid: &Grid,
        snake: &Snake,
        special: Option<Cell>,
    ) -> Option<Cell> {
        let blocked: Vec<Cell> = special.into_iter().collect();
        self.sample(grid, snake, &blocked)
    }

    /// Roll for special food right after ordinary food was placed.
    ///
    /// The caller only asks when no special food is currently active.
    pub fn maybe_place_special_food(
        &mut self,
        grid: &Grid,
        snake: &Snake,
        food: Option<Cell>,
        chance: f64,
    ) -> Option<SpecialFood> {
        if !self.rng.gen_bool(chance.clamp(0.0, 1.0)) {
            return None;
        }

        let blocked: Vec<Cell> = food.into_iter().collect();
        let cell = self.sample(grid, snake, &blocked)?;
        let kind = PowerUp::random(&mut self.rng);
        Some(SpecialFood { cell, kind })
    }

    /// Uniform rejection sampling over the grid
    fn sample(&mut self, grid: &Grid, snake: &Snake, blocked: &[Cell]) -> Option<Cell> {
        if free_cells(grid, snake, blocked) == 0 {
            tracing::warn!(
                columns = grid.columns(),
                rows = grid.rows(),
                snake_len = snake.len(),
                "no free cell left for food"
            );
            return None;
        }

        loop {
            let x = self.rng.gen_range(0..grid.columns()) as i32;
            let y = self.rng.gen_range(0..grid.rows()) as i32;
            let cell = Cell::new(x, y);

            if !snake.occupies(cell) && !blocked.contains(&cell) {
                return Some(cell);
            }
        }
    }
}

fn free_cells(grid: &Grid, snake: &Snake, blocked: &[Cell]) -> usize {
    let occupied: HashSet<Cell> = snake
        .segments()
        .iter()
        .chain(blocked)
        .copied()
        .filter(|cell| grid.contains(*cell))
        .collect();
    grid.area() - occupied.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;

    #[test]
    fn test_food_never_on_snake_or_special() {
        let grid = Grid::new(8, 8);
        let snake = Snake::new(Cell::new(5, 5), Direction::Right, 5);
        let special = Cell::new(0, 0);
        let mut placer = FoodPlacer::new(Some(11));

        for _ in 0..2_000 {
            let cell = placer.place_food(&grid, &snake, Some(special)).unwrap();
            assert!(grid.contains(cell));
            assert!(!snake.occupies(cell));
            assert_ne!(cell, special);
        }
    }

    #[test]
    fn test_special_food_avoids_snake_and_food() {
        let grid = Grid::new(6, 6);
        let snake = Snake::new(Cell::new(4, 2), Direction::Right, 4);
        let food = Cell::new(5, 5);
        let mut placer = FoodPlacer::new(Some(5));

        for _ in 0..500 {
            let special = placer
                .maybe_place_special_food(&grid, &snake, Some(food), 1.0)
                .unwrap();
            assert!(grid.contains(special.cell));
            assert!(!snake.occupies(special.cell));
            assert_ne!(special.cell, food);
        }
    }

    #[test]
    fn test_special_food_chance_bounds() {
        let grid = Grid::new(10, 10);
        let snake = Snake::new(Cell::new(5, 5), Direction::Right, 3);
        let mut placer = FoodPlacer::new(Some(1));

        for _ in 0..100 {
            assert!(
                placer
                    .maybe_place_special_food(&grid, &snake, None, 0.0)
                    .is_none()
            );
        }

        let spawned = (0..5_000)
            .filter(|_| {
                placer
                    .maybe_place_special_food(&grid, &snake, None, 0.2)
                    .is_some()
            })
            .count();
        // 20% of 5000 with generous slack
        assert!((800..1200).contains(&spawned), "spawned {spawned}");
    }

    #[test]
    fn test_last_free_cell_is_found() {
        let grid = Grid::new(2, 2);
        let snake = Snake::from_segments(vec![
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(1, 1),
        ])
        .unwrap();
        let mut placer = FoodPlacer::new(Some(9));

        assert_eq!(
            placer.place_food(&grid, &snake, None),
            Some(Cell::new(0, 1))
        );
        assert_eq!(placer.place_food(&grid, &snake, Some(Cell::new(0, 1))), None);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let grid = Grid::new(28, 28);
        let snake = Snake::new(Cell::new(5, 5), Direction::Right, 3);
        let mut a = FoodPlacer::new(Some(42));
        let mut b = FoodPlacer::new(Some(42));

        for _ in 0..20 {
            assert_eq!(
                a.place_food(&grid, &snake, None),
                b.place_food(&grid, &snake, None)
            );
        }
    }
}
