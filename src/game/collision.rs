use super::grid::{Cell, Grid};
use super::snake::Snake;

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Test a freshly advanced head against the walls and the pre-shrink body
pub fn detect_collision(grid: &Grid, snake: &Snake, head: Cell) -> Option<CollisionType> {
    if !grid.contains(head) {
        return Some(CollisionType::Wall);
    }

    if snake.collides_with_self(head) {
        return Some(CollisionType::SelfCollision);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;

    #[test]
    fn test_wall_collision() {
        let grid = Grid::new(28, 28);
        let mut snake = Snake::new(Cell::new(0, 5), Direction::Left, 3);
        let head = snake.advance(Direction::Left);

        assert_eq!(head, Cell::new(-1, 5));
        assert_eq!(
            detect_collision(&grid, &snake, head),
            Some(CollisionType::Wall)
        );
    }

    #[test]
    fn test_self_collision_uses_pre_shrink_body() {
        let grid = Grid::new(10, 10);
        // Head at (2,2) moving down into (2,3) which is the current tail
        let mut snake = Snake::from_segments(vec![
            Cell::new(2, 2),
            Cell::new(3, 2),
            Cell::new(3, 3),
            Cell::new(2, 3),
        ])
        .unwrap();
        let head = snake.advance(Direction::Down);

        assert_eq!(
            detect_collision(&grid, &snake, head),
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_free_move() {
        let grid = Grid::new(10, 10);
        let mut snake = Snake::new(Cell::new(5, 5), Direction::Right, 3);
        let head = snake.advance(Direction::Up);
        assert_eq!(detect_collision(&grid, &snake, head), None);
    }
}
