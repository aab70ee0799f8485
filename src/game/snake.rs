use super::direction::Direction;
use super::grid::Cell;

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: Vec<Cell>,
}

impl Snake {
    /// Create a snake of `length` segments trailing behind `head`, opposite to `direction`
    pub fn new(head: Cell, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        let back = direction.opposite();
        for i in 1..length.max(1) {
            let prev = body[i - 1];
            body.push(prev.moved_in_direction(back));
        }

        Self { body }
    }

    /// Build a snake from explicit segments, head first
    #[cfg(test)]
    pub fn from_segments(segments: Vec<Cell>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { body: segments })
        }
    }

    /// Get the head position
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn segments(&self) -> &[Cell] {
        &self.body
    }

    /// Whether any segment, head included, sits on `cell`
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Prepend a new head one step in `direction`. The tail stays; the caller
    /// decides whether to shrink.
    pub fn advance(&mut self, direction: Direction) -> Cell {
        let new_head = self.head().moved_in_direction(direction);
        self.body.insert(0, new_head);
        new_head
    }

    /// Drop the last segment. The head is never removed.
    pub fn shrink_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop();
        }
    }

    /// Append `n` copies of the current tail
    pub fn grow(&mut self, n: usize) {
        let tail = self.tail();
        self.body.extend(std::iter::repeat(tail).take(n));
    }

    /// True if `cell` equals any segment after the head
    pub fn collides_with_self(&self, cell: Cell) -> bool {
        self.body[1..].contains(&cell)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false: a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
