use std::collections::VecDeque;

use crate::{Coords, GRID_COUNT};
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Idle,
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn offset(self) -> (i16, i16) {
        match self {
            Idle => (0, 0),
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Crash {
    Wall,
    Body,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Coords, old_tail: Coords },
    Grew { new_head: Coords },
    Crashed(Crash),
}

/// The snake body, head first. Cells are always distinct and on the board.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Coords>,
}

impl Snake {
    pub fn new(head: Coords) -> Self {
        let mut body = VecDeque::with_capacity((GRID_COUNT * GRID_COUNT) as usize);
        body.push_front(head);
        Snake { body }
    }

    #[cfg(test)]
    pub fn from_cells(cells: &[Coords]) -> Self {
        Snake { body: cells.iter().copied().collect() }
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, pos: Coords) -> bool {
        self.body.contains(&pos)
    }

    /// Advances one cell in `direction`. The tail stays put when the new head
    /// lands on `food`.
    pub fn move_step(&mut self, direction: Direction, food: Coords) -> MoveResult {
        let old_head = self.head();
        let (dx, dy) = direction.offset();
        let new_head = (old_head.0 + dx, old_head.1 + dy);

        if !in_bounds(new_head) {
            return Crashed(Crash::Wall);
        }

        // The head vacates its own cell, every other segment is still there.
        if self.body.iter().skip(1).any(|pos| *pos == new_head) {
            return Crashed(Crash::Body);
        }

        self.body.push_front(new_head);

        if new_head == food {
            Grew { new_head }
        } else {
            let old_tail = self.body.pop_back().unwrap_or(new_head);
            Moved { new_head, old_tail }
        }
    }

    pub fn head_char(direction: Direction) -> char {
        match direction {
            Idle => '@',
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

pub fn in_bounds(pos: Coords) -> bool {
    pos.0 >= 0 && pos.1 >= 0 && pos.0 < GRID_COUNT && pos.1 < GRID_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_without_food_keeps_length() {
        let mut snake = Snake::from_cells(&[(3, 3), (2, 3), (1, 3)]);
        let res = snake.move_step(Right, (10, 10));

        assert_eq!(res, Moved { new_head: (4, 3), old_tail: (1, 3) });
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), (4, 3));
    }

    #[test]
    fn eating_keeps_the_tail() {
        let mut snake = Snake::new((5, 5));
        let res = snake.move_step(Right, (6, 5));

        assert_eq!(res, Grew { new_head: (6, 5) });
        assert_eq!(snake.body().iter().copied().collect::<Vec<_>>(), vec![(6, 5), (5, 5)]);
    }

    #[test]
    fn leaving_the_board_crashes() {
        let mut snake = Snake::new((0, 5));
        assert_eq!(snake.move_step(Left, (9, 9)), Crashed(Crash::Wall));

        let mut snake = Snake::new((GRID_COUNT - 1, 0));
        assert_eq!(snake.move_step(Right, (9, 9)), Crashed(Crash::Wall));
        assert_eq!(snake.move_step(Up, (9, 9)), Crashed(Crash::Wall));
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn running_into_the_body_crashes() {
        // Head at (3,4), turning down into (3,5) which is body.
        let mut snake = Snake::from_cells(&[(3, 4), (4, 4), (4, 5), (3, 5), (2, 5)]);
        assert_eq!(snake.move_step(Down, (9, 9)), Crashed(Crash::Body));
    }

    #[test]
    fn tail_cell_counts_as_body() {
        let mut snake = Snake::from_cells(&[(3, 4), (4, 4), (4, 5), (3, 5)]);
        assert_eq!(snake.move_step(Down, (9, 9)), Crashed(Crash::Body));
    }

    #[test]
    fn opposite_directions() {
        assert!(Up.is_opposite(Down));
        assert!(Left.is_opposite(Right));
        assert!(!Up.is_opposite(Left));
        assert!(!Idle.is_opposite(Right));
        assert!(!Right.is_opposite(Idle));
    }
}
