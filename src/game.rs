use log::{debug, error, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{Coords, GRID_COUNT};
use crate::snake::{Crash, Direction::{self, *}, MoveResult, Snake};
use crate::storage::HighScoreStore;

pub const SCORE_INCREMENT: u32 = 10;
pub const BOARD_CENTER: Coords = (GRID_COUNT / 2, GRID_COUNT / 2);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Over,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    Wall,
    Body,
    /// Nowhere left to put food: the snake covers the board.
    BoardFull,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, or still waiting for the first direction.
    Idle,
    Moved,
    Ate,
    GameOver(GameOverReason),
}

pub struct SnakeGame {
    snake: Snake,
    direction: Direction,
    pending: Option<Direction>,
    food: Coords,
    score: u32,
    high_score: u32,
    state: RunState,
    over_reason: Option<GameOverReason>,
    rng: StdRng,
    store: Box<dyn HighScoreStore>,
}

impl SnakeGame {
    pub fn new(store: Box<dyn HighScoreStore>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let high_score = store.load().unwrap_or(0);
        info!("Loaded high score {}", high_score);

        let mut game = SnakeGame {
            snake: Snake::new(BOARD_CENTER),
            direction: Idle,
            pending: None,
            food: BOARD_CENTER,
            score: 0,
            high_score,
            state: RunState::Idle,
            over_reason: None,
            rng,
            store,
        };
        game.reset();
        game
    }

    pub fn reset(&mut self) {
        self.snake = Snake::new(BOARD_CENTER);
        self.direction = Idle;
        self.pending = None;
        self.score = 0;
        self.state = RunState::Idle;
        self.over_reason = None;
        // A single-cell snake always leaves room for food.
        self.food = self.random_free_cell().unwrap_or((0, 0));
        debug!("Game reset, food at {:?}", self.food);
    }

    /// Queues a turn for the next tick. Only the last accepted request of a
    /// tick is applied.
    pub fn set_direction(&mut self, requested: Direction) {
        if self.state != RunState::Running || requested == Idle {
            return;
        }
        if requested.is_opposite(self.direction) {
            return;
        }
        self.pending = Some(requested);
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.state != RunState::Running {
            return TickOutcome::Idle;
        }

        if let Some(dir) = self.pending.take() {
            self.direction = dir;
        }
        if self.direction == Idle {
            return TickOutcome::Idle;
        }

        match self.snake.move_step(self.direction, self.food) {
            MoveResult::Crashed(crash) => {
                let reason = match crash {
                    Crash::Wall => GameOverReason::Wall,
                    Crash::Body => GameOverReason::Body,
                };
                self.game_over(reason);
                TickOutcome::GameOver(reason)
            }
            MoveResult::Grew { new_head } => {
                self.score += SCORE_INCREMENT;
                debug!("Ate food at {:?}, score {}", new_head, self.score);
                match self.random_free_cell() {
                    Some(cell) => {
                        self.food = cell;
                        TickOutcome::Ate
                    }
                    None => {
                        self.game_over(GameOverReason::BoardFull);
                        TickOutcome::GameOver(GameOverReason::BoardFull)
                    }
                }
            }
            MoveResult::Moved { .. } => TickOutcome::Moved,
        }
    }

    /// Returns whether the state changed.
    pub fn start(&mut self) -> bool {
        match self.state {
            RunState::Running => false,
            RunState::Paused => self.resume(),
            RunState::Idle => {
                self.state = RunState::Running;
                info!("Game started");
                true
            }
            RunState::Over => {
                self.reset();
                self.state = RunState::Running;
                info!("Game started after game over");
                true
            }
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.state != RunState::Running {
            return false;
        }
        self.state = RunState::Paused;
        debug!("Paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != RunState::Paused {
            return false;
        }
        self.state = RunState::Running;
        debug!("Resumed");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
            _ => false,
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn head(&self) -> Coords {
        self.snake.head()
    }

    pub fn food(&self) -> Coords {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.over_reason
    }

    pub fn direction(&self) -> Direction {
        self.pending.unwrap_or(self.direction)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn game_over(&mut self, reason: GameOverReason) {
        self.state = RunState::Over;
        self.over_reason = Some(reason);
        info!("Game over ({:?}) with score {}", reason, self.score);

        if self.score > self.high_score {
            self.high_score = self.score;
            info!("New high score {}", self.high_score);
            if let Err(e) = self.store.save(self.high_score) {
                error!("Could not save high score: {:#}", e);
            }
        }
    }

    fn random_free_cell(&mut self) -> Option<Coords> {
        if self.snake.len() >= (GRID_COUNT * GRID_COUNT) as usize {
            return None;
        }

        loop {
            let cell = (self.rng.gen_range(0..GRID_COUNT), self.rng.gen_range(0..GRID_COUNT));
            if !self.snake.contains(cell) {
                return Some(cell);
            }
        }
    }

    #[cfg(test)]
    pub fn force_layout(&mut self, cells: &[Coords], direction: Direction, food: Coords) {
        self.snake = Snake::from_cells(cells);
        self.direction = direction;
        self.pending = None;
        self.food = food;
    }

    #[cfg(test)]
    pub fn force_score(&mut self, score: u32) {
        self.score = score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    fn running_game(store: MemoryStore) -> SnakeGame {
        let mut game = SnakeGame::new(Box::new(store), Some(7));
        assert!(game.start());
        game
    }

    fn food_is_free(game: &SnakeGame) -> bool {
        !game.snake().contains(game.food())
    }

    #[test]
    fn reset_puts_a_lone_head_in_the_center() {
        let game = SnakeGame::new(Box::new(MemoryStore::default()), Some(1));

        assert_eq!(game.snake().body().iter().copied().collect::<Vec<_>>(), vec![(10, 10)]);
        assert_eq!(game.direction(), Idle);
        assert_eq!(game.score(), 0);
        assert_eq!(game.run_state(), RunState::Idle);
        assert!(food_is_free(&game));
    }

    #[test]
    fn high_score_is_loaded_from_the_store() {
        let game = SnakeGame::new(Box::new(MemoryStore::with(120)), Some(1));
        assert_eq!(game.high_score(), 120);
    }

    #[test]
    fn first_step_to_the_right() {
        let mut game = running_game(MemoryStore::default());
        game.force_layout(&[(10, 10)], Idle, (0, 0));

        game.set_direction(Right);
        assert_eq!(game.tick(), TickOutcome::Moved);

        assert_eq!(game.head(), (11, 10));
        assert_eq!(game.snake().len(), 1);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn idle_snake_waits_for_a_direction() {
        let mut game = running_game(MemoryStore::default());
        for _ in 0..5 {
            assert_eq!(game.tick(), TickOutcome::Idle);
        }
        assert_eq!(game.head(), BOARD_CENTER);
        assert_eq!(game.run_state(), RunState::Running);
    }

    #[test]
    fn eating_grows_and_scores() {
        let mut game = running_game(MemoryStore::default());
        game.force_layout(&[(5, 5)], Right, (6, 5));

        assert_eq!(game.tick(), TickOutcome::Ate);

        assert_eq!(game.snake().body().iter().copied().collect::<Vec<_>>(), vec![(6, 5), (5, 5)]);
        assert_eq!(game.score(), 10);
        assert_ne!(game.food(), (6, 5));
        assert_ne!(game.food(), (5, 5));
    }

    #[test]
    fn reversal_is_rejected() {
        let mut game = running_game(MemoryStore::default());
        game.force_layout(&[(10, 10), (9, 10)], Right, (0, 0));

        game.set_direction(Left);
        assert_eq!(game.direction(), Right);

        game.tick();
        assert_eq!(game.head(), (11, 10));
    }

    #[test]
    fn two_quick_turns_can_not_fold_back() {
        let mut game = running_game(MemoryStore::default());
        game.force_layout(&[(10, 10), (9, 10), (8, 10)], Right, (0, 0));

        game.set_direction(Up);
        game.set_direction(Left);
        assert_eq!(game.direction(), Up);

        game.tick();
        assert_eq!(game.head(), (10, 9));
        assert_eq!(game.run_state(), RunState::Running);
    }

    #[test]
    fn last_turn_of_a_tick_wins() {
        let mut game = running_game(MemoryStore::default());
        game.force_layout(&[(10, 10)], Right, (0, 0));

        game.set_direction(Up);
        game.set_direction(Down);
        game.tick();
        assert_eq!(game.head(), (10, 11));
    }

    #[test]
    fn direction_is_ignored_unless_running() {
        let mut game = SnakeGame::new(Box::new(MemoryStore::default()), Some(3));
        game.set_direction(Up);
        assert_eq!(game.direction(), Idle);

        game.start();
        game.pause();
        game.set_direction(Up);
        assert_eq!(game.direction(), Idle);

        game.resume();
        game.set_direction(Up);
        assert_eq!(game.direction(), Up);
    }

    #[test]
    fn wall_ends_the_game_and_records_high_score() {
        let store = MemoryStore::with(20);
        let mut game = running_game(store.clone());
        game.force_layout(&[(0, 5)], Left, (9, 9));
        game.force_score(30);

        assert_eq!(game.tick(), TickOutcome::GameOver(GameOverReason::Wall));

        assert_eq!(game.run_state(), RunState::Over);
        assert_eq!(game.high_score(), 30);
        assert_eq!(*store.saves.borrow(), vec![30]);
        assert_eq!(*store.slot.borrow(), Some(30));
    }

    #[test]
    fn lower_score_leaves_high_score_alone() {
        let store = MemoryStore::with(20);
        let mut game = running_game(store.clone());
        game.force_layout(&[(19, 0)], Up, (9, 9));
        game.force_score(10);

        assert_eq!(game.tick(), TickOutcome::GameOver(GameOverReason::Wall));

        assert_eq!(game.high_score(), 20);
        assert!(store.saves.borrow().is_empty());
    }

    #[test]
    fn biting_the_body_ends_the_game() {
        let mut game = running_game(MemoryStore::default());
        game.force_layout(&[(3, 4), (4, 4), (4, 5), (3, 5), (2, 5)], Left, (9, 9));

        game.set_direction(Down);
        assert_eq!(game.tick(), TickOutcome::GameOver(GameOverReason::Body));
        assert_eq!(game.game_over_reason(), Some(GameOverReason::Body));
    }

    #[test]
    fn every_tick_moves_or_grows_by_one() {
        let mut game = running_game(MemoryStore::default());
        let turns = [Right, Down, Left, Up];
        let mut turn = 0;

        for step in 0..200 {
            if game.run_state() != RunState::Running {
                break;
            }
            if step % 4 == 0 {
                game.set_direction(turns[turn % turns.len()]);
                turn += 1;
            }

            let before_len = game.snake().len();
            let (hx, hy) = game.head();
            let (dx, dy) = game.direction().offset();
            let outcome = game.tick();

            match outcome {
                TickOutcome::Moved => {
                    assert_eq!(game.snake().len(), before_len);
                    assert_eq!(game.head(), (hx + dx, hy + dy));
                }
                TickOutcome::Ate => {
                    assert_eq!(game.snake().len(), before_len + 1);
                    assert_eq!(game.head(), (hx + dx, hy + dy));
                }
                TickOutcome::GameOver(_) | TickOutcome::Idle => {}
            }
            assert!(food_is_free(&game));
        }
    }

    #[test]
    fn lifecycle_transitions() {
        let mut game = SnakeGame::new(Box::new(MemoryStore::default()), Some(5));
        assert!(!game.pause());
        assert!(!game.resume());

        assert!(game.start());
        assert!(!game.start());
        assert_eq!(game.run_state(), RunState::Running);

        assert!(game.toggle_pause());
        assert_eq!(game.run_state(), RunState::Paused);
        assert_eq!(game.tick(), TickOutcome::Idle);

        assert!(game.start());
        assert_eq!(game.run_state(), RunState::Running);
    }

    #[test]
    fn start_after_game_over_begins_a_fresh_game() {
        let mut game = running_game(MemoryStore::default());
        game.force_layout(&[(0, 0), (1, 0)], Left, (9, 9));
        game.force_score(40);
        game.tick();
        assert_eq!(game.run_state(), RunState::Over);

        assert!(game.start());
        assert_eq!(game.run_state(), RunState::Running);
        assert_eq!(game.head(), BOARD_CENTER);
        assert_eq!(game.snake().len(), 1);
        assert_eq!(game.score(), 0);
        assert_eq!(game.direction(), Idle);
        assert_eq!(game.game_over_reason(), None);
        assert_eq!(game.high_score(), 40);
    }

    #[test]
    fn filling_the_board_ends_the_game() {
        let mut game = running_game(MemoryStore::default());

        // Boustrophedon path over the whole board, ending one cell short of food at (0, 19).
        let mut cells = Vec::new();
        for y in 0..GRID_COUNT {
            let row: Vec<Coords> = if y % 2 == 0 {
                (0..GRID_COUNT).map(|x| (x, y)).collect()
            } else {
                (0..GRID_COUNT).rev().map(|x| (x, y)).collect()
            };
            cells.extend(row);
        }
        let food = cells.pop().unwrap();
        cells.reverse();
        game.force_layout(&cells, Left, food);

        assert_eq!(game.tick(), TickOutcome::GameOver(GameOverReason::BoardFull));
        assert_eq!(game.snake().len(), (GRID_COUNT * GRID_COUNT) as usize);
    }
}
