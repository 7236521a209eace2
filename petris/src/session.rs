use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::catalog::{PieceShape, CATALOG};
use crate::config::GameConfig;
use crate::error::Result;
use crate::frame::Frame;
use crate::input::{Key, PendingInput, Shift};
use crate::piece::{ActivePiece, Rotation};
use crate::scoring::Scoring;
use crate::spawn::spawn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    NotStarted,
    Running,
    GameOver,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::NotStarted => write!(f, "Not started"),
            SessionState::Running => write!(f, "Running"),
            SessionState::GameOver => write!(f, "Game over"),
        }
    }
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Something on screen may have changed
    pub redraw: bool,
    /// Lines removed by locks during this tick
    pub lines_cleared: usize,
}

/// One game: the board, the falling piece, score and pending input
///
/// All state changes happen in [`Session::tick`]; key events only record
/// intents for the next tick.
pub struct Session<R = StdRng> {
    config: GameConfig,
    catalog: &'static [PieceShape],
    board: Board,
    active: Option<ActivePiece>,
    input: PendingInput,
    scoring: Scoring,
    // Time accumulated towards the next gravity step
    gravity_delay: Duration,
    state: SessionState,
    rng: R,
}

impl Session<StdRng> {
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Session {
            board: Board::new(config.width, config.height),
            scoring: Scoring::new(&config),
            catalog: &CATALOG,
            active: None,
            input: PendingInput::default(),
            gravity_delay: Duration::ZERO,
            state: SessionState::NotStarted,
            config,
            rng,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn score(&self) -> u64 {
        self.scoring.score()
    }

    pub fn level(&self) -> u64 {
        self.scoring.level()
    }

    pub fn gravity_period(&self) -> Duration {
        self.scoring.gravity_period()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn input(&self) -> &PendingInput {
        &self.input
    }

    /// Start a fresh game, whatever the current state
    pub fn start(&mut self) {
        self.board.clear();
        self.scoring.reset();
        self.input.clear();
        self.gravity_delay = Duration::ZERO;
        self.active = None;
        self.state = SessionState::Running;
        tracing::info!(
            cols = self.board.cols(),
            rows = self.board.rows(),
            "game started"
        );
        self.spawn_next();
    }

    /// Pause a running game. A finished game stays finished.
    pub fn stop(&mut self) {
        if self.state == SessionState::Running {
            self.state = SessionState::NotStarted;
            tracing::info!(score = self.score(), "game stopped");
        }
    }

    pub fn key_down(&mut self, key: Key) {
        self.input.key_down(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.key_up(key);
    }

    pub fn set_horizontal(&mut self, shift: Option<Shift>) {
        self.input.horizontal = shift;
    }

    pub fn request_rotation(&mut self, rotation: Rotation) {
        self.input.rotate = Some(rotation);
    }

    pub fn set_soft_drop(&mut self, soft_drop: bool) {
        self.input.soft_drop = soft_drop;
    }

    pub fn frame(&self) -> Frame {
        Frame::compose(
            &self.board,
            self.active.as_ref(),
            self.score(),
            self.level(),
            self.state,
        )
    }

    /// Advance by one configured tick period
    pub fn tick(&mut self) -> TickOutcome {
        self.advance(self.config.tick_interval())
    }

    /// Advance by `elapsed`: gravity first, then rotation, horizontal move and soft drop
    pub fn advance(&mut self, elapsed: Duration) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if !self.is_running() {
            return outcome;
        }

        self.gravity_delay += elapsed;
        if self.gravity_delay >= self.scoring.gravity_period() {
            self.gravity_delay = Duration::ZERO;
            outcome.lines_cleared += self.descend();
            outcome.redraw = true;
            if !self.is_running() {
                return outcome;
            }
        }

        if let Some(rotation) = self.input.rotate.take() {
            if self.try_rotate(rotation) {
                outcome.redraw = true;
            }
        }

        if let Some(shift) = self.input.horizontal {
            self.try_move(shift.dx(), 0);
            outcome.redraw = true;
        }

        if self.input.soft_drop {
            outcome.lines_cleared += self.descend();
            outcome.redraw = true;
        }

        tracing::trace!(?outcome, "tick");
        outcome
    }

    // Change position of the active piece, if it's possible
    fn try_move(&mut self, dx: isize, dy: isize) -> bool {
        let Some(piece) = &mut self.active else {
            return false;
        };
        if self.board.overlaps(piece.cells(), piece.x() + dx, piece.y() + dy) {
            return false;
        }
        piece.shift(dx, dy);
        true
    }

    fn try_rotate(&mut self, rotation: Rotation) -> bool {
        let Some(piece) = &mut self.active else {
            return false;
        };
        let rotated = piece.rotated(rotation);
        if self.board.overlaps(&rotated, piece.x(), piece.y()) {
            return false;
        }
        piece.set_cells(rotated);
        true
    }

    // One row down, or lock when blocked. Returns the lines cleared by the lock.
    fn descend(&mut self) -> usize {
        if self.try_move(0, 1) {
            0
        } else {
            self.lock()
        }
    }

    fn lock(&mut self) -> usize {
        let Some(piece) = self.active.take() else {
            return 0;
        };
        self.board.place(&piece);
        let lines = self.board.clear_full_lines();
        let points = self.scoring.add_lines(lines);
        tracing::debug!(
            x = piece.x(),
            y = piece.y(),
            lines,
            points,
            score = self.score(),
            "piece locked"
        );
        self.spawn_next();
        lines
    }

    fn spawn_next(&mut self) {
        let piece = spawn(
            self.catalog,
            self.config.palette_size,
            self.board.cols(),
            &mut self.rng,
        );
        if self.board.overlaps(piece.cells(), piece.x(), piece.y()) {
            self.active = None;
            self.state = SessionState::GameOver;
            tracing::info!(score = self.score(), level = self.level(), "game over");
            return;
        }
        self.active = Some(piece);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{rotate, Cell};

    fn session() -> Session {
        Session::with_seed(GameConfig::default(), 1).unwrap()
    }

    fn block() -> ActivePiece {
        ActivePiece::from_shape(&CATALOG[3].cells, 5, 2, -1)
    }

    fn board_snapshot(session: &Session) -> Vec<Cell> {
        let board = session.board();
        (0..board.rows()).flat_map(|y| board.row(y).to_vec()).collect()
    }

    #[test]
    fn test_new_session_not_started() {
        let mut session = session();
        assert_eq!(session.state(), SessionState::NotStarted);
        assert!(session.active().is_none());
        // Ticks outside of Running are no-ops
        assert_eq!(session.tick(), TickOutcome::default());
        assert_eq!(session.advance(Duration::from_secs(60)), TickOutcome::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Session::with_seed(GameConfig::default().with_board_size(2, 2), 0).is_err());
    }

    #[test]
    fn test_start_spawns_centered_piece() {
        let mut session = session();
        session.start();
        assert_eq!(session.state(), SessionState::Running);
        let piece = session.active().unwrap();
        assert_eq!(piece.x(), 2);
        assert_eq!(piece.blocks().map(|(_, y, _)| y).min(), Some(0));
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 0);
    }

    #[test]
    fn test_gravity_waits_for_period() {
        let mut session = session();
        session.start();
        session.active = Some(block());

        // 1000 ms gravity with 80 ms ticks: twelve ticks accumulate 960 ms
        for _ in 0..12 {
            let outcome = session.tick();
            assert!(!outcome.redraw);
        }
        assert_eq!(session.active().unwrap().y(), -1);
        let outcome = session.tick();
        assert!(outcome.redraw);
        assert_eq!(session.active().unwrap().y(), 0);
        assert_eq!(session.gravity_delay, Duration::ZERO);
    }

    #[test]
    fn test_gravity_locks_and_respawns() {
        let mut session = session();
        session.start();
        // Block resting on the floor: frame rows 1..=2 on board rows 10..=11
        session.active = Some(ActivePiece::from_shape(&CATALOG[3].cells, 5, 2, 9));
        session.advance(Duration::from_millis(1000));

        assert_eq!(session.board().block_at(3, 11), Cell::Block(5));
        assert_eq!(session.board().block_at(4, 10), Cell::Block(5));
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.active().unwrap().x(), 2);
        // No lines, no points
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_horizontal_move_until_release() {
        let mut session = session();
        session.start();
        session.active = Some(block());

        session.key_down(Key::Left);
        assert!(session.tick().redraw);
        assert_eq!(session.active().unwrap().x(), 1);
        session.tick();
        assert_eq!(session.active().unwrap().x(), 0);
        // Block sits in frame columns 1..=2, so x = -1 still fits
        session.tick();
        assert_eq!(session.active().unwrap().x(), -1);
        // Wall on the left: blocked but still dirty
        let outcome = session.tick();
        assert!(outcome.redraw);
        assert_eq!(session.active().unwrap().x(), -1);

        session.key_up(Key::Left);
        assert!(!session.tick().redraw);
        assert_eq!(session.active().unwrap().x(), -1);
    }

    #[test]
    fn test_rotation_is_single_shot() {
        let mut session = session();
        session.start();
        let bar = ActivePiece::from_shape(&CATALOG[2].cells, 1, 2, 3);
        session.active = Some(bar);

        session.key_down(Key::Rotate);
        assert!(session.tick().redraw);
        assert_eq!(
            *session.active().unwrap().cells(),
            rotate(bar.cells(), Rotation::CounterClockwise)
        );
        assert!(session.input().rotate.is_none());
        assert!(!session.tick().redraw);

        session.request_rotation(Rotation::Clockwise);
        session.tick();
        assert_eq!(session.active().unwrap().cells(), bar.cells());
    }

    #[test]
    fn test_blocked_rotation_rejected() {
        let mut session = session();
        session.start();
        // Horizontal bar flat on the floor can't turn vertical
        let bar = ActivePiece::from_shape(&CATALOG[2].cells, 1, 2, 10);
        session.active = Some(bar);
        session.request_rotation(Rotation::Clockwise);
        let outcome = session.tick();
        assert!(!outcome.redraw);
        assert_eq!(*session.active().unwrap(), bar);
        assert!(session.input().rotate.is_none());
    }

    #[test]
    fn test_soft_drop_descends_and_locks() {
        let mut session = session();
        session.start();
        session.active = Some(ActivePiece::from_shape(&CATALOG[3].cells, 5, 2, 8));
        session.set_soft_drop(true);

        session.tick();
        assert_eq!(session.active().unwrap().y(), 9);
        session.tick();
        // Blocked: locked in place and a new piece spawned
        assert_eq!(session.board().block_at(3, 11), Cell::Block(5));
        assert_eq!(session.active().unwrap().x(), 2);

        session.key_up(Key::Down);
        assert!(!session.input().soft_drop);
    }

    #[test]
    fn test_intents_after_lock_apply_to_new_piece() {
        let mut session = session();
        session.start();
        session.active = Some(ActivePiece::from_shape(&CATALOG[3].cells, 5, 2, 9));
        session.set_horizontal(Some(Shift::Right));
        session.advance(Duration::from_millis(1000));

        // The old piece was locked where it was, the new one moved right
        assert_eq!(session.board().block_at(3, 11), Cell::Block(5));
        assert_eq!(session.board().block_at(4, 11), Cell::Block(5));
        assert_eq!(session.active().unwrap().x(), 3);
    }

    #[test]
    fn test_line_clear_through_lock() {
        let mut session = session();
        session.start();
        let bottom = 11;
        for x in 0..8 {
            if x != 3 {
                session.board.set_cell(x, bottom, Cell::Block(1));
            }
        }
        session.board.set_cell(0, bottom - 1, Cell::Block(7));
        let bar = rotate(&CATALOG[2].cells, Rotation::Clockwise);
        session.active = Some(ActivePiece::from_shape(&bar, 4, 1, bottom - 3));

        let outcome = session.advance(Duration::from_millis(1000));
        assert_eq!(outcome.lines_cleared, 1);
        assert_eq!(session.score(), 1);
        assert_eq!(session.board().block_at(0, bottom), Cell::Block(7));
        assert_eq!(session.board().block_at(3, bottom), Cell::Block(4));
        assert_eq!(session.board().block_at(1, bottom), Cell::Empty);
    }

    #[test]
    fn test_spawn_overlap_ends_game() {
        let mut session = session();
        session.start();
        // Every cell but column 0 is filled, no row can be full
        for y in 0..12 {
            for x in 1..8 {
                session.board.set_cell(x, y, Cell::Block(1));
            }
        }
        session.active = Some(ActivePiece::from_shape(&CATALOG[3].cells, 5, 2, 0));
        session.advance(Duration::from_millis(1000));

        assert_eq!(session.state(), SessionState::GameOver);
        assert!(session.active().is_none());
        assert!(session.frame().is_game_over());

        let before = board_snapshot(&session);
        session.key_down(Key::Down);
        session.key_down(Key::Left);
        for _ in 0..50 {
            assert_eq!(session.tick(), TickOutcome::default());
        }
        assert_eq!(board_snapshot(&session), before);

        // Stop doesn't leave game over, start does
        session.stop();
        assert_eq!(session.state(), SessionState::GameOver);
        session.start();
        assert_eq!(session.state(), SessionState::Running);
        assert!(session.board().row(5).iter().all(Cell::is_empty));
        assert!(session.input().is_idle());
    }

    #[test]
    fn test_stop_and_restart() {
        let mut session = session();
        session.start();
        session.stop();
        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(session.tick(), TickOutcome::default());
        session.start();
        assert!(session.is_running());
    }

    #[test]
    fn test_level_up_speeds_gravity() {
        let config = GameConfig::default().with_line_scores(vec![1000]);
        let mut session = Session::with_seed(config, 5).unwrap();
        session.start();
        for x in 0..8 {
            if x != 3 {
                session.board.set_cell(x, 11, Cell::Block(1));
            }
        }
        let bar = rotate(&CATALOG[2].cells, Rotation::Clockwise);
        session.active = Some(ActivePiece::from_shape(&bar, 4, 1, 8));
        session.advance(Duration::from_millis(1000));
        assert_eq!(session.score(), 1000);
        assert_eq!(session.level(), 1);
        assert_eq!(session.gravity_period(), Duration::from_millis(900));
    }

    #[test]
    fn test_frame_reflects_session() {
        let mut session = session();
        session.start();
        let frame = session.frame();
        assert_eq!(frame.state, SessionState::Running);
        assert_eq!(frame.cols, 8);
        assert_eq!(frame.rows, 12);
        let piece_cells = frame.cells.iter().filter(|cell| cell.is_occupied()).count();
        assert_eq!(piece_cells, 4);
    }
}
