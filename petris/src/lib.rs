//! # petris
//!
//! Game core for a falling-block puzzle on a small fixed-size board.
//!
//! ## Overview
//!
//! A [`Session`] owns the board, the falling piece, the score and the pending
//! player input. Nothing moves outside of [`Session::tick`]: key events only
//! record intents, which the next tick applies after gravity. A [`Runner`]
//! drives a session from a [`Ticker`] and a command channel; the display is
//! any [`Renderer`], fed from a composited [`Frame`].
//!
//! ## Example
//!
//! ```rust
//! use petris::{GameConfig, Key, Session, SessionState};
//!
//! let mut session = Session::with_seed(GameConfig::default(), 7).unwrap();
//! session.start();
//! session.key_down(Key::Left);
//! session.tick();
//! assert_eq!(session.state(), SessionState::Running);
//! ```

// Module declarations
pub mod board;
pub mod catalog;
pub mod config;
pub mod error;
pub mod frame;
pub mod input;
pub mod piece;
pub mod runner;
pub mod scoring;
pub mod session;
pub mod spawn;

// Re-exports for convenience
pub use board::Board;
pub use catalog::{PieceShape, CATALOG};
pub use config::GameConfig;
pub use error::{PetrisError, Result};
pub use frame::{Frame, Renderer, GAME_OVER_TEXT};
pub use input::{Key, PendingInput, Shift};
pub use piece::{ActivePiece, Cell, ColorIndex, Rotation};
pub use runner::{ChannelTicker, Command, IntervalTicker, Runner, StepResult, Ticker};
pub use scoring::Scoring;
pub use session::{Session, SessionState, TickOutcome};
