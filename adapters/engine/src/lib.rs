#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Contract with the external SpaceCells simulation engine.
//!
//! The engine is reached through two traits: a [`BoardLoader`] builds a
//! board from level and submission text, and the resulting [`BoardHandle`]
//! answers queries and advances the simulation. [`EngineContext`] owns at
//! most one handle at a time and always releases the previous one before a
//! replacement is built. Query results leave the context only as owned
//! [`LevelReadout`] and [`RunReadout`] captures.

mod level;
mod readout;
#[cfg(any(test, feature = "scripted"))]
pub mod scripted;

use serde::{Deserialize, Serialize};
use spacecells_core::{CellCoord, Dimensions, ErrorReason, Matrix, Status};
use spacecells_system_stepping::{StepFault, StepTarget};
use tracing::{debug, warn};

pub use level::{LevelError, LevelText};
pub use readout::{LevelReadout, RunReadout};

/// Cycle limit after which the engine reports [`ErrorReason::TooManyCycles`].
pub const MAX_CYCLES: u32 = 999;

/// Square reference reported by the engine. Invalid locations carry no square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Whether the location refers to a square.
    pub valid: bool,
    /// Row of the square.
    pub y: u32,
    /// Column of the square.
    pub x: u32,
}

impl Location {
    /// Valid location of the square.
    #[must_use]
    pub const fn at(cell: CellCoord) -> Self {
        Self {
            valid: true,
            y: cell.row(),
            x: cell.column(),
        }
    }

    /// Square the location refers to, if valid.
    #[must_use]
    pub const fn cell(&self) -> Option<CellCoord> {
        if self.valid {
            Some(CellCoord::new(self.y, self.x))
        } else {
            None
        }
    }
}

/// Input or output square with its power state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Port {
    /// Square of the port.
    pub location: Location,
    /// Whether the port is powered. Inputs always report `true`.
    pub power: bool,
}

/// Agent state reported by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bot {
    /// Current square, invalid before the bot is started.
    pub location: Location,
    /// Heading as a direction glyph (`<`, `v`, `>`, `^`).
    pub moving: char,
    /// Whether the bot holds a cell.
    pub holding: bool,
    /// Whether a rotation is in progress.
    pub rotating: bool,
}

/// Position of the simulation within the level's test cases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Progress {
    /// Test case being run.
    pub test_case: u32,
    /// I/O step within the test case.
    pub step: u32,
    /// Cycles spent so far.
    pub cycle: u32,
    /// Whether the last move executed a NEXT instruction.
    pub was_next: bool,
}

/// A loaded engine board.
///
/// Handles are exclusively owned; [`BoardHandle::release`] consumes the
/// handle and frees engine resources.
pub trait BoardHandle {
    /// Size of the level.
    fn dimensions(&self) -> Dimensions;

    /// Squares where instructions may be stored.
    fn trespassable(&self) -> Matrix<bool>;

    /// Level glyphs.
    fn level(&self) -> Matrix<char>;

    /// Input ports in level order.
    fn inputs(&self) -> Vec<Port>;

    /// Output ports in level order.
    fn outputs(&self) -> Vec<Port>;

    /// Input bits indexed `[test case][input][step]`.
    fn input_bits(&self) -> Vec<Vec<Vec<bool>>>;

    /// Expected output colors indexed `[test case][step]`.
    fn output_colors(&self) -> Vec<Vec<char>>;

    /// Current cell glyphs.
    fn cells(&self) -> Matrix<char>;

    /// Agents in index order.
    fn bots(&self) -> Vec<Bot>;

    /// Color most recently delivered to an output.
    fn last_color(&self) -> char;

    /// Message describing the last error, empty when none.
    fn error(&self) -> String;

    /// Category of the last error.
    fn error_reason(&self) -> ErrorReason;

    /// Current status.
    fn check_status(&mut self) -> Status;

    /// Resets the simulation and validates the board, returning whether it
    /// can run.
    fn reset_and_validate(&mut self) -> bool;

    /// Advances one move, returning whether it completed without an error.
    fn step(&mut self) -> bool;

    /// Number of symbols the submission placed.
    fn symbol_count(&self) -> usize;

    /// Position within the test cases.
    fn progress(&self) -> Progress;

    /// Frees the board.
    fn release(self: Box<Self>);
}

/// Builds engine boards.
pub trait BoardLoader {
    /// Builds a board for the level and submission.
    ///
    /// Fails only when the level text is malformed; a malformed submission
    /// still yields a board that reports [`Status::Invalid`].
    fn load(&mut self, level: &str, submission: &str) -> Result<Box<dyn BoardHandle>, EngineError>;
}

/// Errors raised while building or accessing an engine board.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The engine was queried before any level was loaded.
    #[error("no engine board is loaded")]
    NotLoaded,
    /// The level text was rejected.
    #[error("level text rejected: {0}")]
    InvalidLevel(#[from] LevelError),
    /// The engine failed to build a board for another reason.
    #[error("engine could not build the board: {message}")]
    LoadFailed {
        /// Engine-provided description.
        message: String,
    },
}

/// Owner of the single live engine board.
pub struct EngineContext<L> {
    loader: L,
    board: Option<Box<dyn BoardHandle>>,
}

impl<L> EngineContext<L> {
    /// Creates a context with no board loaded.
    #[must_use]
    pub const fn new(loader: L) -> Self {
        Self {
            loader,
            board: None,
        }
    }

    /// Loader used to build boards.
    #[must_use]
    pub const fn loader(&self) -> &L {
        &self.loader
    }

    /// Whether a board is loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.board.is_some()
    }

    /// Releases the loaded board, if any.
    pub fn teardown(&mut self) {
        if let Some(board) = self.board.take() {
            debug!("releasing engine board");
            board.release();
        }
    }

    /// Captures the level description of the loaded board.
    pub fn level_readout(&self) -> Result<LevelReadout, EngineError> {
        match self.board.as_deref() {
            Some(board) => Ok(LevelReadout::capture(board)),
            None => Err(EngineError::NotLoaded),
        }
    }

    /// Captures the simulation state of the loaded board.
    pub fn run_readout(&mut self) -> Result<RunReadout, EngineError> {
        let board = self.board.as_mut().ok_or(EngineError::NotLoaded)?;
        Ok(RunReadout::capture(&mut **board))
    }

    /// Current status of the loaded board.
    pub fn check_status(&mut self) -> Result<Status, EngineError> {
        let board = self.board.as_mut().ok_or(EngineError::NotLoaded)?;
        Ok(board.check_status())
    }

    /// Resets and re-validates the loaded board, returning its status.
    pub fn revalidate(&mut self) -> Result<Status, EngineError> {
        let board = self.board.as_mut().ok_or(EngineError::NotLoaded)?;
        let valid = board.reset_and_validate();
        let status = board.check_status();
        debug!(valid, ?status, "engine board revalidated");
        Ok(status)
    }

    /// Advances the loaded board by one move, returning its status.
    ///
    /// Step faults are recorded by the engine and surface through the status
    /// and the run readout.
    pub fn step(&mut self) -> Result<Status, EngineError> {
        let board = self.board.as_mut().ok_or(EngineError::NotLoaded)?;
        if !board.step() {
            debug!(reason = ?board.error_reason(), "engine move reported an error");
        }
        Ok(board.check_status())
    }
}

impl<L: BoardLoader> EngineContext<L> {
    /// Releases the current board and builds one for the provided texts.
    ///
    /// On failure no board remains loaded.
    pub fn load(&mut self, level: &str, submission: &str) -> Result<Status, EngineError> {
        self.teardown();
        let mut board = self.loader.load(level, submission)?;
        let status = board.check_status();
        debug!(
            ?status,
            symbols = board.symbol_count(),
            "engine board loaded"
        );
        self.board = Some(board);
        Ok(status)
    }
}

impl<L> Drop for EngineContext<L> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<L> std::fmt::Debug for EngineContext<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

impl<L> StepTarget for EngineContext<L> {
    fn advance(&mut self) -> Result<(), StepFault> {
        let Some(board) = self.board.as_mut() else {
            warn!("move requested without an engine board");
            return Err(StepFault::new(EngineError::NotLoaded.to_string()));
        };
        if board.step() {
            Ok(())
        } else {
            Err(StepFault::new(board.error()))
        }
    }

    fn status(&mut self) -> Status {
        self.check_status().unwrap_or(Status::Invalid)
    }

    fn reset_and_validate(&mut self) {
        if let Err(error) = self.revalidate() {
            warn!(%error, "validation requested without an engine board");
        }
    }
}
