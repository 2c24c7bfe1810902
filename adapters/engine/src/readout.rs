use spacecells_core::{Dimensions, ErrorReason, Matrix, Status, Terrain};

use crate::{BoardHandle, Bot, Port, Progress};

/// Owned copy of a board's level description, taken once per load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelReadout {
    /// Size of the level.
    pub dimensions: Dimensions,
    /// Squares where symbols may be stored.
    pub trespassable: Matrix<bool>,
    /// Level glyphs.
    pub level: Matrix<char>,
    /// Input ports in level order.
    pub inputs: Vec<Port>,
    /// Output ports in level order.
    pub outputs: Vec<Port>,
    /// Input bits indexed `[test case][input][step]`.
    pub input_bits: Vec<Vec<Vec<bool>>>,
    /// Expected output colors indexed `[test case][step]`.
    pub output_colors: Vec<Vec<char>>,
}

impl LevelReadout {
    /// Copies the level description out of the board.
    #[must_use]
    pub fn capture(board: &dyn BoardHandle) -> Self {
        Self {
            dimensions: board.dimensions(),
            trespassable: board.trespassable(),
            level: board.level(),
            inputs: board.inputs(),
            outputs: board.outputs(),
            input_bits: board.input_bits(),
            output_colors: board.output_colors(),
        }
    }

    /// Number of test cases the level runs.
    #[must_use]
    pub fn test_cases(&self) -> usize {
        self.output_colors.len()
    }

    /// Terrain the editor enforces for the level. Ports with invalid
    /// locations are skipped.
    #[must_use]
    pub fn terrain(&self) -> Terrain {
        let cells = |ports: &[Port]| {
            ports
                .iter()
                .filter_map(|port| port.location.cell())
                .collect::<Vec<_>>()
        };
        Terrain::new(
            self.trespassable.clone(),
            cells(&self.inputs),
            cells(&self.outputs),
        )
    }
}

/// Owned copy of the simulation state after a move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReadout {
    /// Engine status.
    pub status: Status,
    /// Category of the last error.
    pub error_reason: ErrorReason,
    /// Description of the last error, if any.
    pub error: Option<String>,
    /// Current cell glyphs.
    pub cells: Matrix<char>,
    /// Agents in index order.
    pub bots: Vec<Bot>,
    /// Output ports with their current power.
    pub outputs: Vec<Port>,
    /// Color most recently delivered to an output.
    pub last_color: char,
    /// Position within the test cases.
    pub progress: Progress,
    /// Number of symbols the submission placed.
    pub symbol_count: usize,
}

impl RunReadout {
    /// Copies the simulation state out of the board.
    #[must_use]
    pub fn capture(board: &mut dyn BoardHandle) -> Self {
        let status = board.check_status();
        let error = board.error();
        Self {
            status,
            error_reason: board.error_reason(),
            error: (!error.is_empty()).then_some(error),
            cells: board.cells(),
            bots: board.bots(),
            outputs: board.outputs(),
            last_color: board.last_color(),
            progress: board.progress(),
            symbol_count: board.symbol_count(),
        }
    }
}
