//! Deterministic engine stand-in for controller and session tests.
//!
//! The scripted board parses real level text, checks the submission's shape
//! the way the engine does, and advances a move counter. Every loader clone
//! shares one [`Journal`], so tests can observe loads and releases after the
//! loader has been handed to an [`EngineContext`](crate::EngineContext).

use std::{cell::RefCell, rc::Rc};

use spacecells_core::{catalog, Dimensions, ErrorReason, Matrix, Status, AGENT_COUNT};

use crate::{BoardHandle, BoardLoader, Bot, EngineError, LevelText, Location, Port, Progress};

/// Counters shared by a scripted loader and every board it built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Journal {
    /// Boards built.
    pub loads: u32,
    /// Boards released.
    pub releases: u32,
    /// Moves issued across all boards.
    pub moves: u32,
    /// Reset-and-validate calls across all boards.
    pub validations: u32,
    /// Submission text of the most recent load.
    pub last_submission: String,
}

impl Journal {
    /// Boards built and not yet released.
    #[must_use]
    pub const fn live(&self) -> u32 {
        self.loads.saturating_sub(self.releases)
    }
}

/// Loader producing [`ScriptedBoard`]s.
#[derive(Clone, Debug, Default)]
pub struct ScriptedLoader {
    journal: Rc<RefCell<Journal>>,
    halt_after: Option<u32>,
}

impl ScriptedLoader {
    /// Boards built from now on report done after `moves` moves.
    #[must_use]
    pub fn halting_after(mut self, moves: u32) -> Self {
        self.halt_after = Some(moves);
        self
    }

    /// Snapshot of the shared counters.
    #[must_use]
    pub fn journal(&self) -> Journal {
        self.journal.borrow().clone()
    }
}

impl BoardLoader for ScriptedLoader {
    fn load(&mut self, level: &str, submission: &str) -> Result<Box<dyn BoardHandle>, EngineError> {
        let level = LevelText::parse(level)?;
        let groups = submission_groups(submission, level.dimensions());
        {
            let mut journal = self.journal.borrow_mut();
            journal.loads += 1;
            journal.last_submission = submission.to_owned();
        }
        Ok(Box::new(ScriptedBoard {
            level,
            groups,
            moves: 0,
            halt_after: self.halt_after,
            journal: Rc::clone(&self.journal),
        }))
    }
}

/// Scripted engine board.
#[derive(Debug)]
pub struct ScriptedBoard {
    level: LevelText,
    groups: Option<Vec<Matrix<char>>>,
    moves: u32,
    halt_after: Option<u32>,
    journal: Rc<RefCell<Journal>>,
}

impl ScriptedBoard {
    fn exceeded_cycles(&self) -> bool {
        self.moves >= crate::MAX_CYCLES
    }
}

impl BoardHandle for ScriptedBoard {
    fn dimensions(&self) -> Dimensions {
        self.level.dimensions()
    }

    fn trespassable(&self) -> Matrix<bool> {
        self.level.traversable()
    }

    fn level(&self) -> Matrix<char> {
        self.level.grid().clone()
    }

    fn inputs(&self) -> Vec<Port> {
        ports(self.level.inputs())
    }

    fn outputs(&self) -> Vec<Port> {
        ports(self.level.outputs())
    }

    fn input_bits(&self) -> Vec<Vec<Vec<bool>>> {
        self.level.input_bits().to_vec()
    }

    fn output_colors(&self) -> Vec<Vec<char>> {
        self.level.output_colors().to_vec()
    }

    fn cells(&self) -> Matrix<char> {
        match &self.groups {
            Some(groups) if !groups.is_empty() => groups[0].clone(),
            _ => Matrix::filled(self.level.dimensions(), catalog::EMPTY_GLYPH),
        }
    }

    fn bots(&self) -> Vec<Bot> {
        (0..self.level.bot_count() as usize)
            .map(|agent| {
                let start = self
                    .groups
                    .as_ref()
                    .filter(|_| agent < AGENT_COUNT)
                    .and_then(|groups| groups.get(2 + 2 * agent))
                    .and_then(|operations| operations.iter().find(|(_, glyph)| **glyph == 'S'))
                    .map_or_else(Location::default, |(cell, _)| Location::at(cell));
                Bot {
                    location: start,
                    moving: '<',
                    holding: false,
                    rotating: false,
                }
            })
            .collect()
    }

    fn last_color(&self) -> char {
        let colors: Vec<char> = self.level.output_colors().iter().flatten().copied().collect();
        match self.moves {
            0 => ' ',
            moves => colors
                .get((moves as usize - 1) % colors.len().max(1))
                .copied()
                .unwrap_or(' '),
        }
    }

    fn error(&self) -> String {
        match self.error_reason() {
            ErrorReason::InvalidInput => "submission does not match the level size".to_owned(),
            ErrorReason::TooManyCycles => "too many cycles".to_owned(),
            _ => String::new(),
        }
    }

    fn error_reason(&self) -> ErrorReason {
        if self.groups.is_none() {
            ErrorReason::InvalidInput
        } else if self.exceeded_cycles() {
            ErrorReason::TooManyCycles
        } else {
            ErrorReason::None
        }
    }

    fn check_status(&mut self) -> Status {
        if self.groups.is_none() || self.exceeded_cycles() {
            return Status::Invalid;
        }
        match self.halt_after {
            Some(limit) if self.moves >= limit => Status::Done,
            _ => Status::Running,
        }
    }

    fn reset_and_validate(&mut self) -> bool {
        self.moves = 0;
        self.journal.borrow_mut().validations += 1;
        self.groups.is_some()
    }

    fn step(&mut self) -> bool {
        if self.check_status() != Status::Running {
            return false;
        }
        self.moves += 1;
        self.journal.borrow_mut().moves += 1;
        !self.exceeded_cycles()
    }

    /// Counts non-empty squares across every group.
    fn symbol_count(&self) -> usize {
        self.groups.as_ref().map_or(0, |groups| {
            groups
                .iter()
                .flat_map(Matrix::iter)
                .filter(|(_, glyph)| !catalog::is_empty_glyph(**glyph))
                .count()
        })
    }

    fn progress(&self) -> Progress {
        Progress {
            test_case: 0,
            step: self.moves,
            cycle: self.moves,
            was_next: false,
        }
    }

    fn release(self: Box<Self>) {
        self.journal.borrow_mut().releases += 1;
    }
}

fn ports(cells: &[spacecells_core::CellCoord]) -> Vec<Port> {
    cells
        .iter()
        .map(|&cell| Port {
            location: Location::at(cell),
            power: true,
        })
        .collect()
}

/// Splits submission text into its grids, or `None` when its shape does not
/// match the level.
fn submission_groups(text: &str, dimensions: Dimensions) -> Option<Vec<Matrix<char>>> {
    let rows = dimensions.rows() as usize;
    let columns = dimensions.columns() as usize;
    let lines: Vec<Vec<char>> = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(|line| line.chars().collect())
        .collect();
    let group_count = 1 + 2 * AGENT_COUNT;
    if rows == 0 || lines.len() != rows * group_count || lines.iter().any(|line| line.len() != columns) {
        return None;
    }
    lines
        .chunks(rows)
        .map(|group| Matrix::from_rows(group.to_vec()))
        .collect()
}
