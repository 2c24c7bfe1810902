#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the SpaceCells editor.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired edits, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what changed. Systems read the board exclusively through the
//! [`BoardView`] trait and respond with new command batches.

pub mod catalog;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use catalog::{GlyphMatch, Glyphs, KindId, SymbolKind, SymbolVariant};

/// Number of agents (bots) every program controls.
pub const AGENT_COUNT: usize = 2;

/// One of the two independently programmed bots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Agent {
    /// Agent 0, drawn red.
    First,
    /// Agent 1, drawn blue.
    Second,
}

impl Agent {
    /// Both agents in storage order.
    pub const ALL: [Agent; AGENT_COUNT] = [Agent::First, Agent::Second];

    /// Zero-based storage index of the agent.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    /// Resolves a storage index into an agent.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            _ => None,
        }
    }
}

/// Location of a single board square expressed as row and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new square coordinate from `(y, x)`.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index (`y`).
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index (`x`).
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Translates the coordinate, returning `None` when it would leave the
    /// non-negative quadrant.
    #[must_use]
    pub fn offset(self, delta: CellOffset) -> Option<CellCoord> {
        let row = i64::from(self.row).checked_add(delta.rows)?;
        let column = i64::from(self.column).checked_add(delta.columns)?;
        Some(CellCoord::new(
            u32::try_from(row).ok()?,
            u32::try_from(column).ok()?,
        ))
    }

    /// Offset that translates `self` onto `other`.
    #[must_use]
    pub fn offset_to(self, other: CellCoord) -> CellOffset {
        CellOffset::new(
            i64::from(other.row) - i64::from(self.row),
            i64::from(other.column) - i64::from(self.column),
        )
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Signed displacement between two squares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellOffset {
    /// Rows moved; positive is downward.
    pub rows: i64,
    /// Columns moved; positive is rightward.
    pub columns: i64,
}

impl CellOffset {
    /// No displacement.
    pub const ZERO: CellOffset = CellOffset::new(0, 0);

    /// Creates a new displacement.
    #[must_use]
    pub const fn new(rows: i64, columns: i64) -> Self {
        Self { rows, columns }
    }

    /// Reports whether the offset moves nothing.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.rows == 0 && self.columns == 0
    }
}

/// Board size `m × n`, fixed per level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    rows: u32,
    columns: u32,
}

impl Dimensions {
    /// Creates a new size descriptor.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Number of rows (`m`).
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns (`n`).
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Reports whether the coordinate lies within `[0, m) × [0, n)`.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Row-major index of the coordinate, if in bounds.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    /// Total number of squares.
    #[must_use]
    pub fn area(&self) -> usize {
        let area = u64::from(self.rows) * u64::from(self.columns);
        usize::try_from(area).unwrap_or(0)
    }

    /// Iterates over every coordinate in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(row, column)))
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// Dense row-major matrix keyed by [`CellCoord`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix<T> {
    dimensions: Dimensions,
    values: Vec<T>,
}

impl<T> Matrix<T> {
    /// Builds a matrix by evaluating `f` for every coordinate.
    pub fn from_fn(dimensions: Dimensions, mut f: impl FnMut(CellCoord) -> T) -> Self {
        let values = dimensions.cells().map(&mut f).collect();
        Self { dimensions, values }
    }

    /// Builds a matrix from nested rows, rejecting ragged input.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let row_count = u32::try_from(rows.len()).ok()?;
        let column_count = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != column_count) {
            return None;
        }
        let dimensions = Dimensions::new(row_count, u32::try_from(column_count).ok()?);
        let values = rows.into_iter().flatten().collect();
        Some(Self { dimensions, values })
    }

    /// Size of the matrix.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Value stored at the coordinate, if in bounds.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<&T> {
        self.dimensions
            .index(cell)
            .and_then(|index| self.values.get(index))
    }

    /// Iterates over `(coordinate, value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &T)> {
        self.dimensions.cells().zip(self.values.iter())
    }
}

impl<T: Clone> Matrix<T> {
    /// Builds a matrix where every square holds `value`.
    #[must_use]
    pub fn filled(dimensions: Dimensions, value: T) -> Self {
        Self {
            dimensions,
            values: vec![value; dimensions.area()],
        }
    }
}

/// Category deciding which storage slot of a square a symbol occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolCategory {
    /// Board reactive element, shared by both agents.
    Cell,
    /// Per-agent movement instruction.
    Direction,
    /// Per-agent operation instruction.
    Operation,
}

impl SymbolCategory {
    /// Storage slot for the category, given the owning agent.
    ///
    /// Cells ignore the agent; instructions require one.
    #[must_use]
    pub const fn slot(self, agent: Option<Agent>) -> Option<Slot> {
        match (self, agent) {
            (Self::Cell, _) => Some(Slot::Cell),
            (Self::Direction, Some(agent)) => Some(Slot::Direction(agent)),
            (Self::Operation, Some(agent)) => Some(Slot::Operation(agent)),
            _ => None,
        }
    }
}

/// One of the five symbol slots held by every square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    /// The cell symbol slot.
    Cell,
    /// Direction instruction of an agent.
    Direction(Agent),
    /// Operation instruction of an agent.
    Operation(Agent),
}

impl Slot {
    /// All slots, in submission group order.
    pub const ALL: [Slot; 5] = [
        Slot::Cell,
        Slot::Direction(Agent::First),
        Slot::Operation(Agent::First),
        Slot::Direction(Agent::Second),
        Slot::Operation(Agent::Second),
    ];

    /// Category of symbols that may occupy the slot.
    #[must_use]
    pub const fn category(self) -> SymbolCategory {
        match self {
            Self::Cell => SymbolCategory::Cell,
            Self::Direction(_) => SymbolCategory::Direction,
            Self::Operation(_) => SymbolCategory::Operation,
        }
    }

    /// Agent owning the slot, if the slot is per agent.
    #[must_use]
    pub const fn agent(self) -> Option<Agent> {
        match self {
            Self::Cell => None,
            Self::Direction(agent) | Self::Operation(agent) => Some(agent),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell => write!(f, "cell"),
            Self::Direction(agent) => write!(f, "agent {} direction", agent.index()),
            Self::Operation(agent) => write!(f, "agent {} operation", agent.index()),
        }
    }
}

/// Footprint of a symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arity {
    /// Occupies one square.
    Single,
    /// Occupies `(y, x)` and `(y, x + 1)`.
    HorizontalPair,
    /// Occupies `(y, x)` and `(y + 1, x)`.
    VerticalPair,
}

impl Arity {
    /// Reports whether the symbol spans two squares.
    #[must_use]
    pub const fn is_pair(self) -> bool {
        !matches!(self, Self::Single)
    }

    /// Displacement from the anchor square to the partner square.
    #[must_use]
    pub const fn partner_offset(self) -> Option<CellOffset> {
        match self {
            Self::Single => None,
            Self::HorizontalPair => Some(CellOffset::new(0, 1)),
            Self::VerticalPair => Some(CellOffset::new(1, 0)),
        }
    }

    /// Squares covered by a symbol anchored at `anchor`.
    ///
    /// The partner is `None` for single symbols and when the partner would
    /// fall outside the non-negative quadrant; bounds against a board are
    /// the caller's concern.
    #[must_use]
    pub fn footprint(self, anchor: CellCoord) -> (CellCoord, Option<CellCoord>) {
        let partner = self
            .partner_offset()
            .and_then(|offset| anchor.offset(offset));
        (anchor, partner)
    }
}

/// Distinguishes the two halves of a double-square symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Half {
    /// Primary square, index 0. Single symbols are always anchors.
    Anchor,
    /// Dependent neighbour, index 1.
    Partner,
}

impl Half {
    /// Numeric index of the half (0 anchor, 1 partner).
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Anchor => 0,
            Self::Partner => 1,
        }
    }
}

/// Identity shared by both halves of a placed symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Creates a new instance identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Board location recorded for a placed symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoardTrace {
    /// Anchor square of the symbol.
    pub anchor: CellCoord,
    /// Slot the symbol occupies in each covered square.
    pub slot: Slot,
}

/// Runtime instance of a symbol, on the board or in the palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolState {
    /// Identity shared by both halves of the symbol.
    pub id: InstanceId,
    /// Catalog entry describing the symbol.
    pub kind: KindId,
    /// Selected option of the kind.
    pub variant: u8,
    /// Agent owning the symbol; `None` for cells.
    pub agent: Option<Agent>,
    /// Board location, `None` while the symbol lives in the palette.
    pub trace: Option<BoardTrace>,
    /// Whether the symbol is part of the current selection.
    pub selected: bool,
    /// Whether the symbol is an engine-assigned marker the player cannot edit.
    pub fixed: bool,
}

impl SymbolState {
    /// Creates a palette instance that is not yet on the board.
    #[must_use]
    pub const fn palette(id: InstanceId, kind: KindId, variant: u8, agent: Option<Agent>) -> Self {
        Self {
            id,
            kind,
            variant,
            agent,
            trace: None,
            selected: false,
            fixed: false,
        }
    }

    /// Catalog entry of the symbol.
    #[must_use]
    pub fn definition(&self) -> &'static SymbolKind {
        self.kind.kind()
    }

    /// Glyphs of the current variant, falling back to the canonical value.
    #[must_use]
    pub fn glyphs(&self) -> Glyphs {
        let kind = self.definition();
        kind.variant(self.variant)
            .or_else(|| kind.variants.first())
            .map_or(Glyphs::single(catalog::EMPTY_GLYPH), |variant| variant.glyphs)
    }

    /// Slot the symbol would occupy given its category and agent.
    #[must_use]
    pub fn slot(&self) -> Option<Slot> {
        self.definition().category.slot(self.agent)
    }

    /// Whether the symbol is placed on the board.
    #[must_use]
    pub const fn on_board(&self) -> bool {
        self.trace.is_some()
    }
}

/// How a selection command combines with the existing selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectMode {
    /// Replace the selection with the provided symbols.
    Replace,
    /// Add the provided symbols to the selection.
    Add,
    /// Remove the provided symbols from the selection.
    Remove,
    /// Flip membership of each provided symbol.
    Toggle,
}

/// Level terrain supplied by the engine when a level loads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Terrain {
    traversable: Matrix<bool>,
    inputs: Vec<CellCoord>,
    outputs: Vec<CellCoord>,
}

impl Terrain {
    /// Creates terrain from the engine's traversable matrix and I/O squares.
    #[must_use]
    pub fn new(traversable: Matrix<bool>, inputs: Vec<CellCoord>, outputs: Vec<CellCoord>) -> Self {
        Self {
            traversable,
            inputs,
            outputs,
        }
    }

    /// Fully traversable terrain without inputs or outputs.
    #[must_use]
    pub fn open(dimensions: Dimensions) -> Self {
        Self::new(Matrix::filled(dimensions, true), Vec::new(), Vec::new())
    }

    /// Size of the level.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.traversable.dimensions()
    }

    /// Whether symbols may be stored on the square.
    #[must_use]
    pub fn is_traversable(&self, cell: CellCoord) -> bool {
        self.traversable.get(cell).copied().unwrap_or(false)
    }

    /// Input squares in engine order.
    #[must_use]
    pub fn inputs(&self) -> &[CellCoord] {
        &self.inputs
    }

    /// Output squares in engine order.
    #[must_use]
    pub fn outputs(&self) -> &[CellCoord] {
        &self.outputs
    }

    /// Reports whether the square is an input or output.
    #[must_use]
    pub fn is_io(&self, cell: CellCoord) -> bool {
        self.inputs.contains(&cell) || self.outputs.contains(&cell)
    }
}

/// Commands that express all permissible edits of the board.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs level terrain, clearing the board and placing fixed markers
    /// on the input squares.
    ConfigureLevel {
        /// Terrain reported by the engine for the level.
        terrain: Terrain,
    },
    /// Replaces the board contents with a parsed submission.
    LoadSubmission {
        /// Five-grid submission text.
        text: String,
    },
    /// Places a fresh copy of a palette symbol.
    PlaceSymbol {
        /// Kind of symbol to place.
        kind: KindId,
        /// Option of the kind.
        variant: u8,
        /// Owning agent for instructions; ignored for cells.
        agent: Option<Agent>,
        /// Anchor square of the placement.
        at: CellCoord,
    },
    /// Updates the selected flag of on-board symbols.
    Select {
        /// Symbols addressed by the command.
        ids: Vec<InstanceId>,
        /// How the provided symbols combine with the selection.
        mode: SelectMode,
    },
    /// Deselects every on-board symbol.
    ClearSelection,
    /// Relocates, or clones, every selected symbol by the offset.
    MoveSelection {
        /// Displacement applied to each selected symbol.
        offset: CellOffset,
        /// Keep the originals and place copies at the destination.
        copy: bool,
    },
    /// Deletes every selected symbol except permanent ones.
    TrashSelection,
    /// Changes the option of an on-board symbol.
    SetVariant {
        /// Symbol to update.
        id: InstanceId,
        /// New option of the kind.
        variant: u8,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that level terrain was installed.
    LevelConfigured {
        /// Size of the configured board.
        dimensions: Dimensions,
    },
    /// Confirms that a submission replaced the board contents.
    SubmissionLoaded {
        /// Number of distinct symbols on the board.
        symbols: u32,
        /// Symbols dropped because the level forbids their squares.
        discarded: u32,
    },
    /// Reports that submission text could not be parsed. The board is unchanged.
    SubmissionRejected {
        /// Reason the text was rejected.
        error: ParseError,
    },
    /// Confirms that a palette symbol was placed.
    SymbolPlaced {
        /// Identity allocated to the placed symbol.
        id: InstanceId,
        /// Anchor square of the placement.
        at: CellCoord,
        /// Slot the symbol occupies.
        slot: Slot,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Kind requested for placement.
        kind: KindId,
        /// Anchor square of the request.
        at: CellCoord,
        /// Rule that rejected the placement.
        reason: PlacementError,
    },
    /// Announces that the set of selected symbols changed.
    SelectionChanged {
        /// Number of selected symbols after the change.
        selected: u32,
    },
    /// Confirms that the selection moved or was cloned.
    SymbolsMoved {
        /// Number of symbols written at the destination.
        count: u32,
        /// Displacement applied.
        offset: CellOffset,
        /// Whether originals were kept.
        copy: bool,
    },
    /// Reports that a move request was rejected; nothing changed.
    MoveRejected {
        /// Rule rejecting the first symbol that did not fit.
        reason: PlacementError,
    },
    /// Confirms that the trash consumed the selection.
    SymbolsTrashed {
        /// Symbols removed from the board.
        removed: u32,
        /// Permanent symbols that were only deselected.
        retained: u32,
    },
    /// Confirms that a symbol's option changed.
    VariantChanged {
        /// Symbol whose option changed.
        id: InstanceId,
        /// New option of the kind.
        variant: u8,
    },
}

impl Event {
    /// Reports whether the event altered the serialized submission.
    #[must_use]
    pub const fn changes_submission(&self) -> bool {
        match self {
            Self::LevelConfigured { .. }
            | Self::SubmissionLoaded { .. }
            | Self::SymbolPlaced { .. }
            | Self::SymbolsMoved { .. }
            | Self::VariantChanged { .. } => true,
            Self::SymbolsTrashed { removed, .. } => *removed > 0,
            Self::SubmissionRejected { .. }
            | Self::PlacementRejected { .. }
            | Self::SelectionChanged { .. }
            | Self::MoveRejected { .. } => false,
        }
    }
}

/// Reasons a symbol does not fit at a destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum PlacementError {
    /// The anchor square lies outside the board.
    #[error("destination lies outside the board")]
    OutOfBounds,
    /// The partner square of a double symbol lies outside the board.
    #[error("partner square lies outside the board")]
    PartnerOutOfBounds,
    /// A covered square is not traversable terrain.
    #[error("square is not traversable")]
    Blocked,
    /// A covered square already holds an unselected symbol in the slot.
    #[error("square is already occupied")]
    Occupied,
    /// A covered square is an input or output.
    #[error("input and output squares are fixed")]
    FixedSquare,
    /// The symbol has no slot, such as an instruction without an agent.
    #[error("symbol has no slot for the requested agent")]
    NoSlot,
}

/// Reasons submission text could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text does not hold five groups of `m` lines.
    #[error("expected {expected} non-empty lines, found {found}")]
    LineCount {
        /// Required number of lines (`5 × m`).
        expected: usize,
        /// Number of lines found.
        found: usize,
    },
    /// A line does not hold `n` glyphs.
    #[error("row {row} of the {group} grid has {found} glyphs, expected {expected}")]
    LineLength {
        /// Group containing the line.
        group: Slot,
        /// Row index within the group.
        row: u32,
        /// Required number of glyphs (`n`).
        expected: usize,
        /// Number of glyphs found.
        found: usize,
    },
    /// A glyph does not belong to the group's category.
    #[error("unrecognised glyph {glyph:?} at {cell} of the {group} grid")]
    UnknownGlyph {
        /// Group containing the glyph.
        group: Slot,
        /// Square holding the glyph.
        cell: CellCoord,
        /// Offending glyph.
        glyph: char,
    },
    /// The partner of a double-square glyph falls outside the board.
    #[error("partner of the glyph at {cell} of the {group} grid lies outside the board")]
    PartnerOutOfBounds {
        /// Group containing the glyph.
        group: Slot,
        /// Square holding the glyph.
        cell: CellCoord,
    },
    /// The partner square does not carry the other half of the symbol.
    #[error("expected {expected:?} at {cell} of the {group} grid, found {found:?}")]
    MismatchedPartner {
        /// Group containing the glyph.
        group: Slot,
        /// Partner square.
        cell: CellCoord,
        /// Glyph of the missing half.
        expected: char,
        /// Glyph actually present.
        found: char,
    },
    /// The partner square already belongs to another double-square symbol.
    #[error("square {cell} of the {group} grid is claimed by two symbols")]
    PartnerConflict {
        /// Group containing the glyph.
        group: Slot,
        /// Contested square.
        cell: CellCoord,
    },
}

/// Status reported by the simulation engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// The board failed validation and cannot run.
    Invalid,
    /// The board is valid and can advance.
    Running,
    /// Every test case passed.
    Done,
}

/// Category of the last engine error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorReason {
    /// No error was recorded.
    #[default]
    None,
    /// The level text was malformed.
    InvalidLevel,
    /// The submission was malformed or violates level rules.
    InvalidInput,
    /// A bot instruction failed while executing.
    RuntimeError,
    /// The output color did not match the expected color.
    WrongOutput,
    /// The program exceeded the cycle limit.
    TooManyCycles,
}

/// Read-only access to the board used by pure systems.
pub trait BoardView {
    /// Size of the board.
    fn dimensions(&self) -> Dimensions;

    /// Whether symbols may be stored on the square.
    fn is_traversable(&self, cell: CellCoord) -> bool;

    /// Whether the square is an input or output.
    fn is_io(&self, cell: CellCoord) -> bool;

    /// Symbol occupying the slot of the square, if any.
    fn occupant(&self, cell: CellCoord, slot: Slot) -> Option<&SymbolState>;

    /// Symbol with the provided identity, if it is on the board.
    fn symbol(&self, id: InstanceId) -> Option<&SymbolState>;

    /// Every on-board symbol, once per identity, ordered by identity.
    fn symbols(&self) -> Vec<&SymbolState>;
}
