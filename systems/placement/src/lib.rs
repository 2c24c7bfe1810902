#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure placement rules deciding whether a symbol fits at a destination.
//!
//! The checks never mutate the board. The world runs them authoritatively
//! before writing, and the editor runs them while a drag hovers to preview
//! whether a drop would succeed.

use spacecells_core::{
    Agent, BoardView, CellCoord, CellOffset, KindId, PlacementError, Slot, SymbolState,
};

/// Decides how symbols that are currently selected count during the check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupancy {
    /// Every occupant blocks the destination.
    Exclusive,
    /// Selected occupants are treated as free, since a relocation vacates them.
    ReleaseSelected,
}

/// Squares and slot a symbol would cover at a destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Footprint {
    /// Anchor square.
    pub anchor: CellCoord,
    /// Partner square of a double-square symbol.
    pub partner: Option<CellCoord>,
    /// Slot occupied in every covered square.
    pub slot: Slot,
}

impl Footprint {
    /// Iterates over the covered squares, anchor first.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        std::iter::once(self.anchor).chain(self.partner)
    }
}

/// Validates a placement of `kind` anchored at `at`, returning the footprint
/// it would occupy.
///
/// Rules run in order: anchor bounds, partner bounds, traversable terrain,
/// empty slot, and finally the input/output restriction.
pub fn check<B>(
    board: &B,
    kind: KindId,
    agent: Option<Agent>,
    at: CellCoord,
    occupancy: Occupancy,
) -> Result<Footprint, PlacementError>
where
    B: BoardView + ?Sized,
{
    let definition = kind.kind();
    let slot = definition
        .category
        .slot(agent)
        .ok_or(PlacementError::NoSlot)?;
    let dimensions = board.dimensions();

    if !dimensions.contains(at) {
        return Err(PlacementError::OutOfBounds);
    }

    let partner = match definition.arity.partner_offset() {
        None => None,
        Some(offset) => match at.offset(offset) {
            Some(cell) if dimensions.contains(cell) => Some(cell),
            _ => return Err(PlacementError::PartnerOutOfBounds),
        },
    };

    let footprint = Footprint {
        anchor: at,
        partner,
        slot,
    };

    if footprint.cells().any(|cell| !board.is_traversable(cell)) {
        return Err(PlacementError::Blocked);
    }

    if footprint
        .cells()
        .any(|cell| blocks(board.occupant(cell, slot), occupancy))
    {
        return Err(PlacementError::Occupied);
    }

    if footprint.cells().any(|cell| board.is_io(cell)) {
        return Err(PlacementError::FixedSquare);
    }

    Ok(footprint)
}

/// Reports whether `kind` fits anchored at `at`.
#[must_use]
pub fn fits<B>(
    board: &B,
    kind: KindId,
    agent: Option<Agent>,
    at: CellCoord,
    occupancy: Occupancy,
) -> bool
where
    B: BoardView + ?Sized,
{
    check(board, kind, agent, at, occupancy).is_ok()
}

/// Validates moving an existing symbol by `offset`.
///
/// The symbol keeps its kind and agent. An offset that would leave the
/// non-negative quadrant is reported as [`PlacementError::OutOfBounds`].
pub fn check_translation<B>(
    board: &B,
    symbol: &SymbolState,
    offset: CellOffset,
    occupancy: Occupancy,
) -> Result<Footprint, PlacementError>
where
    B: BoardView + ?Sized,
{
    let origin = symbol
        .trace
        .map(|trace| trace.anchor)
        .ok_or(PlacementError::OutOfBounds)?;
    let destination = origin
        .offset(offset)
        .ok_or(PlacementError::OutOfBounds)?;
    check(board, symbol.kind, symbol.agent, destination, occupancy)
}

/// Validates moving every symbol in `symbols` by the same offset.
///
/// Returns the first failing rule, or the footprints in input order.
pub fn check_group<'a, B, I>(
    board: &B,
    symbols: I,
    offset: CellOffset,
    occupancy: Occupancy,
) -> Result<Vec<Footprint>, PlacementError>
where
    B: BoardView + ?Sized,
    I: IntoIterator<Item = &'a SymbolState>,
{
    symbols
        .into_iter()
        .map(|symbol| check_translation(board, symbol, offset, occupancy))
        .collect()
}

fn blocks(occupant: Option<&SymbolState>, occupancy: Occupancy) -> bool {
    match occupant {
        None => false,
        Some(symbol) => match occupancy {
            Occupancy::Exclusive => true,
            Occupancy::ReleaseSelected => symbol.fixed || !symbol.selected,
        },
    }
}
