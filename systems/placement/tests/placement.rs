use std::collections::BTreeMap;

use spacecells_core::{
    catalog, Agent, BoardTrace, BoardView, CellCoord, CellOffset, Dimensions, InstanceId, KindId,
    PlacementError, Slot, SymbolState,
};
use spacecells_system_placement::{check, check_group, check_translation, fits, Occupancy};

#[derive(Default)]
struct FakeBoard {
    dimensions: Option<Dimensions>,
    blocked: Vec<CellCoord>,
    io: Vec<CellCoord>,
    symbols: BTreeMap<InstanceId, SymbolState>,
    squares: BTreeMap<(CellCoord, Slot), InstanceId>,
}

impl FakeBoard {
    fn new(rows: u32, columns: u32) -> Self {
        Self {
            dimensions: Some(Dimensions::new(rows, columns)),
            ..Self::default()
        }
    }

    fn put(&mut self, kind: KindId, agent: Option<Agent>, at: CellCoord, selected: bool) -> InstanceId {
        let id = InstanceId::new(self.symbols.len() as u64 + 1);
        let slot = kind.kind().category.slot(agent).expect("slot");
        let mut state = SymbolState::palette(id, kind, 0, agent);
        state.trace = Some(BoardTrace { anchor: at, slot });
        state.selected = selected;
        let (anchor, partner) = kind.kind().arity.footprint(at);
        let _ = self.squares.insert((anchor, slot), id);
        if let Some(partner) = partner {
            let _ = self.squares.insert((partner, slot), id);
        }
        let _ = self.symbols.insert(id, state);
        id
    }
}

impl BoardView for FakeBoard {
    fn dimensions(&self) -> Dimensions {
        self.dimensions.expect("dimensions")
    }

    fn is_traversable(&self, cell: CellCoord) -> bool {
        !self.blocked.contains(&cell)
    }

    fn is_io(&self, cell: CellCoord) -> bool {
        self.io.contains(&cell)
    }

    fn occupant(&self, cell: CellCoord, slot: Slot) -> Option<&SymbolState> {
        self.squares
            .get(&(cell, slot))
            .and_then(|id| self.symbols.get(id))
    }

    fn symbol(&self, id: InstanceId) -> Option<&SymbolState> {
        self.symbols.get(&id)
    }

    fn symbols(&self) -> Vec<&SymbolState> {
        self.symbols.values().collect()
    }
}

#[test]
fn single_cell_fits_on_empty_board() {
    let board = FakeBoard::new(1, 3);
    let footprint = check(&board, catalog::CELL_X, None, CellCoord::new(0, 0), Occupancy::Exclusive)
        .expect("empty square accepts a cell");
    assert_eq!(footprint.slot, Slot::Cell);
    assert_eq!(footprint.partner, None);
}

#[test]
fn anchor_outside_board_is_rejected() {
    let board = FakeBoard::new(2, 2);
    assert_eq!(
        check(&board, catalog::CELL_X, None, CellCoord::new(2, 0), Occupancy::Exclusive),
        Err(PlacementError::OutOfBounds),
    );
}

#[test]
fn partner_outside_board_is_rejected() {
    let board = FakeBoard::new(2, 2);
    assert_eq!(
        check(&board, catalog::DIODE_RIGHT, None, CellCoord::new(0, 1), Occupancy::Exclusive),
        Err(PlacementError::PartnerOutOfBounds),
        "a horizontal pair anchored on the last column has no room for its partner",
    );
    assert_eq!(
        check(&board, catalog::CELL_VERTICAL, None, CellCoord::new(1, 0), Occupancy::Exclusive),
        Err(PlacementError::PartnerOutOfBounds),
    );
}

#[test]
fn non_traversable_partner_blocks_pair() {
    let mut board = FakeBoard::new(2, 2);
    board.blocked.push(CellCoord::new(0, 1));
    assert_eq!(
        check(&board, catalog::CELL_HORIZONTAL, None, CellCoord::new(0, 0), Occupancy::Exclusive),
        Err(PlacementError::Blocked),
    );
}

#[test]
fn input_and_output_squares_never_fit() {
    let mut board = FakeBoard::new(1, 3);
    board.io.push(CellCoord::new(0, 2));
    assert_eq!(
        check(&board, catalog::CELL_PLUS, None, CellCoord::new(0, 2), Occupancy::Exclusive),
        Err(PlacementError::FixedSquare),
    );
    assert_eq!(
        check(&board, catalog::DIODE_RIGHT, None, CellCoord::new(0, 1), Occupancy::Exclusive),
        Err(PlacementError::FixedSquare),
        "a pair whose partner lands on an output is rejected",
    );
}

#[test]
fn selected_occupant_is_free_only_when_released() {
    let mut board = FakeBoard::new(1, 2);
    let _ = board.put(catalog::CELL_X, None, CellCoord::new(0, 1), true);
    let at = CellCoord::new(0, 1);
    assert!(fits(&board, catalog::CELL_PLUS, None, at, Occupancy::ReleaseSelected));
    assert_eq!(
        check(&board, catalog::CELL_PLUS, None, at, Occupancy::Exclusive),
        Err(PlacementError::Occupied),
    );
}

#[test]
fn unselected_occupant_blocks_in_every_mode() {
    let mut board = FakeBoard::new(1, 2);
    let _ = board.put(catalog::CELL_X, None, CellCoord::new(0, 0), false);
    assert!(!fits(&board, catalog::CELL_DASH, None, CellCoord::new(0, 0), Occupancy::ReleaseSelected));
}

#[test]
fn instruction_slots_are_per_agent() {
    let mut board = FakeBoard::new(1, 1);
    let _ = board.put(catalog::OP_NEXT, Some(Agent::First), CellCoord::new(0, 0), false);
    let at = CellCoord::new(0, 0);
    assert!(fits(&board, catalog::OP_SYNC, Some(Agent::Second), at, Occupancy::Exclusive));
    assert!(fits(&board, catalog::DIRECTION_UP, Some(Agent::First), at, Occupancy::Exclusive));
    assert!(!fits(&board, catalog::OP_SYNC, Some(Agent::First), at, Occupancy::Exclusive));
    assert_eq!(
        check(&board, catalog::OP_SYNC, None, at, Occupancy::Exclusive),
        Err(PlacementError::NoSlot),
    );
}

#[test]
fn checks_leave_board_untouched() {
    let mut board = FakeBoard::new(2, 2);
    let id = board.put(catalog::CELL_X, None, CellCoord::new(0, 0), true);
    let before = board.symbols.clone();
    let _ = check(&board, catalog::CELL_X, None, CellCoord::new(0, 0), Occupancy::Exclusive);
    let _ = check_translation(
        &board,
        board.symbol(id).expect("placed"),
        CellOffset::new(1, 1),
        Occupancy::ReleaseSelected,
    );
    assert_eq!(board.symbols, before, "fits checks must not mutate the board");
}

#[test]
fn translation_off_the_top_edge_is_out_of_bounds() {
    let mut board = FakeBoard::new(2, 2);
    let id = board.put(catalog::CELL_X, None, CellCoord::new(0, 0), true);
    let symbol = *board.symbol(id).expect("placed");
    assert_eq!(
        check_translation(&board, &symbol, CellOffset::new(-1, 0), Occupancy::ReleaseSelected),
        Err(PlacementError::OutOfBounds),
    );
}

#[test]
fn group_shift_over_own_footprint_fits_when_released() {
    let mut board = FakeBoard::new(1, 4);
    let first = board.put(catalog::CELL_X, None, CellCoord::new(0, 0), true);
    let second = board.put(catalog::CELL_PLUS, None, CellCoord::new(0, 1), true);
    let group = [
        *board.symbol(first).expect("first"),
        *board.symbol(second).expect("second"),
    ];
    let footprints = check_group(&board, group.iter(), CellOffset::new(0, 1), Occupancy::ReleaseSelected)
        .expect("shifting right by one overlaps only the selection itself");
    assert_eq!(footprints[1].anchor, CellCoord::new(0, 2));

    assert_eq!(
        check_group(&board, group.iter(), CellOffset::new(0, 1), Occupancy::Exclusive),
        Err(PlacementError::Occupied),
        "a copy cannot overlap the originals it leaves behind",
    );
}
