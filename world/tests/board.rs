use spacecells_core::{
    catalog, Agent, BoardView, CellCoord, CellOffset, Command, Dimensions, Event, Half, InstanceId,
    KindId, Matrix, PlacementError, SelectMode, Slot, Terrain,
};
use spacecells_world::{apply, query, submission, World};

fn grids(groups: [&str; 5]) -> String {
    groups.join("\n\n")
}

fn open_world(rows: u32, columns: u32) -> World {
    World::with_terrain(Terrain::open(Dimensions::new(rows, columns)))
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    events
}

fn place(world: &mut World, kind: KindId, agent: Option<Agent>, row: u32, column: u32) -> InstanceId {
    let events = run(
        world,
        Command::PlaceSymbol {
            kind,
            variant: 0,
            agent,
            at: CellCoord::new(row, column),
        },
    );
    match events.as_slice() {
        [Event::SymbolPlaced { id, .. }] => *id,
        other => panic!("expected a placement, got {other:?}"),
    }
}

fn select(world: &mut World, ids: Vec<InstanceId>) {
    let _ = run(
        world,
        Command::Select {
            ids,
            mode: SelectMode::Replace,
        },
    );
}

#[test]
fn placing_x_on_empty_board_serializes_single_glyph() {
    let mut world = open_world(1, 3);
    let _ = place(&mut world, catalog::CELL_X, None, 0, 0);

    assert_eq!(
        query::submission_text(&world),
        grids(["x__", "___", "___", "___", "___"]),
        "only the cell group should carry the new glyph",
    );
}

#[test]
fn loading_right_diode_links_anchor_and_partner() {
    let mut world = open_world(1, 2);
    let events = run(
        &mut world,
        Command::LoadSubmission {
            text: grids(["x>", "__", "__", "__", "__"]),
        },
    );
    assert_eq!(
        events,
        vec![Event::SubmissionLoaded {
            symbols: 1,
            discarded: 0
        }]
    );

    let (anchor, anchor_half) =
        query::occupant_half(&world, CellCoord::new(0, 0), Slot::Cell).expect("anchor square");
    let (partner, partner_half) =
        query::occupant_half(&world, CellCoord::new(0, 1), Slot::Cell).expect("partner square");
    assert_eq!(anchor.kind, catalog::DIODE_RIGHT);
    assert_eq!(anchor_half, Half::Anchor);
    assert_eq!(partner_half, Half::Partner);
    assert_eq!(anchor.id, partner.id, "both halves share one identity");
}

#[test]
fn dropping_selection_on_itself_changes_nothing() {
    let mut world = open_world(2, 2);
    let id = place(&mut world, catalog::CELL_PLUS, None, 1, 1);
    select(&mut world, vec![id]);
    let before = query::submission_text(&world);

    let events = run(
        &mut world,
        Command::MoveSelection {
            offset: CellOffset::ZERO,
            copy: false,
        },
    );

    assert!(events.is_empty(), "a zero move must not report a change");
    assert_eq!(query::submission_text(&world), before);
}

#[test]
fn loaded_board_serializes_back_to_the_same_text() {
    let text = grids([
        "x>W_\n<xM/",
        "v_>_\n___^",
        "Sntl\n*srp",
        "<___\n____",
        "S___\n]WMP",
    ]);
    let mut world = open_world(2, 4);
    let _ = run(&mut world, Command::LoadSubmission { text: text.clone() });

    assert_eq!(query::submission_text(&world), text);
    let reparsed = submission::parse(&query::submission_text(&world), Dimensions::new(2, 4))
        .expect("serialized text parses");
    assert_eq!(reparsed, query::submission(&world));
}

#[test]
fn selecting_partner_half_selects_whole_pair() {
    let mut world = open_world(2, 1);
    let _ = run(
        &mut world,
        Command::LoadSubmission {
            text: grids(["^\nx", "_\n_", "_\n_", "_\n_", "_\n_"]),
        },
    );
    let partner = world
        .occupant(CellCoord::new(1, 0), Slot::Cell)
        .expect("partner half")
        .id;

    select(&mut world, vec![partner]);

    assert!(world
        .occupant(CellCoord::new(0, 0), Slot::Cell)
        .expect("anchor half")
        .selected);
}

#[test]
fn moving_pair_relocates_both_halves() {
    let mut world = open_world(3, 3);
    let id = place(&mut world, catalog::CELL_HORIZONTAL, None, 0, 0);
    select(&mut world, vec![id]);

    let events = run(
        &mut world,
        Command::MoveSelection {
            offset: CellOffset::new(2, 1),
            copy: false,
        },
    );

    assert_eq!(
        events,
        vec![Event::SymbolsMoved {
            count: 1,
            offset: CellOffset::new(2, 1),
            copy: false
        }]
    );
    assert!(world.occupant(CellCoord::new(0, 0), Slot::Cell).is_none());
    assert!(world.occupant(CellCoord::new(0, 1), Slot::Cell).is_none());
    assert_eq!(
        query::submission_text(&world),
        grids(["___\n___\n_][", "___\n___\n___", "___\n___\n___", "___\n___\n___", "___\n___\n___"])
    );
}

#[test]
fn move_overlapping_own_footprint_is_accepted() {
    let mut world = open_world(1, 3);
    let id = place(&mut world, catalog::DIODE_RIGHT, None, 0, 0);
    select(&mut world, vec![id]);

    let _ = run(
        &mut world,
        Command::MoveSelection {
            offset: CellOffset::new(0, 1),
            copy: false,
        },
    );

    assert_eq!(
        query::submission_text(&world),
        grids(["_x>", "___", "___", "___", "___"])
    );
}

#[test]
fn copy_keeps_originals_and_selects_copies() {
    let mut world = open_world(1, 4);
    let id = place(&mut world, catalog::OP_RESET, Some(Agent::Second), 0, 0);
    select(&mut world, vec![id]);

    let events = run(
        &mut world,
        Command::MoveSelection {
            offset: CellOffset::new(0, 2),
            copy: true,
        },
    );

    assert!(matches!(
        events.as_slice(),
        [Event::SymbolsMoved { count: 1, copy: true, .. }]
    ));
    assert_eq!(
        query::submission_text(&world),
        grids(["____", "____", "____", "____", "*_*_"])
    );
    let selection = query::selection(&world);
    assert_eq!(selection.len(), 1);
    assert_ne!(selection[0], id, "the copy becomes the selection");
}

#[test]
fn rejected_move_leaves_every_symbol_in_place() {
    let mut world = open_world(1, 3);
    let first = place(&mut world, catalog::CELL_X, None, 0, 0);
    let second = place(&mut world, catalog::CELL_PLUS, None, 0, 2);
    select(&mut world, vec![first, second]);
    let before = query::submission_text(&world);

    let events = run(
        &mut world,
        Command::MoveSelection {
            offset: CellOffset::new(0, 1),
            copy: false,
        },
    );

    assert_eq!(
        events,
        vec![Event::MoveRejected {
            reason: PlacementError::OutOfBounds
        }]
    );
    assert_eq!(query::submission_text(&world), before);
}

#[test]
fn input_and_output_squares_reject_placement_move_and_trash() {
    let terrain = Terrain::new(
        Matrix::filled(Dimensions::new(1, 3), true),
        vec![CellCoord::new(0, 0)],
        vec![CellCoord::new(0, 2)],
    );
    let mut world = World::with_terrain(terrain);

    let events = run(
        &mut world,
        Command::PlaceSymbol {
            kind: catalog::CELL_PLUS,
            variant: 0,
            agent: None,
            at: CellCoord::new(0, 2),
        },
    );
    assert!(matches!(
        events.as_slice(),
        [Event::PlacementRejected {
            reason: PlacementError::FixedSquare,
            ..
        }]
    ));

    let middle = place(&mut world, catalog::CELL_DASH, None, 0, 1);
    select(&mut world, vec![middle]);
    let events = run(
        &mut world,
        Command::MoveSelection {
            offset: CellOffset::new(0, 1),
            copy: false,
        },
    );
    assert!(matches!(events.as_slice(), [Event::MoveRejected { .. }]));

    let marker = world
        .occupant(CellCoord::new(0, 0), Slot::Cell)
        .expect("input marker")
        .id;
    let _ = run(
        &mut world,
        Command::Select {
            ids: vec![marker],
            mode: SelectMode::Add,
        },
    );
    let _ = run(&mut world, Command::TrashSelection);

    let survivor = world
        .occupant(CellCoord::new(0, 0), Slot::Cell)
        .expect("marker survives the trash");
    assert!(survivor.fixed);
    assert!(world.occupant(CellCoord::new(0, 2), Slot::Cell).is_none());
}

#[test]
fn trash_keeps_start_operations() {
    let mut world = open_world(1, 3);
    let start = place(&mut world, catalog::OP_START, Some(Agent::First), 0, 0);
    let next = place(&mut world, catalog::OP_NEXT, Some(Agent::First), 0, 1);
    let pair = place(&mut world, catalog::CELL_HORIZONTAL, None, 0, 1);
    select(&mut world, vec![start, next, pair]);

    let events = run(&mut world, Command::TrashSelection);

    assert_eq!(
        events,
        vec![
            Event::SymbolsTrashed {
                removed: 2,
                retained: 1
            },
            Event::SelectionChanged { selected: 0 },
        ]
    );
    assert!(world.symbol(start).is_some(), "START survives the trash");
    assert!(world.symbol(pair).is_none());
    assert!(world.occupant(CellCoord::new(0, 2), Slot::Cell).is_none());
    assert_eq!(
        query::submission_text(&world),
        grids(["___", "___", "S__", "___", "___"])
    );
}

#[test]
fn trash_without_selection_is_silent() {
    let mut world = open_world(1, 3);
    let start = place(&mut world, catalog::OP_START, Some(Agent::First), 0, 0);

    let events = run(&mut world, Command::TrashSelection);

    assert!(events.is_empty(), "nothing selected, nothing changes");
    assert!(world.symbol(start).is_some());
}

#[test]
fn reconfiguring_level_clears_board() {
    let mut world = open_world(2, 2);
    let _ = place(&mut world, catalog::CELL_X, None, 0, 0);

    let _ = run(
        &mut world,
        Command::ConfigureLevel {
            terrain: Terrain::open(Dimensions::new(1, 1)),
        },
    );

    assert!(world.symbols().is_empty());
    assert_eq!(query::dimensions(&world), Dimensions::new(1, 1));
}
