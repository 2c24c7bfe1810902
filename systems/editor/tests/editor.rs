use spacecells_core::{
    catalog, Agent, BoardView, CellCoord, CellOffset, Command, Dimensions, Event, Matrix,
    PlacementError, SelectMode, Slot, Terrain,
};
use spacecells_system_editor::{DragState, DropTarget, Editor, Interaction};
use spacecells_world::{self as world, query, World};

fn open_world(rows: u32, columns: u32) -> World {
    World::with_terrain(Terrain::open(Dimensions::new(rows, columns)))
}

fn pump(editor: &mut Editor, world: &mut World, interaction: Interaction) -> Vec<Command> {
    let mut commands = Vec::new();
    editor.handle(interaction, &*world, true, &mut commands);
    let mut events = Vec::new();
    for command in commands.clone() {
        world::apply(world, command, &mut events);
    }
    editor.observe(&events);
    commands
}

fn place_from_palette(editor: &mut Editor, world: &mut World, kind: spacecells_core::KindId, at: CellCoord) {
    let _ = pump(editor, world, Interaction::PickPalette { kind });
    let _ = pump(
        editor,
        world,
        Interaction::ClickCell {
            at,
            slot: Slot::Cell,
            toggle: false,
        },
    );
}

fn drag(editor: &mut Editor, world: &mut World, from: CellCoord, to: DropTarget, copy: bool) -> Vec<Command> {
    let _ = pump(
        editor,
        world,
        Interaction::DragStart {
            at: from,
            slot: Slot::Cell,
        },
    );
    let _ = pump(editor, world, Interaction::DragOver { target: to, copy });
    pump(editor, world, Interaction::Drop { copy })
}

#[test]
fn palette_click_places_symbol_and_clears_palette() {
    let mut world = open_world(1, 3);
    let mut editor = Editor::new();

    place_from_palette(&mut editor, &mut world, catalog::CELL_X, CellCoord::new(0, 0));

    assert_eq!(
        query::submission_text(&world),
        ["x__", "___", "___", "___", "___"].join("\n\n")
    );
    assert_eq!(editor.palette(), None, "placing consumes the palette selection");
}

#[test]
fn palette_click_that_does_not_fit_is_silent() {
    let mut world = open_world(1, 2);
    let mut editor = Editor::new();
    let _ = pump(
        &mut editor,
        &mut world,
        Interaction::PickPalette {
            kind: catalog::DIODE_RIGHT,
        },
    );

    let commands = pump(
        &mut editor,
        &mut world,
        Interaction::ClickCell {
            at: CellCoord::new(0, 1),
            slot: Slot::Cell,
            toggle: false,
        },
    );

    assert!(commands.is_empty());
    assert!(editor.palette().is_some(), "a failed placement keeps the palette choice");
}

#[test]
fn instructions_go_to_the_active_agent() {
    let mut world = open_world(1, 1);
    let mut editor = Editor::new();
    let _ = pump(
        &mut editor,
        &mut world,
        Interaction::SelectAgent {
            agent: Agent::Second,
        },
    );
    let _ = pump(
        &mut editor,
        &mut world,
        Interaction::PickPalette {
            kind: catalog::OP_LOCK_FREE,
        },
    );
    let _ = pump(&mut editor, &mut world, Interaction::SelectVariant { variant: 1 });
    let _ = pump(
        &mut editor,
        &mut world,
        Interaction::ClickCell {
            at: CellCoord::new(0, 0),
            slot: Slot::Cell,
            toggle: false,
        },
    );

    assert_eq!(
        query::submission_text(&world),
        ["_", "_", "_", "_", "u"].join("\n\n")
    );
}

#[test]
fn modifier_click_toggles_membership() {
    let mut world = open_world(1, 2);
    let mut editor = Editor::new();
    place_from_palette(&mut editor, &mut world, catalog::CELL_X, CellCoord::new(0, 0));
    place_from_palette(&mut editor, &mut world, catalog::CELL_PLUS, CellCoord::new(0, 1));

    for column in 0..2 {
        let _ = pump(
            &mut editor,
            &mut world,
            Interaction::ClickCell {
                at: CellCoord::new(0, column),
                slot: Slot::Cell,
                toggle: true,
            },
        );
    }
    assert_eq!(query::selection(&world).len(), 2);

    let commands = pump(
        &mut editor,
        &mut world,
        Interaction::ClickCell {
            at: CellCoord::new(0, 0),
            slot: Slot::Cell,
            toggle: true,
        },
    );
    assert!(matches!(
        commands.as_slice(),
        [Command::Select {
            mode: SelectMode::Toggle,
            ..
        }]
    ));
    assert_eq!(query::selection(&world).len(), 1);
}

#[test]
fn plain_click_on_empty_square_clears_selection_without_moving() {
    let mut world = open_world(1, 3);
    let mut editor = Editor::new();
    place_from_palette(&mut editor, &mut world, catalog::CELL_X, CellCoord::new(0, 0));
    let _ = pump(
        &mut editor,
        &mut world,
        Interaction::ClickCell {
            at: CellCoord::new(0, 0),
            slot: Slot::Cell,
            toggle: false,
        },
    );
    let before = query::submission_text(&world);

    let commands = pump(
        &mut editor,
        &mut world,
        Interaction::ClickCell {
            at: CellCoord::new(0, 2),
            slot: Slot::Cell,
            toggle: false,
        },
    );

    assert_eq!(commands, vec![Command::ClearSelection]);
    assert_eq!(query::submission_text(&world), before);
}

#[test]
fn drag_moves_unselected_symbol() {
    let mut world = open_world(2, 2);
    let mut editor = Editor::new();
    place_from_palette(&mut editor, &mut world, catalog::CELL_SLASH, CellCoord::new(0, 0));

    let commands = drag(
        &mut editor,
        &mut world,
        CellCoord::new(0, 0),
        DropTarget::Cell(CellCoord::new(1, 1)),
        false,
    );

    assert_eq!(
        commands,
        vec![Command::MoveSelection {
            offset: CellOffset::new(1, 1),
            copy: false
        }]
    );
    assert_eq!(
        query::submission_text(&world),
        ["__\n_/", "__\n__", "__\n__", "__\n__", "__\n__"].join("\n\n")
    );
}

#[test]
fn drop_on_own_square_emits_nothing() {
    let mut world = open_world(1, 2);
    let mut editor = Editor::new();
    place_from_palette(&mut editor, &mut world, catalog::CELL_SLASH, CellCoord::new(0, 1));

    let commands = drag(
        &mut editor,
        &mut world,
        CellCoord::new(0, 1),
        DropTarget::Cell(CellCoord::new(0, 1)),
        false,
    );

    assert!(commands.is_empty(), "dropping in place must not produce an edit");
    assert_eq!(editor.drag(), None);
}

#[test]
fn drag_over_exposes_fits_signal() {
    let mut world = open_world(2, 2);
    let mut editor = Editor::new();
    place_from_palette(&mut editor, &mut world, catalog::CELL_HORIZONTAL, CellCoord::new(0, 0));
    let _ = pump(
        &mut editor,
        &mut world,
        Interaction::DragStart {
            at: CellCoord::new(0, 0),
            slot: Slot::Cell,
        },
    );
    assert_eq!(
        editor.drag(),
        Some(DragState::Relocate {
            origin: CellCoord::new(0, 0)
        })
    );

    let _ = pump(
        &mut editor,
        &mut world,
        Interaction::DragOver {
            target: DropTarget::Cell(CellCoord::new(0, 1)),
            copy: false,
        },
    );
    let preview = editor.preview().expect("hovering yields a preview");
    assert_eq!(preview.verdict, Err(PlacementError::PartnerOutOfBounds));

    let _ = pump(
        &mut editor,
        &mut world,
        Interaction::DragOver {
            target: DropTarget::Cell(CellCoord::new(0, 0)),
            copy: false,
        },
    );
    assert!(editor.preview().expect("preview").fits());

    let commands = pump(&mut editor, &mut world, Interaction::Drop { copy: true });
    assert!(
        commands.is_empty(),
        "a copy overlapping its original is rejected at drop time"
    );
}

#[test]
fn trash_drop_deletes_selection_but_keeps_start() {
    let mut world = open_world(1, 3);
    let mut editor = Editor::new();
    let _ = pump(
        &mut editor,
        &mut world,
        Interaction::PickPalette {
            kind: catalog::OP_START,
        },
    );
    let _ = pump(
        &mut editor,
        &mut world,
        Interaction::ClickCell {
            at: CellCoord::new(0, 0),
            slot: Slot::Operation(Agent::First),
            toggle: false,
        },
    );
    place_from_palette(&mut editor, &mut world, catalog::CELL_PIPE, CellCoord::new(0, 1));
    for (column, slot) in [(0, Slot::Operation(Agent::First)), (1, Slot::Cell)] {
        let _ = pump(
            &mut editor,
            &mut world,
            Interaction::ClickCell {
                at: CellCoord::new(0, column),
                slot,
                toggle: true,
            },
        );
    }
    assert_eq!(query::selection(&world).len(), 2);

    let commands = drag(&mut editor, &mut world, CellCoord::new(0, 1), DropTarget::Trash, false);

    assert_eq!(commands, vec![Command::TrashSelection]);
    assert_eq!(
        query::submission_text(&world),
        ["___", "___", "S__", "___", "___"].join("\n\n")
    );
    assert!(query::selection(&world).is_empty(), "START is deselected, not deleted");
}

#[test]
fn marquee_selects_then_deselects_rectangle() {
    let terrain = Terrain::new(
        Matrix::filled(Dimensions::new(2, 3), true),
        vec![CellCoord::new(0, 0)],
        Vec::new(),
    );
    let mut world = World::with_terrain(terrain);
    let mut editor = Editor::new();
    place_from_palette(&mut editor, &mut world, catalog::CELL_X, CellCoord::new(0, 1));
    place_from_palette(&mut editor, &mut world, catalog::CELL_PLUS, CellCoord::new(1, 1));
    place_from_palette(&mut editor, &mut world, catalog::CELL_DASH, CellCoord::new(1, 2));

    let sweep = |editor: &mut Editor, world: &mut World| {
        drag(
            editor,
            world,
            CellCoord::new(1, 0),
            DropTarget::Cell(CellCoord::new(0, 1)),
            false,
        )
    };

    let commands = sweep(&mut editor, &mut world);
    assert!(matches!(
        commands.as_slice(),
        [Command::Select {
            mode: SelectMode::Add,
            ..
        }]
    ));
    let selected = query::selection(&world);
    assert_eq!(selected.len(), 2, "input marker and outside symbol are excluded");
    assert!(selected
        .iter()
        .all(|id| world.symbol(*id).map_or(false, |symbol| !symbol.fixed)));

    let _ = sweep(&mut editor, &mut world);
    assert!(
        query::selection(&world).is_empty(),
        "sweeping an already selected rectangle deselects it"
    );
}

#[test]
fn variant_of_single_board_selection_can_change() {
    let mut world = open_world(1, 1);
    let mut editor = Editor::new();
    let _ = pump(
        &mut editor,
        &mut world,
        Interaction::PickPalette {
            kind: catalog::OP_POWER,
        },
    );
    let _ = pump(
        &mut editor,
        &mut world,
        Interaction::ClickCell {
            at: CellCoord::new(0, 0),
            slot: Slot::Cell,
            toggle: false,
        },
    );
    let _ = pump(
        &mut editor,
        &mut world,
        Interaction::ClickCell {
            at: CellCoord::new(0, 0),
            slot: Slot::Operation(Agent::First),
            toggle: false,
        },
    );

    let commands = pump(&mut editor, &mut world, Interaction::SelectVariant { variant: 1 });

    assert!(matches!(commands.as_slice(), [Command::SetVariant { variant: 1, .. }]));
    assert_eq!(
        query::submission_text(&world),
        ["_", "_", "P", "_", "_"].join("\n\n")
    );
}

#[test]
fn editing_is_ignored_while_running() {
    let world = open_world(1, 1);
    let mut editor = Editor::new();
    let mut commands = Vec::new();

    editor.handle(
        Interaction::PickPalette {
            kind: catalog::CELL_X,
        },
        &world,
        false,
        &mut commands,
    );

    assert!(commands.is_empty());
    assert_eq!(editor.palette(), None);
}

#[test]
fn level_events_abandon_drag() {
    let mut world = open_world(1, 1);
    let mut editor = Editor::new();
    let _ = pump(
        &mut editor,
        &mut world,
        Interaction::DragStart {
            at: CellCoord::new(0, 0),
            slot: Slot::Cell,
        },
    );
    assert!(editor.drag().is_some());

    editor.observe(&[Event::LevelConfigured {
        dimensions: Dimensions::new(1, 1),
    }]);

    assert_eq!(editor.drag(), None);
}

#[test]
fn cancelled_drag_drops_nothing() {
    let mut world = open_world(1, 2);
    let mut editor = Editor::new();
    place_from_palette(&mut editor, &mut world, catalog::CELL_X, CellCoord::new(0, 0));
    let _ = pump(
        &mut editor,
        &mut world,
        Interaction::DragStart {
            at: CellCoord::new(0, 0),
            slot: Slot::Cell,
        },
    );
    let _ = pump(
        &mut editor,
        &mut world,
        Interaction::DragOver {
            target: DropTarget::Cell(CellCoord::new(0, 1)),
            copy: false,
        },
    );

    let _ = pump(&mut editor, &mut world, Interaction::DragCancel);
    let commands = pump(&mut editor, &mut world, Interaction::Drop { copy: false });

    assert!(commands.is_empty());
    assert_eq!(editor.preview(), None);
}
