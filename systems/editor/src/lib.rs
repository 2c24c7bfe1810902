#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure selection and editing system translating pointer interactions into
//! board commands.
//!
//! The on-board selection lives in the world as per-symbol flags; this system
//! only tracks the palette selection, the active agent and any drag in
//! progress. While a drag hovers it keeps a single current target and a fits
//! preview, recomputed only when the target changes.

use spacecells_core::{
    Agent, BoardView, CellCoord, CellOffset, Command, Event, InstanceId, KindId, PlacementError,
    SelectMode, Slot, SymbolState,
};
use spacecells_system_placement::{self as placement, Occupancy};

/// Palette symbol waiting to be placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteSelection {
    /// Kind picked from the palette.
    pub kind: KindId,
    /// Option of the kind chosen in the picker.
    pub variant: u8,
}

/// Where a drag is currently hovering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DropTarget {
    /// A board square.
    Cell(CellCoord),
    /// The trash area.
    Trash,
}

/// Pointer interactions reported by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
    /// A palette symbol was clicked.
    PickPalette {
        /// Kind shown by the palette entry.
        kind: KindId,
    },
    /// A board square was clicked.
    ClickCell {
        /// Square under the pointer.
        at: CellCoord,
        /// Layer of the square the click addressed.
        slot: Slot,
        /// Whether the multi-select modifier was held.
        toggle: bool,
    },
    /// A drag began on a board square.
    DragStart {
        /// Square under the pointer.
        at: CellCoord,
        /// Layer of the square the drag addressed.
        slot: Slot,
    },
    /// The drag entered a target.
    DragOver {
        /// Target under the pointer.
        target: DropTarget,
        /// Whether the copy modifier is held.
        copy: bool,
    },
    /// The drag was released over the current target.
    Drop {
        /// Whether the copy modifier is held.
        copy: bool,
    },
    /// The drag was abandoned.
    DragCancel,
    /// An option was chosen in the picker.
    SelectVariant {
        /// Option index of the selected kind.
        variant: u8,
    },
    /// The agent receiving new instructions was switched.
    SelectAgent {
        /// Newly active agent.
        agent: Agent,
    },
}

/// Kind of drag in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragState {
    /// Moving the on-board selection, grabbed at `origin`.
    Relocate {
        /// Square where the drag started.
        origin: CellCoord,
    },
    /// Sweeping a selection rectangle from `anchor`.
    Marquee {
        /// Corner square where the drag started.
        anchor: CellCoord,
    },
}

/// Fits signal for the current drag target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropPreview {
    /// Target the preview was computed for.
    pub target: DropTarget,
    /// Whether the copy modifier was held.
    pub copy: bool,
    /// Outcome of the fits check; `Ok` when a drop would succeed.
    pub verdict: Result<(), PlacementError>,
}

impl DropPreview {
    /// Whether a drop would succeed.
    #[must_use]
    pub const fn fits(&self) -> bool {
        self.verdict.is_ok()
    }
}

/// Selection and editing state machine.
#[derive(Clone, Debug)]
pub struct Editor {
    palette: Option<PaletteSelection>,
    agent: Agent,
    drag: Option<DragState>,
    preview: Option<DropPreview>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Creates an idle editor with the first agent active.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            palette: None,
            agent: Agent::First,
            drag: None,
            preview: None,
        }
    }

    /// Palette symbol awaiting placement.
    #[must_use]
    pub const fn palette(&self) -> Option<PaletteSelection> {
        self.palette
    }

    /// Agent receiving newly placed instructions.
    #[must_use]
    pub const fn agent(&self) -> Agent {
        self.agent
    }

    /// Drag in progress, if any.
    #[must_use]
    pub const fn drag(&self) -> Option<DragState> {
        self.drag
    }

    /// Fits signal for the current drag target.
    #[must_use]
    pub const fn preview(&self) -> Option<DropPreview> {
        self.preview
    }

    /// Forgets the palette selection and any drag in progress.
    pub fn reset(&mut self) {
        self.palette = None;
        self.end_drag();
    }

    /// Consumes world events that invalidate transient editor state.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            if matches!(
                event,
                Event::LevelConfigured { .. } | Event::SubmissionLoaded { .. }
            ) {
                self.end_drag();
            }
        }
    }

    /// Translates an interaction into commands for the world.
    ///
    /// Editing interactions are ignored unless `editable` is set, which the
    /// session derives from the stepping controller being stopped.
    pub fn handle<B>(
        &mut self,
        interaction: Interaction,
        board: &B,
        editable: bool,
        out: &mut Vec<Command>,
    ) where
        B: BoardView + ?Sized,
    {
        if let Interaction::SelectAgent { agent } = interaction {
            self.agent = agent;
            return;
        }
        if !editable {
            return;
        }

        match interaction {
            Interaction::PickPalette { kind } => {
                self.palette = Some(PaletteSelection { kind, variant: 0 });
                clear_selection(board, out);
            }
            Interaction::ClickCell { at, slot, toggle } => self.click(at, slot, toggle, board, out),
            Interaction::DragStart { at, slot } => self.drag_start(at, slot, board, out),
            Interaction::DragOver { target, copy } => self.drag_over(target, copy, board),
            Interaction::Drop { copy } => self.drop(copy, board, out),
            Interaction::DragCancel => self.end_drag(),
            Interaction::SelectVariant { variant } => self.select_variant(variant, board, out),
            Interaction::SelectAgent { .. } => {}
        }
    }

    fn click<B>(&mut self, at: CellCoord, slot: Slot, toggle: bool, board: &B, out: &mut Vec<Command>)
    where
        B: BoardView + ?Sized,
    {
        let addressed = self
            .palette
            .and_then(|palette| palette.kind.kind().category.slot(Some(self.agent)))
            .unwrap_or(slot);

        if let Some(symbol) = editable_occupant(board, at, addressed) {
            self.palette = None;
            let mode = if toggle {
                SelectMode::Toggle
            } else {
                SelectMode::Replace
            };
            out.push(Command::Select {
                ids: vec![symbol.id],
                mode,
            });
            return;
        }

        if let Some(palette) = self.palette {
            let agent = Some(self.agent);
            if placement::fits(board, palette.kind, agent, at, Occupancy::Exclusive) {
                out.push(Command::PlaceSymbol {
                    kind: palette.kind,
                    variant: palette.variant,
                    agent,
                    at,
                });
                self.palette = None;
            }
            return;
        }

        if !toggle {
            clear_selection(board, out);
        }
    }

    fn drag_start<B>(&mut self, at: CellCoord, slot: Slot, board: &B, out: &mut Vec<Command>)
    where
        B: BoardView + ?Sized,
    {
        self.palette = None;
        self.preview = None;
        match editable_occupant(board, at, slot) {
            Some(symbol) => {
                if !symbol.selected {
                    out.push(Command::Select {
                        ids: vec![symbol.id],
                        mode: SelectMode::Replace,
                    });
                }
                self.drag = Some(DragState::Relocate { origin: at });
            }
            None => self.drag = Some(DragState::Marquee { anchor: at }),
        }
    }

    fn drag_over<B>(&mut self, target: DropTarget, copy: bool, board: &B)
    where
        B: BoardView + ?Sized,
    {
        let Some(DragState::Relocate { origin }) = self.drag else {
            if self.drag.is_some() {
                self.preview = Some(DropPreview {
                    target,
                    copy,
                    verdict: Ok(()),
                });
            }
            return;
        };
        if self
            .preview
            .map_or(false, |preview| preview.target == target && preview.copy == copy)
        {
            return;
        }
        let verdict = match target {
            DropTarget::Trash => Ok(()),
            DropTarget::Cell(destination) => relocation_verdict(board, origin.offset_to(destination), copy),
        };
        self.preview = Some(DropPreview {
            target,
            copy,
            verdict,
        });
    }

    fn drop<B>(&mut self, copy: bool, board: &B, out: &mut Vec<Command>)
    where
        B: BoardView + ?Sized,
    {
        let drag = self.drag;
        let target = self.preview.map(|preview| preview.target);
        self.end_drag();

        match (drag, target) {
            (Some(DragState::Relocate { .. }), Some(DropTarget::Trash)) => {
                out.push(Command::TrashSelection);
            }
            (Some(DragState::Relocate { origin }), Some(DropTarget::Cell(destination))) => {
                let offset = origin.offset_to(destination);
                if offset.is_zero() && !copy {
                    return;
                }
                if relocation_verdict(board, offset, copy).is_ok() {
                    out.push(Command::MoveSelection { offset, copy });
                }
            }
            (Some(DragState::Marquee { anchor }), Some(DropTarget::Cell(corner))) => {
                let members = marquee_members(board, anchor, corner);
                if members.is_empty() {
                    return;
                }
                let all_selected = members
                    .iter()
                    .filter_map(|id| board.symbol(*id))
                    .all(|symbol| symbol.selected);
                let mode = if all_selected {
                    SelectMode::Remove
                } else {
                    SelectMode::Add
                };
                out.push(Command::Select { ids: members, mode });
            }
            _ => {}
        }
    }

    fn select_variant<B>(&mut self, variant: u8, board: &B, out: &mut Vec<Command>)
    where
        B: BoardView + ?Sized,
    {
        if let Some(palette) = self.palette.as_mut() {
            if palette.kind.kind().variant(variant).is_some() {
                palette.variant = variant;
            }
            return;
        }

        let selected = selected_symbols(board);
        if let [symbol] = selected.as_slice() {
            out.push(Command::SetVariant {
                id: symbol.id,
                variant,
            });
        }
    }

    fn end_drag(&mut self) {
        self.drag = None;
        self.preview = None;
    }
}

/// Editable symbols whose anchor lies in the rectangle spanned by two corner
/// squares. Fixed markers and input/output squares are excluded.
#[must_use]
pub fn marquee_members<B>(board: &B, first: CellCoord, second: CellCoord) -> Vec<InstanceId>
where
    B: BoardView + ?Sized,
{
    let rows = first.row().min(second.row())..=first.row().max(second.row());
    let columns = first.column().min(second.column())..=first.column().max(second.column());
    board
        .symbols()
        .into_iter()
        .filter(|symbol| !symbol.fixed)
        .filter_map(|symbol| symbol.trace.map(|trace| (symbol.id, trace.anchor)))
        .filter(|(_, anchor)| {
            rows.contains(&anchor.row()) && columns.contains(&anchor.column()) && !board.is_io(*anchor)
        })
        .map(|(id, _)| id)
        .collect()
}

fn editable_occupant<B>(board: &B, at: CellCoord, slot: Slot) -> Option<&SymbolState>
where
    B: BoardView + ?Sized,
{
    board.occupant(at, slot).filter(|symbol| !symbol.fixed)
}

fn selected_symbols<B>(board: &B) -> Vec<&SymbolState>
where
    B: BoardView + ?Sized,
{
    board
        .symbols()
        .into_iter()
        .filter(|symbol| symbol.selected)
        .collect()
}

fn clear_selection<B>(board: &B, out: &mut Vec<Command>)
where
    B: BoardView + ?Sized,
{
    if board.symbols().iter().any(|symbol| symbol.selected) {
        out.push(Command::ClearSelection);
    }
}

fn relocation_verdict<B>(board: &B, offset: CellOffset, copy: bool) -> Result<(), PlacementError>
where
    B: BoardView + ?Sized,
{
    let occupancy = if copy {
        Occupancy::Exclusive
    } else {
        Occupancy::ReleaseSelected
    };
    let selected = selected_symbols(board);
    placement::check_group(board, selected.into_iter(), offset, occupancy).map(|_| ())
}
