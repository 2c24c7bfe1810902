#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state management for the SpaceCells editor.
//!
//! The world owns the Grid Model: an arena of symbol states keyed by
//! [`InstanceId`] and a flat row-major array of squares referencing that
//! arena. Both halves of a double-square symbol point at the same arena
//! entry, so select, move and delete always act on the pair as a unit.

pub mod submission;

use std::collections::BTreeMap;

use spacecells_core::{
    catalog, Agent, BoardTrace, BoardView, CellCoord, CellOffset, Command, Dimensions, Event,
    Half, InstanceId, KindId, SelectMode, Slot, SymbolState, Terrain,
};
use spacecells_system_placement::{self as placement, Footprint, Occupancy};

/// Board size used before the engine reports a level.
pub const DEFAULT_DIMENSIONS: Dimensions = Dimensions::new(10, 12);

/// Symbol references held by one board square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Square {
    cell: Option<(InstanceId, Half)>,
    direction: [Option<InstanceId>; 2],
    operation: [Option<InstanceId>; 2],
}

impl Square {
    fn get(&self, slot: Slot) -> Option<(InstanceId, Half)> {
        match slot {
            Slot::Cell => self.cell,
            Slot::Direction(agent) => self.direction[agent.index()].map(|id| (id, Half::Anchor)),
            Slot::Operation(agent) => self.operation[agent.index()].map(|id| (id, Half::Anchor)),
        }
    }

    fn set(&mut self, slot: Slot, value: Option<(InstanceId, Half)>) {
        match slot {
            Slot::Cell => self.cell = value,
            Slot::Direction(agent) => self.direction[agent.index()] = value.map(|(id, _)| id),
            Slot::Operation(agent) => self.operation[agent.index()] = value.map(|(id, _)| id),
        }
    }
}

/// Represents the authoritative SpaceCells board state.
#[derive(Clone, Debug)]
pub struct World {
    terrain: Terrain,
    squares: Vec<Square>,
    symbols: BTreeMap<InstanceId, SymbolState>,
    next_id: u64,
}

impl World {
    /// Creates an empty, fully traversable board of the default size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_terrain(Terrain::open(DEFAULT_DIMENSIONS))
    }

    /// Creates an empty board for the provided terrain, with fixed markers
    /// already standing on its inputs.
    #[must_use]
    pub fn with_terrain(terrain: Terrain) -> Self {
        let mut world = Self {
            squares: Vec::new(),
            symbols: BTreeMap::new(),
            next_id: 1,
            terrain,
        };
        world.reset_board();
        world
    }

    fn allocate_id(&mut self) -> InstanceId {
        let id = InstanceId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn square_mut(&mut self, cell: CellCoord) -> Option<&mut Square> {
        let index = self.terrain.dimensions().index(cell)?;
        self.squares.get_mut(index)
    }

    fn reset_board(&mut self) {
        let dimensions = self.terrain.dimensions();
        self.squares = vec![Square::default(); dimensions.area()];
        self.symbols.clear();

        let inputs = self.terrain.inputs().to_vec();
        for input in inputs {
            if !dimensions.contains(input) {
                continue;
            }
            let id = self.allocate_id();
            let mut marker = SymbolState::palette(id, catalog::CELL_X, 0, None);
            marker.fixed = true;
            let footprint = Footprint {
                anchor: input,
                partner: None,
                slot: Slot::Cell,
            };
            self.write(marker, footprint);
        }
    }

    fn write(&mut self, mut symbol: SymbolState, footprint: Footprint) {
        let id = symbol.id;
        symbol.trace = Some(BoardTrace {
            anchor: footprint.anchor,
            slot: footprint.slot,
        });
        let halves = [Half::Anchor, Half::Partner];
        for (cell, half) in footprint.cells().zip(halves) {
            if let Some(square) = self.square_mut(cell) {
                square.set(footprint.slot, Some((id, half)));
            }
        }
        let _ = self.symbols.insert(id, symbol);
    }

    fn lift(&mut self, id: InstanceId) -> Option<SymbolState> {
        let symbol = self.symbols.remove(&id)?;
        if let Some(trace) = symbol.trace {
            let (anchor, partner) = symbol.definition().arity.footprint(trace.anchor);
            for cell in std::iter::once(anchor).chain(partner) {
                if let Some(square) = self.square_mut(cell) {
                    if square.get(trace.slot).map(|(occupant, _)| occupant) == Some(id) {
                        square.set(trace.slot, None);
                    }
                }
            }
        }
        Some(symbol)
    }

    fn selected_ids(&self) -> Vec<InstanceId> {
        self.symbols
            .values()
            .filter(|symbol| symbol.selected)
            .map(|symbol| symbol.id)
            .collect()
    }

    fn selected_count(&self) -> u32 {
        self.symbols.values().filter(|symbol| symbol.selected).count() as u32
    }

    fn load_submission(&mut self, text: &str, out_events: &mut Vec<Event>) {
        let parsed = match submission::parse(text, self.terrain.dimensions()) {
            Ok(parsed) => parsed,
            Err(error) => {
                out_events.push(Event::SubmissionRejected { error });
                return;
            }
        };

        self.reset_board();
        let mut discarded = 0;
        for entry in parsed.entries() {
            let agent = entry.slot.agent();
            match placement::check(&*self, entry.kind, agent, entry.anchor, Occupancy::Exclusive) {
                Ok(footprint) => {
                    let id = self.allocate_id();
                    let symbol = SymbolState::palette(id, entry.kind, entry.variant, agent);
                    self.write(symbol, footprint);
                }
                Err(_) if self.is_input_marker(entry) => {}
                Err(_) => discarded += 1,
            }
        }

        let symbols = self.symbols.values().filter(|symbol| !symbol.fixed).count() as u32;
        out_events.push(Event::SubmissionLoaded { symbols, discarded });
    }

    fn is_input_marker(&self, entry: &submission::Entry) -> bool {
        entry.slot == Slot::Cell
            && entry.kind == catalog::CELL_X
            && self.terrain.inputs().contains(&entry.anchor)
    }

    fn place_symbol(
        &mut self,
        kind: KindId,
        variant: u8,
        agent: Option<Agent>,
        at: CellCoord,
        out_events: &mut Vec<Event>,
    ) {
        let definition = kind.kind();
        let agent = if definition.per_agent() { agent } else { None };
        let variant = if definition.variant(variant).is_some() {
            variant
        } else {
            0
        };

        match placement::check(&*self, kind, agent, at, Occupancy::Exclusive) {
            Ok(footprint) => {
                let id = self.allocate_id();
                self.write(SymbolState::palette(id, kind, variant, agent), footprint);
                out_events.push(Event::SymbolPlaced {
                    id,
                    at,
                    slot: footprint.slot,
                });
            }
            Err(reason) => out_events.push(Event::PlacementRejected { kind, at, reason }),
        }
    }

    fn select(&mut self, ids: &[InstanceId], mode: SelectMode, out_events: &mut Vec<Event>) {
        let mut changed = false;
        for symbol in self.symbols.values_mut() {
            if symbol.fixed {
                continue;
            }
            let listed = ids.contains(&symbol.id);
            let next = match mode {
                SelectMode::Replace => listed,
                SelectMode::Add => symbol.selected || listed,
                SelectMode::Remove => symbol.selected && !listed,
                SelectMode::Toggle => symbol.selected != listed,
            };
            changed |= next != symbol.selected;
            symbol.selected = next;
        }
        if changed {
            out_events.push(Event::SelectionChanged {
                selected: self.selected_count(),
            });
        }
    }

    fn move_selection(&mut self, offset: CellOffset, copy: bool, out_events: &mut Vec<Event>) {
        let ids = self.selected_ids();
        if ids.is_empty() || (offset.is_zero() && !copy) {
            return;
        }

        let occupancy = if copy {
            Occupancy::Exclusive
        } else {
            Occupancy::ReleaseSelected
        };
        let sources: Vec<SymbolState> = ids
            .iter()
            .filter_map(|id| self.symbols.get(id).copied())
            .collect();
        let footprints = match placement::check_group(&*self, sources.iter(), offset, occupancy) {
            Ok(footprints) => footprints,
            Err(reason) => {
                out_events.push(Event::MoveRejected { reason });
                return;
            }
        };

        let count = sources.len() as u32;
        if copy {
            for symbol in self.symbols.values_mut() {
                symbol.selected = false;
            }
            for (source, footprint) in sources.iter().zip(footprints) {
                let id = self.allocate_id();
                let mut clone = SymbolState::palette(id, source.kind, source.variant, source.agent);
                clone.selected = true;
                self.write(clone, footprint);
            }
        } else {
            let lifted: Vec<SymbolState> = ids.iter().filter_map(|id| self.lift(*id)).collect();
            for (symbol, footprint) in lifted.into_iter().zip(footprints) {
                self.write(symbol, footprint);
            }
        }

        out_events.push(Event::SymbolsMoved {
            count,
            offset,
            copy,
        });
    }

    fn trash_selection(&mut self, out_events: &mut Vec<Event>) {
        let ids = self.selected_ids();
        if ids.is_empty() {
            return;
        }

        let mut removed = 0;
        let mut retained = 0;
        for id in ids {
            let permanent = self
                .symbols
                .get(&id)
                .map_or(false, |symbol| symbol.definition().permanent);
            if permanent {
                if let Some(symbol) = self.symbols.get_mut(&id) {
                    symbol.selected = false;
                }
                retained += 1;
            } else if self.lift(id).is_some() {
                removed += 1;
            }
        }

        out_events.push(Event::SymbolsTrashed { removed, retained });
        out_events.push(Event::SelectionChanged { selected: 0 });
    }

    fn set_variant(&mut self, id: InstanceId, variant: u8, out_events: &mut Vec<Event>) {
        let Some(symbol) = self.symbols.get_mut(&id) else {
            return;
        };
        if symbol.fixed || symbol.variant == variant || symbol.definition().variant(variant).is_none() {
            return;
        }
        symbol.variant = variant;
        out_events.push(Event::VariantChanged { id, variant });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardView for World {
    fn dimensions(&self) -> Dimensions {
        self.terrain.dimensions()
    }

    fn is_traversable(&self, cell: CellCoord) -> bool {
        self.terrain.is_traversable(cell)
    }

    fn is_io(&self, cell: CellCoord) -> bool {
        self.terrain.is_io(cell)
    }

    fn occupant(&self, cell: CellCoord, slot: Slot) -> Option<&SymbolState> {
        let index = self.terrain.dimensions().index(cell)?;
        let (id, _) = self.squares.get(index)?.get(slot)?;
        self.symbols.get(&id)
    }

    fn symbol(&self, id: InstanceId) -> Option<&SymbolState> {
        self.symbols.get(&id)
    }

    fn symbols(&self) -> Vec<&SymbolState> {
        self.symbols.values().collect()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureLevel { terrain } => {
            world.terrain = terrain;
            world.reset_board();
            out_events.push(Event::LevelConfigured {
                dimensions: world.terrain.dimensions(),
            });
        }
        Command::LoadSubmission { text } => world.load_submission(&text, out_events),
        Command::PlaceSymbol {
            kind,
            variant,
            agent,
            at,
        } => world.place_symbol(kind, variant, agent, at, out_events),
        Command::Select { ids, mode } => world.select(&ids, mode, out_events),
        Command::ClearSelection => world.select(&[], SelectMode::Replace, out_events),
        Command::MoveSelection { offset, copy } => world.move_selection(offset, copy, out_events),
        Command::TrashSelection => world.trash_selection(out_events),
        Command::SetVariant { id, variant } => world.set_variant(id, variant, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use spacecells_core::{CellCoord, Dimensions, Half, InstanceId, Slot, SymbolState, Terrain};

    use super::{submission, World};

    /// Size of the board.
    #[must_use]
    pub fn dimensions(world: &World) -> Dimensions {
        world.terrain.dimensions()
    }

    /// Terrain installed by the last level configuration.
    #[must_use]
    pub fn terrain(world: &World) -> &Terrain {
        &world.terrain
    }

    /// Symbol occupying the slot of a square together with the half it covers.
    #[must_use]
    pub fn occupant_half(world: &World, cell: CellCoord, slot: Slot) -> Option<(&SymbolState, Half)> {
        let index = world.terrain.dimensions().index(cell)?;
        let (id, half) = world.squares.get(index)?.get(slot)?;
        world.symbols.get(&id).map(|symbol| (symbol, half))
    }

    /// Identifiers of every selected symbol, in identity order.
    #[must_use]
    pub fn selection(world: &World) -> Vec<InstanceId> {
        world.selected_ids()
    }

    /// Current board contents as a decoded submission.
    #[must_use]
    pub fn submission(world: &World) -> submission::Submission {
        submission::Submission::from_board(world)
    }

    /// Current board contents as submission text.
    #[must_use]
    pub fn submission_text(world: &World) -> String {
        submission::serialize(world)
    }
}
