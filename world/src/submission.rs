//! Five-grid text encoding of a program.
//!
//! The groups appear in a fixed order: the shared cell grid, then the direction
//! and operation grids of the first agent, then those of the second agent.
//! Groups are separated by blank lines and every row holds exactly one glyph
//! per column. Double-square symbols emit a distinct glyph for each half.

use spacecells_core::{
    catalog::{self, EMPTY_GLYPH},
    BoardView, CellCoord, CellOffset, Dimensions, Half, KindId, ParseError, Slot, SymbolCategory,
};

/// One symbol decoded from, or destined for, submission text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Grid group holding the symbol.
    pub slot: Slot,
    /// Anchor square of the symbol.
    pub anchor: CellCoord,
    /// Kind of the symbol.
    pub kind: KindId,
    /// Option of the kind.
    pub variant: u8,
}

impl Entry {
    fn sort_key(&self) -> (usize, CellCoord) {
        (group_index(self.slot), self.anchor)
    }
}

/// Decoded submission: the board size and every symbol in group order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    dimensions: Dimensions,
    entries: Vec<Entry>,
}

impl Submission {
    /// Submission without any symbols.
    #[must_use]
    pub const fn empty(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            entries: Vec::new(),
        }
    }

    /// Captures every on-board symbol of a board.
    #[must_use]
    pub fn from_board<B>(board: &B) -> Self
    where
        B: BoardView + ?Sized,
    {
        let entries = board
            .symbols()
            .into_iter()
            .filter_map(|symbol| {
                symbol.trace.map(|trace| Entry {
                    slot: trace.slot,
                    anchor: trace.anchor,
                    kind: symbol.kind,
                    variant: symbol.variant,
                })
            })
            .collect();
        Self::from_entries(board.dimensions(), entries)
    }

    fn from_entries(dimensions: Dimensions, mut entries: Vec<Entry>) -> Self {
        entries.sort_by_key(Entry::sort_key);
        Self {
            dimensions,
            entries,
        }
    }

    /// Board size the submission was encoded for.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Symbols in group order, row-major within each group.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Renders the submission as five blank-line separated grids.
    #[must_use]
    pub fn to_text(&self) -> String {
        let rows = usize::try_from(self.dimensions.rows()).unwrap_or(0);
        let columns = usize::try_from(self.dimensions.columns()).unwrap_or(0);
        let mut groups = vec![vec![vec![EMPTY_GLYPH; columns]; rows]; Slot::ALL.len()];

        for entry in &self.entries {
            let kind = entry.kind.kind();
            let Some(variant) = kind.variant(entry.variant).or_else(|| kind.variants.first()) else {
                continue;
            };
            let (anchor, partner) = kind.arity.footprint(entry.anchor);
            let grid = &mut groups[group_index(entry.slot)];
            write_glyph(grid, anchor, variant.glyphs.for_half(Half::Anchor));
            if let Some(partner) = partner {
                write_glyph(grid, partner, variant.glyphs.for_half(Half::Partner));
            }
        }

        groups
            .iter()
            .map(|grid| {
                grid.iter()
                    .map(|row| row.iter().collect::<String>())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Decodes submission text for a board of the provided size.
///
/// Rows are grouped by count: blank lines only separate groups, so runs of
/// blank lines and `\r\n` endings are accepted. A row made of spaces is a row
/// of empty squares, not a separator.
pub fn parse(text: &str, dimensions: Dimensions) -> Result<Submission, ParseError> {
    let lines: Vec<&str> = text.lines().filter(|line| !line.is_empty()).collect();
    let rows = usize::try_from(dimensions.rows()).unwrap_or(usize::MAX);
    let columns = usize::try_from(dimensions.columns()).unwrap_or(usize::MAX);
    let expected = rows.saturating_mul(Slot::ALL.len());
    if lines.len() != expected {
        return Err(ParseError::LineCount {
            expected,
            found: lines.len(),
        });
    }

    let mut entries = Vec::new();
    for (slot, group) in Slot::ALL.into_iter().zip(lines.chunks(rows.max(1))) {
        let mut grid = Vec::with_capacity(rows);
        for (row, line) in group.iter().enumerate() {
            let glyphs: Vec<char> = line.chars().collect();
            if glyphs.len() != columns {
                return Err(ParseError::LineLength {
                    group: slot,
                    row: row as u32,
                    expected: columns,
                    found: glyphs.len(),
                });
            }
            grid.push(glyphs);
        }
        GroupScanner::new(slot, dimensions, &grid).scan(&mut entries)?;
    }

    Ok(Submission::from_entries(dimensions, entries))
}

/// Renders the current contents of a board as submission text.
#[must_use]
pub fn serialize<B>(board: &B) -> String
where
    B: BoardView + ?Sized,
{
    Submission::from_board(board).to_text()
}

fn group_index(slot: Slot) -> usize {
    Slot::ALL
        .iter()
        .position(|candidate| *candidate == slot)
        .unwrap_or(0)
}

fn write_glyph(grid: &mut [Vec<char>], cell: CellCoord, glyph: char) {
    let row = usize::try_from(cell.row()).ok();
    let column = usize::try_from(cell.column()).ok();
    if let (Some(row), Some(column)) = (row, column) {
        if let Some(target) = grid.get_mut(row).and_then(|line| line.get_mut(column)) {
            *target = glyph;
        }
    }
}

struct GroupScanner<'a> {
    slot: Slot,
    category: SymbolCategory,
    dimensions: Dimensions,
    grid: &'a [Vec<char>],
    claimed: Vec<bool>,
}

impl<'a> GroupScanner<'a> {
    fn new(slot: Slot, dimensions: Dimensions, grid: &'a [Vec<char>]) -> Self {
        Self {
            slot,
            category: slot.category(),
            dimensions,
            grid,
            claimed: vec![false; dimensions.area()],
        }
    }

    fn glyph(&self, cell: CellCoord) -> char {
        let row = cell.row() as usize;
        let column = cell.column() as usize;
        self.grid
            .get(row)
            .and_then(|line| line.get(column))
            .copied()
            .unwrap_or(EMPTY_GLYPH)
    }

    fn is_claimed(&self, cell: CellCoord) -> bool {
        self.dimensions
            .index(cell)
            .and_then(|index| self.claimed.get(index).copied())
            .unwrap_or(false)
    }

    fn claim(&mut self, cell: CellCoord) {
        if let Some(index) = self.dimensions.index(cell) {
            if let Some(flag) = self.claimed.get_mut(index) {
                *flag = true;
            }
        }
    }

    fn in_bounds(&self, cell: Option<CellCoord>) -> Option<CellCoord> {
        cell.filter(|cell| self.dimensions.contains(*cell))
    }

    fn scan(mut self, out: &mut Vec<Entry>) -> Result<(), ParseError> {
        for cell in self.dimensions.cells() {
            if self.is_claimed(cell) {
                continue;
            }
            let glyph = self.glyph(cell);
            if catalog::is_empty_glyph(glyph) {
                continue;
            }

            if let Some(entry) = self.match_pair_at(cell, glyph) {
                self.claim(cell);
                if let Some(partner) = entry.kind.kind().arity.footprint(cell).1 {
                    self.claim(partner);
                }
                out.push(entry);
                continue;
            }

            let found = catalog::lookup(self.category, glyph).ok_or(ParseError::UnknownGlyph {
                group: self.slot,
                cell,
                glyph,
            })?;
            let kind = found.kind.kind();
            match kind.arity.partner_offset() {
                None => {
                    self.claim(cell);
                    out.push(Entry {
                        slot: self.slot,
                        anchor: cell,
                        kind: found.kind,
                        variant: found.variant,
                    });
                }
                Some(offset) => {
                    let glyphs = kind.variants[usize::from(found.variant)].glyphs;
                    return Err(match found.half {
                        Half::Anchor => {
                            self.unmatched_anchor(cell, cell.offset(offset), glyphs.for_half(Half::Partner))
                        }
                        Half::Partner => {
                            self.orphaned_partner(cell, offset, glyphs.for_half(Half::Anchor))
                        }
                    });
                }
            }
        }
        Ok(())
    }

    /// Finds a double-square kind anchored at `cell` whose partner square
    /// carries the matching glyph. Kinds are tried in palette order.
    fn match_pair_at(&self, cell: CellCoord, glyph: char) -> Option<Entry> {
        for (kind, definition) in catalog::palette(self.category) {
            let Some(partner) = self.in_bounds(definition.arity.footprint(cell).1) else {
                continue;
            };
            if self.is_claimed(partner) {
                continue;
            }
            for (variant, option) in definition.variants.iter().enumerate() {
                if option.glyphs.anchor() == glyph && option.glyphs.partner() == Some(self.glyph(partner)) {
                    return Some(Entry {
                        slot: self.slot,
                        anchor: cell,
                        kind,
                        variant: variant as u8,
                    });
                }
            }
        }
        None
    }

    fn unmatched_anchor(&self, cell: CellCoord, partner: Option<CellCoord>, expected: char) -> ParseError {
        match self.in_bounds(partner) {
            None => ParseError::PartnerOutOfBounds {
                group: self.slot,
                cell,
            },
            Some(partner) if self.is_claimed(partner) => ParseError::PartnerConflict {
                group: self.slot,
                cell: partner,
            },
            Some(partner) => ParseError::MismatchedPartner {
                group: self.slot,
                cell: partner,
                expected,
                found: self.glyph(partner),
            },
        }
    }

    fn orphaned_partner(
        &self,
        cell: CellCoord,
        offset: CellOffset,
        expected: char,
    ) -> ParseError {
        let anchor = cell.offset(CellOffset::new(-offset.rows, -offset.columns));
        match self.in_bounds(anchor) {
            None => ParseError::PartnerOutOfBounds {
                group: self.slot,
                cell,
            },
            Some(anchor) if self.is_claimed(anchor) => ParseError::PartnerConflict {
                group: self.slot,
                cell: anchor,
            },
            Some(anchor) => ParseError::MismatchedPartner {
                group: self.slot,
                cell: anchor,
                expected,
                found: self.glyph(anchor),
            },
        }
    }
}
