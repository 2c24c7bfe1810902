//! Static registry of every symbol kind a player can place.
//!
//! The tables are built at compile time and never change. Glyph lookup scans
//! the kinds of a category in palette order, so the shared glyph `x` resolves
//! to the single-square `x` cell while the discriminating half of a diode
//! (`<`, `>`, `v`, `^`) identifies the pair and its orientation.

use serde::{Deserialize, Serialize};

use crate::{Arity, Half, SymbolCategory};

/// Index of a [`SymbolKind`] within the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KindId(u8);

impl KindId {
    /// Retrieves the numeric catalog index.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Resolves the identifier into its catalog entry.
    #[must_use]
    pub fn kind(self) -> &'static SymbolKind {
        &KINDS[usize::from(self.0)]
    }

    /// Looks up a kind identifier by raw index, rejecting indices past the catalog.
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        (usize::from(index) < KINDS.len()).then_some(Self(index))
    }
}

/// Glyphs written to the submission text for each half of a symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Glyphs {
    anchor: char,
    partner: Option<char>,
}

impl Glyphs {
    /// Glyph for a symbol occupying a single square.
    #[must_use]
    pub const fn single(glyph: char) -> Self {
        Self {
            anchor: glyph,
            partner: None,
        }
    }

    /// Glyphs for a double-square symbol, anchor half first.
    #[must_use]
    pub const fn pair(anchor: char, partner: char) -> Self {
        Self {
            anchor,
            partner: Some(partner),
        }
    }

    /// Glyph emitted for the anchor square.
    #[must_use]
    pub const fn anchor(&self) -> char {
        self.anchor
    }

    /// Glyph emitted for the partner square, if the symbol has one.
    #[must_use]
    pub const fn partner(&self) -> Option<char> {
        self.partner
    }

    /// Glyph emitted for the requested half. Single glyphs ignore the half.
    #[must_use]
    pub const fn for_half(&self, half: Half) -> char {
        match (half, self.partner) {
            (Half::Partner, Some(partner)) => partner,
            _ => self.anchor,
        }
    }
}

/// One selectable option of a symbol kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolVariant {
    /// Label shown in the option picker.
    pub label: &'static str,
    /// Glyphs written for this option.
    pub glyphs: Glyphs,
    /// Icon name used by presentation layers.
    pub icon: &'static str,
}

/// Immutable description of a placeable symbol kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolKind {
    /// Category deciding which square slot the symbol occupies.
    pub category: SymbolCategory,
    /// Palette identifier of the kind.
    pub name: &'static str,
    /// Footprint of the symbol on the board.
    pub arity: Arity,
    /// Ordered options; the first entry is the canonical value.
    pub variants: &'static [SymbolVariant],
    /// Whether the symbol survives the trash once placed.
    pub permanent: bool,
}

impl SymbolKind {
    /// Whether the kind is stored per agent rather than shared.
    #[must_use]
    pub const fn per_agent(&self) -> bool {
        !matches!(self.category, SymbolCategory::Cell)
    }

    /// Returns the variant stored at `index`, if present.
    #[must_use]
    pub fn variant(&self, index: u8) -> Option<&'static SymbolVariant> {
        self.variants.get(usize::from(index))
    }
}

/// Result of resolving a submission glyph against the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphMatch {
    /// Kind the glyph belongs to.
    pub kind: KindId,
    /// Variant of the kind carrying the glyph.
    pub variant: u8,
    /// Half of the symbol that the glyph encodes.
    pub half: Half,
}

const fn single(label: &'static str, glyph: char, icon: &'static str) -> SymbolVariant {
    SymbolVariant {
        label,
        glyphs: Glyphs::single(glyph),
        icon,
    }
}

const fn pair(label: &'static str, anchor: char, partner: char, icon: &'static str) -> SymbolVariant {
    SymbolVariant {
        label,
        glyphs: Glyphs::pair(anchor, partner),
        icon,
    }
}

macro_rules! kind {
    ($category:ident, $name:expr, $arity:ident, [$($variant:expr),+ $(,)?]) => {
        kind!($category, $name, $arity, [$($variant),+], false)
    };
    ($category:ident, $name:expr, $arity:ident, [$($variant:expr),+ $(,)?], $permanent:expr) => {
        SymbolKind {
            category: SymbolCategory::$category,
            name: $name,
            arity: Arity::$arity,
            variants: &[$($variant),+],
            permanent: $permanent,
        }
    };
}

/// Unlatched `x` cell. Also the fixed marker placed on input squares.
pub const CELL_X: KindId = KindId(0);
/// Unlatched `+` cell.
pub const CELL_PLUS: KindId = KindId(1);
/// Latched `/` cell.
pub const CELL_SLASH: KindId = KindId(2);
/// Latched `\` cell.
pub const CELL_BACKSLASH: KindId = KindId(3);
/// Latched `-` cell.
pub const CELL_DASH: KindId = KindId(4);
/// Latched `|` cell.
pub const CELL_PIPE: KindId = KindId(5);
/// Horizontal offset cell `][`.
pub const CELL_HORIZONTAL: KindId = KindId(6);
/// Vertical offset cell `W`/`M`.
pub const CELL_VERTICAL: KindId = KindId(7);
/// Diode pointing left, `<x`.
pub const DIODE_LEFT: KindId = KindId(8);
/// Diode pointing down, `x` over `v`.
pub const DIODE_DOWN: KindId = KindId(9);
/// Diode pointing up, `^` over `x`.
pub const DIODE_UP: KindId = KindId(10);
/// Diode pointing right, `x>`.
pub const DIODE_RIGHT: KindId = KindId(11);
/// Direction instruction turning the agent left.
pub const DIRECTION_LEFT: KindId = KindId(12);
/// Direction instruction turning the agent down.
pub const DIRECTION_DOWN: KindId = KindId(13);
/// Direction instruction turning the agent right.
pub const DIRECTION_RIGHT: KindId = KindId(14);
/// Direction instruction turning the agent up.
pub const DIRECTION_UP: KindId = KindId(15);
/// START operation. Each agent needs exactly one; never deletable.
pub const OP_START: KindId = KindId(16);
/// NEXT operation advancing the test step.
pub const OP_NEXT: KindId = KindId(17);
/// GRAB/DROP operation family.
pub const OP_GRAB_DROP: KindId = KindId(18);
/// LOCK/FREE operation family.
pub const OP_LOCK_FREE: KindId = KindId(19);
/// RESET operation.
pub const OP_RESET: KindId = KindId(20);
/// SYNC operation.
pub const OP_SYNC: KindId = KindId(21);
/// ROTATE operation.
pub const OP_ROTATE: KindId = KindId(22);
/// Branch on `|`/`/` polarity.
pub const OP_BRANCH_ONE: KindId = KindId(23);
/// Branch on `-`/`\` polarity.
pub const OP_BRANCH_ZERO: KindId = KindId(24);
/// Output power toggles.
pub const OP_POWER: KindId = KindId(25);

static KINDS: [SymbolKind; 26] = [
    kind!(Cell, "x", Single, [single("x", 'x', "fill_x")]),
    kind!(Cell, "+", Single, [single("+", '+', "fill_plus")]),
    kind!(Cell, "/", Single, [single("/", '/', "fill_blue")]),
    kind!(Cell, "\\", Single, [single("\\", '\\', "fill_green")]),
    kind!(Cell, "-", Single, [single("-", '-', "fill_red")]),
    kind!(Cell, "|", Single, [single("|", '|', "fill_orange")]),
    kind!(Cell, "][", HorizontalPair, [pair("][", ']', '[', "outline_horizontal")]),
    kind!(Cell, "W\nM", VerticalPair, [pair("W\nM", 'W', 'M', "outline_vertical")]),
    kind!(Cell, "<x", HorizontalPair, [pair("<x", '<', 'x', "outline_diode_left")]),
    kind!(Cell, "x\nv", VerticalPair, [pair("x\nv", 'x', 'v', "outline_diode_down")]),
    kind!(Cell, "^\nx", VerticalPair, [pair("^\nx", '^', 'x', "outline_diode_up")]),
    kind!(Cell, "x>", HorizontalPair, [pair("x>", 'x', '>', "outline_diode_right")]),
    kind!(Direction, "<", Single, [single("<", '<', "left")]),
    kind!(Direction, "v", Single, [single("v", 'v', "down")]),
    kind!(Direction, ">", Single, [single(">", '>', "right")]),
    kind!(Direction, "^", Single, [single("^", '^', "up")]),
    kind!(Operation, "START", Single, [single("START", 'S', "start")], true),
    kind!(Operation, "NEXT", Single, [single("NEXT", 'n', "next")]),
    kind!(
        Operation,
        "GRAB/DROP",
        Single,
        [
            single("GRAB", 'g', "grab"),
            single("DROP", 'd', "drop"),
            single("GRAB/DROP", 'w', "swap"),
        ]
    ),
    kind!(
        Operation,
        "LOCK/FREE",
        Single,
        [
            single("LOCK", 'l', "latch"),
            single("FREE", 'u', "unlatch"),
            single("LOCK/FREE", 't', "togglelatch"),
        ]
    ),
    kind!(Operation, "RESET", Single, [single("RESET", '*', "relatch")]),
    kind!(Operation, "SYNC", Single, [single("SYNC", 's', "sync")]),
    kind!(Operation, "ROTATE", Single, [single("ROTATE", 'r', "rotate")]),
    kind!(
        Operation,
        "BRANCH(|/)",
        Single,
        [
            single("<", '<', "branch1left"),
            single("v", 'v', "branch1down"),
            single(">", '>', "branch1right"),
            single("^", '^', "branch1up"),
        ]
    ),
    kind!(
        Operation,
        "BRANCH(-\\)",
        Single,
        [
            single("<", '[', "branch0left"),
            single("v", 'W', "branch0down"),
            single(">", ']', "branch0right"),
            single("^", 'M', "branch0up"),
        ]
    ),
    kind!(
        Operation,
        "POWER",
        Single,
        [
            single("TOGGLE POWER 1", 'p', "power0"),
            single("TOGGLE POWER 2", 'P', "power1"),
        ]
    ),
];

/// Glyph written for an empty square.
pub const EMPTY_GLYPH: char = '_';

/// Reports whether the glyph denotes an empty square.
#[must_use]
pub const fn is_empty_glyph(glyph: char) -> bool {
    matches!(glyph, '_' | '.' | ' ')
}

/// Iterates over every catalog entry together with its identifier.
pub fn kinds() -> impl Iterator<Item = (KindId, &'static SymbolKind)> {
    KINDS
        .iter()
        .enumerate()
        .map(|(index, kind)| (KindId(index as u8), kind))
}

/// Kinds of one category, in palette order.
pub fn palette(category: SymbolCategory) -> impl Iterator<Item = (KindId, &'static SymbolKind)> {
    kinds().filter(move |(_, kind)| kind.category == category)
}

/// Resolves a submission glyph for the provided category.
///
/// Returns `None` for empty glyphs and for glyphs the category does not use.
#[must_use]
pub fn lookup(category: SymbolCategory, glyph: char) -> Option<GlyphMatch> {
    if is_empty_glyph(glyph) {
        return None;
    }

    for (kind, entry) in palette(category) {
        for (variant, option) in entry.variants.iter().enumerate() {
            let half = if option.glyphs.anchor() == glyph {
                Half::Anchor
            } else if option.glyphs.partner() == Some(glyph) {
                Half::Partner
            } else {
                continue;
            };
            return Some(GlyphMatch {
                kind,
                variant: variant as u8,
                half,
            });
        }
    }

    None
}
