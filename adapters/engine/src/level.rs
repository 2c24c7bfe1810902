use spacecells_core::{CellCoord, Dimensions, Matrix, Terrain};

/// Color codes accepted in the expected-output line.
const COLOR_CODES: &str = "KNROYGBPWCE";

/// Separates test cases inside an input-bit or output-color token.
const TEST_CASE_SEPARATOR: char = ',';

/// Reasons level text could not be read.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    /// The text holds no header line.
    #[error("level text is empty")]
    MissingHeader,
    /// The header is not `m n bots inputs outputs`.
    #[error("level header {line:?} is not five non-negative integers")]
    InvalidHeader {
        /// Header line as written.
        line: String,
    },
    /// The level grid ended early.
    #[error("level grid is missing row {row}")]
    MissingRow {
        /// Index of the first missing row.
        row: u32,
    },
    /// A level grid row has the wrong width.
    #[error("level row {row} has {found} squares, expected {expected}")]
    RowLength {
        /// Offending row.
        row: u32,
        /// Width from the header.
        expected: usize,
        /// Width found.
        found: usize,
    },
    /// A location line is missing or malformed.
    #[error("{port} {index} has no valid location")]
    InvalidLocation {
        /// `input` or `output`.
        port: &'static str,
        /// Position of the port in header order.
        index: usize,
    },
    /// A location lies outside the level.
    #[error("{port} {index} at {cell} lies outside the level")]
    LocationOutOfRange {
        /// `input` or `output`.
        port: &'static str,
        /// Position of the port in header order.
        index: usize,
        /// Requested square.
        cell: CellCoord,
    },
    /// An input bit string is missing or holds something other than `0`/`1`.
    #[error("input {index} has malformed bits")]
    InvalidBits {
        /// Input whose bits are malformed.
        index: usize,
    },
    /// The expected-output line is missing or holds an unknown color.
    #[error("expected output colors are malformed")]
    InvalidColors,
    /// Inputs and outputs disagree on the number of test cases.
    #[error("input {index} has {found} test cases, expected {expected}")]
    TestCaseMismatch {
        /// Input whose test cases disagree.
        index: usize,
        /// Number of test cases in the output line.
        expected: usize,
        /// Number of test cases for the input.
        found: usize,
    },
}

/// Parsed level text.
///
/// The layout is a header line `m n bots inputs outputs`, `m` grid rows (`_`
/// and space both mark open squares), one `y x` line per input then per
/// output, one bit token per input and a final color token. Bit and color
/// tokens hold one comma-separated entry per test case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelText {
    bots: u32,
    grid: Matrix<char>,
    inputs: Vec<CellCoord>,
    outputs: Vec<CellCoord>,
    input_bits: Vec<Vec<Vec<bool>>>,
    output_colors: Vec<Vec<char>>,
}

impl LevelText {
    /// Parses level text.
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let mut lines = text.lines().map(|line| line.trim_end_matches('\r'));
        let header = lines
            .by_ref()
            .find(|line| !line.trim().is_empty())
            .ok_or(LevelError::MissingHeader)?;
        let [rows, columns, bots, input_count, output_count] = parse_header(header)?;
        let dimensions = Dimensions::new(rows, columns);

        let mut lines = lines.skip_while(|line| line.is_empty());
        let mut grid = Vec::with_capacity(rows as usize);
        for row in 0..rows {
            let line = lines.next().ok_or(LevelError::MissingRow { row })?;
            let squares: Vec<char> = line
                .chars()
                .map(|glyph| if glyph == '_' { ' ' } else { glyph })
                .collect();
            if squares.len() != columns as usize {
                return Err(LevelError::RowLength {
                    row,
                    expected: columns as usize,
                    found: squares.len(),
                });
            }
            grid.push(squares);
        }
        let grid = Matrix::from_fn(dimensions, |cell| {
            grid[cell.row() as usize][cell.column() as usize]
        });

        let mut tokens = lines.flat_map(str::split_whitespace);
        let inputs = read_locations(&mut tokens, "input", input_count, dimensions)?;
        let outputs = read_locations(&mut tokens, "output", output_count, dimensions)?;

        let mut bits_per_input = Vec::with_capacity(inputs.len());
        for index in 0..inputs.len() {
            let token = tokens.next().ok_or(LevelError::InvalidBits { index })?;
            bits_per_input.push(parse_bits(token).ok_or(LevelError::InvalidBits { index })?);
        }
        let output_colors = tokens
            .next()
            .and_then(parse_colors)
            .ok_or(LevelError::InvalidColors)?;

        let test_cases = output_colors.len();
        for (index, bits) in bits_per_input.iter().enumerate() {
            if bits.len() != test_cases {
                return Err(LevelError::TestCaseMismatch {
                    index,
                    expected: test_cases,
                    found: bits.len(),
                });
            }
        }
        let input_bits = (0..test_cases)
            .map(|test| {
                bits_per_input
                    .iter()
                    .map(|bits| bits[test].clone())
                    .collect()
            })
            .collect();

        Ok(Self {
            bots,
            grid,
            inputs,
            outputs,
            input_bits,
            output_colors,
        })
    }

    /// Size of the level.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.grid.dimensions()
    }

    /// Number of agents the level runs.
    #[must_use]
    pub const fn bot_count(&self) -> u32 {
        self.bots
    }

    /// Level glyphs with `_` normalised to space.
    #[must_use]
    pub const fn grid(&self) -> &Matrix<char> {
        &self.grid
    }

    /// Input squares in header order.
    #[must_use]
    pub fn inputs(&self) -> &[CellCoord] {
        &self.inputs
    }

    /// Output squares in header order.
    #[must_use]
    pub fn outputs(&self) -> &[CellCoord] {
        &self.outputs
    }

    /// Input bits indexed `[test case][input][step]`.
    #[must_use]
    pub fn input_bits(&self) -> &[Vec<Vec<bool>>] {
        &self.input_bits
    }

    /// Expected output colors indexed `[test case][step]`.
    #[must_use]
    pub fn output_colors(&self) -> &[Vec<char>] {
        &self.output_colors
    }

    /// Squares where symbols may be stored: open glyphs that are not I/O.
    #[must_use]
    pub fn traversable(&self) -> Matrix<bool> {
        Matrix::from_fn(self.dimensions(), |cell| {
            self.grid.get(cell) == Some(&' ')
                && !self.inputs.contains(&cell)
                && !self.outputs.contains(&cell)
        })
    }

    /// Terrain seen by the editor for this level.
    #[must_use]
    pub fn terrain(&self) -> Terrain {
        Terrain::new(self.traversable(), self.inputs.clone(), self.outputs.clone())
    }
}

fn parse_header(line: &str) -> Result<[u32; 5], LevelError> {
    let invalid = || LevelError::InvalidHeader {
        line: line.to_owned(),
    };
    let values = line
        .split_whitespace()
        .map(str::parse::<u32>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;
    values.try_into().map_err(|_| invalid())
}

fn read_locations<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    port: &'static str,
    count: u32,
    dimensions: Dimensions,
) -> Result<Vec<CellCoord>, LevelError> {
    (0..count as usize)
        .map(|index| {
            let mut coordinate = || {
                tokens
                    .next()
                    .and_then(|token| token.parse::<u32>().ok())
                    .ok_or(LevelError::InvalidLocation { port, index })
            };
            let row = coordinate()?;
            let column = coordinate()?;
            let cell = CellCoord::new(row, column);
            if dimensions.contains(cell) {
                Ok(cell)
            } else {
                Err(LevelError::LocationOutOfRange { port, index, cell })
            }
        })
        .collect()
}

fn parse_bits(token: &str) -> Option<Vec<Vec<bool>>> {
    token
        .split(TEST_CASE_SEPARATOR)
        .map(|case| {
            case.chars()
                .map(|bit| match bit {
                    '0' => Some(false),
                    '1' => Some(true),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

fn parse_colors(token: &str) -> Option<Vec<Vec<char>>> {
    token
        .split(TEST_CASE_SEPARATOR)
        .map(|case| {
            case.chars()
                .map(|color| COLOR_CODES.contains(color).then_some(color))
                .collect()
        })
        .collect()
}
