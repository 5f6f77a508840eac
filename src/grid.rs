use derive_more::Display;
use smallvec::SmallVec;
use thiserror::Error;

const MAX_ELEMENTS_DISPLAYED: usize = 80;

/// Largest number of cells a board may hold so every cell gets a node id.
pub const MAX_CELLS: usize = u32::MAX as usize;

pub type CoordIntrinsic = u32;

/// A cell coordinate, `(row, column)`, 0-indexed.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("({row},{column})")]
pub struct Coord {
    pub row: CoordIntrinsic,
    pub column: CoordIntrinsic,
}

impl Coord {
    #[inline(always)]
    pub const fn new(row: CoordIntrinsic, column: CoordIntrinsic) -> Self {
        Self { row, column }
    }

    #[inline(always)]
    #[must_use]
    pub fn manhattan(&self, other: &Coord) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }

    /// Whether `other` is directly above, below, left or right of `self`.
    #[inline(always)]
    #[must_use]
    pub fn is_adjacent(&self, other: &Coord) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(CoordIntrinsic, CoordIntrinsic)> for Coord {
    fn from((row, column): (CoordIntrinsic, CoordIntrinsic)) -> Self {
        Self::new(row, column)
    }
}

#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq)]
pub enum Cell {
    #[default]
    #[display("░")]
    Empty,
    #[display("█")]
    Wall,
}

impl Cell {
    #[inline(always)]
    pub fn is_wall(&self) -> bool {
        *self == Cell::Wall
    }
}

impl From<bool> for Cell {
    fn from(wall: bool) -> Self {
        if wall { Cell::Wall } else { Cell::Empty }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CellParseError {
    #[error("Invalid character '{0}' found.")]
    InvalidCharacter(char),
}

impl std::convert::TryFrom<char> for Cell {
    type Error = CellParseError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            ' ' | '.' | '░' => Ok(Cell::Empty),
            '#' | '█' => Ok(Cell::Wall),
            ch => Err(CellParseError::InvalidCharacter(ch)),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Coordinate {coord} is outside the {rows}x{columns} grid")]
    InvalidCoordinate {
        coord: Coord,
        rows: CoordIntrinsic,
        columns: CoordIntrinsic,
    },
    #[error("Wall matrix has {actual} rows, the board has {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Row {row} has {actual} columns, the board has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("A grid needs at least one row and one column")]
    Empty,
    #[error("A {rows}x{columns} grid does not fit in {MAX_CELLS} cells")]
    TooLarge { rows: usize, columns: usize },
}

/// Static board topology.
///
/// Cells are stored row-major and never change after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    rows: CoordIntrinsic,
    columns: CoordIntrinsic,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid from a `rows`x`columns` wall matrix.
    pub fn new(
        rows: CoordIntrinsic,
        columns: CoordIntrinsic,
        walls: &[Vec<bool>],
    ) -> Result<Self, GridError> {
        if walls.len() != rows as usize {
            return Err(GridError::DimensionMismatch {
                expected: rows as usize,
                actual: walls.len(),
            });
        }
        for (row, line) in walls.iter().enumerate() {
            if line.len() != columns as usize {
                return Err(GridError::RaggedRow {
                    row,
                    expected: columns as usize,
                    actual: line.len(),
                });
            }
        }

        let cells = walls.iter().flatten().map(|&w| Cell::from(w)).collect();
        Self::from_cells(rows as usize, columns as usize, cells)
    }

    /// A grid without walls.
    pub fn open(rows: CoordIntrinsic, columns: CoordIntrinsic) -> Result<Self, GridError> {
        let len = (rows as usize).saturating_mul(columns as usize);
        if len > MAX_CELLS {
            return Err(GridError::TooLarge {
                rows: rows as usize,
                columns: columns as usize,
            });
        }
        Self::from_cells(rows as usize, columns as usize, vec![Cell::Empty; len])
    }

    /// Builds a grid from row-major cells.
    pub(crate) fn from_cells(
        rows: usize,
        columns: usize,
        cells: Vec<Cell>,
    ) -> Result<Self, GridError> {
        if rows == 0 || columns == 0 {
            return Err(GridError::Empty);
        }
        let len = rows.checked_mul(columns);
        if !len.is_some_and(|l| l <= MAX_CELLS) {
            return Err(GridError::TooLarge { rows, columns });
        }
        debug_assert_eq!(Some(cells.len()), len);

        Ok(Self {
            rows: rows as CoordIntrinsic,
            columns: columns as CoordIntrinsic,
            cells,
        })
    }

    #[inline(always)]
    pub fn rows(&self) -> CoordIntrinsic {
        self.rows
    }
    #[inline(always)]
    pub fn columns(&self) -> CoordIntrinsic {
        self.columns
    }
    /// `(rows, columns)`
    pub fn dimensions(&self) -> (CoordIntrinsic, CoordIntrinsic) {
        (self.rows, self.columns)
    }
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The configured start, the top-left corner.
    pub fn start(&self) -> Coord {
        Coord::new(0, 0)
    }
    /// The configured goal, the bottom-right corner.
    pub fn goal(&self) -> Coord {
        Coord::new(self.rows - 1, self.columns - 1)
    }

    #[inline(always)]
    pub fn contains(&self, c: Coord) -> bool {
        c.row < self.rows && c.column < self.columns
    }

    #[inline(always)]
    fn check(&self, c: Coord) -> Result<(), GridError> {
        if self.contains(c) {
            Ok(())
        } else {
            Err(GridError::InvalidCoordinate {
                coord: c,
                rows: self.rows,
                columns: self.columns,
            })
        }
    }

    /// Row-major index of a cell.
    #[inline(always)]
    pub fn index_of(&self, c: Coord) -> Result<usize, GridError> {
        self.check(c)?;
        Ok(c.row as usize * self.columns as usize + c.column as usize)
    }

    #[inline(always)]
    pub(crate) fn coord_of(&self, index: usize) -> Coord {
        debug_assert!(index < self.cells.len());
        let columns = self.columns as usize;
        Coord::new((index / columns) as CoordIntrinsic, (index % columns) as CoordIntrinsic)
    }

    pub fn cell(&self, c: Coord) -> Result<Cell, GridError> {
        Ok(self.cells[self.index_of(c)?])
    }

    pub fn is_wall(&self, c: Coord) -> Result<bool, GridError> {
        Ok(self.cell(c)?.is_wall())
    }

    /// The in-bounds cells directly below, above, right and left of `c`, in
    /// that order.
    ///
    /// Walls are included, callers decide whether they can be entered.
    pub fn neighbours(&self, c: Coord) -> Result<SmallVec<[Coord; 4]>, GridError> {
        self.check(c)?;

        let mut v = SmallVec::<[Coord; 4]>::new();
        if c.row + 1 < self.rows {
            v.push(Coord::new(c.row + 1, c.column));
        }
        if c.row > 0 {
            v.push(Coord::new(c.row - 1, c.column));
        }
        if c.column + 1 < self.columns {
            v.push(Coord::new(c.row, c.column + 1));
        }
        if c.column > 0 {
            v.push(Coord::new(c.row, c.column - 1));
        }
        Ok(v)
    }

    /// All cells with their coordinates, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (self.coord_of(i), *cell))
    }

    pub fn walls(&self) -> impl Iterator<Item = Coord> + '_ {
        self.iter()
            .filter(|(_, cell)| cell.is_wall())
            .map(|(c, _)| c)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Grid({}x{}):", self.rows, self.columns)?;
        for line in self
            .cells
            .chunks(self.columns as usize)
            .take(MAX_ELEMENTS_DISPLAYED)
        {
            for cell in line.iter().take(MAX_ELEMENTS_DISPLAYED) {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Grid{:?}", self.dimensions())
    }
}

#[derive(Debug, Error)]
pub enum GridParseError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Invalid cell {e} found at ({row},{column})")]
    InvalidCell {
        e: CellParseError,
        row: usize,
        column: usize,
    },
    #[error("Invalid layout: {0}")]
    Grid(#[from] GridError),
    #[error("I/O error when loading '{p}': {e}")]
    IOError {
        p: std::path::PathBuf,
        e: std::io::Error,
    },
    #[error("Image error when loading '{p}': {e}")]
    ImageError {
        p: std::path::PathBuf,
        e: image::ImageError,
    },
}

impl std::convert::TryFrom<&str> for Grid {
    type Error = GridParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let lines: Vec<&str> = s.lines().collect();

        if lines.is_empty() || lines[0].is_empty() {
            return Err(GridParseError::EmptyInput);
        }

        let mut walls = Vec::with_capacity(lines.len());
        for (row, line) in lines.iter().enumerate() {
            let mut cells = Vec::with_capacity(line.len());
            for (column, ch) in line.chars().enumerate() {
                let cell = Cell::try_from(ch)
                    .map_err(|e| GridParseError::InvalidCell { e, row, column })?;
                cells.push(cell.is_wall());
            }
            walls.push(cells);
        }

        let rows = walls.len();
        let columns = walls[0].len();
        if rows.saturating_mul(columns) > MAX_CELLS {
            return Err(GridError::TooLarge { rows, columns }.into());
        }
        Ok(Grid::new(
            rows as CoordIntrinsic,
            columns as CoordIntrinsic,
            &walls,
        )?)
    }
}

/// Loads a layout file.
///
/// `.txt` and `.maze` files use the text layout, anything else is decoded as
/// an image where black pixels are walls.
impl std::convert::TryFrom<&std::path::Path> for Grid {
    type Error = GridParseError;

    fn try_from(p: &std::path::Path) -> Result<Self, Self::Error> {
        use image::ImageReader;

        let is_text = p
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt") || e.eq_ignore_ascii_case("maze"));
        if is_text {
            let s = std::fs::read_to_string(p).map_err(|e| GridParseError::IOError {
                p: p.to_path_buf(),
                e,
            })?;
            return Grid::try_from(s.as_str());
        }

        let img = ImageReader::open(p)
            .map_err(|e| GridParseError::IOError {
                p: p.to_path_buf(),
                e,
            })?
            .decode()
            .map_err(|e| GridParseError::ImageError {
                p: p.to_path_buf(),
                e,
            })?
            .grayscale()
            .into_rgb8();

        let rows = img.height() as usize;
        let columns = img.width() as usize;
        if rows.saturating_mul(columns) > MAX_CELLS {
            return Err(GridError::TooLarge { rows, columns }.into());
        }
        let mut cells = Vec::with_capacity(rows * columns);
        for y in 0..img.height() {
            for x in 0..img.width() {
                cells.push(match img.get_pixel(x, y).0 {
                    [u8::MIN, u8::MIN, u8::MIN] => Cell::Wall,
                    _ => Cell::Empty,
                });
            }
        }

        Ok(Grid::from_cells(rows, columns, cells)?)
    }
}
