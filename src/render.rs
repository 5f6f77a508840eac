//! Terminal frames of a running search.
//!
//! The renderer only reads [`Snapshot`]s, it never touches the search.

use std::fmt::Write as _;

use owo_colors::OwoColorize;

use crate::algorithms::astar::SearchStatus;
use crate::algorithms::astar::Snapshot;
use crate::grid::Grid;

/// Largest number of rows and columns drawn, the rest is clipped.
pub const MAX_RENDERED_SIDE: usize = 120;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const BLOCK: &str = "██";

/// What a cell shows, later variants drawn over earlier ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CellView {
    Free,
    Wall,
    Closed,
    Open,
    Path,
    Start,
    Goal,
}

impl CellView {
    pub fn glyph(&self) -> char {
        match self {
            CellView::Free => '.',
            CellView::Wall => '#',
            CellView::Closed => 'x',
            CellView::Open => 'o',
            CellView::Path => '*',
            CellView::Start => 'S',
            CellView::Goal => 'G',
        }
    }

    fn write_block(&self, out: &mut String) -> std::fmt::Result {
        match self {
            CellView::Free => write!(out, "{}", BLOCK.white()),
            CellView::Wall => write!(out, "{}", BLOCK.black()),
            CellView::Closed => write!(out, "{}", BLOCK.red()),
            CellView::Open => write!(out, "{}", BLOCK.green()),
            CellView::Path => write!(out, "{}", BLOCK.blue()),
            CellView::Start => write!(out, "{}", BLOCK.yellow()),
            CellView::Goal => write!(out, "{}", BLOCK.bright_green()),
        }
    }
}

/// Layers a snapshot over its grid, row-major.
pub fn classify(snapshot: &Snapshot) -> Vec<CellView> {
    let grid = snapshot.grid;
    let mut views: Vec<CellView> = grid
        .iter()
        .map(|(_, cell)| {
            if cell.is_wall() {
                CellView::Wall
            } else {
                CellView::Free
            }
        })
        .collect();

    let mut paint = |c, view| {
        if let Ok(i) = grid.index_of(c) {
            views[i] = view;
        }
    };
    for &c in &snapshot.closed {
        paint(c, CellView::Closed);
    }
    for e in &snapshot.open {
        paint(e.coord, CellView::Open);
    }
    for &c in snapshot.path.coords() {
        paint(c, CellView::Path);
    }
    paint(grid.start(), CellView::Start);
    paint(grid.goal(), CellView::Goal);

    views
}

#[derive(Copy, Clone, Debug)]
pub struct TerminalRenderer {
    colored: bool,
}

impl TerminalRenderer {
    /// Two coloured blocks per cell.
    pub fn colored() -> Self {
        Self { colored: true }
    }
    /// One glyph per cell, see [`CellView::glyph`].
    pub fn plain() -> Self {
        Self { colored: false }
    }
    /// Coloured only when `out` keeps escape codes, so redirected frames
    /// fall back to glyphs.
    ///
    /// Warns when `grid` won't fit.
    pub fn for_stream<S>(out: &anstream::AutoStream<S>, grid: &Grid) -> Self
    where
        S: anstream::stream::RawStream,
    {
        if Self::clips(grid) {
            log::warn!(
                "Only the first {MAX_RENDERED_SIDE} rows and columns of {:?} will be drawn",
                grid
            );
        }
        Self {
            colored: out.current_choice() != anstream::ColorChoice::Never,
        }
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    /// Whether `grid` is too large to draw in full.
    pub fn clips(grid: &Grid) -> bool {
        grid.rows() as usize > MAX_RENDERED_SIDE || grid.columns() as usize > MAX_RENDERED_SIDE
    }

    pub fn frame(&self, snapshot: &Snapshot) -> String {
        let grid = snapshot.grid;
        let views = classify(snapshot);
        let mut out = String::with_capacity(views.len() * if self.colored { 24 } else { 1 });

        for line in views
            .chunks(grid.columns() as usize)
            .take(MAX_RENDERED_SIDE)
        {
            for view in line.iter().take(MAX_RENDERED_SIDE) {
                if self.colored {
                    // Writing into a String can't fail
                    let _ = view.write_block(&mut out);
                } else {
                    out.push(view.glyph());
                }
            }
            out.push('\n');
        }

        let status = snapshot.status.to_string();
        let status = match (self.colored, snapshot.status) {
            (false, _) => status,
            (true, SearchStatus::Running) => status.yellow().to_string(),
            (true, SearchStatus::Succeeded) => status.green().to_string(),
            (true, SearchStatus::Failed) => status.red().to_string(),
        };
        let _ = writeln!(
            out,
            "{status} | step {} | open {} | closed {} | path {}",
            snapshot.steps,
            snapshot.open.len(),
            snapshot.closed.len(),
            snapshot.path.len()
        );

        out
    }

    /// Clears the screen and draws a frame.
    pub fn draw<W: std::io::Write>(&self, out: &mut W, snapshot: &Snapshot) -> std::io::Result<()> {
        if self.colored {
            write!(out, "{CLEAR_SCREEN}")?;
        }
        write!(out, "{}", self.frame(snapshot))?;
        out.flush()
    }
}
