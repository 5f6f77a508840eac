use derive_more::Display;

use crate::cost::Cost;
use crate::grid::Coord;
use crate::grid::Grid;
use crate::heuristic::Heuristic;
use crate::heuristic::Manhattan;
use crate::path::Path;
use crate::search::NodeId;
use crate::search::RelaxOutcome;
use crate::search::SearchError;
use crate::search::SearchState;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum SearchStatus {
    Running,
    Succeeded,
    Failed,
}

impl SearchStatus {
    #[inline(always)]
    pub fn is_terminal(&self) -> bool {
        *self != SearchStatus::Running
    }
}

/// What a single [`AStarSearch::step`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// `current` was expanded and the search goes on.
    Running { current: Coord },
    /// The goal was picked from the open set.
    Succeeded { goal: Coord },
    /// The open set ran out, there's no path.
    Failed,
}

impl StepResult {
    pub fn status(&self) -> SearchStatus {
        match self {
            StepResult::Running { .. } => SearchStatus::Running,
            StepResult::Succeeded { .. } => SearchStatus::Succeeded,
            StepResult::Failed => SearchStatus::Failed,
        }
    }
    #[inline(always)]
    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes picked from the open set, the goal included.
    pub steps: usize,
    /// Nodes closed and expanded.
    pub expansions: usize,
    pub adopted: usize,
    pub improved: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

impl SearchStats {
    fn record(&mut self, outcome: RelaxOutcome) {
        match outcome {
            RelaxOutcome::Adopted => self.adopted += 1,
            RelaxOutcome::Improved => self.improved += 1,
            RelaxOutcome::NoChange => self.unchanged += 1,
            RelaxOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// A frontier node as shown to observers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OpenEntry {
    pub coord: Coord,
    pub g: Cost,
    pub h: Cost,
    pub f: Cost,
}

/// Everything a renderer needs for one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    /// Frontier in discovery order.
    pub open: Vec<OpenEntry>,
    /// Visited cells in expansion order.
    pub closed: Vec<Coord>,
    /// Best route so far, start first.
    pub path: Path,
    pub current: Option<Coord>,
    pub status: SearchStatus,
    pub steps: usize,
}

/// Incremental A* between two cells of a [`Grid`].
///
/// Every [`AStarSearch::step`] performs exactly one expansion, so a driver
/// can render the search between calls and stop calling at any time.
pub struct AStarSearch<H = Manhattan>
where
    H: Heuristic,
{
    grid: Grid,
    state: SearchState<H>,
    status: SearchStatus,
    /// The node picked by the last step.
    current: Option<NodeId>,
    stats: SearchStats,
}

impl<H> AStarSearch<H>
where
    H: Heuristic,
{
    /// Searches from the grid's top-left corner to its bottom-right one.
    pub fn new(grid: Grid) -> Result<Self, SearchError> {
        let (start, goal) = (grid.start(), grid.goal());
        Self::with_endpoints(grid, start, goal)
    }

    pub fn with_endpoints(grid: Grid, start: Coord, goal: Coord) -> Result<Self, SearchError> {
        let state = SearchState::<H>::initialize(&grid, start, goal)?;
        Ok(Self {
            grid,
            state,
            status: SearchStatus::Running,
            current: None,
            stats: SearchStats::default(),
        })
    }

    /// Expands one node.
    ///
    /// Once the search succeeded or failed this is a no-op returning the same
    /// result.
    pub fn step(&mut self) -> Result<StepResult, SearchError> {
        match self.status {
            SearchStatus::Succeeded => return Ok(self.succeeded()),
            SearchStatus::Failed => return Ok(StepResult::Failed),
            SearchStatus::Running => {}
        }

        if self.state.is_open_empty() {
            log::info!(
                "No path after {} steps ({} nodes closed)",
                self.stats.steps,
                self.state.closed_len()
            );
            self.status = SearchStatus::Failed;
            self.current = None;
            return Ok(StepResult::Failed);
        }

        let current = self.state.pick_best()?;
        self.current = Some(current);
        self.stats.steps += 1;

        if current == self.state.goal() {
            self.status = SearchStatus::Succeeded;
            log::info!(
                "Path found after {} steps: {}",
                self.stats.steps,
                Path::reconstruct(&self.state, current)
            );
            return Ok(self.succeeded());
        }

        self.state.close(current);
        self.stats.expansions += 1;

        let coord = self.state[current].coord();
        log::trace!("Expanding {coord} (f={:?})", self.state[current].f());
        for neighbour in self.grid.neighbours(coord)? {
            let neighbour = self.state.id_of(neighbour)?;
            let outcome = self.state.relax(current, neighbour);
            self.stats.record(outcome);
        }
        self.state.verify();

        Ok(StepResult::Running { current: coord })
    }

    /// Steps until the search succeeds or fails.
    pub fn run(&mut self) -> Result<SearchStatus, SearchError> {
        while !self.step()?.is_terminal() {}
        Ok(self.status)
    }

    fn succeeded(&self) -> StepResult {
        StepResult::Succeeded {
            goal: self.state[self.state.goal()].coord(),
        }
    }

    #[inline(always)]
    pub fn status(&self) -> SearchStatus {
        self.status
    }
    /// The cell picked by the last step, none before the first step or after
    /// failing.
    pub fn current(&self) -> Option<Coord> {
        self.current.map(|id| self.state[id].coord())
    }
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
    pub fn state(&self) -> &SearchState<H> {
        &self.state
    }
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// The route to the current node, empty when there's none.
    pub fn current_path(&self) -> Path {
        match self.current {
            Some(current) => Path::reconstruct(&self.state, current),
            None => Path::empty(),
        }
    }

    /// The route to the goal, once found.
    pub fn solution(&self) -> Option<Path> {
        (self.status == SearchStatus::Succeeded)
            .then(|| Path::reconstruct(&self.state, self.state.goal()))
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: &self.grid,
            open: self
                .state
                .open()
                .filter_map(|n| {
                    Some(OpenEntry {
                        coord: n.coord(),
                        g: n.g()?,
                        h: n.h()?,
                        f: n.f()?,
                    })
                })
                .collect(),
            closed: self.state.closed().map(|n| n.coord()).collect(),
            path: self.current_path(),
            current: self.current(),
            status: self.status,
            steps: self.stats.steps,
        }
    }

    pub fn write_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use thousands::Separable;

        writeln!(out, "AStarSearch Stats ({}):", self.status)?;
        writeln!(
            out,
            "  - Steps:      {}",
            self.stats.steps.separate_with_commas()
        )?;
        writeln!(
            out,
            "  - Expansions: {}",
            self.stats.expansions.separate_with_commas()
        )?;
        writeln!(
            out,
            "  - Relaxed:    {} adopted, {} improved, {} unchanged, {} skipped",
            self.stats.adopted.separate_with_commas(),
            self.stats.improved.separate_with_commas(),
            self.stats.unchanged.separate_with_commas(),
            self.stats.skipped.separate_with_commas()
        )?;
        self.state.write_memory_stats(out)
    }
}

impl<H> std::fmt::Debug for AStarSearch<H>
where
    H: Heuristic,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("AStarSearch")
            .field("grid", &self.grid)
            .field("state", &self.state)
            .field("status", &self.status)
            .field("current", &self.current())
            .finish()
    }
}

/// Yields every step until (and including) the terminal one.
impl<H> Iterator for AStarSearch<H>
where
    H: Heuristic,
{
    type Item = Result<StepResult, SearchError>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.status.is_terminal() {
            return None;
        }
        Some(self.step())
    }
}
