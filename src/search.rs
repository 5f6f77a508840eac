use std::fmt::Debug;
use std::marker::PhantomData;

use derive_more::Display;
use nonmax::NonMaxU32;
use thiserror::Error;

use crate::cost;
use crate::cost::Cost;
use crate::cost::EDGE_COST;
use crate::cost::UNREACHED;
use crate::grid::Coord;
use crate::grid::CoordIntrinsic;
use crate::grid::Grid;
use crate::grid::GridError;
use crate::heuristic::Heuristic;
use crate::heuristic::Manhattan;

/// A reference to a [`Node`] in a [`SearchState`].
///
/// It's the row-major index of the node's cell, kept non-max so
/// `Option<NodeId>` stays as wide as a `u32`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(NonMaxU32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0.get() as usize
    }
}

/// Which list a [`Node`] is in.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum NodeList {
    /// Not discovered yet.
    Unseen,
    /// Discovered, not expanded yet.
    Open,
    /// Expanded. Never re-opened.
    Closed,
}

#[derive(Clone, Debug)]
pub struct Node {
    coord: Coord,
    g: Cost,
    h: Option<Cost>,
    predecessor: Option<NodeId>,
    wall: bool,
    list: NodeList,
}

impl Node {
    fn new(coord: Coord, wall: bool) -> Self {
        Self {
            coord,
            g: UNREACHED,
            h: None,
            predecessor: None,
            wall,
            list: NodeList::Unseen,
        }
    }

    /// Gives this Node a (better) path through `predecessor`.
    fn reach(&mut self, predecessor: NodeId, g: Cost, h: Cost) {
        debug_assert!(g < self.g);
        self.predecessor = Some(predecessor);
        self.g = g;
        self.h = Some(h);
    }

    #[inline(always)]
    pub fn coord(&self) -> Coord {
        self.coord
    }
    /// Best known cost from the start, if the node was reached.
    #[inline(always)]
    pub fn g(&self) -> Option<Cost> {
        cost::valid(self.g).then_some(self.g)
    }
    /// Heuristic estimate, computed when the node is discovered.
    #[inline(always)]
    pub fn h(&self) -> Option<Cost> {
        self.h
    }
    #[inline(always)]
    pub fn f(&self) -> Option<Cost> {
        Some(self.g()?.saturating_add(self.h?))
    }
    #[inline(always)]
    pub fn predecessor(&self) -> Option<NodeId> {
        self.predecessor
    }
    #[inline(always)]
    pub fn is_wall(&self) -> bool {
        self.wall
    }
    #[inline(always)]
    pub fn list(&self) -> NodeList {
        self.list
    }

    #[inline(always)]
    fn rank(&self) -> Cost {
        self.f().unwrap_or(UNREACHED)
    }
}

/// What [`SearchState::relax`] did with an edge.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum RelaxOutcome {
    /// The neighbour is a wall or already closed.
    Skipped,
    /// The neighbour was discovered and opened.
    Adopted,
    /// The open neighbour got a cheaper path.
    Improved,
    /// The open neighbour already had a path at least as cheap.
    NoChange,
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum EndpointProblem {
    #[display("the start is outside the grid")]
    StartOutOfBounds,
    #[display("the goal is outside the grid")]
    GoalOutOfBounds,
    #[display("the start is a wall")]
    StartIsWall,
    #[display("the goal is a wall")]
    GoalIsWall,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("Invalid endpoints {start} -> {goal}: {problem}")]
    InvalidEndpoints {
        start: Coord,
        goal: Coord,
        problem: EndpointProblem,
    },
    #[error("The open set is empty")]
    OpenSetEmpty,
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[inline(always)]
fn node_id(rows: CoordIntrinsic, columns: CoordIntrinsic, c: Coord) -> Result<NodeId, GridError> {
    if c.row >= rows || c.column >= columns {
        return Err(GridError::InvalidCoordinate {
            coord: c,
            rows,
            columns,
        });
    }
    let index = c.row as usize * columns as usize + c.column as usize;
    u32::try_from(index)
        .ok()
        .and_then(NonMaxU32::new)
        .map(NodeId)
        .ok_or(GridError::TooLarge {
            rows: rows as usize,
            columns: columns as usize,
        })
}

/// A* bookkeeping for a single search.
///
/// Nodes live in a flat arena indexed by cell, so predecessors are plain
/// [`NodeId`]s and the predecessor links form a forest rooted at the start.
pub struct SearchState<H = Manhattan>
where
    H: Heuristic,
{
    /// One node per cell, row-major.
    nodes: Vec<Node>,
    /// The frontier in discovery order.
    ///
    /// The order is what breaks ties between equal f-values, the node
    /// discovered first wins.
    open: Vec<NodeId>,
    /// Expanded nodes in expansion order.
    closed: Vec<NodeId>,

    start: NodeId,
    goal: NodeId,
    rows: CoordIntrinsic,
    columns: CoordIntrinsic,

    _phantom_heuristic: PhantomData<H>,
}

impl<H> SearchState<H>
where
    H: Heuristic,
{
    /// Creates one node per cell and opens the start.
    pub fn initialize(grid: &Grid, start: Coord, goal: Coord) -> Result<Self, SearchError> {
        let problem = if !grid.contains(start) {
            Some(EndpointProblem::StartOutOfBounds)
        } else if !grid.contains(goal) {
            Some(EndpointProblem::GoalOutOfBounds)
        } else if grid.is_wall(start)? {
            Some(EndpointProblem::StartIsWall)
        } else if grid.is_wall(goal)? {
            Some(EndpointProblem::GoalIsWall)
        } else {
            None
        };
        if let Some(problem) = problem {
            return Err(SearchError::InvalidEndpoints {
                start,
                goal,
                problem,
            });
        }

        let (rows, columns) = grid.dimensions();
        let start_id = node_id(rows, columns, start)?;
        let goal_id = node_id(rows, columns, goal)?;

        let mut state = Self {
            nodes: grid
                .iter()
                .map(|(c, cell)| Node::new(c, cell.is_wall()))
                .collect(),
            open: Vec::with_capacity(grid.cell_count().min(2048)),
            closed: Vec::with_capacity(grid.cell_count().min(2048)),
            start: start_id,
            goal: goal_id,
            rows,
            columns,
            _phantom_heuristic: PhantomData,
        };

        let s = &mut state.nodes[start_id.index()];
        s.g = 0;
        s.h = Some(H::h(&start, &goal));
        s.list = NodeList::Open;
        state.open.push(start_id);

        log::debug!(
            "Initialized search {start} -> {goal} on a {rows}x{columns} grid ({} walls)",
            state.nodes.iter().filter(|n| n.wall).count()
        );
        state.verify();
        Ok(state)
    }

    /// The open node with the lowest f-value, the earliest discovered one on
    /// ties.
    ///
    /// An empty open set means there's no path left to explore.
    pub fn pick_best(&self) -> Result<NodeId, SearchError> {
        self.open
            .iter()
            .copied()
            .min_by_key(|&id| self[id].rank())
            .ok_or(SearchError::OpenSetEmpty)
    }

    /// Moves an open node to the closed set.
    pub fn close(&mut self, id: NodeId) {
        debug_assert_eq!(self[id].list, NodeList::Open, "Closing a non-open node");
        if self[id].list == NodeList::Closed {
            return;
        }

        if let Some(i) = self.open.iter().position(|&o| o == id) {
            self.open.remove(i);
        }
        self.nodes[id.index()].list = NodeList::Closed;
        self.closed.push(id);
    }

    /// Relaxes the unit-cost edge `current -> neighbour`.
    pub fn relax(&mut self, current: NodeId, neighbour: NodeId) -> RelaxOutcome {
        debug_assert_ne!(current, neighbour);
        let g = self[current].g;
        debug_assert!(cost::valid(g), "Relaxing from an unreached node");

        let n = &self[neighbour];
        if n.wall || n.list == NodeList::Closed {
            return RelaxOutcome::Skipped;
        }

        let new_g = g.saturating_add(EDGE_COST);
        let (list, old_g, coord) = (n.list, n.g, n.coord);
        let goal = self[self.goal].coord;

        match list {
            NodeList::Unseen => {
                let n = &mut self.nodes[neighbour.index()];
                n.reach(current, new_g, H::h(&coord, &goal));
                n.list = NodeList::Open;
                self.open.push(neighbour);
                RelaxOutcome::Adopted
            }
            NodeList::Open if new_g < old_g => {
                self.nodes[neighbour.index()].reach(current, new_g, H::h(&coord, &goal));
                RelaxOutcome::Improved
            }
            _ => RelaxOutcome::NoChange,
        }
    }

    /// The node of a cell.
    pub fn id_of(&self, c: Coord) -> Result<NodeId, GridError> {
        node_id(self.rows, self.columns, c)
    }
    pub fn node_at(&self, c: Coord) -> Result<&Node, GridError> {
        Ok(&self[self.id_of(c)?])
    }

    #[inline(always)]
    pub fn start(&self) -> NodeId {
        self.start
    }
    #[inline(always)]
    pub fn goal(&self) -> NodeId {
        self.goal
    }

    #[inline(always)]
    pub fn is_open_empty(&self) -> bool {
        self.open.is_empty()
    }
    pub fn open_len(&self) -> usize {
        self.open.len()
    }
    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }
    /// Open nodes in discovery order.
    pub fn open(&self) -> impl Iterator<Item = &Node> + '_ {
        self.open.iter().map(|&id| &self[id])
    }
    /// Closed nodes in expansion order.
    pub fn closed(&self) -> impl Iterator<Item = &Node> + '_ {
        self.closed.iter().map(|&id| &self[id])
    }
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Checks the open and closed lists agree with the node flags.
    #[inline(always)]
    pub(crate) fn verify(&self) {
        #[cfg(feature = "verify")]
        {
            for &id in &self.open {
                assert_eq!(self[id].list, NodeList::Open, "{:?} in the open list", self[id]);
            }
            for &id in &self.closed {
                assert_eq!(self[id].list, NodeList::Closed, "{:?} in the closed list", self[id]);
            }
            let open = self.nodes.iter().filter(|n| n.list == NodeList::Open).count();
            let closed = self.nodes.iter().filter(|n| n.list == NodeList::Closed).count();
            assert_eq!(open, self.open.len(), "Open list has duplicates");
            assert_eq!(closed, self.closed.len(), "Closed list has duplicates");
        }
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use std::mem::size_of;
        use thousands::Separable;

        writeln!(out, "SearchState Stats:")?;
        let s = size_of::<Node>();
        let l = self.nodes.len();
        writeln!(
            out,
            "  - |Nodes|:  {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;

        let s = size_of::<NodeId>();
        let l = self.open.len();
        writeln!(
            out,
            "  - |Open|:   {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        let l = self.closed.len();
        writeln!(
            out,
            "  - |Closed|: {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;

        Ok(())
    }
}

impl<H> std::ops::Index<NodeId> for SearchState<H>
where
    H: Heuristic,
{
    type Output = Node;

    #[inline(always)]
    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}

impl<H> std::fmt::Debug for SearchState<H>
where
    H: Heuristic,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "SearchState{{({} nodes, {} open, {} closed)}}",
            self.nodes.len(),
            self.open.len(),
            self.closed.len()
        )
    }
}
