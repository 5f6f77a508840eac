use rustc_hash::FxHashSet;

use crate::cost::Cost;
use crate::grid::Coord;
use crate::grid::Grid;
use crate::heuristic::Heuristic;
use crate::search::NodeId;
use crate::search::SearchState;

const MAX_ELEMENTS_DISPLAYED: usize = 20;

/// A route through the grid, start first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    coords: Vec<Coord>,
}

impl Path {
    #[inline(always)]
    pub fn empty() -> Self {
        Self { coords: vec![] }
    }

    /// Follows predecessor links from `node` back to a node without one.
    ///
    /// That's the start once the search reached `node`, so this is safe to
    /// call on any frontier node to get the best route so far.
    #[must_use]
    pub fn reconstruct<H: Heuristic>(state: &SearchState<H>, node: NodeId) -> Self {
        let mut coords = vec![state[node].coord()];
        let mut node_index = node;

        while let Some(predecessor) = state[node_index].predecessor() {
            debug_assert!(node_index != predecessor);
            debug_assert!(
                coords.len() <= state.nodes().len(),
                "Predecessor links form a cycle"
            );
            coords.push(state[predecessor].coord());
            node_index = predecessor;
        }

        coords.reverse();
        Self { coords }
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }
    pub fn start(&self) -> Option<Coord> {
        self.coords.first().copied()
    }
    pub fn end(&self) -> Option<Coord> {
        self.coords.last().copied()
    }

    /// Number of cells in the path.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.coords.len()
    }
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Number of moves, each of unit cost.
    pub fn cost(&self) -> Cost {
        self.coords.len().saturating_sub(1) as Cost
    }

    pub fn contains(&self, c: &Coord) -> bool {
        self.coords.contains(c)
    }

    /// Every consecutive pair of cells is 4-adjacent.
    pub fn is_contiguous(&self) -> bool {
        self.coords.windows(2).all(|w| w[0].is_adjacent(&w[1]))
    }

    /// No cell is visited twice.
    pub fn is_simple(&self) -> bool {
        let mut seen = FxHashSet::<Coord>::default();
        self.coords.iter().all(|c| seen.insert(*c))
    }

    /// A simple, contiguous path over free cells of `grid`.
    ///
    /// Empty paths are fine.
    pub fn valid_in(&self, grid: &Grid) -> bool {
        self.is_simple()
            && self.is_contiguous()
            && self
                .coords
                .iter()
                .all(|c| grid.is_wall(*c).is_ok_and(|wall| !wall))
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => {
                write!(f, "Path({}, {}:", self.cost(), start)?;
                for c in self.coords.iter().take(MAX_ELEMENTS_DISPLAYED) {
                    write!(f, "{c}")?;
                }
                if self.coords.len() > MAX_ELEMENTS_DISPLAYED {
                    write!(f, "...")?;
                }
                write!(f, ":{})", end)
            }
            _ => write!(f, "Path()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::heuristic::Manhattan;
    use crate::search::RelaxOutcome;

    #[test]
    fn reconstruct_from_start() {
        let grid = Grid::open(2, 2).unwrap();
        let s = SearchState::<Manhattan>::initialize(&grid, grid.start(), grid.goal()).unwrap();

        let path = Path::reconstruct(&s, s.start());
        assert_eq!(path.coords(), &[Coord::new(0, 0)]);
        assert_eq!(path.cost(), 0);
        assert!(path.valid_in(&grid));
    }

    #[test]
    fn reconstruct_partial_route() {
        let grid = Grid::open(3, 3).unwrap();
        let mut s = SearchState::<Manhattan>::initialize(&grid, grid.start(), grid.goal()).unwrap();
        let start = s.start();
        let down = s.id_of(Coord::new(1, 0)).unwrap();
        let corner = s.id_of(Coord::new(2, 0)).unwrap();

        s.close(start);
        assert_eq!(s.relax(start, down), RelaxOutcome::Adopted);
        s.close(down);
        assert_eq!(s.relax(down, corner), RelaxOutcome::Adopted);

        let path = Path::reconstruct(&s, corner);
        assert_eq!(
            path.coords(),
            &[Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 0)]
        );
        assert_eq!(path.start(), Some(Coord::new(0, 0)));
        assert_eq!(path.end(), Some(Coord::new(2, 0)));
        assert_eq!(path.cost(), 2);
        assert!(path.contains(&Coord::new(1, 0)));
    }

    #[test]
    fn reconstruct_undiscovered_node() {
        let grid = Grid::open(3, 3).unwrap();
        let s = SearchState::<Manhattan>::initialize(&grid, grid.start(), grid.goal()).unwrap();

        // No predecessor was ever assigned, the walk stops right away
        let path = Path::reconstruct(&s, s.goal());
        assert_eq!(path.coords(), &[Coord::new(2, 2)]);
    }

    #[test]
    fn validity_checks() {
        let grid = Grid::try_from(".#\n..\n").unwrap();

        let good = Path {
            coords: vec![Coord::new(0, 0), Coord::new(1, 0), Coord::new(1, 1)],
        };
        assert!(good.valid_in(&grid));

        let jump = Path {
            coords: vec![Coord::new(0, 0), Coord::new(1, 1)],
        };
        assert!(!jump.is_contiguous());
        assert!(!jump.valid_in(&grid));

        let back_and_forth = Path {
            coords: vec![Coord::new(0, 0), Coord::new(1, 0), Coord::new(0, 0)],
        };
        assert!(back_and_forth.is_contiguous());
        assert!(!back_and_forth.is_simple());

        let through_wall = Path {
            coords: vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(1, 1)],
        };
        assert!(!through_wall.valid_in(&grid));

        assert!(Path::empty().valid_in(&grid));
        assert_eq!(Path::empty().cost(), 0);
    }

    #[test]
    fn display() {
        let path = Path {
            coords: vec![Coord::new(0, 0), Coord::new(0, 1)],
        };
        assert_eq!(format!("{path}"), "Path(1, (0,0):(0,0)(0,1):(0,1))");
        assert_eq!(format!("{}", Path::empty()), "Path()");
    }
}
