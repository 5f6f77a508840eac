use crate::cost::Cost;
use crate::grid::Coord;

/// An estimate of the remaining cost from a cell to the goal.
pub trait Heuristic: std::fmt::Debug {
    fn h(s: &Coord, goal: &Coord) -> Cost;
}

/// Manhattan distance.
///
/// Admissible and consistent for unit-cost 4-directional moves.
#[derive(Debug)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    #[inline(always)]
    fn h(s: &Coord, goal: &Coord) -> Cost {
        s.manhattan(goal)
    }
}

/// No estimate at all, which makes A* a uniform-cost search.
#[derive(Debug)]
pub struct Blind;

impl Heuristic for Blind {
    #[inline(always)]
    fn h(_s: &Coord, _goal: &Coord) -> Cost {
        0
    }
}
