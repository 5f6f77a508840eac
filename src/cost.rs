//! Path costs on a unit-cost grid.

/// Cost of a path, counted in edges.
///
/// Every move is orthogonal and costs [`EDGE_COST`], so integers represent
/// costs exactly.
pub type Cost = u32;

/// The cost of moving between two 4-adjacent cells.
pub const EDGE_COST: Cost = 1;

/// The `g` of a node that was never reached.
pub const UNREACHED: Cost = Cost::MAX;

/// Whether a `g` value belongs to a reached node.
#[inline(always)]
#[must_use]
pub fn valid(c: Cost) -> bool {
    c != UNREACHED
}
