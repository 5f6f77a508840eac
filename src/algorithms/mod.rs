//! Implementation of search algorithms.
//!
//! These drive a [`crate::search::SearchState`] one expansion at a time so
//! the search can be observed while it runs.

pub mod astar;
