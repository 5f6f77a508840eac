use shadow_rs::shadow;

shadow!(build);

// Board
// -----
pub mod cost;
pub mod grid;
pub mod maze;

// Search state and path reconstruction
// ------------------------------------
pub mod heuristic;
pub mod path;
pub mod search;

// Algorithms
// ----------
pub mod algorithms;

// Host
// ----
pub mod config;
pub mod render;
