//! Search client for single-agent push/pull box puzzles: an agent on a
//! walled grid pushes and pulls lettered boxes onto matching lettered
//! goal cells. The solver is a state-space search with pluggable
//! strategies (breadth-first, depth-first, best-first over an evaluation
//! function) and an inadmissible goal/box matching heuristic, optionally
//! refined with wall-aware flood-fill distances.

// Opt in to warnings about new 2018 idioms
#![warn(rust_2018_idioms)]
// Additional warnings that are allow by default (`rustc -W help`)
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unused)]

pub mod config;
pub mod data;
pub mod grid;
pub mod heuristic;
pub mod level;
pub mod moves;
pub mod parser;
pub mod protocol;
pub mod search;
pub mod state;
pub mod strategy;
pub mod vec2d;
