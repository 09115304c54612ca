//! `prodplan` command-line front end.
//!
//! Loads a catalog seed file, runs the greedy planner over it and prints the
//! plan. Nothing here contains planning logic; it only wires the catalog,
//! planner and observability crates together.

pub mod cli;
pub mod commands;
pub mod render;
