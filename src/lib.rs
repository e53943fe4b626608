//! This is a plugin for Bevy game engine to precompute the routing tables
//! of a 3d grid: the floor and ceiling of every cell and how an actor can
//! move from each cell into its eight neighbours
//!

pub mod bundle;
pub mod plugin;
pub mod routing;

pub mod prelude;
