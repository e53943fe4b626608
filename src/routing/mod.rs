//! Everything needed to precompute the routing data of a grid: the grid
//! itself, the collision queries the scanning passes make against the
//! world, the passes and the tables they fill
//!

pub mod grid;
pub mod scan;
pub mod table;
pub mod trace;
pub mod utilities;
