//! `use bevy_grid_routing_plugin::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::routing::{
	grid::*,
	scan::{extents::*, microstep::*, opening::*, place::*, *},
	table::{stepup::*, *},
	trace::{brush_world::*, *},
	utilities::*,
};

#[doc(hidden)]
pub use crate::{
	bundle::*,
	plugin::{reroute_layer::*, *},
};
