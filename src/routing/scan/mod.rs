//! The scanning passes which fill a [RoutingTable] from a [TraceService].
//!
//! A [RoutingContext] carries everything one pass needs - the trace
//! service, the table of the actor size being routed, the models to ignore
//! and the settings - so no state is held between passes. The floor pass
//! ([RoutingContext::scan_floor_ceiling]) must complete for a column and
//! its neighbours before the connection pass
//! ([RoutingContext::update_connection_column]) reads them
//!

pub mod cell_scan;
pub mod column;
pub mod extents;
pub mod microstep;
pub mod opening;
pub mod passes;
pub mod place;

use crate::prelude::*;
use bevy::prelude::*;

/// Everything a routing pass over one actor size reads and writes
pub struct RoutingContext<'a> {
	/// Collision queries
	trace: &'a dyn TraceService,
	/// Table being written
	table: &'a mut RoutingTable,
	/// Size of the actor being routed
	actor_size: ActorSize,
	/// Inline models every trace ignores
	exclude: &'a ExcludeList,
	/// Behaviour switches
	settings: &'a RoutingSettings,
	/// Columns this context may write beyond the column being updated
	write_bounds: GridBox,
}

impl<'a> RoutingContext<'a> {
	/// Create a new instance of [RoutingContext] which may write anywhere
	/// within the table
	pub fn new(
		trace: &'a dyn TraceService,
		table: &'a mut RoutingTable,
		actor_size: ActorSize,
		exclude: &'a ExcludeList,
		settings: &'a RoutingSettings,
	) -> Self {
		let write_bounds = GridBox::full(table.dimensions());
		RoutingContext {
			trace,
			table,
			actor_size,
			exclude,
			settings,
			write_bounds,
		}
	}
	/// Restrict writes made on behalf of neighbouring columns to `bounds`
	pub fn with_write_bounds(mut self, bounds: GridBox) -> Self {
		self.write_bounds = bounds;
		self
	}
	/// Get the table being written
	pub fn table(&self) -> &RoutingTable {
		&*self.table
	}
	/// Size of the actor being routed
	pub fn actor_size(&self) -> ActorSize {
		self.actor_size
	}
	/// Shape of the grid being routed
	fn dimensions(&self) -> GridDimensions {
		*self.table.dimensions()
	}
	/// Sweep `extents` from `start` to `end` stopping only at impassable
	/// surfaces
	fn passage_trace(&self, start: Vec3, end: Vec3, extents: &TraceBox) -> TraceResult {
		self.trace
			.trace(start, end, extents, TraceMode::Passage, self.exclude)
	}
	/// Whether `extents` placed at `origin` overlaps an impassable surface
	fn is_obstructed(&self, origin: Vec3, extents: &TraceBox) -> bool {
		self.passage_trace(origin, origin, extents).is_obstructed()
	}
	/// Flat box as wide as the actor
	fn actor_box(&self) -> TraceBox {
		TraceBox::flat(self.actor_size.half_width())
	}
}
