//! Logic for rebuilding the [RoutingTables] of a map and for rerouting the
//! parts of it where the geometry changed, such as a door swinging open or
//! a wall being destroyed
//!

use std::sync::Arc;

use crate::prelude::*;
use bevy::prelude::*;

/// The [TraceService] the routing systems query, it must be inserted as a
/// resource before any routing event is sent
#[derive(Resource, Clone)]
pub struct RoutingTraceService(Arc<dyn TraceService + Send + Sync>);

impl RoutingTraceService {
	/// Create a new instance of [RoutingTraceService]
	pub fn new<T: TraceService + Send + Sync + 'static>(trace: T) -> Self {
		RoutingTraceService(Arc::new(trace))
	}
	/// Get the trace service
	pub fn get(&self) -> &dyn TraceService {
		&*self.0
	}
}

/// Discard the routing tables of every map and build them from scratch
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct EventRebuildRouting;

/// Recalculate the routing of every map around the cells of a box whose
/// geometry changed
#[derive(Event, Debug, Clone, Copy)]
pub struct EventRerouteBox(GridBox);

impl EventRerouteBox {
	/// Create a new instance of [EventRerouteBox]
	#[cfg(not(tarpaulin_include))]
	pub fn new(region: GridBox) -> Self {
		EventRerouteBox(region)
	}
	/// Get the box of changed cells
	#[cfg(not(tarpaulin_include))]
	pub fn get(&self) -> GridBox {
		self.0
	}
}

/// Sent once the routing tables of a map have been written, carrying the box
/// of cells that was recalculated
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EventRoutingUpdated {
	/// Map entity whose tables changed
	map: Entity,
	/// Cells that were recalculated
	region: GridBox,
}

impl EventRoutingUpdated {
	/// Create a new instance of [EventRoutingUpdated]
	#[cfg(not(tarpaulin_include))]
	pub fn new(map: Entity, region: GridBox) -> Self {
		EventRoutingUpdated { map, region }
	}
	/// Get the map entity
	#[cfg(not(tarpaulin_include))]
	pub fn get_map(&self) -> Entity {
		self.map
	}
	/// Get the box of recalculated cells
	#[cfg(not(tarpaulin_include))]
	pub fn get_region(&self) -> GridBox {
		self.region
	}
}

/// Read [EventRebuildRouting] and build the tables of every map
#[cfg(not(tarpaulin_include))]
pub fn process_rebuild_requests(
	mut events: EventReader<EventRebuildRouting>,
	trace: Option<Res<RoutingTraceService>>,
	mut query: Query<(Entity, &mut RoutingTables, &RoutingSettings, &ExcludeList)>,
	mut event_updated: EventWriter<EventRoutingUpdated>,
) {
	// any number of requests within a frame collapse into one build
	if events.read().count() == 0 {
		return;
	}
	let Some(trace) = trace else {
		warn!("Rebuild of routing requested without a RoutingTraceService resource");
		return;
	};
	for (entity, mut tables, settings, exclude) in query.iter_mut() {
		let dimensions = *tables.dimensions();
		let region = tables
			.build(trace.get(), exclude, settings)
			.unwrap_or_else(|| GridBox::full(&dimensions));
		event_updated.write(EventRoutingUpdated::new(entity, region));
	}
}

/// Read [EventRerouteBox] and reroute every map around the union of the
/// boxes sent this frame
#[cfg(not(tarpaulin_include))]
pub fn process_reroute_requests(
	mut events: EventReader<EventRerouteBox>,
	trace: Option<Res<RoutingTraceService>>,
	mut query: Query<(Entity, &mut RoutingTables, &RoutingSettings, &ExcludeList)>,
	mut event_updated: EventWriter<EventRoutingUpdated>,
) {
	// coalesce boxes to avoid scanning overlapping cells more than once
	let Some(region) = events
		.read()
		.map(|event| event.get())
		.reduce(|acc, region| acc.union(&region))
	else {
		return;
	};
	let Some(trace) = trace else {
		warn!("Reroute of {:?} requested without a RoutingTraceService resource", region);
		return;
	};
	for (entity, mut tables, settings, exclude) in query.iter_mut() {
		let dimensions = *tables.dimensions();
		let full = GridBox::full(&dimensions);
		if !full.contains(region.mins()) || !full.contains(region.maxs()) {
			warn!("Reroute of {:?} lies outside of the grid of {:?}", region, entity);
			continue;
		}
		tables.reroute_box(trace.get(), exclude, settings, &region);
		event_updated.write(EventRoutingUpdated::new(entity, region));
	}
}
