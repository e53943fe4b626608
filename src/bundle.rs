//! Defines the [RoutingBundle] to spawn the routing data of a map as a
//! single entity
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Everything the plugin needs to route a map
#[derive(Bundle)]
pub struct RoutingBundle {
	/// Shape of the grid
	dimensions: GridDimensions,
	/// Behaviour switches of the routing passes
	settings: RoutingSettings,
	/// Inline models every trace ignores
	exclude: ExcludeList,
	/// Routing data of every actor size
	tables: RoutingTables,
}

impl RoutingBundle {
	/// Create a new instance of [RoutingBundle] where every cell is filled.
	/// The tables are built once a
	/// [crate::plugin::reroute_layer::EventRebuildRouting] is sent
	pub fn new(dimensions: GridDimensions, settings: RoutingSettings, exclude: ExcludeList) -> Self {
		RoutingBundle {
			dimensions,
			settings,
			exclude,
			tables: RoutingTables::new(dimensions),
		}
	}
	/// Create a new instance of [RoutingBundle] with the tables already
	/// built against `trace`
	pub fn new_built(
		dimensions: GridDimensions,
		settings: RoutingSettings,
		exclude: ExcludeList,
		trace: &dyn TraceService,
	) -> Self {
		let mut bundle = RoutingBundle::new(dimensions, settings, exclude);
		bundle
			.tables
			.build(trace, &bundle.exclude, &bundle.settings);
		bundle
	}
	/// Create a new instance of [RoutingBundle] where the [RoutingSettings]
	/// and the [BrushWorld] to build against are read from disk
	#[cfg(feature = "ron")]
	pub fn new_from_disk(dimensions: GridDimensions, settings_path: &str, world_path: &str) -> Self {
		let settings = RoutingSettings::from_ron(settings_path.to_string());
		let world = BrushWorld::from_ron(world_path.to_string());
		RoutingBundle::new_built(dimensions, settings, ExcludeList::default(), &world)
	}
	/// Get the routing tables
	pub fn get_tables(&self) -> &RoutingTables {
		&self.tables
	}
}
