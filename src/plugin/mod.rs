//! Defines the Bevy [Plugin] for GridRouting
//!

use crate::prelude::*;
use bevy::prelude::*;

pub mod reroute_layer;

/// Ordering of the routing systems within [Update]
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum OrderingSet {
	/// Full rebuilds of the routing tables
	Build,
	/// Partial reroutes after the geometry changed
	Reroute,
}

/// Builds and maintains the [RoutingTables] of every entity spawned from a
/// [RoutingBundle]
pub struct GridRoutingPlugin;

impl Plugin for GridRoutingPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.register_type::<Ordinal>()
			.register_type::<ActorSize>()
			.register_type::<GridPos>()
			.register_type::<GridBox>()
			.register_type::<GridDimensions>()
			.register_type::<RoutingSettings>()
			.register_type::<TraceMode>()
			.add_event::<reroute_layer::EventRebuildRouting>()
			.add_event::<reroute_layer::EventRerouteBox>()
			.add_event::<reroute_layer::EventRoutingUpdated>()
			.configure_sets(Update, (OrderingSet::Build, OrderingSet::Reroute).chain())
			.add_systems(
				Update,
				(
					reroute_layer::process_rebuild_requests.in_set(OrderingSet::Build),
					reroute_layer::process_reroute_requests.in_set(OrderingSet::Reroute),
				),
			);
	}
}
