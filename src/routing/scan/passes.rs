//! Drive the scanning passes over a whole map or over the part of it
//! whose geometry changed.
//!
//! Each actor size is routed independently. The floor pass scans every
//! column of the box first, the connection pass then reads those floors to
//! measure the passages between neighbouring columns. When only part of
//! the map changed, the floors are rescanned over the changed box grown by
//! the footprint of the actor and the connections over a box one cell
//! wider still, where the outer ring of columns only updates the
//! directions leading back into the rescanned area
//!

use crate::prelude::*;
use bevy::prelude::*;

impl RoutingContext<'_> {
	/// Scan the floors and ceilings of the column `(x, y)` from level
	/// `max_z` down to the bottom of the grid
	pub fn scan_column(&mut self, x: usize, y: usize, max_z: usize) {
		let mut z = Some(max_z);
		while let Some(level) = z {
			z = self.scan_floor_ceiling(x, y, level).checked_sub(1);
		}
	}
	/// Scan every column of `region` the actor fits into, starting from the
	/// top level of the region
	pub fn scan_floors_in_box(&mut self, region: &GridBox) {
		let dimensions = self.dimensions();
		for (x, y) in region.columns() {
			if dimensions.fits_footprint(x as i32, y as i32, self.actor_size) {
				self.scan_column(x, y, region.maxs().z);
			}
		}
	}
}

/// Whether a column of the outer ring around `inner` should update its
/// connection in the direction `(dx, dy)`. Only moves heading back towards
/// `inner` can have changed
fn faces_box(x: usize, y: usize, (dx, dy): (i32, i32), inner: &GridBox) -> bool {
	let mins = inner.mins();
	let maxs = inner.maxs();
	(x >= mins.x || dx > 0)
		&& (x <= maxs.x || dx < 0)
		&& (y >= mins.y || dy > 0)
		&& (y <= maxs.y || dy < 0)
}

impl RoutingTables {
	/// Discard every table and route the whole map from scratch. Returns
	/// the box of columns holding geometry, `None` when the map is empty
	/// and every cell is left filled
	pub fn build(
		&mut self,
		trace: &dyn TraceService,
		exclude: &ExcludeList,
		settings: &RoutingSettings,
	) -> Option<GridBox> {
		let dimensions = *self.dimensions();
		*self = RoutingTables::new(dimensions);
		let Some(map_box) = find_map_extents(trace, &dimensions, exclude) else {
			info!("No geometry found, routing tables left empty");
			return None;
		};
		info!("Building routing tables over {:?}", map_box);
		for actor_size in ActorSize::ALL {
			let scan_box = map_box.expanded(actor_size.cells() - 1, 0, &dimensions);
			let table = self.get_mut(actor_size);
			table.close_borders(&scan_box);
			let mut ctx = RoutingContext::new(trace, table, actor_size, exclude, settings);
			ctx.scan_floors_in_box(&scan_box);
			for (x, y) in scan_box.columns() {
				if !dimensions.fits_footprint(x as i32, y as i32, actor_size) {
					continue;
				}
				for ordinal in Ordinal::ALL {
					let (dx, dy) = ordinal.offset();
					let ax = x as i32 + dx;
					let ay = y as i32 + dy;
					// moves out of the box were closed along with the borders
					if ax < 0 || ay < 0 || !scan_box.contains_column(ax as usize, ay as usize) {
						continue;
					}
					ctx.update_connection_column_range(
						x,
						y,
						ordinal,
						scan_box.mins().z,
						scan_box.maxs().z,
					);
				}
			}
			debug!("Routed {:?} actors", actor_size);
		}
		info!("Routing tables built");
		Some(map_box)
	}
	/// Recalculate the routing around `region` after the geometry within it
	/// changed, such as a door opening or a wall being destroyed
	pub fn reroute_box(
		&mut self,
		trace: &dyn TraceService,
		exclude: &ExcludeList,
		settings: &RoutingSettings,
		region: &GridBox,
	) {
		let dimensions = *self.dimensions();
		for actor_size in ActorSize::ALL {
			debug!("Rerouting {:?} for {:?} actors", region, actor_size);
			let floor_box = region.expanded(actor_size.cells() - 1, 1, &dimensions);
			let connection_box = region.expanded(actor_size.cells(), 1, &dimensions);
			let table = self.get_mut(actor_size);
			let mut ctx = RoutingContext::new(trace, table, actor_size, exclude, settings)
				.with_write_bounds(connection_box);
			ctx.scan_floors_in_box(&floor_box);
			for (x, y) in connection_box.columns() {
				if !dimensions.fits_footprint(x as i32, y as i32, actor_size) {
					continue;
				}
				for ordinal in Ordinal::ALL {
					if !faces_box(x, y, ordinal.offset(), &floor_box) {
						continue;
					}
					ctx.update_connection_column_range(
						x,
						y,
						ordinal,
						connection_box.mins().z,
						connection_box.maxs().z,
					);
				}
			}
		}
	}
}
