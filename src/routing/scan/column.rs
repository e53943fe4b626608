//! Update the connections of one column towards one neighbouring column.
//!
//! Each level is checked in turn from the bottom. A passage found from a
//! level can span several levels above it, those levels are written
//! together and the scan skips past them
//!

use crate::prelude::*;
use bevy::prelude::*;

impl RoutingContext<'_> {
	/// Update the connections of every level of the column `(x, y)`
	/// towards `ordinal`
	pub fn update_connection_column(&mut self, x: usize, y: usize, ordinal: Ordinal) {
		let max_z = self.dimensions().height() - 1;
		self.update_connection_column_range(x, y, ordinal, 0, max_z);
	}
	/// Update the connections of the levels `min_z..=max_z` of the column
	/// `(x, y)` towards `ordinal`
	pub fn update_connection_column_range(
		&mut self,
		x: usize,
		y: usize,
		ordinal: Ordinal,
		min_z: usize,
		max_z: usize,
	) {
		let dimensions = self.dimensions();
		dimensions.assert_footprint(x, y, max_z, self.actor_size);
		let (dx, dy) = ordinal.offset();
		let ax = x as i32 + dx;
		let ay = y as i32 + dy;
		if !dimensions.fits_footprint(ax, ay, self.actor_size) {
			for z in min_z..=max_z {
				self.table.set_no_connection(x, y, z, ordinal);
			}
			return;
		}
		let (ax, ay) = (ax as usize, ay as usize);
		let mut z = min_z;
		while z <= max_z {
			z = self.update_connection(x, y, ax, ay, z, ordinal) + 1;
		}
	}
	/// Update the connections of every column within `region` towards all
	/// of their neighbours
	pub fn update_connections_in_box(&mut self, region: &GridBox) {
		let dimensions = self.dimensions();
		for (x, y) in region.columns() {
			if !dimensions.fits_footprint(x as i32, y as i32, self.actor_size) {
				continue;
			}
			for ordinal in Ordinal::ALL {
				self.update_connection_column_range(x, y, ordinal, region.mins().z, region.maxs().z);
			}
		}
	}
	/// Update the connection of `(x, y, z)` into the column `(ax, ay)`.
	/// Returns the highest level that was written
	fn update_connection(
		&mut self,
		x: usize,
		y: usize,
		ax: usize,
		ay: usize,
		z: usize,
		ordinal: Ordinal,
	) -> usize {
		let top_level = z + 1 >= self.dimensions().height();
		let ceiling = self.table.get_ceiling(x, y, z);
		let adjacent_ceiling = self.table.get_ceiling(ax, ay, z);
		let upper_adjacent_ceiling = if top_level {
			adjacent_ceiling
		} else {
			self.table.get_ceiling(ax, ay, z + 1)
		};
		if (adjacent_ceiling == 0 && upper_adjacent_ceiling == 0) || ceiling == 0 {
			self.table.set_no_connection(x, y, z, ordinal);
			return z;
		}
		let base = z as i32 * CELL_HEIGHT;
		let absolute_ceiling = ceiling + base;
		let extended_adjacent_ceiling = if top_level {
			absolute_ceiling
		} else {
			adjacent_ceiling + base + CELL_HEIGHT
		};
		let absolute_floor = self.table.get_floor(x, y, z) + base;
		let absolute_adjacent_floor = self.table.get_floor(ax, ay, z) + base;
		if absolute_ceiling < absolute_adjacent_floor || extended_adjacent_ceiling < absolute_floor {
			self.table.set_no_connection(x, y, z, ordinal);
			return z;
		}
		let opening = self.trace_passage(x, y, z, ax, ay);
		self.fill_passage_data(x, y, z, ax, ay, ordinal, &opening)
	}
	/// Write `opening` to every level of `(x, y)` it spans from `z` upwards.
	/// Returns the highest level the column scan can skip to
	#[allow(clippy::too_many_arguments)]
	fn fill_passage_data(
		&mut self,
		x: usize,
		y: usize,
		z: usize,
		ax: usize,
		ay: usize,
		ordinal: Ordinal,
		opening: &Opening,
	) -> usize {
		let top = opening.top();
		let max_z = self.dimensions().height() as i32 - 1;
		// ceil(top / CELL_HEIGHT) - 1
		let ceiling_z = ((top + CELL_HEIGHT - 1).div_euclid(CELL_HEIGHT) - 1).min(max_z);
		if ceiling_z < z as i32 {
			self.table.set_no_connection(x, y, z, ordinal);
			return z;
		}
		let ceiling_z = ceiling_z as usize;
		if !opening.is_open() {
			for level in z..=ceiling_z {
				self.table.set_no_connection(x, y, level, ordinal);
			}
		} else {
			for level in z..=ceiling_z {
				// measured from the floor or the bottom of the level, whichever is higher
				let size = top - opening.base().max(level as i32 * CELL_HEIGHT);
				self.table.set_connection(x, y, level, ordinal, size);
				self.table.set_stepup(x, y, level, ordinal, Stepup::FLAT);
			}
			self.table.set_stepup(x, y, z, ordinal, opening.stepup());
			if self.settings.write_reverse_connections {
				self.fill_reverse_passage(ax, ay, ordinal.inverse(), opening);
			}
		}
		if ceiling_z == z || self.table.get_floor(x, y, ceiling_z) < 0 {
			ceiling_z
		} else {
			// the top level may hold a floor with its own ceiling
			ceiling_z - 1
		}
	}
	/// Record the move back through a passage that changes level, unless the
	/// neighbour already has a connection in that direction
	fn fill_reverse_passage(&mut self, ax: usize, ay: usize, inverse: Ordinal, opening: &Opening) {
		if opening.stepup().level_change() == LevelChange::Same
			|| !opening.invstepup().is_possible()
			|| !self.write_bounds.contains_column(ax, ay)
		{
			return;
		}
		let az = opening.dest_z();
		if self.table.get_connection(ax, ay, az, inverse) != 0 {
			return;
		}
		let size = opening.top() - opening.base().max(az as i32 * CELL_HEIGHT);
		if size > 0 {
			debug!(
				"Reverse connection ({}, {}, {}) towards {:?} of {}",
				ax, ay, az, inverse, size
			);
			self.table.set_connection(ax, ay, az, inverse, size);
			self.table.set_stepup(ax, ay, az, inverse, opening.invstepup());
		}
	}
}
