//! Find the floor and ceiling of a cell.
//!
//! A tiny foot box is dropped from the top of the cell until it lands on
//! something. The space above the landing point is then checked for room
//! to place the legs and torso of the actor, if either is blocked the probe
//! restarts below the landing point. Once a floor with enough room above
//! it is found the ceiling is traced upwards with a box as wide as the
//! actor. The quantized floor and ceiling are written to every level the
//! opening spans.
//!
//! ```text
//!  ___________ ceiling
//! |           |
//! |   torso   |
//! |___________|
//!     |leg|
//! ____|___|____ floor
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Tiny box dropped to find a floor
pub(crate) fn foot_box() -> TraceBox {
	TraceBox::flat(MICROSTEP_SIZE / 2.0 - DIST_EPSILON)
}

impl RoutingContext<'_> {
	/// Scan the cell `(x, y, z)` for a floor and ceiling, writing the result
	/// to every level of the column the opening spans and marking the
	/// levels between the ceiling and `z` as filled. Returns the lowest
	/// level that was updated, scanning should continue from the level
	/// below it
	pub fn scan_floor_ceiling(&mut self, x: usize, y: usize, z: usize) -> usize {
		let dimensions = self.dimensions();
		dimensions.assert_footprint(x, y, z, self.actor_size);
		let half_width = self.actor_size.half_width();
		let leg_box = TraceBox::column(
			MICROSTEP_SIZE / 2.0 - DIST_EPSILON,
			0.0,
			quant_to_model(LEGROOM_HEIGHT) - 2.0 * DIST_EPSILON,
		);
		let torso_box = TraceBox::column(
			half_width,
			quant_to_model(LEGROOM_HEIGHT),
			quant_to_model(MIN_OPENING) - 2.0 * DIST_EPSILON,
		);
		let ceiling_box = TraceBox::flat(half_width);
		let centre = GridPos::new(x, y, z).to_world(self.actor_size);
		let cell_top = (z + 1) as f32 * UNIT_HEIGHT;

		let mut next_probe = cell_top - QUANT;
		let (bottom, top) = loop {
			// every restart lowers the probe so the model base is always reached
			if next_probe <= quant_to_model(MIN_OPENING) {
				self.table.set_filled(x, y, 0, z);
				return 0;
			}
			let start = Vec3::new(centre.x, centre.y, next_probe);
			let end = Vec3::new(centre.x, centre.y, -2.0 * UNIT_HEIGHT);
			let drop = self.passage_trace(start, end, &foot_box());
			if !drop.is_obstructed() {
				self.table.set_filled(x, y, 0, z);
				return 0;
			}
			let landing = drop.endpoint;
			let bottom = landing.z;
			if self.is_obstructed(landing, &leg_box) || self.is_obstructed(landing, &torso_box) {
				next_probe = bottom - quant_to_model(MIN_OPENING);
				continue;
			}
			let head = Vec3::new(landing.x, landing.y, bottom + torso_box.maxs.z);
			let sky = Vec3::new(landing.x, landing.y, dimensions.model_top());
			let mut top = self.passage_trace(head, sky, &ceiling_box).endpoint.z;
			// a ceiling above this cell may have passed through a one sided
			// floor of the level above
			if z + 1 < dimensions.height() && top > cell_top {
				let upper_floor = self.table.get_floor(x, y, z + 1);
				if upper_floor >= 0 {
					top = top.min(cell_top + quant_to_model(upper_floor - 1));
				}
			}
			let opening = model_ceiling_to_quant(top + 2.0 * DIST_EPSILON)
				- model_floor_to_quant(bottom - 2.0 * DIST_EPSILON);
			if opening < MIN_OPENING {
				next_probe = bottom - quant_to_model(MIN_OPENING);
				continue;
			}
			break (bottom, top);
		};

		let bottom_quant = model_floor_to_quant(bottom - 2.0 * DIST_EPSILON);
		let top_quant = model_ceiling_to_quant(top + 2.0 * DIST_EPSILON);
		let floor_z = bottom_quant.div_euclid(CELL_HEIGHT).max(0) as usize;
		// ceilings of 1..=16 belong to a cell, so step down by one before dividing
		let ceiling_z = ((top_quant - 1).div_euclid(CELL_HEIGHT).max(0) as usize).min(z);
		for level in floor_z..=ceiling_z {
			let base = level as i32 * CELL_HEIGHT;
			self.table.set_floor(x, y, level, bottom_quant - base);
			self.table.set_ceiling(x, y, level, top_quant - base);
		}
		if ceiling_z < z {
			self.table.set_filled(x, y, ceiling_z + 1, z);
		}
		floor_z
	}
}
