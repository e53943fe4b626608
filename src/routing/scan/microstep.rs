//! Refine the floor of a passage by sampling it with a row of tiny foot
//! traces between the centres of the two cells.
//!
//! A box as wide as the actor can miss a small obstruction an actor would
//! cut around diagonally, so the climb is measured from the highest rise
//! between consecutive samples. A short dip between two high samples is
//! stepped over rather than counted as a climb out of the dip
//!

use crate::prelude::*;
use crate::routing::scan::cell_scan::foot_box;
use bevy::prelude::*;

/// Outcome of a micro trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MicroTrace {
	/// Highest climb moving forwards, in quant
	stepup: i32,
	/// Highest climb moving backwards, in quant
	invstepup: i32,
	/// How far the floor of the passage drops below the base it was
	/// measured from, in quant
	bonus: i32,
}

impl MicroTrace {
	/// Highest climb moving forwards, in quant
	pub fn stepup(&self) -> i32 {
		self.stepup
	}
	/// Highest climb moving backwards, in quant
	pub fn invstepup(&self) -> i32 {
		self.invstepup
	}
	/// How far the floor of the passage drops below the base it was
	/// measured from, in quant
	pub fn bonus(&self) -> i32 {
		self.bonus
	}
}

/// Largest rise met walking across `heights` from first to last. Up to
/// [MICROSTEP_SKIP] samples lower than the current height are stepped over,
/// once more are met, or the walk ends while stepping over, it backtracks
/// to the highest of the skipped samples and carries on from there
pub fn max_rise(heights: &[i32]) -> i32 {
	let Some(last) = heights.len().checked_sub(1) else {
		return 0;
	};
	let mut current = heights[0];
	let mut highest_height = -1;
	let mut highest_index = 1;
	let mut skipped = 0;
	let mut rise = 0;
	let mut i = 1;
	while i <= last {
		let commit = heights[i] >= current || {
			skipped += 1;
			skipped > MICROSTEP_SKIP
		};
		if commit {
			if skipped == MICROSTEP_SKIP {
				i = highest_index;
			}
			rise = rise.max(heights[i] - current);
			current = heights[i];
			highest_height = -2;
			highest_index = i + 1;
			skipped = 0;
		} else {
			if heights[i] > highest_height {
				highest_height = heights[i];
				highest_index = i;
			}
			if i == last {
				skipped = MICROSTEP_SKIP;
				i = highest_index - 1;
			}
		}
		i += 1;
	}
	rise
}

impl RoutingContext<'_> {
	/// Sample the floor between the centre of `from` and the column
	/// `(ax, ay)` at level `az`, where `base` is the bottom of the passage
	/// found so far
	pub fn micro_trace(
		&self,
		from: &Place,
		ax: usize,
		ay: usize,
		az: usize,
		shift: PlaceShift,
		base: i32,
	) -> MicroTrace {
		let steps = MICROSTEPS;
		let start = from.cell().to_world(self.actor_size);
		let end = GridPos::new(ax, ay, az).to_world(self.actor_size);
		let mut bases = [0i32; MICROSTEPS + 1];
		bases[0] = from.floor();
		bases[steps] = self.table.get_floor(ax, ay, az).max(0) + az as i32 * CELL_HEIGHT;

		let mut new_bottom = bases[0].max(bases[steps]);
		for (i, sample) in bases.iter_mut().enumerate().take(steps).skip(1) {
			let point = start.lerp(end, i as f32 / steps as f32);
			let top = Vec3::new(point.x, point.y, quant_to_model(base) + 1.0);
			let bottom = Vec3::new(point.x, point.y, -QUANT);
			let result = self.passage_trace(top, bottom, &foot_box());
			*sample = if result.is_obstructed() {
				let floor = model_floor_to_quant(result.endpoint.z - DIST_EPSILON);
				// the full width trace already knows roughly where the legs
				// end, a tiny trace slipping past an obstruction cannot go
				// lower than that
				if i == steps / 2 && floor < base - MIN_STEPUP {
					base - MIN_STEPUP
				} else {
					floor
				}
			} else {
				-1
			};
			if self.settings.trace_microsteps {
				trace!(
					"Microstep {} at ({}, {}) from {} = {}",
					i,
					point.x,
					point.y,
					top.z,
					*sample
				);
			}
			new_bottom = new_bottom.max(*sample);
		}
		if self.settings.trace_microsteps {
			trace!(
				"Micro trace z:{} az:{} base:{} new_bottom:{} samples:{:?}",
				from.cell().z,
				az,
				base,
				new_bottom,
				bases
			);
		}

		let stepup = max_rise(&bases);
		let mut reversed = bases;
		reversed.reverse();
		let invstepup = max_rise(&reversed);

		let middle = bases[steps / 2];
		let stairway = match shift {
			PlaceShift::StepUp => bases[1..steps / 2].iter().all(|h| *h <= middle),
			PlaceShift::StepDown => bases[steps / 2 + 1..steps].iter().all(|h| *h <= middle),
			PlaceShift::None => false,
		};
		// on a stairway the tread at the cell border is the floor of the
		// passage even when the far side of the cell is higher
		let bonus = if stairway {
			base - middle
		} else {
			base - new_bottom
		};
		MicroTrace {
			stepup,
			invstepup,
			bonus,
		}
	}
}
