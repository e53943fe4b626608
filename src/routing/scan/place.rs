//! A [Place] is the part of a grid column an actor can exist in, read from
//! the floor and ceiling of a cell but with both heights made absolute
//!

use crate::prelude::*;

/// How the span of one [Place] sits against the span of another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceShift {
	/// The spans are not offset, or one of the places is unusable
	None,
	/// Floor and ceiling of the other place are both higher, like standing
	/// in front of a stairway
	StepUp,
	/// Floor and ceiling of the other place are both lower
	StepDown,
}

/// Absolute floor and ceiling of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Place {
	/// Cell the place was read from
	cell: GridPos,
	/// Absolute floor in quant
	floor: i32,
	/// Absolute ceiling in quant
	ceiling: i32,
	/// Level holding the floor
	floor_z: usize,
	/// Whether an actor fits
	usable: bool,
}

impl Place {
	/// Read the place of a cell from `table`
	pub fn new(table: &RoutingTable, x: usize, y: usize, z: usize) -> Self {
		let base = z as i32 * CELL_HEIGHT;
		let relative_ceiling = table.get_ceiling(x, y, z);
		let floor = table.get_floor(x, y, z) + base;
		let ceiling = relative_ceiling + base;
		Place {
			cell: GridPos::new(x, y, z),
			floor,
			ceiling,
			floor_z: (floor / CELL_HEIGHT).max(0) as usize,
			usable: relative_ceiling != 0 && floor > -1 && ceiling - floor >= MIN_OPENING,
		}
	}
	/// Cell the place was read from
	pub fn cell(&self) -> GridPos {
		self.cell
	}
	/// Absolute floor in quant
	pub fn floor(&self) -> i32 {
		self.floor
	}
	/// Absolute ceiling in quant
	pub fn ceiling(&self) -> i32 {
		self.ceiling
	}
	/// Level holding the floor
	pub fn floor_z(&self) -> usize {
		self.floor_z
	}
	/// Whether an actor fits
	pub fn is_usable(&self) -> bool {
		self.usable
	}
	/// Whether the spans of the two places share at least [MIN_OPENING]
	pub fn intersects_enough(&self, other: &Place) -> bool {
		self.ceiling.min(other.ceiling) - self.floor.max(other.floor) >= MIN_OPENING
	}
	/// Classify the offset between this place and `other`
	pub fn shift_towards(&self, other: &Place) -> PlaceShift {
		if !self.usable || !other.usable {
			return PlaceShift::None;
		}
		if self.floor < other.floor && self.ceiling < other.ceiling {
			PlaceShift::StepUp
		} else if self.floor > other.floor && self.ceiling > other.ceiling {
			PlaceShift::StepDown
		} else {
			PlaceShift::None
		}
	}
}
