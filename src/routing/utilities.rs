//! Useful structures, constants and unit conversions shared by the routing
//! passes
//!

use bevy::prelude::*;

/// Horizontal length of a grid cell in model units
pub const UNIT_SIZE: f32 = 32.0;
/// Vertical length of a grid cell in model units
pub const UNIT_HEIGHT: f32 = 64.0;
/// Number of model units within one quantized height step
pub const QUANT: f32 = 4.0;
/// Number of quantized height steps within one grid cell
pub const CELL_HEIGHT: i32 = (UNIT_HEIGHT / QUANT) as i32;
/// Largest number of cells along the `x` and `y` axes
pub const MAX_GRID_WIDTH: usize = 256;
/// Largest number of cells along the `z` axis
pub const MAX_GRID_HEIGHT: usize = 8;
/// The smallest vertical gap (in quant) an actor can crouch through
pub const MIN_OPENING: i32 = 6;
/// Height (in quant) of the box that checks for room to place the legs
pub const LEGROOM_HEIGHT: i32 = 4;
/// Tolerance (in quant) used when comparing neighbouring floors
pub const MIN_STEPUP: i32 = 2;
/// The tallest step (in quant) an actor can climb
pub const MAX_STEPUP: i32 = 4;
/// Raw value reported for a step that cannot be climbed
pub const NO_STEPUP: i32 = 2 * CELL_HEIGHT;
/// Distance in model units between two samples of the micro trace
pub const MICROSTEP_SIZE: f32 = 4.0;
/// Number of samples the micro trace takes between two cell centres
pub const MICROSTEPS: usize = (UNIT_SIZE / MICROSTEP_SIZE) as usize;
/// Number of non-rising samples tolerated before the micro trace backtracks
pub const MICROSTEP_SKIP: usize = 2;
/// Horizontal margin kept between an actor box and the edges of its cells
pub const WALL_SIZE: f32 = 5.0;
/// Distance a trace backs off from the surface it hits
pub const DIST_EPSILON: f32 = 1.0 / 32.0;
/// Openings at least this tall (in quant) skip the micro trace when the
/// neighbouring floors line up
pub const ACTOR_MAX_HEIGHT: i32 = CELL_HEIGHT;
/// Height in model units an actor needs to stand upright
pub const PLAYER_STANDING_HEIGHT: f32 = 56.0;
/// Largest actor footprint, measured in cells along one side
pub const ACTOR_MAX_SIZE: usize = 2;

/// Convert a quantized height into model units
pub fn quant_to_model(quant: i32) -> f32 {
	quant as f32 * QUANT
}

/// Quantize a floor height, rounding up so an actor never sinks into it
pub fn model_floor_to_quant(height: f32) -> i32 {
	(height / QUANT).ceil() as i32
}

/// Quantize a ceiling height, rounding down so an actor never clips into it
pub fn model_ceiling_to_quant(height: f32) -> i32 {
	(height / QUANT).floor() as i32
}

/// The eight horizontal directions of movement. The discriminant is the
/// direction index used by the routing table and pairs are laid out so that
/// the inverse of any direction is found by flipping the lowest bit
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Reflect)]
pub enum Ordinal {
	/// `+x`
	East = 0,
	/// `-x`
	West = 1,
	/// `+y`
	North = 2,
	/// `-y`
	South = 3,
	/// `+x +y`
	NorthEast = 4,
	/// `-x -y`
	SouthWest = 5,
	/// `-x +y`
	NorthWest = 6,
	/// `+x -y`
	SouthEast = 7,
}

impl Ordinal {
	/// Every direction in index order
	pub const ALL: [Ordinal; 8] = [
		Ordinal::East,
		Ordinal::West,
		Ordinal::North,
		Ordinal::South,
		Ordinal::NorthEast,
		Ordinal::SouthWest,
		Ordinal::NorthWest,
		Ordinal::SouthEast,
	];
	/// Lookup a direction from its table index
	pub fn from_index(index: usize) -> Self {
		match Ordinal::ALL.get(index) {
			Some(ordinal) => *ordinal,
			None => panic!("Direction index {} is out of range, expected 0..8", index),
		}
	}
	/// Table index of the direction
	pub fn index(&self) -> usize {
		*self as usize
	}
	/// The opposite direction
	pub fn inverse(&self) -> Self {
		Ordinal::from_index(self.index() ^ 1)
	}
	/// Step along the `(x, y)` axes taken by moving in this direction
	pub fn offset(&self) -> (i32, i32) {
		match self {
			Ordinal::East => (1, 0),
			Ordinal::West => (-1, 0),
			Ordinal::North => (0, 1),
			Ordinal::South => (0, -1),
			Ordinal::NorthEast => (1, 1),
			Ordinal::SouthWest => (-1, -1),
			Ordinal::NorthWest => (-1, 1),
			Ordinal::SouthEast => (1, -1),
		}
	}
	/// Whether the direction moves along both axes
	pub fn is_diagonal(&self) -> bool {
		self.index() >= 4
	}
}

/// Footprint class of an actor. Each size owns an independent routing table
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Reflect)]
pub enum ActorSize {
	/// Occupies a single cell
	#[default]
	Normal,
	/// Occupies a `2x2` block of cells
	Large,
}

impl ActorSize {
	/// Every supported size, smallest first
	pub const ALL: [ActorSize; ACTOR_MAX_SIZE] = [ActorSize::Normal, ActorSize::Large];
	/// Create an [ActorSize] from the number of cells along one side of its
	/// footprint
	pub fn new(cells: usize) -> Self {
		match cells {
			1 => ActorSize::Normal,
			2 => ActorSize::Large,
			_ => panic!(
				"Actor size {} is not supported, expected 1..={}",
				cells, ACTOR_MAX_SIZE
			),
		}
	}
	/// Number of cells along one side of the footprint
	pub fn cells(&self) -> usize {
		match self {
			ActorSize::Normal => 1,
			ActorSize::Large => 2,
		}
	}
	/// Zero based index used to select the table of this size
	pub fn index(&self) -> usize {
		self.cells() - 1
	}
	/// Half the horizontal extent of the box used to trace this actor,
	/// keeping [WALL_SIZE] away from the edges of its cells
	pub fn half_width(&self) -> f32 {
		UNIT_SIZE * self.cells() as f32 / 2.0 - WALL_SIZE - DIST_EPSILON
	}
}
