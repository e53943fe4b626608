//! The height an actor climbs when moving between two neighbouring cells,
//! along with whether the move takes it onto another level of the grid
//!

use crate::prelude::*;

/// Height component of a [Stepup]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StepHeight {
	/// Climb of the given number of quant, never more than [MAX_STEPUP]
	Height(u8),
	/// The move cannot be made by stepping
	#[default]
	NoStepup,
}

/// Whether a move ends on a different level of the grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LevelChange {
	/// The actor stays on the same level
	#[default]
	Same,
	/// The actor walks up onto the level above
	Up,
	/// The actor walks down onto the level below
	Down,
}

/// Step requirement of a move in one direction
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Stepup {
	/// How far the actor climbs
	height: StepHeight,
	/// Which level the actor ends up on
	level_change: LevelChange,
}

impl Stepup {
	/// A move that cannot be made
	pub const NO_STEPUP: Stepup = Stepup {
		height: StepHeight::NoStepup,
		level_change: LevelChange::Same,
	};
	/// A move across level ground
	pub const FLAT: Stepup = Stepup {
		height: StepHeight::Height(0),
		level_change: LevelChange::Same,
	};
	/// Create a climbable [Stepup] of `height` quant
	pub fn new(height: u8, level_change: LevelChange) -> Self {
		if height as i32 > MAX_STEPUP {
			panic!(
				"Stepup of {} exceeds the maximum climbable height {}",
				height, MAX_STEPUP
			);
		}
		Stepup {
			height: StepHeight::Height(height),
			level_change,
		}
	}
	/// Convert a measured climb into a [Stepup], anything taller than
	/// [MAX_STEPUP] becomes [Stepup::NO_STEPUP] and loses its level change
	pub fn from_climb(climb: i32, level_change: LevelChange) -> Self {
		if climb > MAX_STEPUP {
			Stepup::NO_STEPUP
		} else {
			Stepup::new(climb.max(0) as u8, level_change)
		}
	}
	/// Height component
	pub fn height(&self) -> StepHeight {
		self.height
	}
	/// Level change component
	pub fn level_change(&self) -> LevelChange {
		self.level_change
	}
	/// Whether an actor can make the move
	pub fn is_possible(&self) -> bool {
		matches!(self.height, StepHeight::Height(_))
	}
	/// The climb in quant, [NO_STEPUP] when the move is impossible
	pub fn climb(&self) -> i32 {
		match self.height {
			StepHeight::Height(h) => h as i32,
			StepHeight::NoStepup => NO_STEPUP,
		}
	}
}

impl std::fmt::Display for Stepup {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.height {
			StepHeight::NoStepup => write!(f, "--"),
			StepHeight::Height(h) => match self.level_change {
				LevelChange::Same => write!(f, "{}", h),
				LevelChange::Up => write!(f, "{}^", h),
				LevelChange::Down => write!(f, "{}v", h),
			},
		}
	}
}
