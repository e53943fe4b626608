//! Find the vertical span of the passage between two neighbouring places.
//!
//! The search tries three strategies in turn:
//! - when both places are open to the sky a single trace dropped at the
//!   midpoint between them finds the floor of the passage
//! - when the shared span of the places is short, one bracket around its
//!   middle must be clear if any passage exists
//! - otherwise the span is swept upwards one bracket at a time
//!
//! A clear bracket is then widened by probing the floor below it and the
//! ceiling above it at the midpoint of the move, or at the third points of
//! a diagonal move, keeping the higher floor and the lower ceiling found.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Absolute vertical span of a passage in quant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningSpan {
	/// Bottom of the passage
	low: i32,
	/// Top of the passage
	high: i32,
	/// Level of the destination floor reached through the passage
	level: usize,
}

impl OpeningSpan {
	/// Bottom of the passage
	pub fn low(&self) -> i32 {
		self.low
	}
	/// Top of the passage
	pub fn high(&self) -> i32 {
		self.high
	}
	/// Level of the destination floor reached through the passage
	pub fn level(&self) -> usize {
		self.level
	}
}

/// The passage from one cell into a neighbouring cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opening {
	/// Height of the passage in quant, `0` when there is no passage
	size: i32,
	/// Absolute bottom of the passage in quant
	base: i32,
	/// Step needed to make the move
	stepup: Stepup,
	/// Step needed to make the move back
	invstepup: Stepup,
	/// Level the actor ends up on
	dest_z: usize,
}

impl Opening {
	/// A passage that cannot be used, `base` is the lowest ceiling between
	/// the two cells
	pub fn closed(base: i32, dest_z: usize) -> Self {
		Opening {
			size: 0,
			base,
			stepup: Stepup::NO_STEPUP,
			invstepup: Stepup::NO_STEPUP,
			dest_z,
		}
	}
	/// Height of the passage in quant, `0` when there is no passage
	pub fn size(&self) -> i32 {
		self.size
	}
	/// Absolute bottom of the passage in quant
	pub fn base(&self) -> i32 {
		self.base
	}
	/// Absolute top of the passage in quant
	pub fn top(&self) -> i32 {
		self.base + self.size
	}
	/// Step needed to make the move
	pub fn stepup(&self) -> Stepup {
		self.stepup
	}
	/// Step needed to make the move back
	pub fn invstepup(&self) -> Stepup {
		self.invstepup
	}
	/// Level the actor ends up on
	pub fn dest_z(&self) -> usize {
		self.dest_z
	}
	/// Whether an actor can pass
	pub fn is_open(&self) -> bool {
		self.size > 0
	}
}

impl RoutingContext<'_> {
	/// Find the passage from `(x, y, z)` into the neighbouring column
	/// `(ax, ay)`, either onto the neighbour at the same level or onto the
	/// one above it. A closed [Opening] is returned when there is none
	pub fn trace_passage(&self, x: usize, y: usize, z: usize, ax: usize, ay: usize) -> Opening {
		let height = self.dimensions().height();
		let from = Place::new(self.table(), x, y, z);
		let to = Place::new(self.table(), ax, ay, z);
		let above_ceiling = if z + 1 < height {
			self.table.get_ceiling(ax, ay, z + 1) + (z as i32 + 1) * CELL_HEIGHT
		} else {
			to.ceiling()
		};
		let lowest_ceiling = if self.table.get_ceiling(ax, ay, z) == 0
			|| to.ceiling() - from.floor() < MIN_OPENING
		{
			from.ceiling().min(above_ceiling)
		} else {
			from.ceiling().min(to.ceiling())
		};
		let target = if to.is_usable() && from.intersects_enough(&to) {
			Some(to)
		} else if z + 1 < height {
			let above = Place::new(self.table(), ax, ay, z + 1);
			(above.is_usable() && from.intersects_enough(&above)).then_some(above)
		} else {
			None
		};
		target
			.and_then(|target| self.trace_one_passage(&from, &target))
			.unwrap_or_else(|| Opening::closed(lowest_ceiling, z))
	}
	/// Measure the passage between two places and the steps needed to cross
	/// it in both directions
	fn trace_one_passage(&self, from: &Place, to: &Place) -> Option<Opening> {
		let z = from.cell().z;
		let (ax, ay) = (to.cell().x, to.cell().y);
		let lower = from.floor().max(to.floor());
		let upper = from.ceiling().min(to.ceiling());
		let span = self.find_opening(from, ax, ay, lower, upper)?;
		let high = span.high();
		let mut base = span.low();
		let mut size = high - base;
		let az = to.floor_z();
		// the foot space only needs to be as wide as a micro trace
		if size < MIN_OPENING - MIN_STEPUP {
			return None;
		}
		let source_floor = from.floor();
		let dest_floor = self.table.get_floor(ax, ay, az) + az as i32 * CELL_HEIGHT;
		let (stepup, invstepup) = if size < ACTOR_MAX_HEIGHT
			|| (source_floor - base).abs() > MIN_STEPUP
			|| (dest_floor - base).abs() > MIN_STEPUP
		{
			let micro = self.micro_trace(from, ax, ay, az, from.shift_towards(to), base);
			base -= micro.bonus();
			size = high - base;
			(micro.stepup(), micro.invstepup())
		} else {
			((base - source_floor).max(0), (base - dest_floor).max(0))
		};
		// walking down a level is only possible when the way back is climbable
		let stepup_level = if az < z && invstepup <= MAX_STEPUP {
			LevelChange::Down
		} else if az > z {
			LevelChange::Up
		} else {
			LevelChange::Same
		};
		let invstepup_level = match az.cmp(&z) {
			std::cmp::Ordering::Greater => LevelChange::Down,
			std::cmp::Ordering::Less => LevelChange::Up,
			std::cmp::Ordering::Equal => LevelChange::Same,
		};
		if size < MIN_OPENING {
			return None;
		}
		Some(Opening {
			size,
			base,
			stepup: Stepup::from_climb(stepup, stepup_level),
			invstepup: Stepup::from_climb(invstepup, invstepup_level),
			dest_z: az,
		})
	}
	/// Search for a passage from `from` into the column `(ax, ay)` between
	/// the absolute heights `bottom` and `top`
	pub fn find_opening(
		&self,
		from: &Place,
		ax: usize,
		ay: usize,
		bottom: i32,
		top: i32,
	) -> Option<OpeningSpan> {
		if bottom == -1 {
			return None;
		}
		let dimensions = self.dimensions();
		let z = from.cell().z;
		let mut start = from.cell().to_world(self.actor_size);
		let mut end = GridPos::new(ax, ay, z).to_world(self.actor_size);
		start.z = 0.0;
		end.z = 0.0;

		let sky = dimensions.sky_quant();
		if from.ceiling() >= sky
			&& z as i32 * CELL_HEIGHT + self.table.get_ceiling(ax, ay, z) >= sky
		{
			let midpoint = start.lerp(end, 0.5);
			let heaven = Vec3::new(midpoint.x, midpoint.y, dimensions.model_top());
			let earth = Vec3::new(midpoint.x, midpoint.y, quant_to_model(bottom));
			let landing = self.passage_trace(heaven, earth, &self.actor_box());
			let found_bottom = model_floor_to_quant(landing.endpoint.z - DIST_EPSILON);
			if found_bottom <= bottom + MIN_STEPUP {
				return self
					.calc_new_z(ax, ay, top, bottom + MIN_OPENING)
					.map(|level| OpeningSpan {
						low: found_bottom,
						high: sky,
						level,
					});
			}
		}
		// no else, an arched entry fails the sky trace but has a passage below

		if top - bottom < 2 * MIN_OPENING {
			return self.trace_opening(
				start,
				end,
				ax,
				ay,
				bottom,
				top,
				top - MIN_OPENING,
				bottom + MIN_OPENING,
			);
		}
		let mut lo = bottom;
		while lo <= top - MIN_OPENING {
			if let Some(span) = self.trace_opening(start, end, ax, ay, bottom, top, lo, lo + 1) {
				return Some(span);
			}
			// any passage is at least MIN_OPENING tall so it cannot be stepped over
			lo += MIN_OPENING;
		}
		None
	}
	/// Sweep a slice of the actor from `lo` to `hi` across the move and if
	/// it is clear probe for the true floor and ceiling of the passage
	#[allow(clippy::too_many_arguments)]
	fn trace_opening(
		&self,
		start: Vec3,
		end: Vec3,
		ax: usize,
		ay: usize,
		bottom: i32,
		top: i32,
		lo: i32,
		hi: i32,
	) -> Option<OpeningSpan> {
		let slice = TraceBox::column(
			self.actor_size.half_width(),
			quant_to_model(lo) + DIST_EPSILON,
			quant_to_model(hi) - DIST_EPSILON,
		);
		if self.passage_trace(start, end, &slice).is_obstructed() {
			return None;
		}
		let low = self.find_opening_floor(start, end, lo, bottom);
		let high = self.find_opening_ceiling(start, end, hi, top);
		if high - low < MIN_OPENING || low == -1 {
			return None;
		}
		self.calc_new_z(ax, ay, top, high)
			.map(|level| OpeningSpan { low, high, level })
	}
	/// Fractions of the move where the floor and ceiling are probed
	fn probe_fractions(start: Vec3, end: Vec3) -> &'static [f32] {
		if start.x == end.x || start.y == end.y {
			&[0.5]
		} else {
			&[0.33, 0.66]
		}
	}
	/// Highest floor below `starting_height` along the move, never below
	/// `floor_limit`
	fn find_opening_floor(&self, start: Vec3, end: Vec3, starting_height: i32, floor_limit: i32) -> i32 {
		Self::probe_fractions(start, end)
			.iter()
			.map(|frac| {
				let point = start.lerp(end, *frac);
				let from = Vec3::new(point.x, point.y, quant_to_model(starting_height) + QUANT / 2.0);
				let to = Vec3::new(point.x, point.y, -QUANT);
				let landing = self.passage_trace(from, to, &self.actor_box());
				model_floor_to_quant(landing.endpoint.z - DIST_EPSILON)
			})
			.fold(floor_limit, i32::max)
	}
	/// Lowest ceiling above `starting_height` along the move, never above
	/// `ceiling_limit`
	fn find_opening_ceiling(&self, start: Vec3, end: Vec3, starting_height: i32, ceiling_limit: i32) -> i32 {
		let model_top = self.dimensions().model_top();
		Self::probe_fractions(start, end)
			.iter()
			.map(|frac| {
				let point = start.lerp(end, *frac);
				let from = Vec3::new(point.x, point.y, quant_to_model(starting_height) - QUANT / 2.0);
				let to = Vec3::new(point.x, point.y, model_top + QUANT);
				let hit = self.passage_trace(from, to, &self.actor_box());
				model_ceiling_to_quant(hit.endpoint.z + DIST_EPSILON)
			})
			.fold(ceiling_limit, i32::min)
	}
	/// Level of the destination floor reachable under the passage top `hi`,
	/// `None` when the destination has no floor there or the floor leaves
	/// too little room below `top`
	pub fn calc_new_z(&self, ax: usize, ay: usize, top: i32, hi: i32) -> Option<usize> {
		let max_z = self.dimensions().height() as i32 - 1;
		let mut level = ((hi - 1) / CELL_HEIGHT).clamp(0, max_z);
		let mut adjacent_low = self.table.get_floor(ax, ay, level as usize) + level * CELL_HEIGHT;
		if adjacent_low > hi {
			if level == 0 {
				return None;
			}
			level -= 1;
			adjacent_low = self.table.get_floor(ax, ay, level as usize) + level * CELL_HEIGHT;
		}
		if adjacent_low >= 0 && top - adjacent_low >= MIN_OPENING - MIN_STEPUP {
			Some((adjacent_low / CELL_HEIGHT) as usize)
		} else {
			None
		}
	}
}
