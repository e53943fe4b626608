//! A collision world built from axis-aligned brushes. It answers traces
//! with a swept box slab test and is used to drive the routing passes in
//! tests, benchmarks and tooling where no level geometry is loaded
//!

use crate::prelude::*;
use bevy::prelude::*;

/// What a brush is made of
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrushContents {
	/// Blocks every trace
	#[default]
	Solid,
	/// Only blocks [TraceMode::Solid] traces, actors can walk through it
	Passable,
}

/// An axis-aligned block of geometry
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
	/// Lowest corner in model space
	mins: Vec3,
	/// Highest corner in model space
	maxs: Vec3,
	/// What the brush is made of
	#[cfg_attr(feature = "serde", serde(default))]
	contents: BrushContents,
	/// Name of the inline model the brush belongs to, if any
	#[cfg_attr(feature = "serde", serde(default))]
	model: Option<String>,
}

impl Brush {
	/// Create a solid brush spanning `mins` to `maxs`
	pub fn new(mins: Vec3, maxs: Vec3) -> Self {
		if mins.x >= maxs.x || mins.y >= maxs.y || mins.z >= maxs.z {
			panic!("Brush mins {} must be below maxs {} on every axis", mins, maxs);
		}
		Brush {
			mins,
			maxs,
			contents: BrushContents::Solid,
			model: None,
		}
	}
	/// Set what the brush is made of
	pub fn with_contents(mut self, contents: BrushContents) -> Self {
		self.contents = contents;
		self
	}
	/// Assign the brush to a named inline model
	pub fn with_model(mut self, model: &str) -> Self {
		self.model = Some(model.to_string());
		self
	}
	/// Lowest corner in model space
	pub fn mins(&self) -> Vec3 {
		self.mins
	}
	/// Highest corner in model space
	pub fn maxs(&self) -> Vec3 {
		self.maxs
	}
	/// Whether a trace in `mode` ignoring `exclude` can hit the brush
	fn blocks(&self, mode: TraceMode, exclude: &ExcludeList) -> bool {
		if let Some(model) = &self.model {
			if exclude.contains(model) {
				return false;
			}
		}
		match mode {
			TraceMode::Solid => true,
			TraceMode::Passage => self.contents == BrushContents::Solid,
		}
	}
	/// Sweep `extents` from `start` along `delta` against the brush. Returns
	/// the entry time in `[0, 1)` along with the axis and the face
	/// coordinate that was crossed. A box starting inside the brush is only
	/// stopped when it never leaves it, `None` is then returned for the face
	fn sweep(
		&self,
		start: Vec3,
		delta: Vec3,
		extents: &TraceBox,
	) -> Option<(f32, Option<(usize, f32)>)> {
		// grow the brush by the box so the box can be treated as a point
		let lo = self.mins - extents.maxs;
		let hi = self.maxs - extents.mins;
		let mut enter = f32::NEG_INFINITY;
		let mut exit = f32::INFINITY;
		let mut enter_face = None;
		for axis in 0..3 {
			let s = start[axis];
			let d = delta[axis];
			if d == 0.0 {
				// touching a face is not a hit
				if s <= lo[axis] || s >= hi[axis] {
					return None;
				}
				continue;
			}
			let t0 = (lo[axis] - s) / d;
			let t1 = (hi[axis] - s) / d;
			let (near, far, face) = if t0 < t1 {
				(t0, t1, lo[axis])
			} else {
				(t1, t0, hi[axis])
			};
			if near > enter {
				enter = near;
				enter_face = Some((axis, face));
			}
			exit = exit.min(far);
		}
		if enter >= exit || exit <= 0.0 || enter >= 1.0 {
			return None;
		}
		match enter_face {
			Some(face) if enter >= 0.0 => Some((enter, Some(face))),
			// started inside, a sweep leaving the brush is not held by it
			_ if exit < 1.0 => None,
			_ => Some((0.0, None)),
		}
	}
	/// Whether a box placed at `origin` overlaps the brush
	fn overlaps(&self, origin: Vec3, extents: &TraceBox) -> bool {
		let lo = origin + extents.mins;
		let hi = origin + extents.maxs;
		lo.x < self.maxs.x
			&& hi.x > self.mins.x
			&& lo.y < self.maxs.y
			&& hi.y > self.mins.y
			&& lo.z < self.maxs.z
			&& hi.z > self.mins.z
	}
}

/// A [TraceService] over a list of [Brush]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrushWorld {
	/// Every brush of the world
	brushes: Vec<Brush>,
}

impl BrushWorld {
	/// Create a new instance of [BrushWorld]
	pub fn new(brushes: Vec<Brush>) -> Self {
		BrushWorld { brushes }
	}
	/// Get the brushes
	pub fn get(&self) -> &[Brush] {
		&self.brushes
	}
	/// Add a brush
	pub fn add(&mut self, brush: Brush) {
		self.brushes.push(brush);
	}
	/// Remove every brush belonging to the named inline model, returning how
	/// many were removed
	pub fn remove_model(&mut self, model: &str) -> usize {
		let before = self.brushes.len();
		self.brushes.retain(|b| b.model.as_deref() != Some(model));
		before - self.brushes.len()
	}
	/// Load a [BrushWorld] from a `.ron` file
	#[cfg(feature = "ron")]
	pub fn from_ron(path: String) -> Self {
		let file = match std::fs::File::open(&path) {
			Ok(file) => file,
			Err(e) => panic!("Failed opening BrushWorld file {}: {}", path, e),
		};
		match ron::de::from_reader(file) {
			Ok(world) => world,
			Err(e) => panic!("Failed deserializing BrushWorld: {}", e),
		}
	}
}

impl TraceService for BrushWorld {
	fn trace(
		&self,
		start: Vec3,
		end: Vec3,
		extents: &TraceBox,
		mode: TraceMode,
		exclude: &ExcludeList,
	) -> TraceResult {
		let delta = end - start;
		let length = delta.length();
		if length == 0.0 {
			let blocked = self
				.brushes
				.iter()
				.any(|b| b.blocks(mode, exclude) && b.overlaps(start, extents));
			let fraction = if blocked { 0.0 } else { 1.0 };
			return TraceResult {
				fraction,
				endpoint: start,
			};
		}
		let mut first_hit: Option<(f32, Option<(usize, f32)>)> = None;
		for brush in self.brushes.iter().filter(|b| b.blocks(mode, exclude)) {
			if let Some(hit) = brush.sweep(start, delta, extents) {
				if first_hit.is_none_or(|(t, _)| hit.0 < t) {
					first_hit = Some(hit);
				}
			}
		}
		match first_hit {
			None => TraceResult {
				fraction: 1.0,
				endpoint: end,
			},
			Some((_, None)) => TraceResult {
				fraction: 0.0,
				endpoint: start,
			},
			Some((enter, Some((axis, face)))) => {
				let backed_off = (enter - DIST_EPSILON / length).max(0.0);
				let mut endpoint = start + delta * backed_off;
				// rest exactly DIST_EPSILON off the face that was hit so
				// quantized heights do not pick up rounding noise
				if backed_off > 0.0 {
					endpoint[axis] = face - DIST_EPSILON * delta[axis].signum();
				}
				TraceResult {
					fraction: backed_off,
					endpoint,
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	/// A floor slab covering `[0, 128]` with its top at `z = 0`
	fn floor_world() -> BrushWorld {
		BrushWorld::new(vec![Brush::new(
			Vec3::new(0.0, 0.0, -16.0),
			Vec3::new(128.0, 128.0, 0.0),
		)])
	}
	#[test]
	fn trace_down_onto_floor() {
		let world = floor_world();
		let result = world.trace(
			Vec3::new(48.0, 48.0, 60.0),
			Vec3::new(48.0, 48.0, -128.0),
			&TraceBox::flat(2.0),
			TraceMode::Passage,
			&ExcludeList::default(),
		);
		assert!(result.is_obstructed());
		assert_eq!(DIST_EPSILON, result.endpoint.z);
		assert_eq!(48.0, result.endpoint.x);
	}
	#[test]
	fn trace_misses_floor() {
		let world = floor_world();
		let result = world.trace(
			Vec3::new(300.0, 48.0, 60.0),
			Vec3::new(300.0, 48.0, -128.0),
			&TraceBox::flat(2.0),
			TraceMode::Passage,
			&ExcludeList::default(),
		);
		assert_eq!(1.0, result.fraction);
		assert_eq!(-128.0, result.endpoint.z);
	}
	#[test]
	fn box_resting_on_floor_is_clear() {
		let world = floor_world();
		let origin = Vec3::new(48.0, 48.0, 0.0);
		let extents = TraceBox::column(10.0, DIST_EPSILON, 16.0);
		let result = world.trace(origin, origin, &extents, TraceMode::Passage, &ExcludeList::default());
		assert_eq!(1.0, result.fraction);
	}
	#[test]
	fn box_inside_floor_is_blocked() {
		let world = floor_world();
		let origin = Vec3::new(48.0, 48.0, -4.0);
		let extents = TraceBox::column(10.0, 0.0, 2.0);
		let result = world.trace(origin, origin, &extents, TraceMode::Passage, &ExcludeList::default());
		assert_eq!(0.0, result.fraction);
	}
	#[test]
	fn trace_leaving_brush_is_clear() {
		let world = floor_world();
		let result = world.trace(
			Vec3::new(48.0, 48.0, -8.0),
			Vec3::new(48.0, 48.0, 64.0),
			&TraceBox::flat(2.0),
			TraceMode::Passage,
			&ExcludeList::default(),
		);
		assert_eq!(1.0, result.fraction);
		assert_eq!(64.0, result.endpoint.z);
	}
	#[test]
	fn trace_within_brush_is_blocked() {
		let world = floor_world();
		let result = world.trace(
			Vec3::new(48.0, 48.0, -4.0),
			Vec3::new(48.0, 48.0, -12.0),
			&TraceBox::flat(2.0),
			TraceMode::Passage,
			&ExcludeList::default(),
		);
		assert_eq!(0.0, result.fraction);
		assert_eq!(-4.0, result.endpoint.z);
	}
	#[test]
	fn trace_drops_out_of_lintel_onto_floor() {
		let mut world = floor_world();
		world.add(Brush::new(Vec3::new(32.0, 32.0, 32.0), Vec3::new(64.0, 64.0, 64.0)));
		let result = world.trace(
			Vec3::new(48.0, 48.0, 60.0),
			Vec3::new(48.0, 48.0, -128.0),
			&TraceBox::flat(2.0),
			TraceMode::Passage,
			&ExcludeList::default(),
		);
		assert!(result.is_obstructed());
		assert_eq!(DIST_EPSILON, result.endpoint.z);
	}
	#[test]
	fn passage_ignores_passable_brushes() {
		let world = BrushWorld::new(vec![Brush::new(
			Vec3::new(0.0, 0.0, -16.0),
			Vec3::new(128.0, 128.0, 0.0),
		)
		.with_contents(BrushContents::Passable)]);
		let start = Vec3::new(48.0, 48.0, 60.0);
		let end = Vec3::new(48.0, 48.0, -128.0);
		let extents = TraceBox::flat(2.0);
		let passage = world.trace(start, end, &extents, TraceMode::Passage, &ExcludeList::default());
		assert_eq!(1.0, passage.fraction);
		let solid = world.trace(start, end, &extents, TraceMode::Solid, &ExcludeList::default());
		assert!(solid.is_obstructed());
	}
	#[test]
	fn excluded_models_are_ignored() {
		let mut world = floor_world();
		world.add(Brush::new(Vec3::new(32.0, 32.0, 0.0), Vec3::new(64.0, 64.0, 64.0)).with_model("*1"));
		let start = Vec3::new(48.0, 48.0, 60.0);
		let end = Vec3::new(48.0, 48.0, -128.0);
		let extents = TraceBox::flat(2.0);
		let exclude = ExcludeList::new(vec!["*1".to_string()]);
		let result = world.trace(start, end, &extents, TraceMode::Passage, &exclude);
		assert_eq!(DIST_EPSILON, result.endpoint.z);
		assert_eq!(1, world.remove_model("*1"));
		assert_eq!(1, world.get().len());
	}
	#[test]
	fn horizontal_sweep_stops_at_wall() {
		let world = BrushWorld::new(vec![Brush::new(
			Vec3::new(64.0, 0.0, 0.0),
			Vec3::new(72.0, 128.0, 64.0),
		)]);
		let result = world.trace(
			Vec3::new(16.0, 48.0, 8.0),
			Vec3::new(112.0, 48.0, 8.0),
			&TraceBox::column(4.0, 0.0, 8.0),
			TraceMode::Passage,
			&ExcludeList::default(),
		);
		assert!(result.is_obstructed());
		assert_eq!(60.0 - DIST_EPSILON, result.endpoint.x);
	}
}
