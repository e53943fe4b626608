//! Routing never inspects level geometry directly, instead it sweeps
//! axis-aligned boxes through the world via a [TraceService] and reads back
//! how far each box travelled before touching something
//!

pub mod brush_world;

use bevy::prelude::*;

/// How a trace treats the surfaces it meets
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum TraceMode {
	/// Stop at any surface
	Solid,
	/// Stop only at surfaces an actor cannot pass through, surfaces marked
	/// as passable are ignored
	Passage,
}

/// An axis-aligned box, relative to the point being traced, that is swept
/// along a trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceBox {
	/// Lowest corner relative to the trace point
	pub mins: Vec3,
	/// Highest corner relative to the trace point
	pub maxs: Vec3,
}

impl TraceBox {
	/// Create a new instance of [TraceBox]
	pub fn new(mins: Vec3, maxs: Vec3) -> Self {
		TraceBox { mins, maxs }
	}
	/// A flat box spanning `half_width` either side of the trace point along
	/// `x` and `y` with no height
	pub fn flat(half_width: f32) -> Self {
		TraceBox {
			mins: Vec3::new(-half_width, -half_width, 0.0),
			maxs: Vec3::new(half_width, half_width, 0.0),
		}
	}
	/// A box spanning `half_width` either side of the trace point along `x`
	/// and `y` and from `bottom` to `top` along `z`
	pub fn column(half_width: f32, bottom: f32, top: f32) -> Self {
		TraceBox {
			mins: Vec3::new(-half_width, -half_width, bottom),
			maxs: Vec3::new(half_width, half_width, top),
		}
	}
}

/// Outcome of a trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceResult {
	/// Share of the distance travelled before the box touched a surface,
	/// `1.0` means the trace was unobstructed
	pub fraction: f32,
	/// Where the trace point came to rest
	pub endpoint: Vec3,
}

impl TraceResult {
	/// Whether the trace was stopped by a surface
	pub fn is_obstructed(&self) -> bool {
		self.fraction < 1.0
	}
}

/// Names of inline models (doors, hatches, destructible props) that every
/// routing trace ignores
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeList(Vec<String>);

impl ExcludeList {
	/// Create a new instance of [ExcludeList]
	pub fn new(models: Vec<String>) -> Self {
		ExcludeList(models)
	}
	/// Whether the named model is ignored
	pub fn contains(&self, model: &str) -> bool {
		self.0.iter().any(|m| m == model)
	}
	/// Get the excluded model names
	pub fn get(&self) -> &[String] {
		&self.0
	}
}

/// The collision primitive the routing passes are built upon
pub trait TraceService {
	/// Sweep `extents` from `start` to `end` and report the first surface
	/// hit. When `start` equals `end` the trace tests whether the box placed
	/// at `start` overlaps anything, a fraction of `0.0` meaning it does
	fn trace(
		&self,
		start: Vec3,
		end: Vec3,
		extents: &TraceBox,
		mode: TraceMode,
		exclude: &ExcludeList,
	) -> TraceResult;
}
