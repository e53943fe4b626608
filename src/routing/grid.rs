//! The routing grid is a `width x width x height` block of cells laid over
//! the world. Cells are wider than they are tall, a cell at `(x, y, z)`
//! covers `[x, x+1) * UNIT_SIZE` by `[y, y+1) * UNIT_SIZE` by
//! `[z, z+1) * UNIT_HEIGHT` in model space
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Position of a cell within the grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct GridPos {
	/// Column along the `x` axis
	pub x: usize,
	/// Row along the `y` axis
	pub y: usize,
	/// Level along the `z` axis
	pub z: usize,
}

impl GridPos {
	/// Create a new instance of [GridPos]
	pub fn new(x: usize, y: usize, z: usize) -> Self {
		GridPos { x, y, z }
	}
	/// Model space centre of an actor of `actor_size` whose footprint starts
	/// at this cell
	pub fn to_world(&self, actor_size: ActorSize) -> Vec3 {
		let half_footprint = UNIT_SIZE * actor_size.cells() as f32 / 2.0;
		Vec3::new(
			self.x as f32 * UNIT_SIZE + half_footprint,
			self.y as f32 * UNIT_SIZE + half_footprint,
			self.z as f32 * UNIT_HEIGHT + UNIT_HEIGHT / 2.0,
		)
	}
	/// Find the cell containing a model space position, `None` if the
	/// position lies outside of the grid
	pub fn from_world(position: Vec3, dimensions: &GridDimensions) -> Option<Self> {
		if position.x < 0.0 || position.y < 0.0 || position.z < 0.0 {
			return None;
		}
		let x = (position.x / UNIT_SIZE) as usize;
		let y = (position.y / UNIT_SIZE) as usize;
		let z = (position.z / UNIT_HEIGHT) as usize;
		if x < dimensions.width() && y < dimensions.width() && z < dimensions.height() {
			Some(GridPos::new(x, y, z))
		} else {
			None
		}
	}
}

/// An inclusive box of cells
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Reflect)]
pub struct GridBox {
	/// Lowest corner
	mins: GridPos,
	/// Highest corner, inclusive
	maxs: GridPos,
}

impl GridBox {
	/// Create a new instance of [GridBox], every axis of `mins` must not be
	/// greater than `maxs`
	pub fn new(mins: GridPos, maxs: GridPos) -> Self {
		if mins.x > maxs.x || mins.y > maxs.y || mins.z > maxs.z {
			panic!("GridBox mins {:?} exceed maxs {:?}", mins, maxs);
		}
		GridBox { mins, maxs }
	}
	/// The box covering every cell of the grid
	pub fn full(dimensions: &GridDimensions) -> Self {
		GridBox::new(
			GridPos::new(0, 0, 0),
			GridPos::new(
				dimensions.width() - 1,
				dimensions.width() - 1,
				dimensions.height() - 1,
			),
		)
	}
	/// Lowest corner
	pub fn mins(&self) -> GridPos {
		self.mins
	}
	/// Highest corner, inclusive
	pub fn maxs(&self) -> GridPos {
		self.maxs
	}
	/// Whether the `(x, y)` column lies within the box
	pub fn contains_column(&self, x: usize, y: usize) -> bool {
		x >= self.mins.x && x <= self.maxs.x && y >= self.mins.y && y <= self.maxs.y
	}
	/// Whether the cell lies within the box
	pub fn contains(&self, pos: GridPos) -> bool {
		self.contains_column(pos.x, pos.y) && pos.z >= self.mins.z && pos.z <= self.maxs.z
	}
	/// Grow the box by `horizontal` cells along `x` and `y` in both
	/// directions and by `up` levels along `z`, clipped to the grid
	pub fn expanded(&self, horizontal: usize, up: usize, dimensions: &GridDimensions) -> Self {
		let width_limit = dimensions.width() - 1;
		let height_limit = dimensions.height() - 1;
		GridBox {
			mins: GridPos::new(
				self.mins.x.saturating_sub(horizontal),
				self.mins.y.saturating_sub(horizontal),
				self.mins.z,
			),
			maxs: GridPos::new(
				(self.maxs.x + horizontal).min(width_limit),
				(self.maxs.y + horizontal).min(width_limit),
				(self.maxs.z + up).min(height_limit),
			),
		}
	}
	/// Smallest box containing both boxes
	pub fn union(&self, other: &GridBox) -> Self {
		GridBox {
			mins: GridPos::new(
				self.mins.x.min(other.mins.x),
				self.mins.y.min(other.mins.y),
				self.mins.z.min(other.mins.z),
			),
			maxs: GridPos::new(
				self.maxs.x.max(other.maxs.x),
				self.maxs.y.max(other.maxs.y),
				self.maxs.z.max(other.maxs.z),
			),
		}
	}
	/// Every `(x, y)` column of the box, row by row
	pub fn columns(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
		(self.mins.y..=self.maxs.y)
			.flat_map(move |y| (self.mins.x..=self.maxs.x).map(move |x| (x, y)))
	}
}

/// The number of cells along each axis of the grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Copy, PartialEq, Eq, Debug, Reflect)]
pub struct GridDimensions {
	/// Number of cells along both the `x` and `y` axes
	width: usize,
	/// Number of levels along the `z` axis
	height: usize,
}

impl Default for GridDimensions {
	fn default() -> Self {
		GridDimensions {
			width: MAX_GRID_WIDTH,
			height: MAX_GRID_HEIGHT,
		}
	}
}

impl GridDimensions {
	/// Create a new instance of [GridDimensions]. The `width` is shared by
	/// the `x` and `y` axes and must be within `1..=MAX_GRID_WIDTH`, the
	/// `height` counts levels and must be within `1..=MAX_GRID_HEIGHT`
	pub fn new(width: usize, height: usize) -> Self {
		if width == 0 || width > MAX_GRID_WIDTH {
			panic!(
				"Grid width `{}` is invalid, it must be within 1..={}",
				width, MAX_GRID_WIDTH
			);
		}
		if height == 0 || height > MAX_GRID_HEIGHT {
			panic!(
				"Grid height `{}` is invalid, it must be within 1..={}",
				height, MAX_GRID_HEIGHT
			);
		}
		GridDimensions { width, height }
	}
	/// Number of cells along both the `x` and `y` axes
	pub fn width(&self) -> usize {
		self.width
	}
	/// Number of levels along the `z` axis
	pub fn height(&self) -> usize {
		self.height
	}
	/// Number of cells in one level
	pub fn level_area(&self) -> usize {
		self.width * self.width
	}
	/// Model space height of the top of the grid
	pub fn model_top(&self) -> f32 {
		self.height as f32 * UNIT_HEIGHT
	}
	/// Quantized height of the top of the grid, a ceiling at this height is
	/// open sky
	pub fn sky_quant(&self) -> i32 {
		self.height as i32 * CELL_HEIGHT
	}
	/// Whether an actor of `actor_size` standing at `(x, y)` keeps its whole
	/// footprint inside the grid
	pub fn fits_footprint(&self, x: i32, y: i32, actor_size: ActorSize) -> bool {
		let limit = self.width as i32 - actor_size.cells() as i32;
		x >= 0 && y >= 0 && x <= limit && y <= limit
	}
	/// Panic if the footprint of `actor_size` at `(x, y, z)` leaves the grid
	pub fn assert_footprint(&self, x: usize, y: usize, z: usize, actor_size: ActorSize) {
		if !self.fits_footprint(x as i32, y as i32, actor_size) || z >= self.height {
			panic!(
				"Cell ({}, {}, {}) of a {:?} actor lies outside of a {}x{}x{} grid",
				x, y, z, actor_size, self.width, self.width, self.height
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn world_position_of_normal_actor() {
		let pos = GridPos::new(2, 3, 1);
		let result = pos.to_world(ActorSize::Normal);
		let actual = Vec3::new(80.0, 112.0, 96.0);
		assert_eq!(actual, result);
	}
	#[test]
	fn world_position_of_large_actor() {
		let pos = GridPos::new(2, 3, 0);
		let result = pos.to_world(ActorSize::Large);
		let actual = Vec3::new(96.0, 128.0, 32.0);
		assert_eq!(actual, result);
	}
	#[test]
	fn grid_position_from_world() {
		let dimensions = GridDimensions::new(8, 4);
		let result = GridPos::from_world(Vec3::new(80.0, 112.0, 96.0), &dimensions);
		assert_eq!(Some(GridPos::new(2, 3, 1)), result);
		let outside = GridPos::from_world(Vec3::new(80.0, 112.0, 300.0), &dimensions);
		assert_eq!(None, outside);
	}
	#[test]
	fn expand_box_clips_to_grid() {
		let dimensions = GridDimensions::new(8, 4);
		let region = GridBox::new(GridPos::new(1, 6, 0), GridPos::new(2, 7, 3));
		let result = region.expanded(2, 1, &dimensions);
		let actual = GridBox::new(GridPos::new(0, 4, 0), GridPos::new(4, 7, 3));
		assert_eq!(actual, result);
	}
	#[test]
	fn union_of_boxes() {
		let a = GridBox::new(GridPos::new(1, 1, 0), GridPos::new(2, 2, 0));
		let b = GridBox::new(GridPos::new(4, 0, 1), GridPos::new(5, 1, 2));
		let result = a.union(&b);
		let actual = GridBox::new(GridPos::new(1, 0, 0), GridPos::new(5, 2, 2));
		assert_eq!(actual, result);
	}
	#[test]
	fn columns_of_box() {
		let region = GridBox::new(GridPos::new(1, 1, 0), GridPos::new(2, 2, 0));
		let result: Vec<(usize, usize)> = region.columns().collect();
		let actual = vec![(1, 1), (2, 1), (1, 2), (2, 2)];
		assert_eq!(actual, result);
	}
	#[test]
	fn large_actor_footprint() {
		let dimensions = GridDimensions::new(8, 4);
		assert!(dimensions.fits_footprint(6, 6, ActorSize::Large));
		assert!(!dimensions.fits_footprint(7, 6, ActorSize::Large));
		assert!(dimensions.fits_footprint(7, 7, ActorSize::Normal));
		assert!(!dimensions.fits_footprint(-1, 0, ActorSize::Normal));
	}
	#[test]
	#[should_panic]
	fn grid_too_tall() {
		GridDimensions::new(8, 9);
	}
	#[test]
	#[should_panic]
	fn footprint_outside_grid() {
		let dimensions = GridDimensions::new(8, 4);
		dimensions.assert_footprint(7, 0, 0, ActorSize::Large);
	}
}
